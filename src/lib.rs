//! # tdvisu-rs: snapshots of dynamic programming on tree decompositions
//!
//! **`tdvisu-rs`** turns the trace of a dynamic-programming solver running over a
//! tree decomposition into a sequence of Graphviz descriptions, one per solver step.
//! Rendered one after another, the frames show which bag the solver is working on,
//! which solution table it just produced, and how that step relates to the
//! underlying problem graphs.
//!
//! ## Inputs
//!
//! A single JSON document describes
//!
//! - the **tree decomposition**: bags with their items and labels, and the tree edges,
//! - the **timeline**: the ordered solver steps, each targeting a bag or a join of
//!   two bags, optionally carrying a solution table,
//! - optional **support graphs**: incidence graphs of the input formula (from which
//!   primal and dual graphs can be inferred) and arbitrary undirected graphs,
//! - styling: colors, orientation, table limits, file basenames.
//!
//! ## Outputs
//!
//! For every step and every graph one [`Snapshot`][crate::dot::Snapshot], i.e. a
//! complete DOT description. All snapshots of a graph share the same structure and
//! differ only in styling, so a layout engine places them identically.
//!
//! ## Basic Usage
//!
//! ```rust
//! use tdvisu_rs::visualization::Visualization;
//!
//! let json = r#"{
//!     "treeDecJson": {
//!         "bagpre": "bag %s",
//!         "num_vars": 2,
//!         "edgearray": [[2, 1]],
//!         "labeldict": [{"id": 1, "items": [1], "labels": ["[1]"]}, {"id": 2, "items": [1, 2], "labels": ["[1, 2]"]}]
//!     },
//!     "tdTimeline": [[2, [[["v1"], [0], [1]], "sol bag 2"]], [1]]
//! }"#;
//!
//! let visualization = Visualization::from_json(json).unwrap();
//! for step in visualization.snapshots() {
//!     for (file, snapshot) in step.files() {
//!         assert!(file.starts_with("TDStep"));
//!         assert!(snapshot.to_dot().starts_with("strict digraph"));
//!     }
//! }
//! ```
//!
//! ## Core Components
//!
//! - **[`model`]**: tree decompositions, incidence graphs and general graphs.
//! - **[`infer`]**: primal and dual graphs derived from an incidence graph.
//! - **[`timeline`]**: the validated sequence of solver steps.
//! - **[`emphasis`]**: the per-graph emphasis state machine.
//! - **[`snapshot`]**: emitters turning a graph and an emphasis state into DOT.
//! - **[`table`]**: record labels for solution tables.
//! - **[`visualization`]**: the driver wiring everything together.

pub mod config;
pub mod dot;
pub mod emphasis;
pub mod error;
pub mod infer;
pub mod model;
pub mod order;
pub mod snapshot;
pub mod table;
pub mod timeline;
pub mod types;
pub mod utils;
pub mod visualization;
