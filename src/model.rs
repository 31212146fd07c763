//! Graph model: tree decompositions, incidence graphs and general graphs.
//!
//! All containers validate their invariants at construction and are immutable
//! afterwards, so every consumer may assume a closed, valid model:
//!
//! - every id used in an edge is declared (no implicit node creation),
//! - the edges of a [`TreeDecomposition`] form a single tree over its bags,
//! - every [`Hyperedge`] of an [`IncidenceGraph`] references at least one item.
//!
//! # Examples
//!
//! ```
//! use tdvisu_rs::model::{Bag, NamingTemplates, TreeDecomposition};
//! use tdvisu_rs::types::BagId;
//!
//! let bags = vec![
//!     Bag::new(BagId::new(1), [1, 2], ["[1, 2]"]),
//!     Bag::new(BagId::new(2), [2, 3], ["[2, 3]"]),
//! ];
//! let edges = vec![(BagId::new(2), BagId::new(1))];
//! let td = TreeDecomposition::new(bags, edges, NamingTemplates::default()).unwrap();
//! assert_eq!(td.len(), 2);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::error::{Result, VisuError};
use crate::order::{order_bags, TreeOrder};

/// Upper bound on `num_vars`: every item up to it becomes a node of each incidence graph.
pub const MAX_NUM_VARS: u32 = 1 << 20;
use crate::types::{BagId, Target};
use crate::utils::fill_template;

/// A node of a tree decomposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bag {
    id: BagId,
    items: BTreeSet<u32>,
    labels: Vec<String>,
}

impl Bag {
    pub fn new<I, L, S>(id: BagId, items: I, labels: L) -> Self
    where
        I: IntoIterator<Item = u32>,
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            items: items.into_iter().collect(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn id(&self) -> BagId {
        self.id
    }

    /// Items (problem variables) contained in the bag, in ascending order.
    pub fn items(&self) -> &BTreeSet<u32> {
        &self.items
    }

    /// Free-text labels rendered below the bag name.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Printf-style templates naming the nodes of a tree-decomposition snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingTemplates {
    /// Bag node name, one placeholder (default: `"bag %s"`).
    pub bag: String,
    /// Join node name, two placeholders (default: `"Join %d~%d"`).
    pub join: String,
    /// Solution node name, one placeholder (default: `"sol%d"`).
    pub solution: String,
    /// Join solution node name, two placeholders (default: `"solJoin%d~%d"`).
    pub join_solution: String,
}

impl Default for NamingTemplates {
    fn default() -> Self {
        Self {
            bag: "bag %s".to_string(),
            join: "Join %d~%d".to_string(),
            solution: "sol%d".to_string(),
            join_solution: "solJoin%d~%d".to_string(),
        }
    }
}

impl NamingTemplates {
    pub fn bag_name(&self, bag: BagId) -> String {
        fill_template(&self.bag, &[&bag])
    }

    /// Name of the node representing `target`: the bag itself or its join node.
    pub fn node_name(&self, target: Target) -> String {
        match target {
            Target::Bag(bag) => self.bag_name(bag),
            Target::Join(left, right) => fill_template(&self.join, &[&left, &right]),
        }
    }

    /// Name of the solution node attached to `target`.
    pub fn solution_name(&self, target: Target) -> String {
        match target {
            Target::Bag(bag) => fill_template(&self.solution, &[&bag]),
            Target::Join(left, right) => fill_template(&self.join_solution, &[&left, &right]),
        }
    }
}

/// A tree decomposition: bags connected by (child, parent) edges forming one tree.
#[derive(Debug, Clone)]
pub struct TreeDecomposition {
    bags: BTreeMap<BagId, Bag>,
    edges: Vec<(BagId, BagId)>,
    naming: NamingTemplates,
    num_vars: u32,
    order: TreeOrder,
}

impl TreeDecomposition {
    /// Builds a decomposition rooted at its smallest bag.
    ///
    /// # Errors
    ///
    /// - [`VisuError::MalformedInput`] on duplicate bag ids, an empty bag set, or an
    ///   edge referencing an undeclared bag.
    /// - [`VisuError::NotATree`] if the edges do not form a single tree.
    pub fn new(bags: Vec<Bag>, edges: Vec<(BagId, BagId)>, naming: NamingTemplates) -> Result<Self> {
        Self::with_options(bags, edges, naming, 0, None)
    }

    /// Builds a decomposition with an item count and an optionally designated root.
    ///
    /// # Errors
    ///
    /// As [`TreeDecomposition::new`], and [`VisuError::MalformedInput`] if
    /// `num_vars` exceeds [`MAX_NUM_VARS`].
    pub fn with_options(
        bags: Vec<Bag>,
        edges: Vec<(BagId, BagId)>,
        naming: NamingTemplates,
        num_vars: u32,
        root: Option<BagId>,
    ) -> Result<Self> {
        debug!("TreeDecomposition::new(bags = {}, edges = {})", bags.len(), edges.len());
        if bags.is_empty() {
            return Err(VisuError::malformed("tree decomposition has no bags"));
        }
        if num_vars > MAX_NUM_VARS {
            return Err(VisuError::malformed(format!(
                "num_vars {} exceeds the limit of {}",
                num_vars, MAX_NUM_VARS
            )));
        }

        let mut map = BTreeMap::new();
        for bag in bags {
            let id = bag.id();
            if map.insert(id, bag).is_some() {
                return Err(VisuError::malformed(format!("bag {} is declared twice", id)));
            }
        }
        for &(child, parent) in edges.iter() {
            for bag in [child, parent] {
                if !map.contains_key(&bag) {
                    return Err(VisuError::dangling_bag(bag));
                }
            }
        }
        if let Some(root) = root {
            if !map.contains_key(&root) {
                return Err(VisuError::malformed(format!("designated root {} is not a bag", root)));
            }
        }

        // Rejects cycles and disconnected bags.
        let ids: BTreeSet<BagId> = map.keys().copied().collect();
        let order = order_bags(&ids, &edges, root)?;
        Ok(Self {
            bags: map,
            edges,
            naming,
            num_vars,
            order,
        })
    }

    pub fn bag(&self, id: BagId) -> Option<&Bag> {
        self.bags.get(&id)
    }

    pub fn contains(&self, id: BagId) -> bool {
        self.bags.contains_key(&id)
    }

    /// Bags in ascending id order.
    pub fn bags(&self) -> impl Iterator<Item = &Bag> {
        self.bags.values()
    }

    pub fn bag_ids(&self) -> impl Iterator<Item = BagId> + '_ {
        self.bags.keys().copied()
    }

    /// Edges as given, `(child, parent)`.
    pub fn edges(&self) -> &[(BagId, BagId)] {
        &self.edges
    }

    pub fn naming(&self) -> &NamingTemplates {
        &self.naming
    }

    /// Number of problem items (variables) the decomposition covers.
    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    /// The root the decomposition is oriented from: the designated one or the
    /// smallest bag id.
    pub fn root(&self) -> BagId {
        self.order.root()
    }

    /// Breadth-first orientation of the tree from [`root`](Self::root).
    pub fn order(&self) -> &TreeOrder {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.bags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bags.is_empty()
    }
}

/// One hyperedge of an incidence graph: an A-node and its signed B-references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperedge {
    id: u32,
    members: Vec<i32>,
}

impl Hyperedge {
    pub fn new(id: u32, members: impl IntoIterator<Item = i32>) -> Self {
        Self {
            id,
            members: members.into_iter().collect(),
        }
    }

    /// The A-node id (e.g. the clause).
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Signed B-references in input order; the sign encodes polarity.
    pub fn members(&self) -> &[i32] {
        &self.members
    }

    /// B-node ids (absolute values), deduplicated and sorted.
    pub fn variables(&self) -> BTreeSet<u32> {
        self.members.iter().map(|m| m.unsigned_abs()).collect()
    }
}

/// Bipartite graph between A-nodes (clauses) and B-nodes (variables).
#[derive(Debug, Clone)]
pub struct IncidenceGraph {
    hyperedges: Vec<Hyperedge>,
}

impl IncidenceGraph {
    /// # Errors
    ///
    /// [`VisuError::MalformedInput`] if a hyperedge is empty, references item `0`, or
    /// reuses an A-id.
    pub fn new(hyperedges: Vec<Hyperedge>) -> Result<Self> {
        debug!("IncidenceGraph::new(hyperedges = {})", hyperedges.len());
        let mut seen = BTreeSet::new();
        for edge in hyperedges.iter() {
            if edge.members.is_empty() {
                return Err(VisuError::malformed(format!("hyperedge {} references no items", edge.id)));
            }
            if edge.members.contains(&0) {
                return Err(VisuError::malformed(format!("hyperedge {} references item 0", edge.id)));
            }
            if !seen.insert(edge.id) {
                return Err(VisuError::malformed(format!("hyperedge {} is declared twice", edge.id)));
            }
        }
        Ok(Self { hyperedges })
    }

    pub fn hyperedges(&self) -> &[Hyperedge] {
        &self.hyperedges
    }

    /// All A-node ids.
    pub fn a_nodes(&self) -> BTreeSet<u32> {
        self.hyperedges.iter().map(|e| e.id).collect()
    }

    /// All referenced B-node ids.
    pub fn b_nodes(&self) -> BTreeSet<u32> {
        self.hyperedges.iter().flat_map(|e| e.members.iter().map(|m| m.unsigned_abs())).collect()
    }
}

/// An undirected simple graph over integer node ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralGraph {
    nodes: BTreeSet<u32>,
    extra_nodes: BTreeSet<u32>,
    edges: BTreeSet<(u32, u32)>,
}

impl GeneralGraph {
    /// Builds a graph from declared nodes, extra (isolated) nodes and edges.
    ///
    /// Edges are undirected; `(a, b)` and `(b, a)` denote the same edge.
    ///
    /// # Errors
    ///
    /// [`VisuError::MalformedInput`] if an edge endpoint is not declared in `nodes` or
    /// `extra_nodes`, or an edge is a self-loop.
    pub fn new(
        nodes: impl IntoIterator<Item = u32>,
        extra_nodes: impl IntoIterator<Item = u32>,
        edges: impl IntoIterator<Item = (u32, u32)>,
    ) -> Result<Self> {
        let nodes: BTreeSet<u32> = nodes.into_iter().collect();
        let extra_nodes: BTreeSet<u32> = extra_nodes.into_iter().collect();
        let mut normalized = BTreeSet::new();
        for (a, b) in edges {
            if a == b {
                return Err(VisuError::malformed(format!("self-loop on node {}", a)));
            }
            for v in [a, b] {
                if !nodes.contains(&v) && !extra_nodes.contains(&v) {
                    return Err(VisuError::malformed(format!("edge ({}, {}) references undeclared node {}", a, b, v)));
                }
            }
            normalized.insert((a.min(b), a.max(b)));
        }
        Ok(Self {
            nodes,
            extra_nodes,
            edges: normalized,
        })
    }

    /// Builds a graph whose node set is taken from the edge endpoints.
    ///
    /// This is the explicit opt-in to implicit node creation.
    pub fn from_edges(
        edges: impl IntoIterator<Item = (u32, u32)>,
        extra_nodes: impl IntoIterator<Item = u32>,
    ) -> Result<Self> {
        let edges: Vec<(u32, u32)> = edges.into_iter().collect();
        let nodes: Vec<u32> = edges.iter().flat_map(|&(a, b)| [a, b]).collect();
        Self::new(nodes, extra_nodes, edges)
    }

    /// Assembles an already validated graph; edges must be `(min, max)` pairs over `nodes`.
    pub(crate) fn from_parts(nodes: BTreeSet<u32>, edges: BTreeSet<(u32, u32)>) -> Self {
        debug_assert!(edges.iter().all(|(a, b)| a < b && nodes.contains(a) && nodes.contains(b)));
        Self {
            nodes,
            extra_nodes: BTreeSet::new(),
            edges,
        }
    }

    /// Every node of the graph (declared and extra), ascending.
    pub fn nodes(&self) -> BTreeSet<u32> {
        self.nodes.union(&self.extra_nodes).copied().collect()
    }

    pub fn extra_nodes(&self) -> &BTreeSet<u32> {
        &self.extra_nodes
    }

    /// Edges as `(min, max)` pairs, ascending.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edges.iter().copied()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes().len()
    }

    pub fn has_edge(&self, a: u32, b: u32) -> bool {
        self.edges.contains(&(a.min(b), a.max(b)))
    }
}
