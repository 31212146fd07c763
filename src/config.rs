//! The JSON input document and styling configuration.
//!
//! ```text
//! {
//!   "treeDecJson": { "bagpre": "bag %s", "num_vars": 6, "edgearray": [[2, 1]],
//!                    "labeldict": [{ "id": 1, "items": [1, 2], "labels": ["[1, 2]"] }, ...] },
//!   "tdTimeline": [[1], [2, [[["v1"], [0]], "sol bag 2", "sum: 1", false]]],
//!   "incidenceGraph": { "edges": [{ "id": 1, "list": [1, -2] }], "infer_primal": true },
//!   "generalGraph": false,
//!   "orientation": "BT", "linesmax": 100, ...
//! }
//! ```
//!
//! Every field has the default of the established tool format, so documents
//! written for it keep working. Unknown keys are ignored.

use log::warn;
use serde::{Deserialize, Deserializer};

use crate::error::{Result, VisuError};
use crate::model::{Bag, GeneralGraph, Hyperedge, IncidenceGraph, NamingTemplates, TreeDecomposition};
use crate::table::{Summary, TableLimits};
use crate::timeline::RawStep;
use crate::types::BagId;

/// A value given either as a single object or as a list of objects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
    /// `false` disables the entry.
    Flag(bool),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::Many(values) => values,
            OneOrMany::One(value) => vec![value],
            OneOrMany::Flag(flag) => {
                if flag {
                    warn!("ignoring `true` where a graph description was expected");
                }
                Vec::new()
            }
        }
    }
}

fn one_or_many<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<OneOrMany<T>>::deserialize(deserializer)?
        .map(Vec::from)
        .unwrap_or_default())
}

/// Colors and styles for emphasised elements.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EmphasisConfig {
    pub firstcolor: String,
    pub secondcolor: String,
    pub firststyle: String,
    pub secondstyle: String,
}

impl Default for EmphasisConfig {
    fn default() -> Self {
        Self {
            firstcolor: "yellow".to_string(),
            secondcolor: "green".to_string(),
            firststyle: "filled".to_string(),
            secondstyle: "dotted,filled".to_string(),
        }
    }
}

/// Document-wide styling. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Palette for variables and clause edges of incidence graphs.
    pub colors: Vec<String>,
    /// `rankdir` of the tree decomposition.
    pub orientation: String,
    pub linesmax: i64,
    pub columnsmax: i64,
    /// Base fill color of bags.
    pub bagcolor: String,
    pub fontsize: f64,
    pub penwidth: f64,
    pub fontcolor: String,
    pub emphasis: EmphasisConfig,
    /// Basename of the tree-decomposition snapshots.
    pub td_file: String,
    /// Footer computed for solution tables without a bottom label.
    pub summary: Option<Summary>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        let palette = [
            "#0073a1", "#b14923", "#244320", "#b1740f", "#a682ff", "#004066", "#0d1321", "#da1167", "#604909",
            "#0073a1", "#b14923", "#244320", "#b1740f", "#a682ff",
        ];
        Self {
            colors: palette.iter().map(|c| c.to_string()).collect(),
            orientation: "BT".to_string(),
            linesmax: 100,
            columnsmax: 20,
            bagcolor: "white".to_string(),
            fontsize: 20.0,
            penwidth: 2.2,
            fontcolor: "black".to_string(),
            emphasis: EmphasisConfig::default(),
            td_file: "TDStep".to_string(),
            summary: None,
        }
    }
}

impl StyleConfig {
    pub fn table_limits(&self) -> TableLimits {
        TableLimits {
            lines_max: self.linesmax,
            columns_max: self.columnsmax,
        }
    }
}

fn default_joinpre() -> String {
    "Join %d~%d".to_string()
}

fn default_solpre() -> String {
    "sol%d".to_string()
}

fn default_soljoinpre() -> String {
    "solJoin%d~%d".to_string()
}

/// One bag entry of `labeldict`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelEntry {
    pub id: u32,
    #[serde(default)]
    pub items: Vec<u32>,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// The `treeDecJson` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TreeDecJson {
    pub bagpre: String,
    #[serde(default = "default_joinpre")]
    pub joinpre: String,
    #[serde(default = "default_solpre")]
    pub solpre: String,
    #[serde(default = "default_soljoinpre")]
    pub soljoinpre: String,
    #[serde(default)]
    pub num_vars: u32,
    pub edgearray: Vec<(u32, u32)>,
    pub labeldict: Vec<LabelEntry>,
    #[serde(default)]
    pub root: Option<u32>,
}

impl TreeDecJson {
    /// Builds and validates the tree decomposition.
    pub fn build(&self) -> Result<TreeDecomposition> {
        let bags = self
            .labeldict
            .iter()
            .map(|entry| Ok(Bag::new(bag_id(entry.id)?, entry.items.iter().copied(), entry.labels.iter())))
            .collect::<Result<Vec<_>>>()?;
        let edges = self
            .edgearray
            .iter()
            .map(|&(child, parent)| Ok((bag_id(child)?, bag_id(parent)?)))
            .collect::<Result<Vec<_>>>()?;
        let naming = NamingTemplates {
            bag: self.bagpre.clone(),
            join: self.joinpre.clone(),
            solution: self.solpre.clone(),
            join_solution: self.soljoinpre.clone(),
        };
        let root = self.root.map(bag_id).transpose()?;
        TreeDecomposition::with_options(bags, edges, naming, self.num_vars, root)
    }
}

fn bag_id(id: u32) -> Result<BagId> {
    BagId::try_new(id).ok_or_else(|| VisuError::malformed("bag ids must be >= 1"))
}

/// One hyperedge as given in JSON: `{"id": 1, "list": [1, -4]}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IncidenceEdge {
    pub id: u32,
    pub list: Vec<i32>,
}

/// The `incidenceGraph` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IncidenceGraphConfig {
    pub edges: Vec<IncidenceEdge>,
    /// Cluster label of the A-nodes.
    pub subgraph_name_one: String,
    /// Cluster label of the B-nodes.
    pub subgraph_name_two: String,
    /// Label prefix of the A-nodes.
    pub var_name_one: String,
    /// Label prefix of the B-nodes.
    pub var_name_two: String,
    pub infer_primal: bool,
    pub infer_dual: bool,
    pub primal_file: String,
    pub inc_file: String,
    pub dual_file: String,
    pub fontsize: f64,
    pub penwidth: f64,
    pub second_shape: String,
    pub column_distance: f64,
}

impl Default for IncidenceGraphConfig {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            subgraph_name_one: "clauses".to_string(),
            subgraph_name_two: "variables".to_string(),
            var_name_one: String::new(),
            var_name_two: String::new(),
            infer_primal: false,
            infer_dual: false,
            primal_file: "PrimalGraphStep".to_string(),
            inc_file: "IncidenceGraphStep".to_string(),
            dual_file: "DualGraphStep".to_string(),
            fontsize: 16.0,
            penwidth: 2.2,
            second_shape: "diamond".to_string(),
            column_distance: 0.5,
        }
    }
}

impl IncidenceGraphConfig {
    pub fn build(&self) -> Result<IncidenceGraph> {
        IncidenceGraph::new(
            self.edges
                .iter()
                .map(|edge| Hyperedge::new(edge.id, edge.list.iter().copied()))
                .collect(),
        )
    }
}

/// The `generalGraph` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneralGraphConfig {
    /// Declared nodes. Required unless `implicit_nodes` is set.
    pub nodes: Option<Vec<u32>>,
    pub edges: Vec<(u32, u32)>,
    /// Nodes rendered even if no edge touches them.
    pub extra_nodes: Vec<u32>,
    /// Derive the node set from the edge endpoints.
    pub implicit_nodes: bool,
    pub graph_name: String,
    pub file_basename: String,
    /// Label prefix of the nodes.
    pub var_name: String,
    /// Pin the sorted nodes on a circle.
    pub do_sort_nodes: bool,
    /// Emphasise neighbours of the focus.
    pub do_adj_nodes: bool,
    pub fontsize: f64,
    pub fontcolor: String,
    pub penwidth: f64,
    pub first_color: String,
    pub first_style: String,
    pub second_color: String,
    pub second_style: String,
    pub third_color: String,
}

impl Default for GeneralGraphConfig {
    fn default() -> Self {
        Self {
            nodes: None,
            edges: Vec::new(),
            extra_nodes: Vec::new(),
            implicit_nodes: false,
            graph_name: "graph".to_string(),
            file_basename: "graph".to_string(),
            var_name: String::new(),
            do_sort_nodes: false,
            do_adj_nodes: false,
            fontsize: 20.0,
            fontcolor: "black".to_string(),
            penwidth: 2.2,
            first_color: "yellow".to_string(),
            first_style: "filled".to_string(),
            second_color: "green".to_string(),
            second_style: "dotted,filled".to_string(),
            third_color: "red".to_string(),
        }
    }
}

impl GeneralGraphConfig {
    /// Builds and validates the graph.
    ///
    /// # Errors
    ///
    /// [`VisuError::MalformedInput`] if an edge is a self-loop or has an endpoint
    /// that is neither in `nodes` nor in `extra_nodes` (unless `implicit_nodes`).
    pub fn build(&self) -> Result<GeneralGraph> {
        match (&self.nodes, self.implicit_nodes) {
            (Some(nodes), _) => GeneralGraph::new(
                nodes.iter().copied(),
                self.extra_nodes.iter().copied(),
                self.edges.iter().copied(),
            ),
            (None, true) => GeneralGraph::from_edges(self.edges.iter().copied(), self.extra_nodes.iter().copied()),
            (None, false) => GeneralGraph::new(
                std::iter::empty(),
                self.extra_nodes.iter().copied(),
                self.edges.iter().copied(),
            ),
        }
    }
}

/// The whole input document.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    #[serde(rename = "treeDecJson")]
    pub tree_dec: TreeDecJson,
    #[serde(rename = "tdTimeline")]
    pub(crate) timeline: Vec<RawStep>,
    #[serde(rename = "incidenceGraph", default, deserialize_with = "one_or_many")]
    pub incidence_graphs: Vec<IncidenceGraphConfig>,
    #[serde(rename = "generalGraph", default, deserialize_with = "one_or_many")]
    pub general_graphs: Vec<GeneralGraphConfig>,
    /// Walk the tree between consecutive bags of the timeline.
    #[serde(default)]
    pub intermediate_bags: bool,
    #[serde(flatten)]
    pub style: StyleConfig,
}

impl Document {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
