//! Per-step graph snapshots.
//!
//! An emitter owns the static part of one graph (nodes, edges, labels), computed
//! once, and renders one [`Snapshot`] per timeline step from it:
//!
//! 1. the base description, identical for every step,
//! 2. a styling block restyling the elements the current [`EmphasisState`] singles out.
//!
//! Since every step repeats the full structure, all snapshots of a graph contain the
//! same nodes and edges and a layout engine places them identically; only colors,
//! pen widths and visibility change from frame to frame.
//!
//! Emitters:
//!
//! - [`TreeEmitter`]: the tree decomposition with join and solution nodes,
//! - [`GeneralEmitter`]: any undirected graph (also inferred primal and dual graphs),
//! - [`IncidenceEmitter`]: the bipartite clause/variable graph.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::config::{GeneralGraphConfig, IncidenceGraphConfig, StyleConfig};
use crate::dot::{bag_label, Attrs, GraphKind, Snapshot, Statement};
use crate::emphasis::{Emphasis, EmphasisState, EmphasisStateMachine, Focus};
use crate::error::Result;
use crate::model::{GeneralGraph, IncidenceGraph, NamingTemplates, TreeDecomposition};
use crate::timeline::{Timeline, TimelineStep};
use crate::types::{Target, TreeElement};
use crate::utils::circle_position;

/// Pen width of emphasised tree-decomposition nodes.
const EMPHASIS_PENWIDTH: f64 = 2.5;

/// Distance between neighbouring nodes of a circular pre-layout, in inches.
const CIRCLE_SPACING: f64 = 1.0;

/// What an emitter sees of the step being rendered.
#[derive(Debug, Copy, Clone)]
pub struct StepContext<'a> {
    /// Zero-based position in the timeline.
    pub index: usize,
    pub step: &'a TimelineStep,
    /// Items highlighted in support graphs, see [`support_items`].
    pub items: Option<&'a BTreeSet<u32>>,
}

/// Produces one snapshot per timeline step for one graph.
pub trait SnapshotEmitter {
    /// Element type tracked by the emphasis state machine.
    type Element: Ord + Clone;

    /// Elements this graph puts into focus at the given step.
    fn focus(&self, ctx: &StepContext<'_>) -> Focus<Self::Element>;

    /// Renders the snapshot of the given step in the given emphasis state.
    fn emit(&self, ctx: &StepContext<'_>, state: &EmphasisState<Self::Element>) -> Snapshot;
}

/// Items to highlight in the support graphs at `step`.
///
/// Only single-bag steps carrying a solution table highlight anything: the items
/// of that bag. Plain steps and joins show no focus.
pub fn support_items<'a>(td: &'a TreeDecomposition, step: &TimelineStep) -> Option<&'a BTreeSet<u32>> {
    let bag = step.target().as_bag()?;
    step.table()?;
    td.bag(bag).map(|bag| bag.items())
}

/// Runs a fresh emphasis state machine over `timeline` and collects the snapshots.
pub fn render_timeline<S>(emitter: &S, td: &TreeDecomposition, timeline: &Timeline) -> Vec<Snapshot>
where
    S: SnapshotEmitter + ?Sized,
{
    let mut machine = EmphasisStateMachine::new();
    timeline
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let ctx = StepContext {
                index,
                step,
                items: support_items(td, step),
            };
            let delta = machine.advance(emitter.focus(&ctx));
            debug!("step {}: {} emphasis changes", index + 1, delta.len());
            emitter.emit(&ctx, machine.state())
        })
        .collect()
}

/// Snapshots of the tree decomposition.
#[derive(Debug, Clone)]
pub struct TreeEmitter {
    naming: NamingTemplates,
    base: Snapshot,
    /// Targets with a solution node, in order of first appearance.
    solutions: Vec<Target>,
    /// Formatted table of each step, if it has one.
    labels: Vec<Option<String>>,
    first_color: String,
    second_color: String,
}

impl TreeEmitter {
    /// Builds the static part of the tree-decomposition snapshots.
    ///
    /// Declares, in this order: bags (breadth-first from the root), tree edges,
    /// join nodes with their edges, and the solution node of every target that
    /// carries a table anywhere in the timeline.
    ///
    /// # Errors
    ///
    /// [`VisuError::TableShape`](crate::error::VisuError::TableShape) if a
    /// solution table is jagged.
    pub fn new(td: &TreeDecomposition, timeline: &Timeline, style: &StyleConfig) -> Result<Self> {
        let naming = td.naming().clone();
        let limits = style.table_limits();
        let labels = timeline
            .iter()
            .map(|step| step.table().map(|table| table.format(limits)).transpose())
            .collect::<Result<Vec<_>>>()?;

        let mut base = Snapshot::new(GraphKind::Digraph, "Tree-Decomposition").strict(true);
        base.graph_attrs(Attrs::new().with("rankdir", &style.orientation));
        base.node_defaults(
            Attrs::new()
                .with("shape", "box")
                .with("fillcolor", &style.bagcolor)
                .with("style", "rounded,filled")
                .with("margin", "0.11,0.01"),
        );

        for &id in td.order().order() {
            if let Some(bag) = td.bag(id) {
                let name = naming.bag_name(id);
                let label = bag_label(&name, bag.labels(), &style.bagcolor);
                base.node(name, Attrs::new().with("label", label));
            }
        }
        for (child, parent) in td.order().edges() {
            base.edge(naming.bag_name(child), naming.bag_name(parent), Attrs::new());
        }

        for join in timeline.joins() {
            let join_name = naming.node_name(join.target());
            let successor = join.successor.map(|target| naming.node_name(target));
            base.node(&join_name, Attrs::new());
            for child in [join.left, join.right] {
                let child_name = naming.bag_name(child);
                if let Some(successor) = &successor {
                    base.edge(
                        &child_name,
                        successor,
                        Attrs::new().with("style", "invis").with("constraint", "false"),
                    );
                }
                base.edge(child_name, &join_name, Attrs::new());
            }
            if let Some(successor) = successor {
                base.edge(&join_name, successor, Attrs::new());
            }
        }

        let mut solutions: Vec<Target> = Vec::new();
        for (target, table) in timeline.solutions() {
            let solution = naming.solution_name(target);
            base.node(&solution, Attrs::new().with("label", table.format(limits)?).with("shape", "record"));
            base.edge(naming.node_name(target), solution, Attrs::new());
            solutions.push(target);
        }
        debug!(
            "TreeEmitter::new: {} bags, {} solution nodes",
            td.len(),
            solutions.len()
        );

        Ok(Self {
            naming,
            base,
            solutions,
            labels,
            first_color: style.emphasis.firstcolor.clone(),
            second_color: style.emphasis.secondcolor.clone(),
        })
    }

    fn node_name(&self, element: &TreeElement) -> Option<String> {
        match *element {
            TreeElement::Bag(bag) => Some(self.naming.bag_name(bag)),
            TreeElement::Join(left, right) => Some(self.naming.node_name(Target::Join(left, right))),
            TreeElement::Solution(_) => None,
        }
    }
}

impl SnapshotEmitter for TreeEmitter {
    type Element = TreeElement;

    /// The bag, or both joined bags plus the join node; the solution node if the
    /// step carries a table.
    fn focus(&self, ctx: &StepContext<'_>) -> Focus<TreeElement> {
        let target = ctx.step.target();
        let mut focus = Focus::of(target.bags().map(TreeElement::Bag));
        if target.is_join() {
            focus.primary.insert(TreeElement::of_target(target));
        }
        if ctx.step.table().is_some() {
            focus = focus.with_solution(TreeElement::Solution(target));
        }
        focus
    }

    fn emit(&self, ctx: &StepContext<'_>, state: &EmphasisState<TreeElement>) -> Snapshot {
        let mut snapshot = self.base.clone();

        for element in state.current().iter() {
            if let Some(name) = self.node_name(element) {
                snapshot.node(
                    name,
                    Attrs::new()
                        .with("fillcolor", &self.first_color)
                        .with("penwidth", EMPHASIS_PENWIDTH),
                );
            }
        }
        for element in state.secondary().iter() {
            if state.emphasis(element) != Emphasis::Secondary {
                continue;
            }
            if let Some(name) = self.node_name(element) {
                snapshot.node(
                    name,
                    Attrs::new()
                        .with("color", &self.second_color)
                        .with("penwidth", EMPHASIS_PENWIDTH),
                );
            }
        }

        // Solution edges are emitted a second time: visible for the active
        // solution, invisible for all others.
        for &target in self.solutions.iter() {
            let solution = self.naming.solution_name(target);
            let anchor = self.naming.node_name(target);
            if state.emphasis(&TreeElement::Solution(target)) == Emphasis::Primary {
                let mut attrs = Attrs::new()
                    .with("fillcolor", &self.first_color)
                    .with("penwidth", EMPHASIS_PENWIDTH);
                if ctx.step.target() == target {
                    if let Some(Some(label)) = self.labels.get(ctx.index) {
                        attrs.set("label", label);
                    }
                }
                snapshot.node(&solution, attrs);
                snapshot.edge(anchor, solution, Attrs::new().with("style", "solid"));
            } else {
                snapshot.node(&solution, Attrs::new().with("style", "invis"));
                snapshot.edge(anchor, solution, Attrs::new().with("style", "invis"));
            }
        }
        snapshot
    }
}

/// Styling of a [`GeneralEmitter`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralStyle {
    pub graph_name: String,
    /// Prefix of the node names.
    pub var_name: String,
    pub fontsize: f64,
    pub fontcolor: String,
    pub penwidth: f64,
    /// Fill of focused nodes.
    pub first_color: String,
    pub first_style: String,
    /// Border of adjacent and previously focused nodes.
    pub second_color: String,
    pub second_style: String,
    /// Edges between focused nodes.
    pub third_color: String,
    pub do_sort_nodes: bool,
    pub do_adj_nodes: bool,
}

impl GeneralStyle {
    /// Style of a graph inferred from an incidence graph: sorted circular layout
    /// and adjacent nodes shown.
    pub fn inferred(graph_name: &str, var_name: &str, style: &StyleConfig) -> Self {
        Self {
            graph_name: graph_name.to_string(),
            var_name: var_name.to_string(),
            fontsize: style.fontsize,
            fontcolor: style.fontcolor.clone(),
            penwidth: style.penwidth,
            first_color: style.emphasis.firstcolor.clone(),
            first_style: style.emphasis.firststyle.clone(),
            second_color: style.emphasis.secondcolor.clone(),
            second_style: style.emphasis.secondstyle.clone(),
            third_color: "red".to_string(),
            do_sort_nodes: true,
            do_adj_nodes: true,
        }
    }
}

impl From<&GeneralGraphConfig> for GeneralStyle {
    fn from(config: &GeneralGraphConfig) -> Self {
        Self {
            graph_name: config.graph_name.clone(),
            var_name: config.var_name.clone(),
            fontsize: config.fontsize,
            fontcolor: config.fontcolor.clone(),
            penwidth: config.penwidth,
            first_color: config.first_color.clone(),
            first_style: config.first_style.clone(),
            second_color: config.second_color.clone(),
            second_style: config.second_style.clone(),
            third_color: config.third_color.clone(),
            do_sort_nodes: config.do_sort_nodes,
            do_adj_nodes: config.do_adj_nodes,
        }
    }
}

/// Snapshots of an undirected graph.
#[derive(Debug, Clone)]
pub struct GeneralEmitter {
    graph: GeneralGraph,
    style: GeneralStyle,
    focus_index: Option<BTreeMap<u32, BTreeSet<u32>>>,
    base: Snapshot,
}

impl GeneralEmitter {
    pub fn new(graph: GeneralGraph, style: GeneralStyle) -> Self {
        let nodes = graph.nodes();
        let layout = if style.do_sort_nodes { "neato" } else { "sfdp" };

        let mut base = Snapshot::new(GraphKind::Graph, &style.graph_name).strict(true);
        base.graph_attrs(
            Attrs::new()
                .with("K", "2")
                .with("fontsize", style.fontsize)
                .with("layout", layout)
                .with("outputorder", "edgesfirst")
                .with("overlap", "false"),
        );
        base.node_defaults(
            Attrs::new()
                .with("fontcolor", &style.fontcolor)
                .with("penwidth", style.penwidth)
                .with("style", "filled")
                .with("fillcolor", "white"),
        );
        for (i, &id) in nodes.iter().enumerate() {
            let mut attrs = Attrs::new();
            if style.do_sort_nodes {
                let (x, y) = circle_position(i, nodes.len(), CIRCLE_SPACING);
                attrs.set("pos", format!("{},{}!", x, y));
            }
            base.node(format!("{}{}", style.var_name, id), attrs);
        }
        for (a, b) in graph.edges() {
            base.edge(
                format!("{}{}", style.var_name, a),
                format!("{}{}", style.var_name, b),
                Attrs::new(),
            );
        }

        Self {
            graph,
            style,
            focus_index: None,
            base,
        }
    }

    /// Translates support items through `index` before focusing, for graphs whose
    /// nodes are not items themselves (the dual graph maps each variable to the
    /// clauses containing it).
    pub fn with_focus_index(mut self, index: BTreeMap<u32, BTreeSet<u32>>) -> Self {
        self.focus_index = Some(index);
        self
    }

    pub fn graph(&self) -> &GeneralGraph {
        &self.graph
    }

    fn name(&self, id: u32) -> String {
        format!("{}{}", self.style.var_name, id)
    }
}

impl SnapshotEmitter for GeneralEmitter {
    type Element = u32;

    fn focus(&self, ctx: &StepContext<'_>) -> Focus<u32> {
        let items = match ctx.items {
            Some(items) => items,
            None => return Focus::none(),
        };
        let nodes = self.graph.nodes();
        let focused: BTreeSet<u32> = match &self.focus_index {
            Some(index) => items.iter().filter_map(|item| index.get(item)).flatten().copied().collect(),
            None => items.clone(),
        };
        Focus::of(focused.intersection(&nodes).copied())
    }

    fn emit(&self, _ctx: &StepContext<'_>, state: &EmphasisState<u32>) -> Snapshot {
        let mut snapshot = self.base.clone();
        let current = state.current();
        let style = &self.style;

        for &id in current.iter() {
            snapshot.node(
                self.name(id),
                Attrs::new()
                    .with("fillcolor", &style.first_color)
                    .with("style", &style.first_style),
            );
        }

        let mut secondary: BTreeSet<u32> = state.secondary().clone();
        for (a, b) in self.graph.edges() {
            match (current.contains(&a), current.contains(&b)) {
                (true, true) => snapshot.edge(
                    self.name(a),
                    self.name(b),
                    Attrs::new()
                        .with("color", &style.third_color)
                        .with("penwidth", style.penwidth),
                ),
                (true, false) if style.do_adj_nodes => {
                    secondary.insert(b);
                }
                (false, true) if style.do_adj_nodes => {
                    secondary.insert(a);
                }
                _ => {}
            }
        }
        for &id in secondary.difference(current) {
            snapshot.node(
                self.name(id),
                Attrs::new()
                    .with("color", &style.second_color)
                    .with("style", &style.second_style),
            );
        }
        snapshot
    }
}

/// Snapshots of an incidence graph: clauses and variables in two clusters.
#[derive(Debug, Clone)]
pub struct IncidenceEmitter {
    graph: IncidenceGraph,
    variables: BTreeSet<u32>,
    colors: Vec<String>,
    penwidth: f64,
    first_color: String,
    second_color: String,
    base: Snapshot,
}

impl IncidenceEmitter {
    /// Builds the static part of the incidence snapshots.
    ///
    /// Variables `1..=num_vars` are drawn even if no clause references them.
    pub fn new(graph: IncidenceGraph, config: &IncidenceGraphConfig, style: &StyleConfig, num_vars: u32) -> Self {
        let mut variables = graph.b_nodes();
        variables.extend(1..=num_vars);

        let mut base = Snapshot::new(GraphKind::Graph, &config.inc_file).strict(true);
        base.graph_attrs(
            Attrs::new()
                .with("splines", "false")
                .with("ranksep", "0.2")
                .with("nodesep", config.column_distance)
                .with("fontsize", config.fontsize.trunc())
                .with("compound", "true"),
        );
        base.edge_defaults(
            Attrs::new()
                .with("penwidth", config.penwidth)
                .with("dir", "back")
                .with("arrowtail", "none"),
        );

        let clause_ids: Vec<u32> = graph.a_nodes().into_iter().collect();
        let mut clauses = base_cluster(&config.subgraph_name_one);
        clauses.insert(
            1,
            Statement::NodeDefaults(
                Attrs::new()
                    .with("style", "rounded,filled")
                    .with("fillcolor", &style.bagcolor),
            ),
        );
        for &id in clause_ids.iter() {
            clauses.push(Statement::Node {
                id: clause_node(id),
                attrs: Attrs::new().with("label", format!("{}{}", config.var_name_one, id)),
            });
        }
        chain(&mut clauses, clause_ids.iter().map(|&id| clause_node(id)));
        base.subgraph("cluster_clause", clauses);

        base.node_defaults(
            Attrs::new()
                .with("shape", &config.second_shape)
                .with("fontcolor", "black")
                .with("penwidth", config.penwidth)
                .with("style", "dotted"),
        );
        let mut vars = base_cluster(&config.subgraph_name_two);
        for &id in variables.iter() {
            let mut attrs = Attrs::new().with("label", format!("{}{}", config.var_name_two, id));
            if let Some(color) = palette(&style.colors, id) {
                attrs.set("color", color);
            }
            vars.push(Statement::Node {
                id: variable_node(id),
                attrs,
            });
        }
        chain(&mut vars, variables.iter().map(|&id| variable_node(id)));
        base.subgraph("cluster_ivar", vars);

        base.edge_defaults(Attrs::new().with("constraint", "false"));
        for edge in graph.hyperedges() {
            for &member in edge.members() {
                base.edge(
                    clause_node(edge.id()),
                    variable_node(member.unsigned_abs()),
                    member_attrs(&style.colors, member),
                );
            }
        }

        Self {
            graph,
            variables,
            colors: style.colors.clone(),
            penwidth: config.penwidth,
            first_color: style.emphasis.firstcolor.clone(),
            second_color: style.emphasis.secondcolor.clone(),
            base,
        }
    }
}

impl SnapshotEmitter for IncidenceEmitter {
    type Element = u32;

    fn focus(&self, ctx: &StepContext<'_>) -> Focus<u32> {
        match ctx.items {
            Some(items) => Focus::of(items.intersection(&self.variables).copied()),
            None => Focus::none(),
        }
    }

    /// Clauses containing a focused variable are filled, together with all their
    /// variables (solid border for focused ones, dotted for the others). Edges of
    /// those clauses are solid, all other edges dotted.
    fn emit(&self, _ctx: &StepContext<'_>, state: &EmphasisState<u32>) -> Snapshot {
        let mut snapshot = self.base.clone();
        let current = state.current();

        let touched: Vec<_> = self
            .graph
            .hyperedges()
            .iter()
            .filter(|edge| edge.variables().iter().any(|v| current.contains(v)))
            .collect();
        let touched_ids: BTreeSet<u32> = touched.iter().map(|edge| edge.id()).collect();
        let context: BTreeSet<u32> = touched.iter().flat_map(|edge| edge.variables()).collect();

        for &var in context.iter() {
            let style = if current.contains(&var) { "solid,filled" } else { "dotted,filled" };
            snapshot.node(
                variable_node(var),
                Attrs::new().with("style", style).with("fillcolor", &self.first_color),
            );
        }
        for &clause in touched_ids.iter() {
            snapshot.node(clause_node(clause), Attrs::new().with("fillcolor", &self.first_color));
        }
        for &var in state.secondary().difference(&context) {
            snapshot.node(
                variable_node(var),
                Attrs::new()
                    .with("style", "dotted,filled")
                    .with("fillcolor", &self.second_color),
            );
        }

        if !current.is_empty() {
            for edge in self.graph.hyperedges() {
                let style = if touched_ids.contains(&edge.id()) { "solid" } else { "dotted" };
                for &member in edge.members() {
                    snapshot.edge(
                        clause_node(edge.id()),
                        variable_node(member.unsigned_abs()),
                        member_attrs(&self.colors, member)
                            .with("style", style)
                            .with("penwidth", self.penwidth),
                    );
                }
            }
        }
        snapshot
    }
}

fn clause_node(id: u32) -> String {
    format!("c{}", id)
}

fn variable_node(id: u32) -> String {
    format!("v{}", id)
}

fn palette(colors: &[String], id: u32) -> Option<&str> {
    if colors.is_empty() {
        None
    } else {
        Some(colors[id as usize % colors.len()].as_str())
    }
}

/// Edge between a clause and one of its (signed) members: colored by variable,
/// with a hollow tail for negated members.
fn member_attrs(colors: &[String], member: i32) -> Attrs {
    let mut attrs = Attrs::new();
    if let Some(color) = palette(colors, member.unsigned_abs()) {
        attrs.set("color", color);
    }
    if member < 0 {
        attrs.set("arrowtail", "odot");
    }
    attrs
}

/// Statements opening a cluster: its label and invisible edges.
fn base_cluster(label: &str) -> Vec<Statement> {
    vec![
        Statement::GraphAttrs(Attrs::new().with("label", label)),
        Statement::EdgeDefaults(Attrs::new().with("style", "invis")),
    ]
}

/// Invisible edges between consecutive nodes, keeping a cluster in one column.
fn chain(statements: &mut Vec<Statement>, nodes: impl Iterator<Item = String>) {
    let nodes: Vec<String> = nodes.collect();
    for pair in nodes.windows(2) {
        statements.push(Statement::Edge {
            from: pair[0].clone(),
            to: pair[1].clone(),
            attrs: Attrs::new(),
        });
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::model::{Bag, Hyperedge};
    use crate::table::{Cell, SolutionTable};
    use crate::types::BagId;

    fn bag(id: u32) -> Target {
        Target::Bag(BagId::new(id))
    }

    fn tree(edges: &[(u32, u32)], n: u32) -> TreeDecomposition {
        let bags = (1..=n)
            .map(|id| Bag::new(BagId::new(id), [id, id + 1], [format!("[{}, {}]", id, id + 1)]))
            .collect();
        let edges = edges.iter().map(|&(a, b)| (BagId::new(a), BagId::new(b))).collect();
        TreeDecomposition::new(bags, edges, NamingTemplates::default()).unwrap()
    }

    fn table(value: i64, top: &str) -> SolutionTable {
        SolutionTable::new(vec![vec![Cell::from(value)]]).with_top(top)
    }

    /// Advances a fresh machine through `items` and returns the last snapshot.
    fn run<S: SnapshotEmitter<Element = u32>>(emitter: &S, items: &[&[u32]]) -> Snapshot {
        let step = TimelineStep::new(bag(1));
        let mut machine = EmphasisStateMachine::new();
        let mut last = None;
        for (index, items) in items.iter().enumerate() {
            let items: BTreeSet<u32> = items.iter().copied().collect();
            let ctx = StepContext {
                index,
                step: &step,
                items: Some(&items),
            };
            machine.advance(emitter.focus(&ctx));
            last = Some(emitter.emit(&ctx, machine.state()));
        }
        last.unwrap()
    }

    #[test]
    fn test_support_items() {
        let td = tree(&[(2, 1)], 2);
        assert_eq!(support_items(&td, &TimelineStep::new(bag(2))), None);
        let step = TimelineStep::with_table(bag(2), table(1, "t"));
        assert_eq!(support_items(&td, &step), Some(&BTreeSet::from([2, 3])));
        let join = TimelineStep::with_table(Target::Join(BagId::new(1), BagId::new(2)), table(1, "t"));
        assert_eq!(support_items(&td, &join), None);
    }

    #[test]
    fn test_tree_snapshots() {
        // 1 <- 2 <- 3
        let td = tree(&[(2, 1), (3, 2)], 3);
        let steps = vec![
            TimelineStep::new(bag(1)),
            TimelineStep::with_table(bag(2), table(7, "sol bag 2")),
            TimelineStep::new(bag(3)),
        ];
        let timeline = Timeline::new(steps, &td).unwrap();
        let emitter = TreeEmitter::new(&td, &timeline, &StyleConfig::default()).unwrap();
        let snapshots = render_timeline(&emitter, &td, &timeline);
        assert_eq!(snapshots.len(), 3);

        // Same structure in every frame.
        for snapshot in snapshots.iter() {
            assert_eq!(snapshot.node_ids(), vec!["bag 1", "bag 2", "bag 3", "sol2"]);
            assert!(snapshot.has_edge("bag 2", "bag 1"));
            assert!(snapshot.has_edge("bag 2", "sol2"));
            assert!(snapshot.is_strict());
        }

        let first = &snapshots[0];
        assert_eq!(first.node_attrs("bag 1").get("fillcolor"), Some("yellow"));
        assert_eq!(first.node_attrs("sol2").get("style"), Some("invis"));
        assert_eq!(first.edge_attrs("bag 2", "sol2").get("style"), Some("invis"));

        let second = &snapshots[1];
        assert_eq!(second.node_attrs("bag 2").get("fillcolor"), Some("yellow"));
        assert_eq!(second.node_attrs("bag 1").get("color"), Some("green"));
        assert_eq!(second.node_attrs("sol2").get("label"), Some("{sol bag 2|{{7}}}"));
        assert_eq!(second.node_attrs("sol2").get("style"), None);
        assert_eq!(second.edge_attrs("bag 2", "sol2").get("style"), Some("solid"));

        let third = &snapshots[2];
        assert_eq!(third.node_attrs("bag 3").get("fillcolor"), Some("yellow"));
        assert_eq!(third.node_attrs("bag 2").get("color"), Some("green"));
        assert_eq!(third.node_attrs("bag 1").get("color"), None);
        assert_eq!(third.node_attrs("sol2").get("style"), Some("invis"));
    }

    #[test]
    fn test_tree_join() {
        // 3 and 4 both hang below 2.
        let td = tree(&[(2, 1), (3, 2), (4, 2)], 4);
        let join = Target::Join(BagId::new(3), BagId::new(4));
        let steps = vec![
            TimelineStep::new(bag(3)),
            TimelineStep::new(bag(4)),
            TimelineStep::with_table(join, table(2, "sol Join 3~4")),
            TimelineStep::new(bag(2)),
        ];
        let timeline = Timeline::new(steps, &td).unwrap();
        let emitter = TreeEmitter::new(&td, &timeline, &StyleConfig::default()).unwrap();
        let snapshots = render_timeline(&emitter, &td, &timeline);

        let base = &snapshots[0];
        assert!(base.has_node("Join 3~4"));
        assert!(base.has_edge("bag 3", "Join 3~4"));
        assert!(base.has_edge("bag 4", "Join 3~4"));
        assert!(base.has_edge("Join 3~4", "bag 2"));
        let bypass = base.edge_attrs("bag 3", "bag 2");
        assert_eq!(bypass.get("style"), Some("invis"));
        assert_eq!(bypass.get("constraint"), Some("false"));
        assert!(base.has_edge("Join 3~4", "solJoin3~4"));

        let joined = &snapshots[2];
        for node in ["bag 3", "bag 4", "Join 3~4", "solJoin3~4"] {
            assert_eq!(joined.node_attrs(node).get("fillcolor"), Some("yellow"), "{}", node);
        }

        let after = &snapshots[3];
        assert_eq!(after.node_attrs("bag 2").get("fillcolor"), Some("yellow"));
        assert_eq!(after.node_attrs("Join 3~4").get("color"), Some("green"));
        assert_eq!(after.node_attrs("solJoin3~4").get("style"), Some("invis"));
    }

    fn path_graph() -> GeneralEmitter {
        let graph = GeneralGraph::new(1..=4, [], [(1, 2), (2, 3), (3, 4)]).unwrap();
        let config = GeneralGraphConfig {
            do_sort_nodes: true,
            do_adj_nodes: true,
            ..GeneralGraphConfig::default()
        };
        GeneralEmitter::new(graph, GeneralStyle::from(&config))
    }

    #[test]
    fn test_general_base() {
        let emitter = path_graph();
        let snapshot = run(&emitter, &[&[]]);
        assert_eq!(snapshot.kind(), GraphKind::Graph);
        assert_eq!(snapshot.node_ids(), vec!["1", "2", "3", "4"]);
        assert_eq!(snapshot.node_attrs("1").get("pos"), Some("0,1!"));
        assert_eq!(snapshot.node_attrs("2").get("pos"), Some("1,0!"));
        assert!(snapshot.to_dot().contains("layout=\"neato\""));
    }

    #[test]
    fn test_general_emphasis() {
        let emitter = path_graph();

        let snapshot = run(&emitter, &[&[1, 2, 9]]);
        assert_eq!(snapshot.node_attrs("1").get("fillcolor"), Some("yellow"));
        assert_eq!(snapshot.node_attrs("2").get("style"), Some("filled"));
        assert_eq!(snapshot.edge_attrs("2", "1").get("color"), Some("red"));
        assert_eq!(snapshot.node_attrs("3").get("color"), Some("green"));
        assert_eq!(snapshot.node_attrs("3").get("style"), Some("dotted,filled"));
        assert!(snapshot.node_attrs("4").get("color").is_none());
        assert!(!snapshot.has_node("9"));

        let snapshot = run(&emitter, &[&[1, 2], &[4]]);
        assert_eq!(snapshot.node_attrs("4").get("fillcolor"), Some("yellow"));
        assert_eq!(snapshot.node_attrs("1").get("color"), Some("green"));
        assert_eq!(snapshot.node_attrs("3").get("color"), Some("green"));
        assert!(snapshot.edge_attrs("1", "2").get("color").is_none());
    }

    #[test]
    fn test_general_focus_index() {
        let graph = GeneralGraph::new([10, 11, 12], [], [(10, 11)]).unwrap();
        let emitter = GeneralEmitter::new(graph, GeneralStyle::from(&GeneralGraphConfig::default()))
            .with_focus_index(BTreeMap::from([(1, BTreeSet::from([10, 11]))]));

        let snapshot = run(&emitter, &[&[1, 2]]);
        assert_eq!(snapshot.node_attrs("10").get("fillcolor"), Some("yellow"));
        assert_eq!(snapshot.node_attrs("11").get("fillcolor"), Some("yellow"));
        assert!(snapshot.node_attrs("12").get("fillcolor").is_none());
        assert!(snapshot.node_attrs("10").get("pos").is_none());
    }

    fn incidence() -> IncidenceEmitter {
        let graph = IncidenceGraph::new(vec![Hyperedge::new(1, [1, -2]), Hyperedge::new(2, [2, 3])]).unwrap();
        let config = IncidenceGraphConfig {
            var_name_one: "c".to_string(),
            var_name_two: "v".to_string(),
            ..IncidenceGraphConfig::default()
        };
        IncidenceEmitter::new(graph, &config, &StyleConfig::default(), 4)
    }

    #[test]
    fn test_incidence_base() {
        let snapshot = run(&incidence(), &[&[]]);
        assert_eq!(snapshot.node_ids(), vec!["c1", "c2", "v1", "v2", "v3", "v4"]);
        assert_eq!(snapshot.node_attrs("v4").get("label"), Some("v4"));
        assert_eq!(snapshot.node_attrs("c2").get("label"), Some("c2"));
        assert_eq!(snapshot.edge_attrs("c1", "v2").get("arrowtail"), Some("odot"));
        assert!(snapshot.edge_attrs("c1", "v1").get("arrowtail").is_none());
        assert_eq!(snapshot.edge_attrs("c2", "v3").get("color"), Some("#b1740f"));
        // Cluster ordering edges.
        assert!(snapshot.has_edge("c1", "c2"));
        assert!(snapshot.has_edge("v3", "v4"));
        assert!(snapshot.edge_attrs("c1", "v1").get("style").is_none());
    }

    #[test]
    fn test_incidence_emphasis() {
        let emitter = incidence();

        let snapshot = run(&emitter, &[&[1]]);
        assert_eq!(snapshot.node_attrs("c1").get("fillcolor"), Some("yellow"));
        assert!(snapshot.node_attrs("c2").get("fillcolor").is_none());
        assert_eq!(snapshot.node_attrs("v1").get("style"), Some("solid,filled"));
        assert_eq!(snapshot.node_attrs("v2").get("style"), Some("dotted,filled"));
        assert_eq!(snapshot.edge_attrs("c1", "v2").get("style"), Some("solid"));
        assert_eq!(snapshot.edge_attrs("c1", "v2").get("arrowtail"), Some("odot"));
        assert_eq!(snapshot.edge_attrs("c2", "v3").get("style"), Some("dotted"));

        let snapshot = run(&emitter, &[&[1], &[3]]);
        assert_eq!(snapshot.node_attrs("c2").get("fillcolor"), Some("yellow"));
        assert_eq!(snapshot.node_attrs("v1").get("fillcolor"), Some("green"));
        assert_eq!(snapshot.edge_attrs("c1", "v1").get("style"), Some("dotted"));
    }
}
