//! Primal and dual graphs derived from an incidence graph.
//!
//! - **Primal graph**: one node per B-node (variable); two variables are adjacent
//!   whenever they occur together in some hyperedge.
//! - **Dual graph**: one node per A-node (clause); two clauses are adjacent whenever
//!   they share a variable (ignoring polarity).
//!
//! Both are recomputed on every call and hold no state of their own.
//!
//! # Examples
//!
//! ```
//! use tdvisu_rs::infer::infer_primal;
//! use tdvisu_rs::model::{Hyperedge, IncidenceGraph};
//!
//! let incidence = IncidenceGraph::new(vec![
//!     Hyperedge::new(1, [1, 4, 6]),
//!     Hyperedge::new(2, [1, -5]),
//! ])
//! .unwrap();
//!
//! let primal = infer_primal(&incidence);
//! assert_eq!(primal.edges().collect::<Vec<_>>(), vec![(1, 4), (1, 5), (1, 6), (4, 6)]);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::model::{GeneralGraph, IncidenceGraph};

/// Accumulates undirected edges keyed by their smaller endpoint.
#[derive(Debug, Default)]
struct PairIndex {
    adjacency: BTreeMap<u32, BTreeSet<u32>>,
}

impl PairIndex {
    /// Adds the complete graph over `members` (sorted, without duplicates).
    fn add_clique(&mut self, members: &[u32]) {
        for (i, &a) in members.iter().enumerate() {
            let row = self.adjacency.entry(a).or_default();
            row.extend(members[i + 1..].iter().copied());
        }
    }

    fn into_edges(self) -> impl Iterator<Item = (u32, u32)> {
        self.adjacency
            .into_iter()
            .flat_map(|(a, row)| row.into_iter().map(move |b| (a, b)))
    }
}

/// Computes the primal graph of `incidence`.
///
/// Every hyperedge contributes a clique over the absolute values of its members.
/// Pairs go straight into an adjacency index, so each pair is stored once no matter
/// how many hyperedges repeat it. A variable occurring twice in one hyperedge (for
/// example `[1, -1]`) does not produce a self-loop.
pub fn infer_primal(incidence: &IncidenceGraph) -> GeneralGraph {
    let mut index = PairIndex::default();
    for edge in incidence.hyperedges() {
        let members: Vec<u32> = edge.variables().into_iter().collect();
        index.add_clique(&members);
    }
    let nodes = incidence.b_nodes();
    debug!("infer_primal: {} nodes", nodes.len());
    build(nodes, index)
}

/// Computes the dual graph of `incidence`.
///
/// Uses an inverted index from each variable to the hyperedges containing it and
/// connects all hyperedges sharing a posting list, instead of testing every pair of
/// hyperedges for intersection.
pub fn infer_dual(incidence: &IncidenceGraph) -> GeneralGraph {
    let postings = variable_postings(incidence);
    let mut index = PairIndex::default();
    for clauses in postings.values() {
        let members: Vec<u32> = clauses.iter().copied().collect();
        index.add_clique(&members);
    }
    let nodes = incidence.a_nodes();
    debug!("infer_dual: {} nodes, {} postings", nodes.len(), postings.len());
    build(nodes, index)
}

/// Inverted index from each B-node (variable, sign dropped) to the A-nodes
/// (clauses) containing it.
pub fn variable_postings(incidence: &IncidenceGraph) -> BTreeMap<u32, BTreeSet<u32>> {
    let mut postings: BTreeMap<u32, BTreeSet<u32>> = BTreeMap::new();
    for edge in incidence.hyperedges() {
        for var in edge.variables() {
            postings.entry(var).or_default().insert(edge.id());
        }
    }
    postings
}

fn build(nodes: BTreeSet<u32>, index: PairIndex) -> GeneralGraph {
    // Every endpoint comes from `nodes` and cliques are loop-free.
    GeneralGraph::from_parts(nodes, index.into_edges().collect())
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::model::Hyperedge;

    fn incidence(edges: &[(u32, &[i32])]) -> IncidenceGraph {
        IncidenceGraph::new(
            edges
                .iter()
                .map(|&(id, members)| Hyperedge::new(id, members.iter().copied()))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_primal() {
        let graph = incidence(&[(1, &[1, 4, 6]), (2, &[1, -5])]);
        let primal = infer_primal(&graph);

        assert_eq!(primal.edge_count(), 4);
        for (a, b) in [(1, 4), (1, 6), (4, 6), (1, 5)] {
            assert!(primal.has_edge(a, b), "missing edge ({}, {})", a, b);
        }
        assert_eq!(primal.nodes().into_iter().collect::<Vec<_>>(), vec![1, 4, 5, 6]);
    }

    #[test]
    fn test_primal_no_self_loop() {
        let graph = incidence(&[(1, &[1, -1]), (2, &[3])]);
        let primal = infer_primal(&graph);

        assert_eq!(primal.edge_count(), 0);
        assert_eq!(primal.node_count(), 2);
    }

    #[test]
    fn test_dual() {
        let graph = incidence(&[(1, &[1, 4, 6]), (2, &[1, -5]), (3, &[5]), (4, &[7])]);
        let dual = infer_dual(&graph);

        assert_eq!(dual.edges().collect::<Vec<_>>(), vec![(1, 2), (2, 3)]);
        assert_eq!(dual.nodes().into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_postings() {
        let graph = incidence(&[(1, &[1, -2]), (2, &[2, 3])]);
        let postings = variable_postings(&graph);
        assert_eq!(postings[&2].iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(postings[&3].len(), 1);
        assert!(!postings.contains_key(&4));
    }

    #[test]
    fn test_dual_ignores_sign() {
        let graph = incidence(&[(10, &[2]), (20, &[-2])]);
        let dual = infer_dual(&graph);
        assert!(dual.has_edge(10, 20));
    }
}
