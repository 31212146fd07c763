//! Tree validation and deterministic rooted ordering of a tree decomposition.
//!
//! The edge list of a decomposition is read as an undirected graph and traversed
//! breadth-first (uniform-cost search with unit edge weights) from a root: the
//! designated one, or the bag with the smallest id. The traversal doubles as the
//! tree check:
//!
//! - an edge leading to an already reached bag closes a cycle (this includes
//!   duplicated edges and self-loops),
//! - a bag never reached means the edges form a forest.
//!
//! On success the result is a [`TreeOrder`]: BFS order, parent-oriented edges and
//! per-bag depth. Neighbours are expanded in ascending id order so the order is
//! reproducible for equal inputs.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use log::debug;

use crate::error::{Result, VisuError};
use crate::model::TreeDecomposition;
use crate::types::BagId;

/// A validated tree decomposition, oriented away from its root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeOrder {
    root: BagId,
    order: Vec<BagId>,
    parent: BTreeMap<BagId, BagId>,
    depth: BTreeMap<BagId, u32>,
}

impl TreeOrder {
    pub fn root(&self) -> BagId {
        self.root
    }

    /// Bags in breadth-first order from the root.
    pub fn order(&self) -> &[BagId] {
        &self.order
    }

    /// Parent of `bag`, `None` for the root or an unknown bag.
    pub fn parent(&self, bag: BagId) -> Option<BagId> {
        self.parent.get(&bag).copied()
    }

    /// Distance of `bag` from the root.
    pub fn depth(&self, bag: BagId) -> Option<u32> {
        self.depth.get(&bag).copied()
    }

    /// `(child, parent)` edges in breadth-first order of the child.
    pub fn edges(&self) -> Vec<(BagId, BagId)> {
        self.order
            .iter()
            .filter_map(|&bag| self.parent(bag).map(|parent| (bag, parent)))
            .collect()
    }

    /// The unique path from `from` to `to` (both included).
    ///
    /// In a tree this is also the shortest path. Returns `None` if either bag is
    /// not part of the tree.
    pub fn path(&self, from: BagId, to: BagId) -> Option<Vec<BagId>> {
        let mut a = from;
        let mut b = to;
        let mut depth_a = self.depth(a)?;
        let mut depth_b = self.depth(b)?;

        let mut up = vec![a];
        let mut down = vec![b];
        while depth_a > depth_b {
            a = self.parent(a)?;
            depth_a -= 1;
            up.push(a);
        }
        while depth_b > depth_a {
            b = self.parent(b)?;
            depth_b -= 1;
            down.push(b);
        }
        while a != b {
            a = self.parent(a)?;
            b = self.parent(b)?;
            up.push(a);
            down.push(b);
        }
        // Both halves end in the common ancestor.
        down.pop();
        up.extend(down.into_iter().rev());
        Some(up)
    }
}

/// Validates that the decomposition's edges form a tree and orders it from `root`.
///
/// # Errors
///
/// [`VisuError::NotATree`] if the edges contain a cycle (also a duplicate edge or a
/// self-loop) or leave a bag unreached. [`VisuError::MalformedInput`] if `root` or an
/// edge endpoint is not a bag of the decomposition.
pub fn validate_and_order(td: &TreeDecomposition, root: Option<BagId>) -> Result<TreeOrder> {
    let bags: BTreeSet<BagId> = td.bag_ids().collect();
    order_bags(&bags, td.edges(), root)
}

pub(crate) fn order_bags(bags: &BTreeSet<BagId>, edges: &[(BagId, BagId)], root: Option<BagId>) -> Result<TreeOrder> {
    let root = match root.or_else(|| bags.first().copied()) {
        Some(root) => root,
        None => return Err(VisuError::malformed("tree decomposition has no bags")),
    };
    if !bags.contains(&root) {
        return Err(VisuError::malformed(format!("root {} is not a bag", root)));
    }
    debug!("validate_and_order(root = {}, bags = {})", root, bags.len());

    // Adjacency lists carry edge indices so that a revisit through the edge we came
    // from is not mistaken for a cycle, while a duplicated edge is.
    let mut adjacency: BTreeMap<BagId, Vec<(BagId, usize)>> = bags.iter().map(|&b| (b, Vec::new())).collect();
    for (index, &(child, parent)) in edges.iter().enumerate() {
        if child == parent {
            return Err(VisuError::not_a_tree(format!("self-loop on bag {}", child)));
        }
        for (from, to) in [(child, parent), (parent, child)] {
            match adjacency.get_mut(&from) {
                Some(list) => list.push((to, index)),
                None => return Err(VisuError::dangling_bag(from)),
            }
        }
    }
    for list in adjacency.values_mut() {
        list.sort_unstable();
    }

    let mut order = Vec::with_capacity(bags.len());
    let mut parent = BTreeMap::new();
    let mut depth = BTreeMap::new();
    let mut via_edge: BTreeMap<BagId, usize> = BTreeMap::new();
    let mut queue = VecDeque::new();

    depth.insert(root, 0u32);
    queue.push_back(root);
    while let Some(bag) = queue.pop_front() {
        order.push(bag);
        let bag_depth = depth[&bag];
        for &(next, index) in adjacency[&bag].iter() {
            if via_edge.get(&bag) == Some(&index) {
                continue;
            }
            if depth.contains_key(&next) {
                return Err(VisuError::not_a_tree(format!(
                    "edge {}-{} closes a cycle",
                    bag.min(next),
                    bag.max(next)
                )));
            }
            depth.insert(next, bag_depth + 1);
            parent.insert(next, bag);
            via_edge.insert(next, index);
            queue.push_back(next);
        }
    }

    if order.len() != bags.len() {
        let unreached: Vec<String> = bags
            .iter()
            .filter(|b| !depth.contains_key(*b))
            .map(|b| b.to_string())
            .collect();
        return Err(VisuError::not_a_tree(format!(
            "bags [{}] are not connected to root {}",
            unreached.join(", "),
            root
        )));
    }

    Ok(TreeOrder {
        root,
        order,
        parent,
        depth,
    })
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::model::{Bag, NamingTemplates};

    fn tree(ids: &[u32], edges: &[(u32, u32)]) -> TreeDecomposition {
        TreeDecomposition::new(
            ids.iter().map(|&id| Bag::new(BagId::new(id), [], Vec::<String>::new())).collect(),
            edges.iter().map(|&(c, p)| (BagId::new(c), BagId::new(p))).collect(),
            NamingTemplates::default(),
        )
        .unwrap()
    }

    fn ids(bags: &[BagId]) -> Vec<u32> {
        bags.iter().map(|b| b.id()).collect()
    }

    #[test]
    fn test_order_and_depth() {
        // 2 -> 1, 3 -> 2, 4 -> 2, 5 -> 4
        let td = tree(&[1, 2, 3, 4, 5], &[(2, 1), (3, 2), (4, 2), (5, 4)]);
        let order = validate_and_order(&td, None).unwrap();

        assert_eq!(order.root(), BagId::new(1));
        assert_eq!(ids(order.order()), vec![1, 2, 3, 4, 5]);
        assert_eq!(order.depth(BagId::new(1)), Some(0));
        assert_eq!(order.depth(BagId::new(4)), Some(2));
        assert_eq!(order.depth(BagId::new(5)), Some(3));
        assert_eq!(order.parent(BagId::new(5)), Some(BagId::new(4)));
        assert_eq!(order.parent(BagId::new(1)), None);
        assert_eq!(order.edges().len(), 4);
    }

    #[test]
    fn test_designated_root() {
        let td = tree(&[1, 2, 3], &[(2, 1), (3, 1)]);
        let order = validate_and_order(&td, Some(BagId::new(3))).unwrap();

        assert_eq!(order.root(), BagId::new(3));
        assert_eq!(ids(order.order()), vec![3, 1, 2]);
        assert_eq!(order.depth(BagId::new(2)), Some(2));
        assert_eq!(
            order.edges(),
            vec![(BagId::new(1), BagId::new(3)), (BagId::new(2), BagId::new(1))]
        );
    }

    #[test]
    fn test_path() {
        let td = tree(&[1, 2, 3, 4, 5], &[(2, 1), (3, 2), (4, 2), (5, 4)]);
        let order = validate_and_order(&td, None).unwrap();

        assert_eq!(ids(&order.path(BagId::new(3), BagId::new(5)).unwrap()), vec![3, 2, 4, 5]);
        assert_eq!(ids(&order.path(BagId::new(5), BagId::new(1)).unwrap()), vec![5, 4, 2, 1]);
        assert_eq!(ids(&order.path(BagId::new(1), BagId::new(3)).unwrap()), vec![1, 2, 3]);
        assert_eq!(ids(&order.path(BagId::new(4), BagId::new(4)).unwrap()), vec![4]);
        assert_eq!(order.path(BagId::new(4), BagId::new(9)), None);
    }

    #[test]
    fn test_duplicate_edge_is_cycle() {
        let bags = [1, 2].iter().map(|&id| Bag::new(BagId::new(id), [], Vec::<String>::new())).collect();
        let edges = vec![(BagId::new(2), BagId::new(1)), (BagId::new(1), BagId::new(2))];
        let result = TreeDecomposition::new(bags, edges, NamingTemplates::default());
        assert!(matches!(result, Err(VisuError::NotATree { .. })));
    }

    #[test]
    fn test_self_loop() {
        let bags = vec![Bag::new(BagId::new(1), [], Vec::<String>::new())];
        let edges = vec![(BagId::new(1), BagId::new(1))];
        let result = TreeDecomposition::new(bags, edges, NamingTemplates::default());
        assert!(matches!(result, Err(VisuError::NotATree { .. })));
    }
}
