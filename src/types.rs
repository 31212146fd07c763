//! Type-safe identifiers for bags, timeline targets and tree-decomposition elements.
//!
//! Newtype wrappers keep bag ids apart from the plain integer item ids (variables,
//! clauses) that appear in the auxiliary graphs.

use std::fmt;

/// A bag identifier (1-indexed).
///
/// # Invariants
///
/// - Bag IDs must be >= 1
/// - Bag IDs are unique within one tree decomposition
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BagId(u32);

impl BagId {
    /// Creates a new bag id.
    ///
    /// # Panics
    ///
    /// Panics if `id == 0`. Bags must be 1-indexed.
    pub fn new(id: u32) -> Self {
        assert_ne!(id, 0, "Bag IDs must be >= 1");
        BagId(id)
    }

    /// Creates a bag id, or `None` if `id == 0`.
    pub fn try_new(id: u32) -> Option<Self> {
        if id == 0 {
            None
        } else {
            Some(BagId(id))
        }
    }

    /// Returns the raw bag id.
    pub fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<BagId> for u32 {
    fn from(bag: BagId) -> Self {
        bag.0
    }
}

/// What a timeline step points at: one bag, or a synthetic join of two bags.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Target {
    Bag(BagId),
    Join(BagId, BagId),
}

impl Target {
    /// The real bags involved in this target.
    pub fn bags(self) -> impl Iterator<Item = BagId> {
        let (first, second) = match self {
            Target::Bag(bag) => (bag, None),
            Target::Join(left, right) => (left, Some(right)),
        };
        std::iter::once(first).chain(second)
    }

    pub fn is_join(self) -> bool {
        matches!(self, Target::Join(..))
    }

    /// The single bag of a non-join target.
    pub fn as_bag(self) -> Option<BagId> {
        match self {
            Target::Bag(bag) => Some(bag),
            Target::Join(..) => None,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Bag(bag) => write!(f, "{}", bag),
            Target::Join(left, right) => write!(f, "{}~{}", left, right),
        }
    }
}

/// A styleable element of the tree-decomposition snapshot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum TreeElement {
    /// A real bag.
    Bag(BagId),
    /// The synthetic node joining two bags.
    Join(BagId, BagId),
    /// The solution node attached to a target.
    Solution(Target),
}

impl TreeElement {
    /// The node element representing a target itself (bag or join node).
    pub fn of_target(target: Target) -> Self {
        match target {
            Target::Bag(bag) => TreeElement::Bag(bag),
            Target::Join(left, right) => TreeElement::Join(left, right),
        }
    }
}

impl fmt::Display for TreeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeElement::Bag(bag) => write!(f, "bag {}", bag),
            TreeElement::Join(left, right) => write!(f, "join {}~{}", left, right),
            TreeElement::Solution(target) => write!(f, "solution {}", target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bag_creation() {
        let b1 = BagId::new(1);
        let b2 = BagId::new(2);
        assert_eq!(b1.id(), 1);
        assert!(b1 < b2);
        assert_eq!(BagId::try_new(0), None);
        assert_eq!(BagId::try_new(3), Some(BagId::new(3)));
    }

    #[test]
    #[should_panic(expected = "Bag IDs must be >= 1")]
    fn test_bag_zero_panics() {
        BagId::new(0);
    }

    #[test]
    fn test_target_bags() {
        let single = Target::Bag(BagId::new(2));
        assert_eq!(single.bags().collect::<Vec<_>>(), vec![BagId::new(2)]);
        assert_eq!(single.as_bag(), Some(BagId::new(2)));

        let join = Target::Join(BagId::new(3), BagId::new(4));
        assert_eq!(join.bags().collect::<Vec<_>>(), vec![BagId::new(3), BagId::new(4)]);
        assert!(join.is_join());
        assert_eq!(join.as_bag(), None);
        assert_eq!(join.to_string(), "3~4");
    }

    #[test]
    fn test_element_of_target() {
        let join = Target::Join(BagId::new(3), BagId::new(4));
        assert_eq!(TreeElement::of_target(join), TreeElement::Join(BagId::new(3), BagId::new(4)));
        assert_eq!(TreeElement::Solution(join).to_string(), "solution 3~4");
    }
}
