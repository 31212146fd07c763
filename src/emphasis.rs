//! Per-graph emphasis tracking across the timeline.
//!
//! Each rendered graph owns one [`EmphasisStateMachine`]. Advancing it with the
//! focus of the next step moves elements through
//!
//! ```text
//! Default -> Primary -> Secondary -> Default
//! ```
//!
//! while solution nodes toggle between `Primary` (the active one) and `Suppressed`
//! (every other one that was ever introduced). Elements are generic: tree
//! decompositions use [`TreeElement`](crate::types::TreeElement), the support graphs
//! use plain vertex ids.
//!
//! # Examples
//!
//! ```
//! use tdvisu_rs::emphasis::{Emphasis, EmphasisStateMachine, Focus};
//!
//! let mut machine = EmphasisStateMachine::new();
//! machine.advance(Focus::of([1u32]));
//! let delta = machine.advance(Focus::of([2u32]));
//!
//! assert_eq!(delta.get(&2), Some(Emphasis::Primary));
//! assert_eq!(delta.get(&1), Some(Emphasis::Secondary));
//! ```

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

/// Visual emphasis of one element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Emphasis {
    /// Base styling.
    Default,
    /// Previously focused (or adjacent) element.
    Secondary,
    /// Element of the current step.
    Primary,
    /// Declared but invisible.
    Suppressed,
}

/// What a single step puts into focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Focus<E: Ord> {
    /// Elements emphasised as primary.
    pub primary: BTreeSet<E>,
    /// Solution element shown in this step, if any.
    pub solution: Option<E>,
}

impl<E: Ord> Focus<E> {
    /// A step without focus.
    pub fn none() -> Self {
        Self {
            primary: BTreeSet::new(),
            solution: None,
        }
    }

    pub fn of(primary: impl IntoIterator<Item = E>) -> Self {
        Self {
            primary: primary.into_iter().collect(),
            solution: None,
        }
    }

    pub fn with_solution(mut self, solution: E) -> Self {
        self.solution = Some(solution);
        self
    }
}

impl<E: Ord> Default for Focus<E> {
    fn default() -> Self {
        Self::none()
    }
}

/// Emphasis changes produced by one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDelta<E: Ord> {
    changes: BTreeMap<E, Emphasis>,
}

impl<E: Ord> StyleDelta<E> {
    pub fn get(&self, element: &E) -> Option<Emphasis> {
        self.changes.get(element).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&E, Emphasis)> {
        self.changes.iter().map(|(e, &emphasis)| (e, emphasis))
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Elements set to `emphasis` by this step.
    pub fn with_emphasis(&self, emphasis: Emphasis) -> impl Iterator<Item = &E> {
        self.changes.iter().filter(move |(_, e)| **e == emphasis).map(|(e, _)| e)
    }
}

/// Emphasis bookkeeping after some number of steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmphasisState<E: Ord> {
    current: BTreeSet<E>,
    previous: BTreeSet<E>,
    secondary: BTreeSet<E>,
    active_solution: Option<E>,
    introduced: BTreeSet<E>,
    step: usize,
}

impl<E: Ord + Clone> EmphasisState<E> {
    fn new() -> Self {
        Self {
            current: BTreeSet::new(),
            previous: BTreeSet::new(),
            secondary: BTreeSet::new(),
            active_solution: None,
            introduced: BTreeSet::new(),
            step: 0,
        }
    }

    /// Focus of the latest step.
    pub fn current(&self) -> &BTreeSet<E> {
        &self.current
    }

    /// Focus of the step before.
    pub fn previous(&self) -> &BTreeSet<E> {
        &self.previous
    }

    /// Elements shown with secondary emphasis: previous focus minus current focus.
    pub fn secondary(&self) -> &BTreeSet<E> {
        &self.secondary
    }

    pub fn active_solution(&self) -> Option<&E> {
        self.active_solution.as_ref()
    }

    /// All solution elements introduced so far, the active one included.
    pub fn introduced(&self) -> &BTreeSet<E> {
        &self.introduced
    }

    /// Number of steps taken.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Emphasis of `element` in the current state.
    pub fn emphasis(&self, element: &E) -> Emphasis {
        if self.current.contains(element) || self.active_solution.as_ref() == Some(element) {
            Emphasis::Primary
        } else if self.introduced.contains(element) {
            Emphasis::Suppressed
        } else if self.secondary.contains(element) {
            Emphasis::Secondary
        } else {
            Emphasis::Default
        }
    }
}

/// Ordered emphasis transitions for one graph.
///
/// Steps must be fed in timeline order; the transitions do not commute.
#[derive(Debug, Clone)]
pub struct EmphasisStateMachine<E: Ord> {
    state: EmphasisState<E>,
}

impl<E: Ord + Clone> Default for EmphasisStateMachine<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Ord + Clone> EmphasisStateMachine<E> {
    pub fn new() -> Self {
        Self {
            state: EmphasisState::new(),
        }
    }

    pub fn state(&self) -> &EmphasisState<E> {
        &self.state
    }

    /// Moves to the next step and returns the emphasis changes.
    ///
    /// Every element of the new focus is reported as `Primary`, even when it was
    /// already primary, so repeating a target never drops its emphasis.
    pub fn advance(&mut self, focus: Focus<E>) -> StyleDelta<E> {
        let state = &mut self.state;
        let mut changes = BTreeMap::new();

        let previous = std::mem::replace(&mut state.current, focus.primary);
        let secondary: BTreeSet<E> = previous.difference(&state.current).cloned().collect();

        for element in state.secondary.iter() {
            if !secondary.contains(element) && !state.current.contains(element) {
                changes.insert(element.clone(), Emphasis::Default);
            }
        }
        for element in secondary.iter() {
            changes.insert(element.clone(), Emphasis::Secondary);
        }
        for element in state.current.iter() {
            changes.insert(element.clone(), Emphasis::Primary);
        }

        if state.active_solution != focus.solution {
            if let Some(old) = state.active_solution.take() {
                changes.insert(old, Emphasis::Suppressed);
            }
        }
        if let Some(solution) = focus.solution {
            state.introduced.insert(solution.clone());
            changes.insert(solution.clone(), Emphasis::Primary);
            state.active_solution = Some(solution);
        }

        state.previous = previous;
        state.secondary = secondary;
        state.step += 1;
        debug!("advance: step {}, {} changes", state.step, changes.len());
        StyleDelta { changes }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut machine = EmphasisStateMachine::new();

        let delta = machine.advance(Focus::of([1u32, 2]));
        assert_eq!(delta.with_emphasis(Emphasis::Primary).copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(delta.len(), 2);

        let delta = machine.advance(Focus::of([2u32, 3]));
        assert_eq!(delta.get(&1), Some(Emphasis::Secondary));
        assert_eq!(delta.get(&2), Some(Emphasis::Primary));
        assert_eq!(delta.get(&3), Some(Emphasis::Primary));

        let delta = machine.advance(Focus::of([4u32]));
        assert_eq!(delta.get(&1), Some(Emphasis::Default));
        assert_eq!(delta.get(&2), Some(Emphasis::Secondary));
        assert_eq!(delta.get(&3), Some(Emphasis::Secondary));

        let delta = machine.advance(Focus::none());
        // 1 was demoted once already.
        assert_eq!(delta.get(&1), None);
        assert_eq!(delta.get(&2), Some(Emphasis::Default));
        assert_eq!(delta.get(&4), Some(Emphasis::Secondary));
        assert_eq!(machine.state().step(), 4);
    }

    #[test]
    fn test_same_target_twice() {
        let mut machine = EmphasisStateMachine::new();
        machine.advance(Focus::of(["bag 1"]));
        let delta = machine.advance(Focus::of(["bag 1"]));

        assert_eq!(delta.get(&"bag 1"), Some(Emphasis::Primary));
        assert_eq!(machine.state().emphasis(&"bag 1"), Emphasis::Primary);
        assert!(machine.state().secondary().is_empty());
    }

    #[test]
    fn test_solutions() {
        let mut machine = EmphasisStateMachine::new();
        machine.advance(Focus::of([1u32]).with_solution(101));
        assert_eq!(machine.state().active_solution(), Some(&101));

        let delta = machine.advance(Focus::of([2u32]).with_solution(102));
        assert_eq!(delta.get(&101), Some(Emphasis::Suppressed));
        assert_eq!(delta.get(&102), Some(Emphasis::Primary));

        let delta = machine.advance(Focus::of([3u32]));
        assert_eq!(delta.get(&102), Some(Emphasis::Suppressed));
        assert_eq!(machine.state().active_solution(), None);

        let state = machine.state();
        assert_eq!(state.emphasis(&101), Emphasis::Suppressed);
        assert_eq!(state.emphasis(&102), Emphasis::Suppressed);
        assert_eq!(state.emphasis(&3), Emphasis::Primary);
        assert_eq!(state.emphasis(&2), Emphasis::Secondary);
        assert_eq!(state.emphasis(&7), Emphasis::Default);
        assert_eq!(state.introduced().len(), 2);
    }

    #[test]
    fn test_same_solution_twice() {
        let mut machine = EmphasisStateMachine::new();
        machine.advance(Focus::of([1u32]).with_solution(101));
        let delta = machine.advance(Focus::of([1u32]).with_solution(101));
        assert_eq!(delta.get(&101), Some(Emphasis::Primary));
        assert_eq!(machine.state().emphasis(&101), Emphasis::Primary);
    }
}
