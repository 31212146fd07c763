//! The ordered list of solver steps driving every snapshot.
//!
//! In JSON a step is `[target]` or `[target, [table, top, bottom, transpose]]`,
//! where `target` is a bag id (`1`, also accepted as `[1]`) or a pair of bag ids
//! for a join (`[3, 4]`). The trailing table fields are optional.

use log::{debug, warn};
use serde::Deserialize;

use crate::error::{Result, VisuError};
use crate::model::TreeDecomposition;
use crate::order::TreeOrder;
use crate::table::{Cell, SolutionTable};
use crate::types::{BagId, Target};

/// One entry of the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineStep {
    target: Target,
    table: Option<SolutionTable>,
}

impl TimelineStep {
    pub fn new(target: Target) -> Self {
        Self { target, table: None }
    }

    pub fn with_table(target: Target, table: SolutionTable) -> Self {
        Self {
            target,
            table: Some(table),
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn table(&self) -> Option<&SolutionTable> {
        self.table.as_ref()
    }

    pub(crate) fn table_mut(&mut self) -> Option<&mut SolutionTable> {
        self.table.as_mut()
    }
}

/// A synthetic node merging two bags, derived from a join step of the timeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct JoinBag {
    pub left: BagId,
    pub right: BagId,
    /// Target of the step following the join, where the merged result flows to.
    pub successor: Option<Target>,
}

impl JoinBag {
    pub fn target(&self) -> Target {
        Target::Join(self.left, self.right)
    }
}

/// Validated, immutable sequence of steps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Timeline {
    steps: Vec<TimelineStep>,
}

impl Timeline {
    /// Builds a timeline over `td`.
    ///
    /// # Errors
    ///
    /// - [`VisuError::MalformedInput`] if a target references an undeclared bag or
    ///   joins a bag with itself.
    /// - [`VisuError::TableShape`] if a solution table is jagged.
    pub fn new(steps: Vec<TimelineStep>, td: &TreeDecomposition) -> Result<Self> {
        for (i, step) in steps.iter().enumerate() {
            if let Target::Join(left, right) = step.target {
                if left == right {
                    return Err(VisuError::malformed(format!("step {} joins bag {} with itself", i + 1, left)));
                }
            }
            for bag in step.target.bags() {
                if !td.contains(bag) {
                    return Err(VisuError::malformed(format!(
                        "step {} references undeclared bag {}",
                        i + 1,
                        bag
                    )));
                }
            }
            if let Some(table) = &step.table {
                table.check_shape()?;
            }
        }
        debug!("Timeline::new(steps = {})", steps.len());
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[TimelineStep] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimelineStep> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Distinct join nodes, in order of first appearance.
    ///
    /// The successor of a join is the target of the step right after its first
    /// occurrence.
    pub fn joins(&self) -> Vec<JoinBag> {
        let mut joins: Vec<JoinBag> = Vec::new();
        for (i, step) in self.steps.iter().enumerate() {
            if let Target::Join(left, right) = step.target {
                if joins.iter().any(|j| j.left == left && j.right == right) {
                    continue;
                }
                let successor = self.steps.get(i + 1).map(|next| next.target);
                if successor.is_none() {
                    warn!("join {}~{} is the last step and has no successor", left, right);
                }
                joins.push(JoinBag { left, right, successor });
            }
        }
        joins
    }

    /// Targets carrying a solution table, in order of first appearance, each with
    /// its first table.
    pub fn solutions(&self) -> Vec<(Target, &SolutionTable)> {
        let mut result: Vec<(Target, &SolutionTable)> = Vec::new();
        for step in self.steps.iter() {
            if let Some(table) = &step.table {
                if !result.iter().any(|(t, _)| *t == step.target) {
                    result.push((step.target, table));
                }
            }
        }
        result
    }

    /// Inserts plain steps for the bags strictly between two consecutive single-bag
    /// steps, so that the sequence walks along the tree.
    pub fn with_intermediate_bags(&self, order: &TreeOrder) -> Self {
        let mut steps = Vec::with_capacity(self.steps.len());
        let mut last: Option<BagId> = None;
        for step in self.steps.iter() {
            let current = step.target.as_bag();
            if let (Some(from), Some(to)) = (last, current) {
                if let Some(path) = order.path(from, to) {
                    if path.len() > 2 {
                        steps.extend(path[1..path.len() - 1].iter().map(|&bag| TimelineStep::new(Target::Bag(bag))));
                    }
                }
            }
            steps.push(step.clone());
            last = current;
        }
        debug!("with_intermediate_bags: {} -> {} steps", self.steps.len(), steps.len());
        Self { steps }
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a TimelineStep;
    type IntoIter = std::slice::Iter<'a, TimelineStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawTarget {
    Id(u32),
    Ids(Vec<u32>),
}

impl RawTarget {
    fn resolve(&self) -> Result<Target> {
        let bag = |id: u32| BagId::try_new(id).ok_or_else(|| VisuError::malformed("bag id 0 in timeline"));
        match self {
            RawTarget::Id(id) => Ok(Target::Bag(bag(*id)?)),
            RawTarget::Ids(ids) => match ids.as_slice() {
                [id] => Ok(Target::Bag(bag(*id)?)),
                [left, right] => Ok(Target::Join(bag(*left)?, bag(*right)?)),
                _ => Err(VisuError::malformed(format!(
                    "timeline target must name one or two bags, got {}",
                    ids.len()
                ))),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawTable {
    Full((Vec<Vec<Cell>>, Option<String>, Option<String>, bool)),
    Labels((Vec<Vec<Cell>>, Option<String>, Option<String>)),
    Top((Vec<Vec<Cell>>, Option<String>)),
    Bare((Vec<Vec<Cell>>,)),
}

impl RawTable {
    fn into_table(self) -> SolutionTable {
        let (data, top, bottom, transpose) = match self {
            RawTable::Full((data, top, bottom, transpose)) => (data, top, bottom, transpose),
            RawTable::Labels((data, top, bottom)) => (data, top, bottom, false),
            RawTable::Top((data, top)) => (data, top, None, false),
            RawTable::Bare((data,)) => (data, None, None, false),
        };
        let mut table = SolutionTable::new(data).with_transpose(transpose);
        if let Some(top) = top {
            table = table.with_top(top);
        }
        if let Some(bottom) = bottom {
            table = table.with_bottom(bottom);
        }
        table
    }
}

/// A timeline step as it appears in the JSON document.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawStep {
    WithTable((RawTarget, RawTable)),
    Plain((RawTarget,)),
}

impl RawStep {
    /// Resolves bag ids and builds the solution table, if any.
    pub(crate) fn resolve(self) -> Result<TimelineStep> {
        match self {
            RawStep::Plain((target,)) => Ok(TimelineStep::new(target.resolve()?)),
            RawStep::WithTable((target, table)) => Ok(TimelineStep::with_table(target.resolve()?, table.into_table())),
        }
    }
}
