//! Builds every requested graph from an input document and renders the timeline.
//!
//! The tree decomposition and the timeline drive all graphs: if either is invalid,
//! the whole document is rejected. Auxiliary graphs (incidence, inferred primal and
//! dual, general) are independent of each other; an invalid one is logged, recorded
//! in [`Visualization::rejected`] and skipped.
//!
//! Snapshots are grouped per step. Within a step the graph order is fixed: the tree
//! decomposition first, then for each incidence graph its primal, dual and incidence
//! snapshots, then the general graphs in document order.
//!
//! # Examples
//!
//! ```
//! use tdvisu_rs::visualization::Visualization;
//!
//! let json = r#"{
//!     "treeDecJson": {
//!         "bagpre": "bag %s",
//!         "edgearray": [[2, 1]],
//!         "labeldict": [{"id": 1, "items": [1], "labels": []}, {"id": 2, "items": [1, 2], "labels": []}]
//!     },
//!     "tdTimeline": [[1], [2]],
//!     "generalGraph": {"edges": [[1, 2]], "implicit_nodes": true}
//! }"#;
//!
//! let visualization = Visualization::from_json(json).unwrap();
//! let steps = visualization.snapshots();
//! assert_eq!(steps.len(), 2);
//! assert_eq!(steps[0].snapshots.len(), 2);
//! assert_eq!(steps[0].snapshots[0].file_basename, "TDStep");
//! ```

use log::{error, info};

use crate::config::Document;
use crate::dot::Snapshot;
use crate::error::{Result, VisuError};
use crate::infer::{infer_dual, infer_primal, variable_postings};
use crate::model::TreeDecomposition;
use crate::snapshot::{
    render_timeline, GeneralEmitter, GeneralStyle, IncidenceEmitter, SnapshotEmitter, TreeEmitter,
};
use crate::table::Summary;
use crate::timeline::{RawStep, Timeline, TimelineStep};

type SupportEmitter = Box<dyn SnapshotEmitter<Element = u32> + Send + Sync>;

/// One snapshot together with the basename of the files it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSnapshot {
    pub file_basename: String,
    pub snapshot: Snapshot,
}

/// All snapshots of one timeline step, in graph order.
#[derive(Debug, Clone, PartialEq)]
pub struct StepSnapshots {
    /// One-based step number.
    pub step: usize,
    pub snapshots: Vec<NamedSnapshot>,
}

impl StepSnapshots {
    /// File names (`basename` followed by the step number) with their snapshots.
    pub fn files(&self) -> impl Iterator<Item = (String, &Snapshot)> {
        self.snapshots
            .iter()
            .map(move |named| (format!("{}{}", named.file_basename, self.step), &named.snapshot))
    }
}

/// An auxiliary graph that could not be built.
#[derive(Debug)]
pub struct RejectedGraph {
    /// File basename the graph would have been written to.
    pub name: String,
    pub error: VisuError,
}

struct SupportGraph {
    file_basename: String,
    emitter: SupportEmitter,
}

/// A validated document, ready to render.
pub struct Visualization {
    td: TreeDecomposition,
    timeline: Timeline,
    td_file: String,
    tree: TreeEmitter,
    support: Vec<SupportGraph>,
    rejected: Vec<RejectedGraph>,
}

impl Visualization {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// - [`VisuError::Json`] if the document cannot be parsed.
    /// - [`VisuError::MalformedInput`], [`VisuError::NotATree`] or
    ///   [`VisuError::TableShape`] if the tree decomposition or the timeline is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_document(Document::from_json(json)?)
    }

    pub fn from_document(doc: Document) -> Result<Self> {
        let style = doc.style;
        let td = doc.tree_dec.build()?;
        let steps = doc
            .timeline
            .into_iter()
            .map(|raw: RawStep| -> Result<TimelineStep> {
                let mut step = raw.resolve()?;
                if let Some(summary) = style.summary {
                    add_footer(&mut step, summary)?;
                }
                Ok(step)
            })
            .collect::<Result<Vec<_>>>()?;
        let mut timeline = Timeline::new(steps, &td)?;
        if doc.intermediate_bags {
            timeline = timeline.with_intermediate_bags(td.order());
        }
        let tree = TreeEmitter::new(&td, &timeline, &style)?;
        info!("Loaded tree decomposition with {} bags and {} steps", td.len(), timeline.len());

        let mut support: Vec<SupportGraph> = Vec::new();
        let mut rejected: Vec<RejectedGraph> = Vec::new();

        for config in doc.incidence_graphs.iter() {
            let graph = match config.build() {
                Ok(graph) => graph,
                Err(error) => {
                    error!("Skipping incidence graph '{}': {}", config.inc_file, error);
                    rejected.push(RejectedGraph {
                        name: config.inc_file.clone(),
                        error,
                    });
                    continue;
                }
            };
            if config.infer_primal {
                let general = GeneralStyle::inferred(&config.primal_file, &config.var_name_two, &style);
                support.push(SupportGraph::new(
                    &config.primal_file,
                    GeneralEmitter::new(infer_primal(&graph), general),
                ));
                info!("Created inferred primal graph '{}'", config.primal_file);
            }
            if config.infer_dual {
                let general = GeneralStyle::inferred(&config.dual_file, &config.var_name_one, &style);
                let emitter =
                    GeneralEmitter::new(infer_dual(&graph), general).with_focus_index(variable_postings(&graph));
                support.push(SupportGraph::new(&config.dual_file, emitter));
                info!("Created inferred dual graph '{}'", config.dual_file);
            }
            support.push(SupportGraph::new(
                &config.inc_file,
                IncidenceEmitter::new(graph, config, &style, td.num_vars()),
            ));
            info!("Created incidence graph '{}'", config.inc_file);
        }

        for config in doc.general_graphs.iter() {
            match config.build() {
                Ok(graph) => {
                    support.push(SupportGraph::new(
                        &config.file_basename,
                        GeneralEmitter::new(graph, GeneralStyle::from(config)),
                    ));
                    info!("Created general graph '{}'", config.file_basename);
                }
                Err(error) => {
                    error!("Skipping general graph '{}': {}", config.file_basename, error);
                    rejected.push(RejectedGraph {
                        name: config.file_basename.clone(),
                        error,
                    });
                }
            }
        }

        Ok(Self {
            td,
            timeline,
            td_file: style.td_file,
            tree,
            support,
            rejected,
        })
    }

    pub fn tree_decomposition(&self) -> &TreeDecomposition {
        &self.td
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Auxiliary graphs skipped because they failed validation.
    pub fn rejected(&self) -> &[RejectedGraph] {
        &self.rejected
    }

    /// File basenames of the rendered graphs, in graph order.
    pub fn graph_names(&self) -> Vec<&str> {
        std::iter::once(self.td_file.as_str())
            .chain(self.support.iter().map(|graph| graph.file_basename.as_str()))
            .collect()
    }

    /// Renders every graph for every step.
    pub fn snapshots(&self) -> Vec<StepSnapshots> {
        let mut columns: Vec<(&str, std::vec::IntoIter<Snapshot>)> = Vec::with_capacity(self.support.len() + 1);
        columns.push((
            self.td_file.as_str(),
            render_timeline(&self.tree, &self.td, &self.timeline).into_iter(),
        ));
        for graph in self.support.iter() {
            columns.push((
                graph.file_basename.as_str(),
                render_timeline(graph.emitter.as_ref(), &self.td, &self.timeline).into_iter(),
            ));
        }

        (1..=self.timeline.len())
            .map(|step| StepSnapshots {
                step,
                snapshots: columns
                    .iter_mut()
                    .filter_map(|(name, snapshots)| {
                        snapshots.next().map(|snapshot| NamedSnapshot {
                            file_basename: name.to_string(),
                            snapshot,
                        })
                    })
                    .collect(),
            })
            .collect()
    }
}

impl SupportGraph {
    fn new<E>(file_basename: &str, emitter: E) -> Self
    where
        E: SnapshotEmitter<Element = u32> + Send + Sync + 'static,
    {
        Self {
            file_basename: file_basename.to_string(),
            emitter: Box::new(emitter),
        }
    }
}

/// Fills a missing or empty bottom label with the summary footer.
fn add_footer(step: &mut TimelineStep, summary: Summary) -> Result<()> {
    if let Some(table) = step.table_mut() {
        if table.bottom().filter(|bottom| !bottom.is_empty()).is_none() {
            if let Some(footer) = summary.footer(table)? {
                *table = std::mem::take(table).with_bottom(footer);
            }
        }
    }
    Ok(())
}
