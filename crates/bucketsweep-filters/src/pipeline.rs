//! Filter pipeline for combining several filters
//!
//! This module provides:
//! - Sequential narrowing (`Composition::All`): each stage sees only what the
//!   previous stage kept
//! - Union (`Composition::Any`): every stage sees the full input and an
//!   object is kept when any stage keeps it
//! - Up-front compilation of every stage, so one malformed selector fails
//!   the whole run before any object is evaluated

use bucketsweep_core::{Result, StorageObject};
use bucketsweep_policy::Policy;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::filter::{record_evaluation, CompiledFilter};
use crate::{Filter, FilterKind};

/// How stage results are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Composition {
    /// Intersection: stages run in order, each narrowing the candidates
    #[default]
    All,

    /// Union: stages run on the full input, results are merged
    Any,
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Any => f.write_str("any"),
        }
    }
}

/// A chain of filters evaluated against one policy
pub struct FilterPipeline {
    stages: Vec<Box<dyn Filter>>,
    composition: Composition,
}

/// Per-stage counts from a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    /// Filter name
    pub name: String,

    /// Objects the stage evaluated
    pub input: usize,

    /// Objects the stage kept
    pub output: usize,
}

/// Result of running a pipeline
#[derive(Debug, Clone)]
pub struct PipelineOutcome<'a> {
    /// Selected objects, in input order
    pub selected: Vec<&'a StorageObject>,

    /// One report per stage, in stage order
    pub stages: Vec<StageReport>,
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new(Composition::default())
    }
}

impl FilterPipeline {
    /// Create a new empty pipeline
    pub fn new(composition: Composition) -> Self {
        Self {
            stages: Vec::new(),
            composition,
        }
    }

    /// Create a pipeline with one stage per kind, in the given order
    pub fn from_kinds(kinds: &[FilterKind], composition: Composition) -> Self {
        kinds
            .iter()
            .fold(Self::new(composition), |pipeline, kind| {
                pipeline.with_filter(kind.build())
            })
    }

    /// Add a stage (builder pattern)
    pub fn with_filter(mut self, filter: Box<dyn Filter>) -> Self {
        self.stages.push(filter);
        self
    }

    /// Add a stage
    pub fn add_filter(&mut self, filter: Box<dyn Filter>) {
        self.stages.push(filter);
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Check if the pipeline has no stages
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// How stage results are combined
    pub fn composition(&self) -> Composition {
        self.composition
    }

    /// Names of all stages
    pub fn stage_names(&self) -> Vec<String> {
        self.stages.iter().map(|s| s.name().to_string()).collect()
    }

    /// Compile every stage without evaluating objects
    pub fn validate(&self, policy: &Policy) -> Result<()> {
        self.compile(policy).map(|_| ())
    }

    /// Run the pipeline.
    ///
    /// An empty pipeline selects nothing.
    pub fn execute<'a>(
        &self,
        objects: &'a [StorageObject],
        policy: &Policy,
    ) -> Result<PipelineOutcome<'a>> {
        let compiled = self.compile(policy)?;
        let input: Vec<&'a StorageObject> = objects.iter().collect();

        let outcome = match self.composition {
            Composition::All => Self::intersect(&compiled, input),
            Composition::Any => Self::union(&compiled, input),
        };

        info!(
            composition = %self.composition,
            stages = compiled.len(),
            objects = objects.len(),
            selected = outcome.selected.len(),
            "Pipeline finished"
        );

        Ok(outcome)
    }

    fn compile(&self, policy: &Policy) -> Result<Vec<CompiledFilter>> {
        self.stages
            .iter()
            .map(|stage| {
                stage.compile(policy).map_err(|e| {
                    metrics::counter!(
                        "bucketsweep_filter_errors_total",
                        "filter" => stage.name().to_string()
                    )
                    .increment(1);
                    warn!(filter = %stage.name(), error = %e, "Filter compilation failed");
                    e
                })
            })
            .collect()
    }

    fn intersect<'a>(
        compiled: &[CompiledFilter],
        input: Vec<&'a StorageObject>,
    ) -> PipelineOutcome<'a> {
        if compiled.is_empty() {
            return PipelineOutcome {
                selected: Vec::new(),
                stages: Vec::new(),
            };
        }

        let mut current = input;
        let mut stages = Vec::with_capacity(compiled.len());

        for stage in compiled {
            let before = current.len();
            if before > 0 {
                current = stage.select(&current);
            } else {
                debug!(filter = %stage.name(), "Nothing left to narrow, skipping evaluation");
            }
            stages.push(StageReport {
                name: stage.name().to_string(),
                input: before,
                output: current.len(),
            });
        }

        PipelineOutcome {
            selected: current,
            stages,
        }
    }

    fn union<'a>(compiled: &[CompiledFilter], input: Vec<&'a StorageObject>) -> PipelineOutcome<'a> {
        let mut keep = vec![false; input.len()];
        let mut stages = Vec::with_capacity(compiled.len());

        for stage in compiled {
            let mut output = 0;
            if !stage.is_empty() {
                for (slot, obj) in keep.iter_mut().zip(&input) {
                    if stage.matches(obj) {
                        *slot = true;
                        output += 1;
                    }
                }
                record_evaluation(stage.name(), input.len(), output);
            }
            stages.push(StageReport {
                name: stage.name().to_string(),
                input: input.len(),
                output,
            });
        }

        let selected = input
            .into_iter()
            .zip(keep)
            .filter_map(|(obj, kept)| kept.then_some(obj))
            .collect();

        PipelineOutcome { selected, stages }
    }
}

impl fmt::Debug for FilterPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterPipeline")
            .field("stages", &self.stage_names())
            .field("composition", &self.composition)
            .finish()
    }
}
