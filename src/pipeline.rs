//! Copyright © 2025-2026 Rill Contributors. All Rights Reserved.
//!
//! This file is part of Rill.
//! The Rill project belongs to the Rill Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Rill Pipeline Module
//!
//! Pipeline building and execution.
//!
//! A pipeline owns a source document, an ordered operation list, and
//! options. Its lifecycle is Built → Validated → Optimized → Executing
//! → Completed | Failed: it is validated and optimized exactly once and
//! executed exactly once. Execution clones every table content before
//! any operation touches it, applies the optimized operation sequence
//! with per-stage timing, passes non-table content through unchanged,
//! and assembles a new document whose metadata carries a
//! `transform_stats` entry. The source document is never mutated, so
//! concurrent pipelines over the same document never observe each
//! other's intermediate state.
//!
//! Failures are wrapped with the failing stage's full context
//! (operation name, kind, zero-based stage index in the optimized
//! sequence, content kind/id, and a bounded input-record sample);
//! cancellation errors surface unwrapped so callers can tell them apart
//! and decide to retry.
//!
//! [`RillPipelineBuilder`] instantiates operations from JSON
//! configuration steps of the form `{"operation": <name>, "config":
//! {..}}` through a registry of named factories.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::content::RillContent;
use crate::context::RillContext;
use crate::document::RillDocument;
use crate::errors::{Result, RillError};
use crate::operation::RillOperation;
use crate::operations::add_column::add_column_factory;
use crate::operations::filter::filter_factory;
use crate::operations::group_by::group_by_factory;
use crate::operations::limit::limit_factory;
use crate::operations::sort::sort_factory;
use crate::optimizer::optimize;
use crate::stats::{RillOperationStats, RillTransformStats};

/// Metadata key under which execution statistics are attached.
pub const TRANSFORM_STATS_KEY: &str = "transform_stats";

const SAMPLE_CHAR_LIMIT: usize = 256;

/// Lifecycle state of a pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RillPipelineState {
    Built,
    Validated,
    Optimized,
    Executing,
    Completed,
    Failed,
}

/// Execution limits for a pipeline.
#[derive(Clone, Debug)]
pub struct RillPipelineOptions {
    /// Maximum number of operations accepted at validation.
    pub max_operations: usize,
    /// Optional wall-clock limit applied as a deadline on execution.
    pub max_duration: Option<Duration>,
}

impl Default for RillPipelineOptions {
    fn default() -> Self {
        RillPipelineOptions {
            max_operations: 64,
            max_duration: None,
        }
    }
}

/// Ordered, validated, optimizable sequence of operations applied to a
/// document's table content.
#[derive(Debug)]
pub struct RillPipeline {
    document: RillDocument,
    operations: Vec<Box<dyn RillOperation>>,
    options: RillPipelineOptions,
    state: RillPipelineState,
}

impl RillPipeline {
    /// Constructs an empty pipeline over a source document.
    pub fn new(document: RillDocument) -> Self {
        RillPipeline::with_options(document, RillPipelineOptions::default())
    }

    pub fn with_options(document: RillDocument, options: RillPipelineOptions) -> Self {
        RillPipeline {
            document,
            operations: Vec::new(),
            options,
            state: RillPipelineState::Built,
        }
    }

    /// Appends an operation to the pipeline.
    pub fn push(&mut self, operation: impl RillOperation + 'static) {
        self.operations.push(Box::new(operation));
    }

    /// Appends an already boxed operation.
    pub fn push_boxed(&mut self, operation: Box<dyn RillOperation>) {
        self.operations.push(operation);
    }

    pub fn state(&self) -> RillPipelineState {
        self.state
    }

    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// Validates the pipeline without touching any data.
    ///
    /// The document must contain at least one table content, the
    /// operation count must not exceed the configured maximum, and each
    /// operation's own validation must pass; the first failure is
    /// wrapped with the operation's name and kind plus the pipeline's
    /// total operation count.
    pub fn validate(&mut self) -> Result<()> {
        if matches!(
            self.state,
            RillPipelineState::Executing
                | RillPipelineState::Completed
                | RillPipelineState::Failed
        ) {
            return Err(RillError::pipeline(
                "validate",
                "pipeline has already been executed",
            ));
        }
        if self.document.table_count() == 0 {
            return Err(RillError::pipeline(
                "validate",
                "document contains no table content",
            ));
        }
        if self.operations.len() > self.options.max_operations {
            return Err(RillError::pipeline(
                "validate",
                format!(
                    "pipeline has {} operations, exceeding the maximum of {}",
                    self.operations.len(),
                    self.options.max_operations
                ),
            ));
        }
        let total = self.operations.len();
        for (index, operation) in self.operations.iter().enumerate() {
            operation.validate().map_err(|err| {
                RillError::pipeline(
                    "validate",
                    format!(
                        "operation {index} of {total} ('{}', {}) is invalid: {err}",
                        operation.name(),
                        operation.kind().as_str()
                    ),
                )
            })?;
        }
        self.state = RillPipelineState::Validated;
        Ok(())
    }

    /// Validates (if not already), optimizes, and executes the pipeline.
    ///
    /// Produces a new document; the source document is never mutated.
    /// A pipeline executes at most once: later calls fail with a
    /// pipeline error.
    pub fn execute(&mut self, context: &RillContext) -> Result<RillDocument> {
        match self.state {
            RillPipelineState::Built
            | RillPipelineState::Validated
            | RillPipelineState::Optimized => {}
            _ => {
                return Err(RillError::pipeline(
                    "execute",
                    "pipeline has already been executed",
                ))
            }
        }

        let context = match self.options.max_duration {
            Some(timeout) => context.with_timeout(timeout),
            None => context.clone(),
        };

        if self.state == RillPipelineState::Built {
            if let Err(err) = self.validate() {
                self.state = RillPipelineState::Failed;
                return Err(err);
            }
        }
        if self.state == RillPipelineState::Validated {
            self.operations = optimize(std::mem::take(&mut self.operations));
            self.state = RillPipelineState::Optimized;
        }

        self.state = RillPipelineState::Executing;
        let result = self.run(&context);
        match &result {
            Ok(document) => {
                self.state = RillPipelineState::Completed;
                log::info!(
                    "pipeline completed: {} content units, {} operations",
                    document.contents.len(),
                    self.operations.len()
                );
            }
            Err(err) if err.is_cancellation() => {
                self.state = RillPipelineState::Failed;
                log::info!("pipeline cancelled: {err}");
            }
            Err(err) => {
                self.state = RillPipelineState::Failed;
                log::warn!("pipeline failed: {err}");
            }
        }
        result
    }

    fn run(&self, context: &RillContext) -> Result<RillDocument> {
        let started = Instant::now();
        let mut per_operation: Vec<RillOperationStats> = self
            .operations
            .iter()
            .map(|operation| RillOperationStats {
                operation: operation.name().to_string(),
                ..RillOperationStats::default()
            })
            .collect();
        let mut input_records = 0usize;
        let mut output_records = 0usize;

        let mut contents = Vec::with_capacity(self.document.contents.len());
        for content in &self.document.contents {
            context.checkpoint("content")?;
            match content {
                RillContent::Table(table) => {
                    input_records += table.records.len();
                    // Private clone: operations only ever touch this copy.
                    let mut current = RillContent::Table(table.clone());
                    for (stage, operation) in self.operations.iter().enumerate() {
                        context.checkpoint(operation.name())?;
                        let stage_started = Instant::now();
                        let next = operation.apply(&current, context).map_err(|err| {
                            stage_error(operation.as_ref(), stage, &current, err)
                        })?;
                        let elapsed = stage_started.elapsed();
                        let records_out = next
                            .as_table()
                            .map(|table| table.records.len())
                            .unwrap_or(0);
                        per_operation[stage].duration_ms += elapsed.as_secs_f64() * 1000.0;
                        per_operation[stage].records_out += records_out;
                        log::debug!(
                            "stage {stage} '{}' on content '{}': {} records out",
                            operation.name(),
                            content.id(),
                            records_out
                        );
                        current = next;
                    }
                    output_records += current
                        .as_table()
                        .map(|table| table.records.len())
                        .unwrap_or(0);
                    contents.push(current);
                }
                other => contents.push(other.clone()),
            }
        }

        let stats = RillTransformStats {
            input_records,
            output_records,
            filtered_records: input_records.saturating_sub(output_records),
            total_duration_ms: started.elapsed().as_secs_f64() * 1000.0,
            operations: per_operation,
        };

        let mut metadata = self.document.metadata.clone();
        metadata.insert(TRANSFORM_STATS_KEY.to_string(), stats.as_json());

        Ok(RillDocument {
            title: self.document.title.clone(),
            contents,
            metadata,
        })
    }
}

/// Wraps an execution failure with its stage context; cancellations
/// pass through untouched.
fn stage_error(
    operation: &dyn RillOperation,
    stage: usize,
    input: &RillContent,
    cause: RillError,
) -> RillError {
    if cause.is_cancellation() {
        return cause;
    }
    RillError::Stage {
        operation: operation.name().to_string(),
        kind: operation.kind().as_str().to_string(),
        stage,
        content_kind: input.kind().as_str().to_string(),
        content_id: input.id().to_string(),
        sample: record_sample(input),
        source: Box::new(cause),
    }
}

/// Bounded serialization of the first input record, for debugging.
fn record_sample(content: &RillContent) -> String {
    let record = match content.as_table().and_then(|table| table.records.first()) {
        Some(record) => record,
        None => return String::new(),
    };
    let serialized = serde_json::to_string(record).unwrap_or_default();
    if serialized.chars().count() > SAMPLE_CHAR_LIMIT {
        let mut truncated: String = serialized.chars().take(SAMPLE_CHAR_LIMIT).collect();
        truncated.push('…');
        truncated
    } else {
        serialized
    }
}

type RillOperationFactory = fn(&Value) -> Result<Box<dyn RillOperation>>;

/// Builder that knows how to instantiate operations from configuration.
pub struct RillPipelineBuilder {
    factories: HashMap<String, RillOperationFactory>,
}

impl RillPipelineBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        RillPipelineBuilder {
            factories: HashMap::new(),
        }
    }

    /// Creates a builder pre-loaded with the built-in operations.
    pub fn with_defaults() -> Self {
        let mut builder = Self::new();
        builder.register_defaults();
        builder
    }

    /// Registers a factory for the given operation name.
    pub fn register(&mut self, name: impl Into<String>, factory: RillOperationFactory) {
        self.factories.insert(name.into(), factory);
    }

    fn register_defaults(&mut self) {
        self.register("filter", filter_factory as RillOperationFactory);
        self.register("sort", sort_factory as RillOperationFactory);
        self.register("limit", limit_factory as RillOperationFactory);
        self.register("group_by", group_by_factory as RillOperationFactory);
        self.register("add_column", add_column_factory as RillOperationFactory);
    }

    /// Instantiates an operation list from configuration steps.
    pub fn build_operations(&self, steps: &[Value]) -> Result<Vec<Box<dyn RillOperation>>> {
        let mut operations = Vec::with_capacity(steps.len());
        for (index, step) in steps.iter().enumerate() {
            let object = step.as_object().ok_or_else(|| {
                RillError::validation(format!("pipeline step #{index} must be an object"))
            })?;

            let operation_name = object
                .get("operation")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    RillError::validation(format!(
                        "pipeline step #{index} missing string 'operation'"
                    ))
                })?;

            let factory = self.factories.get(operation_name).ok_or_else(|| {
                RillError::validation(format!("unknown operation '{operation_name}'"))
            })?;

            let config = object.get("config").cloned().unwrap_or(Value::Null);
            operations.push(factory(&config)?);
        }
        Ok(operations)
    }

    /// Builds and validates a pipeline from configuration steps.
    pub fn build(&self, document: RillDocument, steps: &[Value]) -> Result<RillPipeline> {
        let mut pipeline = RillPipeline::new(document);
        for operation in self.build_operations(steps)? {
            pipeline.push_boxed(operation);
        }
        pipeline.validate()?;
        Ok(pipeline)
    }
}

impl Default for RillPipelineBuilder {
    fn default() -> Self {
        RillPipelineBuilder::with_defaults()
    }
}
