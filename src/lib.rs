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

//! # Rill
//!
//! Rill is a document/report library built around a transformation
//! pipeline: an ordered, validated, optimizable sequence of operations
//! (filter, sort, limit, group-by/aggregate, add-column) applied to
//! in-memory tabular record sets prior to rendering.
//!
//! ## Module Overview
//!
//! - **value**: dynamically typed cell values and the type-aware total
//!   order used for sorting
//! - **record**: row representation for tabular content
//! - **schema**: column definitions and canonical key ordering
//! - **content** / **document**: content units and the documents that
//!   hold them
//! - **aggregate**: pure reducers over record groups
//! - **operation**: the stateless operation trait and conformance
//!   utilities
//! - **operations**: the built-in filter/sort/limit/group-by/add-column
//!   operations
//! - **optimizer**: semantics-preserving operation reordering
//! - **context**: cooperative cancellation and deadlines
//! - **pipeline**: validation, optimization, and execution, plus the
//!   configuration-driven builder
//! - **stats**: execution statistics attached to result metadata
//! - **errors**: the canonical error enumeration
//!
//! ## Quick Start
//!
//! ```rust
//! use rill::{RillContext, RillDocument, RillFilter, RillPipeline};
//!
//! let document = RillDocument::new();
//! // ... push table content ...
//!
//! let mut pipeline = RillPipeline::new(document);
//! pipeline.push(RillFilter::new(|record| record.get("active").is_some()));
//!
//! let transformed = pipeline.execute(&RillContext::new());
//! ```
//!
//! ## Concurrency
//!
//! Execution is synchronous and single-threaded per invocation.
//! Multiple pipelines may run concurrently over the same source
//! document: operations are stateless and execution only ever mutates
//! private deep copies, so no locking is needed. Cancellation is
//! cooperative via [`RillContext`].
//!
//! ## Error Handling
//!
//! All fallible operations return `Result<T, RillError>`. Execution
//! fails fast on the first error, never produces a partial-success
//! document, and wraps failures with enough stage/operation/content
//! context to pinpoint the failure without introspecting pipeline
//! internals.

pub mod aggregate;
pub mod content;
pub mod context;
pub mod document;
pub mod errors;
pub mod operation;
pub mod operations;
pub mod optimizer;
pub mod pipeline;
pub mod record;
pub mod schema;
pub mod stats;
pub mod value;

pub use aggregate::RillAggregate;
pub use content::{RillContent, RillContentKind, RillTableContent, RillTextContent};
pub use context::RillContext;
pub use document::{RillDocument, RillMetadata};
pub use errors::{Result, RillError};
pub use operation::{
    execute_operation, require_table, verify_stateless, RillOperation, RillOperationKind,
};
pub use operations::{
    RillAddColumn, RillFilter, RillGroupBy, RillLimit, RillSort, RillSortDirection, RillSortKey,
};
pub use optimizer::optimize;
pub use pipeline::{
    RillPipeline, RillPipelineBuilder, RillPipelineOptions, RillPipelineState,
    TRANSFORM_STATS_KEY,
};
pub use record::{RillRecord, RillRecordBatch};
pub use schema::{RillField, RillSchema};
pub use stats::{RillOperationStats, RillTransformStats};
pub use value::{compare_values, RillFieldType, RillValue};
