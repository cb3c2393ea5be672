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

//! # Rill Error Module
//!
//! This module defines the error types and utilities used throughout the
//! Rill library for consistent error handling and reporting.
//!
//! ## Error Categories
//!
//! - **Validation**: configuration errors, raised before any data is
//!   touched, identifying the offending field or operation
//! - **ContentType**: an operation was applied to non-table content
//! - **Cancelled**: cooperative cancellation or deadline expiry,
//!   distinguished from ordinary failures so callers can decide to retry
//! - **Operation**: failures raised by caller-supplied predicates,
//!   comparators, compute closures, or aggregate functions
//! - **Stage**: an execution failure wrapped with the failing operation,
//!   its stage index, the content it ran against, and a bounded record
//!   sample; the original cause is preserved as the source error
//! - **Pipeline**: pipeline orchestration failures
//! - **Serde**: serialization/deserialization errors
//! - **Internal**: unexpected internal failures
//!
//! Errors derive `Serialize`/`Deserialize` so they can be logged or
//! persisted as structured data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Rill.
pub type Result<T> = std::result::Result<T, RillError>;

/// Canonical error enumeration for Rill.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum RillError {
    /// Validation errors triggered by invalid parameters or inputs.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// An operation was applied to content it cannot process.
    #[error("operation '{operation}' expects table content, got {actual}")]
    ContentType { operation: String, actual: String },

    /// Cooperative cancellation or deadline expiry.
    #[error("cancelled at '{stage}': {message}")]
    Cancelled { stage: String, message: String },

    /// Any failure raised by an operation or a caller-supplied closure.
    #[error("operation '{operation}' failed: {message}")]
    Operation { operation: String, message: String },

    /// An execution failure annotated with its pipeline stage context.
    #[error(
        "stage {stage} ('{operation}', {kind}) failed on {content_kind} content '{content_id}': {source}"
    )]
    Stage {
        operation: String,
        kind: String,
        stage: usize,
        content_kind: String,
        content_id: String,
        /// Bounded sample of the first input record, for debugging.
        sample: String,
        #[source]
        source: Box<RillError>,
    },

    /// Failures that occur while orchestrating a pipeline.
    #[error("pipeline error at '{stage}': {message}")]
    Pipeline { stage: String, message: String },

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for RillError {
    fn from(err: serde_json::Error) -> Self {
        RillError::Serde(err.to_string())
    }
}

impl RillError {
    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        RillError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct content type mismatch errors.
    pub fn content_type(operation: impl Into<String>, actual: impl Into<String>) -> Self {
        RillError::ContentType {
            operation: operation.into(),
            actual: actual.into(),
        }
    }

    /// Helper to construct cancellation errors.
    pub fn cancelled(stage: impl Into<String>, message: impl Into<String>) -> Self {
        RillError::Cancelled {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Helper to construct operation errors.
    pub fn operation(name: impl Into<String>, message: impl Into<String>) -> Self {
        RillError::Operation {
            operation: name.into(),
            message: message.into(),
        }
    }

    /// Helper to construct pipeline errors.
    pub fn pipeline(stage: impl Into<String>, message: impl Into<String>) -> Self {
        RillError::Pipeline {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        RillError::Internal(message.into())
    }

    /// Returns true if this error (or the cause inside a stage wrapper)
    /// is a cancellation, so callers can decide whether to retry.
    pub fn is_cancellation(&self) -> bool {
        match self {
            RillError::Cancelled { .. } => true,
            RillError::Stage { source, .. } => source.is_cancellation(),
            _ => false,
        }
    }
}
