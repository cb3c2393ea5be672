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

//! # Rill Operation Module
//!
//! This module defines the core operation trait and execution utilities
//! for the transformation pipeline. Operations are the building blocks
//! that transform table content within Rill pipelines.
//!
//! ## Operation Design
//!
//! Operations are designed to be:
//!
//! - **Stateless**: an operation holds only the immutable configuration
//!   it was constructed with and retains no invocation-local mutable
//!   state. It must be safe to invoke repeatedly and concurrently
//!   against different content instances. [`verify_stateless`] enforces
//!   this contract in tests by applying an operation twice to
//!   independent clones of identical input and asserting equal outputs.
//! - **Side-effect-free**: `apply` never mutates its input; it clones
//!   the content and returns a new one.
//! - **Composable**: operations chain into pipelines; the
//!   [`RillOperationKind`] capability bucket tells the optimizer how an
//!   operation may be reordered.
//!
//! ## Implementing Custom Operations
//!
//! Any type implementing [`RillOperation`] can participate in pipelines.
//! Custom operations default to [`RillOperationKind::Custom`], which the
//! optimizer keeps after all recognized kinds, in original order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::{RillContent, RillTableContent};
use crate::context::RillContext;
use crate::errors::{Result, RillError};

/// Capability bucket used by the optimizer to reorder operations
/// without changing results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RillOperationKind {
    Filter,
    AddColumn,
    GroupBy,
    Sort,
    Limit,
    Custom,
}

impl RillOperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RillOperationKind::Filter => "filter",
            RillOperationKind::AddColumn => "add_column",
            RillOperationKind::GroupBy => "group_by",
            RillOperationKind::Sort => "sort",
            RillOperationKind::Limit => "limit",
            RillOperationKind::Custom => "custom",
        }
    }
}

/// Contract that every pipeline operation must fulfill.
pub trait RillOperation: fmt::Debug + Send + Sync {
    /// Unique, human-readable name for the operation, used in logging,
    /// error messages, and the configuration registry.
    fn name(&self) -> &'static str;

    /// Capability bucket for the optimizer.
    fn kind(&self) -> RillOperationKind {
        RillOperationKind::Custom
    }

    /// Checks the operation's own configuration, without touching data.
    fn validate(&self) -> Result<()>;

    /// Applies the operation to one content unit, producing a new unit.
    ///
    /// Table content is cloned and transformed; applying to any other
    /// content kind fails with a content type error. Implementations
    /// check `context` between records (or comparisons) so a cancelled
    /// execution stops promptly.
    fn apply(&self, content: &RillContent, context: &RillContext) -> Result<RillContent>;
}

/// Narrows a content unit to its table shape, failing with a content
/// type error naming `operation` otherwise.
pub fn require_table<'a>(operation: &str, content: &'a RillContent) -> Result<&'a RillTableContent> {
    content
        .as_table()
        .ok_or_else(|| RillError::content_type(operation, content.kind().as_str()))
}

/// Convenience helper to execute an operation while normalizing errors.
///
/// Cancellation errors pass through untouched so callers can still
/// distinguish them; anything else is wrapped with the operation name.
pub fn execute_operation(
    operation: &dyn RillOperation,
    content: &RillContent,
    context: &RillContext,
) -> Result<RillContent> {
    operation.apply(content, context).map_err(|err| {
        if err.is_cancellation()
            || matches!(err, RillError::Operation { .. } | RillError::ContentType { .. })
        {
            err
        } else {
            RillError::operation(operation.name(), err.to_string())
        }
    })
}

/// Conformance check for the stateless-operation contract.
///
/// Applies `operation` twice against independent clones of `content`
/// and fails unless both invocations produce identical output.
pub fn verify_stateless(operation: &dyn RillOperation, content: &RillTableContent) -> Result<()> {
    let context = RillContext::new();
    let first = operation.apply(&RillContent::Table(content.clone()), &context)?;
    let second = operation.apply(&RillContent::Table(content.clone()), &context)?;
    if first == second {
        Ok(())
    } else {
        Err(RillError::operation(
            operation.name(),
            "produced differing outputs for identical inputs",
        ))
    }
}
