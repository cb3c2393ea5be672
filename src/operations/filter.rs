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

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::content::RillContent;
use crate::context::RillContext;
use crate::errors::{Result, RillError};
use crate::operation::{require_table, RillOperation, RillOperationKind};
use crate::record::RillRecord;
use crate::value::{compare_values, RillValue};

/// Predicate over a single record.
pub type RillPredicate = Arc<dyn Fn(&RillRecord) -> bool + Send + Sync>;

/// Keeps records for which the predicate holds, preserving their
/// original relative order.
pub struct RillFilter {
    predicate: Option<RillPredicate>,
}

impl fmt::Debug for RillFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RillFilter")
            .field("predicate", &self.predicate.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Default for RillFilter {
    fn default() -> Self {
        RillFilter { predicate: None }
    }
}

impl RillFilter {
    /// Creates a filter from a predicate closure.
    pub fn new(predicate: impl Fn(&RillRecord) -> bool + Send + Sync + 'static) -> Self {
        RillFilter {
            predicate: Some(Arc::new(predicate)),
        }
    }
}

impl RillOperation for RillFilter {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn kind(&self) -> RillOperationKind {
        RillOperationKind::Filter
    }

    fn validate(&self) -> Result<()> {
        if self.predicate.is_none() {
            return Err(RillError::validation("filter requires a predicate"));
        }
        Ok(())
    }

    fn apply(&self, content: &RillContent, context: &RillContext) -> Result<RillContent> {
        let table = require_table(self.name(), content)?;
        let predicate = self
            .predicate
            .as_ref()
            .ok_or_else(|| RillError::validation("filter requires a predicate"))?;

        let mut output = table.clone();
        output.records.clear();
        for record in &table.records {
            context.checkpoint("filter")?;
            if predicate(record) {
                output.records.push(record.clone());
            }
        }
        Ok(RillContent::Table(output))
    }
}

/// Keeps records whose column equals a target value.
pub fn column_equals(column: &str, value: impl Into<RillValue>) -> RillPredicate {
    let column = column.to_string();
    let value = value.into();
    Arc::new(move |record| record.get(&column) == Some(&value))
}

/// Keeps records whose column does not equal a target value.
pub fn column_not_equals(column: &str, value: impl Into<RillValue>) -> RillPredicate {
    let column = column.to_string();
    let value = value.into();
    Arc::new(move |record| record.get(&column) != Some(&value))
}

/// Keeps records whose column orders strictly after a threshold.
pub fn column_greater_than(column: &str, value: impl Into<RillValue>) -> RillPredicate {
    let column = column.to_string();
    let value = value.into();
    Arc::new(move |record| {
        record
            .get(&column)
            .map_or(false, |cell| compare_values(cell, &value) == Ordering::Greater)
    })
}

/// Keeps records whose column orders strictly before a threshold.
pub fn column_less_than(column: &str, value: impl Into<RillValue>) -> RillPredicate {
    let column = column.to_string();
    let value = value.into();
    Arc::new(move |record| {
        record
            .get(&column)
            .map_or(false, |cell| compare_values(cell, &value) == Ordering::Less)
    })
}

/// Keeps records whose column lies within inclusive bounds.
pub fn column_between(
    column: &str,
    low: impl Into<RillValue>,
    high: impl Into<RillValue>,
) -> RillPredicate {
    let column = column.to_string();
    let low = low.into();
    let high = high.into();
    Arc::new(move |record| {
        record.get(&column).map_or(false, |cell| {
            compare_values(cell, &low) != Ordering::Less
                && compare_values(cell, &high) != Ordering::Greater
        })
    })
}

/// Keeps records where the column is present and not null.
pub fn column_exists(column: &str) -> RillPredicate {
    let column = column.to_string();
    Arc::new(move |record| matches!(record.get(&column), Some(value) if !value.is_null()))
}

/// Keeps records where the column is missing or null.
pub fn column_is_null(column: &str) -> RillPredicate {
    let column = column.to_string();
    Arc::new(move |record| record.get(&column).map_or(true, RillValue::is_null))
}

/// Keeps records where the column's string representation matches a
/// pattern.
pub fn column_matches(column: &str, pattern: Regex) -> RillPredicate {
    let column = column.to_string();
    Arc::new(move |record| {
        record
            .get(&column)
            .map_or(false, |cell| pattern.is_match(&cell.to_string()))
    })
}

/// Factory that constructs [`RillFilter`] from JSON configuration.
///
/// Expected shape: `{"column": <name>, "compare": <kind>, ...}` where
/// `compare` is one of `equals`, `not_equals`, `greater_than`,
/// `less_than`, `between` (with `min`/`max`), `exists`, `is_null`, or
/// `matches` (with `pattern`).
pub fn filter_factory(config: &Value) -> Result<Box<dyn RillOperation>> {
    let obj = config
        .as_object()
        .ok_or_else(|| RillError::validation("filter config must be an object"))?;

    let column = obj
        .get("column")
        .and_then(Value::as_str)
        .ok_or_else(|| RillError::validation("filter requires string 'column'"))?;
    if column.is_empty() {
        return Err(RillError::validation("filter 'column' may not be empty"));
    }

    let compare = obj
        .get("compare")
        .and_then(Value::as_str)
        .ok_or_else(|| RillError::validation("filter requires string 'compare'"))?;

    let target = || -> Result<RillValue> {
        obj.get("value")
            .map(RillValue::from_json)
            .ok_or_else(|| RillError::validation(format!("filter '{compare}' requires 'value'")))
    };

    let predicate = match compare {
        "equals" => column_equals(column, target()?),
        "not_equals" => column_not_equals(column, target()?),
        "greater_than" => column_greater_than(column, target()?),
        "less_than" => column_less_than(column, target()?),
        "between" => {
            let low = obj
                .get("min")
                .map(RillValue::from_json)
                .ok_or_else(|| RillError::validation("filter 'between' requires 'min'"))?;
            let high = obj
                .get("max")
                .map(RillValue::from_json)
                .ok_or_else(|| RillError::validation("filter 'between' requires 'max'"))?;
            column_between(column, low, high)
        }
        "exists" => column_exists(column),
        "is_null" => column_is_null(column),
        "matches" => {
            let pattern = obj
                .get("pattern")
                .and_then(Value::as_str)
                .ok_or_else(|| RillError::validation("filter 'matches' requires 'pattern'"))?;
            let regex = Regex::new(pattern)
                .map_err(|err| RillError::validation(format!("invalid regex pattern: {err}")))?;
            column_matches(column, regex)
        }
        other => {
            return Err(RillError::validation(format!(
                "unknown filter comparison '{other}'"
            )))
        }
    };

    Ok(Box::new(RillFilter {
        predicate: Some(predicate),
    }))
}
