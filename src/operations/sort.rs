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

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::RillContent;
use crate::context::RillContext;
use crate::errors::{Result, RillError};
use crate::operation::{require_table, RillOperation, RillOperationKind};
use crate::record::RillRecord;
use crate::value::compare_values;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RillSortDirection {
    Ascending,
    Descending,
}

/// One sort criterion: a column and a direction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RillSortKey {
    pub column: String,
    pub direction: RillSortDirection,
}

impl RillSortKey {
    pub fn ascending(column: impl Into<String>) -> Self {
        RillSortKey {
            column: column.into(),
            direction: RillSortDirection::Ascending,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        RillSortKey {
            column: column.into(),
            direction: RillSortDirection::Descending,
        }
    }
}

/// Comparator over two records.
pub type RillComparator = Arc<dyn Fn(&RillRecord, &RillRecord) -> Ordering + Send + Sync>;

/// Stable sort by an ordered key list or a custom comparator.
///
/// Equal-key records retain their original relative order. Multi-key
/// comparison falls through the keys in order, reversing per-key for
/// descending direction.
pub struct RillSort {
    keys: Vec<RillSortKey>,
    comparator: Option<RillComparator>,
}

impl fmt::Debug for RillSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RillSort")
            .field("keys", &self.keys)
            .field("comparator", &self.comparator.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl RillSort {
    /// Sorts by the given keys in order.
    pub fn by_keys(keys: Vec<RillSortKey>) -> Self {
        RillSort {
            keys,
            comparator: None,
        }
    }

    /// Sorts by a caller-supplied total order.
    pub fn by_comparator(
        comparator: impl Fn(&RillRecord, &RillRecord) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        RillSort {
            keys: Vec::new(),
            comparator: Some(Arc::new(comparator)),
        }
    }

    fn compare_records(&self, a: &RillRecord, b: &RillRecord) -> Ordering {
        if let Some(comparator) = &self.comparator {
            return comparator(a, b);
        }
        for key in &self.keys {
            let left = a.get(&key.column);
            let right = b.get(&key.column);
            let ordering = match (left, right) {
                (Some(left), Some(right)) => compare_values(left, right),
                (None, None) => Ordering::Equal,
                // Missing cells order like nulls: before everything.
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
            };
            let ordering = match key.direction {
                RillSortDirection::Ascending => ordering,
                RillSortDirection::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl RillOperation for RillSort {
    fn name(&self) -> &'static str {
        "sort"
    }

    fn kind(&self) -> RillOperationKind {
        RillOperationKind::Sort
    }

    fn validate(&self) -> Result<()> {
        if self.comparator.is_some() && !self.keys.is_empty() {
            return Err(RillError::validation(
                "sort keys and a custom comparator are mutually exclusive",
            ));
        }
        if self.comparator.is_none() && self.keys.is_empty() {
            return Err(RillError::validation(
                "sort requires sort keys or a comparator",
            ));
        }
        for key in &self.keys {
            if key.column.is_empty() {
                return Err(RillError::validation("sort key column may not be empty"));
            }
        }
        Ok(())
    }

    fn apply(&self, content: &RillContent, context: &RillContext) -> Result<RillContent> {
        let table = require_table(self.name(), content)?;
        self.validate()?;

        let mut output = table.clone();
        // The context is polled on every comparison. Once it reports
        // cancelled the comparator degrades to Equal, the (unspecified
        // but memory-safe) sort result is discarded, and the context
        // error is surfaced instead.
        let interrupted = Cell::new(false);
        output.records.sort_by(|a, b| {
            if interrupted.get() {
                return Ordering::Equal;
            }
            if context.is_cancelled() {
                interrupted.set(true);
                return Ordering::Equal;
            }
            self.compare_records(a, b)
        });
        if interrupted.get() {
            context.checkpoint("sort")?;
        }
        Ok(RillContent::Table(output))
    }
}

/// Factory that constructs [`RillSort`] from JSON configuration.
///
/// Expected shape: `{"keys": [{"column": <name>, "direction":
/// "ascending"|"descending"}, ..]}`; direction defaults to ascending.
pub fn sort_factory(config: &Value) -> Result<Box<dyn RillOperation>> {
    let obj = config
        .as_object()
        .ok_or_else(|| RillError::validation("sort config must be an object"))?;

    let keys = obj
        .get("keys")
        .and_then(Value::as_array)
        .ok_or_else(|| RillError::validation("sort requires array 'keys'"))?;
    if keys.is_empty() {
        return Err(RillError::validation("sort 'keys' may not be empty"));
    }

    let mut sort_keys = Vec::with_capacity(keys.len());
    for key in keys {
        let entry = key
            .as_object()
            .ok_or_else(|| RillError::validation("sort keys must be objects"))?;
        let column = entry
            .get("column")
            .and_then(Value::as_str)
            .ok_or_else(|| RillError::validation("sort key requires string 'column'"))?;
        let direction = match entry.get("direction").and_then(Value::as_str) {
            None | Some("ascending") => RillSortDirection::Ascending,
            Some("descending") => RillSortDirection::Descending,
            Some(other) => {
                return Err(RillError::validation(format!(
                    "unknown sort direction '{other}'"
                )))
            }
        };
        sort_keys.push(RillSortKey {
            column: column.to_string(),
            direction,
        });
    }

    Ok(Box::new(RillSort::by_keys(sort_keys)))
}
