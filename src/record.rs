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

//! # Rill Record Module
//!
//! This module provides the row representation for tabular content.
//! A record maps column names to dynamically typed [`RillValue`]s and is
//! the fundamental unit of data that flows through Rill pipelines.
//!
//! ## Design Principles
//!
//! - **Flexibility**: records impose no schema of their own; the owning
//!   table's [`crate::schema::RillSchema`] carries column order and type
//!   hints
//! - **Determinism**: the backing map is ordered, so iteration and
//!   serialization are stable across runs
//! - **Immutability-friendly**: `Clone` produces a fully independent
//!   deep copy, which is what the pipeline's clone-before-mutate
//!   discipline relies on

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::RillValue;

/// One row of tabular content: a mapping from column name to value.
///
/// Records are owned by whichever table content currently holds them and
/// are always deep-copied on clone. Missing columns are distinct from
/// columns holding [`RillValue::Null`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RillRecord {
    values: BTreeMap<String, RillValue>,
}

impl RillRecord {
    /// Constructs an empty record.
    pub fn new() -> Self {
        RillRecord::default()
    }

    /// Returns the value stored under `column`, if any.
    pub fn get(&self, column: &str) -> Option<&RillValue> {
        self.values.get(column)
    }

    /// Stores `value` under `column`, replacing any previous value.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<RillValue>) {
        self.values.insert(column.into(), value.into());
    }

    /// Removes and returns the value stored under `column`.
    pub fn remove(&mut self, column: &str) -> Option<RillValue> {
        self.values.remove(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Iterates over the column names present in this record.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterates over (column, value) pairs in column-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RillValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, RillValue)> for RillRecord {
    fn from_iter<I: IntoIterator<Item = (String, RillValue)>>(iter: I) -> Self {
        RillRecord {
            values: iter.into_iter().collect(),
        }
    }
}

/// Convenience alias for working on batches of records.
pub type RillRecordBatch = Vec<RillRecord>;
