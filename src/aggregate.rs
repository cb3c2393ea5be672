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

//! # Rill Aggregate Module
//!
//! Pure reducers over record groups, used by the group-by operation.
//!
//! The built-in aggregates ignore non-numeric values and default to
//! numeric zero on empty input: Count returns an integer and ignores
//! the field; Sum, Average, Min, and Max operate in the `f64` numeric
//! family (the same promotion the value comparator uses) and return
//! floats.

use std::fmt;
use std::sync::Arc;

use crate::errors::Result;
use crate::record::RillRecord;
use crate::value::RillValue;

type AggregateFn = dyn Fn(&[RillRecord], &str) -> Result<RillValue> + Send + Sync;

/// Named pure function from a record group and a field name to a value.
#[derive(Clone)]
pub struct RillAggregate {
    name: String,
    func: Arc<AggregateFn>,
}

impl fmt::Debug for RillAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RillAggregate")
            .field("name", &self.name)
            .finish()
    }
}

impl RillAggregate {
    /// Wraps a caller-supplied reducer. Errors returned by the closure
    /// surface with their cause preserved in the pipeline's stage
    /// context.
    pub fn custom(
        name: impl Into<String>,
        func: impl Fn(&[RillRecord], &str) -> Result<RillValue> + Send + Sync + 'static,
    ) -> Self {
        RillAggregate {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Number of records in the group; the field name is ignored.
    pub fn count() -> Self {
        RillAggregate::custom("count", |records, _field| {
            Ok(RillValue::Int(records.len() as i64))
        })
    }

    /// Sum of the field's numeric values.
    pub fn sum() -> Self {
        RillAggregate::custom("sum", |records, field| {
            Ok(RillValue::Float(numeric_values(records, field).sum()))
        })
    }

    /// Mean of the field's numeric values; zero when none are numeric.
    pub fn average() -> Self {
        RillAggregate::custom("average", |records, field| {
            let values: Vec<f64> = numeric_values(records, field).collect();
            if values.is_empty() {
                return Ok(RillValue::Float(0.0));
            }
            Ok(RillValue::Float(
                values.iter().sum::<f64>() / values.len() as f64,
            ))
        })
    }

    /// Smallest numeric value of the field; zero when none are numeric.
    pub fn min() -> Self {
        RillAggregate::custom("min", |records, field| {
            Ok(RillValue::Float(
                numeric_values(records, field).fold(None, |acc: Option<f64>, value| {
                    Some(acc.map_or(value, |best| best.min(value)))
                })
                .unwrap_or(0.0),
            ))
        })
    }

    /// Largest numeric value of the field; zero when none are numeric.
    pub fn max() -> Self {
        RillAggregate::custom("max", |records, field| {
            Ok(RillValue::Float(
                numeric_values(records, field).fold(None, |acc: Option<f64>, value| {
                    Some(acc.map_or(value, |best| best.max(value)))
                })
                .unwrap_or(0.0),
            ))
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the reducer over a record group.
    pub fn compute(&self, records: &[RillRecord], field: &str) -> Result<RillValue> {
        (self.func)(records, field)
    }
}

fn numeric_values<'a>(
    records: &'a [RillRecord],
    field: &'a str,
) -> impl Iterator<Item = f64> + 'a {
    records
        .iter()
        .filter_map(move |record| record.get(field).and_then(RillValue::as_f64))
}
