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

//! # Rill Value Module
//!
//! This module provides the dynamically typed cell value used in table
//! records, together with the type-aware total order that makes stable
//! sorting possible across heterogeneous columns.
//!
//! ## Design Principles
//!
//! - **Flexibility**: a column may hold strings, integers, floats,
//!   booleans, timestamps, nested lists, or null; no strict schema is
//!   imposed on individual cells
//! - **Total order**: [`compare_values`] never fails and never returns an
//!   incomparable pair, so every column can be sorted deterministically
//! - **Numeric family**: integers and floats compare numerically by
//!   promotion to `f64`; `as_f64` exposes the same promotion to
//!   aggregates and predicates
//!
//! ## Ordering Rules
//!
//! Null orders before any non-null value; two nulls are equal. When the
//! dynamic types of both operands match: lexicographic for strings,
//! `false < true` for booleans, chronological for timestamps,
//! element-wise then by length for lists. Integers and floats form one
//! numeric family and compare as `f64`. Any other pairing falls back to
//! comparing each operand's `Display` representation, a deliberate
//! compromise that guarantees a total order at the cost of
//! sometimes-surprising cross-type results.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Dynamically typed cell value carried by table records.
///
/// The untagged serde representation keeps serialized records natural:
/// `Int(5)` round-trips as `5`, `Str("a")` as `"a"`, `Null` as `null`.
/// Timestamps serialize as RFC 3339 strings; on deserialization a string
/// that parses as RFC 3339 becomes a `Timestamp`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RillValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Timestamp(DateTime<Utc>),
    Str(String),
    List(Vec<RillValue>),
}

impl RillValue {
    /// Short name of the dynamic type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            RillValue::Null => "null",
            RillValue::Bool(_) => "boolean",
            RillValue::Int(_) => "integer",
            RillValue::Float(_) => "float",
            RillValue::Timestamp(_) => "timestamp",
            RillValue::Str(_) => "string",
            RillValue::List(_) => "list",
        }
    }

    /// Field type hint corresponding to this value's dynamic type.
    pub fn field_type(&self) -> RillFieldType {
        match self {
            RillValue::Null => RillFieldType::Unknown,
            RillValue::Bool(_) => RillFieldType::Boolean,
            RillValue::Int(_) => RillFieldType::Integer,
            RillValue::Float(_) => RillFieldType::Float,
            RillValue::Timestamp(_) => RillFieldType::Timestamp,
            RillValue::Str(_) => RillFieldType::Text,
            RillValue::List(_) => RillFieldType::List,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RillValue::Null)
    }

    /// Numeric-family promotion. Only integers and floats are numeric;
    /// booleans and numeric-looking strings are not.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RillValue::Int(value) => Some(*value as f64),
            RillValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RillValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RillValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Converts a JSON configuration literal into a value.
    ///
    /// Strings stay strings, with no timestamp sniffing; objects have
    /// no record-cell counterpart and are kept as their serialized
    /// text.
    pub fn from_json(value: &Value) -> RillValue {
        match value {
            Value::Null => RillValue::Null,
            Value::Bool(flag) => RillValue::Bool(*flag),
            Value::Number(number) => match number.as_i64() {
                Some(int) => RillValue::Int(int),
                None => RillValue::Float(number.as_f64().unwrap_or(0.0)),
            },
            Value::String(text) => RillValue::Str(text.clone()),
            Value::Array(items) => RillValue::List(items.iter().map(RillValue::from_json).collect()),
            Value::Object(_) => RillValue::Str(value.to_string()),
        }
    }
}

impl fmt::Display for RillValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RillValue::Null => write!(f, "null"),
            RillValue::Bool(value) => write!(f, "{value}"),
            RillValue::Int(value) => write!(f, "{value}"),
            RillValue::Float(value) => write!(f, "{value}"),
            RillValue::Timestamp(value) => write!(f, "{}", value.to_rfc3339()),
            RillValue::Str(value) => write!(f, "{value}"),
            RillValue::List(items) => {
                write!(f, "[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for RillValue {
    fn from(value: &str) -> Self {
        RillValue::Str(value.to_string())
    }
}

impl From<String> for RillValue {
    fn from(value: String) -> Self {
        RillValue::Str(value)
    }
}

impl From<i64> for RillValue {
    fn from(value: i64) -> Self {
        RillValue::Int(value)
    }
}

impl From<i32> for RillValue {
    fn from(value: i32) -> Self {
        RillValue::Int(value as i64)
    }
}

impl From<f64> for RillValue {
    fn from(value: f64) -> Self {
        RillValue::Float(value)
    }
}

impl From<bool> for RillValue {
    fn from(value: bool) -> Self {
        RillValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for RillValue {
    fn from(value: DateTime<Utc>) -> Self {
        RillValue::Timestamp(value)
    }
}

impl From<Vec<RillValue>> for RillValue {
    fn from(value: Vec<RillValue>) -> Self {
        RillValue::List(value)
    }
}

impl<T: Into<RillValue>> From<Option<T>> for RillValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => RillValue::Null,
        }
    }
}

/// Type hint attached to schema fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RillFieldType {
    Text,
    Integer,
    Float,
    Boolean,
    Timestamp,
    List,
    #[default]
    Unknown,
}

/// Type-aware total order over heterogeneous values.
///
/// See the module documentation for the full rule set. NaN compares
/// equal to everything in its numeric comparison, preserving totality.
pub fn compare_values(a: &RillValue, b: &RillValue) -> Ordering {
    use RillValue::*;

    match (a, b) {
        (Null, Null) => Ordering::Equal,
        (Null, _) => Ordering::Less,
        (_, Null) => Ordering::Greater,
        (Str(left), Str(right)) => left.cmp(right),
        (Bool(left), Bool(right)) => left.cmp(right),
        (Timestamp(left), Timestamp(right)) => left.cmp(right),
        (List(left), List(right)) => compare_lists(left, right),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(left), Some(right)) => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
            _ => a.to_string().cmp(&b.to_string()),
        },
    }
}

fn compare_lists(left: &[RillValue], right: &[RillValue]) -> Ordering {
    for (a, b) in left.iter().zip(right.iter()) {
        let ordering = compare_values(a, b);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    left.len().cmp(&right.len())
}
