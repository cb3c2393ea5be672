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

//! # Rill Statistics Module
//!
//! Execution statistics attached to a transformed document's metadata
//! under the `transform_stats` key. Statistics are informational only
//! and never affect transformation results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Timing and throughput of one pipeline stage, accumulated across all
/// table contents the stage ran against.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RillOperationStats {
    pub operation: String,
    pub duration_ms: f64,
    pub records_out: usize,
}

/// Aggregate statistics for one pipeline execution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RillTransformStats {
    pub input_records: usize,
    pub output_records: usize,
    pub filtered_records: usize,
    pub total_duration_ms: f64,
    pub operations: Vec<RillOperationStats>,
}

impl RillTransformStats {
    /// JSON form for attachment to document metadata.
    pub fn as_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
