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

use std::collections::HashMap;

use serde_json::Value;

use crate::aggregate::RillAggregate;
use crate::content::{RillContent, RillTableContent};
use crate::context::RillContext;
use crate::errors::{Result, RillError};
use crate::operation::{require_table, RillOperation, RillOperationKind};
use crate::record::RillRecord;
use crate::schema::{RillField, RillSchema};
use crate::value::RillValue;

/// Separates group column values inside the grouping key. The unit
/// separator cannot appear in rendered column text, keeping keys
/// collision-resistant.
const GROUP_KEY_SEPARATOR: char = '\u{1f}';

/// One aggregate output: column name, optional explicit source field,
/// and the reducer.
#[derive(Clone, Debug)]
struct AggregateBinding {
    output: String,
    field: Option<String>,
    func: RillAggregate,
}

/// Groups records by one or more columns and emits one record per
/// group, in first-seen order.
///
/// Each result record carries the group column values of the group's
/// first member plus one value per aggregate. The aggregate's source
/// field is the explicit binding when given; otherwise it is inferred
/// from the output column name (`sum_`/`total_`/`avg_`/`average_`/
/// `min_`/`max_` prefixes, then a trailing plural `s`), falling back to
/// the aggregate's own name.
#[derive(Clone, Debug)]
pub struct RillGroupBy {
    columns: Vec<String>,
    aggregates: Vec<AggregateBinding>,
}

impl RillGroupBy {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RillGroupBy {
            columns: columns.into_iter().map(Into::into).collect(),
            aggregates: Vec::new(),
        }
    }

    /// Adds an aggregate whose source field is inferred from `output`.
    pub fn aggregate(mut self, output: impl Into<String>, func: RillAggregate) -> Self {
        self.aggregates.push(AggregateBinding {
            output: output.into(),
            field: None,
            func,
        });
        self
    }

    /// Adds an aggregate bound to an explicit source field.
    pub fn aggregate_on(
        mut self,
        output: impl Into<String>,
        field: impl Into<String>,
        func: RillAggregate,
    ) -> Self {
        self.aggregates.push(AggregateBinding {
            output: output.into(),
            field: Some(field.into()),
            func,
        });
        self
    }

    fn group_key(&self, record: &RillRecord) -> String {
        let mut key = String::new();
        for (index, column) in self.columns.iter().enumerate() {
            if index > 0 {
                key.push(GROUP_KEY_SEPARATOR);
            }
            match record.get(column) {
                Some(value) => key.push_str(&value.to_string()),
                None => key.push_str("null"),
            }
        }
        key
    }
}

/// Best-effort source-field inference from an output column name.
fn infer_source_field(output: &str, aggregate: &str) -> String {
    const PREFIXES: [&str; 6] = ["sum_", "total_", "avg_", "average_", "min_", "max_"];
    for prefix in PREFIXES {
        if let Some(rest) = output.strip_prefix(prefix) {
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    if output.len() > 1 && output.ends_with('s') {
        return output[..output.len() - 1].to_string();
    }
    aggregate.to_string()
}

impl RillOperation for RillGroupBy {
    fn name(&self) -> &'static str {
        "group_by"
    }

    fn kind(&self) -> RillOperationKind {
        RillOperationKind::GroupBy
    }

    fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(RillError::validation(
                "group_by requires at least one group column",
            ));
        }
        if self.columns.iter().any(String::is_empty) {
            return Err(RillError::validation(
                "group_by column names may not be empty",
            ));
        }
        if self.aggregates.is_empty() {
            return Err(RillError::validation(
                "group_by requires at least one aggregate",
            ));
        }
        if self.aggregates.iter().any(|binding| binding.output.is_empty()) {
            return Err(RillError::validation(
                "group_by aggregate names may not be empty",
            ));
        }
        Ok(())
    }

    fn apply(&self, content: &RillContent, context: &RillContext) -> Result<RillContent> {
        let table = require_table(self.name(), content)?;
        self.validate()?;

        // First-seen order, not hash order, so output is deterministic.
        let mut key_index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<Vec<RillRecord>> = Vec::new();
        for record in &table.records {
            context.checkpoint("group_by")?;
            let key = self.group_key(record);
            match key_index.get(&key) {
                Some(&index) => groups[index].push(record.clone()),
                None => {
                    key_index.insert(key, groups.len());
                    groups.push(vec![record.clone()]);
                }
            }
        }

        let mut records = Vec::with_capacity(groups.len());
        for members in &groups {
            let first = &members[0];
            let mut output = RillRecord::new();
            for column in &self.columns {
                output.set(
                    column.clone(),
                    first.get(column).cloned().unwrap_or(RillValue::Null),
                );
            }
            for binding in &self.aggregates {
                let field = binding
                    .field
                    .clone()
                    .unwrap_or_else(|| infer_source_field(&binding.output, binding.func.name()));
                let value = binding.func.compute(members, &field)?;
                output.set(binding.output.clone(), value);
            }
            records.push(output);
        }

        // Key order becomes group columns followed by aggregate outputs;
        // group columns keep their original field metadata.
        let width = self.columns.len() + self.aggregates.len();
        let mut fields = Vec::with_capacity(width);
        let mut keys = Vec::with_capacity(width);
        for column in &self.columns {
            keys.push(column.clone());
            fields.push(
                table
                    .schema
                    .field(column)
                    .cloned()
                    .unwrap_or_else(|| RillField::bare(column.clone())),
            );
        }
        for binding in &self.aggregates {
            keys.push(binding.output.clone());
            let field_type = records
                .first()
                .and_then(|record| record.get(&binding.output))
                .map(RillValue::field_type)
                .unwrap_or_default();
            fields.push(RillField::new(binding.output.clone(), field_type));
        }
        let schema = RillSchema::from_parts(fields, keys)?;

        Ok(RillContent::Table(RillTableContent {
            id: table.id.clone(),
            title: table.title.clone(),
            schema,
            records,
        }))
    }
}

/// Factory that constructs [`RillGroupBy`] from JSON configuration.
///
/// Expected shape: `{"columns": [..], "aggregates": [{"output": <name>,
/// "field": <name?>, "func": "count"|"sum"|"average"|"min"|"max"}, ..]}`.
pub fn group_by_factory(config: &Value) -> Result<Box<dyn RillOperation>> {
    let obj = config
        .as_object()
        .ok_or_else(|| RillError::validation("group_by config must be an object"))?;

    let columns = obj
        .get("columns")
        .and_then(Value::as_array)
        .ok_or_else(|| RillError::validation("group_by requires array 'columns'"))?
        .iter()
        .map(|value| {
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| RillError::validation("group_by columns must be strings"))
        })
        .collect::<Result<Vec<_>>>()?;

    let aggregates = obj
        .get("aggregates")
        .and_then(Value::as_array)
        .ok_or_else(|| RillError::validation("group_by requires array 'aggregates'"))?;

    let mut operation = RillGroupBy::new(columns);
    for entry in aggregates {
        let item = entry
            .as_object()
            .ok_or_else(|| RillError::validation("group_by aggregates must be objects"))?;
        let output = item
            .get("output")
            .and_then(Value::as_str)
            .ok_or_else(|| RillError::validation("aggregate requires string 'output'"))?;
        let func = match item.get("func").and_then(Value::as_str) {
            Some("count") => RillAggregate::count(),
            Some("sum") => RillAggregate::sum(),
            Some("average") => RillAggregate::average(),
            Some("min") => RillAggregate::min(),
            Some("max") => RillAggregate::max(),
            Some(other) => {
                return Err(RillError::validation(format!(
                    "unknown aggregate function '{other}'"
                )))
            }
            None => return Err(RillError::validation("aggregate requires string 'func'")),
        };
        operation = match item.get("field").and_then(Value::as_str) {
            Some(field) => operation.aggregate_on(output, field, func),
            None => operation.aggregate(output, func),
        };
    }

    Ok(Box::new(operation))
}
