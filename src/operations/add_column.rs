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

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::content::RillContent;
use crate::context::RillContext;
use crate::errors::{Result, RillError};
use crate::operation::{require_table, RillOperation, RillOperationKind};
use crate::record::RillRecord;
use crate::schema::RillField;
use crate::value::RillValue;

/// Computes one value per record for a new column.
pub type RillCompute = Arc<dyn Fn(&RillRecord) -> Result<RillValue> + Send + Sync>;

/// Assigns a computed column to every record and evolves the schema.
///
/// With no position the column is appended to the key order; a valid
/// position inserts it there, shifting later keys right; an
/// out-of-range position clamps to append. The new column gets a bare
/// field descriptor; existing field metadata is preserved. The position
/// is signed so a negative configuration is representable and rejected
/// by validation.
pub struct RillAddColumn {
    name: String,
    compute: Option<RillCompute>,
    position: Option<i64>,
}

impl fmt::Debug for RillAddColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RillAddColumn")
            .field("name", &self.name)
            .field("compute", &self.compute.as_ref().map(|_| "<fn>"))
            .field("position", &self.position)
            .finish()
    }
}

impl RillAddColumn {
    pub fn new(
        name: impl Into<String>,
        compute: impl Fn(&RillRecord) -> Result<RillValue> + Send + Sync + 'static,
    ) -> Self {
        RillAddColumn {
            name: name.into(),
            compute: Some(Arc::new(compute)),
            position: None,
        }
    }

    /// Requests insertion at a key-order position instead of appending.
    pub fn at_position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }
}

impl RillOperation for RillAddColumn {
    fn name(&self) -> &'static str {
        "add_column"
    }

    fn kind(&self) -> RillOperationKind {
        RillOperationKind::AddColumn
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(RillError::validation("add_column name may not be empty"));
        }
        if self.compute.is_none() {
            return Err(RillError::validation(
                "add_column requires a compute function",
            ));
        }
        if let Some(position) = self.position {
            if position < 0 {
                return Err(RillError::validation(format!(
                    "add_column position must be non-negative, got {position}"
                )));
            }
        }
        Ok(())
    }

    fn apply(&self, content: &RillContent, context: &RillContext) -> Result<RillContent> {
        let table = require_table(self.name(), content)?;
        self.validate()?;
        let compute = self
            .compute
            .as_ref()
            .ok_or_else(|| RillError::validation("add_column requires a compute function"))?;

        let mut output = table.clone();
        for record in &mut output.records {
            context.checkpoint("add_column")?;
            let value = compute(record)
                .map_err(|err| RillError::operation(self.name(), err.to_string()))?;
            record.set(self.name.clone(), value);
        }
        output.schema.insert_field(
            RillField::bare(self.name.clone()),
            self.position.map(|position| position as usize),
        );
        Ok(RillContent::Table(output))
    }
}

/// Factory that constructs [`RillAddColumn`] from JSON configuration.
///
/// Expected shape: `{"name": <column>, "position": <index?>, ..}` with
/// either `"value"` (a constant assigned to every record) or
/// `"copy_from"` (another column to duplicate).
pub fn add_column_factory(config: &Value) -> Result<Box<dyn RillOperation>> {
    let obj = config
        .as_object()
        .ok_or_else(|| RillError::validation("add_column config must be an object"))?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| RillError::validation("add_column requires string 'name'"))?
        .to_string();

    let operation = match (obj.get("value"), obj.get("copy_from").and_then(Value::as_str)) {
        (Some(constant), None) => {
            let constant = RillValue::from_json(constant);
            RillAddColumn::new(name, move |_record| Ok(constant.clone()))
        }
        (None, Some(source)) => {
            let source = source.to_string();
            RillAddColumn::new(name, move |record| {
                Ok(record.get(&source).cloned().unwrap_or(RillValue::Null))
            })
        }
        _ => {
            return Err(RillError::validation(
                "add_column requires exactly one of 'value' or 'copy_from'",
            ))
        }
    };

    let operation = match obj.get("position").and_then(Value::as_i64) {
        Some(position) => operation.at_position(position),
        None => operation,
    };

    Ok(Box::new(operation))
}
