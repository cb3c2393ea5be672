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

use serde_json::Value;

use crate::content::RillContent;
use crate::context::RillContext;
use crate::errors::{Result, RillError};
use crate::operation::{require_table, RillOperation, RillOperationKind};

/// Truncates the record sequence to at most `count` records, keeping
/// their original relative order.
///
/// The count is signed so a negative configuration is representable and
/// rejected by validation rather than at construction.
#[derive(Clone, Debug)]
pub struct RillLimit {
    count: i64,
}

impl RillLimit {
    pub fn new(count: i64) -> Self {
        RillLimit { count }
    }
}

impl RillOperation for RillLimit {
    fn name(&self) -> &'static str {
        "limit"
    }

    fn kind(&self) -> RillOperationKind {
        RillOperationKind::Limit
    }

    fn validate(&self) -> Result<()> {
        if self.count < 0 {
            return Err(RillError::validation(format!(
                "limit count must be non-negative, got {}",
                self.count
            )));
        }
        Ok(())
    }

    fn apply(&self, content: &RillContent, _context: &RillContext) -> Result<RillContent> {
        let table = require_table(self.name(), content)?;
        self.validate()?;

        let mut output = table.clone();
        output.records.truncate(self.count as usize);
        Ok(RillContent::Table(output))
    }
}

/// Factory that constructs [`RillLimit`] from JSON configuration.
pub fn limit_factory(config: &Value) -> Result<Box<dyn RillOperation>> {
    let count = config
        .get("count")
        .and_then(Value::as_i64)
        .ok_or_else(|| RillError::validation("limit requires integer 'count'"))?;

    Ok(Box::new(RillLimit::new(count)))
}
