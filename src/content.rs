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

//! # Rill Content Module
//!
//! Content units that make up a document. Table-shaped content carries a
//! schema and records and is what the transformation pipeline operates
//! on; other kinds pass through a pipeline unchanged.
//!
//! All content is fully owned, so `Clone` is a deep copy: a cloned table
//! shares no schema, record, or per-record state with the original.

use serde::{Deserialize, Serialize};

use crate::record::RillRecord;
use crate::schema::RillSchema;

/// Content-kind discriminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RillContentKind {
    Table,
    Text,
}

impl RillContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RillContentKind::Table => "table",
            RillContentKind::Text => "text",
        }
    }
}

/// Table-shaped content: a schema plus an owned record sequence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RillTableContent {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub schema: RillSchema,
    pub records: Vec<RillRecord>,
}

impl RillTableContent {
    pub fn new(id: impl Into<String>, schema: RillSchema) -> Self {
        RillTableContent {
            id: id.into(),
            title: None,
            schema,
            records: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_records(mut self, records: Vec<RillRecord>) -> Self {
        self.records = records;
        self
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// Free-form text content; opaque to the transformation pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RillTextContent {
    pub id: String,
    pub body: String,
}

impl RillTextContent {
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        RillTextContent {
            id: id.into(),
            body: body.into(),
        }
    }
}

/// One content unit of a document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RillContent {
    Table(RillTableContent),
    Text(RillTextContent),
}

impl RillContent {
    pub fn kind(&self) -> RillContentKind {
        match self {
            RillContent::Table(_) => RillContentKind::Table,
            RillContent::Text(_) => RillContentKind::Text,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            RillContent::Table(table) => &table.id,
            RillContent::Text(text) => &text.id,
        }
    }

    pub fn as_table(&self) -> Option<&RillTableContent> {
        match self {
            RillContent::Table(table) => Some(table),
            _ => None,
        }
    }
}
