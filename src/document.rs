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

//! # Rill Document Module
//!
//! A document is an ordered sequence of content units plus a metadata
//! map. Pipeline execution consumes a document and produces a new one;
//! the source is never mutated, and the result's metadata carries a
//! `transform_stats` entry describing what the pipeline did.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::{RillContent, RillContentKind, RillTableContent};

/// Generic metadata map attached to a document.
///
/// Common uses include provenance (source, generation time, author),
/// rendering hints, and the pipeline's `transform_stats` entry.
pub type RillMetadata = serde_json::Map<String, Value>;

/// An ordered collection of content units with attached metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RillDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub contents: Vec<RillContent>,
    #[serde(default)]
    pub metadata: RillMetadata,
}

impl RillDocument {
    pub fn new() -> Self {
        RillDocument::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn push_content(&mut self, content: RillContent) {
        self.contents.push(content);
    }

    pub fn push_table(&mut self, table: RillTableContent) {
        self.contents.push(RillContent::Table(table));
    }

    /// Iterates over the document's table-shaped contents.
    pub fn tables(&self) -> impl Iterator<Item = &RillTableContent> {
        self.contents.iter().filter_map(RillContent::as_table)
    }

    /// Number of table-shaped content units.
    pub fn table_count(&self) -> usize {
        self.contents
            .iter()
            .filter(|content| content.kind() == RillContentKind::Table)
            .count()
    }
}
