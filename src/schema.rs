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

//! # Rill Schema Module
//!
//! Column definitions and canonical ordering for table-shaped content.
//!
//! A schema holds an ordered sequence of field descriptors plus a key
//! order that is authoritative for rendering. Invariant: the key order
//! and the field names are always a bijection; fields are stored in key
//! order. Both sequences are kept private so every mutation path
//! re-establishes the invariant.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, RillError};
use crate::value::RillFieldType;

/// Descriptor for one table column: name, type hint, optional display
/// label. The label is preserved across transformations that keep the
/// column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RillField {
    pub name: String,
    #[serde(default)]
    pub field_type: RillFieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl RillField {
    pub fn new(name: impl Into<String>, field_type: RillFieldType) -> Self {
        RillField {
            name: name.into(),
            field_type,
            label: None,
        }
    }

    /// A field with no type hint or label.
    pub fn bare(name: impl Into<String>) -> Self {
        RillField::new(name, RillFieldType::Unknown)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Ordered column definitions for one table content.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RillSchema {
    fields: Vec<RillField>,
    key_order: Vec<String>,
}

impl RillSchema {
    pub fn new() -> Self {
        RillSchema::default()
    }

    /// Builds a schema from fields; the key order follows the field
    /// order. Duplicate field names are rejected.
    pub fn from_fields(fields: Vec<RillField>) -> Result<Self> {
        let key_order: Vec<String> = fields.iter().map(|field| field.name.clone()).collect();
        RillSchema::from_parts(fields, key_order)
    }

    /// Builds a schema of bare fields from column names.
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<RillField> = columns
            .into_iter()
            .map(|column| RillField::bare(column))
            .collect();
        let key_order = fields.iter().map(|field| field.name.clone()).collect();
        RillSchema { fields, key_order }
    }

    /// Builds a schema from fields and an explicit key order, verifying
    /// the bijection invariant and storing fields in key order.
    pub fn from_parts(fields: Vec<RillField>, key_order: Vec<String>) -> Result<Self> {
        if fields.len() != key_order.len() {
            return Err(RillError::validation(format!(
                "schema has {} fields but {} keys",
                fields.len(),
                key_order.len()
            )));
        }
        let mut ordered = Vec::with_capacity(key_order.len());
        for key in &key_order {
            let field = fields
                .iter()
                .find(|field| &field.name == key)
                .cloned()
                .ok_or_else(|| {
                    RillError::validation(format!("schema key '{key}' has no matching field"))
                })?;
            if ordered.iter().any(|existing: &RillField| existing.name == field.name) {
                return Err(RillError::validation(format!(
                    "schema key '{key}' appears more than once"
                )));
            }
            ordered.push(field);
        }
        Ok(RillSchema {
            fields: ordered,
            key_order,
        })
    }

    pub fn fields(&self) -> &[RillField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&RillField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// The authoritative column order for rendering.
    pub fn key_order(&self) -> &[String] {
        &self.key_order
    }

    pub fn len(&self) -> usize {
        self.key_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_order.is_empty()
    }

    /// True when the key order and the field names form a bijection.
    pub fn is_consistent(&self) -> bool {
        self.fields.len() == self.key_order.len()
            && self
                .key_order
                .iter()
                .zip(self.fields.iter())
                .all(|(key, field)| key == &field.name)
            && {
                let mut seen: Vec<&str> = self.key_order.iter().map(String::as_str).collect();
                seen.sort_unstable();
                seen.windows(2).all(|pair| pair[0] != pair[1])
            }
    }

    /// Inserts a field, evolving the key order.
    ///
    /// With no position the field is appended; a valid position inserts
    /// it there, shifting later keys right; an out-of-range position
    /// clamps to append. Inserting a field whose name already exists
    /// replaces the descriptor in place and leaves the key order
    /// unchanged.
    pub fn insert_field(&mut self, field: RillField, position: Option<usize>) {
        if let Some(existing) = self
            .fields
            .iter_mut()
            .find(|existing| existing.name == field.name)
        {
            *existing = field;
            return;
        }
        let index = position
            .map(|position| position.min(self.key_order.len()))
            .unwrap_or(self.key_order.len());
        self.key_order.insert(index, field.name.clone());
        self.fields.insert(index, field);
    }
}
