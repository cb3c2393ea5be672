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

//! # Operations Module
//!
//! This module contains the built-in pipeline operations:
//!
//! - **filter**: keeps records matching a predicate
//! - **sort**: stable multi-key or comparator-driven ordering
//! - **limit**: truncates to the first N records
//! - **group_by**: groups records and computes aggregates
//! - **add_column**: computes a new column and evolves the schema
//!
//! Each operation is a stateless [`crate::operation::RillOperation`]
//! with a factory that constructs it from JSON configuration.

pub mod add_column;
pub mod filter;
pub mod group_by;
pub mod limit;
pub mod sort;

pub use add_column::RillAddColumn;
pub use filter::RillFilter;
pub use group_by::RillGroupBy;
pub use limit::RillLimit;
pub use sort::{RillSort, RillSortDirection, RillSortKey};
