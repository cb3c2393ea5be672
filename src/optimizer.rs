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

//! # Rill Optimizer Module
//!
//! Reorders an operation list for efficiency without changing results.
//!
//! The order is a fixed five-bucket priority over
//! [`RillOperationKind`]: Filter → AddColumn → GroupBy → Sort → Limit,
//! with unrecognized (custom) kinds after everything else. Filtering
//! shrinks the working set before anything else runs; computed columns
//! must exist before grouping or sorting can reference them; grouping
//! shrinks the set again before the costlier sort; limiting last keeps
//! "top N of the final result" semantics. Operations within one bucket
//! keep their original relative order. This is a fixed reordering, not
//! a cost-based planner.

use crate::operation::{RillOperation, RillOperationKind};

fn bucket(kind: RillOperationKind) -> usize {
    match kind {
        RillOperationKind::Filter => 0,
        RillOperationKind::AddColumn => 1,
        RillOperationKind::GroupBy => 2,
        RillOperationKind::Sort => 3,
        RillOperationKind::Limit => 4,
        RillOperationKind::Custom => 5,
    }
}

/// Stable reordering of an operation list into bucket priority order.
// TODO: fuse adjacent filter stages into a single pass over the records.
pub fn optimize(mut operations: Vec<Box<dyn RillOperation>>) -> Vec<Box<dyn RillOperation>> {
    operations.sort_by_key(|operation| bucket(operation.kind()));
    operations
}
