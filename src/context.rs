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

//! # Rill Context Module
//!
//! Cooperative cancellation for pipeline execution.
//!
//! A context carries a shared cancel flag and an optional deadline.
//! Clones share the flag, so a caller can keep one clone and hand
//! another to [`crate::pipeline::RillPipeline::execute`]; calling
//! [`RillContext::cancel`] on either side stops the execution at its
//! next suspension point. Execution checks the context before each
//! content item, before each operation, between records inside
//! record-wise operations, and on each comparison inside sorts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::errors::{Result, RillError};

/// Shared cancellation token with an optional deadline.
#[derive(Clone, Debug, Default)]
pub struct RillContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl RillContext {
    /// A context that never expires and is not cancelled.
    pub fn new() -> Self {
        RillContext::default()
    }

    /// A fresh context whose deadline is `timeout` from now.
    pub fn with_deadline(timeout: Duration) -> Self {
        RillContext {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Derives a context sharing this one's cancel flag with a deadline
    /// no later than `timeout` from now.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(existing) => Some(existing.min(candidate)),
            None => Some(candidate),
        };
        RillContext {
            cancelled: Arc::clone(&self.cancelled),
            deadline,
        }
    }

    /// Signals cancellation to every clone of this context.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// True when the flag is set or the deadline has passed.
    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            return true;
        }
        matches!(self.deadline, Some(deadline) if Instant::now() >= deadline)
    }

    /// Fails with a cancellation error when the context is done.
    ///
    /// `stage` names the suspension point and ends up in the error, so
    /// callers can tell where the execution stopped.
    pub fn checkpoint(&self, stage: &str) -> Result<()> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Err(RillError::cancelled(stage, "execution cancelled"));
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(RillError::cancelled(stage, "deadline exceeded"));
            }
        }
        Ok(())
    }
}
