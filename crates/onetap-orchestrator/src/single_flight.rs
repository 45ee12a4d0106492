// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! At most one sign-in run per orchestrator instance.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Admission flag for sign-in runs.
///
/// Re-entrant requests are rejected, not queued.
#[derive(Debug, Default)]
pub struct SingleFlight {
    in_progress: Arc<AtomicBool>,
}

/// Proof of admission. Releases the flight when dropped, on every exit path.
///
/// The permit is owned, so it can move into the task that drives the
/// external operation and outlive the request that acquired it.
#[derive(Debug)]
#[must_use = "the flight is released as soon as the permit is dropped"]
pub struct FlightPermit {
    in_progress: Arc<AtomicBool>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically enters the flight. `None` means a run is already active.
    pub fn try_enter(&self) -> Option<FlightPermit> {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightPermit {
                in_progress: Arc::clone(&self.in_progress),
            })
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }
}

impl Drop for FlightPermit {
    fn drop(&mut self) {
        self.in_progress.store(false, Ordering::Release);
    }
}
