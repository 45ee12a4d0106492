// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-use settlement cell bridging platform callbacks into a future.
//!
//! A fresh [`completion_channel`] is created for every strategy launch. The
//! [`CompletionHandle`] goes to the platform, which may clone it into
//! whatever listener it registers; the [`PendingCompletion`] stays with the
//! orchestrator. The first [`CompletionHandle::complete`] call settles the
//! attempt. Later calls are ignored and logged.

use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::types::PlatformCallback;

/// Producer side of an attempt. Cheap to clone; all clones share one slot.
#[derive(Debug, Clone)]
pub struct CompletionHandle {
    slot: Arc<Mutex<Option<oneshot::Sender<PlatformCallback>>>>,
    strategy: Arc<str>,
}

/// Consumer side of an attempt, awaited by the orchestrator.
#[derive(Debug)]
pub struct PendingCompletion {
    receiver: oneshot::Receiver<PlatformCallback>,
}

/// Creates an unsettled completion pair for one strategy launch.
pub fn completion_channel(strategy: &str) -> (CompletionHandle, PendingCompletion) {
    let (sender, receiver) = oneshot::channel();
    let handle = CompletionHandle {
        slot: Arc::new(Mutex::new(Some(sender))),
        strategy: Arc::from(strategy),
    };
    (handle, PendingCompletion { receiver })
}

impl CompletionHandle {
    /// Settles the attempt with `callback`.
    ///
    /// Returns `true` if this call settled the attempt, `false` if it had
    /// already been settled (the callback is dropped in that case).
    pub fn complete(&self, callback: PlatformCallback) -> bool {
        let sender = match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        match sender {
            Some(sender) => {
                debug!(
                    strategy = %self.strategy,
                    result_code = %callback.result_code,
                    "sign-in attempt settled"
                );
                if sender.send(callback).is_err() {
                    debug!(strategy = %self.strategy, "attempt settled after waiter went away");
                }
                true
            }
            None => {
                warn!(
                    strategy = %self.strategy,
                    result_code = %callback.result_code,
                    "duplicate completion ignored, attempt already settled"
                );
                false
            }
        }
    }

    /// Whether the attempt has been settled through any clone of this handle.
    pub fn is_settled(&self) -> bool {
        match self.slot.lock() {
            Ok(slot) => slot.is_none(),
            Err(poisoned) => poisoned.into_inner().is_none(),
        }
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }
}

impl PendingCompletion {
    /// Waits for the attempt to settle.
    ///
    /// Returns `None` if every handle was dropped without delivering a result.
    pub async fn wait(self) -> Option<PlatformCallback> {
        self.receiver.await.ok()
    }
}
