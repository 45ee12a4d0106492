// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Onetap sign-in orchestrator.
//!
//! Sign-in failures reported by the identity platform are *not* errors: they
//! travel as [`SignInAttemptResult::Failure`](crate::types::SignInAttemptResult)
//! values. `OnetapError` only covers conditions that prevent a run from
//! starting at all, plus failures of calls outside the strategy chain.

use thiserror::Error;

use crate::types::PlatformFailure;

/// The primary error type returned across the Onetap crates.
#[derive(Debug, Error)]
pub enum OnetapError {
    /// Invalid setup detected before any external call was made
    /// (missing or malformed client id, empty strategy list).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A sign-in run is already in flight on this orchestrator instance.
    #[error("a sign-in attempt is already in progress")]
    SignInInProgress,

    /// An identity platform call outside the strategy chain failed.
    #[error("platform error: {message}")]
    Platform {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl OnetapError {
    /// Returns `true` for errors raised synchronously before any strategy ran.
    pub fn is_configuration(&self) -> bool {
        matches!(self, OnetapError::Configuration(_))
    }
}

impl From<PlatformFailure> for OnetapError {
    fn from(failure: PlatformFailure) -> Self {
        OnetapError::Platform {
            message: failure.to_string(),
            source: Some(Box::new(failure)),
        }
    }
}
