// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `onetap decode` and `onetap classify` command implementations.
//!
//! Offline helpers for reading identity tokens and diagnostic text pulled
//! from device logs.

use onetap_core::{OnetapError, PlatformResultCode};
use onetap_orchestrator::{ClassifiedFailure, decode, fingerprint};

/// Render the readable claims of `token` as pretty JSON.
pub fn render_decoded(token: &str) -> Result<String, OnetapError> {
    let decoded = decode(token.trim());
    if decoded.is_empty() {
        tracing::warn!(token = %fingerprint(token), "token payload could not be decoded");
    }
    serde_json::to_string_pretty(&decoded)
        .map_err(|e| OnetapError::Internal(format!("failed to serialize claims: {e}")))
}

/// Classify a diagnostic the way a failed strategy would be.
///
/// `activity_result` is the raw host result code (`-1` ok, `0` cancelled).
pub fn render_classified(diagnostic: &str, activity_result: Option<i32>) -> String {
    let code = activity_result.map(PlatformResultCode::from_activity_result);
    let failure = ClassifiedFailure::from_diagnostic(diagnostic, code);
    format!("kind: {}\n{}", failure.kind, failure.diagnostic)
}
