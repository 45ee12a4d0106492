// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the orchestrator, platform adapters and callers.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::OnetapError;

/// Suffix every web-application OAuth client id carries.
pub const WEB_CLIENT_ID_SUFFIX: &str = "apps.googleusercontent.com";

/// Classified reason for a sign-in attempt that produced no token.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The user dismissed the sign-in UI.
    Cancelled,
    /// No stored or selectable credential exists for this app.
    NoCredentialAvailable,
    /// The identity service dependency is missing or out of date.
    ServiceUnavailable,
    /// No network, or the caller is not whitelisted for the API.
    NetworkOrConfigIssue,
    /// Anything the classifier does not recognise.
    Unknown,
}

/// Result code delivered by the host UI bridge when a dialog closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformResultCode {
    Ok,
    /// User dismissed the dialog or pressed back.
    Cancelled,
    /// The flow was interrupted by the system and may be retried.
    Interrupted,
    Other(i32),
}

impl PlatformResultCode {
    /// Maps a raw Android activity result code (`RESULT_OK = -1`, `RESULT_CANCELED = 0`).
    pub fn from_activity_result(code: i32) -> Self {
        match code {
            -1 => PlatformResultCode::Ok,
            0 => PlatformResultCode::Cancelled,
            other => PlatformResultCode::Other(other),
        }
    }
}

impl fmt::Display for PlatformResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformResultCode::Ok => write!(f, "RESULT_OK"),
            PlatformResultCode::Cancelled => write!(f, "RESULT_CANCELED"),
            PlatformResultCode::Interrupted => write!(f, "RESULT_INTERRUPTED"),
            PlatformResultCode::Other(code) => write!(f, "RESULT_CODE({code})"),
        }
    }
}

/// Family of platform mechanisms. Sign-out is performed once per family.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum StrategyFamily {
    /// Account-chooser sheet returning an ID token (auto-select and prompt).
    OneTap,
    /// Explicit "Sign in with Google" button flow.
    Button,
}

impl StrategyFamily {
    pub const ALL: [StrategyFamily; 2] = [StrategyFamily::OneTap, StrategyFamily::Button];
}

/// A validated web-application OAuth client id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Parses a client id, rejecting blanks and non web-application ids.
    pub fn parse(raw: &str) -> Result<Self, OnetapError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(OnetapError::Configuration(
                "client id must not be empty".to_string(),
            ));
        }
        if !trimmed.ends_with(WEB_CLIENT_ID_SUFFIX) {
            return Err(OnetapError::Configuration(format!(
                "client id must end with '{WEB_CLIENT_ID_SUFFIX}' but is: {trimmed}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a platform needs to launch one strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInRequest {
    /// Human name of the strategy, used in logs and results.
    pub strategy: String,
    pub family: StrategyFamily,
    /// Only offer accounts that previously authorized this app.
    pub filter_to_authorized_accounts: bool,
    /// Let the platform pick the single matching account without a tap.
    pub auto_select: bool,
    pub client_id: ClientId,
    pub nonce: String,
}

/// The single callback the host UI bridge delivers for a launched dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformCallback {
    pub result_code: PlatformResultCode,
    /// Opaque platform payload, present when the dialog reported success.
    pub payload: Option<serde_json::Value>,
    /// Optional diagnostic supplied alongside a non-OK result code.
    pub message: Option<String>,
}

impl PlatformCallback {
    pub fn ok(payload: serde_json::Value) -> Self {
        Self {
            result_code: PlatformResultCode::Ok,
            payload: Some(payload),
            message: None,
        }
    }

    pub fn cancelled() -> Self {
        Self::with_code(PlatformResultCode::Cancelled, None)
    }

    pub fn with_code(result_code: PlatformResultCode, message: Option<String>) -> Self {
        Self {
            result_code,
            payload: None,
            message,
        }
    }
}

/// A failed external call, described by raw diagnostic text and an optional code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformFailure {
    pub diagnostic: String,
    pub result_code: Option<PlatformResultCode>,
}

impl PlatformFailure {
    pub fn new(diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostic: diagnostic.into(),
            result_code: None,
        }
    }

    pub fn with_code(diagnostic: impl Into<String>, result_code: PlatformResultCode) -> Self {
        Self {
            diagnostic: diagnostic.into(),
            result_code: Some(result_code),
        }
    }
}

impl fmt::Display for PlatformFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.result_code {
            Some(code) => write!(f, "{} ({code})", self.diagnostic),
            None => f.write_str(&self.diagnostic),
        }
    }
}

impl std::error::Error for PlatformFailure {}

/// Account details the platform returns next to the ID token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub profile_picture_uri: Option<String>,
}

/// Credential fields extracted from a successful callback payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id_token: String,
    #[serde(flatten)]
    pub profile: CredentialProfile,
}

/// Best-effort readable view of an identity token's payload segment.
///
/// All fields are `None` when the token could not be decoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodedToken {
    /// The `sub` claim: a stable id for the user.
    pub subject: Option<String>,
    pub email: Option<String>,
    /// The full claim set. Signature is never verified.
    pub raw_claims: Option<serde_json::Map<String, serde_json::Value>>,
}

impl DecodedToken {
    pub fn is_empty(&self) -> bool {
        self.subject.is_none() && self.email.is_none() && self.raw_claims.is_none()
    }
}

/// Terminal outcome of a sign-in run. Exactly one variant is populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SignInAttemptResult {
    Success {
        id_token: String,
        claims: DecodedToken,
        profile: CredentialProfile,
        /// Name of the strategy that produced the token.
        strategy: String,
    },
    Failure {
        reason: ErrorKind,
        diagnostic: String,
        /// Name of the strategy whose failure ended the run.
        strategy: String,
    },
}

impl SignInAttemptResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SignInAttemptResult::Success { .. })
    }

    pub fn id_token(&self) -> Option<&str> {
        match self {
            SignInAttemptResult::Success { id_token, .. } => Some(id_token),
            SignInAttemptResult::Failure { .. } => None,
        }
    }

    pub fn claims(&self) -> Option<&DecodedToken> {
        match self {
            SignInAttemptResult::Success { claims, .. } => Some(claims),
            SignInAttemptResult::Failure { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            SignInAttemptResult::Success { .. } => None,
            SignInAttemptResult::Failure { reason, .. } => Some(*reason),
        }
    }

    pub fn strategy(&self) -> &str {
        match self {
            SignInAttemptResult::Success { strategy, .. }
            | SignInAttemptResult::Failure { strategy, .. } => strategy,
        }
    }

    /// A failure the caller should treat as an application error.
    ///
    /// User cancellation is an expected choice and is excluded.
    pub fn is_application_error(&self) -> bool {
        matches!(
            self,
            SignInAttemptResult::Failure { reason, .. } if *reason != ErrorKind::Cancelled
        )
    }
}

/// Sign-out result for a single strategy family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignOutOutcome {
    pub family: StrategyFamily,
    pub error: Option<String>,
}

impl SignOutOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregated sign-out results, one entry per family that was signed out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignOutReport {
    pub outcomes: Vec<SignOutOutcome>,
}

impl SignOutReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(SignOutOutcome::is_success)
    }
}
