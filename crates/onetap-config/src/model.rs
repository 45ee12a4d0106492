// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Onetap sign-in orchestrator.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Onetap configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OnetapConfig {
    /// OAuth client identity used for every sign-in request.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Whether a failed strategy hands over to the next one in its mode.
    #[serde(default)]
    pub fallback: FallbackConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// OAuth client identity configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    /// Client ID of type "Web application" (not the Android or iOS client id).
    /// Must end with `apps.googleusercontent.com`.
    #[serde(default)]
    pub client_id: Option<String>,

    /// Nonce embedded in issued ID tokens. Generated at startup when unset.
    #[serde(default)]
    pub nonce: Option<String>,
}

/// Per-mode fallback policy.
///
/// A cancelled attempt never falls back regardless of these flags.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FallbackConfig {
    /// Continue to the prompt strategy after a failed auto sign-in.
    #[serde(default = "default_true")]
    pub auto: bool,

    /// Continue to the button flow after a failed prompt.
    #[serde(default = "default_true")]
    pub prompt: bool,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            auto: true,
            prompt: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
