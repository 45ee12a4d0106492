// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as the client id shape and the set of accepted log levels.

use onetap_core::ClientId;

use crate::diagnostic::ConfigError;
use crate::model::OnetapConfig;

/// Log levels accepted in `logging.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
///
/// A missing `identity.client_id` is not an error here: commands that never
/// talk to the platform run without one. Building an orchestrator enforces it.
pub fn validate_config(config: &OnetapConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if let Some(client_id) = &config.identity.client_id
        && let Err(err) = ClientId::parse(client_id)
    {
        errors.push(ConfigError::Validation {
            message: format!("identity.client_id: {err}"),
        });
    }

    if let Some(nonce) = &config.identity.nonce
        && nonce.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "identity.nonce must not be empty when set".to_string(),
        });
    }

    let level = config.logging.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
