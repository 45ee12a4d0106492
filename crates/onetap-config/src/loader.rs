// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./onetap.toml` > `~/.config/onetap/onetap.toml` > `/etc/onetap/onetap.toml`
//! with environment variable overrides via `ONETAP_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use tracing::debug;

use crate::model::OnetapConfig;

/// System-wide config file location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/onetap/onetap.toml";

/// Config file name looked up in the working and XDG config directories.
pub const CONFIG_FILE_NAME: &str = "onetap.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/onetap/onetap.toml` (system-wide)
/// 3. `~/.config/onetap/onetap.toml` (user XDG config)
/// 4. `./onetap.toml` (local directory)
/// 5. `ONETAP_*` environment variables
pub fn load_config() -> Result<OnetapConfig, figment::Error> {
    let figment = build_figment();
    for metadata in figment.metadata() {
        debug!(provider = %metadata.name, "config provider merged");
    }
    figment.extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<OnetapConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OnetapConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<OnetapConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OnetapConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(OnetapConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("onetap").join(CONFIG_FILE_NAME))
                .unwrap_or_default(),
        ))
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `ONETAP_IDENTITY_CLIENT_ID` must map to `identity.client_id`,
/// not `identity.client.id`.
fn env_provider() -> Env {
    Env::prefixed("ONETAP_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("identity_", "identity.", 1)
            .replacen("fallback_", "fallback.", 1)
            .replacen("logging_", "logging.", 1);
        mapped.into()
    })
}

/// Serialize an effective configuration back to TOML.
///
/// Unset optional keys are omitted.
pub fn to_toml_string(config: &OnetapConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(config)
}
