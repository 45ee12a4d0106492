// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `onetap config check` and `onetap plan` command implementations.

use std::fmt::Write as _;

use onetap_config::OnetapConfig;
use onetap_core::{ClientId, OnetapError};
use onetap_orchestrator::{SignInMode, Strategy};

/// Summarize a configuration that passed validation.
pub fn render_config_summary(config: &OnetapConfig) -> String {
    let mut out = String::new();
    let client_id = config.identity.client_id.as_deref().unwrap_or("(unset)");
    let nonce = match &config.identity.nonce {
        Some(_) => "configured",
        None => "generated per orchestrator",
    };
    let _ = writeln!(out, "client_id: {client_id}");
    let _ = writeln!(out, "nonce:     {nonce}");
    let _ = writeln!(
        out,
        "fallback:  auto={} prompt={}",
        config.fallback.auto, config.fallback.prompt
    );
    let _ = write!(out, "log level: {}", config.logging.level);
    out
}

/// The strategy ordering `mode` would run with this configuration.
pub fn strategies_for(config: &OnetapConfig, mode: SignInMode) -> Result<Vec<Strategy>, OnetapError> {
    let raw = config.identity.client_id.as_deref().ok_or_else(|| {
        OnetapError::Configuration("identity.client_id is not set".to_string())
    })?;
    let client_id = ClientId::parse(raw)?;
    let nonce = config.identity.nonce.as_deref().unwrap_or("<generated>");
    Ok(mode.strategies(&client_id, nonce, &config.fallback))
}

/// Render one line per strategy, marking where a failure hands over.
pub fn render_plan(mode: SignInMode, strategies: &[Strategy]) -> String {
    let mut out = format!("mode: {mode}\n");
    for (index, strategy) in strategies.iter().enumerate() {
        let request = &strategy.request;
        let has_more = index + 1 < strategies.len();
        let on_failure = if has_more && strategy.continue_on_failure_unless_cancelled {
            "fall back unless cancelled"
        } else {
            "stop"
        };
        let _ = writeln!(
            out,
            "{}. {:<18} family={} filter={} auto_select={} on_failure={on_failure}",
            index + 1,
            request.strategy,
            request.family,
            request.filter_to_authorized_accounts,
            request.auto_select,
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OnetapConfig {
        let mut config = OnetapConfig::default();
        config.identity.client_id = Some("9-q.apps.googleusercontent.com".to_string());
        config
    }

    #[test]
    fn plan_requires_client_id() {
        let err = strategies_for(&OnetapConfig::default(), SignInMode::Auto).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn plan_lists_fallbacks() {
        let strategies = strategies_for(&config(), SignInMode::AutoThenPrompt).unwrap();
        let out = render_plan(SignInMode::AutoThenPrompt, &strategies);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "mode: auto-then-prompt");
        assert!(lines[1].starts_with("1. auto"));
        assert!(lines[1].ends_with("on_failure=fall back unless cancelled"));
        assert!(lines[2].ends_with("on_failure=stop"));
    }

    #[test]
    fn summary_hides_nonce_value() {
        let mut config = config();
        config.identity.nonce = Some("secret-nonce".to_string());
        let out = render_config_summary(&config);
        assert!(out.contains("nonce:     configured"));
        assert!(!out.contains("secret-nonce"));
    }
}
