// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strategies and the fixed orderings callers can choose between.

use onetap_config::FallbackConfig;
use onetap_core::{ClientId, SignInRequest, StrategyFamily};
use strum::{Display, EnumIter, EnumString};

/// One named sign-in mechanism plus its fallback policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy {
    pub request: SignInRequest,
    /// Advance to the next strategy after a non-cancelled failure.
    pub continue_on_failure_unless_cancelled: bool,
}

impl Strategy {
    /// Silent one-tap sign-in. `filtered` restricts the chooser to accounts
    /// that already authorized this app.
    pub fn auto(client_id: &ClientId, nonce: &str, filtered: bool) -> Self {
        let name = if filtered { "auto" } else { "auto-any-account" };
        Self::one_tap(name, client_id, nonce, filtered)
    }

    /// Account chooser offering every account on the device. Auto-select
    /// stays on, so a device with a single account still signs in silently.
    pub fn prompt(client_id: &ClientId, nonce: &str) -> Self {
        Self::one_tap("prompt", client_id, nonce, false)
    }

    /// Explicit "Sign in with Google" button flow.
    pub fn button(client_id: &ClientId, nonce: &str) -> Self {
        Self {
            request: SignInRequest {
                strategy: "button".to_string(),
                family: StrategyFamily::Button,
                filter_to_authorized_accounts: false,
                auto_select: false,
                client_id: client_id.clone(),
                nonce: nonce.to_string(),
            },
            continue_on_failure_unless_cancelled: false,
        }
    }

    fn one_tap(name: &str, client_id: &ClientId, nonce: &str, filtered: bool) -> Self {
        Self {
            request: SignInRequest {
                strategy: name.to_string(),
                family: StrategyFamily::OneTap,
                filter_to_authorized_accounts: filtered,
                auto_select: true,
                client_id: client_id.clone(),
                nonce: nonce.to_string(),
            },
            continue_on_failure_unless_cancelled: false,
        }
    }

    pub fn continuing(mut self, allowed: bool) -> Self {
        self.continue_on_failure_unless_cancelled = allowed;
        self
    }

    pub fn name(&self) -> &str {
        &self.request.strategy
    }
}

/// Caller-facing entry points. Each maps to one fixed strategy ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum SignInMode {
    /// Silent sign-in with a previously authorized account only.
    Auto,
    /// Account chooser over every device account.
    Prompt,
    AutoThenPrompt,
    AutoThenPromptThenButton,
    /// Explicit button flow only.
    Button,
}

impl SignInMode {
    /// Builds the ordering for this mode.
    ///
    /// Whether a failed auto or prompt attempt hands over to the next one is
    /// taken from `fallback`. A cancelled attempt never hands over.
    pub fn strategies(
        self,
        client_id: &ClientId,
        nonce: &str,
        fallback: &FallbackConfig,
    ) -> Vec<Strategy> {
        let auto = || Strategy::auto(client_id, nonce, true).continuing(fallback.auto);
        let prompt = || Strategy::prompt(client_id, nonce).continuing(fallback.prompt);
        let button = || Strategy::button(client_id, nonce);

        match self {
            SignInMode::Auto => vec![auto()],
            SignInMode::Prompt => vec![prompt()],
            SignInMode::AutoThenPrompt => vec![auto(), prompt()],
            SignInMode::AutoThenPromptThenButton => vec![auto(), prompt(), button()],
            SignInMode::Button => vec![button()],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    fn client() -> ClientId {
        ClientId::parse("42-abc.apps.googleusercontent.com").unwrap()
    }

    fn names(strategies: &[Strategy]) -> Vec<&str> {
        strategies.iter().map(Strategy::name).collect()
    }

    #[test]
    fn every_mode_has_strategies() {
        for mode in SignInMode::iter() {
            let built = mode.strategies(&client(), "n", &FallbackConfig::default());
            assert!(!built.is_empty(), "{mode}");
            assert!(built.iter().all(|s| s.request.nonce == "n"));
        }
    }

    #[test]
    fn orderings_are_fixed() {
        let fallback = FallbackConfig::default();
        assert_eq!(names(&SignInMode::Auto.strategies(&client(), "n", &fallback)), ["auto"]);
        assert_eq!(
            names(&SignInMode::AutoThenPromptThenButton.strategies(&client(), "n", &fallback)),
            ["auto", "prompt", "button"]
        );
    }

    #[test]
    fn fallback_flags_come_from_config() {
        let fallback = FallbackConfig {
            auto: false,
            prompt: true,
        };
        let built = SignInMode::AutoThenPromptThenButton.strategies(&client(), "n", &fallback);
        let flags: Vec<bool> = built
            .iter()
            .map(|s| s.continue_on_failure_unless_cancelled)
            .collect();
        assert_eq!(flags, [false, true, false]);
    }

    #[test]
    fn auto_filters_and_prompt_does_not() {
        let auto = Strategy::auto(&client(), "n", true);
        assert!(auto.request.filter_to_authorized_accounts);
        assert!(auto.request.auto_select);

        let prompt = Strategy::prompt(&client(), "n");
        assert!(!prompt.request.filter_to_authorized_accounts);
        assert!(prompt.request.auto_select);

        let unfiltered = Strategy::auto(&client(), "n", false);
        assert_eq!(unfiltered.name(), "auto-any-account");
        let button = Strategy::button(&client(), "n");
        assert_eq!(button.request.family, StrategyFamily::Button);
        assert!(!button.request.auto_select);
    }

    #[test]
    fn mode_parses_from_kebab_case() {
        assert_eq!(
            SignInMode::from_str("auto-then-prompt").unwrap(),
            SignInMode::AutoThenPrompt
        );
        assert!(SignInMode::from_str("silent").is_err());
    }
}
