// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runs an ordered strategy list to one terminal result.

use onetap_core::{
    Credential, ErrorKind, IdentityPlatform, OnetapError, SignInAttemptResult,
};
use tracing::{debug, info};

use crate::bridge;
use crate::classify::ClassifiedFailure;
use crate::strategy::Strategy;
use crate::token;

/// What to do after a strategy failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    Advance,
    Stop,
}

/// Decides whether a failed strategy hands over to the next one.
///
/// Cancellation always stops: another automatic attempt would re-prompt a
/// user who just dismissed the dialog.
pub fn next_step(kind: ErrorKind, continue_allowed: bool, has_more: bool) -> NextStep {
    if kind != ErrorKind::Cancelled && continue_allowed && has_more {
        NextStep::Advance
    } else {
        NextStep::Stop
    }
}

/// Runs `strategies` in order until one succeeds or a stop condition is hit.
///
/// An empty list is a configuration error and launches nothing. Failures of
/// individual strategies are returned as [`SignInAttemptResult::Failure`].
pub async fn run<P>(
    platform: &P,
    strategies: &[Strategy],
) -> Result<SignInAttemptResult, OnetapError>
where
    P: IdentityPlatform + ?Sized,
{
    if strategies.is_empty() {
        return Err(OnetapError::Configuration(
            "strategy list must not be empty".to_string(),
        ));
    }

    for (index, strategy) in strategies.iter().enumerate() {
        let failure = match bridge::invoke(platform, &strategy.request).await {
            Ok(credential) => return Ok(success(strategy, credential)),
            Err(failure) => failure,
        };

        let has_more = index + 1 < strategies.len();
        match next_step(
            failure.kind,
            strategy.continue_on_failure_unless_cancelled,
            has_more,
        ) {
            NextStep::Advance => {
                info!(
                    strategy = strategy.name(),
                    kind = %failure.kind,
                    next = strategies[index + 1].name(),
                    "sign-in strategy failed, falling back"
                );
            }
            NextStep::Stop => return Ok(stopped(strategy, failure)),
        }
    }

    Err(OnetapError::Internal(
        "strategy loop ended without a terminal result".to_string(),
    ))
}

fn success(strategy: &Strategy, credential: Credential) -> SignInAttemptResult {
    let claims = token::decode(&credential.id_token);
    debug!(
        strategy = strategy.name(),
        token = %token::fingerprint(&credential.id_token),
        "sign-in succeeded"
    );
    SignInAttemptResult::Success {
        id_token: credential.id_token,
        claims,
        profile: credential.profile,
        strategy: strategy.name().to_string(),
    }
}

fn stopped(strategy: &Strategy, failure: ClassifiedFailure) -> SignInAttemptResult {
    debug!(strategy = strategy.name(), kind = %failure.kind, "sign-in run stopped");
    failure.into_result(strategy.name())
}
