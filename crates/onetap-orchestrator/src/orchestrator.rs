// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Caller-facing orchestrator: modes, single-flight admission, sign-out.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use onetap_config::{FallbackConfig, OnetapConfig};
use onetap_core::{
    ClientId, IdentityPlatform, OnetapError, SignInAttemptResult, SignOutOutcome, SignOutReport,
    StrategyFamily,
};
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::sequencer;
use crate::single_flight::SingleFlight;
use crate::strategy::{SignInMode, Strategy};

/// Random bytes behind a generated nonce (hex-encoded to 10 characters).
const NONCE_BYTES: usize = 5;

/// Construction parameters for [`SignInOrchestrator`].
#[derive(Debug, Clone, Default)]
pub struct OrchestratorOptions {
    /// Web-application OAuth client id. Required.
    pub client_id: Option<String>,
    /// Nonce for issued tokens. A random one is generated when `None`.
    pub nonce: Option<String>,
    pub fallback: FallbackConfig,
}

impl From<&OnetapConfig> for OrchestratorOptions {
    fn from(config: &OnetapConfig) -> Self {
        Self {
            client_id: config.identity.client_id.clone(),
            nonce: config.identity.nonce.clone(),
            fallback: config.fallback.clone(),
        }
    }
}

/// Drives sign-in runs against one identity platform.
///
/// One instance admits one run at a time. Callers serving several UI
/// surfaces concurrently need one orchestrator each.
pub struct SignInOrchestrator<P: IdentityPlatform> {
    platform: Arc<P>,
    client_id: ClientId,
    nonce: String,
    fallback: FallbackConfig,
    flight: SingleFlight,
    authenticated_user_id: Arc<Mutex<Option<String>>>,
    used_families: Mutex<BTreeSet<StrategyFamily>>,
}

impl<P: IdentityPlatform> SignInOrchestrator<P> {
    /// Validates the client id and settles the nonce. Makes no platform calls.
    pub fn new(platform: Arc<P>, options: OrchestratorOptions) -> Result<Self, OnetapError> {
        let raw = options.client_id.ok_or_else(|| {
            OnetapError::Configuration(
                "client id is required: set identity.client_id to the web application client id"
                    .to_string(),
            )
        })?;
        let client_id = ClientId::parse(&raw)?;

        let nonce = match options.nonce {
            Some(nonce) if nonce.trim().is_empty() => {
                return Err(OnetapError::Configuration(
                    "nonce must not be blank".to_string(),
                ));
            }
            Some(nonce) => nonce,
            None => generate_nonce(),
        };

        info!(
            platform = platform.name(),
            client_id = %client_id,
            "sign-in orchestrator initialized"
        );

        Ok(Self {
            platform,
            client_id,
            nonce,
            fallback: options.fallback,
            flight: SingleFlight::new(),
            authenticated_user_id: Arc::new(Mutex::new(None)),
            used_families: Mutex::new(BTreeSet::new()),
        })
    }

    pub fn from_config(platform: Arc<P>, config: &OnetapConfig) -> Result<Self, OnetapError> {
        Self::new(platform, OrchestratorOptions::from(config))
    }

    /// Runs the fixed ordering for `mode`.
    ///
    /// Returns [`OnetapError::SignInInProgress`] without launching anything if
    /// another run is active on this instance.
    ///
    /// The run is driven by a task the orchestrator owns. Dropping the
    /// returned future does not release the flight: a launched dialog keeps
    /// it held until its strategy settles.
    pub async fn try_sign_in(&self, mode: SignInMode) -> Result<SignInAttemptResult, OnetapError> {
        let strategies = mode.strategies(&self.client_id, &self.nonce, &self.fallback);
        self.run(mode.to_string(), strategies).await
    }

    /// Runs a caller-assembled ordering under the same admission rules.
    pub async fn try_sign_in_with(
        &self,
        strategies: &[Strategy],
    ) -> Result<SignInAttemptResult, OnetapError> {
        self.run("custom".to_string(), strategies.to_vec()).await
    }

    async fn run(
        &self,
        mode: String,
        strategies: Vec<Strategy>,
    ) -> Result<SignInAttemptResult, OnetapError> {
        let Some(permit) = self.flight.try_enter() else {
            warn!(mode = %mode, "sign-in request rejected, another run is in progress");
            return Err(OnetapError::SignInInProgress);
        };

        debug!(mode = %mode, strategies = strategies.len(), "sign-in run started");
        lock(&self.used_families).extend(strategies.iter().map(|s| s.request.family));

        let platform = Arc::clone(&self.platform);
        let authenticated_user_id = Arc::clone(&self.authenticated_user_id);
        let task = tokio::spawn(async move {
            let _permit = permit;
            let result = sequencer::run(platform.as_ref(), &strategies).await?;

            match &result {
                SignInAttemptResult::Success { claims, strategy, .. } => {
                    info!(mode = %mode, strategy = %strategy, "sign-in completed");
                    *lock(&authenticated_user_id) = claims.subject.clone();
                }
                SignInAttemptResult::Failure { reason, strategy, .. } => {
                    info!(mode = %mode, strategy = %strategy, kind = %reason, "sign-in failed");
                }
            }

            Ok::<_, OnetapError>(result)
        });

        task.await
            .map_err(|e| OnetapError::Internal(format!("sign-in task failed: {e}")))?
    }

    /// Signs out of every family used on this instance (all families if none).
    pub async fn sign_out(&self) -> SignOutReport {
        self.for_each_family(false).await
    }

    /// Revokes access for every family used on this instance (all if none).
    pub async fn disconnect(&self) -> SignOutReport {
        self.for_each_family(true).await
    }

    /// Calls the platform once per family with the signed-in user's id, then
    /// forgets the user.
    async fn for_each_family(&self, revoke: bool) -> SignOutReport {
        let families: Vec<StrategyFamily> = {
            let used = lock(&self.used_families);
            if used.is_empty() {
                StrategyFamily::ALL.to_vec()
            } else {
                used.iter().copied().collect()
            }
        };
        let user_id = self.authenticated_user_id();

        let mut outcomes = Vec::with_capacity(families.len());
        for family in families {
            let result = if revoke {
                self.platform.disconnect(family, user_id.as_deref()).await
            } else {
                self.platform.sign_out(family, user_id.as_deref()).await
            };
            let error = result.err().map(|failure| {
                warn!(family = %family, error = %failure, revoke, "sign-out failed");
                failure.to_string()
            });
            outcomes.push(SignOutOutcome { family, error });
        }

        *lock(&self.authenticated_user_id) = None;
        SignOutReport { outcomes }
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// `sub` claim of the last successful sign-in, until signed out.
    pub fn authenticated_user_id(&self) -> Option<String> {
        lock(&self.authenticated_user_id).clone()
    }

    pub fn is_sign_in_in_progress(&self) -> bool {
        self.flight.is_in_progress()
    }

    pub fn platform(&self) -> &Arc<P> {
        &self.platform
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Random 10-character lowercase hex nonce.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
