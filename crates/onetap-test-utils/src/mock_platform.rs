// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock identity platform for deterministic testing.
//!
//! `MockPlatform` implements `IdentityPlatform` with a FIFO script of
//! attempt outcomes, so tests can drive every branch of the orchestrator
//! and count how many strategies were actually launched.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use tokio::sync::watch;

use onetap_core::{
    CompletionHandle, Credential, IdentityPlatform, PlatformCallback, PlatformFailure,
    SignInRequest, StrategyFamily,
};

/// Diagnostic used when a launch happens with nothing left in the script.
pub const SCRIPT_EXHAUSTED: &str = "NO_CREDENTIAL: mock script exhausted";

/// One recorded `sign_out` or `disconnect` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOutCall {
    pub family: StrategyFamily,
    /// `true` for `disconnect`.
    pub revoked: bool,
    pub user_id: Option<String>,
}

/// What the mock does for one `begin_sign_in` call.
#[derive(Debug, Clone)]
pub enum ScriptedAttempt {
    /// Deliver an OK callback carrying a credential payload with this token.
    Succeed { id_token: String },
    /// Fail the launch immediately with this diagnostic.
    FailToLaunch { diagnostic: String },
    /// Deliver this callback.
    Callback(PlatformCallback),
    /// Deliver two callbacks through the same handle.
    CallbackTwice(PlatformCallback, PlatformCallback),
    /// Keep the handle; the test settles it via [`MockPlatform::take_deferred`].
    Defer,
    /// Drop the handle without ever completing it.
    DropHandle,
}

impl ScriptedAttempt {
    pub fn succeed(id_token: impl Into<String>) -> Self {
        ScriptedAttempt::Succeed {
            id_token: id_token.into(),
        }
    }

    pub fn fail_to_launch(diagnostic: impl Into<String>) -> Self {
        ScriptedAttempt::FailToLaunch {
            diagnostic: diagnostic.into(),
        }
    }
}

/// Credential payload in the shape the host bridge delivers.
pub fn credential_payload(id_token: &str) -> serde_json::Value {
    serde_json::json!({
        "idToken": id_token,
        "id": "mock.user@example.com",
        "displayName": "Mock User",
        "givenName": "Mock",
        "familyName": "User",
    })
}

/// Builds an unsigned `header.payload.signature` token around `claims`.
pub fn fake_id_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.mock-signature")
}

#[derive(Default)]
struct State {
    script: VecDeque<ScriptedAttempt>,
    requests: Vec<SignInRequest>,
    deferred: VecDeque<CompletionHandle>,
    sign_out_failures: HashMap<StrategyFamily, String>,
    sign_out_calls: Vec<SignOutCall>,
}

/// A scripted identity platform.
///
/// When the script is empty, launches fail with [`SCRIPT_EXHAUSTED`].
pub struct MockPlatform {
    state: Mutex<State>,
    service_available: Mutex<bool>,
    launches: watch::Sender<usize>,
}

impl MockPlatform {
    /// Create a mock platform with an empty script and an available service.
    pub fn new() -> Self {
        let (launches, _) = watch::channel(0);
        Self {
            state: Mutex::new(State::default()),
            service_available: Mutex::new(true),
            launches,
        }
    }

    /// Create a mock platform pre-loaded with the given script.
    pub fn with_script(script: impl IntoIterator<Item = ScriptedAttempt>) -> Self {
        let platform = Self::new();
        platform.state().script.extend(script);
        platform
    }

    /// Append one outcome to the script.
    pub fn push(&self, attempt: ScriptedAttempt) {
        self.state().script.push_back(attempt);
    }

    pub fn set_service_available(&self, available: bool) {
        *self
            .service_available
            .lock()
            .unwrap_or_else(|p| p.into_inner()) = available;
    }

    /// Make sign-out (and disconnect) fail for `family`.
    pub fn fail_sign_out(&self, family: StrategyFamily, diagnostic: impl Into<String>) {
        self.state()
            .sign_out_failures
            .insert(family, diagnostic.into());
    }

    /// Number of `begin_sign_in` calls so far.
    pub fn launch_count(&self) -> usize {
        *self.launches.borrow()
    }

    /// Waits until at least `count` strategies have been launched.
    pub async fn wait_for_launches(&self, count: usize) {
        let mut rx = self.launches.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|launched| *launched >= count).await;
    }

    /// Requests passed to `begin_sign_in`, in launch order.
    pub fn requests(&self) -> Vec<SignInRequest> {
        self.state().requests.clone()
    }

    /// Strategy names in launch order.
    pub fn launched_strategies(&self) -> Vec<String> {
        self.state()
            .requests
            .iter()
            .map(|r| r.strategy.clone())
            .collect()
    }

    /// Oldest handle held back by [`ScriptedAttempt::Defer`].
    pub fn take_deferred(&self) -> Option<CompletionHandle> {
        self.state().deferred.pop_front()
    }

    /// Every sign-out or disconnect call, in call order.
    pub fn sign_out_calls(&self) -> Vec<SignOutCall> {
        self.state().sign_out_calls.clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn record_sign_out(
        &self,
        family: StrategyFamily,
        revoked: bool,
        user_id: Option<&str>,
    ) -> Result<(), PlatformFailure> {
        let mut state = self.state();
        state.sign_out_calls.push(SignOutCall {
            family,
            revoked,
            user_id: user_id.map(str::to_owned),
        });
        match state.sign_out_failures.get(&family) {
            Some(diagnostic) => Err(PlatformFailure::new(diagnostic.clone())),
            None => Ok(()),
        }
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityPlatform for MockPlatform {
    fn name(&self) -> &str {
        "mock-platform"
    }

    async fn begin_sign_in(
        &self,
        request: &SignInRequest,
        completion: CompletionHandle,
    ) -> Result<(), PlatformFailure> {
        let attempt = {
            let mut state = self.state();
            state.requests.push(request.clone());
            state.script.pop_front()
        };
        self.launches.send_modify(|launched| *launched += 1);

        tracing::debug!(strategy = %request.strategy, ?attempt, "mock launch");

        match attempt {
            None => Err(PlatformFailure::new(SCRIPT_EXHAUSTED)),
            Some(ScriptedAttempt::FailToLaunch { diagnostic }) => {
                Err(PlatformFailure::new(diagnostic))
            }
            Some(ScriptedAttempt::Succeed { id_token }) => {
                completion.complete(PlatformCallback::ok(credential_payload(&id_token)));
                Ok(())
            }
            Some(ScriptedAttempt::Callback(callback)) => {
                completion.complete(callback);
                Ok(())
            }
            Some(ScriptedAttempt::CallbackTwice(first, second)) => {
                let listener = completion.clone();
                completion.complete(first);
                listener.complete(second);
                Ok(())
            }
            Some(ScriptedAttempt::Defer) => {
                self.state().deferred.push_back(completion);
                Ok(())
            }
            Some(ScriptedAttempt::DropHandle) => {
                drop(completion);
                Ok(())
            }
        }
    }

    async fn is_service_available(&self) -> bool {
        *self
            .service_available
            .lock()
            .unwrap_or_else(|p| p.into_inner())
    }

    fn extract_credential(
        &self,
        payload: &serde_json::Value,
    ) -> Result<Credential, PlatformFailure> {
        serde_json::from_value(payload.clone())
            .map_err(|e| PlatformFailure::new(format!("unexpected credential payload: {e}")))
    }

    async fn sign_out(
        &self,
        family: StrategyFamily,
        user_id: Option<&str>,
    ) -> Result<(), PlatformFailure> {
        self.record_sign_out(family, false, user_id)
    }

    async fn disconnect(
        &self,
        family: StrategyFamily,
        user_id: Option<&str>,
    ) -> Result<(), PlatformFailure> {
        self.record_sign_out(family, true, user_id)
    }
}
