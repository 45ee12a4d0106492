// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity platform trait wrapping the native sign-in SDKs and host UI bridge.

use async_trait::async_trait;

use crate::completion::CompletionHandle;
use crate::types::{Credential, PlatformFailure, SignInRequest, StrategyFamily};

/// Adapter over an external identity platform.
///
/// Implementations perform the actual sign-in handshake and dialog display.
/// The orchestrator only decides which call to make next and interprets
/// what comes back.
#[async_trait]
pub trait IdentityPlatform: Send + Sync + 'static {
    /// Returns the human-readable name of this platform adapter.
    fn name(&self) -> &str;

    /// Launches one sign-in mechanism.
    ///
    /// On `Ok(())` the platform must eventually call
    /// [`CompletionHandle::complete`] exactly once, from whatever listener it
    /// registered. An `Err` reports a failure that is known immediately
    /// (e.g. "service not available"); the handle is then ignored.
    async fn begin_sign_in(
        &self,
        request: &SignInRequest,
        completion: CompletionHandle,
    ) -> Result<(), PlatformFailure>;

    /// Availability check for the platform's identity service.
    ///
    /// Only used to enrich diagnostic text, never to skip a strategy.
    async fn is_service_available(&self) -> bool;

    /// Extracts credential fields from an OK callback's opaque payload.
    fn extract_credential(
        &self,
        payload: &serde_json::Value,
    ) -> Result<Credential, PlatformFailure>;

    /// Clears the platform's sign-in state for one family of mechanisms.
    ///
    /// `user_id` is the `sub` claim of the signed-in user, when known.
    async fn sign_out(
        &self,
        family: StrategyFamily,
        user_id: Option<&str>,
    ) -> Result<(), PlatformFailure>;

    /// Revokes the app's access for `user_id` within one family.
    /// Defaults to [`sign_out`](Self::sign_out).
    async fn disconnect(
        &self,
        family: StrategyFamily,
        user_id: Option<&str>,
    ) -> Result<(), PlatformFailure> {
        self.sign_out(family, user_id).await
    }
}
