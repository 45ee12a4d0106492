// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Launches one strategy and waits for its single settlement.

use onetap_core::{
    Credential, IdentityPlatform, PlatformCallback, PlatformResultCode, SignInRequest,
    completion_channel,
};
use tracing::{debug, warn};

use crate::classify::{ClassifiedFailure, SERVICE_NOT_AVAILABLE_NOTE};

const DROPPED_COMPLETION: &str = "completion handle dropped before a result was delivered";
const MISSING_PAYLOAD: &str = "platform reported success without a credential payload";

/// Runs one strategy through `platform`.
///
/// A fresh completion pair is created per call, so a late or duplicate
/// callback from an earlier strategy can never settle this one.
pub async fn invoke<P>(platform: &P, request: &SignInRequest) -> Result<Credential, ClassifiedFailure>
where
    P: IdentityPlatform + ?Sized,
{
    let (handle, pending) = completion_channel(&request.strategy);

    debug!(
        strategy = %request.strategy,
        family = %request.family,
        filter = request.filter_to_authorized_accounts,
        auto_select = request.auto_select,
        "launching sign-in strategy"
    );

    if let Err(failure) = platform.begin_sign_in(request, handle).await {
        let mut diagnostic = failure.diagnostic;
        if !platform.is_service_available().await {
            diagnostic = format!("{diagnostic}\n{SERVICE_NOT_AVAILABLE_NOTE}");
        }
        return Err(ClassifiedFailure::from_diagnostic(&diagnostic, failure.result_code));
    }

    let Some(callback) = pending.wait().await else {
        warn!(strategy = %request.strategy, "sign-in completion dropped without a result");
        return Err(ClassifiedFailure::from_diagnostic(DROPPED_COMPLETION, None));
    };

    settle(platform, callback)
}

fn settle<P>(platform: &P, callback: PlatformCallback) -> Result<Credential, ClassifiedFailure>
where
    P: IdentityPlatform + ?Sized,
{
    match (callback.result_code, callback.payload) {
        (PlatformResultCode::Ok, Some(payload)) => platform
            .extract_credential(&payload)
            .map_err(|failure| {
                ClassifiedFailure::from_diagnostic(&failure.diagnostic, failure.result_code)
            }),
        (PlatformResultCode::Ok, None) => Err(ClassifiedFailure::from_diagnostic(
            callback.message.as_deref().unwrap_or(MISSING_PAYLOAD),
            Some(PlatformResultCode::Ok),
        )),
        (code, _) => {
            let diagnostic = callback.message.unwrap_or_else(|| code.to_string());
            Err(ClassifiedFailure::from_diagnostic(&diagnostic, Some(code)))
        }
    }
}

#[cfg(test)]
mod tests {
    use onetap_core::{ClientId, ErrorKind, StrategyFamily};
    use onetap_test_utils::{MockPlatform, ScriptedAttempt};

    use super::*;

    fn request(name: &str) -> SignInRequest {
        SignInRequest {
            strategy: name.to_string(),
            family: StrategyFamily::OneTap,
            filter_to_authorized_accounts: true,
            auto_select: true,
            client_id: ClientId::parse("1-x.apps.googleusercontent.com").unwrap(),
            nonce: "0011223344".to_string(),
        }
    }

    #[tokio::test]
    async fn ok_callback_yields_credential() {
        let platform = MockPlatform::new();
        platform.push(ScriptedAttempt::succeed("tok"));

        let credential = invoke(&platform, &request("auto")).await.unwrap();
        assert_eq!(credential.id_token, "tok");
    }

    #[tokio::test]
    async fn immediate_failure_is_classified() {
        let platform = MockPlatform::new();
        platform.push(ScriptedAttempt::fail_to_launch("8: no internet"));

        let failure = invoke(&platform, &request("auto")).await.unwrap_err();
        assert_eq!(failure.kind, ErrorKind::NetworkOrConfigIssue);
        assert!(failure.diagnostic.starts_with("8: no internet"));
    }

    #[tokio::test]
    async fn unavailable_service_note_is_appended() {
        let platform = MockPlatform::new();
        platform.set_service_available(false);
        platform.push(ScriptedAttempt::fail_to_launch("launch refused"));

        let failure = invoke(&platform, &request("auto")).await.unwrap_err();
        assert_eq!(failure.kind, ErrorKind::ServiceUnavailable);
        assert!(failure.diagnostic.contains(SERVICE_NOT_AVAILABLE_NOTE));
    }

    #[tokio::test]
    async fn available_service_leaves_text_alone() {
        let platform = MockPlatform::new();
        platform.push(ScriptedAttempt::fail_to_launch("launch refused"));

        let failure = invoke(&platform, &request("auto")).await.unwrap_err();
        assert_eq!(failure.kind, ErrorKind::Unknown);
        assert_eq!(failure.diagnostic, "launch refused");
    }

    #[tokio::test]
    async fn cancelled_callback_is_cancelled() {
        let platform = MockPlatform::new();
        platform.push(ScriptedAttempt::Callback(PlatformCallback::cancelled()));

        let failure = invoke(&platform, &request("prompt")).await.unwrap_err();
        assert_eq!(failure.kind, ErrorKind::Cancelled);
        assert_eq!(failure.diagnostic, "RESULT_CANCELED");
    }

    #[tokio::test]
    async fn interrupted_callback_is_unknown() {
        let platform = MockPlatform::new();
        platform.push(ScriptedAttempt::Callback(PlatformCallback::with_code(
            PlatformResultCode::Interrupted,
            None,
        )));

        let failure = invoke(&platform, &request("prompt")).await.unwrap_err();
        assert_eq!(failure.kind, ErrorKind::Unknown);
    }

    #[tokio::test]
    async fn ok_without_payload_is_a_failure() {
        let platform = MockPlatform::new();
        platform.push(ScriptedAttempt::Callback(PlatformCallback::with_code(
            PlatformResultCode::Ok,
            None,
        )));

        let failure = invoke(&platform, &request("auto")).await.unwrap_err();
        assert_eq!(failure.kind, ErrorKind::Unknown);
        assert_eq!(failure.diagnostic, MISSING_PAYLOAD);
    }

    #[tokio::test]
    async fn malformed_payload_is_classified() {
        let platform = MockPlatform::new();
        platform.push(ScriptedAttempt::Callback(PlatformCallback::ok(
            serde_json::json!({ "type": "password" }),
        )));

        let failure = invoke(&platform, &request("auto")).await.unwrap_err();
        assert_eq!(failure.kind, ErrorKind::Unknown);
    }

    #[tokio::test]
    async fn dropped_handle_is_unknown() {
        let platform = MockPlatform::new();
        platform.push(ScriptedAttempt::DropHandle);

        let failure = invoke(&platform, &request("auto")).await.unwrap_err();
        assert_eq!(failure.kind, ErrorKind::Unknown);
        assert_eq!(failure.diagnostic, DROPPED_COMPLETION);
    }
}
