// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Onetap sign-in orchestrator.
//!
//! This crate provides the error taxonomy, the sign-in data model, the
//! callback settlement cell, and the [`IdentityPlatform`] trait that
//! platform adapters implement.

pub mod completion;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use completion::{CompletionHandle, PendingCompletion, completion_channel};
pub use error::OnetapError;
pub use traits::IdentityPlatform;
pub use types::{
    ClientId, Credential, CredentialProfile, DecodedToken, ErrorKind, PlatformCallback,
    PlatformFailure, PlatformResultCode, SignInAttemptResult, SignInRequest, SignOutOutcome,
    SignOutReport, StrategyFamily,
};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn error_kind_display_round_trips() {
        let kinds = [
            ErrorKind::Cancelled,
            ErrorKind::NoCredentialAvailable,
            ErrorKind::ServiceUnavailable,
            ErrorKind::NetworkOrConfigIssue,
            ErrorKind::Unknown,
        ];

        for kind in &kinds {
            let parsed = ErrorKind::from_str(&kind.to_string()).expect("should parse back");
            assert_eq!(*kind, parsed);
        }
        assert_eq!(ErrorKind::NoCredentialAvailable.to_string(), "no_credential_available");
    }

    #[test]
    fn client_id_requires_web_suffix() {
        let ok = ClientId::parse(" 123-abc.apps.googleusercontent.com ").unwrap();
        assert_eq!(ok.as_str(), "123-abc.apps.googleusercontent.com");

        let err = ClientId::parse("123-abc").unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("apps.googleusercontent.com"));

        assert!(ClientId::parse("   ").unwrap_err().is_configuration());
    }

    #[test]
    fn activity_result_codes_map() {
        assert_eq!(PlatformResultCode::from_activity_result(-1), PlatformResultCode::Ok);
        assert_eq!(
            PlatformResultCode::from_activity_result(0),
            PlatformResultCode::Cancelled
        );
        assert_eq!(
            PlatformResultCode::from_activity_result(7),
            PlatformResultCode::Other(7)
        );
        assert_eq!(PlatformResultCode::Cancelled.to_string(), "RESULT_CANCELED");
    }

    #[test]
    fn result_accessors_follow_variant() {
        let success = SignInAttemptResult::Success {
            id_token: "t".into(),
            claims: DecodedToken::default(),
            profile: CredentialProfile::default(),
            strategy: "auto".into(),
        };
        assert!(success.is_success());
        assert_eq!(success.id_token(), Some("t"));
        assert_eq!(success.error_kind(), None);
        assert!(!success.is_application_error());

        let cancelled = SignInAttemptResult::Failure {
            reason: ErrorKind::Cancelled,
            diagnostic: "RESULT_CANCELED".into(),
            strategy: "prompt".into(),
        };
        assert_eq!(cancelled.id_token(), None);
        assert_eq!(cancelled.strategy(), "prompt");
        assert!(!cancelled.is_application_error());

        let offline = SignInAttemptResult::Failure {
            reason: ErrorKind::NetworkOrConfigIssue,
            diagnostic: "8: no internet".into(),
            strategy: "auto".into(),
        };
        assert!(offline.is_application_error());
    }

    #[test]
    fn credential_deserializes_from_camel_case_payload() {
        let payload = serde_json::json!({
            "idToken": "tok",
            "id": "alice@example.com",
            "displayName": "Alice",
            "profilePictureUri": null,
        });
        let credential: Credential = serde_json::from_value(payload).unwrap();
        assert_eq!(credential.id_token, "tok");
        assert_eq!(credential.profile.display_name.as_deref(), Some("Alice"));
        assert_eq!(credential.profile.given_name, None);
    }

    #[test]
    fn sign_out_report_requires_every_family() {
        let report = SignOutReport {
            outcomes: vec![
                SignOutOutcome {
                    family: StrategyFamily::OneTap,
                    error: None,
                },
                SignOutOutcome {
                    family: StrategyFamily::Button,
                    error: Some("offline".into()),
                },
            ],
        };
        assert!(!report.is_success());
        assert!(SignOutReport::default().is_success());
    }

    #[test]
    fn failure_result_serializes_with_outcome_tag() {
        let failure = SignInAttemptResult::Failure {
            reason: ErrorKind::ServiceUnavailable,
            diagnostic: "missing".into(),
            strategy: "auto".into(),
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["outcome"], "failure");
        assert_eq!(json["reason"], "service_unavailable");
    }
}
