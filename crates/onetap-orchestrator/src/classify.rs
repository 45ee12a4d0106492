// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Failure classification for sign-in attempts.
//!
//! Maps the raw diagnostic text and result code of a failed external call to
//! an [`ErrorKind`], and attaches a remediation hint for the kinds a user or
//! developer can act on.
//!
//! Matching is done on substrings of SDK error text. Those messages are not a
//! stable interface: an SDK update that rewords them degrades the affected
//! failures to [`ErrorKind::Unknown`].

use std::sync::LazyLock;

use onetap_core::{ErrorKind, PlatformResultCode, SignInAttemptResult};
use regex::Regex;

/// Phrases meaning the platform has nothing to offer (lowercase, contains).
const NO_CREDENTIAL_PATTERNS: &[&str] = &[
    "no credential",
    "no_credential",
    "nocredentialexception",
    "cannot find a matching credential",
    "sign-in required",
    "sign_in_required",
];

/// Phrases meaning the identity service itself is missing or stale.
const SERVICE_PATTERNS: &[&str] = &[
    "missing feature{name=auth_api_credentials_begin_sign_in",
    "service_missing",
    "service_version_update_required",
    "service_disabled",
    "service_invalid",
    "service not available",
    "not installed or must be updated",
];

/// Phrases meaning connectivity or app registration is at fault.
const NETWORK_PATTERNS: &[&str] = &[
    "no internet",
    "network_error",
    "networkerror",
    "unable to resolve host",
    "not whitelisted",
    "developer_error",
];

/// Numeric status codes for NETWORK_ERROR (7), INTERNAL_ERROR (8) and
/// DEVELOPER_ERROR (10), either bare at the start or after `ApiException:`.
static NETWORK_STATUS_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|apiexception:)\s*(7|8|10)\s*:").expect("static pattern compiles")
});

static WHITELIST_STATUS_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|apiexception:)\s*10\s*:").expect("static pattern compiles")
});

/// Note appended to launch failures when the availability check reports false.
pub const SERVICE_NOT_AVAILABLE_NOTE: &str =
    "The identity service is not installed or must be updated.";

const HINT_PLAY_NOT_SET_UP: &str =
    "Google Play is not installed or must be logged in to set up.";
const HINT_NOT_WHITELISTED: &str = "The caller is not whitelisted: verify the web client id, \
     the package name and the signing certificate fingerprint registered for the app.";
const HINT_NO_NETWORK: &str =
    "One reason for this failure is that the device has no internet, or one-tap is not possible.";

/// Classifies a failure. Pure: same input, same kind; never panics.
///
/// Precedence: cancelled result code, no credential, service unavailable,
/// network or configuration, unknown.
pub fn classify(diagnostic: &str, result_code: Option<PlatformResultCode>) -> ErrorKind {
    if result_code == Some(PlatformResultCode::Cancelled) {
        return ErrorKind::Cancelled;
    }

    let text = diagnostic.to_lowercase();
    let contains_any = |patterns: &[&str]| patterns.iter().any(|p| text.contains(p));

    if contains_any(NO_CREDENTIAL_PATTERNS) {
        ErrorKind::NoCredentialAvailable
    } else if contains_any(SERVICE_PATTERNS) {
        ErrorKind::ServiceUnavailable
    } else if contains_any(NETWORK_PATTERNS) || NETWORK_STATUS_CODE.is_match(&text) {
        ErrorKind::NetworkOrConfigIssue
    } else {
        ErrorKind::Unknown
    }
}

/// Human-readable remediation for `kind`, if one applies to this diagnostic.
pub fn remediation_hint(kind: ErrorKind, diagnostic: &str) -> Option<&'static str> {
    let text = diagnostic.to_lowercase();
    match kind {
        ErrorKind::ServiceUnavailable if text.contains(SERVICE_PATTERNS[0]) => {
            Some(HINT_PLAY_NOT_SET_UP)
        }
        ErrorKind::ServiceUnavailable => Some(SERVICE_NOT_AVAILABLE_NOTE),
        ErrorKind::NetworkOrConfigIssue
            if text.contains("not whitelisted") || WHITELIST_STATUS_CODE.is_match(&text) =>
        {
            Some(HINT_NOT_WHITELISTED)
        }
        ErrorKind::NetworkOrConfigIssue => Some(HINT_NO_NETWORK),
        _ => None,
    }
}

/// Appends the remediation hint for `kind`, unless the text already carries it.
pub fn annotate(diagnostic: &str, kind: ErrorKind) -> String {
    match remediation_hint(kind, diagnostic) {
        Some(hint) if !diagnostic.contains(hint) => format!("{diagnostic}\n{hint}"),
        _ => diagnostic.to_string(),
    }
}

/// A classified attempt failure: the kind plus annotated diagnostic text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFailure {
    pub kind: ErrorKind,
    pub diagnostic: String,
}

impl ClassifiedFailure {
    /// Classifies `diagnostic`, then annotates it. The annotation never
    /// changes the kind.
    pub fn from_diagnostic(diagnostic: &str, result_code: Option<PlatformResultCode>) -> Self {
        let kind = classify(diagnostic, result_code);
        Self {
            kind,
            diagnostic: annotate(diagnostic, kind),
        }
    }

    pub fn into_result(self, strategy: &str) -> SignInAttemptResult {
        SignInAttemptResult::Failure {
            reason: self.kind,
            diagnostic: self.diagnostic,
            strategy: strategy.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn cancelled_code_wins_over_text() {
        let kind = classify("8: no internet", Some(PlatformResultCode::Cancelled));
        assert_eq!(kind, ErrorKind::Cancelled);
    }

    #[test]
    fn cancellation_needs_the_code() {
        assert_eq!(classify("RESULT_CANCELED", None), ErrorKind::Unknown);
        assert_eq!(
            classify("RESULT_INTERRUPTED", Some(PlatformResultCode::Interrupted)),
            ErrorKind::Unknown
        );
    }

    #[test]
    fn no_credential_texts() {
        for text in [
            "NO_CREDENTIAL",
            "androidx.credentials.exceptions.NoCredentialException: no credentials available",
            "16: Cannot find a matching credential.",
            "4: SIGN_IN_REQUIRED",
        ] {
            assert_eq!(classify(text, None), ErrorKind::NoCredentialAvailable, "{text}");
        }
    }

    #[test]
    fn no_credential_outranks_network() {
        assert_eq!(
            classify("8: no internet; no credential", None),
            ErrorKind::NoCredentialAvailable
        );
    }

    #[test]
    fn service_unavailable_texts() {
        let missing = "com.google.android.gms.common.api.ApiException: 17: \
                       API: Missing Feature{name=auth_api_credentials_begin_sign_in, version=8}";
        assert_eq!(classify(missing, None), ErrorKind::ServiceUnavailable);
        assert_eq!(
            classify("ConnectionResult{SERVICE_VERSION_UPDATE_REQUIRED}", None),
            ErrorKind::ServiceUnavailable
        );
        assert_eq!(
            classify(&format!("boom\n{SERVICE_NOT_AVAILABLE_NOTE}"), None),
            ErrorKind::ServiceUnavailable
        );
    }

    #[test]
    fn network_or_config_texts() {
        for text in [
            "8: no internet",
            "com.google.android.gms.common.api.ApiException: 8: ",
            "com.google.android.gms.common.api.ApiException: 7: NETWORK_ERROR",
            "com.google.android.gms.common.api.ApiException: 10: Caller not whitelisted to call this API.",
        ] {
            assert_eq!(classify(text, None), ErrorKind::NetworkOrConfigIssue, "{text}");
        }
    }

    #[test]
    fn status_code_must_be_exact() {
        assert_eq!(classify("18: something", None), ErrorKind::Unknown);
        assert_eq!(classify("ApiException: 17: other", None), ErrorKind::Unknown);
    }

    #[test]
    fn garbage_is_unknown() {
        assert_eq!(classify("", None), ErrorKind::Unknown);
        assert_eq!(classify("\u{0}\u{fffd}💥", None), ErrorKind::Unknown);
    }

    #[test]
    fn network_hint_is_appended_once() {
        let once = annotate("8: no internet", ErrorKind::NetworkOrConfigIssue);
        assert!(once.starts_with("8: no internet\n"));
        assert!(once.contains("no internet, or one-tap is not possible"));
        let twice = annotate(&once, ErrorKind::NetworkOrConfigIssue);
        assert_eq!(once, twice);
    }

    #[test]
    fn whitelist_hint_for_developer_error() {
        let text = "ApiException: 10: Caller not whitelisted to call this API.";
        assert_eq!(
            remediation_hint(ErrorKind::NetworkOrConfigIssue, text),
            Some(HINT_NOT_WHITELISTED)
        );
    }

    #[test]
    fn play_setup_hint_for_missing_feature() {
        let text = "Missing Feature{name=auth_api_credentials_begin_sign_in, version=8}";
        assert_eq!(
            remediation_hint(ErrorKind::ServiceUnavailable, text),
            Some(HINT_PLAY_NOT_SET_UP)
        );
    }

    #[test]
    fn no_hint_for_other_kinds() {
        assert_eq!(annotate("x", ErrorKind::Cancelled), "x");
        assert_eq!(annotate("x", ErrorKind::NoCredentialAvailable), "x");
        assert_eq!(annotate("x", ErrorKind::Unknown), "x");
    }

    #[test]
    fn classified_failure_builds_failure_result() {
        let failure = ClassifiedFailure::from_diagnostic("8: no internet", None);
        let result = failure.into_result("auto");
        assert_eq!(result.error_kind(), Some(ErrorKind::NetworkOrConfigIssue));
        assert_eq!(result.strategy(), "auto");
    }

    fn any_code() -> impl Strategy<Value = Option<PlatformResultCode>> {
        prop_oneof![
            Just(None),
            Just(Some(PlatformResultCode::Ok)),
            Just(Some(PlatformResultCode::Cancelled)),
            Just(Some(PlatformResultCode::Interrupted)),
            any::<i32>().prop_map(|c| Some(PlatformResultCode::Other(c))),
        ]
    }

    proptest! {
        #[test]
        fn classify_is_deterministic(text in ".*", code in any_code()) {
            prop_assert_eq!(classify(&text, code), classify(&text, code));
        }

        #[test]
        fn annotation_never_changes_kind(text in ".*") {
            let kind = classify(&text, None);
            prop_assert_eq!(classify(&annotate(&text, kind), None), kind);
        }

        #[test]
        fn known_prefixes_survive_surrounding_noise(prefix in "[a-z ]{0,20}", suffix in "[a-z ]{0,20}") {
            let text = format!("{prefix} ApiException: 8: {suffix}");
            prop_assume!(classify(&text, None) != ErrorKind::NoCredentialAvailable);
            prop_assume!(classify(&text, None) != ErrorKind::ServiceUnavailable);
            prop_assert_eq!(classify(&text, None), ErrorKind::NetworkOrConfigIssue);
        }
    }
}
