// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort decoding of compact identity tokens (`header.payload.signature`).
//!
//! The signature is never verified. Any malformed input yields an empty
//! [`DecodedToken`]; decoding never fails a sign-in that produced a token.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use onetap_core::DecodedToken;
use serde_json::{Map, Value};
use tracing::debug;

/// Decodes the payload segment of a three-segment token into readable claims.
pub fn decode(token: &str) -> DecodedToken {
    match payload_claims(token) {
        Some(claims) => DecodedToken {
            subject: string_claim(&claims, "sub"),
            email: string_claim(&claims, "email"),
            raw_claims: Some(claims),
        },
        None => {
            debug!(token = %fingerprint(token), "identity token payload not decodable");
            DecodedToken::default()
        }
    }
}

fn payload_claims(token: &str) -> Option<Map<String, Value>> {
    let segments: Vec<&str> = token.split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return None;
    };
    // Tolerate padded encoders.
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    match serde_json::from_slice(&bytes).ok()? {
        Value::Object(claims) => Some(claims),
        _ => None,
    }
}

fn string_claim(claims: &Map<String, Value>, name: &str) -> Option<String> {
    claims.get(name).and_then(Value::as_str).map(str::to_owned)
}

/// Short, log-safe stand-in for a bearer token.
pub fn fingerprint(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    format!("{prefix}…({} chars)", token.chars().count())
}
