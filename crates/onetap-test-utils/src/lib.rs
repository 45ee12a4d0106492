// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Onetap integration tests.
//!
//! Provides a scripted identity platform for fast, deterministic,
//! CI-runnable tests without a device or the native sign-in SDKs.
//!
//! # Components
//!
//! - [`MockPlatform`] - Scripted platform with launch counters, deferred
//!   callbacks and duplicate-delivery injection
//! - [`fake_id_token`] - Builds an unsigned three-segment token from claims

pub mod mock_platform;

pub use mock_platform::{MockPlatform, ScriptedAttempt, SignOutCall, fake_id_token};
