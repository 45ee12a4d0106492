// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential acquisition orchestrator.
//!
//! Tries an ordered list of sign-in strategies against an
//! [`IdentityPlatform`](onetap_core::IdentityPlatform), bridges each
//! callback-delivered outcome into a single awaited result, classifies
//! failures, and admits one run at a time per [`SignInOrchestrator`].

pub mod bridge;
pub mod classify;
pub mod orchestrator;
pub mod sequencer;
pub mod single_flight;
pub mod strategy;
pub mod token;

pub use classify::{ClassifiedFailure, annotate, classify, remediation_hint};
pub use orchestrator::{OrchestratorOptions, SignInOrchestrator, generate_nonce};
pub use sequencer::{NextStep, next_step};
pub use single_flight::{FlightPermit, SingleFlight};
pub use strategy::{SignInMode, Strategy};
pub use token::{decode, fingerprint};
