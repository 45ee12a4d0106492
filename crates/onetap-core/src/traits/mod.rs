// SPDX-FileCopyrightText: 2026 Onetap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the external collaborators the orchestrator drives.
//!
//! Traits use `#[async_trait]` so platforms can be held as trait objects.

pub mod platform;

pub use platform::IdentityPlatform;
