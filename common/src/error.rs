// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Error types for the authenticator

/// Reason the authenticator gave up on the current boot attempt.
///
/// Every error is fatal: the authenticator enters `Failed` and stays there
/// until the system is reset.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BootError {
    /// Trigger character not received within the initial timeout
    TriggerTimeout,

    /// Key not terminated within the final key-intake timeout
    KeyTimeout,

    /// Application signature word does not match the expected value
    SignatureMismatch,

    /// `.auth` section bounds from the linker are inverted or misaligned
    InvalidRegion,

    /// State machine found itself in a state it can never legitimately be in
    InvalidState,

    /// Peripheral bring-up failed before the state machine started
    HardwareInit,
}
