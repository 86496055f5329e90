// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Board-independent logic for the secure-boot authenticator.
//!
//! The authenticator runs before the application firmware. It waits for a
//! trigger character on the serial line, collects a short key terminated by a
//! newline, and then relocates the `.auth` section from flash into RAM,
//! optionally XOR-decrypts it with the key, and calls the verification routine
//! that lives in that section. The routine checks the application signature
//! and jumps into the application. If it returns, the authenticator enters a
//! permanent failure state.
//!
//! Boards provide the hardware through [`AuthenticatorIO`] and the on-boot
//! constants through [`BoardConfig`].

#![no_std]

#[macro_use]
pub mod debug;
pub mod authenticator;
pub mod error;
pub mod launcher;
pub mod timeout;
pub mod types;
pub mod verify;

#[cfg(test)]
mod mock;

use core::fmt;

use crate::types::{Indicator, Timeouts};

/// Compile-time configuration of a board.
///
/// All values form the on-boot contract between the authenticator and the
/// application image, and none of them can change at runtime. Defaults match
/// the UMMS memory map; a board only has to name where its application starts.
pub trait BoardConfig {
    /// Flash address of the application vector table.
    const APP_START: usize;

    /// Offset of the 4-byte signature word from `APP_START`.
    const APP_SIGNATURE_OFFSET: usize = 0x200;

    /// Expected signature word, "UMMS" in little-endian byte order.
    const APP_SIGNATURE_VALUE: u32 = 0x534D_4D55;

    /// Vector table slot holding the application entry point. Slot 0 is the
    /// initial stack pointer, slot 1 the reset handler.
    const APP_ENTRY_SLOT: usize = 1;

    /// Key intake timing.
    const TIMEOUTS: Timeouts = Timeouts::DEFAULT;

    /// Character that starts key intake.
    const KEY_TRIGGER: u8 = b'A';

    /// Character that ends key intake.
    const KEY_TERMINATOR: u8 = b'\n';

    /// Whether the relocated `.auth` section is XOR-decrypted with the received
    /// key before it is executed. Must match how the image was produced.
    const DECRYPT_AUTH_REGION: bool = false;

    /// Whether the authenticator writes progress messages to the debug output.
    const DEBUG_AUTH: bool = true;
}

/// Hardware services the authenticator needs from a board.
///
/// Every method must return immediately. The authenticator is the only caller
/// and never calls these methods re-entrantly.
pub trait AuthenticatorIO {
    /// Monotonic millisecond counter.
    fn now_ms(&self) -> u32;

    /// Whether at least one received byte is waiting.
    fn has_data(&self) -> bool;

    /// Copy already-received bytes into `buf`, returning how many were copied.
    fn receive(&self, buf: &mut [u8]) -> usize;

    /// Switch a status indicator on or off.
    fn set_indicator(&self, indicator: Indicator, on: bool);

    /// Invert a status indicator.
    fn toggle_indicator(&self, indicator: Indicator);

    /// Write one line of diagnostic output.
    fn debug(&self, args: fmt::Arguments<'_>);
}
