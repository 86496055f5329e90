// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Secure-boot authenticator for the NUCLEO-G474RE.
//!
//! Brings up only what the authenticator needs (SysTick, LPUART1 for the key
//! and the five status LEDs), then drives the authenticator state machine
//! from a tight loop until it launches the application or fails.

#![no_std]
#![no_main]

mod auth;
mod gpio;
mod io;
mod lpuart;
mod panic;
mod rcc;
mod static_ref;
mod systick;

use cortex_m_rt::entry;

use secure_auth_common::authenticator::Authenticator;
use secure_auth_common::launcher::RelocatingLauncher;
use secure_auth_common::{debug, BoardConfig};

/// Core clock after reset (HSI16).
const CORE_CLOCK_HZ: u32 = 16_000_000;

/// On-boot contract for this board.
pub struct NucleoConfig;

impl BoardConfig for NucleoConfig {
    /// The application follows the authenticator's 64 KiB of flash.
    const APP_START: usize = 0x0801_0000;

    /// The image tooling stores `.auth` in plain text for this board.
    const DECRYPT_AUTH_REGION: bool = false;
}

#[entry]
fn main() -> ! {
    let io = io::NucleoIO::new();

    let mut core = match cortex_m::Peripherals::take() {
        Some(core) => core,
        None => io.halt(),
    };
    systick::start(&mut core.SYST, CORE_CLOCK_HZ);

    if io.init().is_err() {
        // Without a UART there is no way to receive a key.
        io.halt();
    }

    debug!(NucleoConfig, &io, "[AUTH] Authenticator started");

    // Safety: `auth_verify` is linked into `.auth`, which is exactly the
    // region described by the linker symbols.
    let launcher: RelocatingLauncher<NucleoConfig> =
        unsafe { RelocatingLauncher::new(auth::privileged_region(), auth::auth_verify) };

    let mut authenticator: Authenticator<NucleoConfig, _, _> = Authenticator::new(&io, &launcher);
    authenticator.init();

    loop {
        authenticator.step();
    }
}
