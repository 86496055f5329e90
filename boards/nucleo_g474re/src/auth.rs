// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! The `.auth` section: the verification routine and the linker symbols
//! that bound it.
//!
//! `auth_verify` executes from RAM after the launcher has copied the section
//! out of flash. It must not call anything in `.text` and must not read
//! `.rodata`, which is why the image description is a `const` passed by value
//! into `#[inline(always)]` helpers.

use core::ptr::{addr_of, addr_of_mut};

use secure_auth_common::launcher::PrivilegedRegion;
use secure_auth_common::verify::{self, ApplicationImage};

use crate::NucleoConfig;

const APP_IMAGE: ApplicationImage = ApplicationImage::from_config::<NucleoConfig>();

extern "C" {
    /// Start of `.auth` in RAM (execution address)
    static mut _sauth: u32;
    /// End of `.auth` in RAM
    static mut _eauth: u32;
    /// Start of `.auth` in flash (load address)
    static _sloadauth: u32;
}

/// Check the application signature and jump into it. Returns only if the
/// signature does not match.
#[no_mangle]
#[inline(never)]
#[link_section = ".auth"]
pub extern "C" fn auth_verify() {
    // Safety: APP_IMAGE names the fixed application flash area, which is
    // always mapped and readable, and `verify_and_start` only jumps after the
    // signature check passed.
    unsafe { verify::verify_and_start(APP_IMAGE) }
}

/// The `.auth` section as placed by `memory.x`.
pub fn privileged_region() -> PrivilegedRegion {
    // Safety: the symbols come from the linker script, which reserves
    // `_sauth.._eauth` in RAM exclusively for this section and stores the
    // same number of bytes at `_sloadauth` in flash.
    unsafe {
        PrivilegedRegion::new(
            addr_of_mut!(_sauth),
            addr_of_mut!(_eauth),
            addr_of!(_sloadauth),
        )
    }
}
