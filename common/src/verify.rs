// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Application signature check and hand-off.
//!
//! Everything here is meant to be instantiated inside the board's `.auth`
//! verification routine, which runs from RAM after relocation. That routine
//! may not call into `.text`, so every function is `#[inline(always)]` and
//! only performs plain loads and a single indirect branch. Pass
//! [`ApplicationImage`] by value built from constants so its fields become
//! immediates in the relocated code rather than references into `.rodata`.

use core::ptr;

use crate::BoardConfig;

/// Where the application keeps its signature and entry point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ApplicationImage {
    /// Address of the application vector table
    pub base: usize,
    /// Offset of the signature word from `base`
    pub signature_offset: usize,
    /// Expected signature word
    pub signature_value: u32,
    /// Vector table slot holding the entry point
    pub entry_slot: usize,
}

impl ApplicationImage {
    pub const fn from_config<C: BoardConfig>() -> ApplicationImage {
        ApplicationImage {
            base: C::APP_START,
            signature_offset: C::APP_SIGNATURE_OFFSET,
            signature_value: C::APP_SIGNATURE_VALUE,
            entry_slot: C::APP_ENTRY_SLOT,
        }
    }

    /// Read the signature word.
    ///
    /// # Safety
    ///
    /// `base + signature_offset` must be readable and word aligned.
    #[inline(always)]
    pub unsafe fn signature(&self) -> u32 {
        ptr::read_volatile((self.base + self.signature_offset) as *const u32)
    }

    /// Entry point of the application, if its signature is valid.
    ///
    /// # Safety
    ///
    /// The signature word and the vector table slot must be readable and word
    /// aligned.
    #[inline(always)]
    pub unsafe fn entry_point(&self) -> Option<usize> {
        if self.signature() != self.signature_value {
            return None;
        }
        let table = self.base as *const u32;
        Some(ptr::read_volatile(table.add(self.entry_slot)) as usize)
    }
}

/// Transfer control to the application.
///
/// This is the only place in the authenticator where an address becomes code.
///
/// # Safety
///
/// `entry` must be the reset handler of an application whose signature has
/// already been checked, read from the application's own vector table slot
/// (on Cortex-M the Thumb bit is already set there). Nothing of the caller's
/// state survives: the application takes over the stack and never returns.
#[inline(always)]
pub unsafe fn start_application(entry: usize) -> ! {
    let start: extern "C" fn() = core::mem::transmute(entry);
    start();

    // An application that returns has nowhere to go back to.
    loop {
        core::hint::spin_loop();
    }
}

/// Check the application signature and start it. Returns only on mismatch.
///
/// # Safety
///
/// See [`ApplicationImage::entry_point`] and [`start_application`].
#[inline(always)]
pub unsafe fn verify_and_start(image: ApplicationImage) {
    if let Some(entry) = image.entry_point() {
        start_application(entry);
    }
}
