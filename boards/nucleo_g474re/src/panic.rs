// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Panic handler for the authenticator

use core::panic::PanicInfo;

use crate::gpio::GpioPort;
use crate::io::FAILURE_LED_PIN;

/// Panic handler - blinks the failure LED rapidly
#[panic_handler]
fn panic(_info: &PanicInfo) -> ! {
    // GPIOB may be mid-configuration, so drive the pin from scratch.
    let leds = GpioPort::portb();
    leds.make_output(FAILURE_LED_PIN);

    loop {
        leds.toggle(FAILURE_LED_PIN);
        for _ in 0..200_000 {
            cortex_m::asm::nop();
        }
    }
}
