// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! I/O operations for the NUCLEO-G474RE authenticator.

use core::fmt::{self, Write};

use secure_auth_common::error::BootError;
use secure_auth_common::types::Indicator;
use secure_auth_common::AuthenticatorIO;

use crate::gpio::GpioPort;
use crate::lpuart::Lpuart;
use crate::rcc::Rcc;
use crate::systick;

/// LPUART1 kernel clock (HSI16).
const LPUART_CLOCK_HZ: u32 = 16_000_000;
const BAUD_RATE: u32 = 115_200;

/// LPUART1 TX/RX on PA2/PA3, alternate function 12 (the ST-LINK virtual COM port)
const UART_TX_PIN: u32 = 2;
const UART_RX_PIN: u32 = 3;
const UART_AF: u32 = 12;

/// LEDs D0..D4 on PB0..PB4, active high, indexed by `Indicator`
const LED_PINS: [u32; 5] = [0, 1, 2, 3, 4];

pub const FAILURE_LED_PIN: u32 = LED_PINS[Indicator::Failure.index()];

/// NUCLEO-G474RE I/O implementation
pub struct NucleoIO {
    rcc: Rcc,
    uart_port: GpioPort,
    led_port: GpioPort,
    uart: Lpuart,
}

impl NucleoIO {
    pub const fn new() -> Self {
        NucleoIO {
            rcc: Rcc::new(),
            uart_port: GpioPort::porta(),
            led_port: GpioPort::portb(),
            uart: Lpuart::lpuart1(),
        }
    }

    /// Bring up the LEDs and the UART.
    ///
    /// LEDs come first so a UART failure can still be shown.
    pub fn init(&self) -> Result<(), BootError> {
        self.rcc.enable_gpio_clocks();
        for &pin in LED_PINS.iter() {
            self.led_port.clear(pin);
            self.led_port.make_output(pin);
        }

        self.rcc.enable_lpuart1_clock();
        self.uart_port.make_alternate(UART_TX_PIN, UART_AF);
        self.uart_port.make_alternate(UART_RX_PIN, UART_AF);
        self.uart.configure(LPUART_CLOCK_HZ, BAUD_RATE)
    }

    /// Light the failure LED and stop. Used when the hardware cannot be
    /// brought up, before the state machine exists.
    pub fn halt(&self) -> ! {
        for &pin in LED_PINS.iter() {
            self.led_port.clear(pin);
        }
        self.led_port.set(FAILURE_LED_PIN);
        loop {
            cortex_m::asm::wfi();
        }
    }

    fn pin(indicator: Indicator) -> u32 {
        LED_PINS[indicator.index()]
    }
}

/// Adapts the UART to `core::fmt::Write` for debug output.
struct Writer<'a> {
    uart: &'a Lpuart,
}

impl Write for Writer<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &byte in s.as_bytes() {
            self.uart.send_byte(byte);
        }
        Ok(())
    }
}

impl AuthenticatorIO for NucleoIO {
    fn now_ms(&self) -> u32 {
        systick::now_ms()
    }

    fn has_data(&self) -> bool {
        self.uart.has_data()
    }

    fn receive(&self, buf: &mut [u8]) -> usize {
        let mut count = 0;
        while count < buf.len() && self.uart.has_data() {
            buf[count] = self.uart.receive_byte();
            count += 1;
        }
        count
    }

    fn set_indicator(&self, indicator: Indicator, on: bool) {
        if on {
            self.led_port.set(Self::pin(indicator));
        } else {
            self.led_port.clear(Self::pin(indicator));
        }
    }

    fn toggle_indicator(&self, indicator: Indicator) {
        self.led_port.toggle(Self::pin(indicator));
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        let mut writer = Writer { uart: &self.uart };
        let _ = writer.write_fmt(args);
        let _ = writer.write_str("\r\n");
        self.uart.flush();
    }
}
