// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! General purpose I/O ports.

use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::{ReadWrite, WriteOnly};
use tock_registers::register_structs;

use crate::static_ref::StaticRef;

register_structs! {
    pub GpioRegisters {
        /// port mode register
        (0x00 => moder: ReadWrite<u32>),
        /// port output type register
        (0x04 => otyper: ReadWrite<u32>),
        /// port output speed register
        (0x08 => ospeedr: ReadWrite<u32>),
        /// port pull-up/pull-down register
        (0x0C => pupdr: ReadWrite<u32>),
        (0x10 => _reserved0),
        /// port output data register
        (0x14 => odr: ReadWrite<u32>),
        /// port bit set/reset register
        (0x18 => bsrr: WriteOnly<u32>),
        (0x1C => _reserved1),
        /// alternate function low register
        (0x20 => afrl: ReadWrite<u32>),
        (0x24 => _reserved2),
        (0x28 => @END),
    }
}

const GPIOA_BASE: StaticRef<GpioRegisters> =
    unsafe { StaticRef::new(0x4800_0000 as *const GpioRegisters) };
const GPIOB_BASE: StaticRef<GpioRegisters> =
    unsafe { StaticRef::new(0x4800_0400 as *const GpioRegisters) };

#[repr(u32)]
enum Mode {
    Output = 0b01,
    Alternate = 0b10,
}

pub struct GpioPort {
    registers: StaticRef<GpioRegisters>,
}

impl GpioPort {
    pub const fn porta() -> GpioPort {
        GpioPort {
            registers: GPIOA_BASE,
        }
    }

    pub const fn portb() -> GpioPort {
        GpioPort {
            registers: GPIOB_BASE,
        }
    }

    fn set_mode(&self, pin: u32, mode: Mode) {
        let shift = pin * 2;
        let moder = self.registers.moder.get() & !(0b11 << shift);
        self.registers.moder.set(moder | ((mode as u32) << shift));
    }

    /// Push-pull output, low speed, no pull.
    pub fn make_output(&self, pin: u32) {
        self.registers
            .otyper
            .set(self.registers.otyper.get() & !(1 << pin));
        self.registers
            .ospeedr
            .set(self.registers.ospeedr.get() & !(0b11 << (pin * 2)));
        self.registers
            .pupdr
            .set(self.registers.pupdr.get() & !(0b11 << (pin * 2)));
        self.set_mode(pin, Mode::Output);
    }

    /// Route one of pins 0..=7 to alternate function `af`.
    pub fn make_alternate(&self, pin: u32, af: u32) {
        let shift = pin * 4;
        let afrl = self.registers.afrl.get() & !(0xF << shift);
        self.registers.afrl.set(afrl | ((af & 0xF) << shift));
        self.set_mode(pin, Mode::Alternate);
    }

    pub fn set(&self, pin: u32) {
        self.registers.bsrr.set(1 << pin);
    }

    pub fn clear(&self, pin: u32) {
        self.registers.bsrr.set(1 << (pin + 16));
    }

    pub fn is_set(&self, pin: u32) -> bool {
        self.registers.odr.get() & (1 << pin) != 0
    }

    pub fn toggle(&self, pin: u32) {
        if self.is_set(pin) {
            self.clear(pin);
        } else {
            self.set(pin);
        }
    }
}
