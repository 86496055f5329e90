// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Reset and clock control, limited to the clocks the authenticator gates.
//!
//! The system clock is left at its reset default (HSI16), so only peripheral
//! clock enables and the LPUART1 kernel clock selection are touched here.

use tock_registers::interfaces::{ReadWriteable, Readable};
use tock_registers::registers::ReadWrite;
use tock_registers::{register_bitfields, register_structs};

use crate::static_ref::StaticRef;

register_structs! {
    pub RccRegisters {
        (0x000 => _reserved0),
        /// AHB2 peripheral clock enable register
        (0x04C => ahb2enr: ReadWrite<u32, AHB2ENR::Register>),
        (0x050 => _reserved1),
        /// APB1 peripheral clock enable register 2
        (0x05C => apb1enr2: ReadWrite<u32, APB1ENR2::Register>),
        (0x060 => _reserved2),
        /// Peripherals independent clock configuration register
        (0x088 => ccipr: ReadWrite<u32, CCIPR::Register>),
        (0x08C => @END),
    }
}

register_bitfields![u32,
    AHB2ENR [
        /// IO port B clock enable
        GPIOBEN OFFSET(1) NUMBITS(1) [],
        /// IO port A clock enable
        GPIOAEN OFFSET(0) NUMBITS(1) []
    ],
    APB1ENR2 [
        /// Low power UART 1 clock enable
        LPUART1EN OFFSET(0) NUMBITS(1) []
    ],
    CCIPR [
        /// LPUART1 clock source selection
        LPUART1SEL OFFSET(10) NUMBITS(2) [
            PCLK = 0b00,
            SYSCLK = 0b01,
            HSI16 = 0b10,
            LSE = 0b11
        ]
    ]
];

const RCC_BASE: StaticRef<RccRegisters> =
    unsafe { StaticRef::new(0x4002_1000 as *const RccRegisters) };

pub struct Rcc {
    registers: StaticRef<RccRegisters>,
}

impl Rcc {
    pub const fn new() -> Rcc {
        Rcc {
            registers: RCC_BASE,
        }
    }

    pub fn enable_gpio_clocks(&self) {
        self.registers
            .ahb2enr
            .modify(AHB2ENR::GPIOAEN::SET + AHB2ENR::GPIOBEN::SET);
        // Dummy read so the enable has taken effect before the ports are used.
        let _ = self.registers.ahb2enr.get();
    }

    /// Clock LPUART1 from HSI16 so the baud rate does not depend on bus
    /// prescalers.
    pub fn enable_lpuart1_clock(&self) {
        self.registers.ccipr.modify(CCIPR::LPUART1SEL::HSI16);
        self.registers.apb1enr2.modify(APB1ENR2::LPUART1EN::SET);
        let _ = self.registers.apb1enr2.get();
    }
}
