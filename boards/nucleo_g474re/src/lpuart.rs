// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Polled driver for LPUART1.
//!
//! The authenticator never waits for input, so reception is a non-blocking
//! peek plus a single-byte read. Transmission blocks on TXE and is only used
//! for debug output.

use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

use secure_auth_common::error::BootError;

use crate::static_ref::StaticRef;

register_structs! {
    pub LpuartRegisters {
        /// Control register 1
        (0x00 => cr1: ReadWrite<u32, CR1::Register>),
        /// Control register 2
        (0x04 => cr2: ReadWrite<u32>),
        /// Control register 3
        (0x08 => cr3: ReadWrite<u32>),
        /// Baud rate register
        (0x0C => brr: ReadWrite<u32>),
        (0x10 => _reserved0),
        /// Interrupt and status register
        (0x1C => isr: ReadOnly<u32, ISR::Register>),
        /// Interrupt flag clear register
        (0x20 => icr: WriteOnly<u32, ICR::Register>),
        /// Receive data register
        (0x24 => rdr: ReadOnly<u32>),
        /// Transmit data register
        (0x28 => tdr: WriteOnly<u32>),
        /// Prescaler register
        (0x2C => presc: ReadWrite<u32>),
        (0x30 => @END),
    }
}

register_bitfields![u32,
    CR1 [
        /// FIFO mode enable
        FIFOEN OFFSET(29) NUMBITS(1) [],
        /// Word length bit 1
        M1 OFFSET(28) NUMBITS(1) [],
        /// Word length bit 0
        M0 OFFSET(12) NUMBITS(1) [],
        /// Parity control enable
        PCE OFFSET(10) NUMBITS(1) [],
        /// Transmitter enable
        TE OFFSET(3) NUMBITS(1) [],
        /// Receiver enable
        RE OFFSET(2) NUMBITS(1) [],
        /// LPUART enable
        UE OFFSET(0) NUMBITS(1) []
    ],
    ISR [
        /// Transmit data register empty
        TXE OFFSET(7) NUMBITS(1) [],
        /// Transmission complete
        TC OFFSET(6) NUMBITS(1) [],
        /// Read data register not empty
        RXNE OFFSET(5) NUMBITS(1) [],
        /// Overrun error
        ORE OFFSET(3) NUMBITS(1) [],
        /// Noise detection flag
        NE OFFSET(2) NUMBITS(1) [],
        /// Framing error
        FE OFFSET(1) NUMBITS(1) []
    ],
    ICR [
        /// Overrun error clear flag
        ORECF OFFSET(3) NUMBITS(1) [],
        /// Noise detection clear flag
        NECF OFFSET(2) NUMBITS(1) [],
        /// Framing error clear flag
        FECF OFFSET(1) NUMBITS(1) []
    ]
];

const LPUART1_BASE: StaticRef<LpuartRegisters> =
    unsafe { StaticRef::new(0x4000_8000 as *const LpuartRegisters) };

/// Smallest BRR value the LPUART accepts.
const BRR_MIN: u32 = 0x300;
/// Largest BRR value (20-bit register).
const BRR_MAX: u32 = 0xF_FFFF;

pub struct Lpuart {
    registers: StaticRef<LpuartRegisters>,
}

impl Lpuart {
    pub const fn lpuart1() -> Lpuart {
        Lpuart {
            registers: LPUART1_BASE,
        }
    }

    /// Configure 8N1 at `baud_rate` from a kernel clock of `clock_hz`, with
    /// both directions enabled.
    pub fn configure(&self, clock_hz: u32, baud_rate: u32) -> Result<(), BootError> {
        let brr = brr_value(clock_hz, baud_rate)?;

        self.registers.cr1.set(0);
        self.registers.cr2.set(0);
        self.registers.cr3.set(0);
        self.registers.presc.set(0);
        self.registers.brr.set(brr);
        self.registers.cr1.write(
            CR1::FIFOEN::CLEAR
                + CR1::M1::CLEAR
                + CR1::M0::CLEAR
                + CR1::PCE::CLEAR
                + CR1::TE::SET
                + CR1::RE::SET
                + CR1::UE::SET,
        );
        Ok(())
    }

    /// Whether a received byte is waiting. Clears line errors so a stale
    /// overrun cannot wedge reception.
    pub fn has_data(&self) -> bool {
        let isr = self.registers.isr.extract();
        if isr.is_set(ISR::ORE) || isr.is_set(ISR::FE) || isr.is_set(ISR::NE) {
            self.registers
                .icr
                .write(ICR::ORECF::SET + ICR::FECF::SET + ICR::NECF::SET);
        }
        isr.is_set(ISR::RXNE)
    }

    pub fn receive_byte(&self) -> u8 {
        self.registers.rdr.get() as u8
    }

    pub fn send_byte(&self, byte: u8) {
        while !self.registers.isr.is_set(ISR::TXE) {}
        self.registers.tdr.set(byte as u32);
    }

    /// Wait until the last byte has left the shift register.
    pub fn flush(&self) {
        while !self.registers.isr.is_set(ISR::TC) {}
    }
}

/// BRR = 256 * f_ck / baud for the LPUART.
fn brr_value(clock_hz: u32, baud_rate: u32) -> Result<u32, BootError> {
    if baud_rate == 0 {
        return Err(BootError::HardwareInit);
    }
    let brr = (256 * clock_hz as u64) / baud_rate as u64;
    if brr < BRR_MIN as u64 || brr > BRR_MAX as u64 {
        return Err(BootError::HardwareInit);
    }
    Ok(brr as u32)
}
