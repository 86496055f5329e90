// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Test doubles for the board services.

use core::cell::{Cell, RefCell};
use core::fmt;

use crate::error::BootError;
use crate::launcher::Launcher;
use crate::types::{Indicator, KEY_MAX_LEN};
use crate::{AuthenticatorIO, BoardConfig};

pub struct TestConfig;

impl BoardConfig for TestConfig {
    const APP_START: usize = 0x0801_0000;
}

/// Fixed-size text sink usable without an allocator.
pub struct LineBuffer {
    buf: [u8; 128],
    len: usize,
}

impl LineBuffer {
    pub fn new() -> LineBuffer {
        LineBuffer {
            buf: [0; 128],
            len: 0,
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap()
    }
}

impl fmt::Write for LineBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let end = (self.len + bytes.len()).min(self.buf.len());
        self.buf[self.len..end].copy_from_slice(&bytes[..end - self.len]);
        self.len = end;
        Ok(())
    }
}

struct RxQueue {
    bytes: [u8; 64],
    head: usize,
    tail: usize,
}

/// Board double with a settable clock, a scripted receive queue and
/// recorded indicator activity.
pub struct MockIO {
    now: Cell<u32>,
    rx: RefCell<RxQueue>,
    leds: Cell<[bool; 5]>,
    switched_on: Cell<[usize; 5]>,
    toggles: Cell<[usize; 5]>,
    debug_lines: Cell<usize>,
    last_line: RefCell<LineBuffer>,
}

impl MockIO {
    pub fn new() -> MockIO {
        MockIO {
            now: Cell::new(0),
            rx: RefCell::new(RxQueue {
                bytes: [0; 64],
                head: 0,
                tail: 0,
            }),
            leds: Cell::new([false; 5]),
            switched_on: Cell::new([0; 5]),
            toggles: Cell::new([0; 5]),
            debug_lines: Cell::new(0),
            last_line: RefCell::new(LineBuffer::new()),
        }
    }

    pub fn set_now(&self, now: u32) {
        self.now.set(now);
    }

    pub fn send(&self, bytes: &[u8]) {
        let mut rx = self.rx.borrow_mut();
        for &byte in bytes {
            let tail = rx.tail;
            rx.bytes[tail] = byte;
            rx.tail += 1;
        }
    }

    pub fn pending(&self) -> usize {
        let rx = self.rx.borrow();
        rx.tail - rx.head
    }

    pub fn led(&self, indicator: Indicator) -> bool {
        self.leds.get()[indicator.index()]
    }

    pub fn leds(&self) -> [bool; 5] {
        self.leds.get()
    }

    pub fn switched_on(&self, indicator: Indicator) -> usize {
        self.switched_on.get()[indicator.index()]
    }

    pub fn toggles(&self, indicator: Indicator) -> usize {
        self.toggles.get()[indicator.index()]
    }

    pub fn debug_lines(&self) -> usize {
        self.debug_lines.get()
    }

    pub fn last_line_contains(&self, needle: &str) -> bool {
        self.last_line.borrow().as_str().contains(needle)
    }
}

impl AuthenticatorIO for MockIO {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }

    fn has_data(&self) -> bool {
        self.pending() > 0
    }

    fn receive(&self, buf: &mut [u8]) -> usize {
        let mut rx = self.rx.borrow_mut();
        let mut count = 0;
        while count < buf.len() && rx.head < rx.tail {
            buf[count] = rx.bytes[rx.head];
            rx.head += 1;
            count += 1;
        }
        count
    }

    fn set_indicator(&self, indicator: Indicator, on: bool) {
        let mut leds = self.leds.get();
        leds[indicator.index()] = on;
        self.leds.set(leds);
        if on {
            let mut switched_on = self.switched_on.get();
            switched_on[indicator.index()] += 1;
            self.switched_on.set(switched_on);
        }
    }

    fn toggle_indicator(&self, indicator: Indicator) {
        let mut leds = self.leds.get();
        leds[indicator.index()] = !leds[indicator.index()];
        self.leds.set(leds);
        let mut toggles = self.toggles.get();
        toggles[indicator.index()] += 1;
        self.toggles.set(toggles);
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        let mut line = self.last_line.borrow_mut();
        line.clear();
        let _ = fmt::Write::write_fmt(&mut *line, args);
        self.debug_lines.set(self.debug_lines.get() + 1);
    }
}

/// Launcher double that records the key it was handed and always reports
/// a signature mismatch.
pub struct MockLauncher {
    calls: Cell<usize>,
    key: Cell<[u8; KEY_MAX_LEN]>,
    key_len: Cell<usize>,
}

impl MockLauncher {
    pub fn new() -> MockLauncher {
        MockLauncher {
            calls: Cell::new(0),
            key: Cell::new([0; KEY_MAX_LEN]),
            key_len: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn key(&self) -> ([u8; KEY_MAX_LEN], usize) {
        (self.key.get(), self.key_len.get())
    }
}

impl Launcher for MockLauncher {
    fn launch<IO: AuthenticatorIO>(&self, _io: &IO, key: &[u8]) -> BootError {
        self.calls.set(self.calls.get() + 1);
        let mut copy = [0; KEY_MAX_LEN];
        copy[..key.len()].copy_from_slice(key);
        self.key.set(copy);
        self.key_len.set(key.len());
        BootError::SignatureMismatch
    }
}
