// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Common types used throughout the authentication process

/// Maximum number of key bytes kept (the terminator is not stored).
pub const KEY_MAX_LEN: usize = 8;

/// States of the authenticator.
///
/// Transitions only move forward. `Failed` can be entered from every state and
/// is left only by a system reset.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Hardware is up, timing origin not yet recorded
    Startup,

    /// Waiting for the trigger character, then receiving the key
    AwaitingKey,

    /// Key received; the next step relocates `.auth` and verifies the application
    Launching,

    /// Unrecoverable, only a reset leaves this state
    Failed,
}

/// The five status indicators driven by the authenticator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Indicator {
    /// D0: on while the authenticator is active
    Active = 0,
    /// D1: on once key intake has taken 10 s
    Stage1 = 1,
    /// D2: flashes once key intake has taken 30 s
    Stage2 = 2,
    /// D3: unused by the authenticator, kept off
    Reserved = 3,
    /// D4: on after failure
    Failure = 4,
}

impl Indicator {
    pub const ALL: [Indicator; 5] = [
        Indicator::Active,
        Indicator::Stage1,
        Indicator::Stage2,
        Indicator::Reserved,
        Indicator::Failure,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Key intake timing in milliseconds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Timeouts {
    /// Trigger must arrive within this long after entering `AwaitingKey`
    pub init_ms: u32,
    /// Turn on [`Indicator::Stage1`] after this long in key intake
    pub stage1_ms: u32,
    /// Start flashing [`Indicator::Stage2`] after this long in key intake
    pub stage2_ms: u32,
    /// Fail after this long in key intake
    pub stage3_ms: u32,
    /// Half period of the [`Indicator::Stage2`] flash
    pub flash_period_ms: u32,
}

impl Timeouts {
    pub const DEFAULT: Timeouts = Timeouts {
        init_ms: 15_000,
        stage1_ms: 10_000,
        stage2_ms: 30_000,
        stage3_ms: 45_000,
        flash_period_ms: 250,
    };
}

/// Key bytes received after the trigger.
///
/// Holds at most [`KEY_MAX_LEN`] bytes; anything beyond that is dropped
/// silently.
pub struct KeyBuffer {
    data: [u8; KEY_MAX_LEN],
    len: usize,
    receiving: bool,
}

impl KeyBuffer {
    pub const fn new() -> KeyBuffer {
        KeyBuffer {
            data: [0; KEY_MAX_LEN],
            len: 0,
            receiving: false,
        }
    }

    /// Forget any key material and leave intake mode.
    pub fn clear(&mut self) {
        self.data = [0; KEY_MAX_LEN];
        self.len = 0;
        self.receiving = false;
    }

    /// Enter intake mode with an empty key.
    pub fn start(&mut self) {
        self.len = 0;
        self.receiving = true;
    }

    /// Append a byte. Returns `false` and drops the byte if the buffer is full.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.len >= KEY_MAX_LEN {
            return false;
        }
        self.data[self.len] = byte;
        self.len += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_receiving(&self) -> bool {
        self.receiving
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

#[cfg(test)]
mod test {
    use super::{KeyBuffer, KEY_MAX_LEN};

    #[test]
    fn push_stops_at_capacity() {
        let mut key = KeyBuffer::new();
        key.start();
        for i in 0..KEY_MAX_LEN {
            assert!(key.push(b'a' + i as u8));
            assert_eq!(key.len(), i + 1);
        }

        assert!(!key.push(b'z'));
        assert!(!key.push(b'y'));
        assert_eq!(key.len(), KEY_MAX_LEN);
        assert_eq!(key.as_slice(), b"abcdefgh");
    }

    #[test]
    fn start_discards_previous_bytes() {
        let mut key = KeyBuffer::new();
        assert!(!key.is_receiving());
        key.start();
        key.push(1);
        key.push(2);

        key.start();
        assert!(key.is_receiving());
        assert_eq!(key.len(), 0);
        assert_eq!(key.as_slice(), &[] as &[u8]);
    }

    #[test]
    fn clear_leaves_intake_mode() {
        let mut key = KeyBuffer::new();
        key.start();
        key.push(7);
        key.clear();
        assert!(!key.is_receiving());
        assert_eq!(key.len(), 0);
    }
}
