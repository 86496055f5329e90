// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Layered timeouts for trigger and key intake.
//!
//! All comparisons use elapsed time computed with wrapping subtraction, so a
//! tick counter that wraps during a boot attempt still measures correctly.
//! The tracker only decides *what* happened; the state machine applies the
//! side effects in the order the events are reported.

use crate::types::Timeouts;

/// Events produced by one key-intake timeout check.
///
/// Evaluated in stage order: `stage1`, `stage2`, `flash_toggle`, `expired`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct KeyTimeoutEvents {
    /// Stage 1 crossed for the first time
    pub stage1: bool,
    /// Stage 2 crossed for the first time, flashing starts now
    pub stage2: bool,
    /// A flash period elapsed since the last toggle
    pub flash_toggle: bool,
    /// Stage 3 reached, key intake has failed
    pub expired: bool,
}

pub struct TimeoutTracker {
    timeouts: Timeouts,
    phase_start: u32,
    key_start: u32,
    flash_tick: u32,
    stage1_fired: bool,
    stage2_fired: bool,
}

impl TimeoutTracker {
    pub const fn new(timeouts: Timeouts) -> TimeoutTracker {
        TimeoutTracker {
            timeouts,
            phase_start: 0,
            key_start: 0,
            flash_tick: 0,
            stage1_fired: false,
            stage2_fired: false,
        }
    }

    pub fn reset(&mut self) {
        self.phase_start = 0;
        self.key_start = 0;
        self.flash_tick = 0;
        self.clear_latches();
    }

    /// Record entry into `AwaitingKey`.
    pub fn start_phase(&mut self, now: u32) {
        self.phase_start = now;
        self.clear_latches();
    }

    /// Record reception of the trigger character.
    pub fn start_key_intake(&mut self, now: u32) {
        self.key_start = now;
        self.clear_latches();
    }

    /// Whether the trigger has failed to arrive in time.
    pub fn trigger_expired(&self, now: u32) -> bool {
        now.wrapping_sub(self.phase_start) >= self.timeouts.init_ms
    }

    /// Evaluate all key-intake stages against one elapsed value.
    ///
    /// Latched stages are reported only once. The flash timer is compared
    /// against the last toggle rather than a fixed schedule, so a late call
    /// toggles once and the next period is measured from that call.
    pub fn check_key_intake(&mut self, now: u32) -> KeyTimeoutEvents {
        let elapsed = now.wrapping_sub(self.key_start);
        let mut events = KeyTimeoutEvents::default();

        if !self.stage1_fired && elapsed >= self.timeouts.stage1_ms {
            self.stage1_fired = true;
            events.stage1 = true;
        }

        if !self.stage2_fired && elapsed >= self.timeouts.stage2_ms {
            self.flash_tick = now;
            self.stage2_fired = true;
            events.stage2 = true;
        }

        if self.stage2_fired && now.wrapping_sub(self.flash_tick) >= self.timeouts.flash_period_ms
        {
            self.flash_tick = now;
            events.flash_toggle = true;
        }

        events.expired = elapsed >= self.timeouts.stage3_ms;
        events
    }

    fn clear_latches(&mut self) {
        self.stage1_fired = false;
        self.stage2_fired = false;
    }
}
