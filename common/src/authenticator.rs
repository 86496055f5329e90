// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Authenticator state machine.
//!
//! ```text
//!   Startup
//!     └─► AwaitingKey      (timing origin recorded)
//!           ├─► Failed     ('A' not received within 15 s, or key not
//!           │               terminated within 45 s of the 'A')
//!           └─► Launching  (key terminated with '\n')
//!                 └─► Failed (verification routine returned)
//! ```
//!
//! The board's main loop calls [`Authenticator::step`] forever. Each call does
//! a bounded amount of work and returns; only the `Launching` step can leave
//! and never come back, when the verification routine jumps into the
//! application.
//!
//! Indicator policy while receiving the key:
//!
//! - after 10 s, `Stage1` is switched on,
//! - after 30 s, `Stage2` starts toggling every 250 ms,
//! - after 45 s, the authenticator fails.
//!
//! Within one step the timeout stages are evaluated before a byte is read, so
//! a byte arriving in the step that crosses 45 s is never consumed.

use core::marker::PhantomData;

use crate::error::BootError;
use crate::launcher::Launcher;
use crate::timeout::TimeoutTracker;
use crate::types::{AuthState, Indicator, KeyBuffer};
use crate::{AuthenticatorIO, BoardConfig};

pub struct Authenticator<'a, C: BoardConfig, IO: AuthenticatorIO, L: Launcher> {
    io: &'a IO,
    launcher: &'a L,
    state: AuthState,
    key: KeyBuffer,
    timeouts: TimeoutTracker,
    failure: Option<BootError>,
    launched: bool,
    _config: PhantomData<C>,
}

impl<'a, C: BoardConfig, IO: AuthenticatorIO, L: Launcher> Authenticator<'a, C, IO, L> {
    pub fn new(io: &'a IO, launcher: &'a L) -> Self {
        Authenticator {
            io,
            launcher,
            state: AuthState::Startup,
            key: KeyBuffer::new(),
            timeouts: TimeoutTracker::new(C::TIMEOUTS),
            failure: None,
            launched: false,
            _config: PhantomData,
        }
    }

    /// Reset to `Startup` and show the "authenticator active" pattern.
    ///
    /// Must be called once before the first [`step`](Self::step).
    pub fn init(&mut self) {
        self.state = AuthState::Startup;
        self.key.clear();
        self.timeouts.reset();
        self.failure = None;
        self.launched = false;

        for indicator in Indicator::ALL {
            self.io
                .set_indicator(indicator, indicator == Indicator::Active);
        }
    }

    /// Advance the state machine by one step. Never blocks.
    pub fn step(&mut self) {
        let now = self.io.now_ms();

        match self.state {
            AuthState::Startup => {
                // Peripherals are already initialized by the board, so this
                // state only records the timing origin.
                debug!(C, self.io, "[AUTH] Bootup complete, waiting for key");
                self.timeouts.start_phase(now);
                self.state = AuthState::AwaitingKey;
            }
            AuthState::AwaitingKey => {
                if self.key.is_receiving() {
                    self.receive_key(now);
                } else {
                    self.await_trigger(now);
                }
            }
            AuthState::Launching => self.launch(),
            AuthState::Failed => {}
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Why the authenticator failed, if it has.
    pub fn failure(&self) -> Option<BootError> {
        self.failure
    }

    /// Key bytes received so far.
    pub fn key(&self) -> &[u8] {
        self.key.as_slice()
    }

    /// Whether the trigger has been seen and key bytes are being collected.
    pub fn is_receiving_key(&self) -> bool {
        self.key.is_receiving()
    }

    fn await_trigger(&mut self, now: u32) {
        if self.timeouts.trigger_expired(now) {
            debug!(
                C,
                self.io,
                "[AUTH] Timeout: trigger not received within {} ms",
                C::TIMEOUTS.init_ms
            );
            self.fail(BootError::TriggerTimeout);
            return;
        }

        // Anything other than the trigger is noise at this point.
        if self.poll_byte() == Some(C::KEY_TRIGGER) {
            debug!(C, self.io, "[AUTH] Trigger received, waiting for key");
            self.key.start();
            self.timeouts.start_key_intake(now);
        }
    }

    fn receive_key(&mut self, now: u32) {
        let events = self.timeouts.check_key_intake(now);

        if events.stage1 {
            debug!(C, self.io, "[AUTH] Stage-1 timeout, Stage1 LED on");
            self.io.set_indicator(Indicator::Stage1, true);
        }
        if events.stage2 {
            debug!(C, self.io, "[AUTH] Stage-2 timeout, Stage2 LED flashing");
        }
        if events.flash_toggle {
            self.io.toggle_indicator(Indicator::Stage2);
        }
        if events.expired {
            debug!(C, self.io, "[AUTH] Stage-3 timeout, key not received");
            self.fail(BootError::KeyTimeout);
            return;
        }

        let byte = match self.poll_byte() {
            Some(byte) => byte,
            None => return,
        };

        if byte == C::KEY_TERMINATOR {
            debug!(C, self.io, "[AUTH] Key received ({} bytes)", self.key.len());
            self.io.set_indicator(Indicator::Stage1, false);
            self.io.set_indicator(Indicator::Stage2, false);
            self.state = AuthState::Launching;
        } else {
            // Bytes beyond capacity are dropped without telling the sender.
            let _ = self.key.push(byte);
        }
    }

    fn launch(&mut self) {
        if self.launched {
            // The launcher already ran and returned; it must not run again.
            self.fail(BootError::InvalidState);
            return;
        }
        self.launched = true;

        let err = self.launcher.launch(self.io, self.key.as_slice());

        debug!(C, self.io, "[AUTH] Verification returned: {:?}", err);
        self.fail(err);
    }

    fn poll_byte(&self) -> Option<u8> {
        if !self.io.has_data() {
            return None;
        }
        let mut buf = [0u8; 1];
        match self.io.receive(&mut buf) {
            0 => None,
            _ => Some(buf[0]),
        }
    }

    /// Show the failure pattern and enter `Failed`. Safe to call repeatedly;
    /// the first reason is kept.
    fn fail(&mut self, reason: BootError) {
        for indicator in Indicator::ALL {
            self.io
                .set_indicator(indicator, indicator == Indicator::Failure);
        }

        if self.failure.is_none() {
            self.failure = Some(reason);
        }
        self.state = AuthState::Failed;
    }
}
