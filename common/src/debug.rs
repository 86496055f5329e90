// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Debug output for the authenticator.
//!
//! Output goes through [`AuthenticatorIO::debug`](crate::AuthenticatorIO::debug)
//! and is compiled out entirely when the board sets
//! [`BoardConfig::DEBUG_AUTH`](crate::BoardConfig::DEBUG_AUTH) to `false`.
//!
//! Usage
//! -----
//!
//! ```ignore
//! debug!(MyBoard, io, "Key received ({} bytes)", key.len());
//! ```

use core::fmt;

/// Write a formatted line to a board's debug output.
///
/// The first argument is the `BoardConfig` type, the second the
/// `AuthenticatorIO` instance.
#[macro_export]
macro_rules! debug {
    ($config:ty, $io:expr, $($arg:tt)+) => ({
        if <$config as $crate::BoardConfig>::DEBUG_AUTH {
            $crate::AuthenticatorIO::debug($io, format_args!($($arg)+));
        }
    });
}

/// Formats an address as `0x` followed by eight hex digits.
#[derive(Copy, Clone)]
pub struct HexWord(pub usize);

impl fmt::Display for HexWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::HexWord;
    use crate::mock::LineBuffer;
    use core::fmt::Write;

    #[test]
    fn hex_word_is_zero_padded() {
        let mut line = LineBuffer::new();
        write!(line, "{}", HexWord(0x0801_0000)).unwrap();
        assert_eq!(line.as_str(), "0x08010000");

        line.clear();
        write!(line, "{}", HexWord(0x4)).unwrap();
        assert_eq!(line.as_str(), "0x00000004");
    }
}
