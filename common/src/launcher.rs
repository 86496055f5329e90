// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Relocate-and-verify launch sequence.
//!
//! The `.auth` section is linked to run from RAM but stored in flash. Before
//! the verification routine inside it can run, the section is copied word by
//! word to its execution address and, on boards that ship it encrypted,
//! XOR-decrypted in place with the key received over the serial line. The
//! routine then either jumps into the application or returns.

use core::marker::PhantomData;
use core::ptr;

use crate::debug::HexWord;
use crate::error::BootError;
use crate::{AuthenticatorIO, BoardConfig};

/// Runs the launch sequence.
pub trait Launcher {
    /// Relocate, optionally decrypt, and run the verification routine.
    ///
    /// On success control is transferred to the application and this never
    /// returns. Any return is a failure and carries its reason.
    fn launch<IO: AuthenticatorIO>(&self, io: &IO, key: &[u8]) -> BootError;
}

/// XOR `bytes` with `key`, repeating the key as often as needed.
///
/// An empty key leaves `bytes` unchanged.
pub fn xor_with_key(bytes: &mut [u8], key: &[u8]) {
    if key.is_empty() {
        return;
    }
    for (byte, k) in bytes.iter_mut().zip(key.iter().cycle()) {
        *byte ^= *k;
    }
}

/// Execution and storage location of the privileged `.auth` section.
///
/// Boards build this from the linker symbols that bound the section.
#[derive(Copy, Clone)]
pub struct PrivilegedRegion {
    start: *mut u32,
    end: *mut u32,
    load: *const u32,
}

impl PrivilegedRegion {
    /// Describe a region executing at `start..end` and stored at `load`.
    ///
    /// # Safety
    ///
    /// `start..end` must be RAM that nothing else uses while the launcher
    /// runs, and `load` must be readable for as many words as the region is
    /// long.
    pub const unsafe fn new(start: *mut u32, end: *mut u32, load: *const u32) -> PrivilegedRegion {
        PrivilegedRegion { start, end, load }
    }

    pub fn start(&self) -> usize {
        self.start as usize
    }

    pub fn end(&self) -> usize {
        self.end as usize
    }

    /// Length of the region in words.
    pub fn len_words(&self) -> Result<usize, BootError> {
        let start = self.start as usize;
        let end = self.end as usize;
        if end < start || (end - start) % 4 != 0 || start % 4 != 0 {
            return Err(BootError::InvalidRegion);
        }
        Ok((end - start) / 4)
    }

    /// Copy the section from its load address to its execution address.
    pub fn relocate(&self) -> Result<(), BootError> {
        let words = self.len_words()?;
        for i in 0..words {
            // Safety: `new`'s contract makes both ranges valid for `words`
            // words, and the bounds were checked above.
            unsafe {
                ptr::write_volatile(self.start.add(i), ptr::read_volatile(self.load.add(i)));
            }
        }
        Ok(())
    }

    /// XOR the relocated section in place with `key`.
    pub fn apply_key(&self, key: &[u8]) -> Result<(), BootError> {
        let words = self.len_words()?;
        // Safety: the region is exclusively ours per `new`'s contract and is
        // `words * 4` bytes long.
        let bytes = unsafe { core::slice::from_raw_parts_mut(self.start as *mut u8, words * 4) };
        xor_with_key(bytes, key);
        Ok(())
    }
}

/// Launcher that relocates a [`PrivilegedRegion`] and calls the verification
/// routine linked into it.
pub struct RelocatingLauncher<C: BoardConfig> {
    region: PrivilegedRegion,
    verify: unsafe extern "C" fn(),
    _config: PhantomData<C>,
}

impl<C: BoardConfig> RelocatingLauncher<C> {
    /// # Safety
    ///
    /// `verify` must be linked to run from inside `region` and must only
    /// depend on the region contents and the application image.
    pub const unsafe fn new(region: PrivilegedRegion, verify: unsafe extern "C" fn()) -> Self {
        RelocatingLauncher {
            region,
            verify,
            _config: PhantomData,
        }
    }

    fn prepare<IO: AuthenticatorIO>(&self, io: &IO, key: &[u8]) -> Result<(), BootError> {
        debug!(
            C,
            io,
            "[AUTH] Copying .auth section to RAM ({}..{})",
            HexWord(self.region.start()),
            HexWord(self.region.end())
        );
        self.region.relocate()?;

        if C::DECRYPT_AUTH_REGION {
            debug!(C, io, "[AUTH] Decrypting .auth section");
            self.region.apply_key(key)?;
        }
        Ok(())
    }
}

impl<C: BoardConfig> Launcher for RelocatingLauncher<C> {
    fn launch<IO: AuthenticatorIO>(&self, io: &IO, key: &[u8]) -> BootError {
        if let Err(err) = self.prepare(io, key) {
            return err;
        }

        debug!(C, io, "[AUTH] Calling auth_verify()");
        // Safety: the region holding `verify` has just been relocated (and
        // decrypted if the board ships it encrypted), per `new`'s contract.
        unsafe { (self.verify)() };

        BootError::SignatureMismatch
    }
}

#[cfg(test)]
mod test {
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::{xor_with_key, Launcher, PrivilegedRegion, RelocatingLauncher};
    use crate::error::BootError;
    use crate::mock::{MockIO, TestConfig};
    use crate::types::KEY_MAX_LEN;
    use crate::BoardConfig;

    struct EncryptedConfig;

    impl BoardConfig for EncryptedConfig {
        const APP_START: usize = 0x0801_0000;
        const DECRYPT_AUTH_REGION: bool = true;
    }

    const FLASH: [u32; 6] = [
        0x1111_1111,
        0x2222_2222,
        0xdead_beef,
        0x0000_0000,
        0xffff_ffff,
        0x0102_0304,
    ];

    #[test]
    fn xor_twice_restores_region() {
        let mut original = [0u8; 37];
        for (i, byte) in original.iter_mut().enumerate() {
            *byte = (i * 7 + 3) as u8;
        }
        let key = *b"k3y!\x00\xffQz";

        for key_len in 1..=KEY_MAX_LEN {
            for region_len in [0, 1, key_len - 1, key_len, key_len + 1, 37] {
                let mut data = original;
                xor_with_key(&mut data[..region_len], &key[..key_len]);
                xor_with_key(&mut data[..region_len], &key[..key_len]);
                assert_eq!(data, original);
            }
        }
    }

    #[test]
    fn xor_key_wraps() {
        let mut data = [0u8; 7];
        xor_with_key(&mut data, &[1, 2, 3]);
        assert_eq!(data, [1, 2, 3, 1, 2, 3, 1]);
    }

    #[test]
    fn xor_with_empty_key_is_noop() {
        let mut data = [9u8, 8, 7];
        xor_with_key(&mut data, &[]);
        assert_eq!(data, [9, 8, 7]);
    }

    #[test]
    fn relocate_copies_whole_region() {
        let mut ram = [0u32; 8];
        let base = ram.as_mut_ptr();
        let region = unsafe { PrivilegedRegion::new(base, base.add(6), FLASH.as_ptr()) };

        assert_eq!(region.len_words(), Ok(6));
        assert_eq!(region.relocate(), Ok(()));
        assert_eq!(ram[..6], FLASH);
        // Nothing past the end of the region is touched.
        assert_eq!(ram[6..], [0, 0]);
    }

    #[test]
    fn empty_region_is_valid() {
        let mut ram = [0u32; 1];
        let base = ram.as_mut_ptr();
        let region = unsafe { PrivilegedRegion::new(base, base, FLASH.as_ptr()) };
        assert_eq!(region.len_words(), Ok(0));
        assert_eq!(region.relocate(), Ok(()));
        assert_eq!(ram, [0]);
    }

    #[test]
    fn inverted_region_is_rejected() {
        let mut ram = [0u32; 4];
        let base = ram.as_mut_ptr();
        let region = unsafe { PrivilegedRegion::new(base.wrapping_add(2), base, FLASH.as_ptr()) };
        assert_eq!(region.len_words(), Err(BootError::InvalidRegion));
        assert_eq!(region.relocate(), Err(BootError::InvalidRegion));
        assert_eq!(ram, [0; 4]);
    }

    static PLAIN_VERIFY_CALLS: AtomicUsize = AtomicUsize::new(0);

    unsafe extern "C" fn plain_verify() {
        PLAIN_VERIFY_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn launch_relocates_then_verifies() {
        let io = MockIO::new();
        let mut ram = [0u32; 6];
        let base = ram.as_mut_ptr();
        let launcher: RelocatingLauncher<TestConfig> = unsafe {
            RelocatingLauncher::new(
                PrivilegedRegion::new(base, base.add(6), FLASH.as_ptr()),
                plain_verify,
            )
        };

        let err = launcher.launch(&io, b"ignored");
        assert_eq!(err, BootError::SignatureMismatch);
        assert_eq!(PLAIN_VERIFY_CALLS.load(Ordering::SeqCst), 1);
        // Without decryption the key is not applied.
        assert_eq!(ram, FLASH);
        assert!(io.last_line_contains("auth_verify"));
    }

    static ENCRYPTED_VERIFY_CALLS: AtomicUsize = AtomicUsize::new(0);

    unsafe extern "C" fn encrypted_verify() {
        ENCRYPTED_VERIFY_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn launch_decrypts_with_key() {
        let io = MockIO::new();
        let key = [0x5a, 0xa5, 0x3c];

        // Encrypt the stored section the way the image tooling does.
        let mut stored = FLASH;
        let stored_bytes =
            unsafe { core::slice::from_raw_parts_mut(stored.as_mut_ptr() as *mut u8, 24) };
        xor_with_key(stored_bytes, &key);
        assert_ne!(stored, FLASH);

        let mut ram = [0u32; 6];
        let base = ram.as_mut_ptr();
        let launcher: RelocatingLauncher<EncryptedConfig> = unsafe {
            RelocatingLauncher::new(
                PrivilegedRegion::new(base, base.add(6), stored.as_ptr()),
                encrypted_verify,
            )
        };

        let err = launcher.launch(&io, &key);
        assert_eq!(err, BootError::SignatureMismatch);
        assert_eq!(ENCRYPTED_VERIFY_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(ram, FLASH);
    }

    static REJECTED_VERIFY_CALLS: AtomicUsize = AtomicUsize::new(0);

    unsafe extern "C" fn rejected_verify() {
        REJECTED_VERIFY_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn invalid_region_never_runs_verify() {
        let io = MockIO::new();
        let mut ram = [0u32; 4];
        let base = ram.as_mut_ptr();
        let launcher: RelocatingLauncher<TestConfig> = unsafe {
            RelocatingLauncher::new(
                PrivilegedRegion::new(base.wrapping_add(3), base, FLASH.as_ptr()),
                rejected_verify,
            )
        };

        assert_eq!(launcher.launch(&io, &[]), BootError::InvalidRegion);
        assert_eq!(REJECTED_VERIFY_CALLS.load(Ordering::SeqCst), 0);
    }
}
