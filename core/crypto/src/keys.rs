//! Key types with secure memory handling.
//!
//! All key material automatically zeroizes on drop to prevent sensitive
//! data from persisting in memory.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of a single key half in bytes (256-bit).
pub const KEY_LENGTH: usize = 32;

/// Length of the stretched secret a `KeyMac` is split from.
pub const STRETCHED_LENGTH: usize = 64;

/// A paired cipher key and MAC key.
///
/// Every key in the OPVault hierarchy (KEK, master, overview, per-item) is
/// a 64-byte stretched secret split down the middle: the first half
/// encrypts, the second half authenticates. The two halves are never used
/// interchangeably.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMac {
    cipher_key: [u8; KEY_LENGTH],
    mac_key: [u8; KEY_LENGTH],
}

impl KeyMac {
    /// Split a 64-byte stretched secret into a key pair.
    ///
    /// # Postconditions
    /// - The first 32 bytes become the cipher key, the last 32 the MAC key
    /// - The returned pair zeroizes on drop
    pub fn from_bytes(stretched: [u8; STRETCHED_LENGTH]) -> Self {
        let mut cipher_key = [0u8; KEY_LENGTH];
        let mut mac_key = [0u8; KEY_LENGTH];
        cipher_key.copy_from_slice(&stretched[..KEY_LENGTH]);
        mac_key.copy_from_slice(&stretched[KEY_LENGTH..]);

        let mut stretched = stretched;
        stretched.zeroize();

        Self {
            cipher_key,
            mac_key,
        }
    }

    /// Get the cipher-key half.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn cipher_key(&self) -> &[u8; KEY_LENGTH] {
        &self.cipher_key
    }

    /// Get the MAC-key half.
    pub fn mac_key(&self) -> &[u8; KEY_LENGTH] {
        &self.mac_key
    }
}

impl fmt::Debug for KeyMac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMac([REDACTED])")
    }
}
