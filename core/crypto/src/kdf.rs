//! Key-encryption-key derivation using PBKDF2-HMAC-SHA512.
//!
//! The OPVault profile fixes the KDF: PBKDF2 with HMAC-SHA512, a vault
//! specific salt and iteration count, and a 64-byte output that splits
//! into the KEK's cipher/MAC halves. This is the only intentionally
//! expensive step in the pipeline.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use zeroize::Zeroize;

use crate::keys::{KeyMac, STRETCHED_LENGTH};

/// Derive the key-encryption-key from a passphrase.
///
/// # Postconditions
/// - Deterministic for identical `(password, salt, iterations)` inputs
/// - The intermediate 64-byte output is zeroized after splitting
///
/// The KEK only ever unwraps the master and overview keys; it never
/// touches item data directly.
pub fn derive_kek(password: &[u8], salt: &[u8], iterations: u32) -> KeyMac {
    let mut stretched = [0u8; STRETCHED_LENGTH];
    pbkdf2_hmac::<Sha512>(password, salt, iterations, &mut stretched);

    let kek = KeyMac::from_bytes(stretched);
    stretched.zeroize();
    kek
}
