//! Key unwrapping for the OPVault hierarchy.
//!
//! Two distinct wrap formats exist. The master and overview keys are full
//! opdata01 containers whose plaintext is re-stretched through SHA-512
//! before splitting. Per-item keys use a bare fixed-size layout with no
//! container envelope: 16-byte IV, 64-byte ciphertext, 32-byte tag.

use sha2::{Digest, Sha512};
use zeroize::Zeroize;

use opvault_common::{Error, Result};

use crate::keys::{KeyMac, STRETCHED_LENGTH};
use crate::opdata;
use crate::primitives::{aes256_cbc_decrypt, hmac_sha256, tags_match};

/// Exact size of a wrapped per-item key.
pub const ITEM_KEY_WRAP_SIZE: usize = 112;

/// Unwrap the master or overview key from its opdata01 container.
///
/// The decoded plaintext is hashed with SHA-512 and the 64-byte digest is
/// split into the new key pair. The re-hash is a deliberate extra stretch
/// step in the format, separate from the container's own authentication.
pub fn unwrap_stretched_key(blob: &[u8], kek: &KeyMac) -> Result<KeyMac> {
    let mut raw = opdata::decode(blob, kek)?;
    let mut digest: [u8; STRETCHED_LENGTH] = Sha512::digest(&raw).into();
    raw.zeroize();

    let key = KeyMac::from_bytes(digest);
    digest.zeroize();
    Ok(key)
}

/// Unwrap a per-item key with the master key.
///
/// Layout: `iv[16] || ciphertext[64] || tag[32]`, 112 bytes exactly. The
/// tag is HMAC-SHA256 over `iv || ciphertext` and is verified in constant
/// time before decryption.
///
/// # Errors
/// Returns `ItemKeyCorrupt` on any size or tag failure.
pub fn unwrap_item_key(blob: &[u8], master_key: &KeyMac) -> Result<KeyMac> {
    if blob.len() != ITEM_KEY_WRAP_SIZE {
        return Err(Error::ItemKeyCorrupt("invalid size"));
    }

    let mut iv = [0u8; 16];
    iv.copy_from_slice(&blob[..16]);
    let ciphertext = &blob[16..80];
    let stored_tag = &blob[80..];

    let computed_tag = hmac_sha256(master_key.mac_key(), &[&blob[..16], ciphertext]);
    if !tags_match(&computed_tag, stored_tag) {
        return Err(Error::ItemKeyCorrupt("tag doesn't match"));
    }

    let mut plaintext = aes256_cbc_decrypt(master_key.cipher_key(), &iv, ciphertext)?;
    let mut stretched = [0u8; STRETCHED_LENGTH];
    stretched.copy_from_slice(&plaintext);
    plaintext.zeroize();

    let key = KeyMac::from_bytes(stretched);
    stretched.zeroize();
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::aes256_cbc_encrypt;

    fn master_key() -> KeyMac {
        KeyMac::from_bytes([0x42u8; STRETCHED_LENGTH])
    }

    /// Inverse of `unwrap_item_key` for building test wraps.
    fn wrap_item_key(item_key: &[u8; STRETCHED_LENGTH], iv: &[u8; 16], master: &KeyMac) -> Vec<u8> {
        let ciphertext = aes256_cbc_encrypt(master.cipher_key(), iv, item_key).unwrap();
        let tag = hmac_sha256(master.mac_key(), &[iv.as_slice(), &ciphertext]);

        let mut blob = iv.to_vec();
        blob.extend_from_slice(&ciphertext);
        blob.extend_from_slice(&tag);
        blob
    }

    #[test]
    fn test_item_key_roundtrip() {
        let master = master_key();
        let mut item_key = [0u8; STRETCHED_LENGTH];
        for (i, b) in item_key.iter_mut().enumerate() {
            *b = (200 - i) as u8;
        }

        let blob = wrap_item_key(&item_key, &[7u8; 16], &master);
        assert_eq!(blob.len(), ITEM_KEY_WRAP_SIZE);

        let unwrapped = unwrap_item_key(&blob, &master).unwrap();
        assert_eq!(unwrapped.cipher_key(), &item_key[..32]);
        assert_eq!(unwrapped.mac_key(), &item_key[32..]);
    }

    #[test]
    fn test_item_key_rejects_wrong_size() {
        let master = master_key();
        for size in [0usize, 16, 80, 111, 113, 224] {
            let blob = vec![0u8; size];
            assert!(matches!(
                unwrap_item_key(&blob, &master),
                Err(Error::ItemKeyCorrupt("invalid size"))
            ));
        }
    }

    #[test]
    fn test_item_key_rejects_bad_tag() {
        let master = master_key();
        let mut blob = wrap_item_key(&[1u8; STRETCHED_LENGTH], &[7u8; 16], &master);
        blob[80] ^= 0x01;
        assert!(matches!(
            unwrap_item_key(&blob, &master),
            Err(Error::ItemKeyCorrupt("tag doesn't match"))
        ));
    }

    #[test]
    fn test_item_key_rejects_flipped_ciphertext() {
        let master = master_key();
        let mut blob = wrap_item_key(&[1u8; STRETCHED_LENGTH], &[7u8; 16], &master);
        blob[20] ^= 0x01;
        assert!(unwrap_item_key(&blob, &master).is_err());
    }

    #[test]
    fn test_stretched_key_roundtrip() {
        let kek = master_key();
        let raw = [0x99u8; STRETCHED_LENGTH];
        let blob = opdata::encode(&raw, &[3u8; 16], &kek).unwrap();

        let unwrapped = unwrap_stretched_key(&blob, &kek).unwrap();

        let digest: [u8; STRETCHED_LENGTH] = Sha512::digest(raw).into();
        assert_eq!(unwrapped.cipher_key(), &digest[..32]);
        assert_eq!(unwrapped.mac_key(), &digest[32..]);
    }

    #[test]
    fn test_stretched_key_wrong_kek_fails() {
        let kek = master_key();
        let other = KeyMac::from_bytes([0x11u8; STRETCHED_LENGTH]);
        let blob = opdata::encode(&[0x99u8; 64], &[3u8; 16], &kek).unwrap();
        assert!(matches!(
            unwrap_stretched_key(&blob, &other),
            Err(Error::ContainerCorrupt(_))
        ));
    }
}
