//! The opdata01 authenticated container codec.
//!
//! Every secret blob in an OPVault is wrapped in the same fixed binary
//! container:
//!
//! ```text
//! offset  size       field
//! 0       8          magic literal "opdata01"
//! 8       8          plaintext length, little-endian u64
//! 16      16         AES-CBC initialization vector
//! 32      pad+len    ciphertext
//! -32     32         HMAC-SHA256 tag over header || ciphertext
//! ```
//!
//! `pad` is `16 - (len % 16)` and is always in `[1, 16]`: a block-aligned
//! plaintext still gets a full extra block. The padding sits at the *front*
//! of the plaintext, not the end, so decoding keeps the final `len` bytes
//! of the CBC output. The tag is verified before any decryption happens.

use opvault_common::{Error, Result};

use crate::keys::KeyMac;
use crate::primitives::{aes256_cbc_decrypt, aes256_cbc_encrypt, hmac_sha256, tags_match, TAG_SIZE};

/// The 8-byte magic literal opening every container.
pub const MAGIC: &[u8; 8] = b"opdata01";

/// Header size: magic + length + IV.
pub const HEADER_SIZE: usize = 32;

const IV_SIZE: usize = 16;

/// Front padding for a plaintext of `length` bytes, always in `[1, 16]`.
fn padding_for(length: u64) -> u64 {
    16 - length % 16
}

/// Parse, authenticate, and decrypt an opdata01 container.
///
/// # Postconditions
/// - Returns exactly the declared plaintext, with front padding dropped
/// - Never returns partially-trusted plaintext: the tag is checked in
///   constant time before the cipher is touched
///
/// # Errors
/// Returns `ContainerCorrupt` on any structural or authentication
/// failure: short blob, bad magic, inconsistent length, or tag mismatch.
pub fn decode(blob: &[u8], key: &KeyMac) -> Result<Vec<u8>> {
    if blob.len() < HEADER_SIZE + TAG_SIZE {
        return Err(Error::ContainerCorrupt("too short"));
    }

    let header = &blob[..HEADER_SIZE];
    if &header[..MAGIC.len()] != MAGIC {
        return Err(Error::ContainerCorrupt("missing header"));
    }

    let mut length_bytes = [0u8; 8];
    length_bytes.copy_from_slice(&header[8..16]);
    let length = u64::from_le_bytes(length_bytes);

    let mut iv = [0u8; IV_SIZE];
    iv.copy_from_slice(&header[16..HEADER_SIZE]);

    let padding = padding_for(length);
    let expected_size = length
        .checked_add(padding)
        .and_then(|n| n.checked_add((HEADER_SIZE + TAG_SIZE) as u64))
        .ok_or(Error::ContainerCorrupt("invalid length"))?;
    if blob.len() as u64 != expected_size {
        return Err(Error::ContainerCorrupt("invalid length"));
    }

    let ciphertext = &blob[HEADER_SIZE..blob.len() - TAG_SIZE];
    let stored_tag = &blob[blob.len() - TAG_SIZE..];

    let computed_tag = hmac_sha256(key.mac_key(), &[header, ciphertext]);
    if !tags_match(&computed_tag, stored_tag) {
        return Err(Error::ContainerCorrupt("tag doesn't match"));
    }

    let plaintext = aes256_cbc_decrypt(key.cipher_key(), &iv, ciphertext)?;
    Ok(plaintext[padding as usize..].to_vec())
}

/// Build a conformant opdata01 container.
///
/// Inverse of [`decode`] for fixtures and round-trip testing; vault
/// writing is otherwise out of scope. Front padding is zero-filled.
pub fn encode(plaintext: &[u8], iv: &[u8; 16], key: &KeyMac) -> Result<Vec<u8>> {
    let length = plaintext.len() as u64;
    let padding = padding_for(length) as usize;

    let mut header = Vec::with_capacity(HEADER_SIZE);
    header.extend_from_slice(MAGIC);
    header.extend_from_slice(&length.to_le_bytes());
    header.extend_from_slice(iv);

    let mut padded = vec![0u8; padding];
    padded.extend_from_slice(plaintext);
    let ciphertext = aes256_cbc_encrypt(key.cipher_key(), iv, &padded)?;

    let tag = hmac_sha256(key.mac_key(), &[&header, ciphertext.as_slice()]);

    let mut blob = header;
    blob.extend_from_slice(&ciphertext);
    blob.extend_from_slice(&tag);
    Ok(blob)
}
