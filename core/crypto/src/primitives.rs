//! Shared primitive operations: HMAC-SHA256, constant-time tag comparison,
//! and raw AES-256-CBC without block-cipher padding.
//!
//! The opdata01 format manages its own padding through explicit length
//! fields, so the CBC helpers here never apply or strip PKCS#7.

use aes::Aes256;
use cipher::block_padding::NoPadding;
use cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use opvault_common::{Error, Result};

type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Size of an HMAC-SHA256 authentication tag.
pub const TAG_SIZE: usize = 32;

/// Compute HMAC-SHA256 over the concatenation of `parts`.
pub fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> [u8; TAG_SIZE] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().into()
}

/// Compare two authentication tags in constant time.
///
/// # Security
/// Required for every tag check in the pipeline; a short-circuiting
/// comparison would leak the matching prefix length through timing.
pub fn tags_match(computed: &[u8], stored: &[u8]) -> bool {
    bool::from(computed.ct_eq(stored))
}

/// Decrypt with AES-256-CBC, no padding.
///
/// `ciphertext` must be a non-empty multiple of the block size; the caller
/// is responsible for trimming whatever padding convention applies.
pub fn aes256_cbc_decrypt(key: &[u8; 32], iv: &[u8; 16], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let mut buffer = ciphertext.to_vec();
    Aes256CbcDec::new(key.into(), iv.into())
        .decrypt_padded_mut::<NoPadding>(&mut buffer)
        .map_err(|_| Error::ContainerCorrupt("ciphertext is not block aligned"))?;
    Ok(buffer)
}

/// Encrypt with AES-256-CBC, no padding.
///
/// `plaintext` must already be block aligned. Used by the container
/// encoder for building test fixtures.
pub fn aes256_cbc_encrypt(key: &[u8; 32], iv: &[u8; 16], plaintext: &[u8]) -> Result<Vec<u8>> {
    let len = plaintext.len();
    let mut buffer = plaintext.to_vec();
    Aes256CbcEnc::new(key.into(), iv.into())
        .encrypt_padded_mut::<NoPadding>(&mut buffer, len)
        .map_err(|_| Error::ContainerCorrupt("plaintext is not block aligned"))?;
    Ok(buffer)
}
