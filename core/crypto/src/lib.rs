//! Cryptographic pipeline for the OPVault format.
//!
//! This module provides:
//! - Key-encryption-key derivation using PBKDF2-HMAC-SHA512
//! - The opdata01 authenticated container codec
//! - Master/overview and per-item key unwrapping
//! - Secure key management with automatic zeroization
//!
//! # Security Guarantees
//! - All key material is automatically zeroized on drop
//! - Every container and key wrap is authenticated before decryption
//! - All tag comparisons are constant time

pub mod kdf;
pub mod keys;
pub mod opdata;
pub mod primitives;
pub mod wrap;

pub use kdf::derive_kek;
pub use keys::KeyMac;
pub use opdata::{decode, encode};
pub use primitives::{hmac_sha256, tags_match};
pub use wrap::{unwrap_item_key, unwrap_stretched_key};
