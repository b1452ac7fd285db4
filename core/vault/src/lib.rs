//! Vault engine for the OPVault reader.
//!
//! This module provides:
//! - Raw record types as delivered by the on-disk loader
//! - Loading of `profile.js`, `folders.js`, and the band files
//! - Item-level integrity verification
//! - The decryption pipeline assembling `Account` and `Folder` records
//!
//! # Architecture
//! `open_vault` is the single entry point: it loads the raw records,
//! derives the key hierarchy, verifies every selected item's field-set tag,
//! and only then decrypts overviews, item keys, and details.

pub mod records;
pub mod store;
pub mod vault;
pub mod verify;

pub use records::{FolderRecord, ItemRecord, Profile};
pub use vault::{open_vault, Vault, LOGIN_CATEGORY};
pub use verify::verify_item_tags;
