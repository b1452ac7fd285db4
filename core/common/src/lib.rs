//! Common types shared across the OPVault reader.
//!
//! This module provides the error type and the decrypted data model that
//! every other crate in the workspace builds on.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Account, Folder, FolderRef};
