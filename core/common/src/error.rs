//! Common error types for the OPVault reader.

use thiserror::Error;

/// Top-level error type for vault decryption.
///
/// Every variant is fatal to the current `open_vault` call: the integrity
/// checks exist specifically to stop trusting any data once tampering is
/// detected, so there is no partial-success mode. A wrong passphrase is not
/// distinguishable from corruption and surfaces as `ContainerCorrupt` when
/// the master key fails to unwrap.
#[derive(Debug, Error)]
pub enum Error {
    /// An opdata01 container is structurally invalid or failed
    /// authentication.
    #[error("Opdata01 container is corrupted: {0}")]
    ContainerCorrupt(&'static str),

    /// A wrapped per-item key has the wrong size or a bad tag.
    #[error("Item key is corrupted: {0}")]
    ItemKeyCorrupt(&'static str),

    /// An item's field-set HMAC does not match its stored tag.
    #[error("Item tag doesn't match")]
    TagMismatch,

    /// A record is missing a required field or a field has the wrong type.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// A vault file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A vault file's embedded JSON could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A base64 field could not be decoded.
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A vault file does not have the expected wrapper text.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
