//! Raw vault records as delivered by the on-disk loader.
//!
//! Folder and item records stay as plain string-to-value maps: the
//! item-level integrity tag is computed over the full field set, so the
//! original shape must survive until verification. Typed accessors pull
//! out the fields the pipeline needs and report `MalformedRecord` when a
//! required field is missing or mistyped.

use serde::Deserialize;
use serde_json::{Map, Value};

use opvault_common::{Error, Result};

/// The vault profile from `profile.js`.
///
/// Unknown fields (uuid, timestamps, attachment metadata) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    /// Base64 PBKDF2 salt.
    pub salt: String,
    /// PBKDF2 iteration count.
    pub iterations: u32,
    /// Base64 opdata01 container holding the wrapped master key.
    #[serde(rename = "masterKey")]
    pub master_key: String,
    /// Base64 opdata01 container holding the wrapped overview key.
    #[serde(rename = "overviewKey")]
    pub overview_key: String,
}

fn required_str<'a>(fields: &'a Map<String, Value>, name: &str) -> Result<&'a str> {
    match fields.get(name) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(Error::MalformedRecord(format!(
            "field `{name}` is not a string"
        ))),
        None => Err(Error::MalformedRecord(format!("missing field `{name}`"))),
    }
}

/// A raw item record from a band file.
#[derive(Debug, Clone)]
pub struct ItemRecord(Map<String, Value>);

impl ItemRecord {
    /// Wrap a parsed band-file record.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The full field set, for integrity verification.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Item uuid.
    pub fn uuid(&self) -> Result<&str> {
        required_str(&self.0, "uuid")
    }

    /// Category code (`"001"` is a login).
    pub fn category(&self) -> Result<&str> {
        required_str(&self.0, "category")
    }

    /// Whether the item is in the trash. Missing means not trashed.
    pub fn trashed(&self) -> bool {
        matches!(self.0.get("trashed"), Some(Value::Bool(true)))
    }

    /// Folder uuid this item belongs to, if any.
    pub fn folder(&self) -> Option<&str> {
        match self.0.get("folder") {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Base64 wrapped per-item key (112 raw bytes).
    pub fn item_key(&self) -> Result<&str> {
        required_str(&self.0, "k")
    }

    /// Base64 opdata01 container with the overview JSON.
    pub fn overview(&self) -> Result<&str> {
        required_str(&self.0, "o")
    }

    /// Base64 opdata01 container with the detail JSON.
    pub fn detail(&self) -> Result<&str> {
        required_str(&self.0, "d")
    }

    /// Base64 item-level integrity tag (32 raw bytes).
    pub fn hmac(&self) -> Result<&str> {
        required_str(&self.0, "hmac")
    }
}

/// A raw folder record from `folders.js`.
#[derive(Debug, Clone)]
pub struct FolderRecord(Map<String, Value>);

impl FolderRecord {
    /// Wrap a parsed folder record.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Folder uuid.
    pub fn uuid(&self) -> Result<&str> {
        required_str(&self.0, "uuid")
    }

    /// Whether the folder is in the trash. Missing means not trashed.
    pub fn trashed(&self) -> bool {
        matches!(self.0.get("trashed"), Some(Value::Bool(true)))
    }

    /// Base64 opdata01 container with the overview JSON.
    pub fn overview(&self) -> Result<&str> {
        required_str(&self.0, "overview")
    }
}
