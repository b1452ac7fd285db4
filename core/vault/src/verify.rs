//! Item-level integrity verification.
//!
//! Each band record carries an `hmac` field: HMAC-SHA256 with the overview
//! MAC key over the record's remaining fields, canonicalized by sorting
//! the field names and concatenating each name directly followed by its
//! value, with no separators. The ambiguous boundaries between adjacent
//! fields are a known quirk of the on-disk format and are reproduced
//! exactly; hardening the canonicalization would break compatibility with
//! existing vaults.
//!
//! This check is independent of the opdata01 tags inside `k`/`o`/`d` and
//! runs before any of those blobs are decrypted, so tampering with the
//! record as a whole is caught even when each sub-blob is internally
//! self-consistent.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::Value;
use tracing::debug;

use opvault_common::{Error, Result};
use opvault_crypto::{hmac_sha256, tags_match, KeyMac};

use crate::records::ItemRecord;

/// Field holding the stored tag; excluded from the message.
const TAG_FIELD: &str = "hmac";

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn canonical_message(item: &ItemRecord) -> Vec<u8> {
    let mut names: Vec<&String> = item
        .fields()
        .keys()
        .filter(|name| name.as_str() != TAG_FIELD)
        .collect();
    names.sort_unstable();

    let mut message = Vec::new();
    for name in names {
        message.extend_from_slice(name.as_bytes());
        message.extend_from_slice(render_value(&item.fields()[name.as_str()]).as_bytes());
    }
    message
}

/// Verify one item's field-set tag.
pub fn verify_item_tag(item: &ItemRecord, overview_key: &KeyMac) -> Result<()> {
    let stored = BASE64.decode(item.hmac()?)?;
    let computed = hmac_sha256(overview_key.mac_key(), &[&canonical_message(item)]);

    if !tags_match(&computed, &stored) {
        return Err(Error::TagMismatch);
    }
    Ok(())
}

/// Verify every item's field-set tag as one batch.
///
/// A single mismatch fails the whole vault open: once tampering is
/// detected, no record can be trusted.
pub fn verify_item_tags(items: &[ItemRecord], overview_key: &KeyMac) -> Result<()> {
    for item in items {
        verify_item_tag(item, overview_key)?;
    }
    debug!(count = items.len(), "Verified item tags");
    Ok(())
}
