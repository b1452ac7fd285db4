//! On-disk loading of OPVault files.
//!
//! Every vault file is a JavaScript snippet wrapping a JSON payload:
//! `profile.js` is `var profile={...};`, `folders.js` is
//! `loadFolders({...});`, and each band file is `ld({...});`. This module
//! strips the fixed wrapper text and parses the embedded JSON; everything
//! cryptographic happens downstream.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use opvault_common::{Error, Result};

use crate::records::{FolderRecord, ItemRecord, Profile};

const PROFILE_PREFIX: &str = "var profile=";
const PROFILE_SUFFIX: &str = ";";
const FOLDERS_PREFIX: &str = "loadFolders(";
const FOLDERS_SUFFIX: &str = ");";
const BAND_PREFIX: &str = "ld(";
const BAND_SUFFIX: &str = ");";

/// Band files are sharded by the first hex digit of the item uuid.
const BAND_DIGITS: &str = "0123456789ABCDEF";

fn vault_file(path: &Path, filename: &str) -> PathBuf {
    path.join("default").join(filename)
}

fn load_js_as_json(path: &Path, prefix: &str, suffix: &str) -> Result<Value> {
    let content = fs::read_to_string(path)?;

    let stripped = content
        .strip_prefix(prefix)
        .ok_or_else(|| Error::UnsupportedFormat(format!("must start with {prefix}")))?
        .strip_suffix(suffix)
        .ok_or_else(|| Error::UnsupportedFormat(format!("must end with {suffix}")))?;

    Ok(serde_json::from_str(stripped)?)
}

fn as_object(value: Value, what: &str) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::MalformedRecord(format!("{what} is not an object"))),
    }
}

/// Load and parse `profile.js`.
pub fn load_profile(path: &Path) -> Result<Profile> {
    let value = load_js_as_json(&vault_file(path, "profile.js"), PROFILE_PREFIX, PROFILE_SUFFIX)?;
    Ok(serde_json::from_value(value)?)
}

/// Load and parse `folders.js`. A vault without the file has no folders.
pub fn load_folders(path: &Path) -> Result<Vec<FolderRecord>> {
    let filename = vault_file(path, "folders.js");
    if !filename.exists() {
        return Ok(Vec::new());
    }

    let value = load_js_as_json(&filename, FOLDERS_PREFIX, FOLDERS_SUFFIX)?;
    let records = as_object(value, "folders payload")?
        .into_iter()
        .map(|(_uuid, record)| Ok(FolderRecord::new(as_object(record, "folder record")?)))
        .collect::<Result<Vec<_>>>()?;

    debug!(count = records.len(), "Loaded folder records");
    Ok(records)
}

/// Load and parse every band file that exists.
pub fn load_items(path: &Path) -> Result<Vec<ItemRecord>> {
    let mut records = Vec::new();

    for digit in BAND_DIGITS.chars() {
        let filename = vault_file(path, &format!("band_{digit}.js"));
        if !filename.exists() {
            continue;
        }

        let value = load_js_as_json(&filename, BAND_PREFIX, BAND_SUFFIX)?;
        for (_uuid, record) in as_object(value, "band payload")? {
            records.push(ItemRecord::new(as_object(record, "item record")?));
        }
    }

    debug!(count = records.len(), "Loaded item records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_vault_file(dir: &Path, name: &str, content: &str) {
        let default = dir.join("default");
        fs::create_dir_all(&default).unwrap();
        fs::write(default.join(name), content).unwrap();
    }

    #[test]
    fn test_load_profile() {
        let dir = tempfile::tempdir().unwrap();
        write_vault_file(
            dir.path(),
            "profile.js",
            r#"var profile={"salt":"c2FsdA==","iterations":1000,"masterKey":"bWs=","overviewKey":"b2s="};"#,
        );

        let profile = load_profile(dir.path()).unwrap();
        assert_eq!(profile.iterations, 1000);
        assert_eq!(profile.master_key, "bWs=");
    }

    #[test]
    fn test_bad_wrapper_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_vault_file(dir.path(), "profile.js", r#"{"salt":"c2FsdA=="};"#);
        assert!(matches!(
            load_profile(dir.path()),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_folders_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_folders(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_items_merged_across_bands() {
        let dir = tempfile::tempdir().unwrap();
        write_vault_file(
            dir.path(),
            "band_0.js",
            r#"ld({"0AAA":{"uuid":"0AAA","category":"001"}});"#,
        );
        write_vault_file(
            dir.path(),
            "band_7.js",
            r#"ld({"7BBB":{"uuid":"7BBB","category":"001"}});"#,
        );

        let items = load_items(dir.path()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].uuid().unwrap(), "0AAA");
        assert_eq!(items[1].uuid().unwrap(), "7BBB");
    }

    #[test]
    fn test_band_file_order_preserved() {
        let dir = tempfile::tempdir().unwrap();
        write_vault_file(
            dir.path(),
            "band_0.js",
            r#"ld({"0ZZZ":{"uuid":"0ZZZ"},"0AAA":{"uuid":"0AAA"}});"#,
        );

        let items = load_items(dir.path()).unwrap();
        let uuids: Vec<_> = items.iter().map(|i| i.uuid().unwrap()).collect();
        // File order, not sorted by uuid.
        assert_eq!(uuids, ["0ZZZ", "0AAA"]);
    }

    #[test]
    fn test_missing_band_files_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_vault_file(dir.path(), "band_F.js", r#"ld({});"#);
        assert!(load_items(dir.path()).unwrap().is_empty());
    }
}
