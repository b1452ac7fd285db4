//! The decryption pipeline assembling accounts and folders.
//!
//! Control flow: load raw records, derive the KEK, unwrap the master and
//! overview keys, decrypt non-trashed folders, select active login items,
//! verify their field-set tags as one batch, then decrypt each item into
//! an `Account`. Any integrity failure aborts the whole open.

use std::collections::HashMap;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::Value;
use tracing::{debug, info};

use opvault_common::{Account, Folder, FolderRef, Result};
use opvault_crypto::{derive_kek, opdata, unwrap_item_key, unwrap_stretched_key, KeyMac};

use crate::records::{FolderRecord, ItemRecord, Profile};
use crate::store;
use crate::verify::verify_item_tags;

/// Category code marking a login item.
pub const LOGIN_CATEGORY: &str = "001";

/// The decrypted contents of a vault.
#[derive(Debug, Clone)]
pub struct Vault {
    /// Active login items, in band-file iteration order.
    pub accounts: Vec<Account>,
    /// Non-trashed folders, indexed by uuid.
    pub folders: HashMap<String, Folder>,
}

/// Open a vault and decrypt every active login item.
///
/// # Preconditions
/// - `path` points at an OPVault directory (containing `default/`)
///
/// # Postconditions
/// - Accounts come back in item iteration order, not sorted
/// - Every returned account passed both its field-set tag check and the
///   container tags of its key, overview, and detail blobs
///
/// # Errors
/// Any structural, integrity, or decryption failure aborts the whole
/// open. A wrong passphrase is indistinguishable from corruption and
/// surfaces as `ContainerCorrupt` when the master key fails to unwrap.
pub fn open_vault(path: &Path, password: &str) -> Result<Vault> {
    let profile = store::load_profile(path)?;
    let encrypted_folders = store::load_folders(path)?;
    let encrypted_items = store::load_items(path)?;

    let kek = derive_kek(
        password.as_bytes(),
        &BASE64.decode(&profile.salt)?,
        profile.iterations,
    );
    debug!(iterations = profile.iterations, "Derived key encryption key");

    let master_key = unwrap_profile_key(&profile.master_key, &kek)?;
    let overview_key = unwrap_profile_key(&profile.overview_key, &kek)?;

    let folders = decrypt_folders(encrypted_folders, &overview_key)?;

    let account_items = select_active_items(encrypted_items);
    verify_item_tags(&account_items, &overview_key)?;

    let accounts = account_items
        .iter()
        .map(|item| decrypt_item(item, &master_key, &overview_key, &folders))
        .collect::<Result<Vec<_>>>()?;

    info!(
        accounts = accounts.len(),
        folders = folders.len(),
        "Vault opened"
    );
    Ok(Vault { accounts, folders })
}

fn unwrap_profile_key(wrapped_base64: &str, kek: &KeyMac) -> Result<KeyMac> {
    unwrap_stretched_key(&BASE64.decode(wrapped_base64)?, kek)
}

/// Keep only login items that are not in the trash.
fn select_active_items(items: Vec<ItemRecord>) -> Vec<ItemRecord> {
    items
        .into_iter()
        .filter(|item| matches!(item.category(), Ok(LOGIN_CATEGORY)))
        .filter(|item| !item.trashed())
        .collect()
}

fn decrypt_folders(
    folders: Vec<FolderRecord>,
    overview_key: &KeyMac,
) -> Result<HashMap<String, Folder>> {
    folders
        .iter()
        .filter(|folder| !folder.trashed())
        .map(|folder| {
            let folder = decrypt_folder(folder, overview_key)?;
            Ok((folder.id.clone(), folder))
        })
        .collect()
}

fn decrypt_folder(folder: &FolderRecord, overview_key: &KeyMac) -> Result<Folder> {
    let overview = decode_base64_opdata(folder.overview()?, overview_key)?;
    Ok(Folder {
        id: folder.uuid()?.to_string(),
        name: json_str(&overview, "title"),
    })
}

fn decrypt_item(
    item: &ItemRecord,
    master_key: &KeyMac,
    overview_key: &KeyMac,
    folders: &HashMap<String, Folder>,
) -> Result<Account> {
    let overview = decode_base64_opdata(item.overview()?, overview_key)?;
    let item_key = unwrap_item_key(&BASE64.decode(item.item_key()?)?, master_key)?;
    let details = decode_base64_opdata(item.detail()?, &item_key)?;

    let folder = item
        .folder()
        .and_then(|id| folders.get(id))
        .map(|folder| FolderRef::Folder(folder.clone()))
        .unwrap_or(FolderRef::NoFolder);

    Ok(Account {
        id: item.uuid()?.to_string(),
        name: json_str(&overview, "title"),
        username: find_detail_field(&details, "username"),
        password: find_detail_field(&details, "password"),
        url: json_str(&overview, "url"),
        note: json_str(&details, "notesPlain"),
        folder,
    })
}

/// Decode and parse an opdata01 blob holding a JSON document.
fn decode_base64_opdata(blob_base64: &str, key: &KeyMac) -> Result<Value> {
    let plaintext = opdata::decode(&BASE64.decode(blob_base64)?, key)?;
    Ok(serde_json::from_slice(&plaintext)?)
}

/// First detail field with the given designation; absent means empty.
fn find_detail_field(details: &Value, designation: &str) -> String {
    details["fields"]
        .as_array()
        .into_iter()
        .flatten()
        .find(|field| field["designation"] == designation)
        .map(|field| json_str(field, "value"))
        .unwrap_or_default()
}

fn json_str(value: &Value, key: &str) -> String {
    value[key].as_str().unwrap_or_default().to_string()
}
