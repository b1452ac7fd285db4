//! Decrypted data model: accounts and folders.

use serde::Serialize;
use std::fmt;

/// A decrypted vault folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Folder {
    /// Folder uuid as stored in the vault.
    pub id: String,
    /// Decrypted folder title.
    pub name: String,
}

/// An account's folder assignment.
///
/// Items that reference a missing or trashed folder resolve to `NoFolder`
/// rather than `None`, so downstream consumers never need a null branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FolderRef {
    /// The item lives in a real folder.
    Folder(Folder),
    /// The item has no folder (or its folder is gone).
    NoFolder,
}

impl FolderRef {
    /// Display name of the folder, `"-"` when there is none.
    pub fn name(&self) -> &str {
        match self {
            FolderRef::Folder(f) => &f.name,
            FolderRef::NoFolder => "-",
        }
    }
}

impl fmt::Display for FolderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A decrypted login record.
///
/// Missing detail fields (username, password, note) are empty strings, not
/// errors: real vaults routinely omit them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Item uuid as stored in the vault.
    pub id: String,
    /// Item title from the decrypted overview.
    pub name: String,
    /// First detail field designated "username".
    pub username: String,
    /// First detail field designated "password".
    pub password: String,
    /// Url from the decrypted overview.
    pub url: String,
    /// Free-form note from the decrypted details.
    pub note: String,
    /// Folder assignment.
    pub folder: FolderRef,
}
