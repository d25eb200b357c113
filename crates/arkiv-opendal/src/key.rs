//! Storage key codec.
//!
//! Every archived file lives in a flat bucket namespace under a single
//! storage key of the form `{id}_{original_filename}`. The id is generated
//! by the service at upload time (a UUID v4, which never contains the
//! separator), so two uploads of identically named files always land on
//! distinct keys. Decoding splits on the *first* separator only, which
//! keeps filenames containing further underscores intact.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};

/// Reserved separator between the generated id and the original filename.
pub const KEY_SEPARATOR: char = '_';

/// Decoded identity of one archived file: generated id plus the original
/// filename as the user uploaded it.
///
/// All fields are private; construction goes through [`FileKey::new`] or
/// [`FileKey::generate`] so every encoded key is well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileKey {
    id: String,
    name: String,
}

impl FileKey {
    /// Creates a key from an existing id and filename.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidInput`] if either part is empty or
    /// if the id contains the reserved separator. Ids are system-generated
    /// precisely so this cannot happen in normal operation.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> StorageResult<Self> {
        let id = id.into();
        let name = name.into();

        if id.is_empty() {
            return Err(StorageError::invalid_input("file id cannot be empty"));
        }

        if name.is_empty() {
            return Err(StorageError::invalid_input("filename cannot be empty"));
        }

        if id.contains(KEY_SEPARATOR) {
            return Err(StorageError::invalid_input(format!(
                "file id cannot contain the reserved '{KEY_SEPARATOR}' separator"
            )));
        }

        Ok(Self { id, name })
    }

    /// Mints a key for a fresh upload: a new UUID v4 id joined with the
    /// original filename.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidInput`] if the filename is empty.
    pub fn generate(name: impl Into<String>) -> StorageResult<Self> {
        Self::new(Uuid::new_v4().to_string(), name)
    }

    /// Decodes a storage key back into its id and filename.
    ///
    /// Splits on the first separator occurrence. Keys without a separator
    /// (foreign or legacy objects) decode with the whole key serving as
    /// both id and display name; decoding never fails.
    pub fn parse(key: &str) -> Self {
        match key.split_once(KEY_SEPARATOR) {
            Some((id, name)) => Self {
                id: id.to_string(),
                name: name.to_string(),
            },
            None => Self {
                id: key.to_string(),
                name: key.to_string(),
            },
        }
    }

    /// Returns the generated id component.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the original filename component.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Encodes this key into its storage form.
    pub fn storage_key(&self) -> String {
        format!("{}{}{}", self.id, KEY_SEPARATOR, self.name)
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.id, KEY_SEPARATOR, self.name)
    }
}

impl From<&str> for FileKey {
    fn from(key: &str) -> Self {
        Self::parse(key)
    }
}
