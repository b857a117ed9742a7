use std::fmt;

use uuid::Uuid;

use super::error::StorageError;

const MAX_EXTENSION_LEN: usize = 16;

/// Identifier of a stored object: a UUID plus an optional file extension.
///
/// The object name is `{id}.{extension}`, or just `{id}` when the extension is
/// empty. Extensions are normalized to lowercase without the leading dot.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BlobKey {
    id: Uuid,
    extension: String,
}

impl BlobKey {
    pub fn new(id: Uuid, extension: &str) -> Result<Self, StorageError> {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();

        if extension.len() > MAX_EXTENSION_LEN {
            return Err(StorageError::InvalidKey(format!(
                "extension longer than {MAX_EXTENSION_LEN} characters"
            )));
        }
        if !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(StorageError::InvalidKey(format!(
                "extension must be alphanumeric, got {extension:?}"
            )));
        }

        Ok(Self { id, extension })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Name of the object inside the bucket or storage directory.
    pub fn object_name(&self) -> String {
        if self.extension.is_empty() {
            self.id.to_string()
        } else {
            format!("{}.{}", self.id, self.extension)
        }
    }

    /// MIME type inferred from the extension.
    pub fn content_type(&self) -> String {
        mime_guess::from_ext(&self.extension)
            .first_or_octet_stream()
            .to_string()
    }
}

impl fmt::Debug for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlobKey({})", self.object_name())
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.object_name())
    }
}
