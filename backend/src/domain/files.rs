//! File attachments stored against entities.
//!
//! Only upload metadata is modelled; byte storage lives behind whatever
//! serves the files.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::comments::Module;
use super::users::UserId;

/// Extensions treated as images when deciding whether to render a thumbnail.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "psd", "bmp", "tif", "thm", "yuv",
];

/// Stable file identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FileId(u64);

impl FileId {
    /// Wrap a raw identifier.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors raised by file constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileValidationError {
    EmptyName,
}

impl fmt::Display for FileValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "file name must not be empty"),
        }
    }
}

impl std::error::Error for FileValidationError {}

/// Metadata for a file attached to an entity.
///
/// ## Invariants
/// - `name` must be non-empty once trimmed of whitespace.
/// - `extension` is stored lowercase without the leading dot; it is empty for
///   files without one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    id: FileId,
    module: Module,
    entity_id: u64,
    uploader: UserId,
    name: String,
    extension: String,
}

impl StoredFile {
    /// Build file metadata from an uploaded file name.
    ///
    /// Splits the extension off the last dot and lowercases it.
    pub fn try_from_upload(
        id: FileId,
        module: Module,
        entity_id: u64,
        uploader: UserId,
        file_name: &str,
    ) -> Result<Self, FileValidationError> {
        let trimmed = file_name.trim();
        if trimmed.is_empty() {
            return Err(FileValidationError::EmptyName);
        }
        let (name, extension) = match trimmed.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem.to_owned(), ext.to_lowercase()),
            _ => (trimmed.to_owned(), String::new()),
        };
        Ok(Self {
            id,
            module,
            entity_id,
            uploader,
            name,
            extension,
        })
    }

    /// Stable file identifier.
    pub fn id(&self) -> FileId {
        self.id
    }

    /// Module of the entity this file is attached to.
    pub fn module(&self) -> Module {
        self.module
    }

    /// Identifier of the entity this file is attached to.
    pub fn entity_id(&self) -> u64 {
        self.entity_id
    }

    /// User who uploaded the file.
    pub fn uploader(&self) -> &UserId {
        &self.uploader
    }

    /// File name without its extension.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Lowercased extension without the leading dot; empty when absent.
    pub fn extension(&self) -> &str {
        self.extension.as_str()
    }

    /// Whether the extension is on the image list used for thumbnails.
    pub fn is_image(&self) -> bool {
        IMAGE_EXTENSIONS.contains(&self.extension.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn upload(file_name: &str) -> Result<StoredFile, FileValidationError> {
        StoredFile::try_from_upload(
            FileId::new(1),
            Module::Ticket,
            7,
            UserId::random(),
            file_name,
        )
    }

    #[rstest]
    #[case("mockup.PNG", "mockup", "png", true)]
    #[case("notes.txt", "notes", "txt", false)]
    #[case("Makefile", "Makefile", "", false)]
    #[case("archive.tar.gz", "archive.tar", "gz", false)]
    fn splits_and_classifies_uploads(
        #[case] file_name: &str,
        #[case] expected_name: &str,
        #[case] expected_extension: &str,
        #[case] expected_image: bool,
    ) {
        let file = upload(file_name).expect("valid upload name");
        assert_eq!(file.name(), expected_name);
        assert_eq!(file.extension(), expected_extension);
        assert_eq!(file.is_image(), expected_image);
    }

    #[rstest]
    fn rejects_blank_names() {
        assert_eq!(upload("   "), Err(FileValidationError::EmptyName));
    }
}
