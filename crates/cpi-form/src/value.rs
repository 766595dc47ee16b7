//! # Field Update Values
//!
//! The value side of the wizard's generic field-update operation.
//! Checkbox-type fields carry a flag, file-type fields carry an upload,
//! everything else carries text.

use serde::{Deserialize, Serialize};

/// A file captured by the form, held in memory until submission uploads
/// it through the asset store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    /// Original file name, used to derive the storage path.
    pub file_name: String,
    /// MIME content type supplied with the upload.
    pub content_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl FileAttachment {
    /// Construct an attachment from its parts.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// A value carried by one field update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Text input, stored exactly as typed.
    Text(String),
    /// Checkbox input.
    Flag(bool),
    /// File input.
    File(FileAttachment),
}

impl FieldValue {
    /// Convenience constructor for text values.
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    /// The text payload, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The flag payload, if this is a flag value.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// The file payload, if this is a file value.
    pub fn as_file(&self) -> Option<&FileAttachment> {
        match self {
            FieldValue::File(f) => Some(f),
            _ => None,
        }
    }
}
