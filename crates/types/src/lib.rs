//! Shared type definitions for the studio crates.
//!
//! Everything here is plain data: the normalized option shape offered to a
//! selection control, the patch committed back to a field, and the serde
//! models describing option-backed fields in the studio configuration.

mod field;

pub use field::{FieldCatalog, FieldDefinition, FieldMapping, FormatSpec, OptionSourceSpec};

use serde::{Deserialize, Serialize};

/// A single entry offered to a selection control.
///
/// `value` is what gets committed to the document field; `label` is what the
/// editor sees. Uniqueness of `value` within a result set is up to the
/// consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Human-readable text shown in the list.
    pub label: String,
    /// Value stored on the field when this option is chosen.
    pub value: String,
    /// Optional thumbnail URL rendered next to the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Change committed to a field by a selection control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPatch {
    /// Store the given option value.
    Set(String),
    /// Clear the field.
    Unset,
}

impl FieldPatch {
    /// The value that would be stored, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            FieldPatch::Set(value) => Some(value.as_str()),
            FieldPatch::Unset => None,
        }
    }
}
