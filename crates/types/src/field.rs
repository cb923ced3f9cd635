//! Serde models for option-backed fields in the studio configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Option-backed fields keyed by their dotted schema path
/// (for example `equipmentGuide.heroEquipment`).
pub type FieldCatalog = IndexMap<String, FieldDefinition>;

/// A document field whose choices come from a remote option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Title shown above the selection control.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Where the options come from and how the response is shaped.
    #[serde(flatten)]
    pub source: OptionSourceSpec,
}

/// Declarative description of an option source as written in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSourceSpec {
    /// Absolute URL, or a path relative to the configured backend URL.
    /// Absent or empty means the field is unconfigured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub format: FormatSpec,
}

/// How a raw JSON response becomes a list of options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormatSpec {
    /// The body already is a list of `{label, value, image?}` objects.
    #[default]
    Identity,
    /// Pick label/value/image out of each item by key.
    FieldMap(FieldMapping),
}

/// Key mapping applied to every item of a response array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Key holding the display label.
    pub label: String,
    /// Key holding the committed value.
    pub value: String,
    /// Key holding an optional image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Dot-separated path to the array when the body is an object
    /// (for example `data.models`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_path: Option<String>,
}

impl FieldMapping {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            image: None,
            items_path: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_items_path(mut self, items_path: impl Into<String>) -> Self {
        self.items_path = Some(items_path.into());
        self
    }
}
