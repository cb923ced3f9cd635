//! Typed transforms from a raw JSON response to a list of options.

use std::{fmt, sync::Arc};

use serde_json::Value;
use studio_types::{FieldMapping, FormatSpec, SelectOption};
use tracing::debug;

use super::error::ResolveError;

/// Signature of a caller-supplied response transform.
///
/// Returning `Err` fails the whole resolution; no partial list is kept.
pub type FormatFn = dyn Fn(&Value) -> Result<Vec<SelectOption>, String> + Send + Sync;

/// How a parsed response body becomes options.
///
/// Two formats are equal when they would shape a response the same way:
/// `Identity` always matches itself, `FieldMap` compares its mapping, and
/// `Custom` compares the identity of the shared function.
#[derive(Clone, Default)]
pub enum ResponseFormat {
    /// The body is already an array of `{label, value, image?}` objects
    /// (bare strings are accepted as `label == value`).
    #[default]
    Identity,
    /// Pull label/value/image out of every item by key.
    FieldMap(FieldMapping),
    /// Arbitrary caller-supplied transform.
    Custom(Arc<FormatFn>),
}

impl ResponseFormat {
    /// Wrap a closure as a [`ResponseFormat::Custom`].
    pub fn custom<F>(transform: F) -> Self
    where
        F: Fn(&Value) -> Result<Vec<SelectOption>, String> + Send + Sync + 'static,
    {
        ResponseFormat::Custom(Arc::new(transform))
    }

    /// Shape `raw` into options.
    ///
    /// # Errors
    /// Returns [`ResolveError::Format`] when the body does not have the
    /// expected shape or a custom transform fails.
    pub fn apply(&self, raw: &Value) -> Result<Vec<SelectOption>, ResolveError> {
        match self {
            ResponseFormat::Identity => identity_options(raw),
            ResponseFormat::FieldMap(mapping) => mapped_options(raw, mapping),
            ResponseFormat::Custom(transform) => transform(raw).map_err(ResolveError::Format),
        }
    }
}

impl PartialEq for ResponseFormat {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ResponseFormat::Identity, ResponseFormat::Identity) => true,
            (ResponseFormat::FieldMap(left), ResponseFormat::FieldMap(right)) => left == right,
            (ResponseFormat::Custom(left), ResponseFormat::Custom(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl fmt::Debug for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseFormat::Identity => f.write_str("Identity"),
            ResponseFormat::FieldMap(mapping) => f.debug_tuple("FieldMap").field(mapping).finish(),
            ResponseFormat::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<FormatSpec> for ResponseFormat {
    fn from(spec: FormatSpec) -> Self {
        match spec {
            FormatSpec::Identity => ResponseFormat::Identity,
            FormatSpec::FieldMap(mapping) => ResponseFormat::FieldMap(mapping),
        }
    }
}

fn identity_options(raw: &Value) -> Result<Vec<SelectOption>, ResolveError> {
    let items = raw
        .as_array()
        .ok_or_else(|| ResolveError::Format(format!("expected a JSON array of options, got {}", json_kind(raw))))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(text) => Ok(SelectOption::new(text.clone(), text.clone())),
            Value::Object(_) => serde_json::from_value::<SelectOption>(item.clone())
                .map_err(|error| ResolveError::Format(format!("item {index} is not an option: {error}"))),
            other => Err(ResolveError::Format(format!(
                "item {index} is not an option: got {}",
                json_kind(other)
            ))),
        })
        .collect()
}

fn mapped_options(raw: &Value, mapping: &FieldMapping) -> Result<Vec<SelectOption>, ResolveError> {
    let container = match mapping.items_path.as_deref() {
        Some(path) => lookup_path(raw, path)
            .ok_or_else(|| ResolveError::Format(format!("response has no value at '{path}'")))?,
        None => raw,
    };
    let items = container
        .as_array()
        .ok_or_else(|| ResolveError::Format(format!("expected a JSON array, got {}", json_kind(container))))?;

    let options: Vec<SelectOption> = items
        .iter()
        .filter_map(|item| {
            let object = item.as_object()?;
            let value = object.get(&mapping.value).and_then(scalar_text)?;
            let label = object
                .get(&mapping.label)
                .and_then(scalar_text)
                .unwrap_or_else(|| value.clone());
            let image = mapping
                .image
                .as_deref()
                .and_then(|key| object.get(key))
                .and_then(scalar_text)
                .filter(|image| !image.is_empty());
            Some(SelectOption { label, value, image })
        })
        .collect();

    let skipped = items.len() - options.len();
    if skipped > 0 {
        debug!(skipped, value_key = %mapping.value, "skipped option rows without a usable value");
    }
    Ok(options)
}

/// Walk a dot-separated path through nested objects.
fn lookup_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(root, |current, segment| current.get(segment))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model_mapping() -> FieldMapping {
        FieldMapping::new("model_name", "model_slug").with_image("model_image")
    }

    #[test]
    fn field_map_normalizes_model_catalog() {
        let raw = json!([{"model_name": "X1", "model_slug": "x1"}]);
        let options = ResponseFormat::FieldMap(model_mapping()).apply(&raw).unwrap();
        assert_eq!(options, vec![SelectOption::new("X1", "x1")]);
    }

    #[test]
    fn field_map_keeps_images_and_skips_blank_ones() {
        let raw = json!([
            {"model_name": "X1", "model_slug": "x1", "model_image": "https://cdn.example.com/x1.png"},
            {"model_name": "X2", "model_slug": "x2", "model_image": ""},
            {"model_name": "X3", "model_slug": 3, "model_image": null}
        ]);
        let options = ResponseFormat::FieldMap(model_mapping()).apply(&raw).unwrap();
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].image.as_deref(), Some("https://cdn.example.com/x1.png"));
        assert_eq!(options[1].image, None);
        assert_eq!(options[2].value, "3");
    }

    #[test]
    fn field_map_follows_items_path() {
        let raw = json!({"data": {"models": [{"model_name": "X1", "model_slug": "x1"}]}});
        let mapping = model_mapping().with_items_path("data.models");
        let options = ResponseFormat::FieldMap(mapping).apply(&raw).unwrap();
        assert_eq!(options, vec![SelectOption::new("X1", "x1")]);

        let missing = ResponseFormat::FieldMap(model_mapping().with_items_path("data.items")).apply(&raw);
        assert!(matches!(missing, Err(ResolveError::Format(_))));
    }

    #[test]
    fn field_map_tolerates_incomplete_rows() {
        let raw = json!([
            {"model_name": "X1", "model_slug": "x1"},
            {"model_name": "No slug"},
            {"model_slug": "x2"},
            "x3",
            {"model_name": "X4", "model_slug": {"nested": true}}
        ]);
        let options = ResponseFormat::FieldMap(model_mapping()).apply(&raw).unwrap();
        assert_eq!(options, vec![SelectOption::new("X1", "x1"), SelectOption::new("x2", "x2")]);
    }

    #[test]
    fn identity_accepts_options_and_strings() {
        let raw = json!([{"label": "X1", "value": "x1", "image": "i.png"}, "x2"]);
        let options = ResponseFormat::Identity.apply(&raw).unwrap();
        assert_eq!(options[0], SelectOption::new("X1", "x1").with_image("i.png"));
        assert_eq!(options[1], SelectOption::new("x2", "x2"));
    }

    #[test]
    fn identity_rejects_unnormalized_bodies() {
        let raw = json!([{"model_name": "X1", "model_slug": "x1"}]);
        assert!(matches!(ResponseFormat::Identity.apply(&raw), Err(ResolveError::Format(_))));
        assert!(matches!(
            ResponseFormat::Identity.apply(&json!({"label": "X1"})),
            Err(ResolveError::Format(_))
        ));
    }

    #[test]
    fn custom_errors_become_format_failures() {
        let format = ResponseFormat::custom(|_| Err("boom".to_string()));
        assert_eq!(format.apply(&json!([])).unwrap_err(), ResolveError::Format("boom".into()));
    }

    #[test]
    fn custom_formats_compare_by_identity() {
        let first = ResponseFormat::custom(|_| Ok(Vec::new()));
        let same = first.clone();
        let other = ResponseFormat::custom(|_| Ok(Vec::new()));
        assert_eq!(first, same);
        assert_ne!(first, other);
        assert_ne!(first, ResponseFormat::Identity);
    }
}
