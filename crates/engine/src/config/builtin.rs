use studio_types::{FieldCatalog, FieldDefinition, FieldMapping, FormatSpec, OptionSourceSpec};

/// Path of the equipment catalog endpoint on the studio backend.
const MODELS_PATH: &str = "/api/models";

/// Option-backed fields shipped with the studio schema.
///
/// Both equipment fields read the backend's model catalog, so they resolve
/// only once a `backend_url` is configured.
pub fn default_fields() -> FieldCatalog {
    let models = OptionSourceSpec {
        url: Some(MODELS_PATH.to_string()),
        format: FormatSpec::FieldMap(FieldMapping::new("model_name", "model_slug").with_image("model_image")),
    };

    let mut fields = FieldCatalog::new();
    fields.insert(
        "equipmentGuide.heroEquipment".to_string(),
        FieldDefinition {
            title: "Hero Equipment".to_string(),
            description: Some("Model featured in the guide's hero section".to_string()),
            source: models.clone(),
        },
    );
    fields.insert(
        "equipmentGuide.sections.equipment.modelSlug".to_string(),
        FieldDefinition {
            title: "Model Slug".to_string(),
            description: Some("Equipment will be displayed in a carousel".to_string()),
            source: models,
        },
    );
    fields
}
