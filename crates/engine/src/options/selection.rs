use studio_types::{FieldPatch, SelectOption};

/// Map a chosen option to the patch committed to the field.
///
/// No option, or an option with an empty value, clears the field.
pub fn select(option: Option<&SelectOption>) -> FieldPatch {
    match option {
        Some(option) if !option.value.is_empty() => FieldPatch::Set(option.value.clone()),
        _ => FieldPatch::Unset,
    }
}

/// Find the option currently committed to a field, if it is in the list.
pub fn option_for_value<'a>(options: &'a [SelectOption], value: Option<&str>) -> Option<&'a SelectOption> {
    let value = value.filter(|value| !value.is_empty())?;
    options.iter().find(|option| option.value == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_clear_the_field() {
        assert_eq!(select(None), FieldPatch::Unset);
        assert_eq!(select(Some(&SelectOption::new("Nothing", ""))), FieldPatch::Unset);
        assert_eq!(select(Some(&SelectOption::new("X1", "x1"))), FieldPatch::Set("x1".into()));
    }

    #[test]
    fn finds_committed_option() {
        let options = vec![SelectOption::new("X1", "x1"), SelectOption::new("X2", "x2")];
        assert_eq!(option_for_value(&options, Some("x2")).map(|o| o.label.as_str()), Some("X2"));
        assert!(option_for_value(&options, Some("x3")).is_none());
        assert!(option_for_value(&options, None).is_none());
    }
}
