//! Text layouts for schemas, fields and filled-in forms.

use formwork_core::field::FormField;
use formwork_core::schema::FormSchema;
use formwork_core::value::FieldValue;

use crate::styles::{
    ICON_DERIVED, ICON_FAIL, ICON_PASS, REQUIRED_MARKER, render_accent, render_bold,
    render_fail, render_header, render_muted, render_pass, render_separator, truncate,
};
use crate::terminal::layout_width;

const LABEL_WIDTH: usize = 32;

/// The field's label with the required marker appended when needed.
pub fn field_label(field: &FormField) -> String {
    let label = if field.label.trim().is_empty() {
        field.id.as_str()
    } else {
        field.label.as_str()
    };
    if field.required {
        format!("{label}{REQUIRED_MARKER}")
    } else {
        label.to_string()
    }
}

/// Comma-separated display names of a field's rules, e.g. `Minimum Length (8)`.
pub fn describe_rules(field: &FormField) -> String {
    field
        .validation_rules
        .iter()
        .map(|rule| match rule.value {
            Some(v) if rule.rule_type.takes_value() => {
                format!("{} ({v})", rule.rule_type.display_name())
            }
            _ => rule.rule_type.display_name().to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line describing a field's definition.
pub fn render_field_summary(position: usize, field: &FormField) -> String {
    let mut line = format!(
        "{:>3}. {}  {}  {}",
        position,
        render_bold(&truncate(&field_label(field), LABEL_WIDTH)),
        render_accent(&format!("[{}]", field.field_type)),
        render_muted(&field.id),
    );

    if let Some(options) = &field.options {
        line.push_str(&format!("  options: {}", options.join(" | ")));
    }
    let rules = describe_rules(field);
    if !rules.is_empty() {
        line.push_str(&format!("  rules: {rules}"));
    }
    if let Some(config) = field.derivation() {
        line.push_str(&format!(
            "  {}",
            render_accent(&format!("{ICON_DERIVED} {}", config.formula))
        ));
    }
    line
}

/// Full description of a schema: header followed by one line per field.
pub fn render_schema(schema: &FormSchema) -> String {
    let mut out = Vec::with_capacity(schema.fields.len() + 3);
    out.push(format!(
        "{} {}",
        render_header(&schema.name),
        render_muted(&format!("({})", schema.id))
    ));
    out.push(render_muted(&format!(
        "created {}, {} field(s)",
        schema.created_at.format("%Y-%m-%d %H:%M UTC"),
        schema.fields.len()
    )));
    out.push(render_separator(layout_width()));
    if schema.fields.is_empty() {
        out.push(render_muted("  (no fields)"));
    }
    for (i, field) in schema.fields.iter().enumerate() {
        out.push(render_field_summary(i + 1, field));
    }
    out.join("\n")
}

/// One line for a schema in a listing.
pub fn render_schema_line(schema: &FormSchema) -> String {
    format!(
        "{}  {}  {}",
        render_muted(&schema.id),
        render_bold(&schema.name),
        render_muted(&format!(
            "{} field(s), created {}",
            schema.fields.len(),
            schema.created_at.format("%Y-%m-%d")
        )),
    )
}

/// A filled-in field: status icon, label, current value, and the error if any.
pub fn render_filled_field(field: &FormField, value: &FieldValue, error: Option<&str>) -> String {
    let icon = match error {
        Some(_) => render_fail(ICON_FAIL),
        None => render_pass(ICON_PASS),
    };
    let shown = match value {
        FieldValue::Empty => render_muted("(empty)"),
        v if field.derivation().is_some() => render_accent(&v.to_string()),
        v => v.to_string(),
    };
    let mut line = format!("{icon} {}: {shown}", field_label(field));
    if let Some(message) = error {
        line.push_str(&format!("  {}", render_fail(message)));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_core::enums::FieldType;
    use formwork_core::field::{DerivedFieldConfig, FormFieldBuilder, ValidationRule};

    fn email_field() -> FormField {
        FormFieldBuilder::new("email", FieldType::Email)
            .label("Email")
            .required(true)
            .rule(ValidationRule::is_email())
            .rule(ValidationRule::min_length(5))
            .build()
    }

    #[test]
    fn required_marker_and_fallback_label() {
        assert_eq!(field_label(&email_field()), "Email*");
        let unnamed = FormFieldBuilder::new("f9", FieldType::Text).build();
        assert_eq!(field_label(&unnamed), "f9");
    }

    #[test]
    fn rules_are_described_by_display_name() {
        assert_eq!(
            describe_rules(&email_field()),
            "Email Format, Minimum Length (5)"
        );
    }

    #[test]
    fn field_summary_mentions_type_and_formula() {
        let age = FormFieldBuilder::new("age", FieldType::Number)
            .label("Age")
            .derived(DerivedFieldConfig::new(["dob"], "AGE_FROM_DOB"))
            .build();
        let line = render_field_summary(2, &age);
        assert!(line.contains("Age"));
        assert!(line.contains("[number]"));
        assert!(line.contains("AGE_FROM_DOB"));
    }

    #[test]
    fn filled_field_shows_error() {
        let line = render_filled_field(
            &email_field(),
            &FieldValue::text("nope"),
            Some("Invalid email format"),
        );
        assert!(line.contains("Email*: nope"));
        assert!(line.contains("Invalid email format"));

        let ok = render_filled_field(&email_field(), &FieldValue::Empty, None);
        assert!(ok.contains("(empty)"));
    }

    #[test]
    fn schema_rendering_lists_fields() {
        let mut schema = FormSchema::new("form_x", "Signup", chrono::Utc::now());
        let empty = render_schema(&schema);
        assert!(empty.contains("(no fields)"));

        schema.fields.push(email_field());
        let text = render_schema(&schema);
        assert!(text.contains("form_x"));
        assert!(text.contains("1 field(s)"));
        assert!(text.contains("Email*"));
    }
}
