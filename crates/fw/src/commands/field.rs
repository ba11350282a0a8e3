//! `fw field` -- add, update, delete and move fields.

use anyhow::{Context, Result, bail};
use formwork_core::editor::SchemaEditor;
use formwork_core::enums::ValidationRuleType;
use formwork_core::field::{DerivedFieldConfig, FormField, ValidationRule};
use serde_json::json;

use crate::cli::{
    FieldAddArgs, FieldArgs, FieldCommands, FieldDeleteArgs, FieldMoveArgs, FieldSettings,
    FieldUpdateArgs,
};
use crate::commands::{ensure_saved_form, load_form, save_checked};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `fw field` command.
pub fn run(ctx: &RuntimeContext, args: &FieldArgs) -> Result<()> {
    match &args.command {
        FieldCommands::Add(a) => run_add(ctx, a),
        FieldCommands::Update(a) => run_update(ctx, a),
        FieldCommands::Delete(a) => run_delete(ctx, a),
        FieldCommands::Move(a) => run_move(ctx, a),
    }
}

fn run_add(ctx: &RuntimeContext, args: &FieldAddArgs) -> Result<()> {
    ensure_saved_form(&args.form)?;
    let store = ctx.open_store()?;
    let mut editor = SchemaEditor::from_schema(load_form(&store, &args.form)?);

    let mut field = editor.add_field(args.field_type).clone();
    if field.field_type.has_options() {
        field.options = Some(ctx.config.editor.default_options.clone());
    }
    apply_settings(&mut field, &args.settings)?;
    editor.update_field(field.clone());

    let schema = editor.into_schema();
    save_checked(ctx, &store, &schema)?;

    if ctx.json {
        output_json(&field);
    } else if ctx.quiet {
        println!("{}", field.id);
    } else {
        println!(
            "Added {} field {} to form {}",
            field.field_type, field.id, schema.id
        );
    }
    Ok(())
}

fn run_update(ctx: &RuntimeContext, args: &FieldUpdateArgs) -> Result<()> {
    ensure_saved_form(&args.form)?;
    let store = ctx.open_store()?;
    let mut editor = SchemaEditor::from_schema(load_form(&store, &args.form)?);

    let mut field = editor
        .schema()
        .field(&args.field)
        .cloned()
        .with_context(|| format!("field not found: {}", args.field))?;
    apply_settings(&mut field, &args.settings)?;
    editor.update_field(field.clone());

    let schema = editor.into_schema();
    save_checked(ctx, &store, &schema)?;

    if ctx.json {
        output_json(&field);
    } else if !ctx.quiet {
        println!("Updated field {} in form {}", field.id, schema.id);
    }
    Ok(())
}

fn run_delete(ctx: &RuntimeContext, args: &FieldDeleteArgs) -> Result<()> {
    ensure_saved_form(&args.form)?;
    let store = ctx.open_store()?;
    let mut editor = SchemaEditor::from_schema(load_form(&store, &args.form)?);

    if !editor.delete_field(&args.field) {
        bail!("field not found: {}", args.field);
    }
    let schema = editor.into_schema();
    save_checked(ctx, &store, &schema)?;

    if ctx.json {
        output_json(&json!({ "form": schema.id, "deleted": args.field }));
    } else if !ctx.quiet {
        println!("Deleted field {} from form {}", args.field, schema.id);
    }
    Ok(())
}

fn run_move(ctx: &RuntimeContext, args: &FieldMoveArgs) -> Result<()> {
    ensure_saved_form(&args.form)?;
    let store = ctx.open_store()?;
    let mut editor = SchemaEditor::from_schema(load_form(&store, &args.form)?);

    let start = editor
        .schema()
        .field_index(&args.field)
        .with_context(|| format!("field not found: {}", args.field))?;
    editor.reorder(start, args.to);

    let schema = editor.into_schema();
    save_checked(ctx, &store, &schema)?;

    let order: Vec<&str> = schema.fields.iter().map(|f| f.id.as_str()).collect();
    if ctx.json {
        output_json(&json!({ "form": schema.id, "order": order }));
    } else if !ctx.quiet {
        println!("Field order: {}", order.join(", "));
    }
    Ok(())
}

/// Applies command-line settings to a field.
///
/// New length rules replace an existing rule of the same type; other new
/// rules are appended once.
fn apply_settings(field: &mut FormField, s: &FieldSettings) -> Result<()> {
    if let Some(label) = &s.label {
        field.label = label.clone();
    }
    if let Some(required) = s.required {
        field.required = required;
    }
    if let Some(value) = &s.default_value {
        field.default_value = non_empty(value);
    }
    if let Some(value) = &s.placeholder {
        field.placeholder = non_empty(value);
    }
    if let Some(options) = &s.options {
        if !field.field_type.has_options() {
            bail!("{} fields do not take options", field.field_type);
        }
        field.options = Some(
            options
                .iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
        );
    }

    if s.clear_rules {
        field.validation_rules.clear();
    }
    let mut rules = Vec::new();
    if s.not_empty {
        rules.push(ValidationRule::not_empty());
    }
    if let Some(n) = s.min_length {
        rules.push(ValidationRule::min_length(n));
    }
    if let Some(n) = s.max_length {
        rules.push(ValidationRule::max_length(n));
    }
    if s.email {
        rules.push(ValidationRule::is_email());
    }
    if s.password {
        rules.push(ValidationRule::custom_password());
    }
    for rule in rules {
        upsert_rule(&mut field.validation_rules, rule);
    }

    if s.not_derived {
        field.set_derivation(None);
    } else if s.derive_from.is_some() || s.formula.is_some() {
        let current = field.derived_config.clone().unwrap_or_default();
        let parents = s.derive_from.clone().unwrap_or(current.parent_field_ids);
        let formula = s.formula.clone().unwrap_or(current.formula);
        if formula.trim().is_empty() {
            bail!("derived fields need a --formula");
        }
        field.set_derivation(Some(DerivedFieldConfig::new(parents, formula)));
    }
    Ok(())
}

fn upsert_rule(rules: &mut Vec<ValidationRule>, rule: ValidationRule) {
    let replaceable = matches!(
        rule.rule_type,
        ValidationRuleType::MinLength | ValidationRuleType::MaxLength
    );
    match rules.iter_mut().find(|r| r.rule_type == rule.rule_type) {
        Some(existing) if replaceable => *existing = rule,
        Some(_) => {}
        None => rules.push(rule),
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
