use indexmap::IndexSet;
use serde_json::Value;

use crate::config::Config;
use crate::model::{ColumnDescriptor, ResolveError, TemplateAttribute, TemplateDescriptor};
use crate::naming::to_pascal_case_with;

/// Resolves every column's field overrides against the configured type map.
pub fn resolve_columns(
    columns: &[ColumnDescriptor],
    config: &Config,
) -> Result<Vec<ColumnDescriptor>, ResolveError> {
    columns
        .iter()
        .map(|col| col.resolve_overrides(&config.type_map))
        .collect()
}

/// Class name for a table: configured prefixes stripped, then PascalCase.
pub fn class_name_for(table: &str, config: &Config) -> String {
    to_pascal_case_with(config.strip_table_prefix(table), &config.separators())
}

/// Builds the generation request for `table` rendered through template `file`.
///
/// One attribute per column, in column order: key is the field name, value
/// the field type, description the remark. Each attribute carries the
/// column name (and SQL type when known) as items. The table name, primary
/// key fields and the union of column imports go into the extensions.
/// `class_name` replaces the name derived from the table.
pub fn template_for_table(
    table: &str,
    columns: &[ColumnDescriptor],
    config: &Config,
    file: &str,
    class_name: Option<&str>,
) -> Result<TemplateDescriptor, ResolveError> {
    let resolved = resolve_columns(columns, config)?;
    let defaults = &config.template;

    let mut imports = IndexSet::new();
    let mut primary_keys = vec![];
    for col in &resolved {
        imports.extend(col.imports().map(str::to_string));
        if col.is_primary() {
            primary_keys.extend(col.field_name().map(str::to_string));
        }
    }

    let class_name = class_name
        .map(str::to_string)
        .unwrap_or_else(|| class_name_for(table, config));

    let template = resolved
        .iter()
        .fold(TemplateDescriptor::builder(), |builder, col| {
            builder.attribute(field_attribute(col))
        })
        .file(file)
        .class_name(class_name)
        .overwrite(defaults.overwrite)
        .path_opt(defaults.path.clone())
        .source_folder_opt(defaults.source_folder.clone())
        .package_name_opt(defaults.package_name.clone())
        .extension("table", Value::from(table))
        .extension("primary_keys", Value::from(primary_keys))
        .extension("imports", Value::from(imports.into_iter().collect::<Vec<_>>()))
        .build();

    tracing::info!(
        "Assembled template '{}' for table {} with {} attributes",
        file,
        table,
        template.attributes().len()
    );
    Ok(template)
}

/// Attribute for an already resolved column.
fn field_attribute(col: &ColumnDescriptor) -> TemplateAttribute {
    let name = col.field_name().unwrap_or_else(|| col.name());
    let mut attr = TemplateAttribute::new(name)
        .with_item(TemplateAttribute::new("column").with_value(col.name()));
    if let Some(ty) = col.field_type() {
        attr = attr.with_value(ty);
    }
    if let Some(remark) = col.field_remark() {
        attr = attr.with_description(remark);
    }
    if let Some(sql_type) = col.sql_type() {
        attr = attr.with_item(TemplateAttribute::new("sql_type").with_value(sql_type));
    }
    attr
}
