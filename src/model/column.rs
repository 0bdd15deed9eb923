use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use typed_builder::TypedBuilder;

use super::extensions::Extensions;
use super::field::ResolvedField;

/// One table column and its optional mapping to a generated field.
///
/// Built through `ColumnDescriptor::builder()`; a built descriptor is
/// read-only. The `field_*` overrides are never synthesized here: `None`
/// means "derive from the column", which is what
/// [`resolve_field`](super::field::resolve_field) does.
///
/// ```
/// use fieldsmith::ColumnDescriptor;
///
/// let col = ColumnDescriptor::builder()
///     .name("user_id")
///     .sql_type("BIGINT")
///     .primary(true)
///     .import("java.lang.Long")
///     .build();
/// assert_eq!(col.sql_type(), Some("BIGINT"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct ColumnDescriptor {
    #[builder(setter(into))]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option(fallback = sql_type_opt)))]
    sql_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option(fallback = remark_opt)))]
    remark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option(fallback = length_opt)))]
    length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option(fallback = default_value_opt)))]
    default_value: Option<String>,
    #[serde(default)]
    #[builder(default)]
    primary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option(fallback = primary_name_opt)))]
    primary_name: Option<String>,
    #[serde(default)]
    #[builder(default)]
    indexed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option(fallback = index_type_opt)))]
    index_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option(fallback = index_name_opt)))]
    index_name: Option<String>,
    #[serde(default)]
    #[builder(default)]
    nullable: bool,
    #[serde(default)]
    #[builder(default)]
    unsigned: bool,
    #[serde(default)]
    #[builder(default)]
    auto_increment: bool,

    // Generated-field overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    field_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    field_remark: Option<String>,

    /// Appended with `import`; duplicates keep their first position.
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    #[builder(via_mutators, mutators(
        pub fn import(&mut self, import: &str) {
            self.imports.insert(import.to_string());
        }
    ))]
    imports: IndexSet<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    #[builder(via_mutators, mutators(
        pub fn annotation(&mut self, annotation: &str) {
            self.annotations.insert(annotation.to_string());
        }
    ))]
    annotations: IndexSet<String>,

    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    #[builder(via_mutators, mutators(
        pub fn extension(&mut self, key: &str, value: Value) {
            self.extensions.insert(key, value);
        }
    ))]
    extensions: Extensions,
}

impl ColumnDescriptor {
    /// A copy whose overrides hold `field`. Everything else is kept.
    pub(crate) fn with_resolved(&self, field: ResolvedField) -> Self {
        Self {
            field_name: Some(field.name),
            field_type: Some(field.field_type),
            field_remark: field.remark,
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sql_type(&self) -> Option<&str> {
        self.sql_type.as_deref()
    }

    pub fn remark(&self) -> Option<&str> {
        self.remark.as_deref()
    }

    pub fn length(&self) -> Option<&str> {
        self.length.as_deref()
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn primary_name(&self) -> Option<&str> {
        self.primary_name.as_deref()
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    pub fn index_type(&self) -> Option<&str> {
        self.index_type.as_deref()
    }

    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_unsigned(&self) -> bool {
        self.unsigned
    }

    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }

    pub fn field_type(&self) -> Option<&str> {
        self.field_type.as_deref()
    }

    pub fn field_name(&self) -> Option<&str> {
        self.field_name.as_deref()
    }

    pub fn field_remark(&self) -> Option<&str> {
        self.field_remark.as_deref()
    }

    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(String::as_str)
    }

    pub fn annotations(&self) -> impl Iterator<Item = &str> {
        self.annotations.iter().map(String::as_str)
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}
