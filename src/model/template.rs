use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use typed_builder::TypedBuilder;

use super::extensions::Extensions;
use crate::naming::predicate::is_blank;

/// One keyed entry handed to the renderer. Attributes nest through `items`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateAttribute {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "non_empty_attributes"
    )]
    pub items: Vec<TemplateAttribute>,
}

impl TemplateAttribute {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a child attribute; empty children are dropped.
    pub fn with_item(mut self, item: TemplateAttribute) -> Self {
        if !item.is_empty() {
            self.items.push(item);
        }
        self
    }

    /// An attribute without a usable key carries nothing to render.
    pub fn is_empty(&self) -> bool {
        is_blank(&self.key)
    }
}

/// Deserializes an attribute list, dropping empty entries the same way the
/// builder does.
fn non_empty_attributes<'de, D>(deserializer: D) -> Result<Vec<TemplateAttribute>, D::Error>
where
    D: Deserializer<'de>,
{
    let attrs = Vec::<TemplateAttribute>::deserialize(deserializer)?;
    let before = attrs.len();
    let kept: Vec<_> = attrs.into_iter().filter(|a| !a.is_empty()).collect();
    if kept.len() < before {
        tracing::debug!("dropped {} empty template attributes", before - kept.len());
    }
    Ok(kept)
}

fn default_override() -> bool {
    true
}

/// One output-file generation request.
///
/// ```
/// use fieldsmith::{TemplateAttribute, TemplateDescriptor};
///
/// let tpl = TemplateDescriptor::builder()
///     .file("entity.tpl")
///     .attribute(TemplateAttribute::new("id").with_value("i64"))
///     .build();
/// assert!(tpl.overwrite());
/// assert_eq!(tpl.attribute(0).map(|a| a.key.as_str()), Some("id"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct TemplateDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option(fallback = path_opt)))]
    path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    file: Option<String>,
    /// Whether an existing output file may be replaced.
    #[serde(rename = "override", default = "default_override")]
    #[builder(default = true)]
    overwrite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option(fallback = source_folder_opt)))]
    source_folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option(fallback = package_name_opt)))]
    package_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    class_name: Option<String>,
    /// Appended with `attribute`; empty attributes are skipped.
    #[serde(default, deserialize_with = "non_empty_attributes")]
    #[builder(via_mutators, mutators(
        pub fn attribute(&mut self, attr: TemplateAttribute) {
            if attr.is_empty() {
                tracing::debug!("skipping empty template attribute");
            } else {
                self.attributes.push(attr);
            }
        }
        pub fn maybe_attribute(&mut self, attr: Option<TemplateAttribute>) {
            match attr {
                Some(attr) if !attr.is_empty() => self.attributes.push(attr),
                _ => tracing::debug!("skipping absent template attribute"),
            }
        }
    ))]
    attributes: Vec<TemplateAttribute>,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    #[builder(via_mutators, mutators(
        pub fn extension(&mut self, key: &str, value: Value) {
            self.extensions.insert(key, value);
        }
    ))]
    extensions: Extensions,
}

impl Default for TemplateDescriptor {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TemplateDescriptor {
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn source_folder(&self) -> Option<&str> {
        self.source_folder.as_deref()
    }

    pub fn package_name(&self) -> Option<&str> {
        self.package_name.as_deref()
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Attributes in the order they were added, which is rendering order.
    pub fn attributes(&self) -> &[TemplateAttribute] {
        &self.attributes
    }

    /// Bounds-checked lookup: `None` for any `index >= len`.
    pub fn attribute(&self, index: usize) -> Option<&TemplateAttribute> {
        self.attributes.get(index)
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(tpl: &TemplateDescriptor) -> Vec<&str> {
        tpl.attributes().iter().map(|a| a.key.as_str()).collect()
    }

    #[test]
    fn test_override_defaults_to_true() {
        assert!(TemplateDescriptor::builder().build().overwrite());
        assert!(TemplateDescriptor::default().overwrite());
        assert!(!TemplateDescriptor::builder().overwrite(false).build().overwrite());
    }

    #[test]
    fn test_attributes_keep_insertion_order() {
        let tpl = TemplateDescriptor::builder()
            .attribute(TemplateAttribute::new("id"))
            .attribute(TemplateAttribute::new("name"))
            .attribute(TemplateAttribute::new("created_at"))
            .build();
        assert_eq!(keys(&tpl), ["id", "name", "created_at"]);
    }

    #[test]
    fn test_absent_and_empty_attributes_are_ignored() {
        let tpl = TemplateDescriptor::builder()
            .attribute(TemplateAttribute::new("id"))
            .maybe_attribute(None)
            .attribute(TemplateAttribute::new("   "))
            .maybe_attribute(Some(TemplateAttribute::new("")))
            .maybe_attribute(Some(TemplateAttribute::new("name")))
            .build();
        assert_eq!(keys(&tpl), ["id", "name"]);
    }

    #[test]
    fn test_attribute_lookup_is_bounds_checked() {
        let tpl = TemplateDescriptor::builder()
            .attribute(TemplateAttribute::new("a"))
            .attribute(TemplateAttribute::new("b"))
            .build();
        assert_eq!(tpl.attribute(1).map(|a| a.key.as_str()), Some("b"));
        assert!(tpl.attribute(2).is_none());
        assert!(tpl.attribute(usize::MAX).is_none());
        assert!(TemplateDescriptor::default().attribute(0).is_none());
    }

    #[test]
    fn test_nested_items() {
        let attr = TemplateAttribute::new("columns")
            .with_item(TemplateAttribute::new("id").with_value("i64"))
            .with_item(TemplateAttribute::new(""));
        assert_eq!(attr.items.len(), 1);
        assert_eq!(attr.items[0].value.as_deref(), Some("i64"));
    }

    #[test]
    fn test_extensions() {
        let tpl = TemplateDescriptor::builder()
            .extension("author", json!("ann"))
            .extension("author", json!("bob"))
            .build();
        assert_eq!(tpl.extension("author"), Some(&json!("bob")));
        assert_eq!(tpl.extension("license"), None);
    }

    #[test]
    fn test_serde_uses_override_key() {
        let tpl: TemplateDescriptor =
            serde_json::from_value(json!({"file": "entity.ftl", "override": false})).unwrap();
        assert!(!tpl.overwrite());
        assert_eq!(tpl.file(), Some("entity.ftl"));

        let missing: TemplateDescriptor = serde_json::from_value(json!({})).unwrap();
        assert!(missing.overwrite());

        let value = serde_json::to_value(&tpl).unwrap();
        assert_eq!(value["override"], json!(false));
    }

    #[test]
    fn test_deserialize_drops_empty_attributes() {
        let tpl: TemplateDescriptor = serde_json::from_value(json!({
            "attributes": [
                {"key": ""},
                {"key": "  "},
                {"key": "id", "items": [{"key": ""}, {"key": "column", "value": "id"}]}
            ]
        }))
        .unwrap();

        assert_eq!(keys(&tpl), ["id"]);
        let items = &tpl.attribute(0).unwrap().items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].key, "column");
    }

    #[test]
    fn test_deserialize_drops_blank_extension_keys() {
        let tpl: TemplateDescriptor =
            serde_json::from_value(json!({"extensions": {"": 1, "table": "sys_user"}})).unwrap();
        assert_eq!(tpl.extensions().len(), 1);
        assert_eq!(tpl.extension("table"), Some(&json!("sys_user")));
    }
}
