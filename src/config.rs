use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::model::TypeMapper;
use crate::naming::predicate::is_blank;
use crate::naming::DEFAULT_SEPARATORS;

// ─── Configuration ─────────────────────────────────────────────────────────

/// Tool configuration, read from `~/.fieldsmith/config.json` or `--config`.
///
/// Every key is optional; missing keys keep their defaults. Entries in
/// `type_map` are layered over the built-in mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Strings treated as word separators when converting names.
    pub separators: Vec<String>,
    /// Prefixes stripped from table names before deriving class names.
    pub table_prefixes: Vec<String>,
    /// SQL type → generated field type.
    pub type_map: TypeMap,
    pub template: TemplateDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
            table_prefixes: vec![],
            type_map: TypeMap::default(),
            template: TemplateDefaults::default(),
        }
    }
}

/// Values copied into every assembled template descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateDefaults {
    pub path: Option<String>,
    pub source_folder: Option<String>,
    pub package_name: Option<String>,
    #[serde(rename = "override")]
    pub overwrite: bool,
}

impl Default for TemplateDefaults {
    fn default() -> Self {
        Self {
            path: None,
            source_folder: None,
            package_name: None,
            overwrite: true,
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `path` is `None`.
    ///
    /// An explicit path must exist; a missing default file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => {
                let path = default_config_path()?;
                if path.exists() {
                    Self::load_file(&path)
                } else {
                    tracing::debug!("No config at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config = Self::from_json(&content)
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        tracing::info!(
            "Loaded config from {} ({} type mappings)",
            path.display(),
            config.type_map.len()
        );
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let mut config: Config =
            serde_json::from_str(content).context("Failed to parse config JSON")?;
        config.type_map = TypeMap::default().merged(config.type_map);
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.separators.iter().any(|s| s.is_empty()) {
            anyhow::bail!("Separators must not be empty strings");
        }
        if let Some((key, _)) = self.type_map.iter().find(|(k, v)| is_blank(k) || is_blank(v)) {
            anyhow::bail!("Type mapping '{}' must have a non-blank SQL type and field type", key);
        }
        Ok(())
    }

    pub fn separators(&self) -> Vec<&str> {
        self.separators.iter().map(String::as_str).collect()
    }

    /// Table name with the first matching configured prefix removed.
    pub fn strip_table_prefix<'a>(&self, table: &'a str) -> &'a str {
        self.table_prefixes
            .iter()
            .filter(|p| !p.is_empty())
            .find_map(|p| table.strip_prefix(p.as_str()))
            .unwrap_or(table)
    }
}

/// Returns the default config path: `~/.fieldsmith/config.json`
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".fieldsmith").join("config.json"))
}

// ─── Type Map ──────────────────────────────────────────────────────────────

/// Ordered, case-insensitive SQL type → field type table.
///
/// Lookups use the base type: `VARCHAR(255)` and `INT UNSIGNED` match the
/// `varchar` and `int` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeMap(IndexMap<String, String>);

const DEFAULT_TYPES: &[(&str, &str)] = &[
    ("tinyint", "i8"),
    ("smallint", "i16"),
    ("mediumint", "i32"),
    ("int", "i32"),
    ("integer", "i64"),
    ("bigint", "i64"),
    ("serial", "i32"),
    ("bigserial", "i64"),
    ("real", "f32"),
    ("float", "f64"),
    ("double", "f64"),
    ("double precision", "f64"),
    ("decimal", "String"),
    ("numeric", "String"),
    ("boolean", "bool"),
    ("bool", "bool"),
    ("char", "String"),
    ("varchar", "String"),
    ("character varying", "String"),
    ("text", "String"),
    ("clob", "String"),
    ("json", "serde_json::Value"),
    ("jsonb", "serde_json::Value"),
    ("uuid", "String"),
    ("date", "String"),
    ("time", "String"),
    ("datetime", "String"),
    ("timestamp", "String"),
    ("blob", "Vec<u8>"),
    ("bytea", "Vec<u8>"),
];

const TYPE_MODIFIERS: &[&str] = &["unsigned", "signed", "zerofill"];

impl Default for TypeMap {
    fn default() -> Self {
        Self(
            DEFAULT_TYPES
                .iter()
                .map(|(sql, field)| (sql.to_string(), field.to_string()))
                .collect(),
        )
    }
}

impl TypeMap {
    pub fn insert(&mut self, sql_type: impl Into<String>, field_type: impl Into<String>) {
        let sql_type = base_type(&sql_type.into());
        self.0.insert(sql_type, field_type.into());
    }

    /// Layers `overrides` on top of `self`.
    pub fn merged(mut self, overrides: TypeMap) -> Self {
        for (sql, field) in overrides.0 {
            self.insert(sql, field);
        }
        self
    }

    pub fn get(&self, sql_type: &str) -> Option<&str> {
        let base = base_type(sql_type);
        self.0.get(&base).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl TypeMapper for TypeMap {
    fn field_type(&self, sql_type: &str) -> Option<String> {
        self.get(sql_type).map(str::to_string)
    }
}

/// `VARCHAR(255)` → `varchar`, `int(11) unsigned` → `int`.
fn base_type(sql_type: &str) -> String {
    let head = sql_type.split('(').next().unwrap_or_default();
    head.split_whitespace()
        .map(str::to_ascii_lowercase)
        .filter(|word| !TYPE_MODIFIERS.contains(&word.as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_type() {
        assert_eq!(base_type("VARCHAR(255)"), "varchar");
        assert_eq!(base_type("int(11) unsigned"), "int");
        assert_eq!(base_type("INT UNSIGNED"), "int");
        assert_eq!(base_type("Double  Precision"), "double precision");
        assert_eq!(base_type(""), "");
    }

    #[test]
    fn test_type_map_lookup() {
        let map = TypeMap::default();
        assert_eq!(map.get("BIGINT"), Some("i64"));
        assert_eq!(map.get("varchar(64)"), Some("String"));
        assert_eq!(map.get("character varying(10)"), Some("String"));
        assert_eq!(map.get("GEOMETRY"), None);
        assert_eq!(map.field_type("BOOLEAN"), Some("bool".to_string()));
    }

    #[test]
    fn test_defaults_when_keys_missing() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.separators(), [" ", "-"]);
        assert!(config.template.overwrite);
        assert_eq!(config.type_map, TypeMap::default());
    }

    #[test]
    fn test_user_type_map_layers_over_defaults() {
        let config = Config::from_json(
            r#"{"type_map": {"TIMESTAMP": "chrono::NaiveDateTime", "geometry": "geo::Geometry"}}"#,
        )
        .unwrap();
        assert_eq!(config.type_map.get("timestamp"), Some("chrono::NaiveDateTime"));
        assert_eq!(config.type_map.get("GEOMETRY"), Some("geo::Geometry"));
        assert_eq!(config.type_map.get("bigint"), Some("i64"));
    }

    #[test]
    fn test_template_defaults() {
        let config = Config::from_json(
            r#"{"template": {"package_name": "com.example", "override": false}}"#,
        )
        .unwrap();
        assert_eq!(config.template.package_name.as_deref(), Some("com.example"));
        assert!(!config.template.overwrite);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Config::from_json(r#"{"separators": [""]}"#).is_err());
        assert!(Config::from_json(r#"{"type_map": {"text": " "}}"#).is_err());
        assert!(Config::from_json("not json").is_err());
    }

    #[test]
    fn test_strip_table_prefix() {
        let config = Config::from_json(r#"{"table_prefixes": ["t_", "sys_"]}"#).unwrap();
        assert_eq!(config.strip_table_prefix("sys_user"), "user");
        assert_eq!(config.strip_table_prefix("order"), "order");
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("fieldsmith_missing_config.json");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!(
            "fieldsmith_config_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"separators": [" ", "-", "."]}"#).unwrap();
        let config = Config::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.separators(), [" ", "-", "."]);
    }
}
