use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::column::ColumnDescriptor;
use crate::naming::predicate::is_blank;
use crate::naming::to_camel_case;

/// Maps a SQL column type to a generated field type.
pub trait TypeMapper {
    fn field_type(&self, sql_type: &str) -> Option<String>;
}

impl<F> TypeMapper for F
where
    F: Fn(&str) -> Option<String>,
{
    fn field_type(&self, sql_type: &str) -> Option<String> {
        self(sql_type)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("column '{column}' has no field type and no SQL type to map from")]
    MissingSqlType { column: String },

    #[error("no field type mapping for SQL type '{sql_type}' (column '{column}')")]
    UnmappedType { column: String, sql_type: String },

    #[error("column '{column}' yields an empty field name")]
    EmptyFieldName { column: String },
}

/// The concrete name, type and remark of a generated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Applies the override-then-derive policy to one column.
///
/// Each override wins when present. Otherwise the name is the column name in
/// camelCase, the type comes from `mapper` keyed by the SQL type, and the
/// remark is the column remark.
pub fn resolve_field(
    column: &ColumnDescriptor,
    mapper: &impl TypeMapper,
) -> Result<ResolvedField, ResolveError> {
    let name = match column.field_name() {
        Some(name) => name.to_string(),
        None => {
            let derived = to_camel_case(column.name());
            tracing::debug!(column = column.name(), field = %derived, "derived field name");
            derived
        }
    };
    if is_blank(&name) {
        return Err(ResolveError::EmptyFieldName {
            column: column.name().to_string(),
        });
    }

    let field_type = match column.field_type() {
        Some(ty) => ty.to_string(),
        None => {
            let sql_type = column.sql_type().ok_or_else(|| ResolveError::MissingSqlType {
                column: column.name().to_string(),
            })?;
            mapper
                .field_type(sql_type)
                .ok_or_else(|| ResolveError::UnmappedType {
                    column: column.name().to_string(),
                    sql_type: sql_type.to_string(),
                })?
        }
    };

    let remark = column
        .field_remark()
        .or_else(|| column.remark())
        .map(str::to_string);

    Ok(ResolvedField {
        name,
        field_type,
        remark,
    })
}

impl ColumnDescriptor {
    /// Returns a copy with the resolved field written into the overrides.
    ///
    /// Resolving an already resolved descriptor yields an equal descriptor.
    pub fn resolve_overrides(&self, mapper: &impl TypeMapper) -> Result<Self, ResolveError> {
        resolve_field(self, mapper).map(|field| self.with_resolved(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(sql_type: &str) -> Option<String> {
        match sql_type.to_ascii_lowercase().as_str() {
            "varchar" | "text" => Some("String".into()),
            "bigint" => Some("i64".into()),
            _ => None,
        }
    }

    #[test]
    fn test_name_derived_from_column_when_unset() {
        let col = ColumnDescriptor::builder().name("user_name").sql_type("VARCHAR").build();
        let field = resolve_field(&col, &mapper).unwrap();
        assert_eq!(field.name, "userName");
        assert_eq!(field.field_type, "String");
    }

    #[test]
    fn test_override_name_used_verbatim() {
        let col = ColumnDescriptor::builder()
            .name("user_name")
            .sql_type("VARCHAR")
            .field_name("login_Name")
            .build();
        assert_eq!(resolve_field(&col, &mapper).unwrap().name, "login_Name");
    }

    #[test]
    fn test_override_type_skips_mapper() {
        let col = ColumnDescriptor::builder()
            .name("payload")
            .sql_type("JSONB")
            .field_type("serde_json::Value")
            .build();
        assert_eq!(
            resolve_field(&col, &mapper).unwrap().field_type,
            "serde_json::Value"
        );
    }

    #[test]
    fn test_remark_falls_back_to_column_remark() {
        let col = ColumnDescriptor::builder()
            .name("id")
            .sql_type("BIGINT")
            .remark("primary key")
            .build();
        assert_eq!(
            resolve_field(&col, &mapper).unwrap().remark.as_deref(),
            Some("primary key")
        );

        let col = ColumnDescriptor::builder()
            .name("id")
            .sql_type("BIGINT")
            .remark("primary key")
            .field_remark("identifier")
            .build();
        assert_eq!(
            resolve_field(&col, &mapper).unwrap().remark.as_deref(),
            Some("identifier")
        );
    }

    #[test]
    fn test_unmapped_type_is_an_error() {
        let col = ColumnDescriptor::builder().name("shape").sql_type("GEOMETRY").build();
        assert_eq!(
            resolve_field(&col, &mapper),
            Err(ResolveError::UnmappedType {
                column: "shape".into(),
                sql_type: "GEOMETRY".into(),
            })
        );

        let col = ColumnDescriptor::builder().name("shape").build();
        assert_eq!(
            resolve_field(&col, &mapper),
            Err(ResolveError::MissingSqlType {
                column: "shape".into()
            })
        );
    }

    #[test]
    fn test_resolve_overrides_is_idempotent() {
        let col = ColumnDescriptor::builder()
            .name("created_by")
            .sql_type("BIGINT")
            .remark("author")
            .build();
        let once = col.resolve_overrides(&mapper).unwrap();
        let twice = once.resolve_overrides(&mapper).unwrap();

        assert_eq!(once.field_name(), Some("createdBy"));
        assert_eq!(once.field_type(), Some("i64"));
        assert_eq!(once.field_remark(), Some("author"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_resolved_overrides_no_longer_need_the_mapper() {
        let col = ColumnDescriptor::builder()
            .name("id")
            .sql_type("BIGINT")
            .build()
            .resolve_overrides(&mapper)
            .unwrap();
        let none = |_: &str| -> Option<String> { None };
        assert!(col.resolve_overrides(&none).is_ok());
    }

    #[test]
    fn test_name_without_words_is_an_error() {
        for raw in ["_", "__", "-"] {
            let col = ColumnDescriptor::builder().name(raw).sql_type("TEXT").build();
            assert_eq!(
                resolve_field(&col, &mapper),
                Err(ResolveError::EmptyFieldName { column: raw.into() })
            );
        }

        let col = ColumnDescriptor::builder()
            .name("title")
            .sql_type("TEXT")
            .field_name("  ")
            .build();
        assert!(matches!(
            col.resolve_overrides(&mapper),
            Err(ResolveError::EmptyFieldName { .. })
        ));
    }
}
