use crate::assemble::resolve_columns;
use crate::mcp::protocol::*;
use crate::mcp::session::Session;

const TYPE_MAP_URI: &str = "fieldsmith://config/type-map";
const SEPARATORS_URI: &str = "fieldsmith://config/separators";
const TABLE_PREFIX: &str = "fieldsmith://table/";

/// Returns the list of resources the fieldsmith server exposes.
pub fn list_resources(session: &Session) -> Vec<ResourceDefinition> {
    let mut resources = vec![
        ResourceDefinition {
            uri: TYPE_MAP_URI.into(),
            name: "Type Map".into(),
            description: "SQL type to generated field type mapping".into(),
            mime_type: "application/json".into(),
        },
        ResourceDefinition {
            uri: SEPARATORS_URI.into(),
            name: "Separators".into(),
            description: "Strings treated as word separators in identifiers".into(),
            mime_type: "application/json".into(),
        },
    ];

    // Add per-table resources
    for table in session.table_names() {
        resources.push(ResourceDefinition {
            uri: format!("{TABLE_PREFIX}{table}"),
            name: format!("Table: {table}"),
            description: format!("Resolved column descriptors of '{table}'"),
            mime_type: "application/json".into(),
        });
    }

    resources
}

/// Reads a resource by URI.
pub fn read_resource(session: &Session, uri: &str) -> ResourceReadResult {
    let (mime, text) = match uri {
        TYPE_MAP_URI => as_json(&session.config.type_map),
        SEPARATORS_URI => as_json(&session.config.separators),
        _ if uri.starts_with(TABLE_PREFIX) => {
            let table = uri.strip_prefix(TABLE_PREFIX).unwrap_or("");
            read_table(session, table)
        }
        _ => ("text/plain", format!("Unknown resource: {}", uri)),
    };

    ResourceReadResult {
        contents: vec![ResourceContent {
            uri: uri.to_string(),
            mime_type: mime.to_string(),
            text,
        }],
    }
}

fn read_table(session: &Session, table: &str) -> (&'static str, String) {
    let Some(schema) = &session.schema else {
        return ("text/plain", "No database connected".to_string());
    };
    let columns = match schema.columns(table) {
        Ok(columns) => columns,
        Err(e) => return ("text/plain", format!("{e:#}")),
    };
    match resolve_columns(&columns, &session.config) {
        Ok(resolved) => as_json(&resolved),
        Err(e) => ("text/plain", e.to_string()),
    }
}

fn as_json<T: serde::Serialize>(value: &T) -> (&'static str, String) {
    match serde_json::to_string(value) {
        Ok(text) => ("application/json", text),
        Err(e) => ("text/plain", format!("Failed to encode resource: {e}")),
    }
}
