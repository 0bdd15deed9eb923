use crate::config::Config;
use crate::schema::SchemaReader;

/// State shared by MCP handlers for the lifetime of one server run.
pub struct Session {
    pub config: Config,
    /// Absent when the server was started without `--db`.
    pub schema: Option<SchemaReader>,
}

impl Session {
    pub fn new(config: Config, schema: Option<SchemaReader>) -> Self {
        Self { config, schema }
    }

    /// Tables available for introspection; empty without a database.
    pub fn table_names(&self) -> Vec<String> {
        match &self.schema {
            Some(schema) => schema.tables().unwrap_or_else(|e| {
                tracing::warn!("Failed to list tables: {e:#}");
                vec![]
            }),
            None => vec![],
        }
    }
}
