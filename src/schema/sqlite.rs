use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};
use std::collections::HashMap;
use std::path::Path;

use crate::model::ColumnDescriptor;

/// Reads table and column metadata from a SQLite database.
pub struct SchemaReader {
    conn: Connection,
}

/// Index membership of a single column.
#[derive(Debug, Clone)]
struct IndexEntry {
    name: String,
    unique: bool,
    primary: bool,
}

impl SchemaReader {
    /// Open an existing database read-only.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open database: {}", path.display()))?;
        tracing::info!("Opened schema source {}", path.display());
        Ok(Self { conn })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// User tables in name order; SQLite's internal tables are skipped.
    pub fn tables(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;

        let rows = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()
            .context("Failed to list tables")?;

        Ok(rows)
    }

    fn table_sql(&self, table: &str) -> Result<Option<String>> {
        let result = self.conn.query_row(
            "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get::<_, Option<String>>(0),
        );

        match result {
            Ok(sql) => Ok(Some(sql.unwrap_or_default())),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e).context("Failed to query table definition"),
        }
    }

    /// Column descriptors for `table` in declaration order.
    ///
    /// No `field_*` override is set; SQLite has no column comments, so
    /// `remark` is left empty as well.
    pub fn columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let sql = self
            .table_sql(table)?
            .with_context(|| format!("Table not found: {table}"))?;
        let indexes = self.column_indexes(table)?;

        let mut stmt = self.conn.prepare(
            "SELECT name, type, \"notnull\", dflt_value, pk
             FROM pragma_table_info(?1) ORDER BY cid",
        )?;

        let raw = stmt
            .query_map([table], |row| {
                Ok(RawColumn {
                    name: row.get(0)?,
                    declared_type: row.get(1)?,
                    not_null: row.get::<_, i64>(2)? != 0,
                    default_value: row.get(3)?,
                    pk_position: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to read columns of {table}"))?;

        let pk_count = raw.iter().filter(|c| c.pk_position > 0).count();

        let columns: Vec<_> = raw
            .into_iter()
            .map(|col| {
                let primary = col.pk_position > 0;
                // A lone INTEGER PRIMARY KEY aliases the rowid and is
                // assigned automatically.
                let rowid_alias =
                    primary && pk_count == 1 && col.declared_type.eq_ignore_ascii_case("INTEGER");
                let auto_increment =
                    primary && (rowid_alias || declares_autoincrement(&sql, &col.name));

                let index = indexes.get(&col.name);
                let pk_index = index.filter(|i| i.primary);
                let secondary = index.filter(|i| !i.primary);
                let sql_type = col.declared_type.trim();

                ColumnDescriptor::builder()
                    .name(col.name.clone())
                    .sql_type_opt((!sql_type.is_empty()).then(|| sql_type.to_string()))
                    .length_opt(declared_length(&col.declared_type))
                    .default_value_opt(col.default_value.clone())
                    .primary(primary)
                    .primary_name_opt(pk_index.map(|i| i.name.clone()))
                    .indexed(secondary.is_some())
                    .index_name_opt(secondary.map(|i| i.name.clone()))
                    .index_type_opt(
                        secondary.map(|i| if i.unique { "UNIQUE" } else { "NORMAL" }.to_string()),
                    )
                    .nullable(!col.not_null && !primary)
                    .unsigned(col.declared_type.to_ascii_uppercase().contains("UNSIGNED"))
                    .auto_increment(auto_increment)
                    .build()
            })
            .collect();

        tracing::info!("Read {} columns from table {}", columns.len(), table);
        Ok(columns)
    }

    /// First index each column belongs to, keyed by column name.
    fn column_indexes(&self, table: &str) -> Result<HashMap<String, IndexEntry>> {
        let mut list = self.conn.prepare(
            "SELECT name, \"unique\", origin FROM pragma_index_list(?1) ORDER BY seq",
        )?;
        let indexes = list
            .query_map([table], |row| {
                Ok(IndexEntry {
                    name: row.get(0)?,
                    unique: row.get::<_, i64>(1)? != 0,
                    primary: row.get::<_, String>(2)? == "pk",
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to list indexes of {table}"))?;

        let mut info = self
            .conn
            .prepare("SELECT name FROM pragma_index_info(?1) ORDER BY seqno")?;

        let mut by_column = HashMap::new();
        for index in indexes {
            let columns = info
                .query_map([&index.name], |row| row.get::<_, Option<String>>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            // Expression index entries have no column name.
            for column in columns.into_iter().flatten() {
                by_column.entry(column).or_insert_with(|| index.clone());
            }
        }

        Ok(by_column)
    }
}

struct RawColumn {
    name: String,
    declared_type: String,
    not_null: bool,
    default_value: Option<String>,
    pk_position: i64,
}

/// `VARCHAR(64)` → `64`, `DECIMAL(10, 2)` → `10,2`.
fn declared_length(declared_type: &str) -> Option<String> {
    let open = declared_type.find('(')?;
    let close = declared_type[open..].find(')')? + open;
    let inner: String = declared_type[open + 1..close]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    (!inner.is_empty()).then_some(inner)
}

/// Column and constraint definitions of a `CREATE TABLE` statement, split
/// on top-level commas.
fn column_definitions(sql: &str) -> Vec<&str> {
    let (Some(open), Some(close)) = (sql.find('('), sql.rfind(')')) else {
        return vec![];
    };
    if close <= open {
        return vec![];
    }
    let body = &sql[open + 1..close];

    let mut parts = vec![];
    let mut depth = 0usize;
    let mut quote = None;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match quote {
            Some(end) if c == end => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' | '`' => quote = Some(c),
                '[' => quote = Some(']'),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    parts.push(body[start..i].trim());
                    start = i + 1;
                }
                _ => {}
            },
        }
    }
    parts.push(body[start..].trim());
    parts
}

/// Leading identifier of a definition, without its quotes.
fn definition_name(def: &str) -> &str {
    let close = match def.chars().next() {
        Some('"') => '"',
        Some('`') => '`',
        Some('[') => ']',
        _ => return def.split_whitespace().next().unwrap_or(""),
    };
    def[1..].split(close).next().unwrap_or("")
}

/// Whether the definition of `column` itself carries `AUTOINCREMENT`.
fn declares_autoincrement(sql: &str, column: &str) -> bool {
    column_definitions(sql)
        .into_iter()
        .find(|def| definition_name(def).eq_ignore_ascii_case(column))
        .is_some_and(|def| {
            def.split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                .any(|word| word.eq_ignore_ascii_case("AUTOINCREMENT"))
        })
}
