pub mod sqlite;

pub use sqlite::SchemaReader;
