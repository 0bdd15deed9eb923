//! Naming-convention engine and descriptor model for database-driven code scaffolding.

pub mod assemble;
pub mod config;
pub mod mcp;
pub mod model;
pub mod naming;
pub mod schema;
pub mod server;

pub use config::Config;
pub use model::{
    resolve_field, ColumnDescriptor, Extensions, ResolveError, ResolvedField, TemplateAttribute,
    TemplateDescriptor, TypeMapper,
};
