pub mod column;
pub mod extensions;
pub mod field;
pub mod template;

pub use column::ColumnDescriptor;
pub use extensions::Extensions;
pub use field::{resolve_field, ResolveError, ResolvedField, TypeMapper};
pub use template::{TemplateAttribute, TemplateDescriptor};
