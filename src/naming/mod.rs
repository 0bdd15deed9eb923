pub mod case;
pub mod join;
pub mod predicate;
pub mod tokenize;

pub use case::{
    first_to_lower_case, first_to_upper_case, to_camel_case, to_camel_case_with,
    to_kebab_case, to_kebab_case_with, to_pascal_case, to_pascal_case_with, to_snake_case,
    to_snake_case_with, to_upper_kebab_case, to_upper_snake_case, CaseStyle,
    DEFAULT_SEPARATORS,
};
pub use tokenize::{split_join, tokenize};
