use serde::{Deserialize, Serialize};

use super::join::join_with;
use super::predicate::{is_lower, is_upper};
use super::tokenize::tokenize;

/// Strings treated as word boundaries in addition to `_` and case changes.
pub const DEFAULT_SEPARATORS: [&str; 2] = [" ", "-"];

pub fn to_snake_case(s: &str) -> String {
    to_snake_case_with(s, &DEFAULT_SEPARATORS)
}

pub fn to_snake_case_with<S: AsRef<str>>(s: &str, separators: &[S]) -> String {
    join_with("_", &tokenize(s, separators))
}

pub fn to_upper_snake_case(s: &str) -> String {
    to_snake_case(s).to_ascii_uppercase()
}

pub fn to_kebab_case(s: &str) -> String {
    to_kebab_case_with(s, &DEFAULT_SEPARATORS)
}

pub fn to_kebab_case_with<S: AsRef<str>>(s: &str, separators: &[S]) -> String {
    join_with("-", &tokenize(s, separators))
}

pub fn to_upper_kebab_case(s: &str) -> String {
    to_kebab_case(s).to_ascii_uppercase()
}

/// `user_name` → `userName`.
pub fn to_camel_case(s: &str) -> String {
    to_camel_case_with(s, &DEFAULT_SEPARATORS)
}

pub fn to_camel_case_with<S: AsRef<str>>(s: &str, separators: &[S]) -> String {
    tokenize(s, separators)
        .iter()
        .enumerate()
        .map(|(i, token)| {
            if i == 0 {
                token.clone()
            } else {
                first_to_upper_case(token)
            }
        })
        .collect()
}

/// `user_name` → `UserName`.
pub fn to_pascal_case(s: &str) -> String {
    to_pascal_case_with(s, &DEFAULT_SEPARATORS)
}

pub fn to_pascal_case_with<S: AsRef<str>>(s: &str, separators: &[S]) -> String {
    tokenize(s, separators)
        .iter()
        .map(|token| first_to_upper_case(token))
        .collect()
}

/// Upper-cases the first character if it is an ASCII lowercase letter.
pub fn first_to_upper_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_lower(c) => {
            let mut out = String::with_capacity(s.len());
            out.push(c.to_ascii_uppercase());
            out.push_str(chars.as_str());
            out
        }
        _ => s.to_string(),
    }
}

/// Lower-cases the first character if it is an ASCII uppercase letter.
pub fn first_to_lower_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_upper(c) => {
            let mut out = String::with_capacity(s.len());
            out.push(c.to_ascii_lowercase());
            out.push_str(chars.as_str());
            out
        }
        _ => s.to_string(),
    }
}

/// Naming convention a converter produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CaseStyle {
    Camel,
    Pascal,
    Snake,
    Kebab,
    UpperSnake,
    UpperKebab,
}

impl CaseStyle {
    pub const ALL: [CaseStyle; 6] = [
        CaseStyle::Camel,
        CaseStyle::Pascal,
        CaseStyle::Snake,
        CaseStyle::Kebab,
        CaseStyle::UpperSnake,
        CaseStyle::UpperKebab,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CaseStyle::Camel => "camel",
            CaseStyle::Pascal => "pascal",
            CaseStyle::Snake => "snake",
            CaseStyle::Kebab => "kebab",
            CaseStyle::UpperSnake => "upper_snake",
            CaseStyle::UpperKebab => "upper_kebab",
        }
    }

    /// Looks a style up by name in any convention (`upper-snake`,
    /// `UpperSnake` and `upper_snake` are the same style).
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = to_snake_case(name);
        Self::ALL.into_iter().find(|style| style.name() == wanted)
    }

    pub fn apply(self, s: &str) -> String {
        self.apply_with(s, &DEFAULT_SEPARATORS)
    }

    pub fn apply_with<S: AsRef<str>>(self, s: &str, separators: &[S]) -> String {
        match self {
            CaseStyle::Camel => to_camel_case_with(s, separators),
            CaseStyle::Pascal => to_pascal_case_with(s, separators),
            CaseStyle::Snake => to_snake_case_with(s, separators),
            CaseStyle::Kebab => to_kebab_case_with(s, separators),
            CaseStyle::UpperSnake => to_snake_case_with(s, separators).to_ascii_uppercase(),
            CaseStyle::UpperKebab => to_kebab_case_with(s, separators).to_ascii_uppercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_trip_between_conventions() {
        assert_eq!(to_camel_case("user_name"), "userName");
        assert_eq!(to_pascal_case("user_name"), "UserName");
        assert_eq!(to_snake_case("UserName"), "user_name");
        assert_eq!(to_kebab_case("UserName"), "user-name");
    }

    #[test]
    fn test_mixed_separators() {
        assert_eq!(to_snake_case("User Name-Id"), "user_name_id");
        assert_eq!(to_camel_case("User Name-Id"), "userNameId");
    }

    #[test]
    fn test_upper_variants() {
        assert_eq!(to_upper_snake_case("userName"), "USER_NAME");
        assert_eq!(to_upper_kebab_case("user_name"), "USER-NAME");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(to_snake_case(""), "");
        assert_eq!(to_kebab_case(""), "");
        assert_eq!(to_camel_case(""), "");
        assert_eq!(to_pascal_case(""), "");
        assert_eq!(to_upper_snake_case(""), "");
        assert_eq!(to_upper_kebab_case(""), "");
    }

    #[test]
    fn test_digits_and_acronyms() {
        assert_eq!(to_camel_case("address_line2"), "addressLine2");
        assert_eq!(to_pascal_case("2fa_code"), "2faCode");
        assert_eq!(to_camel_case("HTMLParser"), "htmlParser");
        assert_eq!(to_snake_case("user2Name"), "user2_name");
    }

    #[test]
    fn test_first_letter_helpers() {
        assert_eq!(first_to_upper_case("name"), "Name");
        assert_eq!(first_to_upper_case("1st"), "1st");
        assert_eq!(first_to_upper_case(""), "");
        assert_eq!(first_to_lower_case("Name"), "name");
        assert_eq!(first_to_lower_case("éA"), "éA");
    }

    #[test]
    fn test_with_custom_separators() {
        assert_eq!(to_snake_case_with("user.name", &["."]), "user_name");
        assert_eq!(to_pascal_case_with("user.name", &["."]), "UserName");
    }

    #[test]
    fn test_case_style_lookup() {
        assert_eq!(CaseStyle::from_name("upper-snake"), Some(CaseStyle::UpperSnake));
        assert_eq!(CaseStyle::from_name("UpperKebab"), Some(CaseStyle::UpperKebab));
        assert_eq!(CaseStyle::from_name("camel"), Some(CaseStyle::Camel));
        assert_eq!(CaseStyle::from_name("title"), None);
    }

    #[test]
    fn test_case_style_apply() {
        let applied: Vec<_> = CaseStyle::ALL
            .iter()
            .map(|style| style.apply("order_item"))
            .collect();
        assert_eq!(
            applied,
            ["orderItem", "OrderItem", "order_item", "order-item", "ORDER_ITEM", "ORDER-ITEM"]
        );
    }

    proptest! {
        #[test]
        fn snake_case_is_canonical(s in "[A-Za-z0-9 -]{0,24}") {
            let snake = to_snake_case(&s);
            prop_assert!(!snake.chars().any(|c| c.is_ascii_uppercase()));
            prop_assert!(!snake.starts_with('_'));
            prop_assert!(!snake.ends_with('_'));
            prop_assert!(!snake.contains("__"));
        }

        #[test]
        fn snake_case_is_idempotent(s in "[A-Za-z0-9 _-]{0,24}") {
            let once = to_snake_case(&s);
            prop_assert_eq!(to_snake_case(&once), once);
        }
    }
}
