/// Case class of a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseClass {
    Upper,
    Lower,
    Other,
}

impl CaseClass {
    pub fn of(c: char) -> Self {
        if is_upper(c) {
            CaseClass::Upper
        } else if is_lower(c) {
            CaseClass::Lower
        } else {
            CaseClass::Other
        }
    }
}

pub fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

pub fn is_upper(c: char) -> bool {
    c.is_ascii_uppercase()
}

pub fn is_lower(c: char) -> bool {
    c.is_ascii_lowercase()
}

/// True for the empty string and for strings made only of whitespace.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// True when `needle` occurs in every string of `haystacks`; an empty list
/// holds vacuously.
pub fn contains_in_all<S: AsRef<str>>(needle: &str, haystacks: &[S]) -> bool {
    haystacks.iter().all(|h| h.as_ref().contains(needle))
}
