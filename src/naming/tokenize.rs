//! Identifier segmentation.
//!
//! [`tokenize`] turns an identifier in any of the usual conventions
//! (`snake_case`, `kebab-case`, `PascalCase`, `space separated`, or a mix)
//! into lowercase word tokens. [`split_join`] is the looser variant used for
//! ad-hoc renaming, where punctuation and digits become tokens of their own.

use std::mem;

use super::join::{collapse_runs, join_with, replace_each};
use super::predicate::{is_letter, CaseClass};

/// Delimiter every separator is rewritten to before segmentation.
pub const DELIMITER: char = '_';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    None,
    /// A new word starts at the current character.
    Before,
    /// A new word starts at the previous character (`HTMLParser` splits
    /// before the `P`).
    BeforePrevious,
}

/// Word-start rule between adjacent characters.
///
/// An uppercase letter starts a word unless it continues an uppercase run;
/// the last letter of an uppercase run starts a word when lowercase letters
/// follow it. Everything else continues the current word.
fn boundary(prev2: Option<char>, prev: char, c: char) -> Boundary {
    match (CaseClass::of(prev), CaseClass::of(c)) {
        (CaseClass::Lower | CaseClass::Other, CaseClass::Upper) => Boundary::Before,
        (CaseClass::Upper, CaseClass::Lower)
            if prev2.map(CaseClass::of) == Some(CaseClass::Upper) =>
        {
            Boundary::BeforePrevious
        }
        _ => Boundary::None,
    }
}

/// Splits `input` into lowercase word tokens.
///
/// Every string in `separators` is first rewritten to [`DELIMITER`], in
/// order. Non-letters before the first ASCII letter are kept (minus
/// delimiters) and glued to the first word; after that, words are split at
/// delimiters and at case transitions. Digits and punctuation stay attached
/// to the word they follow.
pub fn tokenize<S: AsRef<str>>(input: &str, separators: &[S]) -> Vec<String> {
    let delimited = replace_each(input, separators, &DELIMITER.to_string());
    let chars: Vec<char> = delimited.chars().collect();
    let start = chars.iter().position(|&c| is_letter(c)).unwrap_or(chars.len());

    let mut segmented: String = chars[..start].iter().filter(|&&c| c != DELIMITER).collect();

    for (i, &c) in chars.iter().enumerate().skip(start) {
        if i > start {
            let prev2 = i.checked_sub(2).map(|j| chars[j]);
            match boundary(prev2, chars[i - 1], c) {
                Boundary::Before => segmented.push(DELIMITER),
                Boundary::BeforePrevious => {
                    if let Some(last) = segmented.pop() {
                        segmented.push(DELIMITER);
                        segmented.push(last);
                    }
                }
                Boundary::None => {}
            }
        }
        segmented.push(c);
    }

    normalize(&segmented)
}

fn normalize(segmented: &str) -> Vec<String> {
    let collapsed = collapse_runs(segmented, &DELIMITER.to_string()).to_ascii_lowercase();
    collapsed
        .trim()
        .trim_start_matches(DELIMITER)
        .split(DELIMITER)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Removes every `excludes` substring, splits what is left into words and
/// non-letter runs, and joins them all with `joiner`.
///
/// Repeated joiners are collapsed and the result is lowercased:
/// `split_join("SysUserRole", "/", &["Sys"]) == "user/role"`.
pub fn split_join<S: AsRef<str>>(input: &str, joiner: &str, excludes: &[S]) -> String {
    let stripped = replace_each(input, excludes, "");
    let tokens = split_words(&stripped);
    collapse_runs(&join_with(joiner, &tokens), joiner).to_ascii_lowercase()
}

/// Letter runs split by the word-start rule; each non-letter run is a token.
fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 {
            let prev = chars[i - 1];
            let split = match (is_letter(prev), is_letter(c)) {
                (true, true) => boundary(i.checked_sub(2).map(|j| chars[j]), prev, c),
                (false, false) => Boundary::None,
                _ => Boundary::Before,
            };
            match split {
                Boundary::Before => tokens.push(mem::take(&mut current)),
                Boundary::BeforePrevious => {
                    let last = current.pop();
                    tokens.push(mem::take(&mut current));
                    current.extend(last);
                }
                Boundary::None => {}
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
