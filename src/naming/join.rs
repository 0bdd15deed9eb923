/// Replaces every occurrence of each pattern with `with`, applying the
/// patterns in order. Empty patterns are skipped.
pub fn replace_each<S: AsRef<str>>(input: &str, patterns: &[S], with: &str) -> String {
    patterns
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| !p.is_empty())
        .fold(input.to_string(), |acc, p| acc.replace(p, with))
}

/// Applies `(from, to)` replacements in order. A `None` replacement
/// deletes the pattern; empty patterns are skipped.
pub fn replace_pairs(input: &str, pairs: &[(&str, Option<&str>)]) -> String {
    pairs
        .iter()
        .filter(|(from, _)| !from.is_empty())
        .fold(input.to_string(), |acc, (from, to)| {
            acc.replace(from, to.unwrap_or_default())
        })
}

/// Collapses every run of consecutive `sep` occurrences into one.
pub fn collapse_runs(input: &str, sep: &str) -> String {
    if sep.is_empty() {
        return input.to_string();
    }
    let doubled = format!("{sep}{sep}");
    let mut out = input.to_string();
    while out.contains(&doubled) {
        out = out.replace(&doubled, sep);
    }
    out
}

/// Joins items with `separator`; an empty input yields an empty string.
pub fn join_with<S: AsRef<str>>(separator: &str, items: &[S]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(item.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_each_in_order() {
        // The second pattern sees the output of the first.
        assert_eq!(replace_each("a b-c", &[" ", "-"], "_"), "a_b_c");
        assert_eq!(replace_each("ab", &["a", "_b"], "_"), "_");
    }

    #[test]
    fn test_replace_each_skips_empty_patterns() {
        assert_eq!(replace_each("abc", &[""], "_"), "abc");
    }

    #[test]
    fn test_replace_pairs() {
        assert_eq!(
            replace_pairs("${table}_${pk}", &[("${table}", Some("user")), ("${pk}", Some("id"))]),
            "user_id"
        );
        assert_eq!(replace_pairs("t_order", &[("t_", None)]), "order");
        // Later pairs see earlier output.
        assert_eq!(replace_pairs("ab", &[("a", Some("b")), ("bb", Some("c"))]), "c");
        assert_eq!(replace_pairs("abc", &[("", Some("_"))]), "abc");
    }

    #[test]
    fn test_collapse_runs() {
        assert_eq!(collapse_runs("a___b_c", "_"), "a_b_c");
        assert_eq!(collapse_runs("a-.-.b", "-."), "a-.b");
        assert_eq!(collapse_runs("a__b", ""), "a__b");
    }

    #[test]
    fn test_join_with() {
        assert_eq!(join_with(".", &["1", "2", "3"]), "1.2.3");
        assert_eq!(join_with(".", &Vec::<String>::new()), "");
    }
}
