//! General-purpose helpers shared across the redefinition engine.

use regex::Regex;

/// Namespace prefix reserved for this library's own symbols.
///
/// Anything under it is excluded from user-facing introspection results;
/// everything else, third-party host dependencies included, counts as
/// foreign.
pub const OWN_NAMESPACE_PREFIX: &str = "Rewire\\";

/// Index of the first element strictly greater than `value`.
///
/// Upper-bound semantics: with equal elements present, the insertion point
/// after all of them; `items.len()` when nothing is greater. The slice must
/// be sorted ascending and non-empty, otherwise the result is meaningless.
pub fn find_first_greater_than<T: Ord>(items: &[T], value: &T) -> usize {
    debug_assert!(!items.is_empty());
    let mut low = 0;
    let mut high = items.len() - 1;
    if items[high] <= *value {
        return high + 1;
    }
    while low < high {
        let mid = (low + high) / 2;
        if items[mid] <= *value {
            low = mid + 1;
        } else {
            high = mid;
        }
    }
    low
}

/// Remove every whitespace character.
///
/// Used to compare source snippets while ignoring formatting differences.
pub fn condense(text: &str) -> String {
    text.chars().filter(|ch| !ch.is_whitespace()).collect()
}

/// Convert backslash separators to forward slashes and trim trailing slashes.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/").trim_end_matches('/').to_string()
}

/// Filter `subjects` through a small glob dialect.
///
/// `*` matches any sequence, `{`/`}` group, spaces are stripped, and every
/// other character is literal. Matching is unanchored, substring-style.
pub fn match_wildcard(wildcard: &str, subjects: &[&str]) -> Vec<String> {
    let mut pattern = String::with_capacity(wildcard.len() + 8);
    for ch in wildcard.chars() {
        match ch {
            '*' => pattern.push_str(".*"),
            '{' => pattern.push('('),
            '}' => pattern.push(')'),
            ch if ch.is_whitespace() => {}
            ch => pattern.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4]))),
        }
    }
    // every non-glob character is escaped above, so the pattern is valid
    let Ok(matcher) = Regex::new(&pattern) else {
        return Vec::new();
    };
    subjects
        .iter()
        .filter(|subject| matcher.is_match(subject))
        .map(|subject| subject.to_string())
        .collect()
}

/// Whether a qualified name belongs to this library's own namespace.
pub fn is_own_name(name: &str) -> bool {
    name.get(..OWN_NAMESPACE_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(OWN_NAMESPACE_PREFIX))
}

/// Whether a qualified name belongs to anything other than this library.
pub fn is_foreign_name(name: &str) -> bool {
    !is_own_name(name)
}

/// Push a value and return the index it landed at.
pub fn append<T>(items: &mut Vec<T>, value: T) -> usize {
    items.push(value);
    items.len() - 1
}
