/// Finds the registered package key that owns `search_for`.
///
/// A key matches when the search string equals it exactly or starts with
/// it followed immediately by `/`; `example.org/foo` owns
/// `example.org/foo/cmd` but not `example.org/foobar`.
///
/// The store guarantees no enumeration order, so overlapping keys such as
/// `example.org/a` and `example.org/a/b` would resolve nondeterministically
/// under a plain scan. Candidates are therefore scanned longest key first
/// (ties broken lexicographically): the most specific registered prefix
/// wins, independent of the order the store returned the keys in.
pub fn resolve<'a>(search_for: &str, keys: &'a [String]) -> Option<&'a str> {
    let mut candidates: Vec<&str> = keys.iter().map(String::as_str).collect();
    candidates.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    candidates
        .into_iter()
        .find(|key| matches_key(search_for, key))
}

fn matches_key(search_for: &str, key: &str) -> bool {
    match search_for.strip_prefix(key) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
