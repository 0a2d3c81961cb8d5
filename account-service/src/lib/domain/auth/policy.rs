//! Route-exclusion policy.

/// Decide whether a request path requires authentication.
///
/// Pure function, no state. A path is excluded when it exactly matches an
/// entry (insensitive to a trailing slash on either side) or when it matches
/// an entry ending in `'*'` as a prefix. An empty exclusion list requires
/// authentication everywhere.
pub fn requires_auth(path: &str, excluded_paths: &[String]) -> bool {
    for pattern in excluded_paths {
        if let Some(prefix) = pattern.strip_suffix('*') {
            if path.starts_with(prefix) {
                return false;
            }
        } else if path.trim_end_matches('/') == pattern.trim_end_matches('/') {
            return false;
        }
    }
    true
}
