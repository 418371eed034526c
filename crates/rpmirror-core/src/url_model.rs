//! URL helpers for building package locations from a repository base URL.

/// Joins URL segments so exactly one `/` separates each pair.
///
/// Empty segments are skipped. The first non-empty segment is kept verbatim,
/// and later segments only have their leading slashes trimmed, so a trailing
/// slash on the last segment survives.
///
/// # Examples
///
/// - `url_join(&["https://mirror.example/repo/", "/Packages", "a.rpm"])` → `"https://mirror.example/repo/Packages/a.rpm"`
pub fn url_join(segments: &[&str]) -> String {
    let mut url = String::new();
    for s in segments {
        if url.is_empty() {
            url = s.to_string();
        } else if !s.is_empty() {
            url = format!("{}/{}", url.trim_end_matches('/'), s.trim_start_matches('/'));
        }
    }
    url
}
