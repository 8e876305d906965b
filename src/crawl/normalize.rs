// src/crawl/normalize.rs
// =============================================================================
// URL helpers used as dedup keys and for domain attribution.
//
// normalize_url() turns the many spellings of one link into one key:
//   "HTTP://Example.com/Docs/?page=2#intro"  ->  "http://example.com/docs"
//
// It works on the raw string rather than a parsed Url so that it can never
// fail: garbage in still gives a deterministic key out.
// =============================================================================

use url::Url;

// Canonical dedup key for a link
//
// Steps:
// 1. drop the fragment (everything from the first '#')
// 2. drop the query (everything from the first '?')
// 3. trim trailing '/' from the path, but never eat the "//" after the scheme
// 4. lower-case the whole thing
pub fn normalize_url(url: &str) -> String {
    let without_fragment = url.split('#').next().unwrap_or_default();
    let without_query = without_fragment.split('?').next().unwrap_or_default();

    let path_start = path_offset(without_query);
    let (head, path) = without_query.split_at(path_start);
    let path = path.trim_end_matches('/');

    format!("{}{}", head, path).to_lowercase()
}

// Byte offset where the path component begins
//
// "http://a.com/x"  -> 12 (the '/' before x)
// "http://a.com"    -> 12 (end of string, empty path)
// "relative/path/"  -> 0  (no authority, the whole string is path)
fn path_offset(url: &str) -> usize {
    match url.find("://") {
        Some(scheme_end) => {
            let authority_start = scheme_end + 3;
            url[authority_start..]
                .find('/')
                .map(|i| authority_start + i)
                .unwrap_or(url.len())
        }
        None => 0,
    }
}

// Only http:// and https:// links are fetched or probed
pub fn is_http_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

// Host plus explicit port ("example.com", "127.0.0.1:8080")
//
// Returns an empty string when the URL can't be parsed or has no host.
pub fn netloc(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };

    match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}
