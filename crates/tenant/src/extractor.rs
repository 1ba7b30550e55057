// Tenant extractor
// Reads the hotel code from request headers and decides which paths skip resolution

use axum::http::HeaderMap;

/// Header carrying the hotel (tenant) code
pub const HOTEL_CODE_HEADER: &str = "x-hotel-code";

const EXEMPT_PREFIXES: &[&str] = &["/health", "/api/tenant", "/swagger"];

const STATIC_EXTENSIONS: &[&str] = &[
    "html", "htm", "css", "js", "map", "png", "jpg", "jpeg", "gif", "svg", "ico", "webp",
    "woff", "woff2", "ttf", "txt",
];

#[derive(Debug, Clone, Default)]
pub struct TenantExtractor;

impl TenantExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Hotel code from the request headers, trimmed. Blank values count as missing.
    pub fn extract_code(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(HOTEL_CODE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

/// Paths served without a tenant: root, health, tenant administration,
/// API docs and static files.
pub fn is_tenant_exempt(path: &str) -> bool {
    let path = path.to_ascii_lowercase();
    if path.is_empty() || path == "/" {
        return true;
    }

    let under_prefix = EXEMPT_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    });
    if under_prefix {
        return true;
    }

    let last_segment = path.rsplit('/').next().unwrap_or_default();
    last_segment
        .rsplit_once('.')
        .is_some_and(|(_, ext)| STATIC_EXTENSIONS.contains(&ext))
}
