use http::{header::CONTENT_TYPE, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

pub const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost,https://localhost,http://127.0.0.1,https://127.0.0.1";

/// Build a CORS layer for the item API with the given allowed origins.
///
/// An origin is allowed when it equals one of the configured entries, or an
/// entry followed by an explicit port (`http://localhost:5173`).
/// Pass "*" in the origins list to allow all origins (not recommended for production).
#[must_use]
pub fn build_cors_layer(cors_origins: Vec<String>) -> CorsLayer {
    let allow_all_origins = cors_origins.iter().any(|o| o == "*");

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            if allow_all_origins {
                return true;
            }
            origin.to_str().is_ok_and(|origin_str| {
                cors_origins
                    .iter()
                    .any(|allowed| origin_matches(origin_str, allowed))
            })
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
}

/// Match an origin exactly, allowing only a numeric port after the entry.
fn origin_matches(origin: &str, allowed: &str) -> bool {
    origin.strip_prefix(allowed).is_some_and(|rest| {
        rest.is_empty()
            || rest
                .strip_prefix(':')
                .is_some_and(|port| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()))
    })
}

/// Normalize a raw origin list: trim entries and drop empty ones.
#[must_use]
pub fn clean_origins(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
