//! Anonymous voter identity carried in the `voter_token` cookie.

use std::sync::LazyLock;

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use regex::Regex;
use tracing::debug;

pub const VOTER_COOKIE: &str = "voter_token";

/// Static regex for well-formed voter tokens (compiled once on first use)
#[expect(
    clippy::expect_used,
    reason = "Regex literal is compile-time constant and cannot fail"
)]
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("TOKEN_RE is a valid regex literal")
});

/// The voter identity resolved for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoterToken(pub String);

impl VoterToken {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[must_use]
pub fn is_valid_token(token: &str) -> bool {
    TOKEN_RE.is_match(token)
}

/// Pull a well-formed `voter_token` out of the request's Cookie headers.
fn token_from_request(req: &Request) -> Option<String> {
    req.headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == VOTER_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| is_valid_token(value))
}

/// Attach a [`VoterToken`] to every request, minting one when the cookie is
/// missing or malformed and returning it via `Set-Cookie`.
pub async fn voter_middleware(mut req: Request, next: Next) -> Response {
    let (token, minted) = token_from_request(&req).map_or_else(
        || (uuid::Uuid::new_v4().simple().to_string(), true),
        |token| (token, false),
    );
    req.extensions_mut().insert(VoterToken(token.clone()));

    let mut response = next.run(req).await;
    if minted {
        debug!("Issued new voter token");
        let cookie = format!("{VOTER_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}
