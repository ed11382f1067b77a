use axum::http::HeaderMap;

/// Header carrying the shared secret configured in the CMS webhook.
pub const RELAY_SECRET_HEADER: &str = "x-relay-secret";

#[derive(Clone)]
pub struct Authenticator {
    secret: String,
}

impl Authenticator {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Exact, case-sensitive match. A missing or non-UTF-8 header never
    /// authorizes.
    pub fn is_authorized(&self, headers: &HeaderMap) -> bool {
        headers
            .get(RELAY_SECRET_HEADER)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|presented| presented == self.secret)
    }
}
