//! Authentication module
//!
//! Verifies bearer tokens issued by the external auth service.

mod jwt;

pub use jwt::{generate_token, verify_token, Claims, JwtError, Role};

/// Settings needed to verify access tokens
#[derive(Debug, Clone)]
pub struct AuthSettings {
    jwt_secret: String,
}

impl AuthSettings {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}
