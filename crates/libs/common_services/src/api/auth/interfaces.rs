use serde::Deserialize;

/// The one authenticated-session type. Every handler and service that needs
/// to know who is calling takes this (or an `Option` of it) and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: String,
}

/// Claims we care about from the identity provider's tokens. Expiry is
/// checked by the decoder itself.
#[derive(Debug, Deserialize)]
pub struct AuthClaims {
    pub user_id: String,
}
