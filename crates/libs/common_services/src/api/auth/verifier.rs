use crate::api::auth::error::AuthError;
use crate::api::auth::interfaces::{AuthClaims, AuthSession};
use color_eyre::eyre::{Result, WrapErr, eyre};
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{DecodingKey, Validation, decode, decode_header};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Verifies bearer tokens against the identity provider's published key set.
///
/// The key set is fetched from the configured URL and cached; any failure to
/// fetch, parse, match a key id, or verify a signature rejects the token.
#[derive(Clone)]
pub struct TokenVerifier {
    client: reqwest::Client,
    jwks_url: String,
    key_sets: Cache<String, Arc<JwkSet>>,
}

impl TokenVerifier {
    #[must_use]
    pub fn new(client: reqwest::Client, jwks_url: String, cache_ttl: Duration) -> Self {
        let key_sets = Cache::builder()
            .max_capacity(1)
            .time_to_live(cache_ttl)
            .build();
        Self {
            client,
            jwks_url,
            key_sets,
        }
    }

    async fn fetch_key_set(&self) -> Result<Arc<JwkSet>> {
        debug!("Fetching JWKS from {}", self.jwks_url);
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .wrap_err("Failed to fetch key set")?
            .error_for_status()
            .wrap_err("Key set endpoint returned an error status")?;
        let key_set: JwkSet = response
            .json()
            .await
            .wrap_err("Failed to parse key set body")?;
        Ok(Arc::new(key_set))
    }

    async fn key_set(&self) -> Result<Arc<JwkSet>, AuthError> {
        self.key_sets
            .try_get_with(self.jwks_url.clone(), self.fetch_key_set())
            .await
            .map_err(|e| {
                warn!("Could not load key set: {e:?}");
                AuthError::KeySetUnavailable
            })
    }

    /// Validate a bearer token and extract the caller's identity.
    #[instrument(skip_all)]
    pub async fn verify(&self, token: &str) -> Result<AuthSession, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::InvalidToken)?;
        let kid = header.kid.ok_or(AuthError::InvalidToken)?;

        let key_set = self.key_set().await?;
        let jwk = key_set.find(&kid).ok_or(AuthError::KeySetUnavailable)?;
        let decoding_key = DecodingKey::from_jwk(jwk).map_err(|e| {
            AuthError::Internal(eyre!("Key set contained an unusable key: {e}"))
        })?;

        let mut validation = Validation::new(header.alg);
        // Tokens are issued for the web app's own audience; we only care that
        // the signature and expiry hold and the user id is present.
        validation.validate_aud = false;

        let data = decode::<AuthClaims>(token, &decoding_key, &validation)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthSession {
            user_id: data.claims.user_id,
        })
    }
}
