use crate::api_state::ApiContext;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};
use color_eyre::eyre::eyre;
use common_services::api::auth::error::AuthError;
use common_services::api::auth::interfaces::AuthSession;

/// A handler argument requiring a valid bearer token.
#[derive(Clone, Debug)]
pub struct ApiUser(pub AuthSession);

/// A handler argument for routes that work with or without a caller
/// identity. A present-but-invalid token is still rejected.
#[derive(Clone, Debug)]
pub struct OptionalUser(pub Option<AuthSession>);

async fn extract_context<S>(parts: &mut Parts, state: &S) -> Result<ApiContext, AuthError>
where
    S: Send + Sync,
    State<ApiContext>: FromRequestParts<S>,
{
    let State(context) = State::<ApiContext>::from_request_parts(parts, state)
        .await
        .map_err(|_| AuthError::Internal(eyre!("Server state is not configured correctly.")))?;
    Ok(context)
}

/// Get the bearer token from the request headers.
fn extract_token(parts: &Parts) -> Result<String, AuthError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    auth_header
        .strip_prefix("Bearer ")
        .map(ToOwned::to_owned)
        .ok_or(AuthError::InvalidToken)
}

impl<S> FromRequestParts<S> for ApiUser
where
    S: Send + Sync,
    State<ApiContext>: FromRequestParts<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;
        let context = extract_context(parts, state).await?;
        let session = context.verifier.verify(&token).await?;
        Ok(Self(session))
    }
}

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
    State<ApiContext>: FromRequestParts<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match extract_token(parts) {
            Ok(token) => {
                let context = extract_context(parts, state).await?;
                let session = context.verifier.verify(&token).await?;
                Ok(Self(Some(session)))
            }
            Err(AuthError::MissingToken) => Ok(Self(None)),
            Err(e) => Err(e),
        }
    }
}
