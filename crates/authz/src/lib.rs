//! Identity verification for incoming requests.
//!
//! Callers present a Google ID token in the `Authorization` header. The
//! [`TokenVerifier`] port turns it into a verified [`Identity`]; an invalid
//! token yields `Ok(None)`, while failing to reach the verifier is an error.

use std::convert::Infallible;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use redude_kernel::settings::GoogleSettings;
use serde::Deserialize;

/// Identity claims of a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Subject of the token, the stable Google account id.
    pub google_id: String,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub picture_url: String,
}

/// Failures reaching or decoding the verification service.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("token verification request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("token verification answered with status {status}")]
    Upstream { status: u16 },
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify `token`, returning the identity it carries or `None` when the
    /// token is not acceptable.
    async fn verify(&self, token: &str) -> Result<Option<Identity>, VerifyError>;
}

/// Verify the bearer token of a request.
///
/// Missing tokens, rejected tokens and verifier failures all yield `None`;
/// failures are logged.
pub async fn verify_bearer(verifier: &dyn TokenVerifier, token: &BearerToken) -> Option<Identity> {
    let token = token.as_deref()?;
    match verifier.verify(token).await {
        Ok(identity) => identity,
        Err(err) => {
            tracing::warn!(target: "redude::authz", error = %err, "token verification failed");
            None
        }
    }
}

/// Claims returned by Google's `tokeninfo` endpoint.
#[derive(Debug, Deserialize)]
struct TokenInfo {
    sub: String,
    #[serde(default)]
    aud: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    family_name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

impl TokenInfo {
    fn into_identity(self, expected_audience: Option<&str>) -> Option<Identity> {
        if let Some(expected) = expected_audience {
            if self.aud.as_deref() != Some(expected) {
                tracing::warn!(
                    target: "redude::authz",
                    audience = ?self.aud,
                    "token issued for another client"
                );
                return None;
            }
        }

        if self.sub.trim().is_empty() {
            return None;
        }

        Some(Identity {
            google_id: self.sub,
            name: self.given_name.unwrap_or_default(),
            lastname: self.family_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            picture_url: self.picture.unwrap_or_default(),
        })
    }
}

/// Verifier backed by Google's `tokeninfo` endpoint.
pub struct GoogleTokenVerifier {
    client: reqwest::Client,
    endpoint: String,
    client_id: Option<String>,
}

impl GoogleTokenVerifier {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: impl Into<String>,
        client_id: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            client_id,
        })
    }

    pub fn from_settings(settings: &GoogleSettings) -> Result<Self, reqwest::Error> {
        Self::new(
            settings.tokeninfo_endpoint.clone(),
            settings.client_id.clone(),
            Duration::from_millis(settings.timeout_ms),
        )
    }
}

#[async_trait]
impl TokenVerifier for GoogleTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Option<Identity>, VerifyError> {
        if token.trim().is_empty() {
            return Ok(None);
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("id_token", token)])
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() {
            return Err(VerifyError::Upstream {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            tracing::debug!(target: "redude::authz", status = status.as_u16(), "token rejected");
            return Ok(None);
        }

        let info: TokenInfo = response.json().await?;
        Ok(info.into_identity(self.client_id.as_deref()))
    }
}

/// Raw token from the `Authorization` header, with any `Bearer ` prefix
/// stripped. Missing or blank headers extract as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub Option<String>);

impl BearerToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

fn parse_authorization(value: &str) -> Option<String> {
    let value = value.trim_start();
    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest,
        _ if value.trim_end().eq_ignore_ascii_case("bearer") => "",
        _ => value,
    }
    .trim();
    (!token.is_empty()).then(|| token.to_string())
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_authorization);
        Ok(BearerToken(token))
    }
}
