//! Access tokens.
//!
//! Access tokens are HS256-signed JWTs carrying the user id and e-mail address. They are issued by [`TokenIssuer`] on
//! login and presented as `Authorization: Bearer <token>` on every protected route. Handlers receive the validated
//! claims simply by taking a [`JwtClaims`] argument.
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use chrono::Duration;
use futures::future::{ready, Ready};
use jwt_compact::{
    alg::{Hs256, Hs256Key},
    AlgorithmExt,
    Claims,
    Header,
    TimeOptions,
    UntrustedToken,
};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    #[serde(rename = "sub")]
    pub user_id: i64,
    pub email: String,
}

impl JwtClaims {
    pub fn new(user_id: i64, email: &str) -> Self {
        Self { user_id, email: email.to_string() }
    }
}

pub struct TokenIssuer {
    key: Hs256Key,
    lifetime: Duration,
    time_options: TimeOptions,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let key = Hs256Key::new(config.jwt_secret.reveal().as_bytes());
        Self { key, lifetime: config.access_token_expiry, time_options: TimeOptions::default() }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn issue_token(&self, claims: JwtClaims) -> Result<String, ServerError> {
        self.issue_token_with_lifetime(claims, self.lifetime)
    }

    /// Issues a token that expires `lifetime` from now.
    pub fn issue_token_with_lifetime(&self, claims: JwtClaims, lifetime: Duration) -> Result<String, ServerError> {
        let header = Header::empty().with_token_type("JWT");
        let claims = Claims::new(claims).set_duration_and_issuance(&self.time_options, lifetime);
        Hs256.token(&header, &claims, &self.key).map_err(|e| ServerError::CouldNotIssueAccessToken(e.to_string()))
    }

    /// Checks the token's signature and expiry, returning the claims it carries.
    pub fn validate(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let untrusted = UntrustedToken::new(token).map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
        let token = Hs256
            .validator::<JwtClaims>(&self.key)
            .validate(&untrusted)
            .map_err(|e| AuthError::ValidationError(e.to_string()))?;
        token.claims().validate_expiration(&self.time_options).map_err(|e| AuthError::ValidationError(e.to_string()))?;
        Ok(token.claims().custom.clone())
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req.headers().get(header::AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let value = value.to_str().map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .ok_or_else(|| AuthError::PoorlyFormattedToken("Expected a bearer token".to_string()))
}

fn extract_claims(req: &HttpRequest) -> Result<JwtClaims, ServerError> {
    let issuer = req.app_data::<web::Data<TokenIssuer>>().ok_or_else(|| {
        error!("🔐️ No token issuer has been configured for this server. Protected routes will not work.");
        ServerError::ConfigurationError("No token issuer configured".to_string())
    })?;
    let token = bearer_token(req)?;
    let claims = issuer.validate(token).map_err(|e| {
        debug!("🔐️ Rejected access token for {}. {e}", req.path());
        e
    })?;
    trace!("🔐️ Access token for user #{} accepted", claims.user_id);
    Ok(claims)
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_claims(req))
    }
}
