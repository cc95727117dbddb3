use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use bidfair_engine::db_types::Role;
use chrono::{Duration, Utc};
use futures::future::{err, ok, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    config::{AuthConfig, ACCESS_TOKEN_DAYS},
    errors::{AuthError, ServerError},
};

/// The claims carried by every access token. The role claim is mandatory; a token without it
/// never validates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: i64,
    pub role: Role,
    pub exp: i64,
}

/// Signs access tokens with the server's HS256 secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        Self { encoding_key }
    }

    /// Issue a new access token for the given account. The caller is responsible for having
    /// verified the account's identity first.
    pub fn issue_token(&self, account_id: i64, role: Role) -> Result<String, AuthError> {
        let exp = (Utc::now() + Duration::days(ACCESS_TOKEN_DAYS)).timestamp();
        let claims = JwtClaims { sub: account_id, role, exp };
        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::ValidationError(e.to_string()))?;
        Ok(token)
    }
}

/// Validates bearer tokens against the server's HS256 secret.
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
}

impl TokenValidator {
    pub fn new(config: &AuthConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        Self { decoding_key }
    }

    pub fn validate(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map_err(|e| AuthError::ValidationError(e.to_string()))?;
        debug!("🔐️ Token validated for {} #{}", data.claims.role, data.claims.sub);
        Ok(data.claims)
    }
}

/// Extracts the bearer token from the `Authorization` header, if any.
pub fn bearer_token(req: &HttpRequest) -> Result<String, AuthError> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .ok_or(AuthError::MissingToken)
}

/// The authenticated identity of the caller, as established by the JWT middleware. Handlers on
/// protected routes take this as an extractor; it is immutable once inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub account_id: i64,
    pub role: Role,
}

impl From<&JwtClaims> for AuthContext {
    fn from(claims: &JwtClaims) -> Self {
        Self { account_id: claims.sub, role: claims.role }
    }
}

impl FromRequest for AuthContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthContext>() {
            Some(ctx) => ok(*ctx),
            None => err(ServerError::from(AuthError::MissingToken).into()),
        }
    }
}
