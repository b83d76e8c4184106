//! Bearer-token authorization gate
//!
//! Resolves the caller's identity and role from an HS256 JWT carried in the
//! `Authorization: Bearer <token>` header.

use actix_web::HttpRequest;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::models::Role;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer credentials")]
    MissingCredentials,

    #[error("invalid authentication credentials")]
    InvalidToken,

    #[error("authentication token expired")]
    Expired,
}

/// Claims carried by session tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub role: Role,
    #[serde(default)]
    pub institution_id: Option<String>,
    pub exp: usize,
}

/// Identity resolved from a valid token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub role: Role,
    pub institution_id: Option<String>,
}

impl From<Claims> for Caller {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
            institution_id: claims.institution_id,
        }
    }
}

pub struct AuthGate {
    key: DecodingKey,
    validation: Validation,
}

impl AuthGate {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Resolve the caller behind a raw token
    pub fn authorize(&self, token: &str) -> Result<Caller, AuthError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| Caller::from(data.claims))
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken,
            })
    }

    /// Resolve the caller from a request's `Authorization` header
    pub fn authorize_request(&self, req: &HttpRequest) -> Result<Caller, AuthError> {
        let token = bearer_token(req).ok_or(AuthError::MissingCredentials)?;
        self.authorize(token)
    }
}

/// Extract the bearer token from the `Authorization` header
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
