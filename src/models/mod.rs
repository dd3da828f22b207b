// taskflow-service/src/models/mod.rs
use actix_web::{HttpResponse, ResponseError};
use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub mod team;
pub use team::*;

pub mod list;
pub use list::*;

// One logged-in device: opaque refresh token plus absolute expiry in epoch seconds
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub expiry_time: i64,
}

// User account. password_hash is absent for federated (Google) accounts.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

// User models for authentication
#[derive(Serialize, Deserialize, Debug)]
pub struct UserCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct GoogleSignInRequest {
    pub credential: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub id: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

// JWT claims structure for access tokens
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub exp: usize,  // Expiration time
    pub iat: usize,  // Issued at
}

// Custom error types
#[derive(Debug, Display)]
pub enum ServiceError {
    #[display(fmt = "Internal Server Error")]
    InternalServerError,
    #[display(fmt = "BadRequest: {}", _0)]
    BadRequest(String),
    #[display(fmt = "{} required", _0)]
    MissingCredentials(String),
    #[display(fmt = "Authorization token missing")]
    MissingToken,
    #[display(fmt = "Invalid or expired token")]
    InvalidOrExpiredToken,
    #[display(fmt = "Refresh token has expired or the session is invalid")]
    SessionInvalid,
    #[display(fmt = "Team not found")]
    TeamNotFound,
    #[display(fmt = "Insufficient permissions")]
    InsufficientPermissions,
    #[display(fmt = "Not Found")]
    NotFound,
    #[display(fmt = "Conflict: {}", _0)]
    Conflict(String),
    #[display(fmt = "{} service failed", _0)]
    UpstreamFailure(String),
}

impl std::error::Error for ServiceError {}

// Implement ResponseError for ServiceError
impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({ "error": self.to_string() });

        match self {
            ServiceError::InternalServerError => HttpResponse::InternalServerError().json(body),
            ServiceError::BadRequest(_) => HttpResponse::BadRequest().json(body),
            ServiceError::MissingCredentials(_) => HttpResponse::BadRequest().json(body),
            ServiceError::MissingToken => HttpResponse::Unauthorized().json(body),
            ServiceError::InvalidOrExpiredToken => HttpResponse::Unauthorized().json(body),
            ServiceError::SessionInvalid => HttpResponse::Unauthorized().json(body),
            ServiceError::TeamNotFound => HttpResponse::NotFound().json(body),
            ServiceError::InsufficientPermissions => HttpResponse::Forbidden().json(body),
            ServiceError::NotFound => HttpResponse::NotFound().json(body),
            ServiceError::Conflict(_) => HttpResponse::Conflict().json(body),
            ServiceError::UpstreamFailure(_) => HttpResponse::BadGateway().json(body),
        }
    }
}
