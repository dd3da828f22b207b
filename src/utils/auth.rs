// taskflow-service/src/utils/auth.rs
//
// Authentication gate. Two independent checks, each a typed extractor so
// resolved identity is threaded explicitly into handlers instead of being
// stashed on mutable request state:
//
//  - AuthedUser: bearer access token, verified in memory, no store lookup.
//  - RenewedSession: refresh token + claimed user id, resolved against the
//    stored session set.
//
// A caller presents one or the other, never both in one call.
use crate::models::{ServiceError, User};
use crate::utils::jwt::{self, TokenKeys};
use crate::utils::sessions;
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use log::{debug, error};

// Caller identity resolved from a verified access token
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub user_id: String,
}

impl FromRequest for AuthedUser {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve_authed_user(req))
    }
}

fn resolve_authed_user(req: &HttpRequest) -> Result<AuthedUser, ServiceError> {
    let keys = req
        .app_data::<web::Data<TokenKeys>>()
        .ok_or_else(|| {
            error!("TokenKeys not configured on the app");
            ServiceError::InternalServerError
        })?;

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(ServiceError::MissingToken)?
        .to_str()
        .map_err(|_| ServiceError::InvalidOrExpiredToken)?;

    let token = jwt::extract_token_from_header(auth_header)?;
    let user_id = keys.verify_access_token(&token)?;

    debug!("Authenticated request for user: {}", user_id);

    Ok(AuthedUser { user_id })
}

// Renewed session resolved from a refresh token + claimed user id pair
#[derive(Debug, Clone)]
pub struct RenewedSession {
    pub user: User,
    pub user_id: String,
    pub refresh_token: String,
}

impl FromRequest for RenewedSession {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve_renewed_session(req))
    }
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

fn resolve_renewed_session(req: &HttpRequest) -> Result<RenewedSession, ServiceError> {
    let refresh_token = header_value(req, "x-refresh-token");
    // The SPA historically sent the raw `_id` header; keep accepting it
    let user_id = header_value(req, "x-user-id").or_else(|| header_value(req, "_id"));

    let (refresh_token, user_id) = match (refresh_token, user_id) {
        (Some(token), Some(id)) => (token, id),
        _ => {
            return Err(ServiceError::MissingCredentials(
                "Refresh token and user ID".to_string(),
            ))
        }
    };

    let user = sessions::find_session(&user_id, &refresh_token)?
        .ok_or(ServiceError::SessionInvalid)?;

    if !sessions::session_is_valid(&user, &refresh_token) {
        return Err(ServiceError::SessionInvalid);
    }

    debug!("Session renewed for user: {}", user_id);

    Ok(RenewedSession {
        user,
        user_id,
        refresh_token,
    })
}
