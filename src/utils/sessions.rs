// taskflow-service/src/utils/sessions.rs
//
// Refresh-session manager. A session is one logged-in device: an opaque
// refresh token plus an absolute expiry. Validity requires both presence in
// the user's stored session set and an unexpired timestamp.
use crate::models::{ServiceError, Session, User};
use crate::utils::user_storage;
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;

const REFRESH_TOKEN_LEN: usize = 64;

// Opaque, high-entropy, carries no claims. Validity is established only by
// presence in a user's stored session set.
pub fn generate_refresh_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(REFRESH_TOKEN_LEN)
        .map(char::from)
        .collect()
}

// Absolute expiry timestamp for a new session
pub fn refresh_expiry(ttl_days: i64) -> i64 {
    let seconds_until_expire = ttl_days * 24 * 60 * 60;
    Utc::now().timestamp() + seconds_until_expire
}

// Pure comparison against current time; no state mutation
pub fn is_expired(expiry_epoch_secs: i64) -> bool {
    Utc::now().timestamp() > expiry_epoch_secs
}

// Issue a refresh token and durably append the session to the user's set.
// Appends never clobber concurrent sessions from other devices.
pub fn create_session(user_id: &str, ttl_days: i64) -> Result<String, ServiceError> {
    let token = generate_refresh_token();
    let session = Session {
        token: token.clone(),
        expiry_time: refresh_expiry(ttl_days),
    };

    user_storage::append_session(user_id, session)?;

    Ok(token)
}

// Look up the user and check the refresh token is present among the stored
// sessions (a literal match on the token value). Missing user and missing
// token are a single failure class.
pub fn find_session(user_id: &str, refresh_token: &str) -> Result<Option<User>, ServiceError> {
    let user = match user_storage::find_user_by_id(user_id)? {
        Some(user) => user,
        None => return Ok(None),
    };

    if user.sessions.iter().any(|s| s.token == refresh_token) {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

// Present AND unexpired. An existing-but-expired session is treated exactly
// like a missing one for authorization purposes.
pub fn session_is_valid(user: &User, refresh_token: &str) -> bool {
    user.sessions
        .iter()
        .any(|s| s.token == refresh_token && !is_expired(s.expiry_time))
}
