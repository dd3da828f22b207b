// Shared helpers for the test suite
use crate::config::AppConfig;
use crate::models::User;
use crate::services::Mailer;
use crate::utils::jwt::TokenKeys;
use crate::utils::user_storage;
use actix_web::web;
use chrono::Utc;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test_secret";

pub fn test_keys() -> web::Data<TokenKeys> {
    web::Data::new(TokenKeys::new(TEST_SECRET))
}

pub fn test_config() -> web::Data<AppConfig> {
    web::Data::new(AppConfig::for_testing())
}

// Mailer without an API key: sends are skipped and logged, which keeps the
// kick flow exercisable without a network
pub fn test_mailer() -> web::Data<Mailer> {
    web::Data::new(Mailer::new(None, "noreply@taskflow.local".to_string()))
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4())
}

// Create a user document directly in storage
pub fn make_user(prefix: &str) -> User {
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: unique_email(prefix),
        password_hash: None,
        display_name: None,
        google_sub: None,
        api_key: None,
        sessions: Vec::new(),
        created_at: Utc::now(),
    };
    user_storage::save_user(&user).unwrap();
    user
}

// Bearer header value for a user, signed with the test secret
pub fn bearer(user_id: &str) -> String {
    let token = TokenKeys::new(TEST_SECRET)
        .issue_access_token(user_id)
        .unwrap();
    format!("Bearer {}", token)
}
