use crate::config::AppConfig;
use crate::models::{GoogleSignInRequest, LoginResponse, ServiceError, User, UserCredentials};
use crate::services::GoogleVerifier;
use crate::utils::jwt::TokenKeys;
use crate::utils::{password, sessions, user_storage, AuthedUser, RenewedSession};
use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;
use lazy_static::lazy_static;
use log::{error, info};
use rand::distributions::Alphanumeric;
use rand::Rng;
use regex::Regex;
use serde_json::json;
use uuid::Uuid;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

const MIN_PASSWORD_LEN: usize = 8;

fn validate_credentials(credentials: &UserCredentials) -> Result<(), ServiceError> {
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(ServiceError::MissingCredentials(
            "Email and password".to_string(),
        ));
    }

    if !EMAIL_RE.is_match(credentials.email.trim()) {
        return Err(ServiceError::BadRequest("Invalid email address".to_string()));
    }

    if credentials.password.len() < MIN_PASSWORD_LEN {
        return Err(ServiceError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    Ok(())
}

fn sanitized_user(user: &User) -> serde_json::Value {
    json!({
        "id": user.id,
        "email": user.email,
        "display_name": user.display_name,
        "created_at": user.created_at.timestamp(),
    })
}

// Sign up a new user
#[post("/users")]
async fn signup(
    credentials: web::Json<UserCredentials>,
    keys: web::Data<TokenKeys>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ServiceError> {
    info!("📝 Signup request for email: {}", credentials.email);

    validate_credentials(&credentials)?;

    // Check if the email already exists
    if user_storage::find_user_by_email(&credentials.email)?.is_some() {
        error!("❌ Email already registered: {}", credentials.email);
        return Err(ServiceError::BadRequest("Email already exists".to_string()));
    }

    // Create a new user
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: credentials.email.trim().to_string(),
        password_hash: Some(password::hash_password(&credentials.password)?),
        display_name: None,
        google_sub: None,
        api_key: None,
        sessions: Vec::new(),
        created_at: Utc::now(),
    };

    user_storage::save_user(&user)?;

    // Open the first session and issue an access token
    let refresh_token = sessions::create_session(&user.id, config.refresh_ttl_days)?;
    let access_token = keys.issue_access_token(&user.id)?;

    info!("✅ User registered successfully: {}", user.id);

    Ok(HttpResponse::Ok()
        .append_header(("x-access-token", access_token))
        .append_header(("x-refresh-token", refresh_token))
        .json(sanitized_user(&user)))
}

// Login with email and password
#[post("/users/login")]
async fn login(
    credentials: web::Json<UserCredentials>,
    keys: web::Data<TokenKeys>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ServiceError> {
    info!("🔑 Login request for email: {}", credentials.email);

    let user = user_storage::find_user_by_email(&credentials.email)?
        .ok_or_else(|| ServiceError::BadRequest("Invalid email or password".to_string()))?;

    // Federated accounts carry no password hash
    let password_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| ServiceError::BadRequest("Invalid email or password".to_string()))?;

    if !password::verify_password(&credentials.password, password_hash)? {
        error!("❌ Invalid password for user: {}", credentials.email);
        return Err(ServiceError::BadRequest(
            "Invalid email or password".to_string(),
        ));
    }

    let refresh_token = sessions::create_session(&user.id, config.refresh_ttl_days)?;
    let access_token = keys.issue_access_token(&user.id)?;

    info!("✅ User logged in successfully: {}", user.id);

    let response = LoginResponse {
        id: user.id,
        email: user.email,
        access_token: access_token.clone(),
        refresh_token: refresh_token.clone(),
    };

    Ok(HttpResponse::Ok()
        .append_header(("x-access-token", access_token))
        .append_header(("x-refresh-token", refresh_token))
        .json(response))
}

// Exchange a valid refresh session for a fresh access token
#[get("/users/me/access-token")]
async fn renew_access_token(
    session: RenewedSession,
    keys: web::Data<TokenKeys>,
) -> Result<HttpResponse, ServiceError> {
    info!("🔄 Access token renewal for user: {}", session.user_id);

    let access_token = keys.issue_access_token(&session.user_id)?;

    Ok(HttpResponse::Ok()
        .append_header(("x-access-token", access_token.clone()))
        .json(json!({ "access_token": access_token })))
}

// Generate and persist an API key for the session's user
#[get("/users/me/api-key")]
async fn generate_api_key(session: RenewedSession) -> Result<HttpResponse, ServiceError> {
    info!("🔑 API key request for user: {}", session.user_id);

    let api_key: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();

    user_storage::set_api_key(&session.user_id, &api_key)?;

    Ok(HttpResponse::Ok()
        .append_header(("x-api-key", api_key.clone()))
        .json(json!({ "api_key": api_key })))
}

// Sign in with a Google credential; the account is created on first use
#[post("/users/google-signin")]
async fn google_signin(
    request: web::Json<GoogleSignInRequest>,
    verifier: web::Data<GoogleVerifier>,
    keys: web::Data<TokenKeys>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ServiceError> {
    if request.credential.trim().is_empty() {
        return Err(ServiceError::MissingCredentials(
            "Google credential".to_string(),
        ));
    }

    let info = verifier.verify_credential(&request.credential).await?;

    let email = info
        .email
        .ok_or_else(|| ServiceError::BadRequest("Invalid Google credential".to_string()))?;

    info!("🔑 Google sign-in for email: {}", email);

    let user = match user_storage::find_user_by_email(&email)? {
        Some(user) => user,
        None => {
            let user = User {
                id: Uuid::new_v4().to_string(),
                email: email.clone(),
                password_hash: None,
                display_name: info.name,
                google_sub: Some(info.sub),
                api_key: None,
                sessions: Vec::new(),
                created_at: Utc::now(),
            };
            user_storage::save_user(&user)?;
            info!("✅ Federated user created: {}", user.id);
            user
        }
    };

    let refresh_token = sessions::create_session(&user.id, config.refresh_ttl_days)?;
    let access_token = keys.issue_access_token(&user.id)?;

    let response = LoginResponse {
        id: user.id,
        email: user.email,
        access_token: access_token.clone(),
        refresh_token: refresh_token.clone(),
    };

    Ok(HttpResponse::Ok()
        .append_header(("x-access-token", access_token))
        .append_header(("x-refresh-token", refresh_token))
        .json(response))
}

// Get current user info (requires authentication)
#[get("/users/me")]
async fn me(auth: AuthedUser) -> Result<HttpResponse, ServiceError> {
    let user = match user_storage::find_user_by_id(&auth.user_id)? {
        Some(user) => user,
        None => {
            error!("❌ Authenticated user not found: {}", auth.user_id);
            return Err(ServiceError::NotFound);
        }
    };

    Ok(HttpResponse::Ok().json(sanitized_user(&user)))
}

// Register all user routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(signup)
        .service(login)
        .service(renew_access_token)
        .service(generate_api_key)
        .service(google_signin)
        .service(me);
}
