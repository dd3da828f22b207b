//! Server configuration
//! All environment reads happen here, once, at construction time.

use std::env;

pub const DEFAULT_REFRESH_TTL_DAYS: i64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    /// Secret for access-token signing/verification
    pub jwt_secret: String,
    /// Refresh session lifetime in days
    pub refresh_ttl_days: i64,
    /// Base URL of the external AI scheduling service
    pub scheduler_url: String,
    /// Resend API key; email sending is skipped (and logged) when absent
    pub resend_api_key: Option<String>,
    pub resend_from: String,
    /// Google OAuth client id for federated sign-in
    pub google_client_id: Option<String>,
    /// Allowed SPA origin for CORS
    pub cors_origin: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let refresh_ttl_days = env::var("REFRESH_EXPIRY_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_REFRESH_TTL_DAYS);

        Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:3000".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "taskflow_super_secret_key".to_string()),
            refresh_ttl_days,
            scheduler_url: env::var("SCHEDULER_URL")
                .unwrap_or_else(|_| "http://localhost:5001".to_string()),
            resend_api_key: env::var("RESEND_API_KEY").ok(),
            resend_from: env::var("RESEND_FROM")
                .unwrap_or_else(|_| "noreply@taskflow.local".to_string()),
            google_client_id: env::var("GOOGLE_CLIENT_ID").ok(),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:4200".to_string()),
        }
    }

    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            bind_address: "127.0.0.1:0".to_string(),
            jwt_secret: "test_secret".to_string(),
            refresh_ttl_days: DEFAULT_REFRESH_TTL_DAYS,
            scheduler_url: "http://localhost:5001".to_string(),
            resend_api_key: None,
            resend_from: "noreply@taskflow.local".to_string(),
            google_client_id: None,
            cors_origin: "http://localhost:4200".to_string(),
        }
    }
}
