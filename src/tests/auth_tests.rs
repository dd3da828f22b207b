use super::common;
use crate::models::{Claims, ServiceError, Session};
use crate::routes::user_routes;
use crate::utils::jwt::TokenKeys;
use crate::utils::{sessions, user_storage};
use actix_web::http::StatusCode;
use actix_web::{test, App};
use chrono::Utc;
use serde_json::json;

#[::core::prelude::v1::test]
fn access_token_round_trip() {
    let keys = TokenKeys::new(common::TEST_SECRET);

    let token = keys.issue_access_token("user-1").unwrap();
    let resolved = keys.verify_access_token(&token).unwrap();

    assert_eq!(resolved, "user-1");
}

#[::core::prelude::v1::test]
fn bad_and_expired_tokens_surface_as_one_class() {
    let keys = TokenKeys::new(common::TEST_SECRET);

    // Tampered signature
    let mut tampered = keys.issue_access_token("user-1").unwrap();
    tampered.push('x');
    assert!(matches!(
        keys.verify_access_token(&tampered),
        Err(ServiceError::InvalidOrExpiredToken)
    ));

    // Malformed payload
    assert!(matches!(
        keys.verify_access_token("not-a-jwt"),
        Err(ServiceError::InvalidOrExpiredToken)
    ));

    // Expired (well past the default validation leeway)
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: "user-1".to_string(),
        exp: now - 3600,
        iat: now - 7200,
    };
    let expired = keys.sign_claims(&claims).unwrap();
    assert!(matches!(
        keys.verify_access_token(&expired),
        Err(ServiceError::InvalidOrExpiredToken)
    ));

    // Signed under a different secret
    let other_keys = TokenKeys::new("some_other_secret");
    let foreign = other_keys.issue_access_token("user-1").unwrap();
    assert!(matches!(
        keys.verify_access_token(&foreign),
        Err(ServiceError::InvalidOrExpiredToken)
    ));
}

#[::core::prelude::v1::test]
fn session_validity_across_expiry_boundary() {
    let now = Utc::now().timestamp();

    assert!(!sessions::is_expired(now + 1));
    assert!(sessions::is_expired(now - 1));
}

#[::core::prelude::v1::test]
fn refresh_tokens_are_long_and_distinct() {
    let a = sessions::generate_refresh_token();
    let b = sessions::generate_refresh_token();

    assert_eq!(a.len(), 64);
    assert_ne!(a, b);
}

#[::core::prelude::v1::test]
fn create_and_find_session() {
    let user = common::make_user("sess");

    let token = sessions::create_session(&user.id, 10).unwrap();

    let found = sessions::find_session(&user.id, &token)
        .unwrap()
        .expect("session should be found");
    assert!(sessions::session_is_valid(&found, &token));

    // Missing token and missing user are one failure class
    assert!(sessions::find_session(&user.id, "missing-token")
        .unwrap()
        .is_none());
    assert!(sessions::find_session("missing-user", &token)
        .unwrap()
        .is_none());
}

#[::core::prelude::v1::test]
fn expired_session_is_treated_as_missing() {
    let user = common::make_user("expired");

    let token = sessions::generate_refresh_token();
    user_storage::append_session(
        &user.id,
        Session {
            token: token.clone(),
            expiry_time: Utc::now().timestamp() - 10,
        },
    )
    .unwrap();

    // Present in the stored set, but invalid for authorization purposes
    let found = sessions::find_session(&user.id, &token).unwrap().unwrap();
    assert!(!sessions::session_is_valid(&found, &token));
}

#[::core::prelude::v1::test]
fn concurrent_session_creation_keeps_both() {
    let user = common::make_user("concurrent");

    let id1 = user.id.clone();
    let id2 = user.id.clone();
    let t1 = std::thread::spawn(move || sessions::create_session(&id1, 10).unwrap());
    let t2 = std::thread::spawn(move || sessions::create_session(&id2, 10).unwrap());
    let token1 = t1.join().unwrap();
    let token2 = t2.join().unwrap();

    let stored = user_storage::find_user_by_id(&user.id).unwrap().unwrap();
    assert_ne!(token1, token2);
    assert!(stored.sessions.iter().any(|s| s.token == token1));
    assert!(stored.sessions.iter().any(|s| s.token == token2));
}

#[actix_rt::test]
async fn signup_login_then_authenticated_fetch() {
    let app = test::init_service(
        App::new()
            .app_data(common::test_keys())
            .app_data(common::test_config())
            .configure(user_routes::init_routes),
    )
    .await;

    let email = common::unique_email("scenario1");

    // Sign up
    let request = test::TestRequest::post()
        .uri("/users")
        .set_json(&json!({ "email": email, "password": "pw12345678" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-access-token").is_some());
    assert!(response.headers().get("x-refresh-token").is_some());

    // Login
    let request = test::TestRequest::post()
        .uri("/users/login")
        .set_json(&json!({ "email": email, "password": "pw12345678" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let access_token = response
        .headers()
        .get("x-access-token")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["email"].as_str(), Some(email.as_str()));

    // Authenticated fetch with the issued access token
    let request = test::TestRequest::get()
        .uri("/users/me")
        .insert_header(("Authorization", format!("Bearer {}", access_token)))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["email"].as_str(), Some(email.as_str()));
}

#[actix_rt::test]
async fn missing_bearer_token_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(common::test_keys())
            .app_data(common::test_config())
            .configure(user_routes::init_routes),
    )
    .await;

    let request = test::TestRequest::get().uri("/users/me").to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn duplicate_signup_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(common::test_keys())
            .app_data(common::test_config())
            .configure(user_routes::init_routes),
    )
    .await;

    let email = common::unique_email("dup");
    let payload = json!({ "email": email, "password": "pw12345678" });

    let request = test::TestRequest::post()
        .uri("/users")
        .set_json(&payload)
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let request = test::TestRequest::post()
        .uri("/users")
        .set_json(&payload)
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn refresh_flow_issues_usable_access_token() {
    let app = test::init_service(
        App::new()
            .app_data(common::test_keys())
            .app_data(common::test_config())
            .configure(user_routes::init_routes),
    )
    .await;

    let email = common::unique_email("refresh");
    let request = test::TestRequest::post()
        .uri("/users")
        .set_json(&json!({ "email": email, "password": "pw12345678" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let refresh_token = response
        .headers()
        .get("x-refresh-token")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let body: serde_json::Value = test::read_body_json(response).await;
    let user_id = body["id"].as_str().unwrap().to_string();

    // Exchange the refresh session for a new access token
    let request = test::TestRequest::get()
        .uri("/users/me/access-token")
        .insert_header(("x-refresh-token", refresh_token.clone()))
        .insert_header(("x-user-id", user_id.clone()))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(response).await;
    let access_token = body["access_token"].as_str().unwrap().to_string();

    let request = test::TestRequest::get()
        .uri("/users/me")
        .insert_header(("Authorization", format!("Bearer {}", access_token)))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn refresh_token_of_another_user_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(common::test_keys())
            .app_data(common::test_config())
            .configure(user_routes::init_routes),
    )
    .await;

    // User A with a real session
    let user_a = common::make_user("victim");
    let token_a = sessions::create_session(&user_a.id, 10).unwrap();

    // User B presents A's refresh token under their own id
    let user_b = common::make_user("impostor");
    let request = test::TestRequest::get()
        .uri("/users/me/access-token")
        .insert_header(("x-refresh-token", token_a))
        .insert_header(("x-user-id", user_b.id.clone()))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn missing_refresh_credentials_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(common::test_keys())
            .app_data(common::test_config())
            .configure(user_routes::init_routes),
    )
    .await;

    let user = common::make_user("incomplete");
    let request = test::TestRequest::get()
        .uri("/users/me/access-token")
        .insert_header(("x-user-id", user.id.clone()))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn api_key_generated_and_persisted() {
    let app = test::init_service(
        App::new()
            .app_data(common::test_keys())
            .app_data(common::test_config())
            .configure(user_routes::init_routes),
    )
    .await;

    let user = common::make_user("apikey");
    let refresh_token = sessions::create_session(&user.id, 10).unwrap();

    let request = test::TestRequest::get()
        .uri("/users/me/api-key")
        .insert_header(("x-refresh-token", refresh_token))
        .insert_header(("x-user-id", user.id.clone()))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(response).await;
    let api_key = body["api_key"].as_str().unwrap().to_string();

    let stored = user_storage::find_user_by_id(&user.id).unwrap().unwrap();
    assert_eq!(stored.api_key.as_deref(), Some(api_key.as_str()));
}
