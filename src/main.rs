//Third-party-dependencies
use actix_cors::Cors;
use actix_web::{http, web, App, HttpServer};
use dotenv::dotenv;
use log::info;

use taskflow_service::config::AppConfig;
use taskflow_service::routes::{
    list_routes, scheduler_routes, team_list_routes, team_routes, user_routes,
};
use taskflow_service::services::{GoogleVerifier, Mailer, SchedulerClient};
use taskflow_service::utils::jwt::TokenKeys;
use taskflow_service::utils::storage_root;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    // All configuration is read once here; everything downstream receives
    // explicitly constructed collaborators.
    let config = AppConfig::from_env();
    let bind_address = config.bind_address.clone();
    let cors_origin = config.cors_origin.clone();

    std::fs::create_dir_all(storage_root())?;

    let token_keys = web::Data::new(TokenKeys::new(&config.jwt_secret));
    let mailer = web::Data::new(Mailer::new(
        config.resend_api_key.clone(),
        config.resend_from.clone(),
    ));
    let scheduler = web::Data::new(SchedulerClient::new(config.scheduler_url.clone()));
    let google = web::Data::new(GoogleVerifier::new(config.google_client_id.clone()));
    let config = web::Data::new(config);

    info!("Server started at {}", bind_address);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::CONTENT_TYPE,
                http::header::ACCEPT,
            ])
            .allowed_header("x-access-token")
            .allowed_header("x-refresh-token")
            .allowed_header("x-user-id")
            .allowed_header("_id")
            .expose_headers(vec!["x-access-token", "x-refresh-token", "x-api-key"])
            .supports_credentials();

        App::new()
            .wrap(cors)
            .app_data(token_keys.clone())
            .app_data(mailer.clone())
            .app_data(scheduler.clone())
            .app_data(google.clone())
            .app_data(config.clone())
            .configure(user_routes::init_routes)
            .configure(team_routes::init_routes)
            .configure(list_routes::init_routes)
            .configure(team_list_routes::init_routes)
            .configure(scheduler_routes::init_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
