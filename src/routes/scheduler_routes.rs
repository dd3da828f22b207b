use crate::models::ServiceError;
use crate::services::SchedulerClient;
use crate::utils::AuthedUser;
use actix_web::{post, web, HttpResponse};
use log::info;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
struct ScheduleRequest {
    tasks: serde_json::Value,
}

// Generate a proposed schedule for the caller's tasks via the external
// AI scheduling service
#[post("/ai/schedule")]
async fn schedule(
    auth: AuthedUser,
    request: web::Json<ScheduleRequest>,
    scheduler: web::Data<SchedulerClient>,
) -> Result<HttpResponse, ServiceError> {
    info!("🤖 Schedule request for user: {}", auth.user_id);

    let proposed = scheduler.propose_schedule(&request.tasks).await?;

    Ok(HttpResponse::Ok().json(proposed))
}

// Register all scheduler routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(schedule);
}
