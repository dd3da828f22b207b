use crate::models::{Role, ServiceError, Team, TeamData};
use crate::services::Mailer;
use crate::utils::authorize::{self, ADMINS_ONLY, READERS};
use crate::utils::{team_storage, user_storage, AuthedUser};
use actix_web::{delete, get, patch, post, web, HttpResponse};
use log::{error, info};
use serde_json::json;

// Create a new team; the caller becomes its admin
#[post("/teams")]
async fn create_team(
    auth: AuthedUser,
    team_data: web::Json<TeamData>,
) -> Result<HttpResponse, ServiceError> {
    if team_data.name.trim().is_empty() {
        return Err(ServiceError::BadRequest("Name is required".to_string()));
    }

    info!("📝 Creating new team: {} for user: {}", team_data.name, auth.user_id);

    let team = Team::new(team_data.name.trim().to_string(), auth.user_id.clone());
    team_storage::save_team(&team)?;

    info!("✅ Team created successfully: {}", team.id);

    Ok(HttpResponse::Created().json(team))
}

// Join a team by its share code; new members enter as viewers
#[post("/teams/join")]
async fn join_team(
    auth: AuthedUser,
    data: web::Json<serde_json::Value>,
) -> Result<HttpResponse, ServiceError> {
    let code = match data.get("code") {
        Some(serde_json::Value::String(code)) if !code.trim().is_empty() => code.trim(),
        _ => return Err(ServiceError::MissingCredentials("Team code".to_string())),
    };

    info!("👥 User: {} joining team by code", auth.user_id);

    let team = team_storage::find_team_by_code(code)?.ok_or(ServiceError::TeamNotFound)?;

    let team = team_storage::add_member(&team.id, &auth.user_id, Role::Viewer)?;

    info!("✅ User: {} joined team: {}", auth.user_id, team.id);

    Ok(HttpResponse::Ok().json(team))
}

// Get all teams the current user belongs to
#[get("/teams")]
async fn get_user_teams(auth: AuthedUser) -> Result<HttpResponse, ServiceError> {
    info!("📋 Fetching teams for user: {}", auth.user_id);

    let teams = team_storage::get_teams_for_user(&auth.user_id)?;

    info!("✅ Found {} teams for user: {}", teams.len(), auth.user_id);

    Ok(HttpResponse::Ok().json(teams))
}

// Get team members (any member may look)
#[get("/teams/{team_id}/members")]
async fn get_team_members(
    auth: AuthedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let team_id = path.into_inner();

    let ctx = authorize::require_team_role(&team_id, &auth.user_id, READERS)?;

    info!("✅ Found {} members for team: {}", ctx.team.memberships.len(), team_id);

    Ok(HttpResponse::Ok().json(ctx.team.memberships))
}

// Update a team member's role (admin only)
#[patch("/teams/{team_id}/members/{user_id}")]
async fn update_member_role(
    auth: AuthedUser,
    path: web::Path<(String, String)>,
    data: web::Json<serde_json::Value>,
) -> Result<HttpResponse, ServiceError> {
    let (team_id, target_user_id) = path.into_inner();

    info!("🔄 Updating role for user: {} in team: {}", target_user_id, team_id);

    authorize::require_team_role(&team_id, &auth.user_id, ADMINS_ONLY)?;

    // Parse the role from the request
    let role = match data.get("role") {
        Some(serde_json::Value::String(value)) => Role::parse(value).ok_or_else(|| {
            ServiceError::BadRequest(
                "Invalid role. Must be 'viewer', 'editor' or 'admin'".to_string(),
            )
        })?,
        _ => {
            return Err(ServiceError::BadRequest(
                "Invalid or missing 'role' field".to_string(),
            ))
        }
    };

    let team = team_storage::update_member_role(&team_id, &target_user_id, role)?;

    info!("✅ User: {} role updated to {:?} in team: {}", target_user_id, role, team_id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Role updated",
        "user_id": target_user_id,
        "team_id": team.id,
        "role": role,
    })))
}

// Kick a member from the team (admin only); the member is notified by
// email, but a failed send never undoes the removal
#[delete("/teams/{team_id}/members/{user_id}")]
async fn remove_member(
    auth: AuthedUser,
    path: web::Path<(String, String)>,
    mailer: web::Data<Mailer>,
) -> Result<HttpResponse, ServiceError> {
    let (team_id, target_user_id) = path.into_inner();

    info!("🗑️ Removing user: {} from team: {}", target_user_id, team_id);

    let ctx = authorize::require_team_role(&team_id, &auth.user_id, ADMINS_ONLY)?;

    if auth.user_id == target_user_id {
        return Err(ServiceError::BadRequest("Cannot kick yourself".to_string()));
    }

    let removed_user = match user_storage::find_user_by_id(&target_user_id)? {
        Some(user) => user,
        None => {
            error!("❌ User not found: {}", target_user_id);
            return Err(ServiceError::NotFound);
        }
    };

    team_storage::remove_member(&team_id, &target_user_id)?;

    info!("✅ User: {} removed from team: {}", target_user_id, team_id);

    let subject = format!("You were removed from team \"{}\"", ctx.team.name);
    let body = format!(
        "Hello {},\n\nYou have been removed from the team \"{}\" by an admin.\n\nIf this was a mistake, please contact your team admin.\n\n- TaskFlow",
        removed_user.display_name.as_deref().unwrap_or("User"),
        ctx.team.name,
    );
    mailer.send_email(&removed_user.email, &subject, &body).await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "User removed and notified",
        "user_id": target_user_id,
        "team_id": team_id,
    })))
}

// Register all team routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_team)
        .service(join_team)
        .service(get_user_teams)
        .service(get_team_members)
        .service(update_member_role)
        .service(remove_member);
}
