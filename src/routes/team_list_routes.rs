// taskflow-service/src/routes/team_list_routes.rs
//
// Team lists and their tasks, behind the authorization gate. Reads are open
// to any member; list writes are admin-only; task writes require editor or
// admin. Lookups carry the resolved team id as the ownership clause.
use crate::models::{
    CreateListRequest, CreateTaskRequest, List, ServiceError, Task, UpdateListRequest,
    UpdateTaskRequest,
};
use crate::utils::authorize::{self, ADMINS_ONLY, READERS, TASK_WRITERS};
use crate::utils::list_storage::{self, Owner};
use crate::utils::AuthedUser;
use actix_web::{delete, get, patch, post, web, HttpResponse};
use log::info;
use serde_json::json;

// Confirm the list really belongs to this team before touching its tasks
fn find_team_list(list_id: &str, team_id: &str) -> Result<List, ServiceError> {
    list_storage::find_list(list_id, Owner::Team(team_id))?.ok_or(ServiceError::NotFound)
}

// Get all lists in a team (any member)
#[get("/teams/{team_id}/lists")]
async fn get_team_lists(
    auth: AuthedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let team_id = path.into_inner();

    authorize::require_team_role(&team_id, &auth.user_id, READERS)?;

    let lists = list_storage::get_lists_for_owner(Owner::Team(&team_id))?;

    info!("📋 Found {} lists for team: {}", lists.len(), team_id);

    Ok(HttpResponse::Ok().json(lists))
}

// Create a new list in the team (admin only)
#[post("/teams/{team_id}/lists")]
async fn create_team_list(
    auth: AuthedUser,
    path: web::Path<String>,
    data: web::Json<CreateListRequest>,
) -> Result<HttpResponse, ServiceError> {
    let team_id = path.into_inner();

    authorize::require_team_role(&team_id, &auth.user_id, ADMINS_ONLY)?;

    if data.title.trim().is_empty() {
        return Err(ServiceError::BadRequest("Title is required".to_string()));
    }

    let list = List::team(data.title.trim().to_string(), team_id);
    list_storage::save_list(&list)?;

    info!("✅ Team list created: {}", list.id);

    Ok(HttpResponse::Created().json(list))
}

// Rename a team list (admin only)
#[patch("/teams/{team_id}/lists/{list_id}")]
async fn update_team_list(
    auth: AuthedUser,
    path: web::Path<(String, String)>,
    data: web::Json<UpdateListRequest>,
) -> Result<HttpResponse, ServiceError> {
    let (team_id, list_id) = path.into_inner();

    authorize::require_team_role(&team_id, &auth.user_id, ADMINS_ONLY)?;

    let title = data
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ServiceError::BadRequest("Title is required".to_string()))?;

    let updated = list_storage::update_list_title(&list_id, Owner::Team(&team_id), title)?
        .ok_or(ServiceError::NotFound)?;

    Ok(HttpResponse::Ok().json(updated))
}

// Delete a team list and its tasks (admin only)
#[delete("/teams/{team_id}/lists/{list_id}")]
async fn delete_team_list(
    auth: AuthedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let (team_id, list_id) = path.into_inner();

    authorize::require_team_role(&team_id, &auth.user_id, ADMINS_ONLY)?;

    let removed = list_storage::delete_list(&list_id, Owner::Team(&team_id))?
        .ok_or(ServiceError::NotFound)?;
    list_storage::delete_tasks_for_list(&removed.id)?;

    info!("🗑️ Team list deleted: {}", removed.id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "List and its tasks deleted",
        "list": removed,
    })))
}

// Get tasks for a team list (any member)
#[get("/teams/{team_id}/lists/{list_id}/tasks")]
async fn get_team_tasks(
    auth: AuthedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let (team_id, list_id) = path.into_inner();

    authorize::require_team_role(&team_id, &auth.user_id, READERS)?;
    find_team_list(&list_id, &team_id)?;

    let tasks = list_storage::get_tasks_for_list(&list_id)?;

    Ok(HttpResponse::Ok().json(tasks))
}

// Add a task to a team list (editor or admin)
#[post("/teams/{team_id}/lists/{list_id}/tasks")]
async fn create_team_task(
    auth: AuthedUser,
    path: web::Path<(String, String)>,
    data: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, ServiceError> {
    let (team_id, list_id) = path.into_inner();

    authorize::require_team_role(&team_id, &auth.user_id, TASK_WRITERS)?;

    if data.title.trim().is_empty() {
        return Err(ServiceError::BadRequest("Title is required".to_string()));
    }

    find_team_list(&list_id, &team_id)?;

    // Tag the task with the owning team for fast filtering
    let task = Task::new(data.into_inner(), list_id, Some(team_id));
    list_storage::save_task(&task)?;

    info!("✅ Team task created: {} in list: {}", task.id, task.list_id);

    Ok(HttpResponse::Created().json(task))
}

// Update a task in a team list (editor or admin)
#[patch("/teams/{team_id}/lists/{list_id}/tasks/{task_id}")]
async fn update_team_task(
    auth: AuthedUser,
    path: web::Path<(String, String, String)>,
    data: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, ServiceError> {
    let (team_id, list_id, task_id) = path.into_inner();

    authorize::require_team_role(&team_id, &auth.user_id, TASK_WRITERS)?;
    find_team_list(&list_id, &team_id)?;

    let mut task = list_storage::find_task(&task_id, &list_id)?.ok_or(ServiceError::NotFound)?;
    task.apply(&data);
    list_storage::save_task(&task)?;

    Ok(HttpResponse::Ok().json(task))
}

// Remove a task from a team list (editor or admin)
#[delete("/teams/{team_id}/lists/{list_id}/tasks/{task_id}")]
async fn delete_team_task(
    auth: AuthedUser,
    path: web::Path<(String, String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let (team_id, list_id, task_id) = path.into_inner();

    authorize::require_team_role(&team_id, &auth.user_id, TASK_WRITERS)?;
    find_team_list(&list_id, &team_id)?;

    let removed =
        list_storage::delete_task(&task_id, &list_id)?.ok_or(ServiceError::NotFound)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task deleted successfully",
        "task": removed,
    })))
}

// Register all team list routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_team_lists)
        .service(create_team_list)
        .service(update_team_list)
        .service(delete_team_list)
        .service(get_team_tasks)
        .service(create_team_task)
        .service(update_team_task)
        .service(delete_team_task);
}
