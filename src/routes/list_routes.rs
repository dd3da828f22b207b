// taskflow-service/src/routes/list_routes.rs
//
// Solo lists and their tasks. Every lookup carries the caller's user id as
// the ownership clause; a list id belonging to someone else behaves exactly
// like a missing one.
use crate::models::{
    CreateListRequest, CreateTaskRequest, List, ServiceError, Task, UpdateListRequest,
    UpdateTaskRequest,
};
use crate::utils::list_storage::{self, Owner};
use crate::utils::AuthedUser;
use actix_web::{delete, get, patch, post, web, HttpResponse};
use log::info;
use serde_json::json;

// Confirm the list really belongs to this user before touching its tasks
fn find_owned_list(list_id: &str, user_id: &str) -> Result<List, ServiceError> {
    list_storage::find_list(list_id, Owner::User(user_id))?.ok_or(ServiceError::NotFound)
}

// Get all solo lists for the authenticated user
#[get("/lists")]
async fn get_lists(auth: AuthedUser) -> Result<HttpResponse, ServiceError> {
    let lists = list_storage::get_lists_for_owner(Owner::User(&auth.user_id))?;

    info!("📋 Found {} lists for user: {}", lists.len(), auth.user_id);

    Ok(HttpResponse::Ok().json(lists))
}

// Create a new solo list
#[post("/lists")]
async fn create_list(
    auth: AuthedUser,
    data: web::Json<CreateListRequest>,
) -> Result<HttpResponse, ServiceError> {
    if data.title.trim().is_empty() {
        return Err(ServiceError::BadRequest("Title is required".to_string()));
    }

    let list = List::solo(data.title.trim().to_string(), auth.user_id.clone());
    list_storage::save_list(&list)?;

    info!("✅ List created: {} for user: {}", list.id, auth.user_id);

    Ok(HttpResponse::Created().json(list))
}

// Rename a solo list (must belong to the caller)
#[patch("/lists/{list_id}")]
async fn update_list(
    auth: AuthedUser,
    path: web::Path<String>,
    data: web::Json<UpdateListRequest>,
) -> Result<HttpResponse, ServiceError> {
    let list_id = path.into_inner();

    let title = data
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ServiceError::BadRequest("Title is required".to_string()))?;

    let updated = list_storage::update_list_title(&list_id, Owner::User(&auth.user_id), title)?
        .ok_or(ServiceError::NotFound)?;

    Ok(HttpResponse::Ok().json(updated))
}

// Delete a solo list and its tasks
#[delete("/lists/{list_id}")]
async fn delete_list(auth: AuthedUser, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let list_id = path.into_inner();

    let removed = list_storage::delete_list(&list_id, Owner::User(&auth.user_id))?
        .ok_or(ServiceError::NotFound)?;
    list_storage::delete_tasks_for_list(&removed.id)?;

    info!("🗑️ List deleted: {} for user: {}", removed.id, auth.user_id);

    Ok(HttpResponse::Ok().json(removed))
}

// Get tasks for one solo list
#[get("/lists/{list_id}/tasks")]
async fn get_tasks(auth: AuthedUser, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let list_id = path.into_inner();

    find_owned_list(&list_id, &auth.user_id)?;

    let tasks = list_storage::get_tasks_for_list(&list_id)?;

    Ok(HttpResponse::Ok().json(tasks))
}

// Add a task to a solo list
#[post("/lists/{list_id}/tasks")]
async fn create_task(
    auth: AuthedUser,
    path: web::Path<String>,
    data: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, ServiceError> {
    let list_id = path.into_inner();

    if data.title.trim().is_empty() {
        return Err(ServiceError::BadRequest("Title is required".to_string()));
    }

    find_owned_list(&list_id, &auth.user_id)?;

    let task = Task::new(data.into_inner(), list_id, None);
    list_storage::save_task(&task)?;

    info!("✅ Task created: {} in list: {}", task.id, task.list_id);

    Ok(HttpResponse::Created().json(task))
}

// Update a task in a solo list
#[patch("/lists/{list_id}/tasks/{task_id}")]
async fn update_task(
    auth: AuthedUser,
    path: web::Path<(String, String)>,
    data: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, ServiceError> {
    let (list_id, task_id) = path.into_inner();

    find_owned_list(&list_id, &auth.user_id)?;

    let mut task = list_storage::find_task(&task_id, &list_id)?.ok_or(ServiceError::NotFound)?;
    task.apply(&data);
    list_storage::save_task(&task)?;

    Ok(HttpResponse::Ok().json(task))
}

// Remove a task from a solo list
#[delete("/lists/{list_id}/tasks/{task_id}")]
async fn delete_task(
    auth: AuthedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let (list_id, task_id) = path.into_inner();

    find_owned_list(&list_id, &auth.user_id)?;

    let removed =
        list_storage::delete_task(&task_id, &list_id)?.ok_or(ServiceError::NotFound)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task deleted successfully",
        "task": removed,
    })))
}

// Register all solo list routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_lists)
        .service(create_list)
        .service(update_list)
        .service(delete_list)
        .service(get_tasks)
        .service(create_task)
        .service(update_task)
        .service(delete_task);
}
