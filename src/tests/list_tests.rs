use super::common;
use crate::models::{List, Membership, Role, Task, Team, UpdateTaskRequest};
use crate::routes::{list_routes, team_list_routes};
use crate::utils::list_storage::{self, Owner};
use crate::utils::team_storage;
use actix_web::http::StatusCode;
use actix_web::{test, App};
use serde_json::json;

#[::core::prelude::v1::test]
fn list_ownership_is_disjoint() {
    let solo = List::solo("Personal".to_string(), "user-1".to_string());
    assert!(solo.user_id.is_some());
    assert!(solo.team_id.is_none());

    let team = List::team("Shared".to_string(), "team-1".to_string());
    assert!(team.user_id.is_none());
    assert!(team.team_id.is_some());
}

// The single most important property of the access layer: an id-only match
// never returns a record when the ownership clause doesn't hold.
#[::core::prelude::v1::test]
fn ownership_clause_is_never_id_alone() {
    let owner = common::make_user("owner");
    let list = List::solo("Mine".to_string(), owner.id.clone());
    list_storage::save_list(&list).unwrap();

    assert!(list_storage::find_list(&list.id, Owner::User(&owner.id))
        .unwrap()
        .is_some());

    // Same id, wrong owner: nothing comes back
    assert!(list_storage::find_list(&list.id, Owner::User("someone-else"))
        .unwrap()
        .is_none());
    assert!(list_storage::find_list(&list.id, Owner::Team("some-team"))
        .unwrap()
        .is_none());
}

#[::core::prelude::v1::test]
fn task_update_applies_only_provided_fields() {
    let mut task = Task::new(
        crate::models::CreateTaskRequest {
            title: "Write report".to_string(),
            priority: Some(2),
            priority_label: None,
            due_date: Some("2026-09-01".to_string()),
            sort_order: None,
        },
        "list-1".to_string(),
        None,
    );

    task.apply(&UpdateTaskRequest {
        completed: Some(true),
        ..Default::default()
    });

    assert!(task.completed);
    assert_eq!(task.title, "Write report");
    assert_eq!(task.priority, 2);
    assert_eq!(task.due_date.as_deref(), Some("2026-09-01"));
}

#[actix_rt::test]
async fn solo_list_and_task_crud() {
    let app = test::init_service(
        App::new()
            .app_data(common::test_keys())
            .app_data(common::test_config())
            .configure(list_routes::init_routes),
    )
    .await;

    let user = common::make_user("solo");
    let auth = ("Authorization", common::bearer(&user.id));

    // Create a list
    let request = test::TestRequest::post()
        .uri("/lists")
        .insert_header(auth.clone())
        .set_json(&json!({ "title": "Groceries" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = test::read_body_json(response).await;
    let list_id = body["id"].as_str().unwrap().to_string();

    // It shows up in the caller's lists
    let request = test::TestRequest::get()
        .uri("/lists")
        .insert_header(auth.clone())
        .to_request();
    let response = test::call_service(&app, request).await;
    let body: serde_json::Value = test::read_body_json(response).await;
    assert!(body
        .as_array()
        .unwrap()
        .iter()
        .any(|l| l["id"].as_str() == Some(list_id.as_str())));

    // Add a task
    let request = test::TestRequest::post()
        .uri(&format!("/lists/{}/tasks", list_id))
        .insert_header(auth.clone())
        .set_json(&json!({ "title": "Milk", "priority": 2, "due_date": "2026-09-01" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = test::read_body_json(response).await;
    let task_id = body["id"].as_str().unwrap().to_string();
    assert_eq!(body["priority"].as_i64(), Some(2));

    // Complete it
    let request = test::TestRequest::patch()
        .uri(&format!("/lists/{}/tasks/{}", list_id, task_id))
        .insert_header(auth.clone())
        .set_json(&json!({ "completed": true }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["completed"].as_bool(), Some(true));

    // Rename the list
    let request = test::TestRequest::patch()
        .uri(&format!("/lists/{}", list_id))
        .insert_header(auth.clone())
        .set_json(&json!({ "title": "Errands" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Delete the list; its tasks go with it
    let request = test::TestRequest::delete()
        .uri(&format!("/lists/{}", list_id))
        .insert_header(auth.clone())
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert!(list_storage::get_tasks_for_list(&list_id).unwrap().is_empty());
}

#[actix_rt::test]
async fn foreign_list_behaves_like_a_missing_one() {
    let app = test::init_service(
        App::new()
            .app_data(common::test_keys())
            .app_data(common::test_config())
            .configure(list_routes::init_routes),
    )
    .await;

    let owner = common::make_user("rightful");
    let intruder = common::make_user("intruder");

    let list = List::solo("Private".to_string(), owner.id.clone());
    list_storage::save_list(&list).unwrap();

    // Reads, updates and deletes against someone else's list all 404
    let request = test::TestRequest::get()
        .uri(&format!("/lists/{}/tasks", list.id))
        .insert_header(("Authorization", common::bearer(&intruder.id)))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = test::TestRequest::patch()
        .uri(&format!("/lists/{}", list.id))
        .insert_header(("Authorization", common::bearer(&intruder.id)))
        .set_json(&json!({ "title": "Hijacked" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = test::TestRequest::delete()
        .uri(&format!("/lists/{}", list.id))
        .insert_header(("Authorization", common::bearer(&intruder.id)))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The rightful owner still sees it untouched
    let stored = list_storage::find_list(&list.id, Owner::User(&owner.id))
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, "Private");
}

#[actix_rt::test]
async fn team_task_writes_follow_role_transitions() {
    let app = test::init_service(
        App::new()
            .app_data(common::test_keys())
            .app_data(common::test_config())
            .configure(team_list_routes::init_routes),
    )
    .await;

    let admin = common::make_user("tt-admin");
    let member = common::make_user("tt-member");

    let mut team = Team::new("Board".to_string(), admin.id.clone());
    team.memberships.push(Membership {
        user_id: member.id.clone(),
        role: Role::Viewer,
    });
    team_storage::save_team(&team).unwrap();

    let list = List::team("Sprint".to_string(), team.id.clone());
    list_storage::save_list(&list).unwrap();

    // A viewer can read the board
    let request = test::TestRequest::get()
        .uri(&format!("/teams/{}/lists", team.id))
        .insert_header(("Authorization", common::bearer(&member.id)))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    // ...but cannot add tasks
    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/lists/{}/tasks", team.id, list.id))
        .insert_header(("Authorization", common::bearer(&member.id)))
        .set_json(&json!({ "title": "Sneaky task" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // After promotion to editor the same request succeeds
    team_storage::update_member_role(&team.id, &member.id, Role::Editor).unwrap();

    let request = test::TestRequest::post()
        .uri(&format!("/teams/{}/lists/{}/tasks", team.id, list.id))
        .insert_header(("Authorization", common::bearer(&member.id)))
        .set_json(&json!({ "title": "Planned task" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = test::read_body_json(response).await;
    // Team tasks carry the owning team tag
    assert_eq!(body["team_id"].as_str(), Some(team.id.as_str()));
    let task_id = body["id"].as_str().unwrap().to_string();

    // Editors can update and delete tasks
    let request = test::TestRequest::patch()
        .uri(&format!(
            "/teams/{}/lists/{}/tasks/{}",
            team.id, list.id, task_id
        ))
        .insert_header(("Authorization", common::bearer(&member.id)))
        .set_json(&json!({ "completed": true }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let request = test::TestRequest::delete()
        .uri(&format!(
            "/teams/{}/lists/{}/tasks/{}",
            team.id, list.id, task_id
        ))
        .insert_header(("Authorization", common::bearer(&member.id)))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn team_list_lookup_requires_matching_team() {
    let app = test::init_service(
        App::new()
            .app_data(common::test_keys())
            .app_data(common::test_config())
            .configure(team_list_routes::init_routes),
    )
    .await;

    let admin = common::make_user("cross-admin");

    let team_a = Team::new("Alpha".to_string(), admin.id.clone());
    team_storage::save_team(&team_a).unwrap();
    let team_b = Team::new("Beta".to_string(), admin.id.clone());
    team_storage::save_team(&team_b).unwrap();

    let list = List::team("Alpha board".to_string(), team_a.id.clone());
    list_storage::save_list(&list).unwrap();

    // The list id exists, but it belongs to team A: addressing it through
    // team B finds nothing, even for the same (admin) caller.
    let request = test::TestRequest::get()
        .uri(&format!("/teams/{}/lists/{}/tasks", team_b.id, list.id))
        .insert_header(("Authorization", common::bearer(&admin.id)))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
