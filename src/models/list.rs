use serde::{Deserialize, Serialize};
use uuid::Uuid;

// A list belongs to exactly one of {user, team}, never both, never neither.
// The constructors are the only way routes build one, so the disjoint
// ownership invariant holds for every stored document.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct List {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
}

impl List {
    pub fn solo(title: String, user_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            user_id: Some(user_id),
            team_id: None,
        }
    }

    pub fn team(title: String, team_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            user_id: None,
            team_id: Some(team_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLabel {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub list_id: String,
    // Tagged with the owning team for team tasks, for fast filtering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub completed: bool,
    pub priority: i32,
    pub priority_label: PriorityLabel,
    // ISO date string like "2025-07-01"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub sort_order: i32,
}

impl Task {
    pub fn new(request: CreateTaskRequest, list_id: String, team_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: request.title,
            list_id,
            team_id,
            completed: false,
            priority: request.priority.unwrap_or(0),
            priority_label: request.priority_label.unwrap_or(PriorityLabel::Low),
            due_date: request.due_date,
            sort_order: request.sort_order.unwrap_or(0),
        }
    }

    // Apply a partial update, leaving unspecified fields untouched
    pub fn apply(&mut self, update: &UpdateTaskRequest) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(label) = update.priority_label {
            self.priority_label = label;
        }
        if update.due_date.is_some() {
            self.due_date = update.due_date.clone();
        }
        if let Some(sort_order) = update.sort_order {
            self.sort_order = sort_order;
        }
    }
}

// Request bodies for list and task mutation
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateListRequest {
    pub title: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateListRequest {
    pub title: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateTaskRequest {
    pub title: String,
    pub priority: Option<i32>,
    pub priority_label: Option<PriorityLabel>,
    pub due_date: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<i32>,
    pub priority_label: Option<PriorityLabel>,
    pub due_date: Option<String>,
    pub sort_order: Option<i32>,
}
