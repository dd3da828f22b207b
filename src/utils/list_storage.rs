// taskflow-service/src/utils/list_storage.rs
//
// List and task documents. Every id-based lookup here takes an ownership
// clause alongside the id: a list is addressed by (id, owner) and a task by
// (id, parent list id). A query by id alone does not exist in this module.
use crate::models::{List, ServiceError, Task};
use crate::utils::storage_root;
use log::{error, warn};
use std::fs;
use std::path::Path;

// The mandatory ownership clause for list lookups: the caller's user id for
// solo lists, the resolved team id for team lists.
#[derive(Debug, Clone, Copy)]
pub enum Owner<'a> {
    User(&'a str),
    Team(&'a str),
}

impl Owner<'_> {
    fn matches(&self, list: &List) -> bool {
        match self {
            Owner::User(user_id) => list.user_id.as_deref() == Some(*user_id),
            Owner::Team(team_id) => list.team_id.as_deref() == Some(*team_id),
        }
    }
}

fn lists_dir() -> String {
    format!("{}/lists", storage_root())
}

fn tasks_dir() -> String {
    format!("{}/tasks", storage_root())
}

fn list_path(list_id: &str) -> String {
    format!("{}/{}.json", lists_dir(), list_id)
}

fn task_path(task_id: &str) -> String {
    format!("{}/{}.json", tasks_dir(), task_id)
}

fn ensure_dir(dir_path: &str) -> Result<(), ServiceError> {
    fs::create_dir_all(Path::new(dir_path)).map_err(|e| {
        error!("Failed to create storage directory {}: {:?}", dir_path, e);
        ServiceError::InternalServerError
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ServiceError> {
    let content = fs::read_to_string(path).map_err(|e| {
        error!("Failed to read document: {:?}", e);
        ServiceError::InternalServerError
    })?;

    serde_json::from_str(&content).map_err(|e| {
        error!("Failed to parse document JSON: {:?}", e);
        ServiceError::InternalServerError
    })
}

fn write_json<T: serde::Serialize>(path: &str, value: &T) -> Result<(), ServiceError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        error!("Failed to serialize document: {:?}", e);
        ServiceError::InternalServerError
    })?;

    fs::write(path, json).map_err(|e| {
        error!("Failed to write document: {:?}", e);
        ServiceError::InternalServerError
    })
}

// Save a list to storage
pub fn save_list(list: &List) -> Result<(), ServiceError> {
    ensure_dir(&lists_dir())?;
    write_json(&list_path(&list.id), list)
}

// Find a list by id AND ownership clause. Returns None when the id exists
// but the owner doesn't match; id alone is never sufficient.
pub fn find_list(list_id: &str, owner: Owner) -> Result<Option<List>, ServiceError> {
    let list_path = list_path(list_id);
    let path = Path::new(&list_path);

    if !path.exists() {
        return Ok(None);
    }

    let list: List = read_json(path)?;

    if owner.matches(&list) {
        Ok(Some(list))
    } else {
        Ok(None)
    }
}

fn scan_lists<F>(mut keep: F) -> Result<Vec<List>, ServiceError>
where
    F: FnMut(&List) -> bool,
{
    let mut lists = Vec::new();
    ensure_dir(&lists_dir())?;

    let dir_path = lists_dir();
    for entry in fs::read_dir(Path::new(&dir_path)).map_err(|e| {
        error!("Failed to read lists directory: {:?}", e);
        ServiceError::InternalServerError
    })? {
        let entry = entry.map_err(|e| {
            error!("Failed to read directory entry: {:?}", e);
            ServiceError::InternalServerError
        })?;
        let path = entry.path();

        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            let list: List = match fs::read_to_string(&path)
                .map_err(|_| ())
                .and_then(|content| serde_json::from_str(&content).map_err(|_| ()))
            {
                Ok(list) => list,
                Err(_) => {
                    warn!("Skipping unparseable list document: {:?}", path);
                    continue;
                }
            };

            if keep(&list) {
                lists.push(list);
            }
        }
    }

    Ok(lists)
}

pub fn get_lists_for_owner(owner: Owner) -> Result<Vec<List>, ServiceError> {
    scan_lists(|list| owner.matches(list))
}

// Rename a list addressed by id + ownership clause
pub fn update_list_title(
    list_id: &str,
    owner: Owner,
    title: &str,
) -> Result<Option<List>, ServiceError> {
    let mut list = match find_list(list_id, owner)? {
        Some(list) => list,
        None => return Ok(None),
    };

    list.title = title.to_string();
    save_list(&list)?;

    Ok(Some(list))
}

// Delete a list addressed by id + ownership clause; the caller cascades tasks
pub fn delete_list(list_id: &str, owner: Owner) -> Result<Option<List>, ServiceError> {
    let list = match find_list(list_id, owner)? {
        Some(list) => list,
        None => return Ok(None),
    };

    fs::remove_file(list_path(list_id)).map_err(|e| {
        error!("Failed to delete list file: {:?}", e);
        ServiceError::InternalServerError
    })?;

    Ok(Some(list))
}

// Save a task to storage
pub fn save_task(task: &Task) -> Result<(), ServiceError> {
    ensure_dir(&tasks_dir())?;
    write_json(&task_path(&task.id), task)
}

// Find a task by id AND parent list id
pub fn find_task(task_id: &str, list_id: &str) -> Result<Option<Task>, ServiceError> {
    let task_path = task_path(task_id);
    let path = Path::new(&task_path);

    if !path.exists() {
        return Ok(None);
    }

    let task: Task = read_json(path)?;

    if task.list_id == list_id {
        Ok(Some(task))
    } else {
        Ok(None)
    }
}

pub fn get_tasks_for_list(list_id: &str) -> Result<Vec<Task>, ServiceError> {
    let mut tasks = Vec::new();
    ensure_dir(&tasks_dir())?;

    let dir_path = tasks_dir();
    for entry in fs::read_dir(Path::new(&dir_path)).map_err(|e| {
        error!("Failed to read tasks directory: {:?}", e);
        ServiceError::InternalServerError
    })? {
        let entry = entry.map_err(|e| {
            error!("Failed to read directory entry: {:?}", e);
            ServiceError::InternalServerError
        })?;
        let path = entry.path();

        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            let task: Task = match fs::read_to_string(&path)
                .map_err(|_| ())
                .and_then(|content| serde_json::from_str(&content).map_err(|_| ()))
            {
                Ok(task) => task,
                Err(_) => {
                    warn!("Skipping unparseable task document: {:?}", path);
                    continue;
                }
            };

            if task.list_id == list_id {
                tasks.push(task);
            }
        }
    }

    // Stable presentation order for the board view
    tasks.sort_by_key(|t| t.sort_order);

    Ok(tasks)
}

// Delete a task addressed by id + parent list id
pub fn delete_task(task_id: &str, list_id: &str) -> Result<Option<Task>, ServiceError> {
    let task = match find_task(task_id, list_id)? {
        Some(task) => task,
        None => return Ok(None),
    };

    fs::remove_file(task_path(task_id)).map_err(|e| {
        error!("Failed to delete task file: {:?}", e);
        ServiceError::InternalServerError
    })?;

    Ok(Some(task))
}

// Remove every task under a deleted list (solo or team)
pub fn delete_tasks_for_list(list_id: &str) -> Result<usize, ServiceError> {
    let tasks = get_tasks_for_list(list_id)?;
    let mut deleted = 0;

    for task in tasks {
        if delete_task(&task.id, list_id)?.is_some() {
            deleted += 1;
        }
    }

    Ok(deleted)
}
