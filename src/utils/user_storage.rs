// taskflow-service/src/utils/user_storage.rs
use crate::models::{ServiceError, Session, User};
use crate::utils::{sessions, storage_root};
use lazy_static::lazy_static;
use log::{error, warn};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

lazy_static! {
    // Serializes read-modify-write cycles on user documents so concurrent
    // session appends are both durably recorded, never lost to a
    // last-write-wins race.
    static ref USERS_LOCK: Mutex<()> = Mutex::new(());
}

fn users_dir() -> String {
    format!("{}/users", storage_root())
}

fn user_path(user_id: &str) -> String {
    format!("{}/{}.json", users_dir(), user_id)
}

// Initialize users directory
pub fn ensure_users_dir() -> std::io::Result<()> {
    let dir_path = users_dir();
    let dir = Path::new(&dir_path);
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

// Save a user to storage
pub fn save_user(user: &User) -> Result<(), ServiceError> {
    ensure_users_dir().map_err(|e| {
        error!("Failed to create users directory: {:?}", e);
        ServiceError::InternalServerError
    })?;

    let user_json = serde_json::to_string_pretty(user).map_err(|e| {
        error!("Failed to serialize user: {:?}", e);
        ServiceError::InternalServerError
    })?;

    fs::write(user_path(&user.id), user_json).map_err(|e| {
        error!("Failed to save user: {:?}", e);
        ServiceError::InternalServerError
    })
}

// Find a user by ID
pub fn find_user_by_id(id: &str) -> Result<Option<User>, ServiceError> {
    let user_path = user_path(id);
    let path = Path::new(&user_path);

    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        error!("Failed to read user file: {:?}", e);
        ServiceError::InternalServerError
    })?;

    let user: User = serde_json::from_str(&content).map_err(|e| {
        error!("Failed to parse user JSON: {:?}", e);
        ServiceError::InternalServerError
    })?;

    Ok(Some(user))
}

// Find a user by email (unique across the store)
pub fn find_user_by_email(email: &str) -> Result<Option<User>, ServiceError> {
    ensure_users_dir().map_err(|e| {
        error!("Failed to ensure users directory: {:?}", e);
        ServiceError::InternalServerError
    })?;

    let dir_path = users_dir();
    for entry in fs::read_dir(Path::new(&dir_path)).map_err(|e| {
        error!("Failed to read users directory: {:?}", e);
        ServiceError::InternalServerError
    })? {
        let entry = entry.map_err(|e| {
            error!("Failed to read directory entry: {:?}", e);
            ServiceError::InternalServerError
        })?;
        let path = entry.path();

        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            let content = fs::read_to_string(&path).map_err(|e| {
                error!("Failed to read user file: {:?}", e);
                ServiceError::InternalServerError
            })?;

            let user: User = match serde_json::from_str(&content) {
                Ok(user) => user,
                Err(e) => {
                    warn!("Skipping unparseable user document: {:?}", e);
                    continue;
                }
            };

            if user.email.to_lowercase() == email.to_lowercase() {
                return Ok(Some(user));
            }
        }
    }

    Ok(None)
}

// Append a session to the user's stored set. Expired sessions are pruned
// here so the set stays bounded; lookups never prune.
pub fn append_session(user_id: &str, session: Session) -> Result<(), ServiceError> {
    let _guard = USERS_LOCK.lock().map_err(|e| {
        error!("User store lock poisoned: {:?}", e);
        ServiceError::InternalServerError
    })?;

    let mut user = find_user_by_id(user_id)?.ok_or(ServiceError::NotFound)?;

    user.sessions.retain(|s| !sessions::is_expired(s.expiry_time));
    user.sessions.push(session);

    save_user(&user)
}

// Persist a newly generated API key on the user document
pub fn set_api_key(user_id: &str, api_key: &str) -> Result<User, ServiceError> {
    let _guard = USERS_LOCK.lock().map_err(|e| {
        error!("User store lock poisoned: {:?}", e);
        ServiceError::InternalServerError
    })?;

    let mut user = find_user_by_id(user_id)?.ok_or(ServiceError::NotFound)?;
    user.api_key = Some(api_key.to_string());
    save_user(&user)?;

    Ok(user)
}
