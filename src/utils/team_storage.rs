// taskflow-service/src/utils/team_storage.rs
use crate::models::{Membership, Role, ServiceError, Team};
use crate::utils::storage_root;
use lazy_static::lazy_static;
use log::{error, warn};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

lazy_static! {
    // Serializes membership mutations so two users joining via code
    // concurrently both end up members.
    static ref TEAMS_LOCK: Mutex<()> = Mutex::new(());
}

fn teams_dir() -> String {
    format!("{}/teams", storage_root())
}

fn team_path(team_id: &str) -> String {
    format!("{}/{}.json", teams_dir(), team_id)
}

// Initialize teams directory
pub fn ensure_teams_dir() -> std::io::Result<()> {
    let dir_path = teams_dir();
    let dir = Path::new(&dir_path);
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

// Save a team to storage
pub fn save_team(team: &Team) -> Result<(), ServiceError> {
    ensure_teams_dir().map_err(|e| {
        error!("Failed to create teams directory: {:?}", e);
        ServiceError::InternalServerError
    })?;

    let team_json = serde_json::to_string_pretty(team).map_err(|e| {
        error!("Failed to serialize team: {:?}", e);
        ServiceError::InternalServerError
    })?;

    fs::write(team_path(&team.id), team_json).map_err(|e| {
        error!("Failed to save team: {:?}", e);
        ServiceError::InternalServerError
    })
}

// Find a team by ID
pub fn find_team_by_id(team_id: &str) -> Result<Option<Team>, ServiceError> {
    let team_path = team_path(team_id);
    let path = Path::new(&team_path);

    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        error!("Failed to read team file: {:?}", e);
        ServiceError::InternalServerError
    })?;

    let team: Team = serde_json::from_str(&content).map_err(|e| {
        error!("Failed to parse team JSON: {:?}", e);
        ServiceError::InternalServerError
    })?;

    Ok(Some(team))
}

fn scan_teams<F>(mut keep: F) -> Result<Vec<Team>, ServiceError>
where
    F: FnMut(&Team) -> bool,
{
    let mut teams = Vec::new();
    ensure_teams_dir().map_err(|e| {
        error!("Failed to ensure teams directory: {:?}", e);
        ServiceError::InternalServerError
    })?;

    let dir_path = teams_dir();
    for entry in fs::read_dir(Path::new(&dir_path)).map_err(|e| {
        error!("Failed to read teams directory: {:?}", e);
        ServiceError::InternalServerError
    })? {
        let entry = entry.map_err(|e| {
            error!("Failed to read directory entry: {:?}", e);
            ServiceError::InternalServerError
        })?;
        let path = entry.path();

        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            let content = fs::read_to_string(&path).map_err(|e| {
                error!("Failed to read team file: {:?}", e);
                ServiceError::InternalServerError
            })?;

            let team: Team = match serde_json::from_str(&content) {
                Ok(team) => team,
                Err(e) => {
                    warn!("Skipping unparseable team document: {:?}", e);
                    continue;
                }
            };

            if keep(&team) {
                teams.push(team);
            }
        }
    }

    Ok(teams)
}

// Find a team by its join code (unique)
pub fn find_team_by_code(code: &str) -> Result<Option<Team>, ServiceError> {
    let mut matches = scan_teams(|team| team.code == code)?;
    Ok(matches.pop())
}

// All teams the user holds a membership in
pub fn get_teams_for_user(user_id: &str) -> Result<Vec<Team>, ServiceError> {
    scan_teams(|team| team.is_member(user_id))
}

// Add a membership. Rejects duplicates; the read-modify-write runs under
// the store lock so concurrent joins are appended, not lost.
pub fn add_member(team_id: &str, user_id: &str, role: Role) -> Result<Team, ServiceError> {
    let _guard = TEAMS_LOCK.lock().map_err(|e| {
        error!("Team store lock poisoned: {:?}", e);
        ServiceError::InternalServerError
    })?;

    let mut team = find_team_by_id(team_id)?.ok_or(ServiceError::TeamNotFound)?;

    if team.is_member(user_id) {
        return Err(ServiceError::BadRequest("Already a member".to_string()));
    }

    team.memberships.push(Membership {
        user_id: user_id.to_string(),
        role,
    });
    save_team(&team)?;

    Ok(team)
}

// Set the role on an existing membership
pub fn update_member_role(team_id: &str, user_id: &str, role: Role) -> Result<Team, ServiceError> {
    let _guard = TEAMS_LOCK.lock().map_err(|e| {
        error!("Team store lock poisoned: {:?}", e);
        ServiceError::InternalServerError
    })?;

    let mut team = find_team_by_id(team_id)?.ok_or(ServiceError::TeamNotFound)?;

    let member = team
        .memberships
        .iter_mut()
        .find(|m| m.user_id == user_id)
        .ok_or(ServiceError::NotFound)?;
    member.role = role;

    save_team(&team)?;

    Ok(team)
}

// Remove a membership
pub fn remove_member(team_id: &str, user_id: &str) -> Result<Team, ServiceError> {
    let _guard = TEAMS_LOCK.lock().map_err(|e| {
        error!("Team store lock poisoned: {:?}", e);
        ServiceError::InternalServerError
    })?;

    let mut team = find_team_by_id(team_id)?.ok_or(ServiceError::TeamNotFound)?;

    let before = team.memberships.len();
    team.memberships.retain(|m| m.user_id != user_id);
    if team.memberships.len() == before {
        return Err(ServiceError::NotFound);
    }

    save_team(&team)?;

    Ok(team)
}
