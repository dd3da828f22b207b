// taskflow-service/src/utils/authorize.rs
//
// Authorization gate for team-scoped requests. Given a caller that already
// passed authentication, loads the team, resolves the caller's role and
// accepts or rejects against the endpoint's required role set. On success
// the resolved team and role are returned as a typed context for the
// handler to use.
use crate::models::{Role, ServiceError, Team};
use crate::utils::team_storage;
use log::debug;

// Role sets per endpoint family
pub const READERS: &[Role] = &[Role::Viewer, Role::Editor, Role::Admin];
pub const TASK_WRITERS: &[Role] = &[Role::Editor, Role::Admin];
pub const ADMINS_ONLY: &[Role] = &[Role::Admin];

#[derive(Debug, Clone)]
pub struct TeamContext {
    pub team: Team,
    pub role: Role,
}

pub fn require_team_role(
    team_id: &str,
    user_id: &str,
    required: &[Role],
) -> Result<TeamContext, ServiceError> {
    if team_id.trim().is_empty() {
        return Err(ServiceError::MissingCredentials("teamId".to_string()));
    }

    let team = team_storage::find_team_by_id(team_id)?.ok_or(ServiceError::TeamNotFound)?;

    // Set membership only; role ordering is a UI convenience, not an
    // authorization rule.
    let role = team
        .role_of(user_id)
        .ok_or(ServiceError::InsufficientPermissions)?;

    if !required.contains(&role) {
        return Err(ServiceError::InsufficientPermissions);
    }

    debug!("Authorized user: {} on team: {} as {:?}", user_id, team_id, role);

    Ok(TeamContext { team, role })
}
