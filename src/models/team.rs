use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Join codes are short enough to share verbally but unique enough in practice
const JOIN_CODE_LEN: usize = 8;

// Role within a single team membership. Ordered so promote/demote
// conveniences can step through it; the authorization gate itself only
// tests set membership, never order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    Editor,
    Admin,
}

impl Role {
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "viewer" => Some(Role::Viewer),
            "editor" => Some(Role::Editor),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Editor => "editor",
            Role::Admin => "admin",
        }
    }

    // Next role up, saturating at Admin
    pub fn promote(self) -> Role {
        match self {
            Role::Viewer => Role::Editor,
            _ => Role::Admin,
        }
    }

    // Next role down, saturating at Viewer
    pub fn demote(self) -> Role {
        match self {
            Role::Admin => Role::Editor,
            _ => Role::Viewer,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TeamData {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Membership {
    pub user_id: String,
    pub role: Role,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub code: String,
    pub memberships: Vec<Membership>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

impl Team {
    // Create a new team with the creator as admin
    pub fn new(name: String, creator_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            code: generate_join_code(),
            memberships: vec![Membership {
                user_id: creator_id,
                role: Role::Admin,
            }],
            created_at: Utc::now(),
        }
    }

    // Resolve a user's role from the membership set (at most one match)
    pub fn role_of(&self, user_id: &str) -> Option<Role> {
        self.memberships
            .iter()
            .find(|m| m.user_id == user_id)
            .map(|m| m.role)
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.role_of(user_id).is_some()
    }
}

// Generate a short human-shareable join code
pub fn generate_join_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(JOIN_CODE_LEN)
        .map(char::from)
        .collect()
}
