//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_USER};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", ROLE_ADMIN),
            UserRole::User => write!(f, "{}", ROLE_USER),
        }
    }
}

/// Pending password reset state.
///
/// `code_hash` is the SHA-256 hex digest of the code sent by email.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PasswordReset {
    pub code_hash: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub verified: bool,
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub role: UserRole,
    #[serde(skip)]
    pub reset: PasswordReset,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with default role
    pub fn new(id: Uuid, email: String, password_hash: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            password_hash,
            name,
            avatar: None,
            bio: None,
            role: UserRole::User,
            reset: PasswordReset::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Data required to persist a newly registered user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

/// Profile fields a user may change about themselves.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    /// URL of an already uploaded avatar image
    pub avatar: Option<String>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// User email address
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User display name
    #[schema(example = "John Doe")]
    pub name: String,
    /// Avatar image URL
    pub avatar: Option<String>,
    /// Short biography
    pub bio: Option<String>,
    /// User role
    #[schema(example = "user")]
    pub role: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            avatar: user.avatar,
            bio: user.bio,
            role: user.role.to_string(),
            created_at: user.created_at,
        }
    }
}

/// Author fields denormalized into comment responses at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthorSummary {
    pub id: Uuid,
    #[schema(example = "John Doe")]
    pub name: String,
    pub avatar: Option<String>,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}
