//! User domain type

use super::ids::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Public handle
    pub username: String,

    /// Contact address
    pub email: String,

    /// Avatar URL
    pub profile_picture: Option<String>,

    /// Subscriber count
    pub subscribers: Option<u64>,

    /// Account creation time
    pub created_at: DateTime<Utc>,

    /// Last profile update
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user with no avatar or subscriber count
    pub fn new(id: UserId, username: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            username: username.into(),
            email: email.into(),
            profile_picture: None,
            subscribers: None,
            created_at: now,
            updated_at: now,
        }
    }
}
