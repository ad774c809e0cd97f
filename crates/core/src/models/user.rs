//! Authenticated marketplace user.

use serde::{Deserialize, Serialize};

use crate::types::{UserId, UserRole};

/// The user identity held by a client session.
///
/// Serialized in the backend's camelCase shape because this is also the
/// persisted `user` entry of the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: UserRole,
}
