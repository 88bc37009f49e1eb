use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A panel account. The role is stored as a string; an empty role marks an
/// account created before the role column existed (see [`crate::authz::Role`]).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub remark: String,
}
