use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A candidate flagged (or unflagged) as successor for a target role.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Succession {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub target_role: Uuid,
    #[serde(default)]
    pub is_starred: bool,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}
