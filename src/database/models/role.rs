use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "rolestatus", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoleStatus {
    Draft,
    Active,
    Archived,
}

impl Default for RoleStatus {
    fn default() -> Self {
        RoleStatus::Active
    }
}

impl RoleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleStatus::Draft => "draft",
            RoleStatus::Active => "active",
            RoleStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    #[serde(default = "first_version")]
    pub version: i32,
    #[serde(default)]
    pub division: String,
    #[serde(default)]
    pub status: RoleStatus,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub responsibilities: Option<Value>,
    #[serde(default)]
    pub kpi: Option<Value>,
    #[serde(default)]
    pub competency_map: Option<Value>,
    #[serde(default)]
    pub assessment_guidelines: Option<Value>,
    #[serde(default)]
    pub test_assignment: Option<Value>,
    #[serde(default)]
    pub assessment_center: Option<Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn first_version() -> i32 {
    1
}
