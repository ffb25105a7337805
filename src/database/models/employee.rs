use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub manager_id: Option<Uuid>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default = "empty_object")]
    pub languages: Value,
    #[serde(default = "empty_object")]
    pub contacts: Value,
    #[serde(default)]
    pub current_role_started_at: Option<NaiveDate>,
    #[serde(default = "empty_object")]
    pub competencies: Value,
    #[serde(default)]
    pub assessments_count: i32,
}

pub(crate) fn empty_object() -> Value {
    Value::Object(Default::default())
}
