use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "vacancystatus", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VacancyStatus {
    Open,
    Hold,
    Closed,
}

impl Default for VacancyStatus {
    fn default() -> Self {
        VacancyStatus::Open
    }
}

impl VacancyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VacancyStatus::Open => "open",
            VacancyStatus::Hold => "hold",
            VacancyStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vacancy {
    pub id: Uuid,
    pub role_id: Uuid,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub manager_id: Option<Uuid>,
    #[serde(default)]
    pub status: VacancyStatus,
    #[serde(default = "one")]
    pub headcount: i32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn one() -> i32 {
    1
}
