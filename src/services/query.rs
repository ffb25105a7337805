use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::database::models::{Employee, Role, Succession, Vacancy};

/// Listing orders. Every order ends on `id` so rows with equal keys come
/// back in the same order on every request and never straddle pages.
pub const EMPLOYEE_ORDER: &str = "name asc, id asc";
pub const ROLE_ORDER: &str = "name asc, version desc, id asc";
pub const VACANCY_ORDER: &str = "created_at desc, id asc";
pub const SUCCESSION_ORDER: &str = "created_at desc, id asc";

/// Requested page window. Built by the handlers after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.per_page as usize)
    }
}

/// Employee filters shared by the directory listing and the org tree.
///
/// `department` and `unit` are exact matches, `manager` compares the textual
/// form of `manager_id`, and `search` is a case-insensitive substring match
/// over name, email and title. Blank values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeQuery {
    #[serde(default, alias = "dept")]
    pub department: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl EmployeeQuery {
    pub fn where_clause(&self) -> Value {
        let mut clause = Map::new();
        if let Some(department) = present(&self.department) {
            clause.insert("department".into(), json!(department));
        }
        if let Some(unit) = present(&self.unit) {
            clause.insert("unit".into(), json!(unit));
        }
        if let Some(manager) = present(&self.manager) {
            clause.insert("manager_id".into(), json!({ "$teq": manager }));
        }
        if let Some(search) = present(&self.search) {
            clause.insert("$or".into(), any_ilike(&["name", "email", "title"], search));
        }
        Value::Object(clause)
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        if let Some(department) = present(&self.department) {
            if employee.department != department {
                return false;
            }
        }
        if let Some(unit) = present(&self.unit) {
            if employee.unit != unit {
                return false;
            }
        }
        if let Some(manager) = present(&self.manager) {
            if employee.manager_id.map(|id| id.to_string()).as_deref() != Some(manager) {
                return false;
            }
        }
        if let Some(search) = present(&self.search) {
            let needle = search.to_lowercase();
            let hit = [&employee.name, &employee.email, &employee.title]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl RoleQuery {
    pub fn where_clause(&self) -> Value {
        let mut clause = Map::new();
        if let Some(division) = present(&self.division) {
            clause.insert("division".into(), json!(division));
        }
        if let Some(status) = present(&self.status) {
            clause.insert("status".into(), json!({ "$teq": status }));
        }
        if let Some(search) = present(&self.search) {
            clause.insert("$or".into(), any_ilike(&["name", "goal"], search));
        }
        Value::Object(clause)
    }

    pub fn matches(&self, role: &Role) -> bool {
        if let Some(division) = present(&self.division) {
            if role.division != division {
                return false;
            }
        }
        if let Some(status) = present(&self.status) {
            if role.status.as_str() != status {
                return false;
            }
        }
        if let Some(search) = present(&self.search) {
            let needle = search.to_lowercase();
            if !role.name.to_lowercase().contains(&needle) && !role.goal.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VacancyQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "dept")]
    pub department: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub manager: Option<String>,
}

impl VacancyQuery {
    pub fn where_clause(&self) -> Value {
        let mut clause = Map::new();
        if let Some(status) = present(&self.status) {
            clause.insert("status".into(), json!({ "$teq": status }));
        }
        if let Some(department) = present(&self.department) {
            clause.insert("department".into(), json!(department));
        }
        if let Some(unit) = present(&self.unit) {
            clause.insert("unit".into(), json!(unit));
        }
        if let Some(manager) = present(&self.manager) {
            clause.insert("manager_id".into(), json!({ "$teq": manager }));
        }
        Value::Object(clause)
    }

    pub fn matches(&self, vacancy: &Vacancy) -> bool {
        present(&self.status).map_or(true, |s| vacancy.status.as_str() == s)
            && present(&self.department).map_or(true, |d| vacancy.department == d)
            && present(&self.unit).map_or(true, |u| vacancy.unit == u)
            && present(&self.manager)
                .map_or(true, |m| vacancy.manager_id.map(|id| id.to_string()).as_deref() == Some(m))
    }
}

/// Succession filters. `division` is resolved to the set of role ids in
/// that division by the store before matching.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuccessionQuery {
    #[serde(default)]
    pub target_role: Option<String>,
    #[serde(default)]
    pub division: Option<String>,
}

impl SuccessionQuery {
    pub fn division(&self) -> Option<&str> {
        present(&self.division)
    }

    pub fn where_clause(&self, division_role_ids: Option<&[String]>) -> Value {
        let mut clause = Map::new();
        if let Some(target_role) = present(&self.target_role) {
            clause.insert("target_role".into(), json!({ "$teq": target_role }));
        }
        if let Some(ids) = division_role_ids {
            // both constraints on the same column go through $and
            let in_division = json!({ "target_role": { "$tin": ids } });
            match clause.remove("target_role") {
                Some(existing) => {
                    clause.insert(
                        "$and".into(),
                        json!([{ "target_role": existing }, in_division]),
                    );
                }
                None => {
                    clause.insert("target_role".into(), json!({ "$tin": ids }));
                }
            }
        }
        Value::Object(clause)
    }

    pub fn matches(&self, entry: &Succession, division_role_ids: Option<&[String]>) -> bool {
        let target = entry.target_role.to_string();
        if let Some(target_role) = present(&self.target_role) {
            if target != target_role {
                return false;
            }
        }
        if let Some(ids) = division_role_ids {
            if !ids.iter().any(|id| *id == target) {
                return false;
            }
        }
        true
    }
}

/// Upsert request for a (employee, target role) succession pair
#[derive(Debug, Clone, Deserialize)]
pub struct SuccessionToggle {
    pub employee_id: uuid::Uuid,
    pub target_role: uuid::Uuid,
    pub is_starred: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn any_ilike(columns: &[&str], needle: &str) -> Value {
    let pattern = format!("%{}%", escape_like(needle));
    Value::Array(
        columns
            .iter()
            .map(|column| json!({ *column: { "$ilike": pattern } }))
            .collect(),
    )
}

/// Escapes LIKE wildcards so the needle matches literally
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
