use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::fixture::{Fixture, FixtureError};
use super::query::{EmployeeQuery, PageRequest, RoleQuery, SuccessionQuery, SuccessionToggle, VacancyQuery};
use super::HrStore;
use crate::database::models::{Employee, Role, Succession, User, Vacancy};
use crate::database::{DatabaseError, Page};

/// `HrStore` over a fixture held in memory.
///
/// Collections are kept pre-sorted in their listing order, so filtering
/// preserves order and pagination is a plain skip/take.
pub struct MemoryStore {
    data: RwLock<Fixture>,
}

impl MemoryStore {
    pub fn new(mut fixture: Fixture) -> Self {
        // same keys as the SQL orders in `query`, ties broken by id
        fixture.employees.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        fixture
            .roles
            .sort_by(|a, b| a.name.cmp(&b.name).then(b.version.cmp(&a.version)).then(a.id.cmp(&b.id)));
        fixture
            .vacancies
            .sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        sort_succession(&mut fixture.succession);
        Self { data: RwLock::new(fixture) }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let fixture = Fixture::load(path)?;
        info!(
            "Loaded fixture {} ({} employees, {} roles, {} vacancies, {} users)",
            path.display(),
            fixture.employees.len(),
            fixture.roles.len(),
            fixture.vacancies.len(),
            fixture.users.len()
        );
        Ok(Self::new(fixture))
    }

    fn division_role_ids(roles: &[Role], division: Option<&str>) -> Option<Vec<String>> {
        division.map(|division| {
            roles
                .iter()
                .filter(|role| role.division == division)
                .map(|role| role.id.to_string())
                .collect()
        })
    }
}

fn sort_succession(entries: &mut [Succession]) {
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
}

fn paginate<T: Clone>(matching: Vec<&T>, page: PageRequest) -> Page<T> {
    let total = matching.len() as i64;
    let items = matching
        .into_iter()
        .skip(page.offset())
        .take(page.per_page as usize)
        .cloned()
        .collect();
    Page { items, page: page.page, per_page: page.per_page, total }
}

#[async_trait]
impl HrStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn list_employees(&self, query: &EmployeeQuery, page: PageRequest) -> Result<Page<Employee>, DatabaseError> {
        let data = self.data.read().await;
        let matching = data.employees.iter().filter(|e| query.matches(e)).collect();
        Ok(paginate(matching, page))
    }

    async fn select_employees(&self, query: &EmployeeQuery) -> Result<Vec<Employee>, DatabaseError> {
        let data = self.data.read().await;
        Ok(data.employees.iter().filter(|e| query.matches(e)).cloned().collect())
    }

    async fn get_employee(&self, id: Uuid) -> Result<Option<Employee>, DatabaseError> {
        let data = self.data.read().await;
        Ok(data.employees.iter().find(|e| e.id == id).cloned())
    }

    async fn list_roles(&self, query: &RoleQuery, page: PageRequest) -> Result<Page<Role>, DatabaseError> {
        let data = self.data.read().await;
        let matching = data.roles.iter().filter(|r| query.matches(r)).collect();
        Ok(paginate(matching, page))
    }

    async fn get_role(&self, id: Uuid) -> Result<Option<Role>, DatabaseError> {
        let data = self.data.read().await;
        Ok(data.roles.iter().find(|r| r.id == id).cloned())
    }

    async fn list_vacancies(&self, query: &VacancyQuery, page: PageRequest) -> Result<Page<Vacancy>, DatabaseError> {
        let data = self.data.read().await;
        let matching = data.vacancies.iter().filter(|v| query.matches(v)).collect();
        Ok(paginate(matching, page))
    }

    async fn list_succession(&self, query: &SuccessionQuery, page: PageRequest) -> Result<Page<Succession>, DatabaseError> {
        let data = self.data.read().await;
        let role_ids = Self::division_role_ids(&data.roles, query.division());
        let matching = data
            .succession
            .iter()
            .filter(|s| query.matches(s, role_ids.as_deref()))
            .collect();
        Ok(paginate(matching, page))
    }

    async fn toggle_succession(&self, input: SuccessionToggle) -> Result<Succession, DatabaseError> {
        let mut data = self.data.write().await;
        if !data.employees.iter().any(|e| e.id == input.employee_id) {
            return Err(DatabaseError::NotFound("Employee not found".to_string()));
        }
        if !data.roles.iter().any(|r| r.id == input.target_role) {
            return Err(DatabaseError::NotFound("Role not found".to_string()));
        }

        let existing = data
            .succession
            .iter_mut()
            .find(|s| s.employee_id == input.employee_id && s.target_role == input.target_role);

        if let Some(entry) = existing {
            entry.is_starred = input.is_starred;
            if let Some(notes) = input.notes {
                entry.notes = notes;
            }
            return Ok(entry.clone());
        }

        let entry = Succession {
            id: Uuid::new_v4(),
            employee_id: input.employee_id,
            target_role: input.target_role,
            is_starred: input.is_starred,
            notes: input.notes.unwrap_or_default(),
            created_at: Utc::now(),
        };
        data.succession.push(entry.clone());
        sort_succession(&mut data.succession);
        Ok(entry)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let email = email.trim().to_lowercase();
        let data = self.data.read().await;
        Ok(data
            .users
            .iter()
            .find(|u| u.email.trim().to_lowercase() == email)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ANN: &str = "00000000-0000-4000-8000-000000000001";
    const BO: &str = "00000000-0000-4000-8000-000000000002";
    const CY: &str = "00000000-0000-4000-8000-000000000003";
    const ROLE_A: &str = "10000000-0000-4000-8000-000000000001";
    const ROLE_B: &str = "10000000-0000-4000-8000-000000000002";

    fn store() -> MemoryStore {
        let fixture = Fixture::from_json(
            &json!({
                "employees": [
                    { "id": CY, "name": "Cy", "department": "Sales", "manager_id": ANN },
                    { "id": ANN, "name": "Ann", "department": "Eng" },
                    { "id": BO, "name": "Bo", "department": "Eng", "manager_id": ANN, "title": "Analyst" }
                ],
                "roles": [
                    { "id": ROLE_B, "name": "Store Manager", "version": 1, "division": "Retail" },
                    { "id": ROLE_A, "name": "Analyst", "version": 2, "division": "HQ", "status": "draft" }
                ],
                "vacancies": [
                    { "id": "20000000-0000-4000-8000-000000000001", "role_id": ROLE_A, "status": "closed", "created_at": "2024-01-01T00:00:00Z" },
                    { "id": "20000000-0000-4000-8000-000000000002", "role_id": ROLE_B, "status": "open", "created_at": "2024-03-01T00:00:00Z" }
                ],
                "succession": [
                    { "id": "30000000-0000-4000-8000-000000000001", "employee_id": BO, "target_role": ROLE_B, "is_starred": true, "notes": "ready", "created_at": "2024-02-01T00:00:00Z" }
                ],
                "users": [
                    { "id": 1, "email": "HR@Nova.io", "password_hash": "", "role": "hr", "is_active": true, "created_at": null }
                ]
            })
            .to_string(),
        )
        .unwrap();
        MemoryStore::new(fixture)
    }

    fn uuid(s: &str) -> Uuid {
        Uuid::parse_str(s).unwrap()
    }

    #[tokio::test]
    async fn employees_are_listed_by_name_with_total() {
        let store = store();
        let page = store.list_employees(&EmployeeQuery::default(), PageRequest::new(1, 2)).await.unwrap();
        let names: Vec<_> = page.items.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Ann", "Bo"]);
        assert_eq!(page.total, 3);

        let second = store.list_employees(&EmployeeQuery::default(), PageRequest::new(2, 2)).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].name, "Cy");
    }

    #[tokio::test]
    async fn namesakes_are_ordered_by_id() {
        let fixture = Fixture::from_json(
            &json!([
                { "id": CY, "name": "Sam Lee", "manager_id": ANN },
                { "id": ANN, "name": "Boss" },
                { "id": BO, "name": "Sam Lee", "manager_id": ANN }
            ])
            .to_string(),
        )
        .unwrap();
        let store = MemoryStore::new(fixture);

        let ids: Vec<Uuid> = store
            .select_employees(&EmployeeQuery::default())
            .await
            .unwrap()
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, [uuid(ANN), uuid(BO), uuid(CY)]);

        let records: Vec<_> = store
            .select_employees(&EmployeeQuery::default())
            .await
            .unwrap()
            .iter()
            .map(crate::org::EmployeeRecord::from)
            .collect();
        let view = crate::org::build(&records);
        assert_eq!(view.children[ANN], [BO, CY]);

        let second = store.list_employees(&EmployeeQuery::default(), PageRequest::new(2, 1)).await.unwrap();
        assert_eq!(second.items[0].id, uuid(BO));
    }

    #[tokio::test]
    async fn manager_filter_selects_reports() {
        let store = store();
        let query = EmployeeQuery { manager: Some(ANN.into()), ..Default::default() };
        let reports = store.select_employees(&query).await.unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|e| e.manager_id == Some(uuid(ANN))));
    }

    #[tokio::test]
    async fn roles_filter_by_status_and_division() {
        let store = store();
        let drafts = store
            .list_roles(&RoleQuery { status: Some("draft".into()), ..Default::default() }, PageRequest::new(1, 30))
            .await
            .unwrap();
        assert_eq!(drafts.total, 1);
        assert_eq!(drafts.items[0].name, "Analyst");

        let retail = store
            .list_roles(&RoleQuery { division: Some("Retail".into()), ..Default::default() }, PageRequest::new(1, 30))
            .await
            .unwrap();
        assert_eq!(retail.items[0].id, uuid(ROLE_B));
    }

    #[tokio::test]
    async fn vacancies_newest_first() {
        let store = store();
        let all = store.list_vacancies(&VacancyQuery::default(), PageRequest::new(1, 30)).await.unwrap();
        assert_eq!(all.items[0].status.as_str(), "open");
        let closed = store
            .list_vacancies(&VacancyQuery { status: Some("closed".into()), ..Default::default() }, PageRequest::new(1, 30))
            .await
            .unwrap();
        assert_eq!(closed.total, 1);
    }

    #[tokio::test]
    async fn toggle_updates_existing_pair_and_keeps_notes() {
        let store = store();
        let entry = store
            .toggle_succession(SuccessionToggle {
                employee_id: uuid(BO),
                target_role: uuid(ROLE_B),
                is_starred: false,
                notes: None,
            })
            .await
            .unwrap();
        assert!(!entry.is_starred);
        assert_eq!(entry.notes, "ready");

        let all = store.list_succession(&SuccessionQuery::default(), PageRequest::new(1, 30)).await.unwrap();
        assert_eq!(all.total, 1);
    }

    #[tokio::test]
    async fn toggle_inserts_new_pair() {
        let store = store();
        let entry = store
            .toggle_succession(SuccessionToggle {
                employee_id: uuid(CY),
                target_role: uuid(ROLE_A),
                is_starred: true,
                notes: None,
            })
            .await
            .unwrap();
        assert_eq!(entry.notes, "");

        let hq = store
            .list_succession(&SuccessionQuery { division: Some("HQ".into()), ..Default::default() }, PageRequest::new(1, 30))
            .await
            .unwrap();
        assert_eq!(hq.total, 1);
        assert_eq!(hq.items[0].employee_id, uuid(CY));
    }

    #[tokio::test]
    async fn toggle_rejects_unknown_employee_or_role() {
        let store = store();
        let missing_employee = store
            .toggle_succession(SuccessionToggle {
                employee_id: Uuid::new_v4(),
                target_role: uuid(ROLE_A),
                is_starred: true,
                notes: None,
            })
            .await;
        assert!(matches!(missing_employee, Err(DatabaseError::NotFound(m)) if m == "Employee not found"));

        let missing_role = store
            .toggle_succession(SuccessionToggle {
                employee_id: uuid(ANN),
                target_role: Uuid::new_v4(),
                is_starred: true,
                notes: None,
            })
            .await;
        assert!(matches!(missing_role, Err(DatabaseError::NotFound(m)) if m == "Role not found"));
    }

    #[tokio::test]
    async fn user_lookup_ignores_case() {
        let store = store();
        let user = store.find_user_by_email(" hr@nova.io ").await.unwrap().unwrap();
        assert_eq!(user.role, "hr");
        assert!(store.find_user_by_email("nobody@nova.io").await.unwrap().is_none());
    }
}
