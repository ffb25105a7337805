use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::query::{
    EmployeeQuery, PageRequest, RoleQuery, SuccessionQuery, SuccessionToggle, VacancyQuery, EMPLOYEE_ORDER, ROLE_ORDER,
    SUCCESSION_ORDER, VACANCY_ORDER,
};
use super::HrStore;
use crate::config::FilterConfig;
use crate::database::models::{Employee, Role, Succession, User, Vacancy};
use crate::database::{DatabaseError, DatabaseManager, Page, Repository};

const EMPLOYEES: &str = "employees";
const ROLES: &str = "roles";
const VACANCIES: &str = "vacancies";
const SUCCESSION: &str = "succession";

/// `HrStore` backed by PostgreSQL
pub struct PgStore {
    db: DatabaseManager,
    filter_config: FilterConfig,
}

impl PgStore {
    pub fn new(db: DatabaseManager, filter_config: FilterConfig) -> Self {
        Self { db, filter_config }
    }

    fn pool(&self) -> PgPool {
        self.db.pool().clone()
    }

    fn repo<T>(&self, table: &'static str) -> Repository<T>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        Repository::new(table, self.pool(), self.filter_config.clone())
    }

    async fn division_role_ids(&self, division: &str) -> Result<Vec<String>, DatabaseError> {
        let roles = self
            .repo::<Role>(ROLES)
            .select_where(json!({ "division": division }), ROLE_ORDER)
            .await?;
        Ok(roles.into_iter().map(|role| role.id.to_string()).collect())
    }
}

#[async_trait]
impl HrStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.db.health_check().await
    }

    async fn list_employees(&self, query: &EmployeeQuery, page: PageRequest) -> Result<Page<Employee>, DatabaseError> {
        self.repo::<Employee>(EMPLOYEES)
            .select_page(query.where_clause(), EMPLOYEE_ORDER, page.page, page.per_page)
            .await
    }

    async fn select_employees(&self, query: &EmployeeQuery) -> Result<Vec<Employee>, DatabaseError> {
        let employees = self
            .repo::<Employee>(EMPLOYEES)
            .select_where(query.where_clause(), EMPLOYEE_ORDER)
            .await?;
        debug!("Selected {} employees for {:?}", employees.len(), query);
        Ok(employees)
    }

    async fn get_employee(&self, id: Uuid) -> Result<Option<Employee>, DatabaseError> {
        self.repo::<Employee>(EMPLOYEES).select_id(id).await
    }

    async fn list_roles(&self, query: &RoleQuery, page: PageRequest) -> Result<Page<Role>, DatabaseError> {
        self.repo::<Role>(ROLES)
            .select_page(query.where_clause(), ROLE_ORDER, page.page, page.per_page)
            .await
    }

    async fn get_role(&self, id: Uuid) -> Result<Option<Role>, DatabaseError> {
        self.repo::<Role>(ROLES).select_id(id).await
    }

    async fn list_vacancies(&self, query: &VacancyQuery, page: PageRequest) -> Result<Page<Vacancy>, DatabaseError> {
        self.repo::<Vacancy>(VACANCIES)
            .select_page(query.where_clause(), VACANCY_ORDER, page.page, page.per_page)
            .await
    }

    async fn list_succession(&self, query: &SuccessionQuery, page: PageRequest) -> Result<Page<Succession>, DatabaseError> {
        let role_ids = match query.division() {
            Some(division) => Some(self.division_role_ids(division).await?),
            None => None,
        };
        self.repo::<Succession>(SUCCESSION)
            .select_page(query.where_clause(role_ids.as_deref()), SUCCESSION_ORDER, page.page, page.per_page)
            .await
    }

    async fn toggle_succession(&self, input: SuccessionToggle) -> Result<Succession, DatabaseError> {
        if self.get_employee(input.employee_id).await?.is_none() {
            return Err(DatabaseError::NotFound("Employee not found".to_string()));
        }
        if self.get_role(input.target_role).await?.is_none() {
            return Err(DatabaseError::NotFound("Role not found".to_string()));
        }

        let mut tx = self.db.pool().begin().await?;

        let existing: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM succession WHERE employee_id = $1 AND target_role = $2 LIMIT 1 FOR UPDATE",
        )
        .bind(input.employee_id)
        .bind(input.target_role)
        .fetch_optional(&mut *tx)
        .await?;

        let entry = match existing {
            Some((id,)) => {
                sqlx::query_as::<_, Succession>(
                    "UPDATE succession SET is_starred = $1, notes = COALESCE($2, notes) WHERE id = $3 RETURNING *",
                )
                .bind(input.is_starred)
                .bind(input.notes.as_deref())
                .bind(id)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                sqlx::query_as::<_, Succession>(
                    "INSERT INTO succession (id, employee_id, target_role, is_starred, notes, created_at) \
                     VALUES ($1, $2, $3, $4, $5, now()) RETURNING *",
                )
                .bind(Uuid::new_v4())
                .bind(input.employee_id)
                .bind(input.target_role)
                .bind(input.is_starred)
                .bind(input.notes.unwrap_or_default())
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;
        Ok(entry)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(email) = $1 LIMIT 1")
            .bind(email.trim().to_lowercase())
            .fetch_optional(self.db.pool())
            .await?;
        Ok(user)
    }
}
