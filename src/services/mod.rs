pub mod fixture;
pub mod memory_store;
pub mod pg_store;
pub mod query;

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::models::{Employee, Role, Succession, User, Vacancy};
use crate::database::{DatabaseError, Page};

pub use fixture::{Fixture, FixtureError};
pub use memory_store::MemoryStore;
pub use pg_store::PgStore;
pub use query::{EmployeeQuery, PageRequest, RoleQuery, SuccessionQuery, SuccessionToggle, VacancyQuery};

/// Read and write access to HR data.
///
/// Implemented over PostgreSQL for deployments and over an in-memory fixture
/// for demo mode, the CLI and tests. Both must apply identical filter and
/// ordering rules.
#[async_trait]
pub trait HrStore: Send + Sync {
    /// Short backend label for logs and `/dbz`
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<(), DatabaseError>;

    async fn list_employees(&self, query: &EmployeeQuery, page: PageRequest) -> Result<Page<Employee>, DatabaseError>;

    /// Every employee matching `query`, ordered by name
    async fn select_employees(&self, query: &EmployeeQuery) -> Result<Vec<Employee>, DatabaseError>;

    async fn get_employee(&self, id: Uuid) -> Result<Option<Employee>, DatabaseError>;

    async fn list_roles(&self, query: &RoleQuery, page: PageRequest) -> Result<Page<Role>, DatabaseError>;

    async fn get_role(&self, id: Uuid) -> Result<Option<Role>, DatabaseError>;

    async fn list_vacancies(&self, query: &VacancyQuery, page: PageRequest) -> Result<Page<Vacancy>, DatabaseError>;

    async fn list_succession(&self, query: &SuccessionQuery, page: PageRequest) -> Result<Page<Succession>, DatabaseError>;

    /// Sets the star flag on an existing pair or creates it.
    /// Fails with `NotFound` when the employee or role does not exist.
    async fn toggle_succession(&self, input: SuccessionToggle) -> Result<Succession, DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
}
