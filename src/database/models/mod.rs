pub mod employee;
pub mod role;
pub mod succession;
pub mod user;
pub mod vacancy;

pub use employee::Employee;
pub use role::{Role, RoleStatus};
pub use succession::Succession;
pub use user::User;
pub use vacancy::{Vacancy, VacancyStatus};
