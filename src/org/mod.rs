//! Organizational hierarchy aggregation.
//!
//! Turns a flat, already-filtered slice of employees into the org tree
//! payload served by `GET /api/v1/org/tree`.

pub mod hierarchy;

pub use hierarchy::{build, EmployeeRecord, HierarchyView, OrgNode};
