use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::database::models::{Employee, Role, Succession, User, Vacancy};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON fixture: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML fixture: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported fixture format: {0}")]
    UnsupportedFormat(String),
}

/// A complete HR dataset held in memory.
///
/// Fixture files are either an object with any of the collections below or a
/// bare array, which is read as the employee list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub vacancies: Vec<Vacancy>,
    #[serde(default)]
    pub succession: Vec<Succession>,
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FixtureFile {
    Employees(Vec<Employee>),
    Full(Fixture),
}

impl From<FixtureFile> for Fixture {
    fn from(file: FixtureFile) -> Self {
        match file {
            FixtureFile::Employees(employees) => Fixture { employees, ..Default::default() },
            FixtureFile::Full(fixture) => fixture,
        }
    }
}

impl Fixture {
    pub fn from_json(content: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str::<FixtureFile>(content)?.into())
    }

    pub fn from_yaml(content: &str) -> Result<Self, FixtureError> {
        Ok(serde_yaml::from_str::<FixtureFile>(content)?.into())
    }

    /// Loads a fixture, choosing the parser from the file extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            other => Err(FixtureError::UnsupportedFormat(other.unwrap_or("<none>").to_string())),
        }
    }
}
