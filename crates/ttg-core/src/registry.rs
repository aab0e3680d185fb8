//! Registered project names.

use serde::{Deserialize, Serialize};

use crate::types::{CATCH_ALL_PROJECT, ValidationError, validate_project_name};

/// Ordered list of known project names.
///
/// Serialized as a plain JSON array of strings. Names are compared exactly,
/// with no case folding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectRegistry {
    projects: Vec<String>,
}

/// Checks `name` against `list`, accepting the catch-all unconditionally.
pub fn validate(name: &str, list: &[String]) -> Result<(), ValidationError> {
    if name == CATCH_ALL_PROJECT || list.iter().any(|p| p == name) {
        Ok(())
    } else {
        Err(ValidationError::UnknownProject {
            name: name.to_string(),
        })
    }
}

impl ProjectRegistry {
    pub const fn new(projects: Vec<String>) -> Self {
        Self { projects }
    }

    /// Registered names in insertion order.
    pub fn names(&self) -> &[String] {
        &self.projects
    }

    pub fn contains(&self, name: &str) -> bool {
        self.projects.iter().any(|p| p == name)
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Succeeds if `name` is registered or is the catch-all.
    pub fn validate(&self, name: &str) -> Result<(), ValidationError> {
        validate(name, &self.projects)
    }

    /// Appends a new project name.
    pub fn add(&mut self, name: &str) -> Result<(), ValidationError> {
        validate_project_name(name)?;
        if self.contains(name) {
            return Err(ValidationError::ProjectExists {
                name: name.to_string(),
            });
        }
        self.projects.push(name.to_string());
        Ok(())
    }

    /// Removes a registered project name.
    pub fn remove(&mut self, name: &str) -> Result<(), ValidationError> {
        let Some(index) = self.projects.iter().position(|p| p == name) else {
            return Err(ValidationError::ProjectMissing {
                name: name.to_string(),
            });
        };
        self.projects.remove(index);
        Ok(())
    }
}
