//! Validated name newtypes
//!
//! Region and group names are lookup keys into the host. They are trimmed
//! and must be non-empty; comparison is exact and case-sensitive.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::error::PolicyError;

/// Maximum length for region and group names
const MAX_NAME_LENGTH: usize = 200;

fn validate(kind: &str, name: String) -> Result<String, PolicyError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PolicyError::InvalidName(format!("{kind} name cannot be empty")));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(PolicyError::InvalidName(format!(
            "{kind} name cannot exceed {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// RegionName
// ============================================================================

/// Name of a region known to the host region engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegionName(String);

impl RegionName {
    /// Create a new validated region name.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::InvalidName` if the name is empty after trimming
    /// or exceeds 200 characters.
    pub fn new(name: impl Into<String>) -> Result<Self, PolicyError> {
        validate("Region", name.into()).map(Self)
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for RegionName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RegionName {
    type Error = PolicyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RegionName> for String {
    fn from(name: RegionName) -> String {
        name.0
    }
}

// ============================================================================
// GroupName
// ============================================================================

/// Name of a host permission group. Opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupName(String);

impl GroupName {
    /// Create a new validated group name.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::InvalidName` if the name is empty after trimming
    /// or exceeds 200 characters.
    pub fn new(name: impl Into<String>) -> Result<Self, PolicyError> {
        validate("Group", name.into()).map(Self)
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for GroupName {
    type Error = PolicyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<GroupName> for String {
    fn from(name: GroupName) -> String {
        name.0
    }
}
