//! Error types for region policy operations
//!
//! One enum covers every failure an administrator or the host can observe.
//! Storage failures arrive already rendered to text so the domain stays free
//! of any database dependency.

use thiserror::Error;

/// Errors raised by policy definition, mutation, and loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The host region engine does not know a region by this name.
    #[error("No regions under the name of '{0}'.")]
    UnknownRegion(String),

    /// The region is already policy-bearing.
    #[error("Region '{0}' is already defined as an XRegion.")]
    AlreadyDefined(String),

    /// The region exists in the host but carries no policy.
    #[error("Region '{0}' is not defined as an XRegion.")]
    NotDefined(String),

    /// A flag token did not match the canonical table.
    #[error("Invalid flag '{token}'! Valid flags: {valid}")]
    UnknownFlag { token: String, valid: String },

    /// The host has no permission group by this name.
    #[error("No groups under the name of '{0}'.")]
    UnknownGroup(String),

    /// A ban-list identifier was not an integer.
    #[error("Invalid identifier '{0}'! Identifiers must be integers.")]
    InvalidId(String),

    /// A name failed validation (empty after trimming, or too long).
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Durable storage could not be opened or prepared.
    #[error("Policy storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A stored policy references a region the host no longer knows.
    #[error("Policy for region '{0}' is dangling: the region no longer exists")]
    DanglingPolicy(String),

    /// A runtime storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PolicyError {
    /// Create an unknown-flag error carrying the canonical token list.
    pub fn unknown_flag(token: impl Into<String>) -> Self {
        Self::UnknownFlag {
            token: token.into(),
            valid: crate::flags::RegionFlags::valid_tokens().join(", "),
        }
    }

    /// Create a storage error from any displayable cause.
    pub fn storage(message: impl ToString) -> Self {
        Self::Storage(message.to_string())
    }
}
