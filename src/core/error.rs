//! Error types shared by the stores, the session and the workspace

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised by domain operations
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum AeroError {
    #[error("{kind} '{key}' already exists")]
    #[diagnostic(
        code(aerocode::store::duplicate_key),
        help("choose a different identifier")
    )]
    DuplicateKey { kind: &'static str, key: String },

    #[error("invalid {kind} key: '{key}'")]
    #[diagnostic(code(aerocode::store::invalid_key))]
    InvalidKey { kind: &'static str, key: String },

    #[error("{kind}: required field '{field}' is missing")]
    #[diagnostic(code(aerocode::store::missing_field))]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("{kind} '{key}' not found")]
    #[diagnostic(code(aerocode::store::not_found))]
    NotFound { kind: &'static str, key: String },

    #[error("not logged in")]
    #[diagnostic(
        code(aerocode::session::not_authenticated),
        help("log in with `aerocode login <user>` or pass --user/--password")
    )]
    NotAuthenticated,

    #[error("user '{user}' ({level}) is not allowed to {action}")]
    #[diagnostic(code(aerocode::session::permission_denied))]
    PermissionDenied {
        user: String,
        level: String,
        action: String,
    },

    #[error("invalid username or password")]
    #[diagnostic(code(aerocode::session::invalid_credentials))]
    InvalidCredentials,

    #[error("cannot {action} {subject}: {reason}")]
    #[diagnostic(code(aerocode::invalid_transition))]
    InvalidTransition {
        subject: String,
        action: &'static str,
        reason: String,
    },

    #[error("test {id} was already recorded as {result}")]
    #[diagnostic(
        code(aerocode::test::already_recorded),
        help("only pending tests can receive a result")
    )]
    AlreadyRecorded { id: u32, result: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(aerocode::config))]
    Config(String),
}

impl AeroError {
    pub fn not_found(kind: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub fn missing(kind: &'static str, field: &'static str) -> Self {
        Self::MissingField { kind, field }
    }

    /// True when the error only says the entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type AeroResult<T> = std::result::Result<T, AeroError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_message() {
        let err = AeroError::DuplicateKey {
            kind: "aircraft",
            key: "E175".to_string(),
        };
        assert_eq!(err.to_string(), "aircraft 'E175' already exists");
    }

    #[test]
    fn test_not_found_helper() {
        let err = AeroError::not_found("part", 42);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "part '42' not found");
    }

    #[test]
    fn test_missing_field_message() {
        let err = AeroError::missing("employee", "username");
        assert!(err.to_string().contains("username"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_diagnostic_code() {
        let err = AeroError::NotAuthenticated;
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("aerocode::session::not_authenticated"));
    }
}
