//! The module contains the error the engine can throw.
//!
//! Every error belongs to one [`ErrorKind`]:
//!
//! - [`KeyNotFound`] is a `NotFound`: the id does not resolve to a live row.
//! - [`ExistingKey`], [`InvalidName`], [`InvalidPrice`], [`InvalidReference`],
//!   [`HasDependents`] and [`InvalidFilter`] are `BadRequest`s caused by the
//!   submitted data.
//! - [`Unauthorized`] is raised at the HTTP boundary only.
//!
//! None of them is transient: retrying without changing the input fails again.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`InvalidName`]: EngineError::InvalidName
//!  [`InvalidPrice`]: EngineError::InvalidPrice
//!  [`InvalidReference`]: EngineError::InvalidReference
//!  [`HasDependents`]: EngineError::HasDependents
//!  [`InvalidFilter`]: EngineError::InvalidFilter
//!  [`Unauthorized`]: EngineError::Unauthorized
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} not found")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid price: {0}")]
    InvalidPrice(String),
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
    #[error("{0}")]
    HasDependents(String),
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Coarse classification used by callers that only care about the outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    Unauthorized,
    Internal,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::KeyNotFound(_) => ErrorKind::NotFound,
            Self::ExistingKey(_)
            | Self::InvalidName(_)
            | Self::InvalidPrice(_)
            | Self::InvalidReference(_)
            | Self::HasDependents(_)
            | Self::InvalidFilter(_) => ErrorKind::BadRequest,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Database(_) => ErrorKind::Internal,
        }
    }

    /// Translate a unique index violation raised by the store into the same
    /// duplicate-name error the service reports after its own check.
    pub(crate) fn from_write(err: DbErr, name: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::ExistingKey(name.to_string()),
            _ => Self::Database(err),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidPrice(a), Self::InvalidPrice(b)) => a == b,
            (Self::InvalidReference(a), Self::InvalidReference(b)) => a == b,
            (Self::HasDependents(a), Self::HasDependents(b)) => a == b,
            (Self::InvalidFilter(a), Self::InvalidFilter(b)) => a == b,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_group_validation_failures_as_bad_request() {
        assert_eq!(
            EngineError::KeyNotFound("dish 1".to_string()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            EngineError::ExistingKey("Flan".to_string()).kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(
            EngineError::HasDependents("x".to_string()).kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(
            EngineError::Database(DbErr::Custom("boom".to_string())).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn unrelated_write_errors_stay_database_errors() {
        let err = EngineError::from_write(DbErr::Custom("boom".to_string()), "Flan");
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
