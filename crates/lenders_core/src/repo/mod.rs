//! Access layer: per-entity repository contracts and their file-backed
//! store implementations.
//!
//! # Responsibility
//! - Define the operation set the request layer may call per entity type.
//! - Keep JSON persistence and locking inside the store implementations.
//!
//! # Invariants
//! - Absent ids surface as `RepoError::NotFound`, never as panics.
//! - Every store serializes access through its own lock; stores never
//!   share a lock with each other.
//! - A write that fails to persist leaves memory as it was before the call.

pub mod admin_repo;
pub mod buyer_repo;
pub mod house_repo;
pub mod investment_repo;
pub mod keyed_store;
pub mod lender_repo;
pub mod user_repo;

use crate::model::house::House;
use crate::model::validation::ValidationError;
use crate::model::RecordId;
use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    NotFound { entity: &'static str, id: RecordId },
    /// Precondition failed, such as a wrong current password.
    Conflict(String),
    Validation(ValidationError),
    Storage(StorageError),
    /// Acceptance failed and the taken application could not be put back.
    /// `application` is the only remaining copy.
    AcceptanceLost {
        application: Box<House>,
        cause: Box<RepoError>,
        restore: Box<RepoError>,
    },
}

/// Coarse failure class used by callers to choose a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Storage,
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict(_) | Self::Validation(_) => ErrorKind::Conflict,
            Self::Storage(_) | Self::AcceptanceLost { .. } => ErrorKind::Storage,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Conflict(message) => write!(f, "conflict: {message}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::AcceptanceLost {
                application,
                cause,
                restore,
            } => write!(
                f,
                "acceptance of application {} failed ({cause}) and it could not be restored ({restore})",
                application.id
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::AcceptanceLost { cause, .. } => Some(cause.as_ref()),
            Self::NotFound { .. } | Self::Conflict(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}
