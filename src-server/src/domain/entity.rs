//! Shared domain vocabulary
//!
//! The entity contract every stored record satisfies, the error type the
//! store reports with, and the clock the store stamps rows with.

use chrono::{DateTime, SubsecRound, Utc};
use thiserror::Error;

/// A stored record with a stable identity
pub trait Entity: Sized + Send + Sync + Clone {
    /// Integer row ids for catalog records, opaque strings for users
    type Id: Clone + Eq + std::hash::Hash + Send + Sync;

    fn id(&self) -> Self::Id;
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Failures reported by the store.
///
/// The payload is a caller-facing message for every variant except
/// `Internal`, whose text is only ever logged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage failure: {0}")]
    Internal(String),
}

/// Current time at the precision the store keeps (milliseconds)
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
