//! The module contains the errors the ledger engine can raise.
//!
//! Every write operation runs inside one database transaction; any of these
//! errors aborts and rolls back that whole transaction. Nothing is partially
//! committed and nothing is retried here — retry, if any, belongs to the
//! caller.
use sea_orm::DbErr;
use thiserror::Error;

use crate::tally::TallyCheck;

/// Ledger engine custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The caller violated an input contract the upstream validation layer
    /// should have enforced (empty entry set, unknown kind string, missing
    /// term length).
    #[error("validation: {0}")]
    Validation(String),
    /// One of the balance conditions failed for the surviving entry set.
    #[error("tally mismatch: {0}")]
    TallyMismatch(TallyCheck),
    /// A write affected fewer rows than requested (lost update or stale
    /// reference).
    #[error("persistence: {0}")]
    Persistence(String),
    #[error("code \"{0}\" already in use")]
    CodeTaken(String),
    #[error("\"{0}\" not found")]
    KeyNotFound(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::TallyMismatch(a), Self::TallyMismatch(b)) => a == b,
            (Self::Persistence(a), Self::Persistence(b)) => a == b,
            (Self::CodeTaken(a), Self::CodeTaken(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
