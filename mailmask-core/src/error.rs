use std::error::Error;
use thiserror::Error;

/// Failures that are not part of the dispatch status contract: backing-store
/// and mailer errors, and referential inconsistencies in stored records.
/// Expected outcomes (bad token, unknown sender, ownership or authorization
/// failures) are reported as status values, never as errors.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("store error: {0}")]
    Store(#[source] Box<dyn Error + Send + Sync>),
    #[error("mailer error: {0}")]
    Mailer(#[source] Box<dyn Error + Send + Sync>),
    #[error("user {0} not found")]
    UserNotFound(i64),
    #[error("alias {0} not found")]
    AliasNotFound(i64),
    #[error("contact {0} not found")]
    ContactNotFound(i64),
    #[error("internal error: {0}")]
    InternalError(#[source] Box<dyn Error + Send + Sync>),
}
