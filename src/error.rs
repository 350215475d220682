//! Query validation errors.
//!
//! Everything else in the crate reports failures through `anyhow`; only
//! input validation gets a typed error, because the HTTP layer and the CLI
//! need to tell a rejected query apart from an infrastructure failure.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The query was missing or only whitespace.
    #[error("query must not be empty")]
    Empty,
}
