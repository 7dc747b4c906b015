//! Error types for graph operations.

use fingraph_core::FinGraphError;
use thiserror::Error;

/// Errors raised while building a [`GraphClient`](crate::GraphClient).
#[derive(Debug, Error)]
pub enum GraphError {
    #[error(transparent)]
    Config(#[from] FinGraphError),

    #[error("Neo4j connection error: {0}")]
    Connection(String),
}

/// The single failure shape of every statement run through the client.
///
/// Tagged with the operation that issued the statement and its query text.
#[derive(Debug, Error)]
#[error("{operation} failed: {cause} (query: {query})")]
pub struct QueryExecutionError {
    pub operation: &'static str,
    pub query: String,
    #[source]
    pub cause: FailureCause,
}

/// Underlying reason a statement failed.
#[derive(Debug, Error)]
pub enum FailureCause {
    /// Rejected by the database, or lost in transport mid-transaction.
    #[error("Neo4j query error: {0}")]
    Database(#[from] neo4rs::Error),

    #[error("query returned no rows")]
    EmptyResult,

    #[error("could not read column `{column}`: {message}")]
    Column { column: String, message: String },
}

impl FailureCause {
    pub(crate) fn column(column: &str, message: impl ToString) -> Self {
        Self::Column {
            column: column.to_string(),
            message: message.to_string(),
        }
    }
}
