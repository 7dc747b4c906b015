//! fingraph-graph: Neo4j client for the campaign-finance graph.
//!
//! Every read and write goes through [`GraphClient::execute`], which runs a
//! single statement inside its own transaction and either commits it or
//! rolls it back. The helper methods in [`mutations`], [`queries`] and
//! [`campaign`] are thin templates over that primitive.

pub mod campaign;
pub mod client;
pub mod convert;
pub mod error;
pub mod health;
pub mod mutations;
pub mod queries;
pub mod statement;

pub use client::{GraphClient, QueryResult};
pub use error::{FailureCause, GraphError, QueryExecutionError};
pub use statement::Statement;
