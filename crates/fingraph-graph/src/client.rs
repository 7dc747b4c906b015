//! Neo4j connection management and the transactional execution primitive.

use fingraph_core::Neo4jConfig;
use neo4rs::{ConfigBuilder, Graph, Row, Txn};

use crate::error::{FailureCause, GraphError, QueryExecutionError};
use crate::statement::Statement;

/// Rows produced by one committed statement.
#[derive(Default)]
pub struct QueryResult {
    rows: Vec<Row>,
}

impl std::fmt::Debug for QueryResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryResult")
            .field("rows", &self.rows.len())
            .finish()
    }
}

impl QueryResult {
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row, or [`FailureCause::EmptyResult`].
    pub fn first(&self) -> Result<&Row, FailureCause> {
        self.rows.first().ok_or(FailureCause::EmptyResult)
    }
}

/// Neo4j graph client.
///
/// Owns one driver handle for its whole lifetime. Clone is cheap (the
/// driver's pool is shared).
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
    config: Neo4jConfig,
}

impl GraphClient {
    /// Build the driver for the configured host.
    ///
    /// Fails fast when no password is configured. Reachability and
    /// credentials are only checked when the first statement runs.
    pub async fn connect(config: &Neo4jConfig) -> Result<Self, GraphError> {
        let (user, password) = config.credentials()?;
        let uri = config.bolt_uri();

        let neo_config = ConfigBuilder::default()
            .uri(&uri)
            .user(user)
            .password(password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(uri = %uri, user, "Initialized Neo4j driver");
        Ok(Self {
            graph,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &Neo4jConfig {
        &self.config
    }

    /// Run one statement in its own transaction.
    ///
    /// All rows are drained before the commit. On any failure the transaction
    /// is rolled back best-effort; a failed rollback is logged and dropped so
    /// the original failure is what the caller sees. Nothing is retried.
    pub async fn execute(&self, statement: &Statement) -> Result<QueryResult, QueryExecutionError> {
        tracing::debug!(
            operation = statement.operation(),
            query = statement.text(),
            "Executing statement"
        );

        let mut txn = self
            .graph
            .start_txn()
            .await
            .map_err(|e| statement.failure(e))?;

        match drain(&mut txn, statement).await {
            Ok(rows) => {
                txn.commit().await.map_err(|e| {
                    tracing::warn!(operation = statement.operation(), error = %e, "Commit failed");
                    statement.failure(e)
                })?;
                Ok(QueryResult { rows })
            }
            Err(e) => {
                tracing::warn!(
                    operation = statement.operation(),
                    query = statement.text(),
                    error = %e,
                    "Statement failed, rolling back"
                );
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::debug!(error = %rollback_err, "Rollback failed, abandoning transaction");
                }
                Err(statement.failure(e))
            }
        }
    }
}

async fn drain(txn: &mut Txn, statement: &Statement) -> Result<Vec<Row>, neo4rs::Error> {
    let mut stream = txn.execute(statement.to_query()).await?;
    let mut rows = Vec::new();
    while let Some(row) = stream.next(txn.handle()).await? {
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_has_no_first_row() {
        let result = QueryResult::default();
        assert!(result.is_empty());
        assert!(matches!(result.first(), Err(FailureCause::EmptyResult)));
    }

    #[tokio::test]
    async fn test_connect_without_password_fails_fast() {
        let err = GraphClient::connect(&Neo4jConfig::default())
            .await
            .err()
            .expect("connect must fail without a password");
        assert!(matches!(err, GraphError::Config(_)));
        assert!(err.to_string().contains("NEO4J_PASSWORD"));
    }
}
