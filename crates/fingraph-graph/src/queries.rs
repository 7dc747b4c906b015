//! Read operations for single nodes.

use fingraph_core::{Labels, NodeId, NodeRecord, PropertyMap};
use serde_json::Value;

use crate::client::GraphClient;
use crate::convert::{column, json_column, record_column};
use crate::error::{FailureCause, QueryExecutionError};
use crate::mutations::NODE_PROJECTION;
use crate::statement::{quote_key, Statement};

impl GraphClient {
    // ── Lookups ──────────────────────────────────────────────────

    /// Id of the first node whose properties equal every entry of `filter`,
    /// optionally restricted to `label`. Fails when nothing matches.
    pub async fn find_node_id_by_property(
        &self,
        filter: &PropertyMap,
        label: Option<&Labels>,
    ) -> Result<NodeId, QueryExecutionError> {
        let stmt = find_by_property_statement(filter, label);
        let result = self.execute(&stmt).await?;
        result
            .first()
            .and_then(|row| column::<i64>(row, "id"))
            .map(NodeId)
            .map_err(|c| stmt.failure(c))
    }

    /// Full property map of a node. Fails when the node does not exist.
    pub async fn get_node_properties(&self, id: NodeId) -> Result<PropertyMap, QueryExecutionError> {
        let stmt = node_properties_statement(id);
        let result = self.execute(&stmt).await?;
        result
            .first()
            .and_then(|row| match json_column(row, "props")? {
                Value::Object(map) => Ok(map),
                other => Err(FailureCause::column("props", format!("expected a map, got {other}"))),
            })
            .map_err(|c| stmt.failure(c))
    }

    /// Id, labels, and properties of a node. Fails when the node does not exist.
    pub async fn get_node(&self, id: NodeId) -> Result<NodeRecord, QueryExecutionError> {
        let stmt = node_statement(id);
        let result = self.execute(&stmt).await?;
        result
            .first()
            .and_then(|row| record_column::<NodeRecord>(row, "node"))
            .map_err(|c| stmt.failure(c))
    }
}

// ── Statements ───────────────────────────────────────────────────

pub(crate) fn find_by_property_statement(filter: &PropertyMap, label: Option<&Labels>) -> Statement {
    let labels = label.map(Labels::as_pattern).unwrap_or_default();
    let conditions: Vec<String> = filter
        .keys()
        .enumerate()
        .map(|(i, key)| format!("n.{} = $p{i}", quote_key(key)))
        .collect();
    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let cypher = format!(
        "MATCH (n{labels}){where_clause}
         RETURN id(n) AS id
         LIMIT 1"
    );

    filter
        .values()
        .enumerate()
        .fold(Statement::new("find_node_id_by_property", cypher), |stmt, (i, value)| {
            stmt.param(&format!("p{i}"), value.clone())
        })
}

pub(crate) fn node_properties_statement(id: NodeId) -> Statement {
    Statement::new(
        "get_node_properties",
        "MATCH (n) WHERE id(n) = $id
         RETURN properties(n) AS props",
    )
    .param("id", id.0)
}

pub(crate) fn node_statement(id: NodeId) -> Statement {
    Statement::new(
        "get_node",
        format!(
            "MATCH (n) WHERE id(n) = $id
             RETURN {NODE_PROJECTION} AS node"
        ),
    )
    .param("id", id.0)
}
