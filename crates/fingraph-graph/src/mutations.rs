//! Write operations for the graph.
//!
//! Nodes are addressed by their database id. Relationships between existing
//! nodes use MERGE so repeating a call never duplicates an edge.

use fingraph_core::{Direction, Labels, NodeId, NodeRecord, PropertyMap, RelType};
use serde_json::Value;

use crate::client::GraphClient;
use crate::convert::{column, record_column};
use crate::error::QueryExecutionError;
use crate::statement::{quote_key, Statement};

/// Map projection returned by statements that hand back a whole node.
pub(crate) const NODE_PROJECTION: &str = "{id: id(n), labels: labels(n), props: properties(n)}";

impl GraphClient {
    // ── Node Creation ────────────────────────────────────────────

    /// Create a node with the given labels and properties. Returns its id.
    pub async fn create_node(
        &self,
        labels: &Labels,
        properties: &PropertyMap,
    ) -> Result<NodeId, QueryExecutionError> {
        let stmt = create_node_statement(labels, properties);
        let result = self.execute(&stmt).await?;
        result
            .first()
            .and_then(|row| column::<i64>(row, "id"))
            .map(NodeId)
            .map_err(|c| stmt.failure(c))
    }

    /// Create a node and, in the same statement, a relationship between it
    /// and an existing node. Returns the new node's id.
    ///
    /// [`Direction::Outgoing`] points from the existing node to the new one.
    /// Fails if `existing` does not exist (nothing is created in that case).
    pub async fn create_node_with_relationship_to(
        &self,
        labels: &Labels,
        properties: &PropertyMap,
        rel_type: &RelType,
        existing: NodeId,
        direction: Direction,
    ) -> Result<NodeId, QueryExecutionError> {
        let stmt = attach_node_statement(labels, properties, rel_type, existing, direction);
        let result = self.execute(&stmt).await?;
        result
            .first()
            .and_then(|row| column::<i64>(row, "id"))
            .map(NodeId)
            .map_err(|c| stmt.failure(c))
    }

    // ── Relationships ────────────────────────────────────────────

    /// Merge a directed relationship `source -[rel_type]-> target`.
    ///
    /// Idempotent. If either node is missing nothing happens.
    pub async fn create_relationship(
        &self,
        source: NodeId,
        target: NodeId,
        rel_type: &RelType,
    ) -> Result<(), QueryExecutionError> {
        let stmt = merge_relationship_statement(source, target, rel_type);
        self.execute(&stmt).await?;
        Ok(())
    }

    // ── Properties ───────────────────────────────────────────────

    /// Set one property on a node and return the updated node.
    pub async fn set_node_property(
        &self,
        id: NodeId,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<NodeRecord, QueryExecutionError> {
        let stmt = set_property_statement(id, name, value.into());
        let result = self.execute(&stmt).await?;
        result
            .first()
            .and_then(|row| record_column::<NodeRecord>(row, "node"))
            .map_err(|c| stmt.failure(c))
    }
}

// ── Statements ───────────────────────────────────────────────────

pub(crate) fn create_node_statement(labels: &Labels, properties: &PropertyMap) -> Statement {
    let cypher = format!(
        "CREATE (n{labels} $props)
         RETURN id(n) AS id",
        labels = labels.as_pattern()
    );
    Statement::new("create_node", cypher).param("props", Value::Object(properties.clone()))
}

pub(crate) fn attach_node_statement(
    labels: &Labels,
    properties: &PropertyMap,
    rel_type: &RelType,
    existing: NodeId,
    direction: Direction,
) -> Statement {
    let rel = match direction {
        Direction::Outgoing => format!("-[:{rel_type}]->"),
        Direction::Incoming => format!("<-[:{rel_type}]-"),
    };
    let cypher = format!(
        "MATCH (n) WHERE id(n) = $existing
         CREATE (n){rel}(m{labels} $props)
         RETURN id(m) AS id",
        labels = labels.as_pattern()
    );
    Statement::new("create_node_with_relationship_to", cypher)
        .param("existing", existing.0)
        .param("props", Value::Object(properties.clone()))
}

pub(crate) fn merge_relationship_statement(
    source: NodeId,
    target: NodeId,
    rel_type: &RelType,
) -> Statement {
    let cypher = format!(
        "MATCH (a) WHERE id(a) = $source
         MATCH (b) WHERE id(b) = $target
         MERGE (a)-[:{rel_type}]->(b)"
    );
    Statement::new("create_relationship", cypher)
        .param("source", source.0)
        .param("target", target.0)
}

pub(crate) fn set_property_statement(id: NodeId, name: &str, value: Value) -> Statement {
    let cypher = format!(
        "MATCH (n) WHERE id(n) = $id
         SET n.{key} = $value
         RETURN {NODE_PROJECTION} AS node",
        key = quote_key(name)
    );
    Statement::new("set_node_property", cypher)
        .param("id", id.0)
        .param("value", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> PropertyMap {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_create_node_binds_properties() {
        let labels = Labels::parse("Person:Donor").unwrap();
        let stmt = create_node_statement(&labels, &props(json!({"name": "Alice"})));

        assert!(stmt.text().contains("CREATE (n:Person:Donor $props)"));
        assert!(stmt.text().contains("RETURN id(n) AS id"));
        assert!(!stmt.text().contains("Alice"));
        assert_eq!(stmt.params()["props"], json!({"name": "Alice"}));
        assert_eq!(stmt.operation(), "create_node");
    }

    #[test]
    fn test_relationship_uses_merge() {
        let rel = RelType::new("KNOWS").unwrap();
        let stmt = merge_relationship_statement(NodeId(1), NodeId(2), &rel);

        assert!(stmt.text().contains("MERGE (a)-[:KNOWS]->(b)"));
        assert!(!stmt.text().contains("CREATE"));
        assert_eq!(stmt.params()["source"], 1);
        assert_eq!(stmt.params()["target"], 2);
    }

    #[test]
    fn test_attach_node_direction() {
        let labels = Labels::single("Contribution").unwrap();
        let rel = RelType::new("CONTRIBUTION_TO").unwrap();
        let empty = PropertyMap::new();

        let forward = attach_node_statement(&labels, &empty, &rel, NodeId(9), Direction::Outgoing);
        assert!(forward
            .text()
            .contains("CREATE (n)-[:CONTRIBUTION_TO]->(m:Contribution $props)"));
        assert_eq!(forward.params()["existing"], 9);

        let backward = attach_node_statement(&labels, &empty, &rel, NodeId(9), Direction::Incoming);
        assert!(backward
            .text()
            .contains("CREATE (n)<-[:CONTRIBUTION_TO]-(m:Contribution $props)"));
    }

    #[test]
    fn test_set_property_quotes_name_and_binds_value() {
        let stmt = set_property_statement(NodeId(5), "age", json!(30));

        assert!(stmt.text().contains("SET n.`age` = $value"));
        assert!(stmt.text().contains("AS node"));
        assert_eq!(stmt.params()["value"], 30);
        assert_eq!(stmt.params()["id"], 5);

        let hostile = set_property_statement(NodeId(5), "x` = 1 DETACH DELETE n //", json!(1));
        assert!(hostile.text().contains("SET n.`x`` = 1 DETACH DELETE n //` = $value"));
    }
}
