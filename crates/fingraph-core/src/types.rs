//! Core domain types for the campaign-finance graph.
//!
//! Identifiers that end up inside query text (labels, relationship types) are
//! validated on construction. Everything else travels as query parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FinGraphError, Result};

/// Property name → value map of a node, in JSON form.
pub type PropertyMap = serde_json::Map<String, serde_json::Value>;

// ── Identifiers ───────────────────────────────────────────────────

/// Internal identifier the database assigns to a node (`id(n)`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A non-empty set of node labels, written colon-delimited (`Committee:PAC`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Labels(Vec<String>);

impl Labels {
    /// Parse a colon-delimited label set. Empty segments are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let labels = raw
            .split(':')
            .map(|label| validate_identifier("label", label.trim()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self(labels))
    }

    /// Single-label set.
    pub fn single(label: &str) -> Result<Self> {
        Ok(Self(vec![validate_identifier("label", label)?]))
    }

    /// Pattern suffix for a node variable, e.g. `:Committee:PAC`.
    pub fn as_pattern(&self) -> String {
        self.0.iter().map(|l| format!(":{l}")).collect()
    }
}

impl fmt::Display for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(":"))
    }
}

impl FromStr for Labels {
    type Err = FinGraphError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A relationship type name such as `CONTRIBUTION_TO`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelType(String);

impl RelType {
    pub fn new(raw: &str) -> Result<Self> {
        validate_identifier("relationship type", raw.trim()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RelType {
    type Err = FinGraphError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

fn validate_identifier(kind: &'static str, raw: &str) -> Result<String> {
    let mut chars = raw.chars();
    let valid_head = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if valid_head && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(raw.to_string())
    } else {
        Err(FinGraphError::InvalidIdentifier {
            kind,
            value: raw.to_string(),
        })
    }
}

/// Direction of a relationship relative to an existing node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// existing → new
    #[default]
    Outgoing,
    /// new → existing
    Incoming,
}

impl From<bool> for Direction {
    /// `true` maps to [`Direction::Outgoing`].
    fn from(forward: bool) -> Self {
        if forward {
            Self::Outgoing
        } else {
            Self::Incoming
        }
    }
}

// ── Records ───────────────────────────────────────────────────────

/// A node as read back from the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeRecord {
    pub id: NodeId,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, alias = "props")]
    pub properties: PropertyMap,
}

/// One row of the top-contributions report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopContribution {
    /// Contributor name (`NAME`).
    pub name: Option<String>,
    /// Receiving committee name (`CMTE_NM`).
    pub committee: Option<String>,
    /// Committee party affiliation (`CMTE_PTY_AFFILIATION`).
    pub party: Option<String>,
    /// Largest `TRANSACTION_AMT` for this contributor/committee pair.
    pub amount: f64,
}

/// A path that runs through a committee node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitteeTie {
    pub nodes: Vec<NodeRecord>,
    /// Relationship types along the path, in path order.
    pub relationships: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_colon_delimited() {
        let labels = Labels::parse("Committee:PAC").unwrap();
        assert_eq!(labels.as_pattern(), ":Committee:PAC");
        assert_eq!(labels.to_string(), "Committee:PAC");
    }

    #[test]
    fn labels_reject_injection() {
        assert!(Labels::parse("Person {name:'x'}) DETACH DELETE (n").is_err());
        assert!(Labels::parse("").is_err());
        assert!(Labels::parse("Person:").is_err());
        assert!(Labels::parse("1Person").is_err());
    }

    #[test]
    fn rel_type_validation() {
        assert_eq!(RelType::new("CONTRIBUTION_TO").unwrap().as_str(), "CONTRIBUTION_TO");
        let err = RelType::new("KNOWS]->(x").unwrap_err();
        assert!(err.to_string().contains("relationship type"));
    }

    #[test]
    fn direction_from_forward_flag() {
        assert_eq!(Direction::from(true), Direction::Outgoing);
        assert_eq!(Direction::from(false), Direction::Incoming);
        assert_eq!(Direction::default(), Direction::Outgoing);
    }

    #[test]
    fn node_record_accepts_props_alias() {
        let json = serde_json::json!({
            "id": 42,
            "labels": ["Committee"],
            "props": {"CMTE_NM": "FRIENDS OF EXAMPLE"}
        });
        let record: NodeRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.id, NodeId(42));
        assert_eq!(record.properties["CMTE_NM"], "FRIENDS OF EXAMPLE");
    }

    #[test]
    fn node_id_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&NodeId(7)).unwrap(), "7");
    }
}
