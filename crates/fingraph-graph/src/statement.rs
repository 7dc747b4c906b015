//! Query statements: text, bound parameters, and the operation that issued them.

use fingraph_core::PropertyMap;
use serde_json::Value;

use crate::convert::json_to_bolt;
use crate::error::{FailureCause, QueryExecutionError};

/// One Cypher statement ready to run through [`GraphClient::execute`](crate::GraphClient::execute).
///
/// Caller-supplied values are always bound as parameters; only validated
/// labels, relationship types, and quoted property names reach the text.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    operation: &'static str,
    text: String,
    params: PropertyMap,
}

impl Statement {
    pub fn new(operation: &'static str, text: impl Into<String>) -> Self {
        Self {
            operation,
            text: text.into(),
            params: PropertyMap::new(),
        }
    }

    /// An ad-hoc statement with no helper behind it.
    pub fn raw(text: impl Into<String>) -> Self {
        Self::new("execute", text)
    }

    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &PropertyMap {
        &self.params
    }

    pub(crate) fn to_query(&self) -> neo4rs::Query {
        self.params
            .iter()
            .fold(neo4rs::query(&self.text), |q, (k, v)| {
                q.param(k, json_to_bolt(v))
            })
    }

    /// Tag a failure with this statement's operation and text.
    pub(crate) fn failure(&self, cause: impl Into<FailureCause>) -> QueryExecutionError {
        QueryExecutionError {
            operation: self.operation,
            query: self.text.clone(),
            cause: cause.into(),
        }
    }
}

/// Quote a property name for use in query text.
pub fn quote_key(key: &str) -> String {
    format!("`{}`", key.replace('`', "``"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_are_kept_out_of_text() {
        let stmt = Statement::new("lookup", "MATCH (n) WHERE n.name = $name RETURN id(n) AS id")
            .param("name", "x' OR 1=1 //");
        assert!(!stmt.text().contains("OR 1=1"));
        assert_eq!(stmt.params()["name"], "x' OR 1=1 //");
        assert_eq!(stmt.operation(), "lookup");
    }

    #[test]
    fn test_failure_is_tagged() {
        let stmt = Statement::raw("RETURN 1");
        let err = stmt.failure(FailureCause::EmptyResult);
        assert_eq!(err.operation, "execute");
        assert_eq!(err.query, "RETURN 1");
        assert_eq!(
            err.to_string(),
            "execute failed: query returned no rows (query: RETURN 1)"
        );
    }

    #[test]
    fn test_quote_key_escapes_backticks() {
        assert_eq!(quote_key("CMTE_NM"), "`CMTE_NM`");
        assert_eq!(quote_key("a`b"), "`a``b`");
    }
}
