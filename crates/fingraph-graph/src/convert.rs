//! Conversions between JSON values and Bolt values, and typed column reads.
//!
//! Parameters are held as JSON until a statement is sent, and results are
//! converted back to JSON before being decoded into record types.

use std::collections::HashMap;

use neo4rs::{
    BoltBoolean, BoltFloat, BoltInteger, BoltList, BoltMap, BoltNull, BoltString, BoltType, Row,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

use crate::error::FailureCause;

/// Convert a JSON parameter value into its Bolt counterpart.
pub fn json_to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::Boolean(BoltBoolean::new(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => BoltType::Integer(BoltInteger::new(i)),
            None => BoltType::Float(BoltFloat::new(n.as_f64().unwrap_or_default())),
        },
        Value::String(s) => BoltType::String(BoltString::new(s)),
        Value::Array(items) => BoltType::List(BoltList {
            value: items.iter().map(json_to_bolt).collect(),
        }),
        Value::Object(map) => BoltType::Map(BoltMap {
            value: map
                .iter()
                .map(|(k, v)| (BoltString::new(k), json_to_bolt(v)))
                .collect::<HashMap<_, _>>(),
        }),
    }
}

/// Convert a Bolt result value into JSON.
///
/// Nodes become `{id, labels, props}` objects. Temporal and spatial values
/// fall back to their debug rendering.
pub fn bolt_to_json(value: &BoltType) -> Value {
    match value {
        BoltType::Null(_) => Value::Null,
        BoltType::Boolean(b) => Value::Bool(b.value),
        BoltType::Integer(i) => Value::Number(i.value.into()),
        BoltType::Float(f) => Number::from_f64(f.value).map_or(Value::Null, Value::Number),
        BoltType::String(s) => Value::String(s.value.clone()),
        BoltType::List(list) => Value::Array(list.value.iter().map(bolt_to_json).collect()),
        BoltType::Map(map) => Value::Object(bolt_map_to_json(map)),
        BoltType::Node(node) => {
            let mut obj = Map::new();
            obj.insert("id".into(), Value::Number(node.id.value.into()));
            obj.insert(
                "labels".into(),
                Value::Array(node.labels.value.iter().map(bolt_to_json).collect()),
            );
            obj.insert("props".into(), Value::Object(bolt_map_to_json(&node.properties)));
            Value::Object(obj)
        }
        other => Value::String(format!("{other:?}")),
    }
}

fn bolt_map_to_json(map: &BoltMap) -> Map<String, Value> {
    map.value
        .iter()
        .map(|(k, v)| (k.value.clone(), bolt_to_json(v)))
        .collect()
}

/// Read a column with the driver's own deserializer (scalars, strings).
pub fn column<T: DeserializeOwned>(row: &Row, name: &str) -> Result<T, FailureCause> {
    row.get::<T>(name)
        .map_err(|e| FailureCause::column(name, e))
}

/// Read a column as JSON.
pub fn json_column(row: &Row, name: &str) -> Result<Value, FailureCause> {
    column::<BoltType>(row, name).map(|v| bolt_to_json(&v))
}

/// Read a numeric column as `f64`, accepting Bolt integers and floats.
pub fn number_column(row: &Row, name: &str) -> Result<f64, FailureCause> {
    json_column(row, name)?
        .as_f64()
        .ok_or_else(|| FailureCause::column(name, "expected a number"))
}

/// Read a column as JSON and decode it into a record type.
pub fn record_column<T: DeserializeOwned>(row: &Row, name: &str) -> Result<T, FailureCause> {
    serde_json::from_value(json_column(row, name)?).map_err(|e| FailureCause::column(name, e))
}
