//! fingraph-core: Shared types, configuration, and error handling for the
//! campaign-finance graph client.
//!
//! This crate provides the foundational pieces used by the graph client and CLI:
//! - Validated identifiers (labels, relationship types) and node references
//! - Record types for the campaign-finance analytics
//! - Neo4j connection configuration and its loader
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::Neo4jConfig;
pub use error::FinGraphError;
pub use types::{
    CommitteeTie, Direction, Labels, NodeId, NodeRecord, PropertyMap, RelType, TopContribution,
};
