//! CLI entry point for the campaign-finance graph client.

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use fingraph_core::config::DEFAULT_CONFIG_PREFIX;
use fingraph_core::{Direction, Labels, Neo4jConfig, NodeId, PropertyMap, RelType};
use fingraph_graph::convert::json_column;
use fingraph_graph::{GraphClient, Statement};

#[derive(Parser)]
#[command(name = "fingraph")]
#[command(about = "Query and edit the campaign-finance graph in Neo4j")]
struct Cli {
    /// Config file prefix (default: fingraph).
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PREFIX)]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the HTTP endpoint answers with 200.
    Ping {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run an arbitrary statement and print the selected columns.
    Query {
        cypher: String,
        /// Result columns to print, comma-separated.
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },

    /// Create a node; prints its id.
    CreateNode {
        /// Colon-delimited labels, e.g. Committee:PAC.
        #[arg(value_parser = parse_labels)]
        labels: Labels,
        /// Properties as a JSON object.
        #[arg(value_parser = parse_props, default_value = "{}")]
        props: PropertyMap,
    },

    /// Merge a relationship between two existing nodes.
    Link {
        source: i64,
        target: i64,
        #[arg(value_parser = parse_rel_type)]
        rel_type: RelType,
    },

    /// Find a node id by exact property match.
    FindNode {
        /// Properties to match as a JSON object.
        #[arg(value_parser = parse_props)]
        filter: PropertyMap,
        #[arg(long, value_parser = parse_labels)]
        label: Option<Labels>,
    },

    /// Create a node related to an existing node; prints the new id.
    AttachNode {
        existing: i64,
        #[arg(value_parser = parse_rel_type)]
        rel_type: RelType,
        #[arg(value_parser = parse_labels)]
        labels: Labels,
        #[arg(value_parser = parse_props, default_value = "{}")]
        props: PropertyMap,
        /// Point the relationship from the new node to the existing one.
        #[arg(long)]
        incoming: bool,
    },

    /// Print a node's id, labels, and properties.
    GetNode { id: i64 },

    /// Set one property on a node.
    SetProperty {
        id: i64,
        name: String,
        /// Value as JSON (bare words are taken as strings).
        value: String,
    },

    /// Top 10 contributions with committee and party.
    TopContributions,

    /// Candidates funded by a PAC.
    FundedCandidates { pac_name: String },

    /// Total donations to committees of a party.
    DonationsTotal { party: String },

    /// Paths running through a committee.
    CommitteeTies { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = Neo4jConfig::load(&cli.config)?;
    let graph = GraphClient::connect(&config).await?;

    match cli.command {
        Command::Ping { host, port } => {
            let host_ref = host.as_deref();
            if !graph.is_alive_at(host_ref, port).await {
                anyhow::bail!(
                    "Neo4j is not answering at {}:{}",
                    host_ref.unwrap_or(&config.host),
                    port.unwrap_or(config.http_port)
                );
            }
            print_json(&serde_json::json!({"alive": true}))?;
        }
        Command::Query { cypher, columns } => {
            let result = graph.execute(&Statement::raw(cypher)).await?;
            tracing::info!(rows = result.len(), "Statement committed");
            for row in result.rows() {
                let mut out = PropertyMap::new();
                for col in &columns {
                    out.insert(col.clone(), json_column(row, col)?);
                }
                println!("{}", serde_json::Value::Object(out));
            }
        }
        Command::CreateNode { labels, props } => {
            let id = graph.create_node(&labels, &props).await?;
            print_json(&id)?;
        }
        Command::Link {
            source,
            target,
            rel_type,
        } => {
            graph
                .create_relationship(NodeId(source), NodeId(target), &rel_type)
                .await?;
        }
        Command::FindNode { filter, label } => {
            let id = graph.find_node_id_by_property(&filter, label.as_ref()).await?;
            print_json(&id)?;
        }
        Command::AttachNode {
            existing,
            rel_type,
            labels,
            props,
            incoming,
        } => {
            let direction = Direction::from(!incoming);
            let id = graph
                .create_node_with_relationship_to(&labels, &props, &rel_type, NodeId(existing), direction)
                .await?;
            print_json(&id)?;
        }
        Command::GetNode { id } => {
            print_json(&graph.get_node(NodeId(id)).await?)?;
        }
        Command::SetProperty { id, name, value } => {
            let node = graph
                .set_node_property(NodeId(id), &name, parse_value(&value))
                .await?;
            print_json(&node)?;
        }
        Command::TopContributions => {
            print_json(&graph.top_contributions().await?)?;
        }
        Command::FundedCandidates { pac_name } => {
            print_json(&graph.funded_candidates(&pac_name).await?)?;
        }
        Command::DonationsTotal { party } => {
            print_json(&graph.donations_total(&party).await?)?;
        }
        Command::CommitteeTies { name } => {
            print_json(&graph.committee_ties(&name).await?)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_labels(s: &str) -> Result<Labels, String> {
    Labels::parse(s).map_err(|e| e.to_string())
}

fn parse_rel_type(s: &str) -> Result<RelType, String> {
    RelType::new(s).map_err(|e| e.to_string())
}

fn parse_props(s: &str) -> Result<PropertyMap, String> {
    match serde_json::from_str(s) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected a JSON object, got {other}")),
        Err(e) => Err(format!("invalid JSON: {e}")),
    }
}

/// JSON if it parses, otherwise the raw text as a string.
fn parse_value(s: &str) -> serde_json::Value {
    serde_json::from_str(s).unwrap_or_else(|_| serde_json::Value::String(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_props() {
        let map = parse_props(r#"{"name": "Alice", "age": 30}"#).unwrap();
        assert_eq!(map["age"], 30);
        assert!(parse_props("[1, 2]").is_err());
        assert!(parse_props("{name:").is_err());
    }

    #[test]
    fn test_parse_value_falls_back_to_string() {
        assert_eq!(parse_value("30"), serde_json::json!(30));
        assert_eq!(parse_value("true"), serde_json::json!(true));
        assert_eq!(parse_value("DEM"), serde_json::json!("DEM"));
    }

    #[test]
    fn test_attach_node_args() {
        let cli = Cli::try_parse_from([
            "fingraph",
            "attach-node",
            "7",
            "CONTRIBUTION_TO",
            "Contribution",
            r#"{"TRANSACTION_AMT": 500}"#,
            "--incoming",
        ])
        .unwrap();
        match cli.command {
            Command::AttachNode {
                existing,
                incoming,
                labels,
                ..
            } => {
                assert_eq!(existing, 7);
                assert!(incoming);
                assert_eq!(labels.to_string(), "Contribution");
            }
            _ => panic!("wrong subcommand"),
        }
        assert_eq!(cli.config, "fingraph");
    }

    #[test]
    fn test_invalid_label_is_rejected() {
        let parsed = Cli::try_parse_from(["fingraph", "create-node", "Bad Label"]);
        assert!(parsed.is_err());
    }
}
