//! Analytics over the FEC campaign-finance dataset.
//!
//! Expected shape of the graph:
//! - `Committee` nodes keyed by `CMTE_ID`, named by `CMTE_NM`, with a
//!   `CMTE_PTY_AFFILIATION` party code.
//! - `Contribution` nodes with `NAME`, `CMTE_ID`, and `TRANSACTION_AMT`,
//!   attached to committees through `CONTRIBUTION_TO`.
//! - `PAC` and `Candidate` (`CAND_NAME`) nodes reachable through committees.

use fingraph_core::{CommitteeTie, NodeRecord, TopContribution};
use neo4rs::Row;

use crate::client::GraphClient;
use crate::convert::{column, json_column, number_column, record_column};
use crate::error::{FailureCause, QueryExecutionError};
use crate::mutations::NODE_PROJECTION;
use crate::statement::Statement;

/// Rows returned by [`GraphClient::top_contributions`].
pub const TOP_CONTRIBUTIONS_LIMIT: i64 = 10;

impl GraphClient {
    /// The ten largest contributions, joined to the receiving committee.
    pub async fn top_contributions(&self) -> Result<Vec<TopContribution>, QueryExecutionError> {
        let stmt = top_contributions_statement(TOP_CONTRIBUTIONS_LIMIT);
        let result = self.execute(&stmt).await?;
        result
            .rows()
            .iter()
            .map(top_contribution_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|c| stmt.failure(c))
    }

    /// Names of candidates reachable from a PAC through a committee.
    ///
    /// Fails when the PAC funds no candidate.
    pub async fn funded_candidates(&self, pac_name: &str) -> Result<Vec<String>, QueryExecutionError> {
        let stmt = funded_candidates_statement(pac_name, self.config().traversal_depth);
        let result = self.execute(&stmt).await?;
        if result.is_empty() {
            return Err(stmt.failure(FailureCause::EmptyResult));
        }
        result
            .rows()
            .iter()
            .map(|row| column::<String>(row, "candidate"))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|c| stmt.failure(c))
    }

    /// Sum of `TRANSACTION_AMT` over contributions to committees of `party`.
    ///
    /// A party with no contributions totals `0.0`, never null.
    pub async fn donations_total(&self, party: &str) -> Result<f64, QueryExecutionError> {
        let stmt = donations_total_statement(party);
        let result = self.execute(&stmt).await?;
        result
            .first()
            .and_then(|row| number_column(row, "amt"))
            .map_err(|c| stmt.failure(c))
    }

    /// Every path running through the named committee.
    pub async fn committee_ties(&self, name: &str) -> Result<Vec<CommitteeTie>, QueryExecutionError> {
        let stmt = committee_ties_statement(name, self.config().traversal_depth);
        let result = self.execute(&stmt).await?;
        tracing::debug!(committee = name, paths = result.len(), "Committee ties fetched");
        result
            .rows()
            .iter()
            .map(|row| -> Result<CommitteeTie, FailureCause> {
                Ok(CommitteeTie {
                    nodes: record_column::<Vec<NodeRecord>>(row, "nodes")?,
                    relationships: column::<Vec<String>>(row, "rels")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|c| stmt.failure(c))
    }
}

fn top_contribution_from_row(row: &Row) -> Result<TopContribution, FailureCause> {
    let text = |name: &str| -> Result<Option<String>, FailureCause> {
        Ok(json_column(row, name)?.as_str().map(str::to_owned))
    };
    Ok(TopContribution {
        name: text("name")?,
        committee: text("com")?,
        party: text("pty")?,
        amount: number_column(row, "amt")?,
    })
}

// ── Statements ───────────────────────────────────────────────────

pub(crate) fn top_contributions_statement(limit: i64) -> Statement {
    Statement::new(
        "top_contributions",
        "MATCH (n:Contribution)
         MATCH (c:Committee) WHERE n.CMTE_ID = c.CMTE_ID
         RETURN n.NAME AS name, c.CMTE_NM AS com, c.CMTE_PTY_AFFILIATION AS pty,
                coalesce(toFloat(max(n.TRANSACTION_AMT)), 0.0) AS amt
         ORDER BY amt DESC
         LIMIT $limit",
    )
    .param("limit", limit)
}

pub(crate) fn funded_candidates_statement(pac_name: &str, depth: u32) -> Statement {
    let cypher = format!(
        "MATCH (:PAC {{CMTE_NM: $pac}})-[*1..{depth}]-(:Committee)-[*1..{depth}]->(c:Candidate)
         WHERE c.CAND_NAME IS NOT NULL
         RETURN DISTINCT c.CAND_NAME AS candidate
         ORDER BY candidate"
    );
    Statement::new("funded_candidates", cypher).param("pac", pac_name)
}

pub(crate) fn donations_total_statement(party: &str) -> Statement {
    Statement::new(
        "donations_total",
        "MATCH (:Committee {CMTE_PTY_AFFILIATION: $party})-[:CONTRIBUTION_TO]-(n:Contribution)
         RETURN toFloat(coalesce(sum(toFloat(n.TRANSACTION_AMT)), 0)) AS amt",
    )
    .param("party", party)
}

pub(crate) fn committee_ties_statement(name: &str, depth: u32) -> Statement {
    let cypher = format!(
        "MATCH q = ()-[*1..{depth}]-(:Committee {{CMTE_NM: $name}})-[*1..{depth}]-()
         RETURN [n IN nodes(q) | {NODE_PROJECTION}] AS nodes,
                [r IN relationships(q) | type(r)] AS rels"
    );
    Statement::new("committee_ties", cypher).param("name", name)
}
