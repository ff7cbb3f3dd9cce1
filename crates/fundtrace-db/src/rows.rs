//! Conversion between row types and SQLite values.
//!
//! Enums are stored by their snake_case names; unsigned amounts are bound as
//! `i64`, which covers every value the generator produces.

use std::str::FromStr;

use fundtrace_common::{EdgeRow, NodeRow, SummaryRow};
use rusqlite::{params, Row, Statement};

use crate::error::{DbError, Result};
use crate::schema::{TABLE_EDGES, TABLE_NODES, VIEW_SUMMARY};

pub fn insert_node(stmt: &mut Statement<'_>, node: &NodeRow) -> Result<()> {
    stmt.execute(params![
        node.node_id,
        node.node_type.as_str(),
        node.network_id,
        node.year,
        node.publication_kind.map(|k| k.as_str()),
        node.grant_id,
        node.funding_amount.map(to_i64).transpose()?,
        node.pi_name,
        node.title,
        node.authors,
        node.journal,
        node.pmid,
        node.disease,
        node.treatment_name,
        node.approval_year,
        node.research_phase.map(|p| p.as_str()),
        node.funded_by_grant,
        node.treatment_related,
        node.citation_count,
        node.fda_approved,
    ])?;
    Ok(())
}

pub fn insert_edge(stmt: &mut Statement<'_>, edge: &EdgeRow) -> Result<()> {
    stmt.execute(params![edge.source_id, edge.target_id, edge.edge_type.as_str(), edge.network_id])?;
    Ok(())
}

/// Read a nodes row selected with `NODE_COLUMNS`.
pub fn node_from_row(row: &Row<'_>) -> Result<NodeRow> {
    let mut node = NodeRow::new(
        row.get::<_, String>(0)?,
        parse(TABLE_NODES, &row.get::<_, String>(1)?)?,
        row.get(2)?,
        row.get(3)?,
    );
    node.publication_kind = parse_opt(TABLE_NODES, row.get(4)?)?;
    node.grant_id = row.get(5)?;
    node.funding_amount = row.get::<_, Option<i64>>(6)?.map(to_u64).transpose()?;
    node.pi_name = row.get(7)?;
    node.title = row.get(8)?;
    node.authors = row.get(9)?;
    node.journal = row.get(10)?;
    node.pmid = row.get(11)?;
    node.disease = row.get(12)?;
    node.treatment_name = row.get(13)?;
    node.approval_year = row.get(14)?;
    node.research_phase = parse_opt(TABLE_NODES, row.get(15)?)?;
    node.funded_by_grant = row.get(16)?;
    node.treatment_related = row.get(17)?;
    node.citation_count = row.get(18)?;
    node.fda_approved = row.get(19)?;
    Ok(node)
}

/// Read an edges row selected with `EDGE_COLUMNS`.
pub fn edge_from_row(row: &Row<'_>) -> Result<EdgeRow> {
    Ok(EdgeRow {
        source_id: row.get(0)?,
        target_id: row.get(1)?,
        edge_type: parse(TABLE_EDGES, &row.get::<_, String>(2)?)?,
        network_id: row.get(3)?,
    })
}

pub fn summary_from_row(row: &Row<'_>) -> Result<SummaryRow> {
    let missing = |column: &str| DbError::invalid_row(VIEW_SUMMARY, format!("grant is missing {column}"));
    Ok(SummaryRow {
        network_id: row.get(0)?,
        disease: row.get::<_, Option<String>>(1)?.ok_or_else(|| missing("disease"))?,
        treatment_name: row.get::<_, Option<String>>(2)?.ok_or_else(|| missing("treatment_name"))?,
        grant_id: row.get::<_, Option<String>>(3)?.ok_or_else(|| missing("grant_id"))?,
        grant_year: row.get(4)?,
        approval_year: row.get(5)?,
        funding_amount: to_u64(row.get(6)?)?,
        total_publications: row.get(7)?,
        research_duration: row.get(8)?,
        treatment_connections: row.get(9)?,
        realized_chains: row.get(10)?,
    })
}

fn parse<T: FromStr>(table: &'static str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| DbError::invalid_row(table, format!("unrecognised value '{value}'")))
}

fn parse_opt<T: FromStr>(table: &'static str, value: Option<String>) -> Result<Option<T>> {
    value.map(|v| parse(table, &v)).transpose()
}

fn to_i64(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| DbError::invalid_row(TABLE_NODES, format!("amount {value} overflows i64")))
}

fn to_u64(value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| DbError::invalid_row(TABLE_NODES, format!("negative amount {value}")))
}
