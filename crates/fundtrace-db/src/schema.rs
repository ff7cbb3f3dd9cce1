//! SQLite schema for the relational dataset.
//!
//! Two tables hold the generated rows; the per-network summary is a view
//! recomputed from them on every read, so it can never drift from the data.

pub const TABLE_NODES: &str = "nodes";
pub const TABLE_EDGES: &str = "edges";
pub const TABLE_METADATA: &str = "run_metadata";
pub const VIEW_SUMMARY: &str = "network_summary";

/// Column order shared by inserts and selects on the nodes table.
pub const NODE_COLUMNS: &str = "node_id, node_type, network_id, year, publication_kind, grant_id, \
     funding_amount, pi_name, title, authors, journal, pmid, disease, treatment_name, \
     approval_year, research_phase, funded_by_grant, treatment_related, citation_count, fda_approved";

pub const EDGE_COLUMNS: &str = "source_id, target_id, edge_type, network_id";

// =============================================================================
// Tables
// =============================================================================

pub const CREATE_NODES: &str = r#"
CREATE TABLE IF NOT EXISTS nodes (
    node_id           TEXT PRIMARY KEY,
    node_type         TEXT NOT NULL,
    network_id        INTEGER NOT NULL,
    year              INTEGER NOT NULL,
    publication_kind  TEXT,
    grant_id          TEXT,
    funding_amount    INTEGER,
    pi_name           TEXT,
    title             TEXT,
    authors           TEXT,
    journal           TEXT,
    pmid              INTEGER,
    disease           TEXT,
    treatment_name    TEXT,
    approval_year     INTEGER,
    research_phase    TEXT,
    funded_by_grant   INTEGER,
    treatment_related INTEGER,
    citation_count    INTEGER,
    fda_approved      INTEGER
);
CREATE INDEX IF NOT EXISTS idx_nodes_network ON nodes(network_id);
"#;

// No uniqueness constraint: duplicate edges must survive a round trip so
// validation can report them.
pub const CREATE_EDGES: &str = r#"
CREATE TABLE IF NOT EXISTS edges (
    source_id  TEXT NOT NULL,
    target_id  TEXT NOT NULL,
    edge_type  TEXT NOT NULL,
    network_id INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_edges_network ON edges(network_id);
CREATE INDEX IF NOT EXISTS idx_edges_source ON edges(source_id);
"#;

pub const CREATE_METADATA: &str = r#"
CREATE TABLE IF NOT EXISTS run_metadata (
    id   INTEGER PRIMARY KEY CHECK (id = 1),
    body TEXT NOT NULL
);
"#;

// =============================================================================
// Summary view
// =============================================================================

pub const CREATE_SUMMARY_VIEW: &str = r#"
CREATE VIEW IF NOT EXISTS network_summary AS
SELECT
    g.network_id                         AS network_id,
    g.disease                            AS disease,
    g.treatment_name                     AS treatment_name,
    g.grant_id                           AS grant_id,
    g.year                               AS grant_year,
    COALESCE(t.approval_year, t.year)    AS approval_year,
    COALESCE(g.funding_amount, 0)        AS funding_amount,
    (SELECT COUNT(*) FROM nodes p
      WHERE p.network_id = g.network_id AND p.node_type = 'publication')
                                         AS total_publications,
    COALESCE(t.approval_year, t.year) - g.year
                                         AS research_duration,
    (SELECT COUNT(*) FROM edges e
      WHERE e.network_id = g.network_id AND e.edge_type = 'leads_to_treatment')
                                         AS treatment_connections,
    (SELECT COUNT(DISTINCT l.source_id)
       FROM edges l
       JOIN nodes pw ON pw.node_id = l.source_id AND pw.publication_kind = 'pathway'
       JOIN edges c  ON c.source_id = l.target_id AND c.edge_type = 'cites'
       JOIN nodes f  ON f.node_id = c.target_id AND f.publication_kind = 'funded'
      WHERE l.network_id = g.network_id AND l.edge_type = 'leads_to_treatment')
                                         AS realized_chains
FROM nodes g
JOIN nodes t ON t.network_id = g.network_id AND t.node_type = 'treatment'
WHERE g.node_type = 'grant';
"#;

/// Full schema in creation order.
pub fn statements() -> [&'static str; 4] {
    [CREATE_NODES, CREATE_EDGES, CREATE_METADATA, CREATE_SUMMARY_VIEW]
}
