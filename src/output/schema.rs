//! SQLite export schema
//!
//! Every export replaces the previous tables so a database file always holds
//! exactly one audit.

/// Drops every export table
pub const DROP_SQL: &str = r#"
DROP TABLE IF EXISTS images;
DROP TABLE IF EXISTS quality;
DROP TABLE IF EXISTS issues;
DROP TABLE IF EXISTS hreflang;
DROP TABLE IF EXISTS duplicates;
DROP TABLE IF EXISTS edges;
DROP TABLE IF EXISTS pages;
DROP TABLE IF EXISTS audit_runs;
"#;

/// Creates the export tables
pub const SCHEMA_SQL: &str = r#"
-- One row per export
CREATE TABLE audit_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    start_url TEXT NOT NULL,
    host TEXT NOT NULL,
    noise_policy TEXT NOT NULL,
    config_hash TEXT NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT NOT NULL,
    page_count INTEGER NOT NULL,
    edge_count INTEGER NOT NULL
);

-- One row per crawled page
CREATE TABLE pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    final_url TEXT NOT NULL UNIQUE,
    status INTEGER,
    content_type TEXT NOT NULL,
    content_length INTEGER,
    title TEXT NOT NULL,
    meta_description TEXT NOT NULL,
    canonical TEXT NOT NULL,
    self_canonical INTEGER NOT NULL,
    meta_robots TEXT NOT NULL,
    x_robots_tag TEXT NOT NULL,
    followable INTEGER NOT NULL,
    h1 TEXT NOT NULL,
    h2 TEXT NOT NULL,
    word_count INTEGER NOT NULL,
    image_count INTEGER NOT NULL,
    images_missing_alt INTEGER NOT NULL,
    inlinks INTEGER NOT NULL,
    outlinks INTEGER NOT NULL,
    hreflang_count INTEGER NOT NULL,
    structured_data TEXT NOT NULL,
    https INTEGER NOT NULL,
    mixed_content INTEGER NOT NULL,
    hsts INTEGER NOT NULL,
    cache_control TEXT NOT NULL,
    vary TEXT NOT NULL,
    charset TEXT NOT NULL,
    x_content_type_options TEXT NOT NULL,
    param_risk TEXT NOT NULL,
    body_hash TEXT NOT NULL,
    mobile_score INTEGER,
    desktop_score INTEGER,
    lcp_ms INTEGER,
    inp_ms INTEGER,
    cls REAL,
    noise TEXT
);

CREATE INDEX idx_pages_status ON pages(status);

-- Internal links, one row per occurrence
CREATE TABLE edges (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source TEXT NOT NULL,
    target TEXT NOT NULL,
    anchor TEXT NOT NULL,
    rel TEXT NOT NULL
);

CREATE INDEX idx_edges_source ON edges(source);
CREATE INDEX idx_edges_target ON edges(target);

-- Exact duplicate clusters, one row per member
CREATE TABLE duplicates (
    body_hash TEXT NOT NULL,
    url TEXT NOT NULL,
    PRIMARY KEY (body_hash, url)
);

CREATE TABLE hreflang (
    source TEXT NOT NULL,
    lang TEXT NOT NULL,
    href TEXT NOT NULL
);

-- One row per finding
CREATE TABLE issues (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    top_severity TEXT NOT NULL,
    reason TEXT NOT NULL,
    details TEXT NOT NULL,
    severity TEXT NOT NULL,
    noise TEXT
);

CREATE TABLE quality (
    url TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    title_length INTEGER NOT NULL,
    title_too_short INTEGER NOT NULL,
    title_too_long INTEGER NOT NULL,
    title_trailing_separator INTEGER NOT NULL,
    title_duplicate INTEGER NOT NULL,
    description TEXT NOT NULL,
    description_length INTEGER NOT NULL,
    description_too_short INTEGER NOT NULL,
    description_too_long INTEGER NOT NULL,
    description_duplicate INTEGER NOT NULL,
    image_count INTEGER NOT NULL,
    images_missing_alt INTEGER NOT NULL,
    alts_too_short INTEGER NOT NULL,
    alts_too_long INTEGER NOT NULL,
    filenames_with_spaces INTEGER NOT NULL,
    filenames_with_uppercase INTEGER NOT NULL,
    filenames_with_underscores INTEGER NOT NULL,
    filenames_bad_extension INTEGER NOT NULL
);

CREATE TABLE images (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_url TEXT NOT NULL,
    src TEXT NOT NULL,
    alt TEXT NOT NULL,
    alt_length INTEGER NOT NULL,
    filename TEXT NOT NULL,
    has_spaces INTEGER NOT NULL,
    has_uppercase INTEGER NOT NULL,
    has_underscore INTEGER NOT NULL,
    bad_extension INTEGER NOT NULL,
    alt_too_short INTEGER NOT NULL,
    alt_too_long INTEGER NOT NULL
);

CREATE INDEX idx_images_page ON images(page_url);
"#;

/// Drops and recreates the export tables
pub fn reset_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(DROP_SQL)?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
