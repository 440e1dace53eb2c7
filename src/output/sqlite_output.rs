//! SQLite export
//!
//! Writes every report table in a single transaction. Booleans are stored as
//! 0/1 integers and unset optional values as NULL.

use crate::output::report::AuditReport;
use crate::output::schema::reset_schema;
use crate::output::traits::{OutputResult, ReportWriter};
use rusqlite::{params, Connection, Transaction};
use std::path::{Path, PathBuf};

/// Exports reports into a SQLite database file
pub struct SqliteExporter {
    path: PathBuf,
}

impl SqliteExporter {
    /// Creates an exporter targeting `path`
    ///
    /// The file is created on first write. Existing export tables are
    /// replaced.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportWriter for SqliteExporter {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn write_report(&self, report: &AuditReport) -> OutputResult<()> {
        let mut conn = Connection::open(&self.path)?;
        conn.execute_batch(
            "
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        let tx = conn.transaction()?;
        reset_schema(&tx)?;

        insert_run(&tx, report)?;
        insert_pages(&tx, report)?;
        insert_edges(&tx, report)?;
        insert_duplicates(&tx, report)?;
        insert_hreflang(&tx, report)?;
        insert_issues(&tx, report)?;
        insert_quality(&tx, report)?;
        insert_images(&tx, report)?;

        tx.commit()?;

        tracing::info!(
            "Exported {} pages and {} edges to {}",
            report.pages.len(),
            report.edges.len(),
            self.path.display()
        );

        Ok(())
    }
}

fn int(value: usize) -> i64 {
    value as i64
}

fn insert_run(tx: &Transaction<'_>, report: &AuditReport) -> rusqlite::Result<()> {
    let run = &report.run;
    tx.execute(
        "INSERT INTO audit_runs (start_url, host, noise_policy, config_hash, started_at, finished_at, page_count, edge_count)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            run.start_url,
            run.host,
            run.noise_policy.as_str(),
            run.config_hash,
            run.started_at.to_rfc3339(),
            run.finished_at.to_rfc3339(),
            int(report.pages.len()),
            int(report.edges.len()),
        ],
    )?;
    Ok(())
}

fn insert_pages(tx: &Transaction<'_>, report: &AuditReport) -> rusqlite::Result<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO pages (
            url, final_url, status, content_type, content_length,
            title, meta_description, canonical, self_canonical, meta_robots,
            x_robots_tag, followable, h1, h2, word_count,
            image_count, images_missing_alt, inlinks, outlinks, hreflang_count,
            structured_data, https, mixed_content, hsts, cache_control,
            vary, charset, x_content_type_options, param_risk, body_hash,
            mobile_score, desktop_score, lcp_ms, inp_ms, cls,
            noise
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
            ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20,
            ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30,
            ?31, ?32, ?33, ?34, ?35, ?36
        )",
    )?;

    for row in &report.pages {
        let page = &row.record;
        let perf = &page.performance;
        stmt.execute(params![
            page.url,
            page.final_url,
            page.status,
            page.content_type,
            page.content_length.map(|v| v as i64),
            page.title,
            page.meta_description,
            page.canonical,
            row.self_canonical,
            page.meta_robots,
            page.x_robots_tag,
            row.followable,
            page.h1,
            page.h2,
            int(page.word_count),
            int(page.image_count),
            int(page.images_missing_alt),
            int(page.inlinks),
            int(page.outlinks),
            int(page.hreflang_count),
            page.structured_data_label(),
            page.https,
            int(page.mixed_content),
            page.hsts,
            page.cache_control,
            page.vary,
            page.charset,
            page.x_content_type_options,
            page.param_risk_label(),
            page.body_hash,
            perf.mobile_score,
            perf.desktop_score,
            perf.lcp_ms.map(|v| v as i64),
            perf.inp_ms.map(|v| v as i64),
            perf.cls,
            row.noise.map(|reason| reason.as_str()),
        ])?;
    }
    Ok(())
}

fn insert_edges(tx: &Transaction<'_>, report: &AuditReport) -> rusqlite::Result<()> {
    let mut stmt =
        tx.prepare("INSERT INTO edges (source, target, anchor, rel) VALUES (?1, ?2, ?3, ?4)")?;
    for edge in &report.edges {
        stmt.execute(params![edge.source, edge.target, edge.anchor, edge.rel])?;
    }
    Ok(())
}

fn insert_duplicates(tx: &Transaction<'_>, report: &AuditReport) -> rusqlite::Result<()> {
    let mut stmt = tx.prepare("INSERT OR IGNORE INTO duplicates (body_hash, url) VALUES (?1, ?2)")?;
    for cluster in &report.duplicates {
        for url in &cluster.urls {
            stmt.execute(params![cluster.body_hash, url])?;
        }
    }
    Ok(())
}

fn insert_hreflang(tx: &Transaction<'_>, report: &AuditReport) -> rusqlite::Result<()> {
    let mut stmt = tx.prepare("INSERT INTO hreflang (source, lang, href) VALUES (?1, ?2, ?3)")?;
    for row in &report.hreflang {
        stmt.execute(params![row.source, row.lang, row.href])?;
    }
    Ok(())
}

fn insert_issues(tx: &Transaction<'_>, report: &AuditReport) -> rusqlite::Result<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO issues (url, top_severity, reason, details, severity, noise)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for page in &report.issues {
        let noise = report.noise_of(&page.url).map(|reason| reason.as_str());
        for issue in &page.issues {
            stmt.execute(params![
                page.url,
                page.top_severity.as_str(),
                issue.kind.reason(),
                issue.details,
                issue.severity.as_str(),
                noise,
            ])?;
        }
    }
    Ok(())
}

fn insert_quality(tx: &Transaction<'_>, report: &AuditReport) -> rusqlite::Result<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO quality (
            url, title, title_length, title_too_short, title_too_long,
            title_trailing_separator, title_duplicate, description, description_length, description_too_short,
            description_too_long, description_duplicate, image_count, images_missing_alt, alts_too_short,
            alts_too_long, filenames_with_spaces, filenames_with_uppercase, filenames_with_underscores, filenames_bad_extension
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
            ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20
        )",
    )?;
    for q in &report.quality {
        stmt.execute(params![
            q.url,
            q.title,
            int(q.title_length),
            q.title_too_short,
            q.title_too_long,
            q.title_trailing_separator,
            q.title_duplicate,
            q.description,
            int(q.description_length),
            q.description_too_short,
            q.description_too_long,
            q.description_duplicate,
            int(q.image_count),
            int(q.images_missing_alt),
            int(q.alts_too_short),
            int(q.alts_too_long),
            int(q.filenames_with_spaces),
            int(q.filenames_with_uppercase),
            int(q.filenames_with_underscores),
            int(q.filenames_bad_extension),
        ])?;
    }
    Ok(())
}

fn insert_images(tx: &Transaction<'_>, report: &AuditReport) -> rusqlite::Result<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO images (
            page_url, src, alt, alt_length, filename, has_spaces,
            has_uppercase, has_underscore, bad_extension, alt_too_short, alt_too_long
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;
    for image in &report.images {
        stmt.execute(params![
            image.page_url,
            image.src,
            image.alt,
            int(image.alt_length),
            image.filename,
            image.has_spaces,
            image.has_uppercase,
            image.has_underscore,
            image.bad_extension,
            image.alt_too_short,
            image.alt_too_long,
        ])?;
    }
    Ok(())
}
