//! Consume-once result store.
//!
//! Completed extraction records live in SQLite, keyed by
//! `(tenant, file_name)`; the intermediate converter XML lives on disk under
//! a tenant-namespaced directory. Both are delivered at most once: the
//! destructive reads remove what they return, so a second identical request
//! is indistinguishable from the record never having existed.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Error, Result};
use crate::extraction::{ExtractionRecord, ParagraphBox};
use crate::staging::{claim_for_removal, validate_name};

/// Reserved sentinel key for requests without a tenant, so the no-tenant
/// case shares the tenant code path instead of having its own.
pub const DEFAULT_TENANT: &str = "default";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS extractions (
    tenant TEXT NOT NULL,
    file_name TEXT NOT NULL,
    page_width INTEGER NOT NULL,
    page_height INTEGER NOT NULL,
    paragraphs TEXT NOT NULL,
    PRIMARY KEY (tenant, file_name)
);
";

/// Tenant- and document-keyed store of extraction results with consume-once
/// delivery.
pub struct ResultStore {
    conn: Connection,
    xml_root: PathBuf,
}

impl ResultStore {
    /// Open or create the store database, with XML artifacts rooted at
    /// `xml_root`.
    pub fn open(db_path: &Path, xml_root: impl Into<PathBuf>) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            xml_root: xml_root.into(),
        })
    }

    /// Open an in-memory store (for testing).
    pub fn in_memory(xml_root: impl Into<PathBuf>) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            xml_root: xml_root.into(),
        })
    }

    /// Upsert a record by `(tenant, file_name)`.
    ///
    /// A prior unread record for the same key is replaced, never duplicated:
    /// two uploads racing on one file name resolve to the last put winning.
    pub fn put(&self, record: &ExtractionRecord) -> Result<()> {
        let paragraphs = serde_json::to_string(&record.paragraphs)?;
        self.conn.execute(
            "INSERT INTO extractions (tenant, file_name, page_width, page_height, paragraphs)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (tenant, file_name) DO UPDATE SET
                 page_width = excluded.page_width,
                 page_height = excluded.page_height,
                 paragraphs = excluded.paragraphs",
            params![
                record.tenant,
                record.file_name,
                record.page_width,
                record.page_height,
                paragraphs,
            ],
        )?;
        log::debug!(
            "stored extraction for ({}, {})",
            record.tenant,
            record.file_name
        );
        Ok(())
    }

    /// Destructive read of the record matching both keys exactly.
    ///
    /// Find-and-delete happens in one statement, so of any number of
    /// concurrent identical requests at most one observes the record; the
    /// rest, and any later call without an intervening put, get not-found.
    pub fn take(&self, tenant: Option<&str>, file_name: &str) -> Result<ExtractionRecord> {
        let tenant = tenant.unwrap_or(DEFAULT_TENANT);
        let row = self
            .conn
            .query_row(
                "DELETE FROM extractions WHERE tenant = ?1 AND file_name = ?2
                 RETURNING page_width, page_height, paragraphs",
                params![tenant, file_name],
                |row| {
                    Ok((
                        row.get::<_, u32>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let (page_width, page_height, paragraphs) =
            row.ok_or_else(|| Error::NotFound(format!("{tenant}/{file_name}")))?;
        let paragraphs: Vec<ParagraphBox> = serde_json::from_str(&paragraphs)?;

        Ok(ExtractionRecord {
            tenant: tenant.to_string(),
            file_name: file_name.to_string(),
            page_width,
            page_height,
            paragraphs,
        })
    }

    /// Destructive read of the intermediate XML artifact for a document.
    ///
    /// The artifact is expected at `<xml_root>[/<tenant>]/<pdf_stem>.xml`,
    /// where the converter placed it. The artifact is first claimed with an
    /// atomic rename, so of concurrent identical requests at most one
    /// observes the content and the rest see not-found; the content is
    /// captured fully before the claimed file is unlinked.
    pub fn take_xml(&self, tenant: Option<&str>, pdf_file_name: &str) -> Result<String> {
        let mut dir = self.xml_root.clone();
        if let Some(tenant) = tenant {
            dir.push(validate_name(tenant)?);
        }

        let stem = Path::new(validate_name(pdf_file_name)?)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| Error::InvalidName(pdf_file_name.to_string()))?;
        let path = dir.join(format!("{stem}.xml"));

        let claimed = claim_for_removal(&path)?;
        let content = fs::read_to_string(&claimed)?;
        fs::remove_file(&claimed)?;

        log::debug!("consumed XML artifact {}", path.display());
        Ok(content)
    }
}
