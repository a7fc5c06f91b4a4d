// Report history using SQLite

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use uidmatch_recon::store::{ReportKey, ReportKind, ReportStore, ReportSummary, StoreError, StoredReport};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,            -- comparison | merge | violations
    period TEXT NOT NULL DEFAULT '',
    name TEXT NOT NULL,
    text TEXT NOT NULL,
    payload TEXT NOT NULL,         -- JSON
    saved_at TEXT NOT NULL,        -- RFC 3339, UTC, microseconds
    UNIQUE (kind, period, name)
);

CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Bumped when the table layout changes.
pub const SCHEMA_VERSION: u32 = 1;

pub struct SqliteStore {
    conn: Connection,
}

fn backend(e: rusqlite::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

impl SqliteStore {
    /// Open (or create) the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Backend(format!("cannot create {}: {e}", parent.display()))
                })?;
            }
        }
        let conn = Connection::open(path).map_err(backend)?;
        log::debug!("report store: {}", path.display());
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory().map_err(backend)?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA).map_err(backend)?;

        let version: Option<String> = conn
            .query_row("SELECT value FROM meta WHERE key = 'schema_version'", [], |row| row.get(0))
            .optional()
            .map_err(backend)?;
        match version {
            None => {
                conn.execute(
                    "INSERT INTO meta (key, value) VALUES ('schema_version', ?1)",
                    params![SCHEMA_VERSION.to_string()],
                )
                .map_err(backend)?;
            }
            Some(v) if v != SCHEMA_VERSION.to_string() => {
                return Err(StoreError::Backend(format!(
                    "unsupported schema version {v} (expected {SCHEMA_VERSION})"
                )));
            }
            Some(_) => {}
        }

        Ok(Self { conn })
    }
}

fn parse_time(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Payload(format!("bad timestamp '{raw}': {e}")))
}

fn parse_kind(raw: &str) -> Result<ReportKind, StoreError> {
    raw.parse::<ReportKind>().map_err(StoreError::Payload)
}

/// Columns: kind, period, name, saved_at.
fn key_and_time(row: &Row<'_>) -> rusqlite::Result<(String, String, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

impl ReportStore for SqliteStore {
    fn save(&mut self, report: &StoredReport) -> Result<i64, StoreError> {
        let payload = serde_json::to_string(&report.payload)
            .map_err(|e| StoreError::Payload(e.to_string()))?;
        let key = &report.key;

        self.conn
            .execute(
                "INSERT INTO reports (kind, period, name, text, payload, saved_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT (kind, period, name) DO UPDATE SET
                     text = excluded.text,
                     payload = excluded.payload,
                     saved_at = excluded.saved_at",
                params![
                    key.kind.as_str(),
                    key.period,
                    key.name,
                    report.text,
                    payload,
                    report.saved_at.to_rfc3339_opts(SecondsFormat::Micros, true)
                ],
            )
            .map_err(backend)?;

        let id = self
            .conn
            .query_row(
                "SELECT id FROM reports WHERE kind = ?1 AND period = ?2 AND name = ?3",
                params![key.kind.as_str(), key.period, key.name],
                |row| row.get::<_, i64>(0),
            )
            .map_err(backend)?;
        log::info!("saved report {key} (id {id})");
        Ok(id)
    }

    fn fetch(&self, key: &ReportKey) -> Result<Option<StoredReport>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT text, payload, saved_at FROM reports
                 WHERE kind = ?1 AND period = ?2 AND name = ?3",
                params![key.kind.as_str(), key.period, key.name],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)),
            )
            .optional()
            .map_err(backend)?;

        let Some((text, payload, saved_at)) = row else {
            return Ok(None);
        };
        let payload =
            serde_json::from_str(&payload).map_err(|e| StoreError::Payload(e.to_string()))?;
        Ok(Some(StoredReport { key: key.clone(), text, payload, saved_at: parse_time(&saved_at)? }))
    }

    fn delete(&mut self, key: &ReportKey) -> Result<bool, StoreError> {
        let removed = self
            .conn
            .execute(
                "DELETE FROM reports WHERE kind = ?1 AND period = ?2 AND name = ?3",
                params![key.kind.as_str(), key.period, key.name],
            )
            .map_err(backend)?;
        Ok(removed > 0)
    }

    fn list(&self) -> Result<Vec<ReportSummary>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT kind, period, name, saved_at, id, length(CAST(text AS BLOB)) FROM reports
                 ORDER BY saved_at DESC, id DESC",
            )
            .map_err(backend)?;

        let rows = stmt
            .query_map([], |row| {
                let (kind, period, name, saved_at) = key_and_time(row)?;
                Ok((kind, period, name, saved_at, row.get::<_, i64>(4)?, row.get::<_, i64>(5)?))
            })
            .map_err(backend)?;

        let mut out = Vec::new();
        for row in rows {
            let (kind, period, name, saved_at, id, bytes) = row.map_err(backend)?;
            out.push(ReportSummary {
                id,
                key: ReportKey::new(parse_kind(&kind)?, period, name),
                saved_at: parse_time(&saved_at)?,
                text_bytes: bytes.max(0) as usize,
            });
        }
        Ok(out)
    }
}
