//! Piece/knot repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the graph-store API over pieces, knot edges and day-keys.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `PieceDraft::validate()` before SQL mutations.
//! - Day-key neighbor queries compare raw 4-character keys as strings;
//!   cross-year keys therefore order lexicographically, not calendar-wise.
//! - Hub member listings preserve edge insertion order.

use crate::db::DbError;
use crate::model::piece::{Piece, PieceDraft, PieceId, PieceValidationError};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PIECE_SELECT_SQL: &str = "SELECT
    id,
    content,
    knot,
    real_day,
    day_key,
    changed_at
FROM pieces";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for piece persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PieceValidationError),
    Db(DbError),
    NotFound(PieceId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "piece not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted piece data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<PieceValidationError> for RepoError {
    fn from(value: PieceValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Reference to a hub a piece currently belongs to.
///
/// Returned with piece detail so an editor can round-trip memberships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnotRef {
    pub hub_id: PieceId,
    pub label: String,
}

/// Labels of the pieces rendered as site header and footer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteChrome {
    pub header_knot: Option<String>,
    pub footer_knot: Option<String>,
}

/// Graph-store contract consumed by the rendering and navigation engine.
///
/// Not-found lookups return `Ok(None)`/empty collections rather than
/// errors; callers treat absence as an empty result.
pub trait PieceRepository {
    /// Fetches one piece by stable id.
    fn find_piece(&self, id: PieceId) -> RepoResult<Option<Piece>>;
    /// Lists all pieces of one day, most recent `real_day` first.
    fn list_pieces_for_day(&self, day_key: &str) -> RepoResult<Vec<Piece>>;
    /// Day-key of the most recent piece with `real_day` on or before `real_day`.
    fn last_day_key_on_or_before(&self, real_day: &str) -> RepoResult<Option<String>>;
    /// Greatest populated day-key strictly below `day_key`.
    fn greatest_day_key_below(&self, day_key: &str) -> RepoResult<Option<String>>;
    /// Least populated day-key strictly above `day_key`.
    fn least_day_key_above(&self, day_key: &str) -> RepoResult<Option<String>>;
    /// Overall maximum populated day-key.
    fn max_day_key(&self) -> RepoResult<Option<String>>;
    /// Overall minimum populated day-key.
    fn min_day_key(&self) -> RepoResult<Option<String>>;
    /// First piece whose hub label equals `label`.
    fn find_hub_by_label(&self, label: &str) -> RepoResult<Option<Piece>>;
    /// Member pieces of the given hub, in edge insertion order.
    fn list_hub_members(&self, hub_id: PieceId) -> RepoResult<Vec<Piece>>;
    /// Inserts one piece and returns its store-assigned id.
    fn insert_piece(&self, draft: &PieceDraft) -> RepoResult<PieceId>;
    /// Replaces all authored fields of one piece and refreshes `changed_at`.
    fn update_piece(&self, id: PieceId, draft: &PieceDraft) -> RepoResult<()>;
    /// Removes every knot edge whose member is `member_id`.
    fn delete_knots_for_member(&self, member_id: PieceId) -> RepoResult<()>;
    /// Inserts one `(hub, member)` knot edge.
    fn insert_knot(&self, hub_id: PieceId, member_id: PieceId) -> RepoResult<()>;
    /// Hubs the given piece currently belongs to, in edge insertion order.
    fn list_knot_refs_for_member(&self, member_id: PieceId) -> RepoResult<Vec<KnotRef>>;
    /// Reads the configured site header/footer labels.
    fn site_chrome(&self) -> RepoResult<SiteChrome>;
    /// Replaces the configured site header/footer labels.
    fn set_site_chrome(&self, chrome: &SiteChrome) -> RepoResult<()>;
}

/// SQLite-backed piece repository.
pub struct SqlitePieceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePieceRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PieceRepository for SqlitePieceRepository<'_> {
    fn find_piece(&self, id: PieceId) -> RepoResult<Option<Piece>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PIECE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_piece_row(row)?));
        }

        Ok(None)
    }

    fn list_pieces_for_day(&self, day_key: &str) -> RepoResult<Vec<Piece>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PIECE_SELECT_SQL}
             WHERE day_key = ?1
             ORDER BY real_day DESC, id ASC;"
        ))?;

        let mut rows = stmt.query(params![day_key])?;
        let mut pieces = Vec::new();
        while let Some(row) = rows.next()? {
            pieces.push(parse_piece_row(row)?);
        }

        Ok(pieces)
    }

    fn last_day_key_on_or_before(&self, real_day: &str) -> RepoResult<Option<String>> {
        single_day_key(
            self.conn,
            "SELECT day_key
             FROM pieces
             WHERE real_day <= ?1
             ORDER BY real_day DESC
             LIMIT 1;",
            params![real_day],
        )
    }

    fn greatest_day_key_below(&self, day_key: &str) -> RepoResult<Option<String>> {
        single_day_key(
            self.conn,
            "SELECT day_key
             FROM pieces
             WHERE day_key < ?1
             ORDER BY day_key DESC
             LIMIT 1;",
            params![day_key],
        )
    }

    fn least_day_key_above(&self, day_key: &str) -> RepoResult<Option<String>> {
        single_day_key(
            self.conn,
            "SELECT day_key
             FROM pieces
             WHERE day_key > ?1
             ORDER BY day_key ASC
             LIMIT 1;",
            params![day_key],
        )
    }

    fn max_day_key(&self) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT max(day_key) FROM pieces;", [], |row| {
                row.get::<_, Option<String>>(0)
            })?;
        Ok(value)
    }

    fn min_day_key(&self) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT min(day_key) FROM pieces;", [], |row| {
                row.get::<_, Option<String>>(0)
            })?;
        Ok(value)
    }

    fn find_hub_by_label(&self, label: &str) -> RepoResult<Option<Piece>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PIECE_SELECT_SQL}
             WHERE knot = ?1 AND length(knot) > 0
             ORDER BY id ASC
             LIMIT 1;"
        ))?;

        let mut rows = stmt.query(params![label])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_piece_row(row)?));
        }

        Ok(None)
    }

    fn list_hub_members(&self, hub_id: PieceId) -> RepoResult<Vec<Piece>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                P.id,
                P.content,
                P.knot,
                P.real_day,
                P.day_key,
                P.changed_at
             FROM pieces P
             INNER JOIN piece_knots K ON K.member_id = P.id
             WHERE K.hub_id = ?1
             ORDER BY K.rowid ASC;",
        )?;

        let mut rows = stmt.query(params![hub_id])?;
        let mut members = Vec::new();
        while let Some(row) = rows.next()? {
            members.push(parse_piece_row(row)?);
        }

        Ok(members)
    }

    fn insert_piece(&self, draft: &PieceDraft) -> RepoResult<PieceId> {
        draft.validate()?;

        self.conn.execute(
            "INSERT INTO pieces (content, knot, real_day, day_key)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                draft.content.as_str(),
                draft.knot.as_deref(),
                draft.real_day.as_str(),
                draft.day_key.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_piece(&self, id: PieceId, draft: &PieceDraft) -> RepoResult<()> {
        draft.validate()?;

        let changed = self.conn.execute(
            "UPDATE pieces
             SET
                content = ?1,
                knot = ?2,
                real_day = ?3,
                day_key = ?4,
                changed_at = datetime('now', 'localtime')
             WHERE id = ?5;",
            params![
                draft.content.as_str(),
                draft.knot.as_deref(),
                draft.real_day.as_str(),
                draft.day_key.as_str(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_knots_for_member(&self, member_id: PieceId) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM piece_knots WHERE member_id = ?1;",
            params![member_id],
        )?;
        Ok(())
    }

    fn insert_knot(&self, hub_id: PieceId, member_id: PieceId) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO piece_knots (hub_id, member_id) VALUES (?1, ?2);",
            params![hub_id, member_id],
        )?;
        Ok(())
    }

    fn list_knot_refs_for_member(&self, member_id: PieceId) -> RepoResult<Vec<KnotRef>> {
        let mut stmt = self.conn.prepare(
            "SELECT K.hub_id, P.knot
             FROM piece_knots K
             INNER JOIN pieces P ON P.id = K.hub_id
             WHERE K.member_id = ?1
             ORDER BY K.rowid ASC;",
        )?;

        let mut rows = stmt.query(params![member_id])?;
        let mut refs = Vec::new();
        while let Some(row) = rows.next()? {
            let label: Option<String> = row.get(1)?;
            refs.push(KnotRef {
                hub_id: row.get(0)?,
                label: label.unwrap_or_default(),
            });
        }

        Ok(refs)
    }

    fn site_chrome(&self) -> RepoResult<SiteChrome> {
        let mut stmt = self
            .conn
            .prepare("SELECT header_knot, footer_knot FROM site_chrome WHERE id = 1;")?;

        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            return Ok(SiteChrome {
                header_knot: row.get(0)?,
                footer_knot: row.get(1)?,
            });
        }

        Ok(SiteChrome::default())
    }

    fn set_site_chrome(&self, chrome: &SiteChrome) -> RepoResult<()> {
        self.conn.execute(
            "UPDATE site_chrome SET header_knot = ?1, footer_knot = ?2 WHERE id = 1;",
            params![chrome.header_knot.as_deref(), chrome.footer_knot.as_deref()],
        )?;
        Ok(())
    }
}

fn parse_piece_row(row: &Row<'_>) -> RepoResult<Piece> {
    let real_day: String = row.get("real_day")?;
    let day_key: String = row.get("day_key")?;
    if day_key.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty day_key for real_day `{real_day}` in pieces.day_key"
        )));
    }

    Ok(Piece {
        id: row.get("id")?,
        content: row.get("content")?,
        knot: row.get("knot")?,
        real_day,
        day_key,
        changed_at: row.get("changed_at")?,
    })
}

fn single_day_key(
    conn: &Connection,
    sql: &str,
    bind: impl rusqlite::Params,
) -> RepoResult<Option<String>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(bind)?;
    if let Some(row) = rows.next()? {
        return Ok(Some(row.get(0)?));
    }

    Ok(None)
}
