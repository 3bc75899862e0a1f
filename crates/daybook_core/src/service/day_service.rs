//! Day-indexed navigation over a sparsely populated calendar.
//!
//! # Responsibility
//! - Resolve the current day-key and the nearest populated neighbor keys.
//! - Assemble the day-browsing payload consumed by the presentation layer.
//!
//! # Invariants
//! - Neighbor lookups wrap around: missing previous resolves to the overall
//!   maximum key, missing next to the overall minimum.
//! - Day-keys compare lexicographically over their raw 4-character form;
//!   cross-year ordering is a documented limitation of the truncated keys.
//! - Payload day fields are display-encoded; internal lookups stay raw.

use crate::daykey;
use crate::model::piece::{day_key_of, PieceId};
use crate::render::{PieceRenderer, RenderError};
use crate::repo::piece_repo::{PieceRepository, RepoResult};
use crate::service::today_real_day;
use serde::Serialize;

/// Nearest populated day-keys around a given key, raw form.
///
/// Both fields are `None` only when the store holds no pieces at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayNeighbors {
    pub prev: Option<String>,
    pub next: Option<String>,
}

/// One rendered piece inside a day page.
///
/// Day fields and the change timestamp are display-encoded; `content` stays
/// raw so editors can round-trip it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayPagePiece {
    pub id: PieceId,
    pub content: String,
    pub content_parsed: String,
    pub knot: Option<String>,
    pub real_day: String,
    pub day_key: String,
    pub changed_at: String,
}

/// Day-browsing payload: rendered pieces plus navigation keys, all in
/// display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayPage {
    pub pieces: Vec<DayPagePiece>,
    pub day_key: String,
    pub prev: Option<String>,
    pub next: Option<String>,
}

/// Navigation service over the sparse day index.
pub struct DayService<R: PieceRepository> {
    repo: R,
}

impl<R: PieceRepository> DayService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Day-key of the most recent piece on or before today, raw form.
    ///
    /// Falls back to today's own key when the store holds nothing yet.
    pub fn current_day_key(&self) -> RepoResult<String> {
        self.current_day_key_on(&today_real_day())
    }

    /// Injectable variant of [`Self::current_day_key`] for a fixed `today`.
    pub fn current_day_key_on(&self, today: &str) -> RepoResult<String> {
        match self.repo.last_day_key_on_or_before(today)? {
            Some(day_key) => Ok(day_key),
            None => Ok(day_key_of(today)),
        }
    }

    /// Nearest populated day-keys strictly before/after `day_key`.
    pub fn neighbors(&self, day_key: &str) -> RepoResult<DayNeighbors> {
        let prev = match self.repo.greatest_day_key_below(day_key)? {
            Some(key) => Some(key),
            None => self.repo.max_day_key()?,
        };
        let next = match self.repo.least_day_key_above(day_key)? {
            Some(key) => Some(key),
            None => self.repo.min_day_key()?,
        };

        Ok(DayNeighbors { prev, next })
    }

    /// Builds the full day-browsing payload for one raw day-key.
    pub fn day_page(&self, day_key: &str) -> Result<DayPage, RenderError> {
        let renderer = PieceRenderer::new(&self.repo);
        let neighbors = self.neighbors(day_key)?;

        let mut pieces = Vec::new();
        for piece in self.repo.list_pieces_for_day(day_key)? {
            let content_parsed = renderer.render(&piece)?;
            pieces.push(DayPagePiece {
                id: piece.id,
                content: piece.content,
                content_parsed,
                knot: piece.knot,
                real_day: daykey::encode(&piece.real_day),
                day_key: daykey::encode(&piece.day_key),
                changed_at: daykey::encode(&piece.changed_at),
            });
        }

        Ok(DayPage {
            pieces,
            day_key: daykey::encode(day_key),
            prev: neighbors.prev.as_deref().map(daykey::encode),
            next: neighbors.next.as_deref().map(daykey::encode),
        })
    }
}
