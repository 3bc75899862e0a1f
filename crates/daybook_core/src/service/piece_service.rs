//! Piece write/read use-case service.
//!
//! # Responsibility
//! - Accept editor submissions, derive day fields, persist, then relink
//!   hub memberships.
//! - Serve one-piece detail payloads with rendered content and knot refs.
//!
//! # Invariants
//! - `day_key` is recomputed from `real_day` on every write.
//! - A blank `real_day` defaults to today at creation.
//! - Relinking runs exactly once per write, after the piece row is
//!   persisted, using the transient `knot_from` input.

use crate::daykey;
use crate::model::piece::{Piece, PieceDraft, PieceId, PieceValidationError};
use crate::render::{PieceRenderer, RenderError};
use crate::repo::piece_repo::{KnotRef, PieceRepository, RepoError, RepoResult};
use crate::service::knot_linker::KnotLinker;
use crate::service::today_real_day;
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Editor submission for one piece.
///
/// Day fields may arrive in display form; they are decoded before use.
/// The transient hub list travels separately as `knot_from`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PieceInput {
    pub content: String,
    pub knot: Option<String>,
    pub real_day: String,
}

/// One-piece read payload with rendered content and hub back-references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceDetail {
    pub id: PieceId,
    pub content: String,
    pub content_parsed: String,
    pub knot: Option<String>,
    pub real_day: String,
    pub day_key: String,
    pub changed_at: String,
    pub knots: Vec<KnotRef>,
}

/// Service error for piece use-cases.
#[derive(Debug)]
pub enum PieceServiceError {
    /// Submitted day fields violate model invariants.
    Validation(PieceValidationError),
    /// Target piece does not exist.
    PieceNotFound(PieceId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Rendering failure while building a read payload.
    Render(RenderError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for PieceServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::PieceNotFound(id) => write!(f, "piece not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Render(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent piece state: {details}"),
        }
    }
}

impl Error for PieceServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Render(err) => Some(err),
            Self::PieceNotFound(_) | Self::InconsistentState(_) => None,
        }
    }
}

impl From<RepoError> for PieceServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::PieceNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<RenderError> for PieceServiceError {
    fn from(value: RenderError) -> Self {
        Self::Render(value)
    }
}

/// Piece service facade over repository implementations.
pub struct PieceService<R: PieceRepository> {
    repo: R,
}

impl<R: PieceRepository> PieceService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one piece and derives its knot edges from `knot_from`.
    pub fn create_piece(
        &self,
        input: PieceInput,
        knot_from: &str,
    ) -> Result<Piece, PieceServiceError> {
        let draft = draft_from_input(input, &today_real_day());
        let id = self.repo.insert_piece(&draft)?;
        KnotLinker::new(&self.repo).relink(id, knot_from)?;

        info!("event=piece_write module=piece status=ok op=create id={id}");
        self.read_back(id, "created piece not found in read-back")
    }

    /// Replaces all authored fields of one piece and re-derives its edges.
    pub fn update_piece(
        &self,
        id: PieceId,
        input: PieceInput,
        knot_from: &str,
    ) -> Result<Piece, PieceServiceError> {
        let draft = draft_from_input(input, &today_real_day());
        self.repo.update_piece(id, &draft)?;
        KnotLinker::new(&self.repo).relink(id, knot_from)?;

        info!("event=piece_write module=piece status=ok op=update id={id}");
        self.read_back(id, "updated piece not found in read-back")
    }

    /// Gets one raw piece by stable id.
    pub fn get_piece(&self, id: PieceId) -> RepoResult<Option<Piece>> {
        self.repo.find_piece(id)
    }

    /// Builds the one-piece read payload: rendered content, display-encoded
    /// day fields and current hub memberships.
    pub fn piece_detail(&self, id: PieceId) -> Result<Option<PieceDetail>, PieceServiceError> {
        let Some(piece) = self.repo.find_piece(id)? else {
            return Ok(None);
        };

        let content_parsed = PieceRenderer::new(&self.repo).render(&piece)?;
        let knots = self.repo.list_knot_refs_for_member(id)?;

        Ok(Some(PieceDetail {
            id: piece.id,
            content: piece.content,
            content_parsed,
            knot: piece.knot,
            real_day: daykey::encode(&piece.real_day),
            day_key: daykey::encode(&piece.day_key),
            changed_at: daykey::encode(&piece.changed_at),
            knots,
        }))
    }

    fn read_back(
        &self,
        id: PieceId,
        missing: &'static str,
    ) -> Result<Piece, PieceServiceError> {
        self.repo
            .find_piece(id)?
            .ok_or(PieceServiceError::InconsistentState(missing))
    }
}

/// Normalizes editor input into a validated-shape draft.
///
/// Day fields are decoded from display form; a blank day defaults to
/// `fallback_day`; blank hub labels collapse to `None`.
fn draft_from_input(input: PieceInput, fallback_day: &str) -> PieceDraft {
    let submitted = daykey::decode(input.real_day.trim());
    let real_day = if submitted.is_empty() {
        fallback_day.to_string()
    } else {
        submitted
    };

    let knot = input
        .knot
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty());

    PieceDraft::new(input.content, knot, real_day)
}
