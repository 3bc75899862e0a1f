//! Piece domain model.
//!
//! # Responsibility
//! - Define the canonical journal record and its write-side draft.
//! - Enforce day-field invariants before persistence.
//!
//! # Invariants
//! - `real_day` is exactly 8 ASCII digits (`YYYYMMDD`).
//! - `day_key` is the trailing 4 characters of `real_day`, recomputed on
//!   every write.
//! - A piece is a hub iff `knot` holds a non-empty label.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a stored piece, assigned by the store on insert.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type PieceId = i64;

/// Number of characters in a day-key.
pub const DAY_KEY_LEN: usize = 4;

/// Number of digits in a full `YYYYMMDD` day.
pub const REAL_DAY_LEN: usize = 8;

/// Canonical stored record for one journal piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    /// Store-assigned rowid; immutable once created.
    pub id: PieceId,
    /// Raw markup text. Rendering is derived on read, never stored.
    pub content: String,
    /// Hub label. A non-empty label makes this piece a hub that other
    /// pieces can declare membership in.
    pub knot: Option<String>,
    /// Calendar day in `YYYYMMDD` form.
    pub real_day: String,
    /// Trailing [`DAY_KEY_LEN`] characters of `real_day`.
    pub day_key: String,
    /// Store-assigned last-modification timestamp.
    pub changed_at: String,
}

impl Piece {
    /// Returns whether other pieces can link to this one by label.
    pub fn is_hub(&self) -> bool {
        matches!(self.knot.as_deref(), Some(label) if !label.is_empty())
    }
}

/// Write model consumed by insert/update operations.
///
/// The transient hub-membership list is intentionally not part of this
/// shape; it travels as a separate parameter to the write services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceDraft {
    pub content: String,
    pub knot: Option<String>,
    pub real_day: String,
    pub day_key: String,
}

impl PieceDraft {
    /// Creates a draft with `day_key` derived from `real_day`.
    pub fn new(
        content: impl Into<String>,
        knot: Option<String>,
        real_day: impl Into<String>,
    ) -> Self {
        let real_day = real_day.into();
        let day_key = day_key_of(&real_day);
        Self {
            content: content.into(),
            knot,
            real_day,
            day_key,
        }
    }

    /// Checks day-field invariants prior to persistence.
    ///
    /// # Errors
    /// - `InvalidRealDay` when `real_day` is not exactly 8 ASCII digits.
    /// - `DayKeyMismatch` when `day_key` is not the tail of `real_day`.
    pub fn validate(&self) -> Result<(), PieceValidationError> {
        if self.real_day.len() != REAL_DAY_LEN
            || !self.real_day.bytes().all(|byte| byte.is_ascii_digit())
        {
            return Err(PieceValidationError::InvalidRealDay(self.real_day.clone()));
        }

        if self.day_key != day_key_of(&self.real_day) {
            return Err(PieceValidationError::DayKeyMismatch {
                real_day: self.real_day.clone(),
                day_key: self.day_key.clone(),
            });
        }

        Ok(())
    }
}

/// Validation error raised before any piece write reaches SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PieceValidationError {
    /// `real_day` is not an 8-digit `YYYYMMDD` string.
    InvalidRealDay(String),
    /// `day_key` does not match the trailing characters of `real_day`.
    DayKeyMismatch { real_day: String, day_key: String },
}

impl Display for PieceValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRealDay(value) => {
                write!(f, "real_day must be 8 ASCII digits, got `{value}`")
            }
            Self::DayKeyMismatch { real_day, day_key } => write!(
                f,
                "day_key `{day_key}` is not the tail of real_day `{real_day}`"
            ),
        }
    }
}

impl Error for PieceValidationError {}

/// Derives the day-key grouping value from a full day string.
///
/// Returns the input unchanged when it is shorter than [`DAY_KEY_LEN`];
/// validation rejects such drafts before they are written.
pub fn day_key_of(real_day: &str) -> String {
    let tail_start = real_day.len().saturating_sub(DAY_KEY_LEN);
    real_day
        .get(tail_start..)
        .unwrap_or(real_day)
        .to_string()
}
