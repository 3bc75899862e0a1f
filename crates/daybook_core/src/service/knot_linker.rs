//! Hub-membership edge maintenance.
//!
//! # Responsibility
//! - Keep each piece's outgoing knot edges consistent with its latest
//!   declared hub list.
//!
//! # Invariants
//! - `relink` replaces the member's full edge set; no stale edge survives.
//! - Labels that match no hub are skipped, never errors.
//! - Label order does not affect the resulting edge set.

use crate::model::piece::PieceId;
use crate::repo::piece_repo::{PieceRepository, RepoResult};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;

static KNOT_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\.\s*").expect("valid knot split regex"));

/// Splits a dot-separated hub list into labels.
///
/// Separators are `.` with optional surrounding whitespace; empty labels
/// after the split are dropped.
pub fn split_knot_labels(knot_from: &str) -> Vec<&str> {
    KNOT_SPLIT_RE
        .split(knot_from)
        .filter(|label| !label.is_empty())
        .collect()
}

/// Re-derives knot edges for one member piece.
pub struct KnotLinker<'a, R: PieceRepository> {
    repo: &'a R,
}

impl<'a, R: PieceRepository> KnotLinker<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Replaces every knot edge of `member_id` with edges derived from
    /// `knot_from`.
    ///
    /// Deletes the existing edge set first, then inserts one edge per label
    /// that resolves to a hub. No transaction is opened here; atomicity,
    /// where required, belongs to the store integration.
    pub fn relink(&self, member_id: PieceId, knot_from: &str) -> RepoResult<()> {
        self.repo.delete_knots_for_member(member_id)?;

        let labels = split_knot_labels(knot_from);
        let mut linked = 0usize;
        for &label in &labels {
            let Some(hub) = self.repo.find_hub_by_label(label)? else {
                debug!("event=relink module=knot status=skip member={member_id} label={label}");
                continue;
            };
            self.repo.insert_knot(hub.id, member_id)?;
            linked += 1;
        }

        info!(
            "event=relink module=knot status=ok member={member_id} labels={} linked={linked}",
            labels.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::split_knot_labels;

    #[test]
    fn split_drops_empty_labels() {
        assert_eq!(split_knot_labels("a.b."), vec!["a", "b"]);
        assert_eq!(split_knot_labels(""), Vec::<&str>::new());
        assert_eq!(split_knot_labels("..."), Vec::<&str>::new());
    }

    #[test]
    fn split_allows_whitespace_around_separators() {
        assert_eq!(split_knot_labels("a . b.c"), vec!["a", "b", "c"]);
    }
}
