//! Markup renderer with recursive hub expansion.
//!
//! # Responsibility
//! - Expand image, sound and `@pieces@` tokens into render-ready markup.
//! - Render hub members as single-line summaries with navigation links.
//!
//! # Invariants
//! - Rendering never writes; it only reads pieces through the repository.
//! - Token substitution order is fixed: image, sound, `@pieces@`, newline.
//! - Member summaries keep only the first line of member content; a piece's
//!   own primary render is never truncated.
//! - Hub expansion depth is capped at [`MAX_KNOT_DEPTH`].

use crate::daykey;
use crate::model::piece::{Piece, PieceId};
use crate::repo::piece_repo::{PieceRepository, RepoError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum nested hub expansions before rendering fails fast.
pub const MAX_KNOT_DEPTH: usize = 8;

const PIECES_TOKEN: &str = "@pieces@";

static IMG_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@img (.*?)@").expect("valid img token regex"));
static SOUND_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@sound (\S+) (.*?)@").expect("valid sound token regex"));

/// Rendering error: repository failure or runaway hub nesting.
#[derive(Debug)]
pub enum RenderError {
    Repo(RepoError),
    /// A hub cycle (or pathological nesting) exceeded the expansion cap.
    NestingTooDeep { piece_id: PieceId, limit: usize },
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::NestingTooDeep { piece_id, limit } => write!(
                f,
                "hub expansion for piece {piece_id} exceeded depth {limit}"
            ),
        }
    }
}

impl Error for RenderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::NestingTooDeep { .. } => None,
        }
    }
}

impl From<RepoError> for RenderError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Token-substitution engine over raw piece markup.
pub struct PieceRenderer<'a, R: PieceRepository> {
    repo: &'a R,
}

impl<'a, R: PieceRepository> PieceRenderer<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Renders one piece's full content.
    ///
    /// Issues one repository read per nested member, recursively. Has no
    /// side effects and mutates nothing.
    pub fn render(&self, piece: &Piece) -> Result<String, RenderError> {
        self.render_at(piece, 0)
    }

    fn render_at(&self, piece: &Piece, depth: usize) -> Result<String, RenderError> {
        if depth > MAX_KNOT_DEPTH {
            return Err(RenderError::NestingTooDeep {
                piece_id: piece.id,
                limit: MAX_KNOT_DEPTH,
            });
        }

        let text = IMG_TOKEN_RE.replace_all(
            &piece.content,
            r#"<img src="/assets/images/$1" />"#,
        );
        let text = SOUND_TOKEN_RE.replace_all(
            &text,
            r##"<a href="#" onclick="playSound('/assets/sounds/$1', '$2');">$2</a>"##,
        );

        let text = if text.contains(PIECES_TOKEN) {
            let listing = self.render_members(piece.id, depth)?;
            text.replace(PIECES_TOKEN, &listing)
        } else {
            text.into_owned()
        };

        Ok(text.replace('\n', "<br />"))
    }

    /// Renders the member listing of one hub, one line per member.
    ///
    /// Member content is truncated to its first line before re-entering the
    /// renderer, so nested tokens still expand. The trailing link label is
    /// the member's hub label when present, otherwise its display-encoded
    /// change timestamp.
    fn render_members(&self, hub_id: PieceId, depth: usize) -> Result<String, RenderError> {
        let members = self.repo.list_hub_members(hub_id)?;

        let mut listing = String::new();
        for member in members {
            let summary_piece = Piece {
                content: first_line(&member.content).to_string(),
                ..member.clone()
            };
            let summary = self.render_at(&summary_piece, depth + 1)?;
            let label = match member.knot.as_deref() {
                Some(knot) if !knot.is_empty() => knot.to_string(),
                _ => daykey::encode(&member.changed_at),
            };
            listing.push_str(&format!(
                "{summary}  <router-link :to=\"{{name: 'pieceOne', params:{{id: {id}}}}}\">{label}</router-link>\n",
                id = member.id,
            ));
        }

        Ok(listing)
    }
}

fn first_line(content: &str) -> &str {
    content.split('\n').next().unwrap_or(content)
}

#[cfg(test)]
mod tests {
    use super::first_line;

    #[test]
    fn first_line_discards_from_first_newline() {
        assert_eq!(first_line("line1\nline2\nline3"), "line1");
        assert_eq!(first_line("single"), "single");
        assert_eq!(first_line(""), "");
    }
}
