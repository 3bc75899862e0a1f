//! Site chrome rendering (header/footer pieces).
//!
//! # Responsibility
//! - Resolve the configured header/footer hub labels to pieces and render
//!   them for the page shell.
//!
//! # Invariants
//! - Every unresolved step (no configuration, blank label, missing hub)
//!   yields `None`, never an error.

use crate::render::{PieceRenderer, RenderError};
use crate::repo::piece_repo::PieceRepository;

/// Renders the pieces configured as site header and footer.
pub struct SiteService<R: PieceRepository> {
    repo: R,
}

impl<R: PieceRepository> SiteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Rendered site header, when one is configured and resolvable.
    pub fn header(&self) -> Result<Option<String>, RenderError> {
        let label = self.repo.site_chrome()?.header_knot;
        self.rendered_chrome(label)
    }

    /// Rendered site footer, when one is configured and resolvable.
    pub fn footer(&self) -> Result<Option<String>, RenderError> {
        let label = self.repo.site_chrome()?.footer_knot;
        self.rendered_chrome(label)
    }

    fn rendered_chrome(&self, label: Option<String>) -> Result<Option<String>, RenderError> {
        let Some(label) = label.filter(|value| !value.trim().is_empty()) else {
            return Ok(None);
        };
        let Some(piece) = self.repo.find_hub_by_label(&label)? else {
            return Ok(None);
        };

        PieceRenderer::new(&self.repo).render(&piece).map(Some)
    }
}
