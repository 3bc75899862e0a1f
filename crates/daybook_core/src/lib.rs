//! Core domain logic for Daybook.
//! This crate is the single source of truth for journal and rendering
//! invariants; HTTP, auth and upload plumbing live in outer shells.

pub mod config;
pub mod daykey;
pub mod db;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod service;

pub use config::{Config, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::piece::{day_key_of, Piece, PieceDraft, PieceId, PieceValidationError};
pub use render::{PieceRenderer, RenderError, MAX_KNOT_DEPTH};
pub use repo::piece_repo::{
    KnotRef, PieceRepository, RepoError, RepoResult, SiteChrome, SqlitePieceRepository,
};
pub use service::day_service::{DayNeighbors, DayPage, DayPagePiece, DayService};
pub use service::knot_linker::{split_knot_labels, KnotLinker};
pub use service::piece_service::{PieceDetail, PieceInput, PieceService, PieceServiceError};
pub use service::site_service::SiteService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
