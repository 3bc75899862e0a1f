//! Domain model for journal pieces.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep day-field derivation rules in one place.
//!
//! # Invariants
//! - Every stored piece is identified by a store-assigned `PieceId`.
//! - `day_key` is always derived from `real_day`, never authored directly.

pub mod piece;
