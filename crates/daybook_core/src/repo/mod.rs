//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the graph-store contract the engine is written against.
//! - Isolate SQLite query details from service/rendering orchestration.
//!
//! # Invariants
//! - Repository writes validate drafts before SQL mutations.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod piece_repo;
