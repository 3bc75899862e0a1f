//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, codec and renderer calls into use-case APIs.
//! - Keep HTTP/presentation layers decoupled from storage details.

pub mod day_service;
pub mod knot_linker;
pub mod piece_service;
pub mod site_service;

/// Today's calendar day in raw `YYYYMMDD` form (local time).
pub fn today_real_day() -> String {
    chrono::Local::now().format("%Y%m%d").to_string()
}
