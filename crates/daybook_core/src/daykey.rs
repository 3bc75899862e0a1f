//! Reversible day-key display codec.
//!
//! # Responsibility
//! - Make day-keys safe to place in URL path segments and type by hand by
//!   writing the digit `0` as the letter `o`.
//! - Keep the raw/display conversion deterministic and total.
//!
//! # Invariants
//! - `decode(encode(s)) == s` for any digit-only `s`.
//! - `encode` is idempotent.
//! - Characters outside `{0-9, o}` are dropped by `encode` (lossy for
//!   malformed input, identity-preserving for valid keys).

use once_cell::sync::Lazy;
use regex::Regex;

static FOREIGN_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9o]").expect("valid key charset regex"));

/// Encodes a raw day-key into display form.
///
/// Strips every character outside `{0-9, o}`, then writes every remaining
/// `0` as `o`. Callers must treat the result as best-effort for malformed
/// input; already-valid keys round-trip exactly.
pub fn encode(raw: &str) -> String {
    FOREIGN_CHARS_RE.replace_all(raw, "").replace('0', "o")
}

/// Decodes a display day-key back to raw form.
///
/// Replaces every `o` with `0`. Total over arbitrary input; does not check
/// that the result denotes a real day-key.
pub fn decode(display: &str) -> String {
    display.replace('o', "0")
}

#[cfg(test)]
mod tests {
    use super::{decode, encode};

    #[test]
    fn digit_strings_round_trip() {
        for raw in ["0101", "0115", "0201", "20250804", "0000"] {
            assert_eq!(decode(&encode(raw)), raw);
        }
    }

    #[test]
    fn encode_is_idempotent() {
        for raw in ["1020", "o1o1", "12a3", ""] {
            let once = encode(raw);
            assert_eq!(encode(&once), once);
        }
    }

    #[test]
    fn encode_strips_foreign_characters() {
        assert_eq!(encode("12a3"), "123");
        assert_eq!(encode("1020"), "1o2o");
        assert_eq!(encode("2025-08-04 10:00:00"), "2o25o8o41ooooo");
    }

    #[test]
    fn decode_is_total_and_unvalidated() {
        assert_eq!(decode("o1o1"), "0101");
        assert_eq!(decode("not-a-key"), "n0t-a-key");
        assert_eq!(decode(""), "");
    }
}
