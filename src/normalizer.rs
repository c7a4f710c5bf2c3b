//! Normalization of raw feed lines into canonical prefixes.
//!
//! Feeds are untrusted and inconsistently formatted: comment lines, inline
//! comments, bare addresses, CIDR blocks with stray host bits. [`normalize`]
//! is total: every line yields either a [`Prefix`] or a classified failure,
//! never a propagated error.

use crate::prefix::Prefix;

/// Classification of a line that produced no prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailure {
    /// Nothing left after comment stripping and trimming. Dropped silently,
    /// not counted as a rejection.
    Empty,
    /// A non-empty token that is not an address or CIDR block. Counted.
    Invalid,
}

/// Normalize one raw feed line.
///
/// Strips an inline comment (everything from the first `#` or `;`), trims
/// whitespace, then parses the remaining token as an address or CIDR block.
/// A bare address becomes a `/32` or `/128` prefix; host bits beyond the
/// prefix length are masked to zero.
pub fn normalize(raw: &str) -> Result<Prefix, ParseFailure> {
    let stripped = match raw.find(|c| c == '#' || c == ';') {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    let token = stripped.trim();
    if token.is_empty() {
        return Err(ParseFailure::Empty);
    }
    token.parse().map_err(|_| ParseFailure::Invalid)
}
