//! The deduplicated working set of prefixes for one address family.

use std::collections::HashSet;

use crate::normalizer::{normalize, ParseFailure};
use crate::prefix::{Family, Prefix};

/// Prefixes of one family accumulated from one or more source bodies.
///
/// Set semantics: inserting an already-present prefix is a no-op. The family
/// is fixed at construction, so a mixed-family corpus cannot exist and the
/// aggregator's single-family precondition holds by construction. Lines of
/// the other family count as rejections, like any other unusable line.
#[derive(Debug, Clone)]
pub struct Corpus {
    family: Family,
    prefixes: HashSet<Prefix>,
    raw_lines: usize,
    rejected: usize,
}

impl Corpus {
    /// Create an empty corpus for one address family.
    pub fn new(family: Family) -> Self {
        Self {
            family,
            prefixes: HashSet::new(),
            raw_lines: 0,
            rejected: 0,
        }
    }

    /// Feed one source body through the normalizer, line by line.
    ///
    /// Comment-only and blank lines are dropped silently; malformed lines and
    /// lines of the other family increment the rejection counter. May be
    /// called once per source to pool several sources into one corpus.
    pub fn ingest(&mut self, body: &str) {
        for line in body.lines() {
            self.raw_lines += 1;
            match normalize(line) {
                Ok(prefix) if prefix.family() == self.family => {
                    self.prefixes.insert(prefix);
                }
                Ok(_) => self.rejected += 1,
                Err(ParseFailure::Invalid) => self.rejected += 1,
                Err(ParseFailure::Empty) => {}
            }
        }
    }

    /// Add one already-normalized prefix.
    ///
    /// Returns whether the set grew. A prefix of the other family is not
    /// added and counts as a rejection.
    pub fn insert(&mut self, prefix: Prefix) -> bool {
        if prefix.family() != self.family {
            self.rejected += 1;
            return false;
        }
        self.prefixes.insert(prefix)
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// Number of unique prefixes collected so far.
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Total lines seen across all ingested bodies.
    pub fn raw_lines(&self) -> usize {
        self.raw_lines
    }

    /// Lines rejected as malformed or wrong-family.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn contains(&self, prefix: &Prefix) -> bool {
        self.prefixes.contains(prefix)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prefix> {
        self.prefixes.iter()
    }
}
