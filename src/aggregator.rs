//! Prefix aggregation: the algorithmic core.
//!
//! Reduces a [`Corpus`] to the smallest sorted list of non-overlapping
//! prefixes covering exactly the same address space, in two phases:
//! subsumption removal over a `(base, len)`-sorted list, then sibling merging
//! repeated to a fixed point.

use crate::corpus::Corpus;
use crate::prefix::{Family, Prefix};

/// The minimal, sorted, non-overlapping output of [`aggregate`].
///
/// Created only by the aggregator and immutable afterwards: no two entries
/// overlap, no two adjacent entries are mergeable siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedPrefixes {
    family: Family,
    prefixes: Vec<Prefix>,
}

impl AggregatedPrefixes {
    pub fn family(&self) -> Family {
        self.family
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn as_slice(&self) -> &[Prefix] {
        &self.prefixes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Prefix> {
        self.prefixes.iter()
    }

    /// Serialize as newline-terminated canonical prefix lines, ascending.
    ///
    /// This is both the plaintext artifact format and the external compiler's
    /// input format.
    pub fn to_plaintext(&self) -> String {
        let mut out = String::new();
        for prefix in &self.prefixes {
            out.push_str(&prefix.to_string());
            out.push('\n');
        }
        out
    }
}

/// Aggregate a corpus into its minimal covering prefix set.
///
/// Deterministic and purely computational: takes a snapshot of the corpus and
/// never fails on valid input. An empty corpus yields an empty result.
pub fn aggregate(corpus: &Corpus) -> AggregatedPrefixes {
    let mut prefixes: Vec<Prefix> = corpus.iter().copied().collect();
    prefixes.sort_unstable();
    prefixes.dedup();

    // Phase 1: drop prefixes covered by a broader retained one. Sorted by
    // (base, len), a covering prefix sorts at or before everything it covers,
    // so one scan against the last retained prefix suffices.
    let mut retained: Vec<Prefix> = Vec::with_capacity(prefixes.len());
    for prefix in prefixes {
        match retained.last() {
            Some(last) if last.contains(&prefix) => {}
            _ => retained.push(prefix),
        }
    }

    // Phase 2: collapse sibling pairs into their parent until a full pass
    // finds none. Merged parents can themselves be siblings one level up, so
    // the pass repeats; each merge shrinks the list, so this terminates.
    loop {
        let mut merged: Vec<Prefix> = Vec::with_capacity(retained.len());
        let mut changed = false;
        let mut i = 0;
        while i < retained.len() {
            if i + 1 < retained.len() && retained[i].is_sibling_of(&retained[i + 1]) {
                if let Some(parent) = retained[i].parent() {
                    merged.push(parent);
                    changed = true;
                    i += 2;
                    continue;
                }
            }
            merged.push(retained[i]);
            i += 1;
        }
        retained = merged;
        if !changed {
            break;
        }
    }

    // Both phases preserve base order, but the sorted postcondition should
    // not rest on that argument.
    retained.sort_unstable();

    AggregatedPrefixes {
        family: corpus.family(),
        prefixes: retained,
    }
}
