//! Parse run metrics.
//!
//! Counters collected during a single pass. They feed
//! [`crate::ParseDetails`] and the CLI report; the plain [`crate::parse`] path
//! collects them too since they are cheap.

use crate::SentenceCollection;
use std::time::Duration;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineCounts {
    /// All lines seen after trimming the input.
    pub total: usize,
    pub markers: usize,
    pub records: usize,
    /// Records shorter than the speaker's-view column; the missing columns
    /// read as the sentinel.
    pub short_records: usize,
    /// Comment, metadata and single-column lines.
    pub metadata: usize,
    pub blank: usize,
}

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for the pass.
    pub total: Duration,
    pub lines: LineCounts,
    /// Relations dropped because their target matched no token.
    pub dropped_relations: usize,
    /// Discourse references whose sentence matched nothing.
    pub unresolved_sentences: usize,
    /// Discourse references that named a token which was not found.
    pub unresolved_words: usize,
}

/// Parser output bundled with its metrics.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub sentences: SentenceCollection,
    pub metrics: RunMetrics,
}
