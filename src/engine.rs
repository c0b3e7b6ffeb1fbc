//! Parsing engine.
//!
//! Parsing a USR document is a single pass over its lines:
//!
//! ```text
//! text ── lines() ── classify_line ──┬─ SentenceMarker ─▶ open SentenceBuilder
//!         (tokenizer.rs)             ├─ Record ─────────▶ SentenceBuilder::push_record
//!                                    │                    (builder.rs)
//!                                    │                      └─ additional-info column
//!                                    │                         └─ Resolver::resolve
//!                                    │                            (resolver.rs)
//!                                    └─ Metadata / Blank ─▶ skipped
//!                                               │
//!                                               ▼
//!                              SentenceCollection (parser.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `tokenizer.rs`: line classification and the fixed column layout of token
//!   records, with the `-` sentinel for absent columns.
//! - `builder.rs`: per-sentence token list, main-token detection and
//!   intra-sentence relation resolution.
//! - `resolver.rs`: discourse reference grammar and cross-sentence lookup
//!   through a pluggable [`SentenceMatcher`].
//! - `parser.rs`: the sentence state machine and the explicit parser state
//!   that owns the collection during a run.
//! - `metrics.rs`: counters and timings for a run.
//!
//! ## Debugging
//!
//! The engine emits `tracing` events; the CLI shows them when `USR_GRAPH_LOG`
//! is set (for example `USR_GRAPH_LOG=usr_graph=debug`).

#[path = "engine/builder.rs"]
mod builder;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/parser.rs"]
mod parser;
#[path = "engine/resolver.rs"]
mod resolver;
#[path = "engine/tokenizer.rs"]
mod tokenizer;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use metrics::LineCounts;
pub use parser::Parser;
pub use resolver::{SentenceMatch, SentenceMatcher};
pub use tokenizer::{Block, Columns, Line, Record, SENTINEL, blocks, classify_line};
