//! Single-pass USR parser.
//!
//! Drives the tokenizer, the sentence builder and the resolver over the input
//! in one linear pass:
//!
//! ```text
//!                   ┌────────── marker ──────────┐
//!                   ▼                            │
//! AwaitingSentence ──marker──▶ InSentence ──record──▶ InSentence
//!        │                        │        (mutate + re-finalize)
//!        └──record──▶ error       └──end of input──▶ finalize
//! ```
//!
//! The sentence collection is both written and read during the pass: after
//! every record the open sentence is re-finalized into it, so references made
//! by later lines (and later sentences) see everything parsed so far. All of
//! that state lives in [`ParserState`], owned by one [`Parser::run`] call.

use super::builder::SentenceBuilder;
use super::metrics::{RunMetrics, RunResult};
use super::resolver::{Resolver, SentenceMatcher, parse_references};
use super::tokenizer::{CORE_COLUMNS, Line, Record, SENTINEL, classify_line, lines};
use crate::error::{ParseError, Result};
use crate::{Options, SentenceCollection};
use std::time::Instant;

enum State {
    AwaitingSentence,
    InSentence(SentenceBuilder),
}

/// Mutable state threaded through one parse.
struct ParserState {
    state: State,
    sentences: SentenceCollection,
    metrics: RunMetrics,
}

impl ParserState {
    fn new() -> Self {
        ParserState { state: State::AwaitingSentence, sentences: SentenceCollection::new(), metrics: RunMetrics::default() }
    }

    /// Write the open sentence (if any) into the collection.
    fn close_sentence(&mut self) {
        if let State::InSentence(builder) = std::mem::replace(&mut self.state, State::AwaitingSentence) {
            self.metrics.dropped_relations += builder.dropped_relations();
            self.sentences.insert(builder.finalize());
        }
    }

    fn open_sentence(&mut self, id: String) {
        self.close_sentence();
        tracing::debug!(sentence = %id, "sentence opened");
        let builder = SentenceBuilder::new(id);
        self.sentences.insert(builder.finalize());
        self.state = State::InSentence(builder);
    }

    fn push_record(&mut self, record: &Record, matcher: &dyn SentenceMatcher) -> Result<()> {
        let State::InSentence(builder) = &mut self.state else {
            return Err(ParseError::MissingSentence { line: record.line });
        };

        tracing::trace!(line = record.line, id = record.id(), word = record.word(), "token record");
        builder.push_record(record)?;

        let additional = record.additional();
        if additional != SENTINEL {
            let resolver = Resolver { matcher, sentences: &self.sentences, current: builder };
            let resolved: Vec<_> =
                parse_references(additional).into_iter().map(|r| resolver.resolve(record.id(), r)).collect();

            for relation in &resolved {
                if !self.sentences.contains(&relation.target_sentence) {
                    self.metrics.unresolved_sentences += 1;
                } else if relation.target_token.is_some() && relation.target_word.is_none() {
                    self.metrics.unresolved_words += 1;
                }
            }
            builder.push_discourse(resolved);
        }

        self.sentences.insert(builder.finalize());
        Ok(())
    }
}

/// Parses one USR document.
///
/// Usage: `Parser::new(text, &options).run()`. Each run starts from an empty
/// collection, so parsing the same text twice gives equal results.
#[derive(Debug)]
pub struct Parser<'a> {
    input: &'a str,
    options: &'a Options,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, options: &'a Options) -> Self {
        Parser { input, options }
    }

    pub fn run(&self) -> Result<RunResult> {
        let start = Instant::now();
        let mut st = ParserState::new();

        for (line_no, line) in lines(self.input) {
            st.metrics.lines.total += 1;
            match classify_line(line_no, line)? {
                Line::SentenceMarker(id) => {
                    st.metrics.lines.markers += 1;
                    st.open_sentence(id);
                }
                Line::Record(record) => {
                    st.metrics.lines.records += 1;
                    if !record.present().contains(CORE_COLUMNS) {
                        st.metrics.lines.short_records += 1;
                    }
                    st.push_record(&record, &self.options.sentence_match)?;
                }
                Line::Metadata => st.metrics.lines.metadata += 1,
                Line::Blank => st.metrics.lines.blank += 1,
            }
        }
        st.close_sentence();

        st.metrics.total = start.elapsed();
        tracing::info!(
            sentences = st.sentences.len(),
            records = st.metrics.lines.records,
            dropped_relations = st.metrics.dropped_relations,
            elapsed = ?st.metrics.total,
            "parse finished"
        );

        Ok(RunResult { sentences: st.sentences, metrics: st.metrics })
    }
}
