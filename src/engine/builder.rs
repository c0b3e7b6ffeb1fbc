//! Sentence graph builder.
//!
//! Accumulates the records of one sentence and turns them into a
//! [`SentenceGraph`]. Building is incremental: [`SentenceBuilder::push_record`]
//! is called once per token line and [`SentenceBuilder::finalize`] may be
//! called at any point to get a snapshot of the sentence so far.
//!
//! ```text
//! Record ──▶ DraftToken { position, form, raw relations, info }
//!                │
//!      finalize  ▼
//!   word→position map ──▶ resolved relations ──▶ Token (id/word transposed)
//! ```
//!
//! Relation targets in the construction column are written as words, so the
//! raw target is first looked up as a word and only then as a position.

use super::tokenizer::{Record, SENTINEL};
use crate::error::{ParseError, Result};
use crate::{DiscourseRelation, Relation, SentenceGraph, Token, TokenInfo};
use std::collections::{HashMap, HashSet};

/// Dependency entry that marks the sentence root.
pub(crate) const ROOT_MARKER: &str = "0:main";

/// A `target:label` pair as written in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawRelation {
    pub target: String,
    pub label: String,
}

impl RawRelation {
    /// The `0:main` entry marks the root; it never names a token.
    fn is_root_marker(&self) -> bool {
        ROOT_MARKER.split_once(':') == Some((self.target.as_str(), self.label.as_str()))
    }
}

/// A token before relation resolution, with its input roles intact.
#[derive(Debug, Clone)]
pub(crate) struct DraftToken {
    pub position: String,
    pub form: String,
    pub relations: Vec<RawRelation>,
    pub info: TokenInfo,
}

/// Split a dependency or construction column into raw relations.
///
/// Each `|`-separated entry must contain a colon; the first one separates
/// target from label.
pub(crate) fn parse_relations(line: usize, column: &str) -> Result<Vec<RawRelation>> {
    column
        .split('|')
        .map(|entry| {
            let (target, label) = entry
                .split_once(':')
                .ok_or_else(|| ParseError::MalformedRelation { line, entry: entry.to_string() })?;
            Ok(RawRelation { target: target.to_string(), label: label.to_string() })
        })
        .collect()
}

/// True when the last entry of a dependency column is the root marker.
pub(crate) fn is_root(dependency: &str) -> bool {
    dependency.rsplit('|').next() == Some(ROOT_MARKER)
}

fn has_value(column: &str) -> bool {
    !column.is_empty() && column != SENTINEL
}

/// In-progress state of the sentence currently being parsed.
#[derive(Debug, Clone)]
pub(crate) struct SentenceBuilder {
    id: String,
    drafts: Vec<DraftToken>,
    main: Option<String>,
    discourse: Vec<DiscourseRelation>,
}

impl SentenceBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        SentenceBuilder { id: id.into(), drafts: Vec::new(), main: None, discourse: Vec::new() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Append the token described by `record`.
    ///
    /// Relations come from the dependency column when it has a value,
    /// otherwise from the construction column.
    pub fn push_record(&mut self, record: &Record) -> Result<&DraftToken> {
        let dependency = record.dependency();
        let construction = record.construction();

        let relations = if has_value(dependency) {
            parse_relations(record.line, dependency)?
        } else if has_value(construction) {
            parse_relations(record.line, construction)?
        } else {
            Vec::new()
        };

        if is_root(dependency) {
            if let Some(previous) = &self.main {
                tracing::debug!(sentence = %self.id, previous = %previous, "main token marked twice; keeping the later one");
            }
            self.main = Some(record.id().to_string());
        }

        let info = TokenInfo {
            semantic_category: record.category().to_string(),
            morpho_semantic: record.morpho().to_string(),
            speakers_view: record.speakers_view().to_string(),
            additional_info: record.additional().to_string(),
        };

        self.drafts.push(DraftToken {
            position: record.id().to_string(),
            form: record.word().to_string(),
            relations,
            info,
        });

        Ok(&self.drafts[self.drafts.len() - 1])
    }

    /// Surface form of the first token at `position`.
    pub fn word_at(&self, position: &str) -> Option<&str> {
        self.drafts.iter().find(|d| d.position == position).map(|d| d.form.as_str())
    }

    pub fn push_discourse(&mut self, relations: impl IntoIterator<Item = DiscourseRelation>) {
        self.discourse.extend(relations);
    }

    /// Number of raw relations, root markers aside, that currently resolve to
    /// no token.
    pub fn dropped_relations(&self) -> usize {
        let lookup = self.target_lookup();
        self.drafts
            .iter()
            .flat_map(|d| d.relations.iter().map(move |r| (d, r)))
            .filter(|(_, r)| !r.is_root_marker() && resolve_target(&lookup, &r.target).is_none())
            .inspect(|(d, r)| {
                tracing::debug!(
                    sentence = %self.id,
                    source = %d.position,
                    target = %r.target,
                    label = %r.label,
                    "relation target matches no token"
                );
            })
            .count()
    }

    /// Snapshot the sentence as a graph.
    pub fn finalize(&self) -> SentenceGraph {
        let lookup = self.target_lookup();

        let tokens = self
            .drafts
            .iter()
            .map(|draft| {
                let relations = draft
                    .relations
                    .iter()
                    .filter_map(|raw| {
                        let target = resolve_target(&lookup, &raw.target)?;
                        Some(Relation { target: target.to_string(), label: raw.label.clone() })
                    })
                    .collect();

                Token { id: draft.form.clone(), word: draft.position.clone(), relations, info: draft.info.clone() }
            })
            .collect();

        SentenceGraph { id: self.id.clone(), tokens, main: self.main.clone(), discourse_relations: self.discourse.clone() }
    }

    fn target_lookup(&self) -> TargetLookup<'_> {
        let mut by_word = HashMap::with_capacity(self.drafts.len());
        let mut positions = HashSet::with_capacity(self.drafts.len());
        for draft in &self.drafts {
            by_word.insert(draft.form.as_str(), draft.position.as_str());
            positions.insert(draft.position.as_str());
        }
        TargetLookup { by_word, positions }
    }
}

struct TargetLookup<'a> {
    /// Later duplicates of a word win.
    by_word: HashMap<&'a str, &'a str>,
    positions: HashSet<&'a str>,
}

fn resolve_target<'a>(lookup: &TargetLookup<'a>, raw: &str) -> Option<&'a str> {
    lookup.by_word.get(raw).or_else(|| lookup.positions.get(raw)).copied()
}
