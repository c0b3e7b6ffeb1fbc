//! Cross-sentence resolution of discourse references.
//!
//! The additional-info column (column 5) holds `|`-separated
//! `reference:label` pairs. A reference takes one of three shapes:
//!
//! ```text
//! 3            same sentence, token 3
//! Geo_2.4      sentence matching "Geo_2", token 4   (split at the last dot)
//! Geo_2        sentence matching "Geo_2", no token
//! ```
//!
//! Resolution is best-effort. Every reference yields exactly one
//! [`DiscourseRelation`]; whatever cannot be found is left as `None` (token,
//! word) or as the raw text (sentence).
//!
//! Sentence lookup goes through a [`SentenceMatcher`]. The default
//! [`SentenceMatch::Substring`] accepts the first collection id that
//! *contains* the reference, so `"1"` also matches `"10"` or `"Geo_21"`;
//! [`SentenceMatch::Exact`] only accepts equal ids.

use super::builder::SentenceBuilder;
use crate::{DiscourseRelation, SentenceCollection};

/// Decides whether a sentence id satisfies the sentence part of a reference.
pub trait SentenceMatcher {
    fn matches(&self, sentence_id: &str, reference: &str) -> bool;
}

/// Built-in sentence matching strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SentenceMatch {
    /// `sentence_id` contains `reference`.
    #[default]
    Substring,
    /// `sentence_id` equals `reference`.
    Exact,
}

impl SentenceMatcher for SentenceMatch {
    fn matches(&self, sentence_id: &str, reference: &str) -> bool {
        match self {
            SentenceMatch::Substring => sentence_id.contains(reference),
            SentenceMatch::Exact => sentence_id == reference,
        }
    }
}

impl<F> SentenceMatcher for F
where
    F: Fn(&str, &str) -> bool,
{
    fn matches(&self, sentence_id: &str, reference: &str) -> bool {
        self(sentence_id, reference)
    }
}

/// Where a reference points, before any lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Target {
    /// Bare digits: a token of the current sentence.
    SameSentence { token: String },
    /// `sentence.token`.
    Qualified { sentence: String, token: String },
    /// A sentence with no specific token.
    Sentence { sentence: String },
}

/// A parsed `reference:label` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DiscourseReference {
    pub target: Target,
    pub label: String,
}

impl Target {
    fn parse(reference: &str) -> Self {
        if !reference.is_empty() && reference.bytes().all(|b| b.is_ascii_digit()) {
            return Target::SameSentence { token: reference.to_string() };
        }
        match reference.rsplit_once('.') {
            Some((sentence, token)) => Target::Qualified { sentence: sentence.to_string(), token: token.to_string() },
            None => Target::Sentence { sentence: reference.to_string() },
        }
    }
}

/// Parse the additional-info column. Entries without a colon are ignored.
pub(crate) fn parse_references(column: &str) -> Vec<DiscourseReference> {
    column
        .split('|')
        .filter_map(|entry| {
            let (reference, label) = entry.split_once(':')?;
            Some(DiscourseReference { target: Target::parse(reference), label: label.to_string() })
        })
        .collect()
}

/// Resolves references for tokens of the sentence in `current`.
pub(crate) struct Resolver<'a> {
    pub matcher: &'a dyn SentenceMatcher,
    pub sentences: &'a SentenceCollection,
    pub current: &'a SentenceBuilder,
}

impl Resolver<'_> {
    /// Resolve `reference` made by token `source_token` of the current sentence.
    pub fn resolve(&self, source_token: &str, reference: DiscourseReference) -> DiscourseRelation {
        let source_sentence = self.current.id();

        let (target_sentence, target_token) = match reference.target {
            Target::SameSentence { token } => (source_sentence.to_string(), Some(token)),
            Target::Qualified { sentence, token } => (sentence, Some(token)),
            Target::Sentence { sentence } => (sentence, None),
        };

        let (found, target_word) = if target_sentence == source_sentence {
            let word = target_token.as_deref().and_then(|t| self.current.word_at(t)).map(str::to_string);
            (Some(source_sentence.to_string()), word)
        } else {
            match self.find_sentence(&target_sentence) {
                Some(found) => {
                    let word = target_token.as_deref().and_then(|t| self.word_in(found, t));
                    (Some(found.to_string()), word)
                }
                None => (None, None),
            }
        };

        if found.is_none() {
            tracing::debug!(source = %source_sentence, reference = %target_sentence, "discourse reference matches no sentence");
        } else if target_token.is_some() && target_word.is_none() {
            tracing::debug!(
                source = %source_sentence,
                sentence = %target_sentence,
                token = ?target_token,
                "discourse reference names an unknown token"
            );
        }

        DiscourseRelation {
            source_token: source_token.to_string(),
            target_token,
            target_word,
            source_sentence: source_sentence.to_string(),
            target_sentence: found.unwrap_or(target_sentence),
            relation: reference.label,
        }
    }

    /// First sentence id, in insertion order, accepted by the matcher.
    fn find_sentence(&self, reference: &str) -> Option<&str> {
        self.sentences.ids().find(|id| self.matcher.matches(id, reference))
    }

    fn word_in(&self, sentence_id: &str, position: &str) -> Option<String> {
        // The collection copy of the open sentence lags one record behind.
        if sentence_id == self.current.id() {
            return self.current.word_at(position).map(str::to_string);
        }
        self.sentences.get(sentence_id)?.token_at(position).map(|t| t.form().to_string())
    }
}
