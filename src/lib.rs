//! Parse USR (Universal Semantic Representation) annotations into sentence
//! graphs.
//!
//! A USR file is a sequence of blocks. Each block opens with a
//! `<sent_id=ID>` marker and lists one token per line in whitespace-separated
//! columns:
//!
//! ```text
//! <sent_id=1>
//! #Ram goes
//! 1   Ram    N   -   0:main   -   -   -   -
//! 2   goes   V   -   1:agent  -   -   -   -
//! ```
//!
//! [`parse`] turns that text into a [`SentenceCollection`]: one
//! [`SentenceGraph`] per sentence, each holding tokens with resolved
//! intra-sentence [`Relation`]s, the main predicate, and the
//! [`DiscourseRelation`]s that link tokens across sentences.
//!
//! ```
//! let text = "<sent_id=1>\n1\tRam\tN\t-\t0:main\n2\tgoes\tV\t-\t1:agent";
//! let sentences = usr_graph::parse(text).unwrap();
//! let graph = sentences.get("1").unwrap();
//! assert_eq!(graph.main_token().map(|t| t.form()), Some("Ram"));
//! ```

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod render;

pub use api::{
    Options, ParseDetails, ParseResult, ParseResultVerbose, SentenceSummary, parse, parse_path, parse_path_verbose,
    parse_verbose_with, parse_with, select_sentence,
};
pub use engine::{Block, Columns, Line, LineCounts, Record, SENTINEL, SentenceMatch, SentenceMatcher, blocks, classify_line};
pub use error::{ParseError, Result};
pub use render::{
    Cluster, ConstructionRoles, NaturalKey, RenderOptions, construction_clusters, natural_sort_key, sorted_sentence_ids,
    to_dot,
};

use serde::Serialize;
use serde::ser::SerializeMap;
use std::collections::HashMap;

// --- Sentence graph model ---------------------------------------------------

/// Free-form annotation columns carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    /// Column 2: part-of-speech / semantic category.
    pub semantic_category: String,
    /// Column 3: morphological or extra annotation.
    pub morpho_semantic: String,
    /// Column 6: speaker's view.
    pub speakers_view: String,
    /// Column 5: discourse / additional info, as written.
    pub additional_info: String,
}

/// A resolved intra-sentence edge. `target` is the position of the token the
/// relation points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    pub target: String,
    pub label: String,
}

/// A token as published to graph consumers.
///
/// The two identity fields are transposed relative to the input: `id` holds
/// the surface word and `word` holds the positional id. Renderers key token
/// nodes on `word` and rely on this layout, so it is kept as is. Prefer
/// [`Token::form`] and [`Token::position`] when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Surface word form (transposed).
    pub id: String,
    /// Positional id within the sentence (transposed).
    pub word: String,
    pub relations: Vec<Relation>,
    pub info: TokenInfo,
}

impl Token {
    /// Surface word form.
    pub fn form(&self) -> &str {
        &self.id
    }

    /// Positional id, unique within the sentence.
    pub fn position(&self) -> &str {
        &self.word
    }
}

/// A discourse or coreference edge starting at a token of one sentence.
///
/// `target_token` and `target_word` are `None` when the reference names a
/// whole sentence or could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscourseRelation {
    pub source_token: String,
    pub target_token: Option<String>,
    pub target_word: Option<String>,
    pub source_sentence: String,
    pub target_sentence: String,
    pub relation: String,
}

/// One parsed sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentenceGraph {
    #[serde(skip)]
    pub id: String,
    pub tokens: Vec<Token>,
    /// Position of the token marked `0:main`, if any.
    pub main: Option<String>,
    pub discourse_relations: Vec<DiscourseRelation>,
}

impl SentenceGraph {
    pub fn empty(id: impl Into<String>) -> Self {
        SentenceGraph { id: id.into(), tokens: Vec::new(), main: None, discourse_relations: Vec::new() }
    }

    /// First token at `position`.
    pub fn token_at(&self, position: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.position() == position)
    }

    /// The token marked as the root of the dependency structure.
    pub fn main_token(&self) -> Option<&Token> {
        self.main.as_deref().and_then(|pos| self.token_at(pos))
    }
}

// --- Sentence collection ----------------------------------------------------

/// Sentence graphs keyed by id, iterated in insertion order.
///
/// Re-inserting an id replaces its graph but keeps the original slot, so the
/// order always reflects when a sentence was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentenceCollection {
    entries: Vec<SentenceGraph>,
    index: HashMap<String, usize>,
}

impl SentenceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `graph` under its own id.
    pub fn insert(&mut self, graph: SentenceGraph) {
        match self.index.get(&graph.id) {
            Some(&slot) => self.entries[slot] = graph,
            None => {
                self.index.insert(graph.id.clone(), self.entries.len());
                self.entries.push(graph);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&SentenceGraph> {
        self.index.get(id).map(|&slot| &self.entries[slot])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sentence ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|g| g.id.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SentenceGraph> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a SentenceCollection {
    type Item = &'a SentenceGraph;
    type IntoIter = std::slice::Iter<'a, SentenceGraph>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<SentenceGraph> for SentenceCollection {
    fn from_iter<I: IntoIterator<Item = SentenceGraph>>(iter: I) -> Self {
        let mut collection = SentenceCollection::new();
        for graph in iter {
            collection.insert(graph);
        }
        collection
    }
}

/// Serializes as a JSON object keyed by sentence id, in insertion order.
impl Serialize for SentenceCollection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for graph in &self.entries {
            map.serialize_entry(&graph.id, graph)?;
        }
        map.end()
    }
}
