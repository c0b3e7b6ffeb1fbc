use crate::engine::{self, LineCounts, SentenceMatch};
use crate::error::{ParseError, Result};
use crate::SentenceCollection;
use std::path::Path;
use std::time::Duration;

/// Options that affect parsing.
///
/// Defaults reproduce the historical behaviour of the format's tooling,
/// including loose (substring) sentence matching for discourse references.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// How the sentence part of a discourse reference is matched against the
    /// ids of sentences parsed so far.
    pub sentence_match: SentenceMatch,
}

/// Result from [`parse_with`].
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub sentences: SentenceCollection,
    /// Total elapsed time spent parsing.
    pub elapsed: Duration,
}

/// A compact per-sentence summary used in verbose reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceSummary {
    pub id: String,
    pub tokens: usize,
    pub relations: usize,
    pub discourse_relations: usize,
    /// Surface form of the main token, if one was marked.
    pub main: Option<String>,
}

/// Additional details returned by [`parse_verbose_with`].
#[derive(Debug, Clone)]
pub struct ParseDetails {
    pub total: Duration,
    pub lines: LineCounts,
    /// Relations dropped because their target matched no token.
    pub dropped_relations: usize,
    /// Discourse references whose sentence part matched no sentence.
    pub unresolved_sentences: usize,
    /// Discourse references whose token was not found in the matched sentence.
    pub unresolved_words: usize,
    pub sentences: Vec<SentenceSummary>,
}

/// Result from [`parse_verbose_with`].
#[derive(Debug, Clone)]
pub struct ParseResultVerbose {
    pub sentences: SentenceCollection,
    pub elapsed: Duration,
    pub details: ParseDetails,
}

/// Parse USR `text` with default [`Options`].
///
/// # Example
/// ```
/// let text = "<sent_id=1>\n1\tRam\tN\t-\t0:main\n<sent_id=2>\n1\tvaha\tP\t-\t0:main\t1.1:coref";
/// let sentences = usr_graph::parse(text).unwrap();
///
/// let coref = &sentences.get("2").unwrap().discourse_relations[0];
/// assert_eq!(coref.target_sentence, "1");
/// assert_eq!(coref.target_word.as_deref(), Some("Ram"));
/// ```
pub fn parse(text: &str) -> Result<SentenceCollection> {
    parse_with(text, &Options::default()).map(|res| res.sentences)
}

/// Parse USR `text` using the provided `options`.
pub fn parse_with(text: &str, options: &Options) -> Result<ParseResult> {
    let run = engine::Parser::new(text, options).run()?;
    Ok(ParseResult { sentences: run.sentences, elapsed: run.metrics.total })
}

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ParseError::Io { path: path.to_path_buf(), source })
}

/// Read the whole file at `path` and parse it.
pub fn parse_path(path: impl AsRef<Path>, options: &Options) -> Result<ParseResult> {
    parse_with(&read_input(path.as_ref())?, options)
}

/// Like [`parse_path`], returning the same details as [`parse_verbose_with`].
pub fn parse_path_verbose(path: impl AsRef<Path>, options: &Options) -> Result<ParseResultVerbose> {
    parse_verbose_with(&read_input(path.as_ref())?, options)
}

/// Parse `text` and return per-run counters and per-sentence summaries.
pub fn parse_verbose_with(text: &str, options: &Options) -> Result<ParseResultVerbose> {
    let run = engine::Parser::new(text, options).run()?;

    let sentences = run
        .sentences
        .iter()
        .map(|graph| SentenceSummary {
            id: graph.id.clone(),
            tokens: graph.tokens.len(),
            relations: graph.tokens.iter().map(|t| t.relations.len()).sum(),
            discourse_relations: graph.discourse_relations.len(),
            main: graph.main_token().map(|t| t.form().to_string()),
        })
        .collect();

    let details = ParseDetails {
        total: run.metrics.total,
        lines: run.metrics.lines,
        dropped_relations: run.metrics.dropped_relations,
        unresolved_sentences: run.metrics.unresolved_sentences,
        unresolved_words: run.metrics.unresolved_words,
        sentences,
    };

    Ok(ParseResultVerbose { sentences: run.sentences, elapsed: run.metrics.total, details })
}

/// Narrow `sentences` down to the single sentence `id`.
pub fn select_sentence(sentences: &SentenceCollection, id: &str) -> Result<SentenceCollection> {
    let graph = sentences.get(id).ok_or_else(|| ParseError::SentenceNotFound { id: id.to_string() })?;
    Ok(std::iter::once(graph.clone()).collect())
}
