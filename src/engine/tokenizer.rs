//! Record tokenizer.
//!
//! Splits raw USR text into numbered lines and classifies each one:
//!
//! ```text
//! <sent_id=Geo_1>            -> Line::SentenceMarker("Geo_1")
//! #raama jAwA hE             -> Line::Metadata      (reserved prefix)
//! %affirmative               -> Line::Metadata
//! lone_column                -> Line::Metadata      (single column)
//!                            -> Line::Blank
//! 1  rAma  per  -  2:k1      -> Line::Record(..)    (columns 0..=4)
//! ```
//!
//! Token records are whitespace-irregular in practice (tabs, runs of spaces,
//! both). Every run of whitespace counts as one column separator. Columns are
//! positional and any column past the end of the line reads as [`SENTINEL`].

use crate::error::{ParseError, Result};

/// Placeholder for an absent column.
pub const SENTINEL: &str = "-";

const COL_ID: usize = 0;
const COL_WORD: usize = 1;
const COL_CATEGORY: usize = 2;
const COL_MORPHO: usize = 3;
const COL_DEPENDENCY: usize = 4;
const COL_ADDITIONAL: usize = 5;
const COL_SPEAKERS_VIEW: usize = 6;
const COL_CONSTRUCTION: usize = 8;

/// Columns every complete record carries.
pub(crate) const CORE_COLUMNS: Columns = Columns::ID
    .union(Columns::WORD)
    .union(Columns::CATEGORY)
    .union(Columns::MORPHO)
    .union(Columns::DEPENDENCY)
    .union(Columns::ADDITIONAL)
    .union(Columns::SPEAKERS_VIEW);

bitflags::bitflags! {
    /// Named columns a record actually carried, as opposed to defaulting to
    /// the sentinel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Columns: u16 {
        const ID            = 1 << 0;
        const WORD          = 1 << 1;
        const CATEGORY      = 1 << 2;
        const MORPHO        = 1 << 3;
        const DEPENDENCY    = 1 << 4;
        const ADDITIONAL    = 1 << 5;
        const SPEAKERS_VIEW = 1 << 6;
        const CONSTRUCTION  = 1 << 8;
    }
}

/// One token line split into columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based line number in the input.
    pub line: usize,
    columns: Vec<String>,
}

impl Record {
    /// Split `text` on runs of whitespace.
    pub fn from_line(line: usize, text: &str) -> Self {
        let columns = regex!(r"\s+").split(text.trim()).filter(|c| !c.is_empty()).map(str::to_string).collect();
        Record { line, columns }
    }

    /// Column `idx`, or the sentinel when the line is too short.
    pub fn column(&self, idx: usize) -> &str {
        self.columns.get(idx).map(String::as_str).unwrap_or(SENTINEL)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn id(&self) -> &str {
        self.column(COL_ID)
    }

    pub fn word(&self) -> &str {
        self.column(COL_WORD)
    }

    pub fn category(&self) -> &str {
        self.column(COL_CATEGORY)
    }

    pub fn morpho(&self) -> &str {
        self.column(COL_MORPHO)
    }

    pub fn dependency(&self) -> &str {
        self.column(COL_DEPENDENCY)
    }

    pub fn additional(&self) -> &str {
        self.column(COL_ADDITIONAL)
    }

    pub fn speakers_view(&self) -> &str {
        self.column(COL_SPEAKERS_VIEW)
    }

    pub fn construction(&self) -> &str {
        self.column(COL_CONSTRUCTION)
    }

    /// Which named columns fall inside the line.
    pub fn present(&self) -> Columns {
        let mut present = Columns::empty();
        for idx in 0..self.columns.len() {
            present |= Columns::from_bits_truncate(1u16 << idx.min(15));
        }
        present
    }
}

/// A classified input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    SentenceMarker(String),
    Metadata,
    Blank,
    Record(Record),
}

/// Trimmed, 1-based numbered lines of `text`.
pub(crate) fn lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.trim().lines().enumerate().map(|(idx, line)| (idx + 1, line.trim()))
}

/// Classify a single (already trimmed) line.
pub fn classify_line(line_no: usize, line: &str) -> Result<Line> {
    if line.is_empty() {
        return Ok(Line::Blank);
    }

    if line.starts_with("<sent_id=") {
        let caps = regex!(r"<sent_id=\s*(\S+)>")
            .captures(line)
            .ok_or_else(|| ParseError::MalformedMarker { line: line_no, text: line.to_string() })?;
        return Ok(Line::SentenceMarker(caps[1].to_string()));
    }

    if line.starts_with(['#', '<', '%']) {
        return Ok(Line::Metadata);
    }

    let record = Record::from_line(line_no, line);
    if record.len() < 2 {
        return Ok(Line::Metadata);
    }

    Ok(Line::Record(record))
}

/// Token records grouped under their sentence marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub sentence_id: String,
    /// Line of the `<sent_id=...>` marker.
    pub line: usize,
    pub records: Vec<Record>,
}

/// Split `text` into per-sentence blocks.
///
/// Fails on the first record that precedes every sentence marker.
pub fn blocks(text: &str) -> Result<Vec<Block>> {
    let mut out: Vec<Block> = Vec::new();

    for (line_no, line) in lines(text) {
        match classify_line(line_no, line)? {
            Line::SentenceMarker(sentence_id) => out.push(Block { sentence_id, line: line_no, records: Vec::new() }),
            Line::Record(record) => match out.last_mut() {
                Some(block) => block.records.push(record),
                None => return Err(ParseError::MissingSentence { line: line_no }),
            },
            Line::Metadata | Line::Blank => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(line: &str) -> Record {
        match classify_line(1, line).unwrap() {
            Line::Record(r) => r,
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn collapses_mixed_whitespace() {
        let r = record("1 \t Ram\t\tN   -  0:main");
        assert_eq!(r.len(), 5);
        assert_eq!(r.id(), "1");
        assert_eq!(r.word(), "Ram");
        assert_eq!(r.category(), "N");
        assert_eq!(r.dependency(), "0:main");
    }

    #[test]
    fn missing_columns_read_as_sentinel() {
        let r = record("3\tkitAba");
        assert_eq!(r.category(), SENTINEL);
        assert_eq!(r.additional(), SENTINEL);
        assert_eq!(r.construction(), SENTINEL);
        assert_eq!(r.column(40), SENTINEL);
        assert_eq!(r.present(), Columns::ID | Columns::WORD);
    }

    #[test]
    fn full_line_reports_named_columns() {
        let r = record("1 Ram N - 0:main 2.1:coref - - 3:op1");
        assert_eq!(r.construction(), "3:op1");
        assert!(r.present().contains(Columns::CONSTRUCTION | Columns::SPEAKERS_VIEW | Columns::ADDITIONAL));
    }

    #[test]
    fn classifies_markers_and_metadata() {
        assert_eq!(classify_line(1, "<sent_id=Geo_nios_1a>").unwrap(), Line::SentenceMarker("Geo_nios_1a".to_string()));
        assert_eq!(classify_line(1, "<sent_id= 2>").unwrap(), Line::SentenceMarker("2".to_string()));
        assert_eq!(classify_line(1, "#rAma jAwA hE").unwrap(), Line::Metadata);
        assert_eq!(classify_line(1, "%affirmative").unwrap(), Line::Metadata);
        assert_eq!(classify_line(1, "</sent_id>").unwrap(), Line::Metadata);
        assert_eq!(classify_line(1, "affirmative").unwrap(), Line::Metadata);
        assert_eq!(classify_line(1, "").unwrap(), Line::Blank);
    }

    #[test]
    fn marker_without_id_is_an_error() {
        let err = classify_line(4, "<sent_id=>").unwrap_err();
        assert!(matches!(err, ParseError::MalformedMarker { line: 4, .. }));
    }

    #[test]
    fn groups_records_into_blocks() {
        let text = "<sent_id=1>\n#comment\n1\tRam\n2\tgoes\n\n<sent_id=2>\n1\tSita";
        let out = blocks(text).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].sentence_id, "1");
        assert_eq!(out[0].records.len(), 2);
        assert_eq!(out[1].line, 6);
        assert_eq!(out[1].records[0].word(), "Sita");
    }

    #[test]
    fn record_before_marker_fails_fast() {
        let err = blocks("1\tRam\n<sent_id=1>").unwrap_err();
        assert!(matches!(err, ParseError::MissingSentence { line: 1 }));
    }
}
