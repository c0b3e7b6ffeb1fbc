use usr_graph::{ParseDetails, SentenceSummary};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

/// Print a parse report to stderr; stdout may carry the rendered graph.
pub fn print_run(source: &str, details: &ParseDetails, color: bool) {
    let palette = ansi::Palette::new(color);
    eprintln!("\n{}", palette.bold(palette.paint(format!("⚙  Parsing: {}", source), ansi::CYAN)));

    eprintln!("\n{}", palette.paint("━━━ Lines ━━━", ansi::GRAY));
    let lines = &details.lines;
    eprintln!(
        "  {} total  │  {} markers  │  {} records  │  {} metadata  │  {} blank",
        palette.bold(lines.total.to_string()),
        palette.paint(lines.markers.to_string(), ansi::BLUE),
        palette.paint(lines.records.to_string(), ansi::GREEN),
        palette.dim(lines.metadata.to_string()),
        palette.dim(lines.blank.to_string()),
    );
    if lines.short_records > 0 {
        eprintln!(
            "  {}",
            palette.paint(format!("{} records with missing columns (read as '-')", lines.short_records), ansi::YELLOW)
        );
    }

    eprintln!("\n{}", palette.paint("━━━ Sentences ━━━", ansi::GRAY));
    if details.sentences.is_empty() {
        eprintln!("{}", palette.dim("  No sentences found"));
        eprintln!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        eprintln!("  • The input has no <sent_id=...> markers");
        eprintln!("  • Every line is a comment or single-column line");
    } else {
        for (idx, sentence) in details.sentences.iter().enumerate() {
            eprintln!("  {}", fmt_sentence(idx, sentence, &palette));
        }
    }

    eprintln!("\n{}", palette.paint("━━━ Resolution ━━━", ansi::GRAY));
    eprintln!("  {} {}", palette.dim("dropped relations:"), fmt_count(details.dropped_relations, &palette));
    eprintln!("  {} {}", palette.dim("unmatched sentences:"), fmt_count(details.unresolved_sentences, &palette));
    eprintln!("  {} {}", palette.dim("unknown tokens:"), fmt_count(details.unresolved_words, &palette));
    if details.dropped_relations + details.unresolved_sentences + details.unresolved_words > 0 {
        eprintln!("\n{}", palette.dim("  Tip: Set USR_GRAPH_LOG=usr_graph=debug to see each unresolved reference"));
    }

    eprintln!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    eprintln!("  Total: {}", palette.paint(format!("{:?}", details.total), ansi::GREEN));
    eprintln!();
}

fn fmt_count(count: usize, palette: &ansi::Palette) -> String {
    if count == 0 { palette.paint("✓ 0", ansi::GREEN) } else { palette.paint(format!("✗ {}", count), ansi::YELLOW) }
}

fn fmt_sentence(idx: usize, sentence: &SentenceSummary, palette: &ansi::Palette) -> String {
    let main = match &sentence.main {
        Some(main) => palette.bold(palette.paint(main, ansi::GREEN)),
        None => palette.dim("(no main)"),
    };
    format!(
        "{} {} {} {}  {} {} tokens, {} relations, {} discourse",
        palette.paint(format!("[{}]", idx), ansi::GRAY),
        palette.paint(&sentence.id, ansi::CYAN),
        palette.dim("main:"),
        main,
        palette.dim("│"),
        sentence.tokens,
        sentence.relations,
        sentence.discourse_relations,
    )
}
