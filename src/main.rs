mod debug_report;

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use usr_graph::{ConstructionRoles, Options, RenderOptions, SentenceMatch, parse_path_verbose, select_sentence, to_dot};

const LOG_ENV: &str = "USR_GRAPH_LOG";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    init_logging();

    if let Err(err) = run(&config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Dot,
    Json,
}

struct CliConfig {
    input: PathBuf,
    sentence: Option<String>,
    output: Option<String>,
    format: Format,
    sentence_match: SentenceMatch,
    roles: ConstructionRoles,
    report: bool,
    color: bool,
}

fn run(config: &CliConfig) -> Result<(), String> {
    let options = Options { sentence_match: config.sentence_match };
    let res = parse_path_verbose(&config.input, &options).map_err(|err| err.to_string())?;

    let sentences = match &config.sentence {
        Some(id) => select_sentence(&res.sentences, id).map_err(|err| err.to_string())?,
        None => res.sentences.clone(),
    };

    if config.report {
        debug_report::print_run(&config.input.display().to_string(), &res.details, config.color);
    }

    let rendered = match config.format {
        Format::Dot => {
            let render = RenderOptions { roles: config.roles.clone(), ..RenderOptions::default() };
            to_dot(&sentences, &render)
        }
        Format::Json => serde_json::to_string_pretty(&sentences).map_err(|err| err.to_string())? + "\n",
    };

    let output = config.output.clone().unwrap_or_else(|| default_output(config));
    if output == "-" {
        io::stdout().write_all(rendered.as_bytes()).map_err(|err| format!("failed to write stdout: {err}"))?;
    } else {
        std::fs::write(&output, rendered).map_err(|err| format!("failed to write `{output}`: {err}"))?;
        eprintln!("Graph written to {output}");
    }

    Ok(())
}

fn default_output(config: &CliConfig) -> String {
    let ext = match config.format {
        Format::Dot => "dot",
        Format::Json => "json",
    };
    match &config.sentence {
        Some(id) => format!("output_graph_{id}.{ext}"),
        None => format!("output_graph.{ext}"),
    }
}

fn parse_args() -> Result<CliConfig, String> {
    let mut positional: Vec<String> = Vec::new();
    let mut output: Option<String> = None;
    let mut format = Format::Dot;
    let mut sentence_match = SentenceMatch::Substring;
    let mut roles = ConstructionRoles::default();
    let mut report = false;
    let mut color = io::stderr().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("usr-graph {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--report" => report = true,
            "--exact" => sentence_match = SentenceMatch::Exact,
            "-o" | "--output" => {
                let value = args.next().ok_or_else(|| "error: --output expects a value".to_string())?;
                output = Some(value);
            }
            "--format" => {
                let value = args.next().ok_or_else(|| "error: --format expects a value".to_string())?;
                format = parse_format(&value)?;
            }
            "--role" => {
                let value = args.next().ok_or_else(|| "error: --role expects a value".to_string())?;
                roles.insert(value);
            }
            "--" => {
                positional.extend(args.by_ref());
                break;
            }
            _ if arg.starts_with("--output=") => output = Some(arg.trim_start_matches("--output=").to_string()),
            _ if arg.starts_with("--format=") => format = parse_format(arg.trim_start_matches("--format="))?,
            _ if arg.starts_with("--role=") => {
                roles.insert(arg.trim_start_matches("--role="));
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let input = positional.next().ok_or_else(|| format!("error: no input file provided\n\n{}", help_text()))?;
    let sentence = positional.next();
    if let Some(extra) = positional.next() {
        return Err(format!("error: unexpected argument '{extra}'"));
    }

    Ok(CliConfig { input: PathBuf::from(input), sentence, output, format, sentence_match, roles, report, color })
}

fn parse_format(value: &str) -> Result<Format, String> {
    match value {
        "dot" => Ok(Format::Dot),
        "json" => Ok(Format::Json),
        _ => Err(format!("error: invalid --format '{value}' (expected dot or json)")),
    }
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "usr-graph {version}

Convert USR annotations into a sentence graph (Graphviz DOT or JSON).

Usage:
  usr-graph [OPTIONS] <input-file> [sent-id]

Arguments:
  <input-file>               USR file to parse.
  [sent-id]                  Only output this sentence.

Options:
  --format <dot|json>        Output format. Default: dot
  -o, --output <path>        Output file, or '-' for stdout.
                             Default: output_graph[_<sent-id>].<format>
  --exact                    Match discourse references to sentence ids exactly
                             instead of by substring.
  --role <label>             Add a construction role (repeatable).
  --report                   Print a parse report to stderr.
  --color                    Force ANSI color in the report.
  --no-color                 Disable ANSI color in the report.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {log_env}               Log filter, e.g. usr_graph=debug.

Exit codes:
  0  Success.
  1  Parse error, I/O error, or sentence id not found.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        log_env = LOG_ENV
    )
}
