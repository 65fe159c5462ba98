//! Command-line interface for yapl
//!
//! Usage:
//!   yapl parse `<path>` [--config `<file>`] [--format json|yaml|debug] [--no-locations]
//!   yapl tokens `<path>` [--config `<file>`] [--format json|yaml|debug]
//!
//! The file is read, normalized and terminated with the end-of-input marker before it
//! reaches the lexer. Failures print `error: <message>` to stderr and exit with status 1.
//! Set RUST_LOG (e.g. `RUST_LOG=yapl=trace`) to log the lexer and the parser to stderr.

use clap::{Arg, ArgAction, ArgMatches, Command};
use config::ConfigError;
use serde::Serialize;
use thiserror::Error;

use yapl::yapl::config::{Loader, OutputConfig, OutputFormat, YaplConfig};
use yapl::yapl::grammar::{Grammar, DEFAULT_EOF_MARKER};
use yapl::yapl::source::prepare_source;
use yapl::yapl::token::{Span, Token};
use yapl::yapl::{GrammarError, ParseError, ParseOptions};

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("{0}")]
    Grammar(#[from] GrammarError),
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("cannot render output: {0}")]
    Render(String),
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Only initialize if RUST_LOG is set
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn cli() -> Command {
    let path = Arg::new("path")
        .help("Path to the yapl file")
        .required(true)
        .index(1);
    let config = Arg::new("config")
        .long("config")
        .short('c')
        .help("Configuration file layered over the built-in defaults");
    let format = Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format")
        .value_parser(["json", "yaml", "debug"]);

    Command::new("yapl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse yapl files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("parse")
                .about("Parse a file and print its syntax tree")
                .arg(path.clone())
                .arg(config.clone())
                .arg(format.clone())
                .arg(
                    Arg::new("no-locations")
                        .long("no-locations")
                        .help("Leave source locations out of the tree")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the token stream of a file")
                .arg(path)
                .arg(config)
                .arg(format),
        )
}

fn main() {
    init_tracing();
    let matches = cli().get_matches();

    let result = match matches.subcommand() {
        Some(("parse", sub)) => handle_parse_command(sub),
        Some(("tokens", sub)) => handle_tokens_command(sub),
        _ => unreachable!("clap requires a subcommand"),
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    }
}

fn load_config(matches: &ArgMatches) -> Result<YaplConfig, CliError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader.set_override("output.format", format.as_str())?;
    }
    if matches.try_get_one::<bool>("no-locations").ok().flatten() == Some(&true) {
        loader = loader.set_override("parser.capture_locations", false)?;
    }
    Ok(loader.build()?)
}

fn read_source(matches: &ArgMatches, config: &YaplConfig) -> Result<String, CliError> {
    let path = matches
        .get_one::<String>("path")
        .expect("path is a required argument");
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.clone(),
        source,
    })?;
    Ok(prepare_source(&text, &config.input))
}

/// Run `f` with the grammar matching the configured end-of-input marker.
fn with_grammar<T>(
    config: &YaplConfig,
    f: impl FnOnce(&Grammar) -> Result<T, CliError>,
) -> Result<T, CliError> {
    if config.input.eof_marker == DEFAULT_EOF_MARKER {
        f(Grammar::yapl())
    } else {
        f(&Grammar::with_eof_marker(&config.input.eof_marker)?)
    }
}

fn render<T: Serialize + std::fmt::Debug>(value: &T, output: &OutputConfig) -> Result<String, CliError> {
    let rendered = match output.format {
        OutputFormat::Json if output.pretty => serde_json::to_string_pretty(value),
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::Yaml => {
            return serde_yaml::to_string(value).map_err(|err| CliError::Render(err.to_string()))
        }
        OutputFormat::Debug => return Ok(format!("{:#?}", value)),
    };
    rendered.map_err(|err| CliError::Render(err.to_string()))
}

fn handle_parse_command(matches: &ArgMatches) -> Result<String, CliError> {
    let config = load_config(matches)?;
    let source = read_source(matches, &config)?;
    let options = ParseOptions::from(&config.parser);
    let program = with_grammar(&config, |grammar| Ok(grammar.parse(&source, options)?))?;
    render(&program, &config.output)
}

/// A token as printed by `yapl tokens`, with its kind resolved to a name.
#[derive(Debug, Serialize)]
struct TokenView<'a> {
    kind: &'a str,
    text: &'a str,
    span: Span,
}

fn handle_tokens_command(matches: &ArgMatches) -> Result<String, CliError> {
    let config = load_config(matches)?;
    let source = read_source(matches, &config)?;
    with_grammar(&config, |grammar| {
        let tokens: Vec<Token> = grammar.tokenize(&source)?;
        let views: Vec<TokenView> = tokens
            .iter()
            .map(|token| TokenView {
                kind: grammar.tables().symbol_name(token.kind).unwrap_or("?"),
                text: &token.text,
                span: token.span,
            })
            .collect();
        render(&views, &config.output)
    })
}
