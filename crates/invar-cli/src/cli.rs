//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "invar",
    version,
    about = "Turn a tabular dataset into Daikon declarations and traces",
    long_about = "Turn a tabular dataset into Daikon declarations and traces.\n\n\
                  Every column becomes a program point variable and every row a\n\
                  trace record. Numeric columns also gain descriptive statistics\n\
                  as constants, so Daikon can relate values to their distribution."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags and RUST_LOG).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Append logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate .decls and .dtrace files for a CSV/TSV dataset.
    Trace(TraceArgs),

    /// List the standard matchers and expanders.
    Tags,
}

#[derive(Parser)]
pub struct TraceArgs {
    /// Dataset to trace (.csv, .tsv or .txt with a header row).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Program point name (default: the input file stem).
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Declarations output path (default: <INPUT dir>/<NAME>.decls).
    #[arg(long = "out-decls", value_name = "PATH")]
    pub out_decls: Option<PathBuf>,

    /// Trace output path (default: <INPUT dir>/<NAME>.dtrace).
    #[arg(long = "out-dtrace", value_name = "PATH")]
    pub out_dtrace: Option<PathBuf>,

    /// Field delimiter: a single ASCII character or "tab".
    #[arg(long = "delimiter", value_name = "CHAR", value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Rows scanned to infer column types (0 scans the whole file).
    #[arg(long = "infer-schema-length", value_name = "ROWS")]
    pub infer_schema_length: Option<usize>,

    /// Skip the expand phase; only observed columns are emitted.
    #[arg(long = "no-expand")]
    pub no_expand: bool,

    /// Comparability mode. With "implicit" every column gets its own group,
    /// shared by the variables derived from it.
    #[arg(long = "comparability", value_enum, default_value = "none")]
    pub comparability: ComparabilityArg,

    /// Run Daikon on the generated files.
    #[arg(long = "run-daikon")]
    pub run_daikon: bool,

    /// Path to daikon.jar (default: $DAIKON_JAR, then $DAIKONDIR/daikon.jar).
    #[arg(long = "daikon-jar", value_name = "PATH")]
    pub daikon_jar: Option<PathBuf>,

    /// Java executable used to run Daikon.
    #[arg(long = "java", value_name = "PATH", default_value = "java")]
    pub java: PathBuf,

    /// Print the run summary as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ComparabilityArg {
    None,
    Implicit,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match value.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(format!(
                "expected a single ASCII character or \"tab\", got {value:?}"
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn delimiter_parsing() {
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter("\\t"), Ok(b'\t'));
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn trace_defaults() {
        let cli = Cli::try_parse_from(["invar", "trace", "data.csv"]).unwrap();
        let Command::Trace(args) = cli.command else {
            panic!("expected trace command");
        };
        assert_eq!(args.input, PathBuf::from("data.csv"));
        assert!(!args.no_expand);
        assert!(!args.run_daikon);
        assert!(matches!(args.comparability, ComparabilityArg::None));
        assert_eq!(args.java, PathBuf::from("java"));
    }

    #[test]
    fn trace_options() {
        let cli = Cli::try_parse_from([
            "invar",
            "--log-level",
            "debug",
            "trace",
            "data.txt",
            "--name",
            "orders",
            "--delimiter",
            "|",
            "--comparability",
            "implicit",
            "--no-expand",
            "--json",
        ])
        .unwrap();
        assert!(matches!(cli.log_level, Some(LogLevelArg::Debug)));
        let Command::Trace(args) = cli.command else {
            panic!("expected trace command");
        };
        assert_eq!(args.name.as_deref(), Some("orders"));
        assert_eq!(args.delimiter, Some(b'|'));
        assert!(matches!(args.comparability, ComparabilityArg::Implicit));
        assert!(args.no_expand);
        assert!(args.json);
    }
}
