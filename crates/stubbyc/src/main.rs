//! The stubby command line.
//!
//! - `stubbyc expand <file>` - Expand every `@Mock` type and print the result
//!   (or write it with `-o`)
//! - `stubbyc check <file>` - Report diagnostics without writing anything
//!
//! Options:
//! - `--config` - Settings file (default: nearest `stubby.toml`)
//! - `--json` - Output diagnostics as JSON (one object per line)
//! - `--no-color` - Disable colorized output
//! - `-v` / `-vv` - More logging on stderr (`RUST_LOG` takes precedence)

mod config;

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};
use stubby_fmt::{expand_to_string, Expanded};
use stubby_gen::{render_diagnostic, DiagnosticOptions};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, StubbyConfig};

#[derive(Parser)]
#[command(name = "stubbyc", version, about = "Mock companion generator")]
struct Cli {
    /// Increase logging verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand every @Mock type in a file
    Expand {
        /// Declaration source to expand
        input: PathBuf,

        /// Write the expanded source here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Spaces per indentation level in generated code
        #[arg(long)]
        indent: Option<usize>,

        /// Suffix for companion type names
        #[arg(long)]
        suffix: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },
    /// Report diagnostics without producing output
    Check {
        /// Declaration source to check
        input: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Settings file (default: the nearest stubby.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output diagnostics as JSON (one object per line) instead of human-readable format
    #[arg(long)]
    json: bool,

    /// Disable colorized output
    #[arg(long = "no-color")]
    no_color: bool,
}

impl CommonArgs {
    fn diagnostic_options(&self) -> DiagnosticOptions {
        DiagnosticOptions {
            color: !self.no_color && !self.json,
            json: self.json,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("expansion failed with {count} error(s)")]
    Failed { count: usize },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (result, json) = match cli.command {
        Commands::Expand {
            input,
            output,
            indent,
            suffix,
            common,
        } => (
            expand(&input, output.as_deref(), indent, suffix, &common),
            common.json,
        ),
        Commands::Check { input, common } => (check(&input, &common), common.json),
    };

    if let Err(e) = result {
        if json {
            // Failed expansions already reported each diagnostic as JSON.
            if !matches!(e, CliError::Failed { .. }) {
                let msg = serde_json::json!({
                    "code": "C0001",
                    "severity": "error",
                    "message": e.to_string(),
                    "file": "",
                    "spans": [],
                    "fix": null
                });
                eprintln!("{}", msg);
            }
        } else {
            eprintln!("error: {}", e);
        }
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(verbose))),
        )
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "warn",
        1 => "stubbyc=debug,stubby_gen=debug,stubby_fmt=debug",
        _ => "stubbyc=trace,stubby_gen=trace,stubby_fmt=trace",
    }
}

/// Settings from `--config`, else the nearest `stubby.toml`, else defaults.
fn load_config(input: &Path, explicit: Option<&Path>) -> Result<StubbyConfig, CliError> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => StubbyConfig::discover(input),
    };
    match path {
        Some(path) => {
            debug!(config = %path.display(), "loading settings");
            Ok(StubbyConfig::from_file(&path)?)
        }
        None => Ok(StubbyConfig::default()),
    }
}

fn read_source(input: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(input).map_err(|source| CliError::Read {
        path: input.to_path_buf(),
        source,
    })
}

fn run_expansion(
    input: &Path,
    config: &StubbyConfig,
    common: &CommonArgs,
) -> Result<Expanded, CliError> {
    let source = read_source(input)?;
    let expanded = expand_to_string(&source, &config.mock, &config.format);
    report_diagnostics(&source, input, &expanded, &common.diagnostic_options());
    let count = expanded.diagnostics.iter().filter(|d| d.is_error()).count();
    if count > 0 {
        return Err(CliError::Failed { count });
    }
    Ok(expanded)
}

fn expand(
    input: &Path,
    output: Option<&Path>,
    indent: Option<usize>,
    suffix: Option<String>,
    common: &CommonArgs,
) -> Result<(), CliError> {
    let mut config = load_config(input, common.config.as_deref())?;
    if let Some(indent) = indent {
        config.format.indent_size = indent;
    }
    if let Some(suffix) = suffix {
        config.mock.companion_suffix = suffix;
    }

    let expanded = run_expansion(input, &config, common)?;
    match output {
        Some(path) => {
            std::fs::write(path, &expanded.text).map_err(|source| CliError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            eprintln!(
                "  Expanded: {} ({} type{})",
                path.display(),
                expanded.types.len(),
                if expanded.types.len() == 1 { "" } else { "s" }
            );
        }
        None => print!("{}", expanded.text),
    }
    info!(types = ?expanded.types, "done");
    Ok(())
}

fn check(input: &Path, common: &CommonArgs) -> Result<(), CliError> {
    let config = load_config(input, common.config.as_deref())?;
    let expanded = run_expansion(input, &config, common)?;
    if !common.json {
        eprintln!("  Checked: {} ({} mockable)", input.display(), expanded.types.len());
    }
    Ok(())
}

/// Print every diagnostic to stderr.
fn report_diagnostics(
    source: &str,
    path: &Path,
    expanded: &Expanded,
    options: &DiagnosticOptions,
) {
    let file_name = path.display().to_string();
    for diagnostic in &expanded.diagnostics {
        let rendered = render_diagnostic(diagnostic, source, &file_name, options);
        if options.json {
            eprintln!("{}", rendered);
        } else {
            eprint!("{}", rendered);
        }
    }
}
