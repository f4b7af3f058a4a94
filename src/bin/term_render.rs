//! term-render
//!
//! Reads captured terminal output from a file or stdin and writes the
//! reconstructed screen as HTML (default) or plain text.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use term_render::app::{Config, ConfigError};
use term_render::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Size of each read from the input
const CHUNK_SIZE: usize = 64 * 1024;

/// CLI arguments for term-render
#[derive(Parser, Debug, Clone)]
#[command(name = "term-render")]
#[command(version)]
#[command(about = "Render terminal output as HTML or plain text", long_about = None)]
struct CliArgs {
    /// Input file (reads stdin if absent)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output plain text instead of HTML
    #[arg(short, long)]
    text: bool,

    /// Path to a JSON config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Wrap HTML output in a <pre> container
    #[arg(long)]
    wrap_pre: bool,

    /// Prefix for CSS class names
    #[arg(long, value_name = "PREFIX")]
    class_prefix: Option<String>,
}

/// Errors that end the program
#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
    #[error("reading {name}: {source}")]
    Input {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("writing output: {0}")]
    Output(#[source] io::Error),
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = CliArgs::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("term-render: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), AppError> {
    let config = resolve_config(args)?;
    tracing::debug!("using config {:?}", config);

    let term = match &args.input {
        Some(path) => {
            let name = path.display().to_string();
            let file = File::open(path).map_err(|source| AppError::Input {
                name: name.clone(),
                source,
            })?;
            process_input(file, &name, config.max_input_bytes)?
        }
        None => process_input(io::stdin().lock(), "stdin", config.max_input_bytes)?,
    };

    let mut rendered = if args.text {
        term.render_text()
    } else {
        config.wrap(term.render_with(&config.renderer()))
    };
    rendered.push('\n');

    write_output(args.output.as_deref(), rendered.as_bytes()).map_err(AppError::Output)
}

/// Config precedence: CLI > config file > defaults
fn resolve_config(args: &CliArgs) -> Result<Config, AppError> {
    let mut config = match &args.config {
        Some(path) => Config::load(path).map_err(|source| AppError::Config {
            path: path.clone(),
            source,
        })?,
        None => Config::load_or_default(),
    };

    if args.wrap_pre {
        config.wrap_pre = true;
    }
    if let Some(prefix) = &args.class_prefix {
        config.class_prefix = prefix.clone();
    }

    Ok(config)
}

/// Feed the input to a terminal in chunks, stopping at `limit` bytes if set
fn process_input<R: Read>(reader: R, name: &str, limit: u64) -> Result<Terminal, AppError> {
    let mut term = Terminal::new();
    let limit = if limit > 0 { limit } else { u64::MAX };

    let (total, truncated) = feed(reader, &mut term, limit).map_err(|source| AppError::Input {
        name: name.to_string(),
        source,
    })?;

    if truncated {
        tracing::warn!("input truncated to {} bytes", limit);
    }
    tracing::debug!("processed {} bytes from {}", total, name);

    term.finish();
    Ok(term)
}

/// Process at most `limit` bytes. Returns the bytes processed and whether
/// more input followed them.
fn feed<R: Read>(reader: R, term: &mut Terminal, limit: u64) -> io::Result<(u64, bool)> {
    // One byte past the limit separates a longer input from an exact fit
    let mut reader = reader.take(limit.saturating_add(1));
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok((total, false)),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        let keep = usize::try_from(limit - total).map_or(n, |left| n.min(left));
        term.process(&buf[..keep]);
        total += keep as u64;

        if keep < n {
            return Ok((total, true));
        }
    }
}

fn write_output(path: Option<&Path>, data: &[u8]) -> io::Result<()> {
    match path {
        Some(path) => std::fs::write(path, data),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()
        }
    }
}
