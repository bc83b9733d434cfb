//! `jsser` CLI — tokenize, check and reformat JSON from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Print one token per line (stdin → stdout)
//! echo '{"name":"Alice","tags":[1,2,]}' | jsser tokens
//!
//! # Re-emit a document compactly, from file to file
//! jsser format -i data.json -o data.min.json
//!
//! # Pretty-print with two-space indentation
//! jsser format --pretty -i data.json
//!
//! # Parse only; exit code 1 on malformed input
//! jsser check -i data.json
//! ```
//!
//! Set `RUST_LOG=debug` (or `trace`) to see what the parser does.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jsser", version, about = "Tokenize, check and reformat JSON")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream, one token per line
    Tokens {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Parse and re-emit the document
    Format {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Indent with two spaces instead of emitting compact text
        #[arg(long)]
        pretty: bool,
    },
    /// Parse only and report whether the document is well formed
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Tokens { input } => {
            let text = read_input(input.as_deref())?;
            let tokens = jsser_core::tokenize(&text).context("Failed to tokenize input")?;
            let mut listing = String::new();
            for token in &tokens {
                listing.push_str(&token.to_string());
                listing.push('\n');
            }
            write_output(None, &listing)?;
        }
        Commands::Format {
            input,
            output,
            pretty,
        } => {
            let text = read_input(input.as_deref())?;
            let value = jsser_core::parse(&text).context("Failed to parse JSON")?;
            let rendered = if pretty {
                format!("{value:#}\n")
            } else {
                format!("{value}\n")
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Check { input } => {
            let text = read_input(input.as_deref())?;
            let value = jsser_core::parse(&text).context("Invalid JSON")?;
            tracing::debug!(root = value.kind(), "document is well formed");
            println!("ok");
        }
    }

    Ok(())
}

/// Log to stderr, `warn` unless `RUST_LOG` says otherwise.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
