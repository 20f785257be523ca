//! errlist CLI
//!
//! Decodes error chains from JSON arrays and renders them.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use errlist::{ErrorNode, TreeRenderer};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "errlist")]
#[command(about = "errlist - Render chained errors as trees or JSON")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a chain
    Render {
        /// JSON array file ("-" for stdin)
        #[arg(default_value = "-")]
        input: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Tree)]
        format: Format,

        /// Render config file (default: user config dir)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Check whether a chain contains a message
    Has {
        /// JSON array file ("-" for stdin)
        #[arg(default_value = "-")]
        input: String,

        /// Message to look for
        #[arg(short, long)]
        message: String,
    },

    /// Pop the innermost node off a chain
    Pop {
        /// JSON array file ("-" for stdin)
        #[arg(default_value = "-")]
        input: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Indented tree, one node per line
    Tree,
    /// Compact JSON array
    Array,
    /// One compact node per line
    Pretty,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            format,
            config,
        } => cmd_render(&input, format, config),
        Commands::Has { input, message } => cmd_has(&input, &message),
        Commands::Pop { input } => cmd_pop(&input),
    }
}

fn cmd_render(input: &str, format: Format, config_path: Option<PathBuf>) -> Result<()> {
    let chain = read_chain(input)?;

    match format {
        Format::Tree => {
            let config = match config_path {
                Some(path) => config::load_from(&path)?,
                None => config::load_default(),
            };
            print!("{}", TreeRenderer::with_config(config).render(&chain));
        }
        Format::Array => {
            let bytes = chain.to_json_array().context("Failed to encode chain")?;
            println!("{}", String::from_utf8_lossy(&bytes));
        }
        Format::Pretty => println!("{}", chain.to_pretty_array()),
    }

    Ok(())
}

fn cmd_has(input: &str, message: &str) -> Result<()> {
    let chain = read_chain(input)?;
    let found = chain.has_message(message);
    println!("{}", found);

    if !found {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_pop(input: &str) -> Result<()> {
    let mut chain = read_chain(input)?;

    let popped = chain.pop_tail().into_owned();
    println!("{}", popped.to_json());
    println!("{}", chain.to_pretty_array());

    Ok(())
}

fn read_chain(input: &str) -> Result<ErrorNode> {
    let bytes = if input == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read(input).with_context(|| format!("Failed to read {}", input))?
    };

    let chain = ErrorNode::from_json_array(&bytes).context("Failed to decode chain")?;
    tracing::debug!("Loaded chain of {} nodes", chain.len());
    Ok(chain)
}
