use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

mod config;

use config::{Config, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "opml-roundtrip",
    about = "Decode an OPML file and print it re-encoded"
)]
struct Args {
    /// OPML file to read
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output format (overrides the config file)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Maximum outline nesting depth, 0 for unlimited (overrides the config file)
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Optional TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() {
    // Initialize tracing for debug logging; stdout carries only the document
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(format) = args.format {
        config.format = format;
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }

    let document = opml_codec::unmarshal_file_with(&args.file, &config.decode_options())
        .context("failed to unmarshal file")?;

    let output = match config.format {
        OutputFormat::Xml => opml_codec::marshal(&document),
        OutputFormat::Json => opml_codec::marshal_json_pretty(&document),
    }
    .context("failed to marshal document")?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(&output)
        .context("Failed to write to stdout")?;
    if config.format == OutputFormat::Json {
        writeln!(stdout).context("Failed to write to stdout")?;
    }
    stdout.flush().context("Failed to write to stdout")?;
    Ok(())
}
