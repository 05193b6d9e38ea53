//! chunkctl - split chapter HTML into stored chunks and rebuild it for editing

use anyhow::{Context, Result};
use chapter_chunker::{ChapterVersion, ChunkerConfig, count_words};
use clap::{Args as ClapArgs, Parser, Subcommand};
use log::{debug, info};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "chunkctl")]
#[command(about = "Split chapter HTML into stored chunks and rebuild it for editing", long_about = None)]
#[command(version)]
struct Args {
    /// Enable debug output
    #[arg(short, long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Count the words in a chapter
    Count {
        /// Chapter HTML file (stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Chunk a chapter into its first version
    Chunk {
        /// Chapter HTML file (stdin when omitted)
        file: Option<PathBuf>,

        /// Chapter identifier (default: file stem)
        #[arg(long)]
        chapter: Option<String>,

        #[command(flatten)]
        opts: ChunkOpts,
    },
    /// Chunk edited content as the next version of a stored chapter
    Rechunk {
        /// Previously written version JSON
        previous: PathBuf,

        /// Edited chapter HTML file (stdin when omitted)
        file: Option<PathBuf>,

        #[command(flatten)]
        opts: ChunkOpts,
    },
    /// Rebuild chapter HTML from a stored version
    Reassemble {
        /// Version JSON
        version: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail on missing or repeated chunk indices
        #[arg(long)]
        strict: bool,
    },
    /// Print word and chunk figures for a stored version
    Metrics {
        /// Version JSON
        version: PathBuf,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(ClapArgs, Debug)]
struct ChunkOpts {
    /// Word limit per chunk (overrides config)
    #[arg(long)]
    max_words: Option<usize>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write single-line JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Set the default word limit per chunk
    SetMaxWords {
        /// Words per chunk (must be positive)
        value: usize,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    match &args.command {
        Commands::Count { file } => {
            let html = read_content(file.as_deref())?;
            println!("{}", count_words(&html));
        }
        Commands::Chunk {
            file,
            chapter,
            opts,
        } => {
            let html = read_content(file.as_deref())?;
            let config = resolve_config(opts.max_words)?;
            let chapter_id = chapter
                .clone()
                .unwrap_or_else(|| default_chapter_id(file.as_deref()));

            let version = ChapterVersion::build(&chapter_id, &html, &config)
                .context("Failed to chunk chapter")?;
            info!(
                "Chapter {}: {} words, {} chunks",
                version.chapter_id,
                version.word_count,
                version.chunks.len()
            );
            write_version(&version, opts)?;
        }
        Commands::Rechunk {
            previous: previous_path,
            file,
            opts,
        } => {
            let previous = ChapterVersion::read_from(previous_path).with_context(|| {
                format!("Failed to read version {}", previous_path.display())
            })?;
            let html = read_content(file.as_deref())?;
            let config = resolve_config(opts.max_words)?;

            let version = rechunk_version(previous, &html, &config)?;
            write_version(&version, opts)?;
        }
        Commands::Reassemble {
            version,
            output,
            strict,
        } => {
            let stored = ChapterVersion::read_from(version)
                .with_context(|| format!("Failed to read version {}", version.display()))?;
            let html = reassembled_content(&stored, *strict)?;
            write_output(output.as_deref(), &html)?;
        }
        Commands::Metrics { version } => {
            let stored = ChapterVersion::read_from(version)
                .with_context(|| format!("Failed to read version {}", version.display()))?;
            println!("{}", metrics_json(&stored)?);
        }
        Commands::Config { action } => handle_config_command(action)?,
    }

    Ok(())
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Read chapter HTML from a file, or stdin when no file is given.
fn read_content(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => {
            debug!("Reading {}", path.display());
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => {
            debug!("Reading chapter from stdin");
            let mut html = String::new();
            io::stdin()
                .read_to_string(&mut html)
                .context("Failed to read stdin")?;
            Ok(html)
        }
    }
}

fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            debug!("Wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn write_version(version: &ChapterVersion, opts: &ChunkOpts) -> Result<()> {
    let json = version.to_json(!opts.compact)?;
    write_output(opts.output.as_deref(), &json)
}

/// Next version of a stored chapter, or the stored one itself when neither
/// the content nor the limit changed.
fn rechunk_version(
    previous: ChapterVersion,
    html: &str,
    config: &ChunkerConfig,
) -> Result<ChapterVersion> {
    match previous
        .next_if_changed(html, config)
        .context("Failed to chunk chapter")?
    {
        Some(next) => {
            info!(
                "Chapter {} v{}: {} words, {} chunks",
                next.chapter_id,
                next.version,
                next.word_count,
                next.chunks.len()
            );
            Ok(next)
        }
        None => Ok(previous),
    }
}

fn reassembled_content(stored: &ChapterVersion, strict: bool) -> Result<String> {
    if strict {
        stored
            .content_strict()
            .context("Stored chunk sequence is broken")
    } else {
        Ok(stored.content())
    }
}

fn metrics_json(stored: &ChapterVersion) -> Result<String> {
    Ok(serde_json::to_string_pretty(&stored.metrics())?)
}

/// Saved configuration with the command-line limit applied on top.
fn resolve_config(max_words: Option<usize>) -> Result<ChunkerConfig> {
    let config = ChunkerConfig::load().context("Failed to load configuration")?;
    apply_max_words(config, max_words)
}

fn apply_max_words(mut config: ChunkerConfig, max_words: Option<usize>) -> Result<ChunkerConfig> {
    if let Some(max_words) = max_words {
        config.max_chunk_words = max_words;
    }
    config.validate()?;
    Ok(config)
}

fn default_chapter_id(file: Option<&Path>) -> String {
    file.and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stdin".to_string())
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = ChunkerConfig::load()?;
            println!("Configuration file: {:?}", ChunkerConfig::config_path()?);
            println!();
            println!("max_chunk_words = {}", config.max_chunk_words);
        }
        ConfigAction::Path => {
            println!("{}", ChunkerConfig::config_path()?.display());
        }
        ConfigAction::SetMaxWords { value } => {
            let mut config = ChunkerConfig::load()?;
            config.max_chunk_words = *value;
            config.save()?;
            println!("Default max chunk words set to: {}", config.max_chunk_words);
        }
    }
    Ok(())
}
