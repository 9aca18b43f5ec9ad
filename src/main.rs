use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use vanish::*;

#[derive(Parser)]
#[command(name = "vanish")]
#[command(about = "Medium-aware secure deletion of files and directories")]
#[command(version = "1.0.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Print the deletion report as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Largest overwrite chunk in MiB
    #[arg(long, global = true, default_value_t = 64, env = "VANISH_CHUNK_MIB")]
    chunk_mib: usize,

    /// Rename rounds applied to each wiped file
    #[arg(long, global = true, default_value_t = DEFAULT_FILE_ROUNDS)]
    rounds: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Securely delete a single file
    File {
        path: String,

        /// Always overwrite, regardless of the storage medium
        #[arg(long)]
        no_detect: bool,

        /// Leave a small random-length decoy instead of an empty file
        #[arg(long)]
        random_size: bool,
    },

    /// Securely delete a directory
    Dir {
        path: String,

        /// Delete everything below the directory
        #[arg(short, long)]
        recursive: bool,

        /// Always overwrite, regardless of the storage medium
        #[arg(long)]
        no_detect: bool,
    },

    /// Show how the volume holding a path is classified
    Classify { path: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let default_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = build_config(&cli)?;

    match &cli.command {
        Commands::File {
            path,
            no_detect,
            random_size,
        } => {
            let config = ShredConfig {
                randomize_final_size: *random_size,
                ..config
            };
            let mut shredder = Shredder::new(SystemClassifier, config)?;
            let started = Instant::now();
            let report = if *no_detect {
                shredder.delete_file_without_detection_at(path)
            } else {
                shredder.delete_file_at(path)
            }
            .with_context(|| format!("Failed to delete file {}", path))?;
            print_report(path, &report, started, cli.json)?;
        }
        Commands::Dir {
            path,
            recursive,
            no_detect,
        } => {
            let mut shredder = Shredder::new(SystemClassifier, config)?;
            let started = Instant::now();
            let report = if *no_detect {
                shredder.delete_directory_without_detection_at(path, *recursive)
            } else {
                shredder.delete_directory_at(path, *recursive)
            }
            .with_context(|| format!("Failed to delete directory {}", path))?;
            print_report(path, &report, started, cli.json)?;
        }
        Commands::Classify { path } => {
            classify(path, cli.json)?;
        }
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<ShredConfig> {
    if cli.chunk_mib == 0 {
        bail!("--chunk-mib must be at least 1");
    }
    let max_chunk_size = cli
        .chunk_mib
        .checked_mul(1024 * 1024)
        .context("--chunk-mib is too large")?;

    let config = ShredConfig {
        max_chunk_size,
        file_rounds: cli.rounds,
        ..Default::default()
    };
    config.validate()?;
    Ok(config)
}

fn print_report(path: &str, report: &ShredReport, started: Instant, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let elapsed = humantime::format_duration(std::time::Duration::from_millis(
        started.elapsed().as_millis() as u64,
    ));

    println!("Deleted {} in {}", path, elapsed);
    println!("  Files wiped:         {}", report.files_wiped);
    println!("  Files removed:       {}", report.files_removed);
    println!("  Links removed:       {}", report.links_removed);
    println!("  Specials removed:    {}", report.specials_removed);
    println!("  Directories removed: {}", report.directories_removed);
    println!("  Bytes overwritten:   {}", report.bytes_overwritten);
    Ok(())
}

fn classify(path: &Path, json: bool) -> Result<()> {
    let classification = SystemClassifier
        .classify(path)
        .with_context(|| format!("Failed to classify {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
    } else {
        println!("Path:       {}", path.display());
        println!("Medium:     {}", classification.medium);
        println!("Filesystem: {}", classification.filesystem);
        println!("Strategy:   {:?}", decide(classification.medium));
    }
    Ok(())
}
