use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use runlog::{Config, RunningLog};

#[derive(Parser)]
#[command(name = "runlog", about = "runlog: running records, normalised and backed up")]
struct Cli {
    /// Write debug logs to $TMPDIR/runlog-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    debug: bool,

    /// Config file to use instead of ~/.config/runlog/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding running-data.json and its backups.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the stored records, seeding them on first use.
    Show,
    /// Save a JSON array of records read from FILE (or stdin).
    Save { file: Option<PathBuf> },
    /// Extract records from an AI reply read from FILE (or stdin).
    Extract {
        file: Option<PathBuf>,
        /// Also save the extracted records.
        #[arg(long)]
        save: bool,
    },
    /// List backup files, oldest first.
    Backups,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let path = std::env::temp_dir().join("runlog-debug.log");
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("runlog debug log started: tail -f {}", path.display());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }
    let log = RunningLog::from_config(&config);

    match cli.command {
        Command::Show => print_json(&log.get_records()?)?,
        Command::Save { file } => {
            let input = read_input(file.as_deref())?;
            let candidates: serde_json::Value =
                serde_json::from_str(&input).context("input is not valid JSON")?;
            print_json(&log.save_records(&candidates)?)?;
        }
        Command::Extract { file, save } => {
            let text = read_input(file.as_deref())?;
            let extraction = log.extract_records_from_text(&text)?;
            if save {
                let receipt = log.save_records(&serde_json::to_value(&extraction.records)?)?;
                eprintln!(
                    "saved {} records; backup at {}",
                    extraction.records.len(),
                    receipt.backup_path.display()
                );
            }
            print_json(&extraction)?;
        }
        Command::Backups => {
            for path in log.backups()? {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
