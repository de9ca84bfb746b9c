use std::env;
use std::ffi::OsString;
use std::io::{self, IsTerminal};

use clap::Parser;
use colored::Colorize;
use hbnb_store::{FileStorage, StorageConfig};
use tracing::Level;

mod cli;
mod commands;
mod editor;

use cli::Cli;
use commands::Console;
use editor::{PipedInput, RustylineEditor};

const PROMPT: &str = "(hbnb) ";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

/// Defaults, then the TOML file, then `env_file_path` (`HBNB_FILE_PATH`),
/// then `--file`.
fn storage_config(cli: &Cli, env_file_path: Option<OsString>) -> anyhow::Result<StorageConfig> {
    let mut config = match &cli.config {
        Some(path) => StorageConfig::load(path)?,
        None => StorageConfig::default(),
    }
    .with_file_path_override(env_file_path);
    if let Some(path) = &cli.file {
        config.file_path = path.clone();
    }
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = storage_config(&cli, env::var_os(StorageConfig::ENV_FILE_PATH))?;
    let store = FileStorage::open(config)?;
    tracing::debug!(?store, "storage ready");

    let stdout = io::stdout();
    let mut console = Console::new(&store, stdout.lock());

    if let Some(line) = cli.one_shot() {
        console.execute(&line)?;
        return Ok(());
    }

    if io::stdin().is_terminal() {
        let mut editor = RustylineEditor::new()?;
        console.run(&mut editor, PROMPT)
    } else {
        let mut input = PipedInput::new(io::stdin().lock());
        console.run(&mut input, "")
    }
}
