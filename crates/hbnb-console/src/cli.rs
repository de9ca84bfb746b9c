use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "hbnb",
    about = "HBnB console for the JSON object store",
    version
)]
pub struct Cli {
    /// JSON file holding every object (overrides config and HBNB_FILE_PATH)
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// TOML file with storage settings
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log storage activity to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Run a single console command and exit, e.g. `hbnb all User`
    #[arg(trailing_var_arg = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl Cli {
    /// The one-shot command line, if any words were given.
    pub fn one_shot(&self) -> Option<String> {
        if self.command.is_empty() {
            None
        } else {
            Some(self.command.join(" "))
        }
    }
}
