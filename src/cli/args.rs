use clap::Parser;
use std::env;

use crate::cli::command::Command;
use crate::configuration::DEFAULT_DATA_FILE;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Manage a roster of student records stored in a delimited text file",
    long_about = "Add, update, delete, search, sort and summarize student records. Every change is written back to the data file after the previous version is copied to the backup file.",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[arg(
        long,
        env = "ROSTER_DATA_FILE",
        default_value = DEFAULT_DATA_FILE,
        value_name = "PATH",
        help = "Primary data file"
    )]
    pub data_file: String,

    #[arg(
        long,
        env = "ROSTER_BACKUP_FILE",
        value_name = "PATH",
        help = "Backup file (defaults to <data-file stem>_backup next to the data file)"
    )]
    pub backup_file: Option<String>,

    #[arg(
        long = "log-file",
        env = "ROSTER_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,

    #[arg(
        long,
        global = true,
        default_value_t = false,
        help = "Print results as JSON"
    )]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    dotenvy::from_filename(&dotenv_path).ok();

    Cli::parse()
}
