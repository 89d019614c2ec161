use std::path::PathBuf;

use crate::configuration::{default_backup_path, Configuration};

pub struct Context {
    pub config: Configuration,
}

impl Context {
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        let data_file = PathBuf::from(&cli.data_file);
        let backup_file = match &cli.backup_file {
            Some(path) => PathBuf::from(path),
            None => default_backup_path(&data_file),
        };
        let cfg = Configuration {
            data_file,
            backup_file,
            log_file: cli.log_file.as_ref().map(PathBuf::from),
            json: cli.json,
        };
        Self { config: cfg }
    }
}
