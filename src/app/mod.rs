mod wiring;

use crate::{cli, context, repository, storage, tracing};
use anyhow::Result;

pub type Roster = repository::StudentRepository<storage::FileStorage>;

pub struct App {
    pub ctx: context::Context,
    pub roster: Roster,
}

impl App {
    pub fn from_cli(cli: &cli::Cli) -> Self {
        let ctx = context::Context::from_cli(cli);

        tracing::init(ctx.config.log_file.as_deref());
        let roster = wiring::open_roster(&ctx);
        log::debug!("📂 Data file: {}", roster.storage().path().display());
        log::debug!("🗄️ Backup file: {}", roster.storage().backup_path().display());
        if let Some(path) = ctx.config.log_file.as_deref() {
            log::debug!("📝 Log file: {}", path.display());
        }
        Self { ctx, roster }
    }
}

pub fn run() -> Result<()> {
    let cli = cli::parse();
    let mut app = App::from_cli(&cli);
    cli.cmd.run(&app.ctx, &mut app.roster)
}
