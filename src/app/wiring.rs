use crate::context;
use crate::repository::StudentRepository;
use crate::storage::FileStorage;

use super::Roster;

pub fn build_storage(ctx: &context::Context) -> FileStorage {
    FileStorage::new(&ctx.config.data_file, &ctx.config.backup_file)
}

pub fn open_roster(ctx: &context::Context) -> Roster {
    let roster = StudentRepository::open(build_storage(ctx));
    let skipped = roster.skipped_lines().len();
    if skipped > 0 {
        log::warn!(
            "{} malformed line(s) in {} will be dropped on the next save",
            skipped,
            roster.storage().path().display()
        );
    }
    roster
}
