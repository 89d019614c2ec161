use crate::app::Roster;
use crate::cli::Command;
use crate::context;

pub mod report;
pub mod student;

pub trait CommandRunner {
    fn run(&self, ctx: &context::Context, roster: &mut Roster) -> anyhow::Result<()>;
}

impl Command {
    pub fn run(&self, ctx: &context::Context, roster: &mut Roster) -> anyhow::Result<()> {
        match self {
            Command::Add(fields) => fields.run(ctx, roster),
            Command::Update(changes) => changes.run(ctx, roster),
            Command::Delete { id } => student::delete(ctx, roster, id),
            Command::Find { id } => student::find(ctx, roster, id),
            Command::Search { name } => student::search(ctx, roster, name),
            Command::List { sort } => report::list(ctx, roster, *sort),
            Command::Stats => report::stats(ctx, roster),
        }
    }
}

/// Prints `value` as JSON when requested, otherwise the human rendering.
pub(crate) fn emit<T, F>(ctx: &context::Context, value: &T, human: F) -> anyhow::Result<()>
where
    T: serde::Serialize + ?Sized,
    F: FnOnce() -> String,
{
    if ctx.config.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", human());
    }
    Ok(())
}
