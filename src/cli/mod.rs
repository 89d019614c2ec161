mod args;
mod command;

pub use args::Cli;
pub use command::{Command, SortOrder, StudentChanges, StudentFields};

pub use args::parse;
