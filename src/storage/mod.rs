mod file;
pub mod traits;

pub use file::FileStorage;
pub use traits::{LoadReport, SkippedLine, Storage};
