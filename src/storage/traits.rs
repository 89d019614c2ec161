use crate::types::{RecordError, Student};

/// A data line that could not be turned into a student during load.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedLine {
    /// 1-based position in the file.
    pub line_number: usize,
    pub reason: RecordError,
}

#[derive(Clone, Debug, Default)]
pub struct LoadReport {
    pub students: Vec<Student>,
    pub skipped: Vec<SkippedLine>,
}

pub trait Storage {
    /// Reads every record. A missing backing store yields an empty report, not an error.
    fn load(&self) -> anyhow::Result<LoadReport>;
    /// Replaces the persisted snapshot with `students`, in order.
    fn save(&self, students: &[Student]) -> anyhow::Result<()>;
}
