use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{LoadReport, SkippedLine, Storage};
use crate::types::{FormatError, Student};

const TITLE_HEADER: &str = "# Student Management System Data File";
const FORMAT_HEADER: &str = "# Format: ID|Name|Email|PrelimGrade|MidtermGrade|FinalGrade";
const COMMENT_PREFIX: char = '#';

/// Line-oriented `|`-delimited data file with a single-generation backup.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
    backup_path: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>, B: AsRef<Path>>(path: P, backup_path: B) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            backup_path: backup_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    fn backup(&self) -> io::Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        ensure_parent_dir(&self.backup_path)?;
        fs::copy(&self.path, &self.backup_path)?;
        Ok(())
    }

    fn write_snapshot(&self, students: &[Student]) -> io::Result<()> {
        ensure_parent_dir(&self.path)?;
        let mut writer = BufWriter::new(File::create(&self.path)?);

        writeln!(writer, "{TITLE_HEADER}")?;
        writeln!(writer, "{FORMAT_HEADER}")?;
        writeln!(
            writer,
            "# Last updated: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S %:z")
        )?;
        for student in students {
            writeln!(writer, "{}", student.to_line())?;
        }

        writer.flush()?;
        writer.get_ref().sync_all()
    }
}

fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}

/// Parses file contents, skipping blank and comment lines and collecting malformed ones.
///
/// Lines are decoded one at a time so a line that is not UTF-8 only loses itself.
fn parse_contents(contents: &[u8]) -> LoadReport {
    let mut report = LoadReport::default();

    for (idx, raw) in contents.split(|b| *b == b'\n').enumerate() {
        let line_number = idx + 1;
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line.trim(),
            Err(_) => {
                report.skipped.push(SkippedLine {
                    line_number,
                    reason: FormatError::InvalidUtf8.into(),
                });
                continue;
            }
        };
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            continue;
        }

        match Student::from_line(line) {
            Ok(student) => report.students.push(student),
            Err(reason) => report.skipped.push(SkippedLine {
                line_number,
                reason,
            }),
        }
    }

    report
}

impl Storage for FileStorage {
    fn load(&self) -> anyhow::Result<LoadReport> {
        match fs::read(&self.path) {
            Ok(contents) => Ok(parse_contents(&contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!(
                    "no data file at {}, starting with an empty roster",
                    self.path.display()
                );
                Ok(LoadReport::default())
            }
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path.display())),
        }
    }

    fn save(&self, students: &[Student]) -> anyhow::Result<()> {
        self.backup().with_context(|| {
            format!(
                "backing up {} to {}",
                self.path.display(),
                self.backup_path.display()
            )
        })?;
        self.write_snapshot(students)
            .with_context(|| format!("writing {}", self.path.display()))
    }
}
