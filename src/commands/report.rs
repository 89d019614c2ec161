use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;

use super::{emit, student::views};
use crate::app::Roster;
use crate::cli::SortOrder;
use crate::context::Context;
use crate::types::Student;

const EMPTY_ROSTER: &str = "No students in the database.";

#[derive(Serialize)]
struct StatsView<'a> {
    count: usize,
    average_grade: f64,
    data_file: &'a str,
    backup_file: &'a str,
}

/// `header`, a blank line, then `1. <student>` per entry.
pub(crate) fn numbered(header: &str, students: &[Student]) -> String {
    let mut out = format!("{}\n", header);
    for (i, student) in students.iter().enumerate() {
        let _ = write!(out, "\n{}. {}", i + 1, student);
    }
    out
}

pub fn list(ctx: &Context, roster: &Roster, sort: SortOrder) -> Result<()> {
    let (header, students) = match sort {
        SortOrder::Insertion => (
            format!("Total Students: {}", roster.count()),
            roster.all(),
        ),
        SortOrder::Name => (
            "Students Sorted by Name (A-Z):".to_string(),
            roster.sorted_by_name(),
        ),
        SortOrder::Grade => (
            "Students Sorted by Average Grade (Highest First):".to_string(),
            roster.sorted_by_grade(),
        ),
    };

    emit(ctx, &views(&students), || {
        if students.is_empty() {
            EMPTY_ROSTER.to_string()
        } else {
            numbered(&header, &students)
        }
    })
}

pub fn stats(ctx: &Context, roster: &Roster) -> Result<()> {
    let stats = roster.stats();
    let data_file = ctx.config.data_file.to_string_lossy();
    let backup_file = ctx.config.backup_file.to_string_lossy();

    let view = StatsView {
        count: stats.count,
        average_grade: stats.average_grade,
        data_file: &data_file,
        backup_file: &backup_file,
    };
    emit(ctx, &view, || {
        format!(
            "Total Students: {}\nAverage Grade (All Students): {:.2}\nData File: {}\nBackup File: {}",
            stats.count, stats.average_grade, data_file, backup_file
        )
    })
}
