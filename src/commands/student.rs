use anyhow::Result;
use serde::Serialize;

use super::{emit, report, CommandRunner};
use crate::app::Roster;
use crate::cli;
use crate::context::Context;
use crate::repository::Deletion;
use crate::types::{Student, ValidationError};

/// JSON shape of a student: stored fields plus the computed average.
#[derive(Serialize)]
pub(crate) struct StudentView<'a> {
    #[serde(flatten)]
    student: &'a Student,
    average_grade: f64,
}

impl<'a> From<&'a Student> for StudentView<'a> {
    fn from(student: &'a Student) -> Self {
        Self {
            student,
            average_grade: student.average_grade(),
        }
    }
}

pub(crate) fn views(students: &[Student]) -> Vec<StudentView<'_>> {
    students.iter().map(StudentView::from).collect()
}

fn validated(result: Result<Student, ValidationError>) -> Result<Student> {
    result.map_err(|err| {
        log::debug!("rejected {:?} field: {}", err.field(), err);
        err.into()
    })
}

fn not_found(id: &str) -> anyhow::Error {
    anyhow::anyhow!("Student with ID '{}' not found.", id)
}

fn not_saved(ctx: &Context) -> anyhow::Error {
    anyhow::anyhow!(
        "the change could not be saved to {}",
        ctx.config.data_file.display()
    )
}

impl CommandRunner for cli::StudentFields {
    fn run(&self, ctx: &Context, roster: &mut Roster) -> Result<()> {
        let student = validated(Student::new(
            &self.id,
            &self.name,
            &self.email,
            self.prelim,
            self.midterm,
            self.final_grade,
        ))?;

        if !roster.add(student.clone())? {
            return Err(not_saved(ctx));
        }
        log::info!("added student {}", student.id());

        emit(ctx, &StudentView::from(&student), || {
            format!("Student added successfully!\n\n{}", student)
        })
    }
}

impl CommandRunner for cli::StudentChanges {
    fn run(&self, ctx: &Context, roster: &mut Roster) -> Result<()> {
        let Some(current) = roster.find_by_id(&self.id).cloned() else {
            return Err(not_found(&self.id));
        };

        let updated = validated(Student::new(
            current.id(),
            self.name.as_deref().unwrap_or(current.name()),
            self.email.as_deref().unwrap_or(current.email()),
            self.prelim.unwrap_or(current.prelim_grade()),
            self.midterm.unwrap_or(current.midterm_grade()),
            self.final_grade.unwrap_or(current.final_grade()),
        ))?;

        if !roster.update(&self.id, updated.clone())? {
            return Err(not_saved(ctx));
        }
        log::info!("updated student {}", updated.id());

        emit(ctx, &StudentView::from(&updated), || {
            format!("Student updated successfully!\n\n{}", updated)
        })
    }
}

pub fn delete(ctx: &Context, roster: &mut Roster, id: &str) -> Result<()> {
    let Some(existing) = roster.find_by_id(id).cloned() else {
        return Err(not_found(id));
    };
    match roster.delete(id)? {
        Deletion::NotFound => return Err(not_found(id)),
        Deletion::Removed { saved: false } => return Err(not_saved(ctx)),
        Deletion::Removed { saved: true } => {}
    }
    log::info!("deleted student {}", existing.id());

    emit(ctx, &StudentView::from(&existing), || {
        format!("Student deleted successfully!\n\n{}", existing)
    })
}

pub fn find(ctx: &Context, roster: &Roster, id: &str) -> Result<()> {
    match roster.find_by_id(id) {
        Some(student) => emit(ctx, &StudentView::from(student), || {
            format!("Student Found:\n\n{}", student)
        }),
        None => Err(not_found(id)),
    }
}

pub fn search(ctx: &Context, roster: &Roster, name: &str) -> Result<()> {
    let matches = roster.search_by_name(name);
    emit(ctx, &views(&matches), || {
        if matches.is_empty() {
            format!("No students match '{}'.", name.trim())
        } else {
            report::numbered(
                &format!("Students matching '{}': {}", name.trim(), matches.len()),
                &matches,
            )
        }
    })
}
