use std::fmt;

use thiserror::Error;

/// The three graded components of a student record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradeComponent {
    Prelim,
    Midterm,
    Final,
}

impl fmt::Display for GradeComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GradeComponent::Prelim => "Prelim",
            GradeComponent::Midterm => "Midterm",
            GradeComponent::Final => "Final",
        };
        f.write_str(s)
    }
}

/// Field a validation rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudentField {
    Id,
    Name,
    Email,
    Grade(GradeComponent),
}

/// A field of a student record failed its constraint.
///
/// The messages are shown to the operator verbatim.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Student ID cannot be empty")]
    EmptyId,
    #[error("Student ID can only contain letters, numbers, and hyphens")]
    InvalidIdCharacters,
    #[error("Student name cannot be empty")]
    EmptyName,
    #[error("Student name must be at least 2 characters")]
    NameTooShort,
    #[error("Email cannot be empty")]
    EmptyEmail,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("{0} grade must be between 0 and 100")]
    GradeOutOfRange(GradeComponent),
}

impl ValidationError {
    pub fn field(&self) -> StudentField {
        match self {
            ValidationError::EmptyId | ValidationError::InvalidIdCharacters => StudentField::Id,
            ValidationError::EmptyName | ValidationError::NameTooShort => StudentField::Name,
            ValidationError::EmptyEmail | ValidationError::InvalidEmail => StudentField::Email,
            ValidationError::GradeOutOfRange(component) => StudentField::Grade(*component),
        }
    }
}

/// A data line does not have the expected delimited shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid file line: line is empty")]
    BlankLine,
    #[error("invalid file format: expected {expected} fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },
    #[error("invalid grade format: {0:?}")]
    InvalidGrade(String),
    #[error("invalid file line: not valid UTF-8")]
    InvalidUtf8,
}

/// Any reason a serialized line could not become a student.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
