use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::{FormatError, GradeComponent, RecordError, ValidationError};

const FIELD_DELIMITER: char = '|';
const FIELD_COUNT: usize = 6;
const MIN_NAME_LEN: usize = 2;
const MIN_GRADE: f64 = 0.0;
const MAX_GRADE: f64 = 100.0;

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("id pattern compiles"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .expect("email pattern compiles")
    })
}

/// One validated student record.
///
/// Every field satisfies its constraint for the lifetime of the value; there are no setters, an
/// update replaces the whole record. Equality and hashing look at the id only, compared
/// case-sensitively, while repository lookups compare ids case-insensitively.
#[derive(Debug, Clone, Serialize)]
pub struct Student {
    id: String,
    name: String,
    email: String,
    prelim_grade: f64,
    midterm_grade: f64,
    final_grade: f64,
}

impl Student {
    /// Validates the inputs and builds a record.
    ///
    /// Fields are checked in declaration order and the first failing rule is returned.
    pub fn new(
        id: &str,
        name: &str,
        email: &str,
        prelim_grade: f64,
        midterm_grade: f64,
        final_grade: f64,
    ) -> Result<Self, ValidationError> {
        let id = validate_id(id)?;
        let name = validate_name(name)?;
        let email = validate_email(email)?;
        let prelim_grade = validate_grade(prelim_grade, GradeComponent::Prelim)?;
        let midterm_grade = validate_grade(midterm_grade, GradeComponent::Midterm)?;
        let final_grade = validate_grade(final_grade, GradeComponent::Final)?;

        Ok(Self {
            id,
            name,
            email,
            prelim_grade,
            midterm_grade,
            final_grade,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn prelim_grade(&self) -> f64 {
        self.prelim_grade
    }

    pub fn midterm_grade(&self) -> f64 {
        self.midterm_grade
    }

    pub fn final_grade(&self) -> f64 {
        self.final_grade
    }

    pub fn average_grade(&self) -> f64 {
        (self.prelim_grade + self.midterm_grade + self.final_grade) / 3.0
    }

    /// Single-line `id|name|email|prelim|midterm|final` form with two-decimal grades.
    ///
    /// The delimiter is not escaped: a `|` inside the name or email shifts the field count and
    /// the line is rejected on the next load.
    pub fn to_line(&self) -> String {
        format!(
            "{}|{}|{}|{:.2}|{:.2}|{:.2}",
            self.id, self.name, self.email, self.prelim_grade, self.midterm_grade, self.final_grade
        )
    }

    /// Parses a line produced by [`Student::to_line`] and validates it like [`Student::new`].
    pub fn from_line(line: &str) -> Result<Self, RecordError> {
        if line.trim().is_empty() {
            return Err(FormatError::BlankLine.into());
        }

        let mut parts: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        // trailing empty fields are dropped before counting
        while parts.len() > 1 && parts.last() == Some(&"") {
            parts.pop();
        }
        if parts.len() != FIELD_COUNT {
            return Err(FormatError::FieldCount {
                expected: FIELD_COUNT,
                actual: parts.len(),
            }
            .into());
        }

        let prelim = parse_grade(parts[3])?;
        let midterm = parse_grade(parts[4])?;
        let final_grade = parse_grade(parts[5])?;

        Ok(Self::new(
            parts[0],
            parts[1],
            parts[2],
            prelim,
            midterm,
            final_grade,
        )?)
    }
}

impl PartialEq for Student {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Student {}

impl Hash for Student {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} | Name: {} | Email: {} | Prelim: {:.2} | Midterm: {:.2} | Final: {:.2} | Average: {:.2}",
            self.id,
            self.name,
            self.email,
            self.prelim_grade,
            self.midterm_grade,
            self.final_grade,
            self.average_grade()
        )
    }
}

/// Case-insensitive ascending order by name.
pub fn by_name(a: &Student, b: &Student) -> Ordering {
    let lhs = a.name.chars().flat_map(char::to_lowercase);
    let rhs = b.name.chars().flat_map(char::to_lowercase);
    lhs.cmp(rhs)
}

/// Highest average first.
pub fn by_average_desc(a: &Student, b: &Student) -> Ordering {
    b.average_grade().total_cmp(&a.average_grade())
}

fn validate_id(id: &str) -> Result<String, ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::EmptyId);
    }
    if !id_pattern().is_match(id) {
        return Err(ValidationError::InvalidIdCharacters);
    }
    Ok(id.trim().to_string())
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if trimmed.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::NameTooShort);
    }
    Ok(trimmed.to_string())
}

fn validate_email(email: &str) -> Result<String, ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if !email_pattern().is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email.trim().to_lowercase())
}

fn validate_grade(grade: f64, component: GradeComponent) -> Result<f64, ValidationError> {
    // NaN fails the range check as well
    if !(MIN_GRADE..=MAX_GRADE).contains(&grade) {
        return Err(ValidationError::GradeOutOfRange(component));
    }
    Ok(grade)
}

fn parse_grade(raw: &str) -> Result<f64, FormatError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| FormatError::InvalidGrade(raw.to_string()))
}
