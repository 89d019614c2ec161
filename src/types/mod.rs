mod student;
mod student_error;

pub use student::{by_average_desc, by_name, Student};
pub use student_error::{FormatError, GradeComponent, RecordError, StudentField, ValidationError};
