use clap::{Args, Subcommand, ValueEnum};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(
        about = "Add a new student",
        long_about = "Validate and append a new student record. The ID must be unique, ignoring case."
    )]
    Add(StudentFields),
    #[command(about = "Delete a student by ID")]
    Delete {
        #[arg(long, value_name = "ID", help = "Student ID (case-insensitive)")]
        id: String,
    },
    #[command(
        about = "Update a student's information",
        long_about = "Replace the record stored under ID. Fields that are not given keep their current value; the ID itself is kept."
    )]
    Update(StudentChanges),
    #[command(about = "Show a student by ID")]
    Find {
        #[arg(long, value_name = "ID", help = "Student ID (case-insensitive)")]
        id: String,
    },
    #[command(about = "Search students by partial name, ignoring case")]
    Search {
        #[arg(long, value_name = "TEXT")]
        name: String,
    },
    #[command(about = "List all students")]
    List {
        #[arg(long, value_enum, default_value_t = SortOrder::Insertion)]
        sort: SortOrder,
    },
    #[command(about = "Show roster statistics")]
    Stats,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Order in which students were added
    Insertion,
    /// Name A-Z, ignoring case
    Name,
    /// Average grade, highest first
    Grade,
}

#[derive(Args, Debug, Clone)]
pub struct StudentFields {
    #[arg(long, value_name = "ID", help = "Letters, digits and hyphens")]
    pub id: String,
    #[arg(long, value_name = "NAME", help = "At least 2 characters")]
    pub name: String,
    #[arg(long, value_name = "EMAIL")]
    pub email: String,
    #[arg(long, value_name = "0-100")]
    pub prelim: f64,
    #[arg(long, value_name = "0-100")]
    pub midterm: f64,
    #[arg(long = "final", value_name = "0-100")]
    pub final_grade: f64,
}

#[derive(Args, Debug, Clone)]
pub struct StudentChanges {
    #[arg(long, value_name = "ID", help = "Student ID to update (case-insensitive)")]
    pub id: String,
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,
    #[arg(long, value_name = "EMAIL")]
    pub email: Option<String>,
    #[arg(long, value_name = "0-100")]
    pub prelim: Option<f64>,
    #[arg(long, value_name = "0-100")]
    pub midterm: Option<f64>,
    #[arg(long = "final", value_name = "0-100")]
    pub final_grade: Option<f64>,
}
