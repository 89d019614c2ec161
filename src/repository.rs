use std::cmp::Ordering;

use thiserror::Error;

use crate::storage::{SkippedLine, Storage};
use crate::types::{by_average_desc, by_name, Student};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Student with ID {0} already exists")]
    DuplicateKey(String),
    #[error("{0}")]
    InvalidArgument(&'static str),
}

/// Result of [`StudentRepository::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    NotFound,
    /// At least one student was removed; `saved` is the outcome of the write that followed.
    Removed { saved: bool },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosterStats {
    pub count: usize,
    pub average_grade: f64,
}

/// In-memory roster backed by a [`Storage`].
///
/// The collection keeps insertion order; every successful mutation writes the whole roster back
/// to storage. A failed write is logged and reported as `false`, the in-memory state stays
/// authoritative either way.
pub struct StudentRepository<S: Storage> {
    storage: S,
    students: Vec<Student>,
    skipped: Vec<SkippedLine>,
}

impl<S: Storage> StudentRepository<S> {
    /// Loads the roster from `storage`. Read failures are logged and leave the roster empty.
    pub fn open(storage: S) -> Self {
        let (students, skipped) = match storage.load() {
            Ok(report) => (report.students, report.skipped),
            Err(e) => {
                log::error!("error reading roster: {:#}", e);
                (Vec::new(), Vec::new())
            }
        };
        for line in &skipped {
            log::warn!("error parsing line {}: {}", line.line_number, line.reason);
        }
        log::info!("loaded {} students", students.len());

        Self {
            storage,
            students,
            skipped,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Lines rejected while loading.
    pub fn skipped_lines(&self) -> &[SkippedLine] {
        &self.skipped
    }

    /// Flushes the roster to storage, returning whether the write succeeded.
    pub fn save(&self) -> bool {
        match self.storage.save(&self.students) {
            Ok(()) => true,
            Err(e) => {
                log::error!("error saving roster: {:#}", e);
                false
            }
        }
    }

    pub fn add(&mut self, student: Student) -> Result<bool, RepositoryError> {
        if self.find_by_id(student.id()).is_some() {
            return Err(RepositoryError::DuplicateKey(student.id().to_string()));
        }
        self.students.push(student);
        Ok(self.save())
    }

    /// Removes every student whose id matches case-insensitively and saves if anything went.
    pub fn delete(&mut self, id: &str) -> Result<Deletion, RepositoryError> {
        let key = required_key(id)?;
        let before = self.students.len();
        self.students.retain(|s| !id_matches(s, key));
        if self.students.len() == before {
            return Ok(Deletion::NotFound);
        }
        Ok(Deletion::Removed { saved: self.save() })
    }

    /// Replaces the first match for `id` in place.
    ///
    /// `false` when nothing matches or the write fails. The replacement's own id is not checked
    /// against `id`.
    pub fn update(&mut self, id: &str, student: Student) -> Result<bool, RepositoryError> {
        let key = required_key(id)?;
        match self.students.iter_mut().find(|s| id_matches(s, key)) {
            Some(slot) => {
                *slot = student;
                Ok(self.save())
            }
            None => Ok(false),
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Student> {
        let key = id.trim();
        if key.is_empty() {
            return None;
        }
        self.students.iter().find(|s| id_matches(s, key))
    }

    /// Case-insensitive substring match on the name. A blank query matches nothing.
    pub fn search_by_name(&self, query: &str) -> Vec<Student> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.students
            .iter()
            .filter(|s| s.name().to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub fn all(&self) -> Vec<Student> {
        self.students.clone()
    }

    /// Copy of the roster ordered by `compare`. The sort is stable.
    pub fn sorted_by<F>(&self, compare: F) -> Vec<Student>
    where
        F: FnMut(&Student, &Student) -> Ordering,
    {
        let mut sorted = self.students.clone();
        sorted.sort_by(compare);
        sorted
    }

    pub fn sorted_by_name(&self) -> Vec<Student> {
        self.sorted_by(by_name)
    }

    pub fn sorted_by_grade(&self) -> Vec<Student> {
        self.sorted_by(by_average_desc)
    }

    pub fn count(&self) -> usize {
        self.students.len()
    }

    /// Mean of every student's average; 0.0 for an empty roster.
    pub fn average_grade(&self) -> f64 {
        if self.students.is_empty() {
            return 0.0;
        }
        let total: f64 = self.students.iter().map(Student::average_grade).sum();
        total / self.students.len() as f64
    }

    pub fn stats(&self) -> RosterStats {
        RosterStats {
            count: self.count(),
            average_grade: self.average_grade(),
        }
    }
}

fn required_key(id: &str) -> Result<&str, RepositoryError> {
    let key = id.trim();
    if key.is_empty() {
        return Err(RepositoryError::InvalidArgument("Student ID cannot be empty"));
    }
    Ok(key)
}

fn id_matches(student: &Student, key: &str) -> bool {
    student.id().eq_ignore_ascii_case(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, LoadReport};
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    /// Keeps nothing and counts writes; optionally fails every write.
    #[derive(Default)]
    struct MemoryStorage {
        saves: Cell<usize>,
        fail: bool,
    }

    impl Storage for MemoryStorage {
        fn load(&self) -> anyhow::Result<LoadReport> {
            Ok(LoadReport::default())
        }

        fn save(&self, _students: &[Student]) -> anyhow::Result<()> {
            self.saves.set(self.saves.get() + 1);
            if self.fail {
                anyhow::bail!("disk full");
            }
            Ok(())
        }
    }

    fn student(id: &str, name: &str, grades: [f64; 3]) -> Student {
        Student::new(id, name, "s@school.edu", grades[0], grades[1], grades[2])
            .expect("valid student")
    }

    fn repo() -> StudentRepository<MemoryStorage> {
        StudentRepository::open(MemoryStorage::default())
    }

    fn ids(students: &[Student]) -> Vec<&str> {
        students.iter().map(Student::id).collect()
    }

    #[test]
    fn add_appends_and_saves() {
        let mut r = repo();
        assert_eq!(r.add(student("A1", "Alice", [90.0; 3])), Ok(true));
        assert_eq!(r.add(student("B2", "Bob", [80.0; 3])), Ok(true));
        assert_eq!(r.count(), 2);
        assert_eq!(ids(&r.all()), ["A1", "B2"]);
        assert_eq!(r.storage().saves.get(), 2);
    }

    #[test]
    fn add_rejects_duplicate_id_in_any_case() {
        let mut r = repo();
        r.add(student("ABC", "Alice", [90.0; 3])).unwrap();
        let err = r.add(student("abc", "Other", [10.0; 3])).unwrap_err();
        assert_eq!(err, RepositoryError::DuplicateKey("abc".into()));
        assert_eq!(err.to_string(), "Student with ID abc already exists");
        assert_eq!(r.count(), 1);
        assert_eq!(r.storage().saves.get(), 1);
    }

    #[test]
    fn add_reports_failed_save_but_keeps_record() {
        let mut r = StudentRepository::open(MemoryStorage {
            fail: true,
            ..Default::default()
        });
        assert_eq!(r.add(student("A1", "Alice", [90.0; 3])), Ok(false));
        assert_eq!(r.count(), 1);
        assert!(r.find_by_id("a1").is_some());
    }

    #[test]
    fn delete_removes_case_insensitive_match() {
        let mut r = repo();
        r.add(student("A1", "Alice", [90.0; 3])).unwrap();
        r.add(student("B2", "Bob", [80.0; 3])).unwrap();

        assert_eq!(r.delete("zz"), Ok(Deletion::NotFound));
        assert_eq!(r.count(), 2);
        assert_eq!(r.storage().saves.get(), 2);

        assert_eq!(r.delete(" a1 "), Ok(Deletion::Removed { saved: true }));
        assert_eq!(r.count(), 1);
        assert_eq!(ids(&r.all()), ["B2"]);
        assert_eq!(r.storage().saves.get(), 3);
    }

    #[test]
    fn delete_reports_failed_save() {
        let mut r = StudentRepository::open(MemoryStorage {
            fail: true,
            ..Default::default()
        });
        r.add(student("A1", "Alice", [90.0; 3])).unwrap();

        assert_eq!(r.delete("a1"), Ok(Deletion::Removed { saved: false }));
        assert_eq!(r.count(), 0);
        assert_eq!(r.storage().saves.get(), 2);
        assert_eq!(r.delete("a1"), Ok(Deletion::NotFound));
    }

    #[test]
    fn open_starts_empty_when_the_data_file_cannot_be_read() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("students.txt");
        fs::create_dir(&data).unwrap();

        let r = StudentRepository::open(FileStorage::new(&data, dir.path().join("backup.txt")));
        assert_eq!(r.count(), 0);
        assert!(r.skipped_lines().is_empty());
    }

    #[test]
    fn delete_and_update_require_an_id() {
        let mut r = repo();
        let err = r.delete("  ").unwrap_err();
        assert_eq!(err.to_string(), "Student ID cannot be empty");
        assert!(matches!(
            r.update("", student("A1", "Alice", [1.0; 3])),
            Err(RepositoryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn update_replaces_in_place() {
        let mut r = repo();
        r.add(student("A1", "Alice", [90.0; 3])).unwrap();
        r.add(student("B2", "Bob", [80.0; 3])).unwrap();
        r.add(student("C3", "Carol", [70.0; 3])).unwrap();

        assert_eq!(r.update("b2", student("B2", "Robert", [60.0; 3])), Ok(true));
        assert_eq!(ids(&r.all()), ["A1", "B2", "C3"]);
        assert_eq!(r.find_by_id("B2").unwrap().name(), "Robert");
        assert_eq!(r.storage().saves.get(), 4);
    }

    #[test]
    fn update_of_missing_id_does_nothing() {
        let mut r = repo();
        r.add(student("A1", "Alice", [90.0; 3])).unwrap();
        assert_eq!(r.update("Z9", student("Z9", "Zed", [1.0; 3])), Ok(false));
        assert_eq!(r.count(), 1);
        assert_eq!(r.storage().saves.get(), 1);
    }

    #[test]
    fn update_may_rename_the_id() {
        let mut r = repo();
        r.add(student("A1", "Alice", [90.0; 3])).unwrap();
        r.add(student("B2", "Bob", [80.0; 3])).unwrap();
        assert_eq!(r.update("A1", student("X9", "Alice", [90.0; 3])), Ok(true));
        assert_eq!(ids(&r.all()), ["X9", "B2"]);
        assert!(r.find_by_id("A1").is_none());
    }

    #[test]
    fn find_by_id_ignores_case_and_blank() {
        let mut r = repo();
        r.add(student("ABC", "Alice", [90.0; 3])).unwrap();
        assert_eq!(r.find_by_id("abc").map(Student::id), Some("ABC"));
        assert!(r.find_by_id("").is_none());
        assert!(r.find_by_id("   ").is_none());
        assert!(r.find_by_id("AB").is_none());
    }

    #[test]
    fn search_by_name_is_case_insensitive_substring() {
        let mut r = repo();
        r.add(student("A1", "Alice Smith", [90.0; 3])).unwrap();
        r.add(student("B2", "Bob Smithers", [80.0; 3])).unwrap();
        r.add(student("C3", "Carol", [70.0; 3])).unwrap();

        assert_eq!(ids(&r.search_by_name("SMITH")), ["A1", "B2"]);
        assert_eq!(ids(&r.search_by_name(" carol ")), ["C3"]);
        assert!(r.search_by_name("").is_empty());
        assert!(r.search_by_name("zed").is_empty());
    }

    #[test]
    fn sorted_views_leave_order_untouched() {
        let mut r = repo();
        r.add(student("B", "Bob", [70.0; 3])).unwrap();
        r.add(student("A", "alice", [90.0; 3])).unwrap();
        r.add(student("C", "Charlie", [80.0; 3])).unwrap();

        let names: Vec<String> = r
            .sorted_by_name()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, ["alice", "Bob", "Charlie"]);
        assert_eq!(ids(&r.sorted_by_grade()), ["A", "C", "B"]);
        assert_eq!(ids(&r.all()), ["B", "A", "C"]);
    }

    #[test]
    fn sorted_by_grade_keeps_ties_stable() {
        let mut r = repo();
        r.add(student("T1", "First", [80.0; 3])).unwrap();
        r.add(student("HI", "High", [95.0; 3])).unwrap();
        r.add(student("T2", "Second", [80.0; 3])).unwrap();
        assert_eq!(ids(&r.sorted_by_grade()), ["HI", "T1", "T2"]);
    }

    #[test]
    fn average_grade_of_empty_roster_is_zero() {
        let r = repo();
        assert_eq!(r.average_grade(), 0.0);
        assert_eq!(
            r.stats(),
            RosterStats {
                count: 0,
                average_grade: 0.0
            }
        );
    }

    #[test]
    fn average_grade_is_mean_of_averages() {
        let mut r = repo();
        r.add(student("A1", "Alice", [90.0, 90.0, 90.0])).unwrap();
        r.add(student("B2", "Bob", [60.0, 70.0, 80.0])).unwrap();
        assert_eq!(r.average_grade(), 80.0);
        assert_eq!(r.stats().count, 2);
    }

    #[test]
    fn equality_and_lookup_disagree_on_case() {
        let a = student("A1", "Alice", [1.0; 3]);
        let b = student("a1", "Alice", [1.0; 3]);
        assert_ne!(a, b);

        let mut r = repo();
        r.add(a).unwrap();
        assert!(matches!(r.add(b), Err(RepositoryError::DuplicateKey(_))));
    }

    #[test]
    fn open_skips_malformed_lines_and_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("students.txt");
        let backup = dir.path().join("students_backup.txt");
        fs::write(
            &data,
            "# roster\nA1|Alice|alice@x.io|90|80|70\nB2|Bob|bob@x.io|90|n/a|70\n",
        )
        .unwrap();

        let mut r = StudentRepository::open(FileStorage::new(&data, &backup));
        assert_eq!(r.count(), 1);
        assert_eq!(r.skipped_lines().len(), 1);
        assert_eq!(r.skipped_lines()[0].line_number, 3);

        assert_eq!(
            r.add(Student::new("C3", "Carol", "CAROL@X.IO", 70.0, 75.0, 80.0).unwrap()),
            Ok(true)
        );
        assert!(backup.exists());

        let reopened = StudentRepository::open(FileStorage::new(&data, &backup));
        assert_eq!(ids(&reopened.all()), ["A1", "C3"]);
        assert_eq!(reopened.find_by_id("c3").unwrap().email(), "carol@x.io");
        assert!(reopened.skipped_lines().is_empty());
    }
}
