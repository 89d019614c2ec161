use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE: &str = "students.txt";
const BACKUP_SUFFIX: &str = "_backup";

#[derive(Clone, Debug)]
pub struct Configuration {
    pub data_file: PathBuf,
    pub backup_file: PathBuf,
    pub log_file: Option<PathBuf>,
    pub json: bool,
}

/// `dir/name.ext` -> `dir/name_backup.ext`.
pub fn default_backup_path<P: AsRef<Path>>(data_file: P) -> PathBuf {
    let data_file = data_file.as_ref();
    let stem = data_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "students".to_string());
    let name = match data_file.extension() {
        Some(ext) => format!("{}{}.{}", stem, BACKUP_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, BACKUP_SUFFIX),
    };
    data_file.with_file_name(name)
}
