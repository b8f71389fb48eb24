//! Shared fixtures for the integration tests.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use entity::employee::{Department, EmployeeInput, Position};
use platform_store::{FileStore, Storage, StorageSettings};
use uuid::Uuid;

/// Unique data directory under the system temp dir, removed on drop.
pub struct TempDataDir {
    path: PathBuf,
}

impl TempDataDir {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("hr_store_{}", Uuid::new_v4().simple()));
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open(&self, soft_limit: usize) -> Storage<FileStore> {
        let mut settings = StorageSettings::new(&self.path);
        settings.soft_limit_bytes = soft_limit;
        settings.open().expect("temp data dir opens")
    }
}

impl Default for TempDataDir {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempDataDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

/// A complete, valid input whose email is derived from `n`.
pub fn employee_input(n: usize) -> EmployeeInput {
    EmployeeInput {
        id: None,
        first_name: Some(format!("Worker{n}")),
        last_name: Some(if n % 2 == 0 { "Even" } else { "Odd" }.to_string()),
        email: Some(format!("worker{n}@example.com")),
        phone_code: Some("+(90)".into()),
        phone_number: Some("532 555 44 33".into()),
        date_of_birth: NaiveDate::from_ymd_opt(1985, 3, 14),
        date_of_employment: NaiveDate::from_ymd_opt(2023, 11, 1),
        department: Some(if n % 3 == 0 {
            Department::Analytics
        } else {
            Department::Tech
        }),
        position: Some(Position::Senior),
    }
}
