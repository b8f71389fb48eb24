use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// One persisted employee. Every field is required once stored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_code: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub date_of_employment: NaiveDate,
    pub department: Department,
    pub position: Position,
}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Analytics,
    Tech,
}

impl Department {
    pub const ALL: [Department; 2] = [Department::Analytics, Department::Tech];

    pub fn as_str(self) -> &'static str {
        match self {
            Department::Analytics => "analytics",
            Department::Tech => "tech",
        }
    }

    pub fn i18n_key(self) -> String {
        format!("employee.departments.{}", self.as_str())
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|dept| dept.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant {
                kind: "department",
                value: s.to_string(),
            })
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Junior,
    Medior,
    Senior,
}

impl Position {
    pub const ALL: [Position; 3] = [Position::Junior, Position::Medior, Position::Senior];

    pub fn as_str(self) -> &'static str {
        match self {
            Position::Junior => "junior",
            Position::Medior => "medior",
            Position::Senior => "senior",
        }
    }

    pub fn i18n_key(self) -> String {
        format!("employee.positions.{}", self.as_str())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|pos| pos.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant {
                kind: "position",
                value: s.to_string(),
            })
    }
}

/// Caller-facing field names, in the order forms present them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    PhoneCode,
    PhoneNumber,
    DateOfEmployment,
    DateOfBirth,
    Department,
    Position,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::PhoneCode,
        Field::PhoneNumber,
        Field::DateOfEmployment,
        Field::DateOfBirth,
        Field::Department,
        Field::Position,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::PhoneCode => "phoneCode",
            Field::PhoneNumber => "phoneNumber",
            Field::DateOfEmployment => "dateOfEmployment",
            Field::DateOfBirth => "dateOfBirth",
            Field::Department => "department",
            Field::Position => "position",
        }
    }

    pub fn i18n_key(self) -> String {
        format!("employee.fields.{}", self.as_str())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Possibly incomplete employee data as supplied by a form, a CLI, or a seed.
///
/// Blank strings are treated the same as absent values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeInput {
    pub id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_code: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_employment: Option<NaiveDate>,
    pub department: Option<Department>,
    pub position: Option<Position>,
}

impl EmployeeInput {
    /// Fields that are absent or blank, in form order.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| !self.has(*field))
            .collect()
    }

    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::FirstName => present(&self.first_name),
            Field::LastName => present(&self.last_name),
            Field::Email => present(&self.email),
            Field::PhoneCode => present(&self.phone_code),
            Field::PhoneNumber => present(&self.phone_number),
            Field::DateOfEmployment => self.date_of_employment.is_some(),
            Field::DateOfBirth => self.date_of_birth.is_some(),
            Field::Department => self.department.is_some(),
            Field::Position => self.position.is_some(),
        }
    }

    /// Returns `self` with every field that is set in `patch` replaced.
    pub fn overlay(mut self, patch: EmployeeInput) -> Self {
        self.id = patch.id.or(self.id);
        if present(&patch.first_name) {
            self.first_name = patch.first_name;
        }
        if present(&patch.last_name) {
            self.last_name = patch.last_name;
        }
        if present(&patch.email) {
            self.email = patch.email;
        }
        if present(&patch.phone_code) {
            self.phone_code = patch.phone_code;
        }
        if present(&patch.phone_number) {
            self.phone_number = patch.phone_number;
        }
        self.date_of_birth = patch.date_of_birth.or(self.date_of_birth);
        self.date_of_employment = patch.date_of_employment.or(self.date_of_employment);
        self.department = patch.department.or(self.department);
        self.position = patch.position.or(self.position);
        self
    }

    /// Builds a record when every required field is present. Values are trimmed.
    pub fn into_model(self, id: Uuid) -> Option<Model> {
        Some(Model {
            id,
            first_name: trimmed(self.first_name)?,
            last_name: trimmed(self.last_name)?,
            email: trimmed(self.email)?,
            phone_code: trimmed(self.phone_code)?,
            phone_number: trimmed(self.phone_number)?,
            date_of_birth: self.date_of_birth?,
            date_of_employment: self.date_of_employment?,
            department: self.department?,
            position: self.position?,
        })
    }
}

impl From<&Model> for EmployeeInput {
    fn from(model: &Model) -> Self {
        Self {
            id: Some(model.id),
            first_name: Some(model.first_name.clone()),
            last_name: Some(model.last_name.clone()),
            email: Some(model.email.clone()),
            phone_code: Some(model.phone_code.clone()),
            phone_number: Some(model.phone_number.clone()),
            date_of_birth: Some(model.date_of_birth),
            date_of_employment: Some(model.date_of_employment),
            department: Some(model.department),
            position: Some(model.position),
        }
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn trimmed(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> EmployeeInput {
        EmployeeInput {
            id: None,
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            email: Some("ada@example.com".into()),
            phone_code: Some("+(90)".into()),
            phone_number: Some("532 123 45 67".into()),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10),
            date_of_employment: NaiveDate::from_ymd_opt(2022, 3, 1),
            department: Some(Department::Tech),
            position: Some(Position::Senior),
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let model = sample_input().into_model(Uuid::nil()).unwrap();
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["dateOfEmployment"], "2022-03-01");
        assert_eq!(json["department"], "tech");
        assert_eq!(json["position"], "senior");
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let mut input = sample_input();
        input.email = Some("   ".into());
        input.position = None;
        assert_eq!(input.missing_fields(), vec![Field::Email, Field::Position]);
        assert!(input.into_model(Uuid::nil()).is_none());
    }

    #[test]
    fn overlay_keeps_base_values_for_absent_patch_fields() {
        let base = sample_input();
        let patch = EmployeeInput {
            email: Some("ada@lovelace.dev".into()),
            last_name: Some(" ".into()),
            ..Default::default()
        };
        let merged = base.overlay(patch);
        assert_eq!(merged.email.as_deref(), Some("ada@lovelace.dev"));
        assert_eq!(merged.last_name.as_deref(), Some("Lovelace"));
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!("TECH".parse::<Department>().unwrap(), Department::Tech);
        assert_eq!(" medior ".parse::<Position>().unwrap(), Position::Medior);
        let err = "sales".parse::<Department>().unwrap_err();
        assert_eq!(err.to_string(), "unknown department `sales`");
    }
}
