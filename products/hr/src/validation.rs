use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;
use entity::employee::{self, EmployeeInput, Field};
use once_cell::sync::Lazy;
use platform_ui::Translator;
use regex::Regex;
use uuid::Uuid;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern")
});

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\+\d{1,3}\s)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{2}[\s.-]?\d{2}$")
        .expect("phone pattern")
});

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FieldIssue {
    Required,
    InvalidEmail,
    InvalidPhone,
    FutureDate,
}

impl FieldIssue {
    pub fn i18n_key(self) -> &'static str {
        match self {
            FieldIssue::Required => "employee.validation.required",
            FieldIssue::InvalidEmail => "employee.validation.email",
            FieldIssue::InvalidPhone => "employee.validation.phone",
            FieldIssue::FutureDate => "employee.validation.date",
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldIssue::Required => "is required",
            FieldIssue::InvalidEmail => "is not a valid email address",
            FieldIssue::InvalidPhone => "is not a valid phone number",
            FieldIssue::FutureDate => "lies in the future",
        })
    }
}

/// Every problem found in one input, keyed by field in form order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationError {
    issues: BTreeMap<Field, FieldIssue>,
}

impl ValidationError {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issue(&self, field: Field) -> Option<FieldIssue> {
        self.issues.get(&field).copied()
    }

    pub fn issues(&self) -> impl Iterator<Item = (Field, FieldIssue)> + '_ {
        self.issues.iter().map(|(field, issue)| (*field, *issue))
    }

    pub fn missing(&self) -> Vec<Field> {
        self.issues()
            .filter(|(_, issue)| *issue == FieldIssue::Required)
            .map(|(field, _)| field)
            .collect()
    }

    /// Localized message per field, as a form shows them next to its inputs.
    pub fn field_messages(&self, translator: &Translator) -> BTreeMap<Field, String> {
        self.issues()
            .map(|(field, issue)| (field, translator.t(issue.i18n_key())))
            .collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let missing = self.missing();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|field| field.as_str()).collect();
            return write!(f, "missing required fields: {}", names.join(", "));
        }
        let invalid: Vec<String> = self
            .issues()
            .map(|(field, issue)| format!("{field} {issue}"))
            .collect();
        write!(f, "{}", invalid.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// Collects every missing or malformed field. Format checks only run on
/// fields that are present.
pub fn inspect(input: &EmployeeInput, today: NaiveDate) -> ValidationError {
    let mut issues: BTreeMap<Field, FieldIssue> = input
        .missing_fields()
        .into_iter()
        .map(|field| (field, FieldIssue::Required))
        .collect();

    if let Some(email) = input.email.as_deref().map(str::trim) {
        if !email.is_empty() && !EMAIL.is_match(email) {
            issues.insert(Field::Email, FieldIssue::InvalidEmail);
        }
    }
    if let Some(phone) = input.phone_number.as_deref().map(str::trim) {
        if !phone.is_empty() && !PHONE.is_match(phone) {
            issues.insert(Field::PhoneNumber, FieldIssue::InvalidPhone);
        }
    }
    if input.date_of_birth.is_some_and(|born| born > today) {
        issues.insert(Field::DateOfBirth, FieldIssue::FutureDate);
    }

    ValidationError { issues }
}

/// Turns a complete, well-formed input into a record carrying `id`.
pub fn validate(
    input: EmployeeInput,
    id: Uuid,
    today: NaiveDate,
) -> Result<employee::Model, ValidationError> {
    let report = inspect(&input, today);
    if !report.is_empty() {
        return Err(report);
    }
    input.into_model(id).ok_or(report)
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value.trim())
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE.is_match(value.trim())
}
