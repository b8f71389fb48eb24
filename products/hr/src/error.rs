use platform_store::StorageError;
use platform_ui::{Translator, UserFacing};
use thiserror::Error;
use uuid::Uuid;

use crate::validation::ValidationError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("email address {email} is already in use")]
    DuplicateEmail { email: String },
    #[error("employee {id} already exists")]
    DuplicateId { id: Uuid },
    #[error("employee {id} not found")]
    NotFound { id: Uuid },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl UserFacing for ServiceError {
    fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "VALIDATION",
            ServiceError::DuplicateEmail { .. } => "DUPLICATE_EMAIL",
            ServiceError::DuplicateId { .. } => "DUPLICATE_ID",
            ServiceError::NotFound { .. } => "NOT_FOUND",
            ServiceError::Storage(err) => err.code(),
        }
    }

    fn message(&self, translator: &Translator) -> String {
        match self {
            ServiceError::Validation(err) => validation_message(err, translator),
            ServiceError::DuplicateEmail { email } => {
                translator.translate("errors.data.emailInUse", &[("email", email)])
            }
            ServiceError::DuplicateId { .. } => translator.t("errors.data.alreadyExists"),
            ServiceError::NotFound { .. } => translator.t("errors.data.notFound"),
            ServiceError::Storage(err) => UserFacing::message(err, translator),
        }
    }
}

fn validation_message(err: &ValidationError, translator: &Translator) -> String {
    let missing = err.missing();
    if !missing.is_empty() {
        let labels: Vec<String> = missing
            .iter()
            .map(|field| translator.t(&field.i18n_key()))
            .collect();
        return format!(
            "{}: {}",
            translator.t("errors.validation.missingFields"),
            labels.join(", ")
        );
    }
    match err.issues().next() {
        Some((field, issue)) => {
            let label = translator.t(&field.i18n_key());
            format!(
                "{}: {}",
                translator.translate("errors.validation.invalidField", &[("field", &label)]),
                translator.t(issue.i18n_key())
            )
        }
        None => translator.t("errors.validation.missingData"),
    }
}
