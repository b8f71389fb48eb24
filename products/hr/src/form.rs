use std::collections::BTreeMap;

use entity::employee::{self, EmployeeInput, Field};
use platform_store::KeyValueStore;
use platform_ui::{Notifier, Route, Translator, report};
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::{ServiceError, ServiceResult},
    service::EmployeeService,
    validation,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Uuid),
}

/// Result of submitting a form. Rejections have already been reported.
#[derive(Debug)]
pub enum FormOutcome {
    Created(employee::Model),
    Updated(employee::Model),
    Rejected(ServiceError),
}

impl FormOutcome {
    pub fn is_saved(&self) -> bool {
        !matches!(self, FormOutcome::Rejected(_))
    }

    pub fn record(&self) -> Option<&employee::Model> {
        match self {
            FormOutcome::Created(record) | FormOutcome::Updated(record) => Some(record),
            FormOutcome::Rejected(_) => None,
        }
    }
}

/// Create or edit form bound to one route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormView {
    mode: FormMode,
    initial: EmployeeInput,
}

impl FormView {
    /// `Ok(None)` for routes that do not show a form. Editing an unknown
    /// record is `NotFound`.
    pub fn for_route<B: KeyValueStore>(
        route: &Route,
        service: &EmployeeService<B>,
    ) -> ServiceResult<Option<Self>> {
        match route {
            Route::Create => Ok(Some(Self::create())),
            Route::Edit(id) => {
                let record = service
                    .get_by_id(*id)
                    .ok_or(ServiceError::NotFound { id: *id })?;
                Ok(Some(Self {
                    mode: FormMode::Edit(*id),
                    initial: EmployeeInput::from(&record),
                }))
            }
            Route::List | Route::NotFound(_) => Ok(None),
        }
    }

    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            initial: EmployeeInput::default(),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn initial(&self) -> &EmployeeInput {
        &self.initial
    }

    pub fn title_key(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "employee.form.addTitle",
            FormMode::Edit(_) => "employee.form.editTitle",
        }
    }

    /// Localized messages for every field that would block submission.
    pub fn field_errors<B: KeyValueStore>(
        &self,
        patch: &EmployeeInput,
        service: &EmployeeService<B>,
        translator: &Translator,
    ) -> BTreeMap<Field, String> {
        let merged = self.initial.clone().overlay(patch.clone());
        validation::inspect(&merged, service.today()).field_messages(translator)
    }

    pub fn submit<B, N>(
        &self,
        patch: EmployeeInput,
        service: &mut EmployeeService<B>,
        translator: &Translator,
        notifier: &mut N,
    ) -> FormOutcome
    where
        B: KeyValueStore,
        N: Notifier + ?Sized,
    {
        let merged = self.initial.clone().overlay(patch);
        let result = match self.mode {
            FormMode::Create => service.create(merged).map(FormOutcome::Created),
            FormMode::Edit(id) => service.update(id, merged).map(FormOutcome::Updated),
        };
        match result {
            Ok(outcome) => {
                let key = match &outcome {
                    FormOutcome::Created(_) => "notifications.createSuccess",
                    _ => "notifications.updateSuccess",
                };
                notifier.success(&translator.t(key));
                outcome
            }
            Err(err) => {
                debug!(mode = ?self.mode, "form submission rejected");
                report(&err, translator, notifier);
                FormOutcome::Rejected(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use entity::employee::{Department, Position};
    use platform_store::{DEFAULT_SOFT_LIMIT, MemoryStore, Storage};
    use platform_ui::{Level, Locale, RecordingNotifier};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn service() -> EmployeeService<MemoryStore> {
        EmployeeService::open(Storage::new(MemoryStore::new(), DEFAULT_SOFT_LIMIT))
            .unwrap()
            .with_clock(today)
    }

    fn complete(email: &str) -> EmployeeInput {
        EmployeeInput {
            id: None,
            first_name: Some("Linus".into()),
            last_name: Some("Kernel".into()),
            email: Some(email.into()),
            phone_code: Some("+(90)".into()),
            phone_number: Some("(532) 111 22 33".into()),
            date_of_birth: NaiveDate::from_ymd_opt(1969, 12, 28),
            date_of_employment: NaiveDate::from_ymd_opt(2021, 8, 25),
            department: Some(Department::Tech),
            position: Some(Position::Senior),
        }
    }

    #[test]
    fn routes_select_the_form() {
        let svc = service();
        assert_eq!(
            FormView::for_route(&Route::Create, &svc).unwrap(),
            Some(FormView::create())
        );
        assert_eq!(FormView::for_route(&Route::List, &svc).unwrap(), None);
        assert!(matches!(
            FormView::for_route(&Route::Edit(Uuid::new_v4()), &svc),
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[test]
    fn create_submission_notifies_success() {
        let mut svc = service();
        let translator = Translator::new(Locale::En).unwrap();
        let mut notifier = RecordingNotifier::new();
        let outcome = FormView::create().submit(
            complete("linus@example.com"),
            &mut svc,
            &translator,
            &mut notifier,
        );
        assert!(matches!(outcome, FormOutcome::Created(_)));
        assert_eq!(notifier.last().unwrap().message, "Employee created successfully");
        assert_eq!(svc.len(), 1);
    }

    #[test]
    fn edit_overlays_the_patch_on_the_loaded_record() {
        let mut svc = service();
        let translator = Translator::new(Locale::En).unwrap();
        let mut notifier = RecordingNotifier::new();
        let created = svc.create(complete("linus@example.com")).unwrap();

        let form = FormView::for_route(&Route::Edit(created.id), &svc)
            .unwrap()
            .unwrap();
        assert_eq!(form.title_key(), "employee.form.editTitle");
        let patch = EmployeeInput {
            position: Some(Position::Medior),
            ..EmployeeInput::default()
        };
        let outcome = form.submit(patch, &mut svc, &translator, &mut notifier);
        let updated = outcome.record().unwrap();
        assert_eq!(updated.position, Position::Medior);
        assert_eq!(updated.email, "linus@example.com");
        assert_eq!(notifier.last().unwrap().message, "Employee updated successfully");
    }

    #[test]
    fn rejected_submissions_are_reported() {
        let mut svc = service();
        let translator = Translator::new(Locale::En).unwrap();
        let mut notifier = RecordingNotifier::new();
        svc.create(complete("taken@example.com")).unwrap();

        let outcome = FormView::create().submit(
            complete("taken@example.com"),
            &mut svc,
            &translator,
            &mut notifier,
        );
        assert!(!outcome.is_saved());
        let shown = notifier.last().unwrap();
        assert_eq!(shown.level, Level::Error);
        assert_eq!(shown.message, "Email address taken@example.com is already in use");
    }

    #[test]
    fn field_errors_are_localized() {
        let svc = service();
        let translator = Translator::new(Locale::En).unwrap();
        let patch = EmployeeInput {
            email: Some("not-an-email".into()),
            phone_number: Some("12".into()),
            ..complete("x@example.com")
        };
        let errors = FormView::create().field_errors(&patch, &svc, &translator);
        assert_eq!(errors[&Field::Email], "Please enter a valid email address");
        assert_eq!(errors[&Field::PhoneNumber], "Please enter a valid phone number");
        assert_eq!(errors.len(), 2);

        let blank = FormView::create().field_errors(&EmployeeInput::default(), &svc, &translator);
        assert_eq!(blank.len(), Field::ALL.len());
        assert!(blank.values().all(|m| m == "This field is required"));
    }
}
