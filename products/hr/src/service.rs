use chrono::{Local, NaiveDate};
use entity::employee::{self, EmployeeInput};
use platform_store::{KeyValueStore, Storage, StorageError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    EMPLOYEES_KEY,
    error::{ServiceError, ServiceResult},
    search, validation,
};

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// In-memory employee collection mirrored to a backing store.
///
/// Every successful mutation writes the full collection before returning; a
/// failed write restores the previous in-memory state and surfaces the error.
#[derive(Debug)]
pub struct EmployeeService<B> {
    storage: Storage<B>,
    employees: Vec<employee::Model>,
    today: fn() -> NaiveDate,
}

impl<B: KeyValueStore> EmployeeService<B> {
    /// Loads the collection stored under [`EMPLOYEES_KEY`]; an absent key is an empty store.
    pub fn open(storage: Storage<B>) -> ServiceResult<Self> {
        let employees: Vec<employee::Model> = storage.get(EMPLOYEES_KEY)?.unwrap_or_default();
        Ok(Self::with_records(storage, employees))
    }

    /// Like [`open`](Self::open), but a stored collection that no longer parses
    /// yields an empty service together with the parse error. The bad value
    /// stays on disk until the next write replaces it.
    pub fn open_or_empty(storage: Storage<B>) -> ServiceResult<(Self, Option<StorageError>)> {
        match storage.get::<Vec<employee::Model>>(EMPLOYEES_KEY) {
            Ok(employees) => Ok((Self::with_records(storage, employees.unwrap_or_default()), None)),
            Err(err @ StorageError::Malformed { .. }) => {
                warn!(error = %err, "stored employees unreadable, starting empty");
                Ok((Self::with_records(storage, Vec::new()), Some(err)))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn with_records(storage: Storage<B>, employees: Vec<employee::Model>) -> Self {
        debug!(count = employees.len(), "employee store loaded");
        Self {
            storage,
            employees,
            today: local_today,
        }
    }

    /// Replaces the clock used to reject future birth dates.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.today)()
    }

    pub fn storage(&self) -> &Storage<B> {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut Storage<B> {
        &mut self.storage
    }

    /// Owned copy of every record, in insertion order.
    pub fn get_all(&self) -> Vec<employee::Model> {
        self.employees.clone()
    }

    /// Read-only view of the collection for the list pipeline.
    pub fn records(&self) -> &[employee::Model] {
        &self.employees
    }

    pub fn get_by_id(&self, id: Uuid) -> Option<employee::Model> {
        self.employees.iter().find(|employee| employee.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn create(&mut self, input: EmployeeInput) -> ServiceResult<employee::Model> {
        let id = input.id.unwrap_or_else(Uuid::new_v4);
        let record = validation::validate(input, id, (self.today)())?;
        if self.position_of(id).is_some() {
            return Err(ServiceError::DuplicateId { id });
        }
        self.ensure_unique_email(&record.email, id)?;

        self.employees.push(record.clone());
        if let Err(err) = self.persist() {
            self.employees.pop();
            return Err(err);
        }
        info!(%id, "employee created");
        Ok(record)
    }

    /// Full-record replace; `input.id` is ignored in favour of `id`.
    pub fn update(&mut self, id: Uuid, input: EmployeeInput) -> ServiceResult<employee::Model> {
        let index = self
            .position_of(id)
            .ok_or(ServiceError::NotFound { id })?;
        let input = EmployeeInput {
            id: Some(id),
            ..input
        };
        let record = validation::validate(input, id, (self.today)())?;
        self.ensure_unique_email(&record.email, id)?;

        let previous = std::mem::replace(&mut self.employees[index], record.clone());
        if let Err(err) = self.persist() {
            self.employees[index] = previous;
            return Err(err);
        }
        info!(%id, "employee updated");
        Ok(record)
    }

    /// Removes and returns the record.
    pub fn delete(&mut self, id: Uuid) -> ServiceResult<employee::Model> {
        let index = self
            .position_of(id)
            .ok_or(ServiceError::NotFound { id })?;
        let removed = self.employees.remove(index);
        if let Err(err) = self.persist() {
            self.employees.insert(index, removed);
            return Err(err);
        }
        info!(%id, "employee deleted");
        Ok(removed)
    }

    /// Case-insensitive search; a blank term returns every record.
    pub fn search(&self, term: &str) -> Vec<employee::Model> {
        search::filter(&self.employees, term)
    }

    /// Drops every record together with the stored collection.
    pub fn clear(&mut self) -> ServiceResult<()> {
        self.storage.remove(EMPLOYEES_KEY)?;
        let dropped = self.employees.len();
        self.employees.clear();
        info!(dropped, "employee store cleared");
        Ok(())
    }

    fn position_of(&self, id: Uuid) -> Option<usize> {
        self.employees.iter().position(|employee| employee.id == id)
    }

    fn ensure_unique_email(&self, email: &str, own_id: Uuid) -> ServiceResult<()> {
        let taken = self
            .employees
            .iter()
            .any(|employee| employee.email == email && employee.id != own_id);
        if taken {
            return Err(ServiceError::DuplicateEmail {
                email: email.to_string(),
            });
        }
        Ok(())
    }

    fn persist(&mut self) -> ServiceResult<()> {
        self.storage.set(EMPLOYEES_KEY, &self.employees).map_err(|err| {
            warn!(error = %err, "persisting employees failed; rolling back");
            ServiceError::from(err)
        })
    }
}
