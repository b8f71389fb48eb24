//! HR vertical slice.
//!
//! The list pipeline runs leaf to root: [`service::EmployeeService`] holds the
//! records, [`listing::apply`] filters and pages them, [`pagination::window`]
//! lays out the page bar, and [`view::ViewCache`] keeps rendered fragments for
//! the page on screen. [`controller::ListController`] owns the list state and
//! wires those pieces together for a front end.

pub mod controller;
pub mod error;
pub mod form;
pub mod format;
pub mod listing;
pub mod pagination;
pub mod render;
pub mod sample;
pub mod search;
pub mod service;
pub mod validation;
pub mod view;

pub use controller::{ListController, ListState, Preferences};
pub use error::{ServiceError, ServiceResult};
pub use form::{FormOutcome, FormView};
pub use listing::Listing;
pub use pagination::PageEntry;
pub use service::EmployeeService;
pub use view::{ViewCache, ViewMode};

/// Storage key holding the serialized employee collection.
pub const EMPLOYEES_KEY: &str = "employees";
