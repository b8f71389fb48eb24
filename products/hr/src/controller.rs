use std::time::Instant;

use entity::employee::EmployeeInput;
use platform_store::{KeyValueStore, Storage, StoreResult};
use platform_ui::{
    Debouncer, Locale, NotificationId, Notifier, Pending, Route, Translator, UserFacing, report,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    error::ServiceResult,
    form::{FormOutcome, FormView},
    listing::{self, Listing},
    pagination::{self, DEFAULT_PAGE_SIZE, MAX_VISIBLE_PAGES, PAGE_SIZE_OPTIONS},
    render, search,
    service::EmployeeService,
    view::{ViewCache, ViewMode},
};

pub const VIEW_PREFERENCE_KEY: &str = "viewPreference";
pub const PAGE_SIZE_KEY: &str = "pageSize";
pub const LANGUAGE_KEY: &str = "language";

const DELETE_EVENT: &str = "confirm-delete";

/// User preferences persisted next to the employee collection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Preferences {
    pub view: Option<ViewMode>,
    pub page_size: Option<usize>,
    pub language: Option<Locale>,
}

impl Preferences {
    /// Reads every preference; unreadable or out-of-range values count as unset.
    pub fn load<B: KeyValueStore>(storage: &Storage<B>) -> Self {
        Self {
            view: read::<String, B>(storage, VIEW_PREFERENCE_KEY).and_then(|v| v.parse().ok()),
            page_size: read::<usize, B>(storage, PAGE_SIZE_KEY)
                .filter(|size| PAGE_SIZE_OPTIONS.contains(size)),
            language: read::<String, B>(storage, LANGUAGE_KEY).and_then(|c| c.parse().ok()),
        }
    }

    pub fn save_view<B: KeyValueStore>(storage: &mut Storage<B>, view: ViewMode) -> StoreResult<()> {
        storage.set(VIEW_PREFERENCE_KEY, view.as_str())
    }

    pub fn save_page_size<B: KeyValueStore>(storage: &mut Storage<B>, size: usize) -> StoreResult<()> {
        storage.set(PAGE_SIZE_KEY, &size)
    }

    pub fn save_language<B: KeyValueStore>(storage: &mut Storage<B>, locale: Locale) -> StoreResult<()> {
        storage.set(LANGUAGE_KEY, locale.code())
    }
}

fn read<T: DeserializeOwned, B: KeyValueStore>(storage: &Storage<B>, key: &str) -> Option<T> {
    match storage.get(key) {
        Ok(value) => value,
        Err(err) => {
            debug!(key, error = %err, "ignoring unreadable preference");
            None
        }
    }
}

/// Everything the list view needs to redraw itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListState {
    pub page: usize,
    pub page_size: usize,
    pub search_term: String,
    pub view: ViewMode,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search_term: String::new(),
            view: ViewMode::default(),
        }
    }
}

/// Owns the list state and drives the filter, paginate and render pipeline
/// against an [`EmployeeService`].
///
/// Callers that mutate the service directly through [`Self::service_mut`]
/// must call [`Self::refresh`] afterwards.
pub struct ListController<B, N> {
    service: EmployeeService<B>,
    translator: Translator,
    notifier: N,
    state: ListState,
    listing: Listing,
    revision: u64,
    table_cache: ViewCache<String>,
    card_cache: ViewCache<String>,
    search_input: Pending<String>,
    guard: Debouncer<&'static str>,
}

impl<B: KeyValueStore, N: Notifier> ListController<B, N> {
    pub fn new(service: EmployeeService<B>, translator: Translator, notifier: N) -> Self {
        let preferences = Preferences::load(service.storage());
        let state = ListState {
            page_size: preferences.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            view: preferences.view.unwrap_or_default(),
            ..ListState::default()
        };
        let mut controller = Self {
            service,
            translator,
            notifier,
            state,
            listing: Listing::default(),
            revision: 0,
            table_cache: ViewCache::new(),
            card_cache: ViewCache::new(),
            search_input: Pending::default(),
            guard: Debouncer::default(),
        };
        controller.refresh();
        controller
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn service(&self) -> &EmployeeService<B> {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut EmployeeService<B> {
        &mut self.service
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Raises `err` through the notifier in the active language.
    pub fn report_error<E: UserFacing + ?Sized>(&mut self, err: &E) -> NotificationId {
        report(err, &self.translator, &mut self.notifier)
    }

    pub fn table_cache(&self) -> &ViewCache<String> {
        &self.table_cache
    }

    /// Re-runs the pipeline. The page is clamped, so deleting the last item
    /// of the last page lands on the page before it.
    pub fn refresh(&mut self) {
        self.listing = listing::apply(
            self.service.records(),
            &self.state.search_term,
            self.state.page,
            self.state.page_size,
        );
        self.state.page = self.listing.effective_page;
        self.revision += 1;
        debug!(
            revision = self.revision,
            page = self.state.page,
            matched = self.listing.filtered.len(),
            "list recomputed"
        );
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_input.cancel();
        self.state.search_term = term.into();
        self.state.page = 1;
        self.refresh();
    }

    /// Records a keystroke; the term is applied by [`Self::poll`] once typing pauses.
    pub fn type_search(&mut self, term: impl Into<String>, now: Instant) {
        self.search_input.push(term.into(), now);
    }

    /// Applies a pending search term whose debounce window has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.search_input.poll(now) {
            Some(term) => {
                self.set_search(term);
                true
            }
            None => false,
        }
    }

    pub fn clear_search(&mut self) {
        self.set_search(String::new());
    }

    /// Moves to `page`; returns `false` for the current page or one out of range.
    pub fn go_to(&mut self, page: usize) -> bool {
        match pagination::change_page(page, self.state.page, self.listing.total_pages) {
            Some(page) => {
                self.state.page = page;
                self.refresh();
                true
            }
            None => false,
        }
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.state.page + 1)
    }

    pub fn previous(&mut self) -> bool {
        self.go_to(self.state.page.saturating_sub(1))
    }

    pub fn first(&mut self) -> bool {
        self.go_to(1)
    }

    pub fn last(&mut self) -> bool {
        self.go_to(self.listing.total_pages)
    }

    /// Only sizes from [`PAGE_SIZE_OPTIONS`] are accepted.
    pub fn set_page_size(&mut self, size: usize) -> bool {
        if !self.use_page_size(size) {
            return false;
        }
        if let Err(err) = Preferences::save_page_size(self.service.storage_mut(), size) {
            warn!(error = %err, "page size preference not saved");
        }
        true
    }

    /// Same as [`set_page_size`](Self::set_page_size) without saving the preference.
    pub fn use_page_size(&mut self, size: usize) -> bool {
        if !PAGE_SIZE_OPTIONS.contains(&size) {
            debug!(size, "rejected page size");
            return false;
        }
        self.state.page_size = size;
        self.state.page = 1;
        self.refresh();
        true
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.state.view = view;
        if let Err(err) = Preferences::save_view(self.service.storage_mut(), view) {
            warn!(error = %err, "view preference not saved");
        }
    }

    /// Switches the language and drops fragments rendered in the old one.
    pub fn set_language(&mut self, locale: Locale) {
        self.translator.set_locale(locale);
        self.table_cache.clear();
        self.card_cache.clear();
        if let Err(err) = Preferences::save_language(self.service.storage_mut(), locale) {
            warn!(error = %err, "language preference not saved");
        }
    }

    /// Deletes `id` after the user confirmed. A second confirmation arriving
    /// inside the debounce window is ignored.
    pub fn confirm_delete(&mut self, id: Uuid, now: Instant) -> bool {
        if !self.guard.should_fire(DELETE_EVENT, now) {
            debug!(%id, "duplicate delete confirmation ignored");
            return false;
        }
        let deleted = match self.service.delete(id) {
            Ok(_) => {
                let message = self.translator.t("notifications.deleteSuccess");
                self.notifier.success(&message);
                true
            }
            Err(err) => {
                self.report_error(&err);
                false
            }
        };
        self.refresh();
        deleted
    }

    /// Form for `route`; `Ok(None)` when the route is not a form route.
    pub fn open_form(&self, route: &Route) -> ServiceResult<Option<FormView>> {
        FormView::for_route(route, &self.service)
    }

    pub fn submit(&mut self, form: &FormView, patch: EmployeeInput) -> FormOutcome {
        let outcome = form.submit(patch, &mut self.service, &self.translator, &mut self.notifier);
        if outcome.is_saved() {
            self.refresh();
        }
        outcome
    }

    /// Draws the current page in the active view.
    pub fn render(&mut self) -> String {
        let mut lines = vec![self.translator.t("employee.list.title")];

        if self.listing.filtered.is_empty() {
            match search::normalize(&self.state.search_term) {
                Some(_) => {
                    lines.push(format!(
                        "{} \"{}\"",
                        self.translator.t("employee.list.noSearchResultsFor"),
                        self.state.search_term.trim()
                    ));
                    lines.push(format!("({})", self.translator.t("employee.list.clearSearch")));
                }
                None => {
                    lines.push(self.translator.t("employee.list.emptyStateTitle"));
                    lines.push(self.translator.t("employee.list.emptyStateMessage"));
                }
            }
            return lines.join("\n");
        }

        match self.state.view {
            ViewMode::Table => {
                self.table_cache.sync(self.revision, &self.listing.displayed);
                lines.push(render::table_header(&self.translator));
                for record in &self.listing.displayed {
                    let row = self
                        .table_cache
                        .get_or_render(record, |e| render::table_row(e, &self.translator));
                    lines.push(row.clone());
                }
            }
            ViewMode::Card => {
                self.card_cache.sync(self.revision, &self.listing.displayed);
                for record in &self.listing.displayed {
                    let card = self
                        .card_cache
                        .get_or_render(record, |e| render::card(e, &self.translator));
                    lines.push(card.clone());
                }
            }
        }

        let entries = pagination::window(
            self.listing.effective_page,
            self.listing.total_pages,
            MAX_VISIBLE_PAGES,
        );
        lines.push(String::new());
        lines.push(render::page_bar(&entries, self.listing.effective_page));
        lines.push(render::page_caption(self.listing.page_info(), &self.translator));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::NaiveDate;
    use entity::employee::{Department, Position};
    use platform_store::{DEFAULT_SOFT_LIMIT, MemoryStore};
    use platform_ui::{Level, RecordingNotifier};

    const MS: Duration = Duration::from_millis(1);

    fn input(n: usize) -> EmployeeInput {
        EmployeeInput {
            id: None,
            first_name: Some(format!("Name{n}")),
            last_name: Some(if n % 3 == 0 { "Fizz".into() } else { "Plain".into() }),
            email: Some(format!("name{n}@example.com")),
            phone_code: Some("+(90)".into()),
            phone_number: Some("532 000 11 22".into()),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 5),
            date_of_employment: NaiveDate::from_ymd_opt(2022, 2, 2),
            department: Some(Department::Tech),
            position: Some(Position::Medior),
        }
    }

    fn controller(count: usize) -> ListController<MemoryStore, RecordingNotifier> {
        let storage = Storage::new(MemoryStore::new(), DEFAULT_SOFT_LIMIT);
        let mut service = EmployeeService::open(storage).unwrap();
        for n in 1..=count {
            service.create(input(n)).unwrap();
        }
        let translator = Translator::new(Locale::En).unwrap();
        ListController::new(service, translator, RecordingNotifier::new())
    }

    #[test]
    fn deleting_the_only_item_on_the_last_page_steps_back() {
        let mut list = controller(11);
        assert!(list.last());
        assert_eq!(list.state().page, 2);
        let only = list.listing().displayed[0].id;

        assert!(list.confirm_delete(only, Instant::now()));
        assert_eq!(list.state().page, 1);
        assert_eq!(list.listing().displayed.len(), 10);
        let shown = list.notifier().last().unwrap();
        assert_eq!(shown.level, Level::Success);
        assert_eq!(shown.message, "Employee deleted successfully");
    }

    #[test]
    fn repeated_delete_confirmation_is_ignored() {
        let mut list = controller(3);
        let ids: Vec<Uuid> = list.listing().displayed.iter().map(|e| e.id).collect();
        let now = Instant::now();
        assert!(list.confirm_delete(ids[0], now));
        assert!(!list.confirm_delete(ids[1], now + 100 * MS));
        assert_eq!(list.service().len(), 2);
        assert!(list.confirm_delete(ids[1], now + 400 * MS));
    }

    #[test]
    fn deleting_a_missing_record_reports_an_error() {
        let mut list = controller(1);
        assert!(!list.confirm_delete(Uuid::new_v4(), Instant::now()));
        let shown = list.notifier().last().unwrap();
        assert_eq!(shown.level, Level::Error);
        assert_eq!(shown.message, "Record not found");
    }

    #[test]
    fn typed_search_applies_after_the_pause() {
        let mut list = controller(30);
        let start = Instant::now();
        list.go_to(2);
        list.type_search("fi", start);
        list.type_search("fizz", start + 100 * MS);
        assert!(!list.poll(start + 350 * MS));
        assert!(list.poll(start + 400 * MS));
        assert_eq!(list.state().search_term, "fizz");
        assert_eq!(list.state().page, 1);
        assert_eq!(list.listing().filtered.len(), 10);
    }

    #[test]
    fn page_navigation_respects_bounds() {
        let mut list = controller(25);
        assert!(!list.previous());
        assert!(list.next());
        assert!(list.last());
        assert_eq!(list.state().page, 3);
        assert!(!list.next());
        assert!(!list.go_to(9));
        assert!(list.first());
    }

    #[test]
    fn page_size_is_restricted_and_persisted() {
        let mut list = controller(25);
        list.next();
        assert!(!list.set_page_size(7));
        assert!(list.set_page_size(20));
        assert_eq!(list.state().page, 1);
        assert_eq!(list.listing().total_pages, 2);

        list.set_view(ViewMode::Card);
        let prefs = Preferences::load(list.service().storage());
        assert_eq!(prefs.page_size, Some(20));
        assert_eq!(prefs.view, Some(ViewMode::Card));
    }

    #[test]
    fn one_off_page_size_is_not_saved() {
        let mut list = controller(25);
        assert!(!list.use_page_size(7));
        assert!(list.use_page_size(5));
        assert_eq!(list.state().page_size, 5);
        assert_eq!(list.listing().total_pages, 5);
        assert_eq!(Preferences::load(list.service().storage()).page_size, None);
    }

    #[test]
    fn invalid_stored_preferences_are_ignored() {
        let mut storage = Storage::new(MemoryStore::new(), DEFAULT_SOFT_LIMIT);
        storage.set(PAGE_SIZE_KEY, &13usize).unwrap();
        storage.set(VIEW_PREFERENCE_KEY, "mosaic").unwrap();
        storage.backend_mut().set_raw(LANGUAGE_KEY, "{not json".into()).unwrap();
        assert_eq!(Preferences::load(&storage), Preferences::default());

        let list = ListController::new(
            EmployeeService::open(storage).unwrap(),
            Translator::new(Locale::En).unwrap(),
            RecordingNotifier::new(),
        );
        assert_eq!(list.state().page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(list.state().view, ViewMode::Table);
    }

    #[test]
    fn render_shows_rows_bar_and_caption() {
        let mut list = controller(95);
        list.go_to(10);
        let screen = list.render();
        assert!(screen.starts_with("Employee List"));
        assert!(screen.contains("Name91 Plain"));
        assert!(screen.contains("« ‹ 1 … 6 7 8 9 [10] › »"));
        assert!(screen.ends_with("Showing 91-95 of 95 items"));
    }

    #[test]
    fn rerender_without_changes_hits_the_cache() {
        let mut list = controller(5);
        list.render();
        list.render();
        assert_eq!(list.table_cache().misses(), 5);
        assert_eq!(list.table_cache().hits(), 5);
        list.refresh();
        list.render();
        assert_eq!(list.table_cache().misses(), 10);
    }

    #[test]
    fn empty_states_depend_on_the_search() {
        let mut list = controller(0);
        assert!(list.render().contains("Add a new employee to get started"));
        let mut list = controller(2);
        list.set_search("nobody");
        assert!(list
            .render()
            .contains("No employees found matching your search for \"nobody\""));
    }

    #[test]
    fn language_switch_rerenders_in_the_new_language() {
        let mut list = controller(1);
        list.set_view(ViewMode::Card);
        assert!(list.render().contains("Department: Tech"));
        list.set_language(Locale::Tr);
        assert!(!list.render().contains("Department: Tech"));
        assert_eq!(
            Preferences::load(list.service().storage()).language,
            Some(Locale::Tr)
        );
    }
}
