use std::time::{Duration, Instant};

use anyhow::Result;
use entity::employee::Department;
use platform_store::DEFAULT_SOFT_LIMIT;
use platform_ui::{Level, Locale, RecordingNotifier, Route, Translator};
use products_hr::{
    EmployeeService, FormOutcome, ListController, Preferences, ViewMode, sample,
};
use rand::{SeedableRng, rngs::StdRng};
use suite_tests::{TempDataDir, employee_input, fixed_today};

type Controller = ListController<platform_store::FileStore, RecordingNotifier>;

fn controller(dir: &TempDataDir) -> Result<Controller> {
    let service = EmployeeService::open(dir.open(DEFAULT_SOFT_LIMIT))?.with_clock(fixed_today);
    Ok(ListController::new(
        service,
        Translator::new(Locale::En)?,
        RecordingNotifier::new(),
    ))
}

#[test]
fn ninety_five_records_fill_ten_pages() -> Result<()> {
    let dir = TempDataDir::new();
    let mut list = controller(&dir)?;
    for n in 1..=95 {
        list.service_mut().create(employee_input(n))?;
    }
    list.refresh();

    assert_eq!(list.listing().total_pages, 10);
    assert!(list.last());
    let names: Vec<&str> = list
        .listing()
        .displayed
        .iter()
        .map(|e| e.first_name.as_str())
        .collect();
    assert_eq!(names, ["Worker91", "Worker92", "Worker93", "Worker94", "Worker95"]);
    assert!(list.render().ends_with("Showing 91-95 of 95 items"));
    Ok(())
}

#[test]
fn seeded_directory_is_searchable() -> Result<()> {
    let dir = TempDataDir::new();
    let mut list = controller(&dir)?;
    let mut rng = StdRng::seed_from_u64(2024);
    let created = sample::seed(list.service_mut(), 55, fixed_today(), &mut rng)?;
    list.refresh();
    assert_eq!(created, 55);
    assert_eq!(list.listing().total_pages, 6);

    let start = Instant::now();
    list.type_search("ANALYTICS", start);
    assert!(list.poll(start + Duration::from_millis(300)));
    let expected = list
        .service()
        .records()
        .iter()
        .filter(|e| e.department == Department::Analytics)
        .count();
    assert_eq!(list.listing().filtered.len(), expected);
    assert_eq!(list.state().page, 1);
    Ok(())
}

#[test]
fn preferences_carry_over_to_the_next_session() -> Result<()> {
    let dir = TempDataDir::new();
    {
        let mut list = controller(&dir)?;
        assert!(list.set_page_size(5));
        list.set_view(ViewMode::Card);
        list.set_language(Locale::Tr);
    }

    let list = controller(&dir)?;
    assert_eq!(list.state().page_size, 5);
    assert_eq!(list.state().view, ViewMode::Card);
    assert_eq!(
        Preferences::load(list.service().storage()).language,
        Some(Locale::Tr)
    );
    Ok(())
}

#[test]
fn form_round_trip_through_routes() -> Result<()> {
    let dir = TempDataDir::new();
    let mut list = controller(&dir)?;

    let create = list.open_form(&Route::parse("/employee/new"))?.expect("create form");
    let created = match list.submit(&create, employee_input(1)) {
        FormOutcome::Created(record) => record,
        other => panic!("unexpected outcome {other:?}"),
    };
    assert_eq!(list.listing().filtered.len(), 1);

    let path = Route::Edit(created.id).path();
    let edit = list.open_form(&Route::parse(&path))?.expect("edit form");
    let outcome = list.submit(
        &edit,
        entity::employee::EmployeeInput {
            email: Some("moved@example.com".into()),
            ..Default::default()
        },
    );
    assert_eq!(outcome.record().map(|r| r.email.as_str()), Some("moved@example.com"));

    let messages: Vec<&str> = list
        .notifier()
        .entries()
        .iter()
        .map(|n| n.message.as_str())
        .collect();
    assert_eq!(
        messages,
        ["Employee created successfully", "Employee updated successfully"]
    );
    assert!(list.open_form(&Route::parse("/nowhere"))?.is_none());
    Ok(())
}

#[test]
fn quota_failures_surface_as_error_notifications() -> Result<()> {
    let dir = TempDataDir::new();
    let service = EmployeeService::open(dir.open(100))?.with_clock(fixed_today);
    let mut list = ListController::new(
        service,
        Translator::new(Locale::En)?,
        RecordingNotifier::new(),
    );

    let form = list.open_form(&Route::Create)?.expect("create form");
    let outcome = list.submit(&form, employee_input(1));
    assert!(!outcome.is_saved());
    assert!(list.listing().filtered.is_empty());

    let shown = list.notifier().last().expect("notification");
    assert_eq!(shown.level, Level::Error);
    assert_eq!(
        shown.message,
        "Failed to save changes: Storage quota exceeded. Cannot save additional data."
    );
    Ok(())
}
