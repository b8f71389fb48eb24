//! Plain-text fragments for the terminal list view.
//!
//! Row and card fragments depend only on the record and the active language,
//! which is what lets [`crate::ViewCache`] reuse them between renders.

use entity::employee;
use platform_ui::Translator;

use crate::{
    format,
    pagination::{PageEntry, PageInfo},
};

const NAME_WIDTH: usize = 24;
const DATE_WIDTH: usize = 12;
const PHONE_WIDTH: usize = 20;
const EMAIL_WIDTH: usize = 24;
const LABEL_WIDTH: usize = 12;

fn cell(text: &str, width: usize) -> String {
    let clipped = format::truncate(text, width.saturating_sub(1), "");
    format!("{clipped:<width$}")
}

pub fn table_header(translator: &Translator) -> String {
    [
        cell(&translator.t("employee.fields.firstName"), NAME_WIDTH),
        cell(&translator.t("employee.fields.dateOfEmployment"), DATE_WIDTH),
        cell(&translator.t("employee.fields.dateOfBirth"), DATE_WIDTH),
        cell(&translator.t("employee.fields.phone"), PHONE_WIDTH),
        cell(&translator.t("employee.fields.email"), EMAIL_WIDTH),
        cell(&translator.t("employee.fields.department"), LABEL_WIDTH),
        cell(&translator.t("employee.fields.position"), LABEL_WIDTH),
        translator.t("actions.label"),
    ]
    .concat()
}

pub fn table_row(employee: &employee::Model, translator: &Translator) -> String {
    let locale = translator.locale();
    [
        cell(&employee.full_name(), NAME_WIDTH),
        cell(&format::date(employee.date_of_employment, locale), DATE_WIDTH),
        cell(&format::date(employee.date_of_birth, locale), DATE_WIDTH),
        cell(
            &format::phone(&employee.phone_code, &employee.phone_number),
            PHONE_WIDTH,
        ),
        cell(&format::truncate_default(&employee.email), EMAIL_WIDTH),
        cell(&translator.t(&employee.department.i18n_key()), LABEL_WIDTH),
        cell(&translator.t(&employee.position.i18n_key()), LABEL_WIDTH),
        employee.id.simple().to_string(),
    ]
    .concat()
}

pub fn card(employee: &employee::Model, translator: &Translator) -> String {
    let locale = translator.locale();
    let line = |key: &str, value: String| format!("│ {}: {value}\n", translator.t(key));

    let mut out = format!("┌ {}\n", employee.full_name());
    out.push_str(&line(
        "employee.fields.dateOfEmployment",
        format::date(employee.date_of_employment, locale),
    ));
    out.push_str(&line(
        "employee.fields.dateOfBirth",
        format::date(employee.date_of_birth, locale),
    ));
    out.push_str(&line(
        "employee.fields.phone",
        format::phone(&employee.phone_code, &employee.phone_number),
    ));
    out.push_str(&line("employee.fields.email", employee.email.clone()));
    out.push_str(&line(
        "employee.fields.department",
        translator.t(&employee.department.i18n_key()),
    ));
    out.push_str(&line(
        "employee.fields.position",
        translator.t(&employee.position.i18n_key()),
    ));
    out.push_str(&format!("└ {}", employee.id));
    out
}

/// `« ‹ 1 … 4 [5] 6 … 10 › »`; the current page is bracketed.
pub fn page_bar(entries: &[PageEntry], current: usize) -> String {
    let mut parts = vec!["«".to_string(), "‹".to_string()];
    parts.extend(entries.iter().map(|entry| match entry {
        PageEntry::Page(page) if *page == current => format!("[{page}]"),
        PageEntry::Page(page) => page.to_string(),
        PageEntry::Ellipsis => "…".to_string(),
    }));
    parts.push("›".to_string());
    parts.push("»".to_string());
    parts.join(" ")
}

pub fn page_caption(info: PageInfo, translator: &Translator) -> String {
    translator.translate(
        "employee.list.pagination",
        &[("start", &info.start), ("end", &info.end), ("total", &info.total)],
    )
}
