//! Display helpers shared by the table and card renderers.

use chrono::NaiveDate;
use platform_ui::Locale;

pub const DEFAULT_TRUNCATE_LEN: usize = 20;
pub const DEFAULT_TRUNCATE_SUFFIX: &str = "...";

/// `MM/DD/YYYY` for English, `DD.MM.YYYY` for Turkish.
pub fn date(value: NaiveDate, locale: Locale) -> String {
    match locale {
        Locale::En => value.format("%m/%d/%Y").to_string(),
        Locale::Tr => value.format("%d.%m.%Y").to_string(),
    }
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// Cuts `text` to `max_chars` characters and appends `suffix` when anything
/// was dropped. Counts characters, not bytes.
pub fn truncate(text: &str, max_chars: usize, suffix: &str) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{suffix}", &text[..cut]),
        None => text.to_string(),
    }
}

/// [`truncate`] with the list view's defaults.
pub fn truncate_default(text: &str) -> String {
    truncate(text, DEFAULT_TRUNCATE_LEN, DEFAULT_TRUNCATE_SUFFIX)
}

pub fn phone(code: &str, number: &str) -> String {
    match (code.trim(), number.trim()) {
        ("", number) => number.to_string(),
        (code, "") => code.to_string(),
        (code, number) => format!("{code} {number}"),
    }
}
