use std::{collections::HashMap, fmt, str::FromStr};

use serde_json::Value;
use thiserror::Error;

const EN_CATALOG: &str = include_str!("../locales/en.json");
const TR_CATALOG: &str = include_str!("../locales/tr.json");

#[derive(Debug, Error)]
pub enum I18nError {
    #[error("catalog for `{locale}` is not valid JSON: {source}")]
    Catalog {
        locale: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported language `{0}`")]
    Unsupported(String),
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Locale {
    #[default]
    En,
    Tr,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Tr];

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Tr => "tr",
        }
    }

    /// Native display name of the language.
    pub fn name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Tr => "Türkçe",
        }
    }

    fn catalog_source(self) -> &'static str {
        match self {
            Locale::En => EN_CATALOG,
            Locale::Tr => TR_CATALOG,
        }
    }

    /// Picks the saved preference first, then the language part of a
    /// `LANG`-style value (`tr_TR.UTF-8`), then English.
    pub fn detect(saved: Option<&str>, env_lang: Option<&str>) -> Locale {
        saved
            .and_then(|code| code.parse().ok())
            .or_else(|| {
                env_lang
                    .and_then(|lang| lang.split(['_', '-', '.']).next())
                    .and_then(|code| code.parse().ok())
            })
            .unwrap_or_default()
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Locale::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| I18nError::Unsupported(s.to_string()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Dot-notation message lookup with `{placeholder}` substitution.
///
/// Lookups fall back to the English catalog, then to the key itself.
#[derive(Clone, Debug)]
pub struct Translator {
    locale: Locale,
    catalogs: HashMap<Locale, Value>,
}

impl Translator {
    pub fn new(locale: Locale) -> Result<Self, I18nError> {
        let mut catalogs = HashMap::new();
        for candidate in Locale::ALL {
            let catalog = serde_json::from_str(candidate.catalog_source()).map_err(|source| {
                I18nError::Catalog {
                    locale: candidate.code(),
                    source,
                }
            })?;
            catalogs.insert(candidate, catalog);
        }
        Ok(Self { locale, catalogs })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    pub fn t(&self, key: &str) -> String {
        self.translate(key, &[])
    }

    pub fn translate(&self, key: &str, params: &[(&str, &dyn fmt::Display)]) -> String {
        let template = self
            .lookup(self.locale, key)
            .or_else(|| self.lookup(Locale::En, key))
            .unwrap_or(key);
        substitute(template, params)
    }

    pub fn has(&self, key: &str) -> bool {
        self.lookup(self.locale, key).is_some()
    }

    fn lookup(&self, locale: Locale, key: &str) -> Option<&str> {
        let mut node = self.catalogs.get(&locale)?;
        for part in key.split('.') {
            node = node.get(part)?;
        }
        node.as_str()
    }
}

/// Fills `{name}` placeholders in one pass; substituted values are not rescanned.
fn substitute(template: &str, params: &[(&str, &dyn fmt::Display)]) -> String {
    let mut text = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        text.push_str(&rest[..open]);
        let tail = &rest[open..];
        let value = tail[1..].find('}').and_then(|close| {
            let name = &tail[1..=close];
            params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close + 2, value.to_string()))
        });
        match value {
            Some((consumed, value)) => {
                text.push_str(&value);
                rest = &tail[consumed..];
            }
            None => {
                text.push('{');
                rest = &tail[1..];
            }
        }
    }
    text.push_str(rest);
    text
}

/// `(code, native name)` pairs for every bundled catalog.
pub fn available_languages() -> Vec<(&'static str, &'static str)> {
    Locale::ALL
        .into_iter()
        .map(|locale| (locale.code(), locale.name()))
        .collect()
}
