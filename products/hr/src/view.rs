use std::{collections::HashMap, fmt, str::FromStr};

use entity::employee;
use thiserror::Error;
use tracing::trace;
use uuid::Uuid;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ViewMode {
    #[default]
    Table,
    Card,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Table => "table",
            ViewMode::Card => "card",
        }
    }

    pub fn i18n_key(self) -> &'static str {
        match self {
            ViewMode::Table => "employee.list.view.table",
            ViewMode::Card => "employee.list.view.card",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown view `{0}` (expected `table` or `card`)")]
pub struct UnknownView(String);

impl FromStr for ViewMode {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(ViewMode::Table),
            "card" | "cards" => Ok(ViewMode::Card),
            _ => Err(UnknownView(s.to_string())),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a collection as far as the cache cares.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Fingerprint {
    revision: u64,
    len: usize,
    first: Option<Uuid>,
    last: Option<Uuid>,
}

impl Fingerprint {
    fn of(revision: u64, records: &[employee::Model]) -> Self {
        Self {
            revision,
            len: records.len(),
            first: records.first().map(|record| record.id),
            last: records.last().map(|record| record.id),
        }
    }
}

/// Rendered fragments keyed by record id.
///
/// Any structural change to the source collection (new revision, different
/// length, different boundary ids) clears the whole cache; entries are never
/// invalidated one by one.
#[derive(Debug)]
pub struct ViewCache<F> {
    fingerprint: Option<Fingerprint>,
    fragments: HashMap<Uuid, F>,
    hits: u64,
    misses: u64,
}

impl<F> Default for ViewCache<F> {
    fn default() -> Self {
        Self {
            fingerprint: None,
            fragments: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }
}

impl<F> ViewCache<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compares `records` against the last synced collection. Returns `true`
    /// when the cache was cleared.
    pub fn sync(&mut self, revision: u64, records: &[employee::Model]) -> bool {
        let next = Fingerprint::of(revision, records);
        if self.fingerprint.as_ref() == Some(&next) {
            return false;
        }
        trace!(revision, len = next.len, dropped = self.fragments.len(), "view cache invalidated");
        self.fragments.clear();
        self.fingerprint = Some(next);
        true
    }

    pub fn get_or_render(
        &mut self,
        record: &employee::Model,
        render: impl FnOnce(&employee::Model) -> F,
    ) -> &F {
        if self.fragments.contains_key(&record.id) {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        self.fragments
            .entry(record.id)
            .or_insert_with(|| render(record))
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
        self.fingerprint = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use entity::employee::{Department, Position};

    fn record(name: &str) -> employee::Model {
        employee::Model {
            id: Uuid::new_v4(),
            first_name: name.into(),
            last_name: "Cache".into(),
            email: format!("{name}@example.com"),
            phone_code: "+(90)".into(),
            phone_number: "532 000 00 00".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            date_of_employment: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            department: Department::Analytics,
            position: Position::Junior,
        }
    }

    fn render_all(cache: &mut ViewCache<String>, records: &[employee::Model]) {
        for r in records {
            cache.get_or_render(r, |e| e.first_name.clone());
        }
    }

    #[test]
    fn unchanged_collection_reuses_fragments() {
        let records = vec![record("a"), record("b")];
        let mut cache = ViewCache::new();
        assert!(cache.sync(1, &records));
        render_all(&mut cache, &records);
        assert!(!cache.sync(1, &records));
        render_all(&mut cache, &records);
        assert_eq!((cache.hits(), cache.misses()), (2, 2));
    }

    #[test]
    fn structural_changes_clear_everything() {
        let mut records = vec![record("a"), record("b")];
        let mut cache = ViewCache::new();
        cache.sync(1, &records);
        render_all(&mut cache, &records);

        records.push(record("c"));
        assert!(cache.sync(1, &records));
        assert!(cache.is_empty());

        render_all(&mut cache, &records);
        records.swap(0, 2);
        assert!(cache.sync(1, &records));

        render_all(&mut cache, &records);
        assert!(cache.sync(2, &records));
        assert!(cache.is_empty());
    }

    #[test]
    fn view_modes_parse() {
        assert_eq!("Card".parse::<ViewMode>().unwrap(), ViewMode::Card);
        assert!("grid".parse::<ViewMode>().is_err());
    }
}
