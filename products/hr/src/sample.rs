//! Random demo records for an empty directory.

use chrono::{Datelike, Duration, NaiveDate};
use entity::employee::{Department, EmployeeInput, Position};
use platform_store::KeyValueStore;
use rand::{Rng, seq::SliceRandom};
use tracing::info;

use crate::{error::ServiceResult, service::EmployeeService};

pub const DEFAULT_COUNT: usize = 55;

const FIRST_NAMES: &[&str] = &[
    "Ahmet", "Mehmet", "Ayşe", "Fatma", "Ali", "Zeynep", "Mustafa", "Elif", "Emre", "Selin",
    "Burak", "Deniz", "Can", "Ece", "Murat", "Derya", "Kerem", "Gizem", "Onur", "Pınar",
];

const LAST_NAMES: &[&str] = &[
    "Yılmaz", "Kaya", "Demir", "Şahin", "Çelik", "Yıldız", "Aydın", "Öztürk", "Arslan", "Doğan",
    "Kılıç", "Aslan", "Koç", "Kurt", "Özdemir",
];

const DOMAINS: &[&str] = &["example.com", "company.com.tr", "mail.net", "corp.io"];

const ASCII_FOLD: &[(char, char)] = &[
    ('ç', 'c'),
    ('ğ', 'g'),
    ('ı', 'i'),
    ('ö', 'o'),
    ('ş', 's'),
    ('ü', 'u'),
];

/// Lower-cased, ASCII-only form of a name for use in an email local part.
fn email_part(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            ASCII_FOLD
                .iter()
                .find(|(from, _)| *from == c)
                .map_or(c, |(_, to)| *to)
        })
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

fn phone_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "5{:02} {:03} {:02} {:02}",
        rng.gen_range(0..100),
        rng.gen_range(0..1000),
        rng.gen_range(0..100),
        rng.gen_range(0..100),
    )
}

fn years_before(today: NaiveDate, years: i32) -> NaiveDate {
    let year = today.year() - years;
    today
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, today.month(), 28))
        .unwrap_or(today)
}

/// A random, complete record; `index` keeps the email unique.
pub fn employee<R: Rng + ?Sized>(index: usize, today: NaiveDate, rng: &mut R) -> EmployeeInput {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Ada");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Yılmaz");
    let domain = DOMAINS.choose(rng).copied().unwrap_or("example.com");

    let employed = today - Duration::days(rng.gen_range(0..=730));
    let oldest = years_before(today, 60);
    let youngest = years_before(today, 18);
    let span = (youngest - oldest).num_days().max(0);
    let born = oldest + Duration::days(rng.gen_range(0..=span));

    EmployeeInput {
        id: None,
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        email: Some(format!(
            "{}.{}{index}@{domain}",
            email_part(first),
            email_part(last)
        )),
        phone_code: Some("+(90)".to_string()),
        phone_number: Some(phone_number(rng)),
        date_of_birth: Some(born),
        date_of_employment: Some(employed),
        department: Department::ALL.choose(rng).copied(),
        position: Position::ALL.choose(rng).copied(),
    }
}

/// Fills an empty store with `count` random records and returns how many were
/// created. A store that already holds records is left alone.
pub fn seed<B, R>(
    service: &mut EmployeeService<B>,
    count: usize,
    today: NaiveDate,
    rng: &mut R,
) -> ServiceResult<usize>
where
    B: KeyValueStore,
    R: Rng + ?Sized,
{
    if !service.is_empty() {
        return Ok(0);
    }
    for index in 1..=count {
        service.create(employee(index, today, rng))?;
    }
    info!(count, "sample employees created");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform_store::{DEFAULT_SOFT_LIMIT, MemoryStore, Storage};
    use rand::{SeedableRng, rngs::StdRng};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn service() -> EmployeeService<MemoryStore> {
        EmployeeService::open(Storage::new(MemoryStore::new(), DEFAULT_SOFT_LIMIT))
            .unwrap()
            .with_clock(today)
    }

    #[test]
    fn seeds_only_an_empty_store() {
        let mut svc = service();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(seed(&mut svc, DEFAULT_COUNT, today(), &mut rng).unwrap(), 55);
        assert_eq!(svc.len(), 55);
        assert_eq!(seed(&mut svc, DEFAULT_COUNT, today(), &mut rng).unwrap(), 0);
        assert_eq!(svc.len(), 55);
    }

    #[test]
    fn generated_records_are_plausible() {
        let mut rng = StdRng::seed_from_u64(42);
        for index in 1..=200 {
            let input = employee(index, today(), &mut rng);
            let born = input.date_of_birth.unwrap();
            let employed = input.date_of_employment.unwrap();
            assert!(born <= years_before(today(), 18));
            assert!(born >= years_before(today(), 60));
            assert!(employed <= today() && employed >= today() - Duration::days(730));
            let email = input.email.as_deref().unwrap();
            assert!(email.is_ascii(), "{email}");
            assert!(crate::validation::is_valid_email(email), "{email}");
            assert!(crate::validation::is_valid_phone(input.phone_number.as_deref().unwrap()));
        }
    }

    #[test]
    fn names_fold_to_ascii() {
        assert_eq!(email_part("Şahin"), "sahin");
        assert_eq!(email_part("Pınar"), "pinar");
        assert_eq!(email_part("Öztürk"), "ozturk");
    }
}
