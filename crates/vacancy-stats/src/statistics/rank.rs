use std::collections::HashMap;
use tracing::{debug, info};

use super::engine::{Accumulator, RawAccumulators};
use super::tables::{AggregateTable, VacancyStatistics};

/// Year reported with zero values when no title matches the profession filter.
pub const PROFESSION_FALLBACK_YEAR: i32 = 2022;
/// A city needs at least `total / CITY_SHARE_DIVISOR` postings (1%) to be ranked.
pub const CITY_SHARE_DIVISOR: f64 = 100.0;
/// Length of each ranked city table.
pub const TOP_CITIES: usize = 10;

/// Decimal places kept in a city share.
const SHARE_DECIMALS: usize = 4;

/// Turns raw accumulators into the six ordered tables.
pub fn finalize(raw: RawAccumulators, profession: &str) -> VacancyStatistics {
    let RawAccumulators {
        by_year,
        by_year_for_profession,
        by_city,
        total_records,
    } = raw;

    let (salaries_by_year, vacancies_by_year) = year_tables(&by_year);

    let profession_fallback_applied = by_year_for_profession.is_empty();
    let (salaries_by_year_for_profession, vacancies_by_year_for_profession) =
        if profession_fallback_applied {
            info!(
                profession,
                fallback_year = PROFESSION_FALLBACK_YEAR,
                "no titles matched the profession filter"
            );
            (
                AggregateTable::from_entries(vec![(PROFESSION_FALLBACK_YEAR, 0)]),
                AggregateTable::from_entries(vec![(PROFESSION_FALLBACK_YEAR, 0)]),
            )
        } else {
            year_tables(&by_year_for_profession)
        };

    let (salaries_by_city, vacancies_by_city) = city_tables(&by_city, total_records);

    VacancyStatistics {
        profession: profession.to_string(),
        total_records,
        profession_fallback_applied,
        salaries_by_year,
        vacancies_by_year,
        salaries_by_year_for_profession,
        vacancies_by_year_for_profession,
        salaries_by_city,
        vacancies_by_city,
    }
}

fn year_tables(
    groups: &HashMap<i32, Accumulator>,
) -> (AggregateTable<i32, i64>, AggregateTable<i32, u64>) {
    let mut years: Vec<(&i32, &Accumulator)> = groups.iter().collect();
    years.sort_unstable_by_key(|(year, _)| **year);

    let salaries = years
        .iter()
        .map(|(year, accumulator)| (**year, accumulator.mean_salary()))
        .collect();
    let counts = years
        .iter()
        .map(|(year, accumulator)| (**year, accumulator.count))
        .collect();

    (
        AggregateTable::from_entries(salaries),
        AggregateTable::from_entries(counts),
    )
}

/// Filters cities below the representation threshold, then ranks salaries and
/// shares independently. Ties fall back to ascending city name.
fn city_tables(
    groups: &HashMap<String, Accumulator>,
    total_records: usize,
) -> (AggregateTable<String, i64>, AggregateTable<String, f64>) {
    if total_records == 0 {
        return (
            AggregateTable::from_entries(Vec::new()),
            AggregateTable::from_entries(Vec::new()),
        );
    }

    let total = total_records as f64;
    let minimum_count = total / CITY_SHARE_DIVISOR;
    let qualifying: Vec<(&String, &Accumulator)> = groups
        .iter()
        .filter(|(_, accumulator)| accumulator.count as f64 >= minimum_count)
        .collect();

    debug!(
        cities = groups.len(),
        qualifying = qualifying.len(),
        minimum_count,
        "applied city representation threshold"
    );

    let mut salaries: Vec<(String, i64)> = qualifying
        .iter()
        .map(|(city, accumulator)| ((*city).clone(), accumulator.mean_salary()))
        .collect();
    salaries.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(&right.0)));
    salaries.truncate(TOP_CITIES);

    let mut counts: Vec<(String, u64)> = qualifying
        .iter()
        .map(|(city, accumulator)| ((*city).clone(), accumulator.count))
        .collect();
    counts.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(&right.0)));
    counts.truncate(TOP_CITIES);

    let shares = counts
        .into_iter()
        .map(|(city, count)| (city, round_share(count as f64 / total)))
        .collect();

    (
        AggregateTable::from_entries(salaries),
        AggregateTable::from_entries(shares),
    )
}

/// Rounds to four decimals from the exact binary value, ties to even. Scaling by
/// 10 000 first would round `0.03125` up to `0.0313`.
fn round_share(share: f64) -> f64 {
    format!("{share:.prec$}", prec = SHARE_DECIMALS)
        .parse()
        .unwrap_or(share)
}
