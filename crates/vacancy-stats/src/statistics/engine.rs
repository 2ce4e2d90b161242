use std::collections::HashMap;
use tracing::debug;

use super::currency::SalaryNormalizer;
use super::record::VacancyRecord;
use super::StatisticsError;

/// Running salary sum and posting count for one grouping key.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Accumulator {
    pub salary_sum: f64,
    pub count: u64,
}

impl Accumulator {
    fn add(&mut self, amount: f64) {
        self.salary_sum += amount;
        self.count += 1;
    }

    /// Mean of the per-posting `(low + high) / 2`, truncated toward zero.
    pub fn mean_salary(&self) -> i64 {
        if self.count == 0 {
            return 0;
        }
        (self.salary_sum / (self.count as f64 * 2.0)).trunc() as i64
    }
}

/// Unordered per-key accumulators produced by one pass over the records.
#[derive(Debug, Default, Clone)]
pub struct RawAccumulators {
    pub by_year: HashMap<i32, Accumulator>,
    pub by_year_for_profession: HashMap<i32, Accumulator>,
    pub by_city: HashMap<String, Accumulator>,
    pub total_records: usize,
}

/// Groups normalized salaries by year, by year for profession matches, and by city.
#[derive(Debug, Clone, Copy)]
pub struct AggregationEngine<'a> {
    normalizer: SalaryNormalizer<'a>,
}

impl<'a> AggregationEngine<'a> {
    pub fn new(normalizer: SalaryNormalizer<'a>) -> Self {
        Self { normalizer }
    }

    /// Accumulates every record. The profession filter is a case-sensitive substring
    /// match against the title.
    pub fn accumulate(
        &self,
        records: &[VacancyRecord],
        profession: &str,
    ) -> Result<RawAccumulators, StatisticsError> {
        let mut raw = RawAccumulators {
            total_records: records.len(),
            ..RawAccumulators::default()
        };

        for record in records {
            let amount = self
                .normalizer
                .normalize(record.salary_low, record.salary_high, &record.currency_code)
                .map_err(|err| err.with_record(record))?;

            raw.by_year.entry(record.posted_year).or_default().add(amount);

            if record.title.contains(profession) {
                raw.by_year_for_profession
                    .entry(record.posted_year)
                    .or_default()
                    .add(amount);
            }

            match raw.by_city.get_mut(record.city.as_str()) {
                Some(accumulator) => accumulator.add(amount),
                None => {
                    let mut accumulator = Accumulator::default();
                    accumulator.add(amount);
                    raw.by_city.insert(record.city.clone(), accumulator);
                }
            }
        }

        debug!(
            records = raw.total_records,
            years = raw.by_year.len(),
            profession_years = raw.by_year_for_profession.len(),
            cities = raw.by_city.len(),
            "accumulated vacancy records"
        );

        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::CurrencyTable;

    fn record(
        title: &str,
        low: f64,
        high: f64,
        currency: &str,
        city: &str,
        year: i32,
    ) -> VacancyRecord {
        VacancyRecord {
            title: title.to_string(),
            salary_low: low,
            salary_high: high,
            currency_code: currency.to_string(),
            city: city.to_string(),
            posted_year: year,
        }
    }

    #[test]
    fn accumulates_year_profession_and_city_groups() {
        let table = CurrencyTable::standard();
        let engine = AggregationEngine::new(SalaryNormalizer::new(&table));
        let records = vec![
            record("Rust developer", 100.0, 200.0, "RUR", "Moscow", 2020),
            record("Java developer", 10.0, 20.0, "USD", "Moscow", 2020),
            record("Senior Rust developer", 300.0, 300.0, "RUR", "Kazan", 2021),
        ];

        let raw = engine.accumulate(&records, "Rust").expect("accumulates");

        assert_eq!(raw.total_records, 3);
        let year_2020 = raw.by_year[&2020];
        assert_eq!(year_2020.count, 2);
        assert!((year_2020.salary_sum - (300.0 + 30.0 * 60.66)).abs() < 1e-9);
        assert_eq!(raw.by_year_for_profession[&2020].count, 1);
        assert_eq!(raw.by_year_for_profession[&2021].salary_sum, 600.0);
        assert_eq!(raw.by_city["Moscow"].count, 2);
        assert_eq!(raw.by_city["Kazan"].count, 1);
    }

    #[test]
    fn profession_match_is_case_sensitive_substring() {
        let table = CurrencyTable::standard();
        let engine = AggregationEngine::new(SalaryNormalizer::new(&table));
        let records = vec![
            record("rust developer", 1.0, 1.0, "RUR", "Omsk", 2020),
            record("Trusted Advisor", 1.0, 1.0, "RUR", "Omsk", 2020),
        ];

        let raw = engine.accumulate(&records, "Rust").expect("accumulates");
        assert!(raw.by_year_for_profession.is_empty());

        let raw = engine.accumulate(&records, "rust").expect("accumulates");
        assert_eq!(raw.by_year_for_profession[&2020].count, 2);
    }

    #[test]
    fn unknown_currency_reports_offending_record() {
        let table = CurrencyTable::standard();
        let engine = AggregationEngine::new(SalaryNormalizer::new(&table));
        let records = vec![
            record("Analyst", 1.0, 2.0, "RUR", "Omsk", 2020),
            record("Designer", 1.0, 2.0, "GBP", "London", 2020),
        ];

        match engine.accumulate(&records, "Analyst") {
            Err(StatisticsError::UnknownCurrency { code, title, city }) => {
                assert_eq!(code, "GBP");
                assert_eq!(title.as_deref(), Some("Designer"));
                assert_eq!(city.as_deref(), Some("London"));
            }
            other => panic!("expected unknown currency, got {other:?}"),
        }
    }

    #[test]
    fn mean_truncates_toward_zero() {
        let accumulator = Accumulator {
            salary_sum: 399.0,
            count: 2,
        };
        assert_eq!(accumulator.mean_salary(), 99);
        assert_eq!(Accumulator::default().mean_salary(), 0);
    }
}
