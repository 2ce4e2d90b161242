//! Salary and vacancy aggregation over parsed job postings.
//!
//! Records flow through [`SalaryNormalizer`] into [`AggregationEngine`], and
//! [`rank::finalize`] turns the raw groups into the six ordered tables exposed by
//! [`VacancyStatistics`].

mod currency;
mod engine;
pub mod rank;
mod record;
mod tables;

pub use currency::{CurrencyRate, CurrencyTable, CurrencyTableError, SalaryNormalizer};
pub use engine::{Accumulator, AggregationEngine, RawAccumulators};
pub use record::{posted_year, VacancyRecord};
pub use tables::{AggregateTable, TableEntry, TableName, VacancyStatistics};

use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum StatisticsError {
    #[error("{}", describe_unknown_currency(.code, .title.as_deref(), .city.as_deref()))]
    UnknownCurrency {
        code: String,
        title: Option<String>,
        city: Option<String>,
    },
    #[error("publication date '{value}' does not start with a four-digit year")]
    MalformedDate { value: String },
    #[error("no vacancy records were supplied")]
    EmptyInput,
}

impl StatisticsError {
    /// Attaches the offending record to an `UnknownCurrency` failure.
    pub(crate) fn with_record(self, record: &VacancyRecord) -> Self {
        match self {
            StatisticsError::UnknownCurrency { code, .. } => StatisticsError::UnknownCurrency {
                code,
                title: Some(record.title.clone()),
                city: Some(record.city.clone()),
            },
            other => other,
        }
    }
}

fn describe_unknown_currency(code: &str, title: Option<&str>, city: Option<&str>) -> String {
    match (title, city) {
        (Some(title), Some(city)) => format!(
            "currency {code} has no conversion rate (vacancy '{title}' in {city})"
        ),
        _ => format!("currency {code} has no conversion rate"),
    }
}

impl VacancyStatistics {
    /// Runs normalization, accumulation, and finalization over `records`.
    ///
    /// An empty record set produces empty tables (plus the profession fallback);
    /// callers that must not render empty reports check
    /// [`VacancyStatistics::ensure_not_empty`].
    pub fn compute(
        records: &[VacancyRecord],
        profession: &str,
        currencies: &CurrencyTable,
    ) -> Result<Self, StatisticsError> {
        let engine = AggregationEngine::new(SalaryNormalizer::new(currencies));
        let raw = engine.accumulate(records, profession)?;
        let statistics = rank::finalize(raw, profession);

        info!(
            records = statistics.total_records(),
            profession,
            years = statistics.vacancies_by_year().len(),
            ranked_cities = statistics.salaries_by_city().len(),
            "computed vacancy statistics"
        );

        Ok(statistics)
    }

    pub fn ensure_not_empty(&self) -> Result<(), StatisticsError> {
        if self.total_records == 0 {
            Err(StatisticsError::EmptyInput)
        } else {
            Ok(())
        }
    }
}
