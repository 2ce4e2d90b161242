use crate::statistics::VacancyStatistics;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyStatsRow {
    pub year: i32,
    pub average_salary: i64,
    pub average_salary_for_profession: i64,
    pub vacancies: u64,
    pub vacancies_for_profession: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitySalaryRow {
    pub city: String,
    pub average_salary: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityShareRow {
    pub city: String,
    pub share: f64,
    pub share_label: String,
}

/// Flattened tables ready for the HTML, spreadsheet, and PDF renderers.
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsReport {
    pub profession: String,
    pub generated_at: String,
    pub total_records: usize,
    pub profession_fallback_applied: bool,
    pub city_keys_aligned: bool,
    pub yearly: Vec<YearlyStatsRow>,
    pub city_salaries: Vec<CitySalaryRow>,
    pub city_shares: Vec<CityShareRow>,
    /// Remainder of the pie chart not covered by the ranked cities.
    pub other_share: f64,
    pub other_share_label: String,
}

impl StatisticsReport {
    pub fn from_statistics(statistics: &VacancyStatistics) -> Self {
        let yearly = statistics
            .salaries_by_year()
            .iter()
            .map(|(year, salary)| YearlyStatsRow {
                year: *year,
                average_salary: *salary,
                average_salary_for_profession: statistics
                    .salaries_by_year_for_profession()
                    .get(year)
                    .copied()
                    .unwrap_or(0),
                vacancies: statistics.vacancies_by_year().get(year).copied().unwrap_or(0),
                vacancies_for_profession: statistics
                    .vacancies_by_year_for_profession()
                    .get(year)
                    .copied()
                    .unwrap_or(0),
            })
            .collect();

        let city_salaries = statistics
            .salaries_by_city()
            .iter()
            .map(|(city, salary)| CitySalaryRow {
                city: city.clone(),
                average_salary: *salary,
            })
            .collect();

        let city_shares: Vec<CityShareRow> = statistics
            .vacancies_by_city()
            .iter()
            .map(|(city, share)| CityShareRow {
                city: city.clone(),
                share: *share,
                share_label: percent_label(*share),
            })
            .collect();

        let covered: f64 = city_shares.iter().map(|row| row.share).sum();
        let other_share = (1.0 - covered).max(0.0);

        Self {
            profession: statistics.profession().to_string(),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
            total_records: statistics.total_records(),
            profession_fallback_applied: statistics.profession_fallback_applied(),
            city_keys_aligned: statistics.city_keys_aligned(),
            yearly,
            city_salaries,
            city_shares,
            other_share,
            other_share_label: percent_label(other_share),
        }
    }
}

/// Formats a fraction as a percentage with two decimals, e.g. `0.1234` -> `12.34%`.
pub fn percent_label(share: f64) -> String {
    format!("{:.2}%", share * 100.0)
}
