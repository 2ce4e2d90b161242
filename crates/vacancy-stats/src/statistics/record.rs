use serde::{Deserialize, Serialize};

use super::StatisticsError;

/// One parsed job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VacancyRecord {
    pub title: String,
    pub salary_low: f64,
    pub salary_high: f64,
    pub currency_code: String,
    pub city: String,
    pub posted_year: i32,
}

impl VacancyRecord {
    /// Builds a record, deriving `posted_year` from the publication timestamp.
    pub fn from_published_at(
        title: impl Into<String>,
        salary_low: f64,
        salary_high: f64,
        currency_code: impl Into<String>,
        city: impl Into<String>,
        published_at: &str,
    ) -> Result<Self, StatisticsError> {
        Ok(Self {
            title: title.into(),
            salary_low,
            salary_high,
            currency_code: currency_code.into(),
            city: city.into(),
            posted_year: posted_year(published_at)?,
        })
    }
}

/// Parses the year from the first four characters of a publication date such as
/// `2022-07-05T18:19:30+0300`.
pub fn posted_year(published_at: &str) -> Result<i32, StatisticsError> {
    published_at
        .get(0..4)
        .and_then(|prefix| prefix.parse::<i32>().ok())
        .ok_or_else(|| StatisticsError::MalformedDate {
            value: published_at.to_string(),
        })
}
