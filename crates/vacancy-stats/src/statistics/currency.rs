use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use super::StatisticsError;

/// Rate entry for one currency code.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyRate {
    pub name: String,
    pub rate: f64,
}

/// Immutable conversion table from currency code to the common unit (roubles).
#[derive(Debug, Clone)]
pub struct CurrencyTable {
    rates: HashMap<String, CurrencyRate>,
}

#[derive(Debug, thiserror::Error)]
pub enum CurrencyTableError {
    #[error("failed to read currency rates: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid currency rate data: {0}")]
    Csv(#[from] csv::Error),
    #[error("currency {code} has invalid rate {rate}; rates must be finite and positive")]
    InvalidRate { code: String, rate: f64 },
    #[error("currency {0} is listed more than once")]
    DuplicateCode(String),
}

impl CurrencyTable {
    /// The fixed ten-code table used when no override is configured.
    pub fn standard() -> Self {
        const STANDARD_RATES: &[(&str, &str, f64)] = &[
            ("AZN", "Azerbaijani manat", 35.68),
            ("BYR", "Belarusian ruble", 23.91),
            ("EUR", "Euro", 59.90),
            ("GEL", "Georgian lari", 21.74),
            ("KGS", "Kyrgyz som", 0.76),
            ("KZT", "Kazakhstani tenge", 0.13),
            ("RUR", "Russian ruble", 1.00),
            ("UAH", "Ukrainian hryvnia", 1.64),
            ("USD", "US dollar", 60.66),
            ("UZS", "Uzbekistani som", 0.0055),
        ];

        let rates = STANDARD_RATES
            .iter()
            .map(|(code, name, rate)| {
                (
                    code.to_string(),
                    CurrencyRate {
                        name: name.to_string(),
                        rate: *rate,
                    },
                )
            })
            .collect();

        Self { rates }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CurrencyTableError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads a `code,rate[,name]` table with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CurrencyTableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut rates = HashMap::new();

        for row in csv_reader.deserialize::<RateRow>() {
            let row = row?;
            let code = row.code.to_ascii_uppercase();
            if !row.rate.is_finite() || row.rate <= 0.0 {
                return Err(CurrencyTableError::InvalidRate {
                    code,
                    rate: row.rate,
                });
            }

            let name = row
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| code.clone());
            if rates
                .insert(code.clone(), CurrencyRate { name, rate: row.rate })
                .is_some()
            {
                return Err(CurrencyTableError::DuplicateCode(code));
            }
        }

        Ok(Self { rates })
    }

    pub fn get(&self, code: &str) -> Option<&CurrencyRate> {
        self.rates.get(code)
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.get(code).map(|entry| entry.rate)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Codes in ascending order.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.rates.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

#[derive(Debug, Deserialize)]
struct RateRow {
    code: String,
    rate: f64,
    #[serde(default)]
    name: Option<String>,
}

/// Converts raw salary bounds into a common-unit amount.
///
/// The amount is `(low + high) * rate`, the sum of both bounds. Averaging happens at
/// finalization, which divides by `count * 2`.
#[derive(Debug, Clone, Copy)]
pub struct SalaryNormalizer<'a> {
    currencies: &'a CurrencyTable,
}

impl<'a> SalaryNormalizer<'a> {
    pub fn new(currencies: &'a CurrencyTable) -> Self {
        Self { currencies }
    }

    pub fn normalize(
        &self,
        salary_low: f64,
        salary_high: f64,
        currency_code: &str,
    ) -> Result<f64, StatisticsError> {
        let rate = self
            .currencies
            .rate(currency_code)
            .ok_or_else(|| StatisticsError::UnknownCurrency {
                code: currency_code.to_string(),
                title: None,
                city: None,
            })?;

        Ok((salary_low + salary_high) * rate)
    }
}
