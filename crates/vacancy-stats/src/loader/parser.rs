use super::normalizer::clean_header;
use super::LoadError;
use crate::statistics::VacancyRecord;
use csv::StringRecord;
use serde::Deserialize;
use std::io::Read;
use tracing::debug;

#[derive(Debug, Default)]
pub(crate) struct ParsedRecords {
    pub(crate) records: Vec<VacancyRecord>,
    pub(crate) skipped: usize,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<ParsedRecords, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: StringRecord = csv_reader.headers()?.iter().map(clean_header).collect();
    csv_reader.set_headers(headers.clone());

    let mut parsed = ParsedRecords::default();
    for result in csv_reader.records() {
        let row = result?;
        if row.iter().any(str::is_empty) {
            parsed.skipped += 1;
            continue;
        }

        let line = row.position().map(|position| position.line()).unwrap_or(0);
        let vacancy: VacancyRow = row.deserialize(Some(&headers))?;
        let record = vacancy
            .into_record()
            .map_err(|source| LoadError::Record { line, source })?;
        parsed.records.push(record);
    }

    debug!(
        records = parsed.records.len(),
        skipped = parsed.skipped,
        "parsed vacancy rows"
    );

    Ok(parsed)
}

#[derive(Debug, Deserialize)]
struct VacancyRow {
    name: String,
    salary_from: f64,
    salary_to: f64,
    salary_currency: String,
    area_name: String,
    published_at: String,
}

impl VacancyRow {
    fn into_record(self) -> Result<VacancyRecord, crate::statistics::StatisticsError> {
        VacancyRecord::from_published_at(
            self.name,
            self.salary_from,
            self.salary_to,
            self.salary_currency,
            self.area_name,
            &self.published_at,
        )
    }
}
