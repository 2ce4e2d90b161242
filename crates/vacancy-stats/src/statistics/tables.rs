use serde::Serialize;
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

/// One `(key, value)` row of an aggregate table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableEntry<K, V> {
    pub key: K,
    pub value: V,
}

/// Ordered key/value table. Keys are unique and the order is the one imposed at
/// finalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregateTable<K, V> {
    entries: Vec<TableEntry<K, V>>,
}

impl<K, V> AggregateTable<K, V> {
    pub(crate) fn from_entries(entries: Vec<(K, V)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, value)| TableEntry { key, value })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[TableEntry<K, V>] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|entry| (&entry.key, &entry.value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|entry| &entry.key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|entry| &entry.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .find(|entry| <K as Borrow<Q>>::borrow(&entry.key) == key)
            .map(|entry| &entry.value)
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for AggregateTable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", entry.key, entry.value)?;
        }
        f.write_str("}")
    }
}

/// Stable identifiers of the six output tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    SalariesByYear,
    VacanciesByYear,
    SalariesByYearForProfession,
    VacanciesByYearForProfession,
    SalariesByCity,
    VacanciesByCity,
}

impl TableName {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::SalariesByYear,
            Self::VacanciesByYear,
            Self::SalariesByYearForProfession,
            Self::VacanciesByYearForProfession,
            Self::SalariesByCity,
            Self::VacanciesByCity,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SalariesByYear => "salaries_by_year",
            Self::VacanciesByYear => "vacancies_by_year",
            Self::SalariesByYearForProfession => "salaries_by_year_for_profession",
            Self::VacanciesByYearForProfession => "vacancies_by_year_for_profession",
            Self::SalariesByCity => "salaries_by_city",
            Self::VacanciesByCity => "vacancies_by_city",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SalariesByYear => "Salary level by year",
            Self::VacanciesByYear => "Vacancy count by year",
            Self::SalariesByYearForProfession => "Salary level by year for the selected profession",
            Self::VacanciesByYearForProfession => {
                "Vacancy count by year for the selected profession"
            }
            Self::SalariesByCity => "Salary level by city (descending)",
            Self::VacanciesByCity => "Vacancy share by city (descending)",
        }
    }
}

/// The six finalized tables of one statistics run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VacancyStatistics {
    pub(crate) profession: String,
    pub(crate) total_records: usize,
    pub(crate) profession_fallback_applied: bool,
    pub(crate) salaries_by_year: AggregateTable<i32, i64>,
    pub(crate) vacancies_by_year: AggregateTable<i32, u64>,
    pub(crate) salaries_by_year_for_profession: AggregateTable<i32, i64>,
    pub(crate) vacancies_by_year_for_profession: AggregateTable<i32, u64>,
    pub(crate) salaries_by_city: AggregateTable<String, i64>,
    pub(crate) vacancies_by_city: AggregateTable<String, f64>,
}

impl VacancyStatistics {
    pub fn profession(&self) -> &str {
        &self.profession
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }

    /// True when no title matched and the profession tables hold the `{2022: 0}`
    /// placeholder instead of real aggregates.
    pub fn profession_fallback_applied(&self) -> bool {
        self.profession_fallback_applied
    }

    pub fn salaries_by_year(&self) -> &AggregateTable<i32, i64> {
        &self.salaries_by_year
    }

    pub fn vacancies_by_year(&self) -> &AggregateTable<i32, u64> {
        &self.vacancies_by_year
    }

    pub fn salaries_by_year_for_profession(&self) -> &AggregateTable<i32, i64> {
        &self.salaries_by_year_for_profession
    }

    pub fn vacancies_by_year_for_profession(&self) -> &AggregateTable<i32, u64> {
        &self.vacancies_by_year_for_profession
    }

    pub fn salaries_by_city(&self) -> &AggregateTable<String, i64> {
        &self.salaries_by_city
    }

    pub fn vacancies_by_city(&self) -> &AggregateTable<String, f64> {
        &self.vacancies_by_city
    }

    pub fn salary_cities(&self) -> BTreeSet<&str> {
        self.salaries_by_city.keys().map(String::as_str).collect()
    }

    pub fn share_cities(&self) -> BTreeSet<&str> {
        self.vacancies_by_city.keys().map(String::as_str).collect()
    }

    /// The two city tables are truncated independently, so with more than ten
    /// qualifying cities they can name different cities.
    pub fn city_keys_aligned(&self) -> bool {
        self.salary_cities() == self.share_cities()
    }

    /// Renders one table as `{key: value, ...}`.
    pub fn table_line(&self, name: TableName) -> String {
        match name {
            TableName::SalariesByYear => self.salaries_by_year.to_string(),
            TableName::VacanciesByYear => self.vacancies_by_year.to_string(),
            TableName::SalariesByYearForProfession => {
                self.salaries_by_year_for_profession.to_string()
            }
            TableName::VacanciesByYearForProfession => {
                self.vacancies_by_year_for_profession.to_string()
            }
            TableName::SalariesByCity => quoted_keys(&self.salaries_by_city),
            TableName::VacanciesByCity => quoted_keys(&self.vacancies_by_city),
        }
    }
}

/// City lines quote their keys and print values in their `Debug` form, so a
/// share of one reads `1.0` rather than `1`.
fn quoted_keys<V: fmt::Debug>(table: &AggregateTable<String, V>) -> String {
    let body = table
        .iter()
        .map(|(city, value)| format!("'{city}': {value:?}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{body}}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_keeps_entry_order() {
        let table = AggregateTable::from_entries(vec![(2021, 7_u64), (2019, 3)]);
        assert_eq!(table.to_string(), "{2021: 7, 2019: 3}");
        assert_eq!(table.get(&2019), Some(&3));
        assert!(table.get(&2020).is_none());
    }

    #[test]
    fn serializes_as_key_value_rows() {
        let table = AggregateTable::from_entries(vec![("Moscow".to_string(), 0.25_f64)]);
        let json = serde_json::to_value(&table).expect("serializes");
        assert_eq!(json, serde_json::json!([{ "key": "Moscow", "value": 0.25 }]));
    }

    #[test]
    fn city_lines_keep_float_notation() {
        let stats = VacancyStatistics {
            profession: "Analyst".to_string(),
            total_records: 2,
            profession_fallback_applied: false,
            salaries_by_year: AggregateTable::from_entries(vec![(2020, 15)]),
            vacancies_by_year: AggregateTable::from_entries(vec![(2020, 2)]),
            salaries_by_year_for_profession: AggregateTable::from_entries(vec![(2020, 15)]),
            vacancies_by_year_for_profession: AggregateTable::from_entries(vec![(2020, 2)]),
            salaries_by_city: AggregateTable::from_entries(vec![("Omsk".to_string(), 15)]),
            vacancies_by_city: AggregateTable::from_entries(vec![("Omsk".to_string(), 1.0)]),
        };

        assert_eq!(stats.table_line(TableName::VacanciesByCity), "{'Omsk': 1.0}");
        assert_eq!(stats.table_line(TableName::SalariesByCity), "{'Omsk': 15}");
        assert_eq!(stats.table_line(TableName::SalariesByYear), "{2020: 15}");
    }

    #[test]
    fn table_names_are_stable() {
        let names: Vec<&str> = TableName::ordered().iter().map(|name| name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "salaries_by_year",
                "vacancies_by_year",
                "salaries_by_year_for_profession",
                "vacancies_by_year_for_profession",
                "salaries_by_city",
                "vacancies_by_city",
            ]
        );
    }
}
