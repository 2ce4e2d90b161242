use super::views::StatisticsReport;
use super::RenderError;
use rust_xlsxwriter::{Format, FormatBorder, Workbook, Worksheet};
use std::path::Path;

pub const YEARLY_SHEET: &str = "Yearly statistics";
pub const CITY_SHEET: &str = "City statistics";

/// One cell of a report sheet before styling.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetCell {
    Text(String),
    Number(f64),
    Percent(f64),
    /// Unstyled separator cell.
    Blank,
}

/// Rows of one sheet; the first row is the header.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub name: &'static str,
    pub rows: Vec<Vec<SheetCell>>,
}

/// Spreadsheet export: one workbook with a yearly sheet and a city sheet, bold
/// bordered headers, and percentage formatting on the share column.
pub struct WorkbookExporter;

impl WorkbookExporter {
    pub fn layouts(report: &StatisticsReport) -> [SheetLayout; 2] {
        [yearly_layout(report), city_layout(report)]
    }

    pub fn build(report: &StatisticsReport) -> Result<Workbook, RenderError> {
        let header = Format::new().set_bold().set_border(FormatBorder::Thin);
        let cell = Format::new().set_border(FormatBorder::Thin);
        let percent = Format::new()
            .set_border(FormatBorder::Thin)
            .set_num_format("0.00%");

        let mut workbook = Workbook::new();
        for layout in Self::layouts(report) {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(layout.name)?;
            write_layout(worksheet, &layout, &header, &cell, &percent)?;
            worksheet.autofit();
        }

        Ok(workbook)
    }

    pub fn save(report: &StatisticsReport, path: &Path) -> Result<(), RenderError> {
        let mut workbook = Self::build(report)?;
        workbook.save(path)?;
        Ok(())
    }
}

fn write_layout(
    worksheet: &mut Worksheet,
    layout: &SheetLayout,
    header: &Format,
    cell: &Format,
    percent: &Format,
) -> Result<(), RenderError> {
    for (row_index, row) in layout.rows.iter().enumerate() {
        let row_number = u32::try_from(row_index).unwrap_or(u32::MAX);
        for (col_index, value) in row.iter().enumerate() {
            let col = u16::try_from(col_index).unwrap_or(u16::MAX);
            match value {
                SheetCell::Text(text) if row_index == 0 => {
                    worksheet.write_string_with_format(row_number, col, text, header)?;
                }
                SheetCell::Text(text) => {
                    worksheet.write_string_with_format(row_number, col, text, cell)?;
                }
                SheetCell::Number(number) => {
                    worksheet.write_number_with_format(row_number, col, *number, cell)?;
                }
                SheetCell::Percent(share) => {
                    worksheet.write_number_with_format(row_number, col, *share, percent)?;
                }
                SheetCell::Blank => {}
            }
        }
    }
    Ok(())
}

fn text(value: impl Into<String>) -> SheetCell {
    SheetCell::Text(value.into())
}

fn yearly_layout(report: &StatisticsReport) -> SheetLayout {
    let profession = &report.profession;
    let mut rows = vec![vec![
        text("Year"),
        text("Average salary"),
        text(format!("Average salary - {profession}")),
        text("Vacancies"),
        text(format!("Vacancies - {profession}")),
    ]];

    rows.extend(report.yearly.iter().map(|row| {
        vec![
            SheetCell::Number(f64::from(row.year)),
            SheetCell::Number(row.average_salary as f64),
            SheetCell::Number(row.average_salary_for_profession as f64),
            SheetCell::Number(row.vacancies as f64),
            SheetCell::Number(row.vacancies_for_profession as f64),
        ]
    }));

    SheetLayout {
        name: YEARLY_SHEET,
        rows,
    }
}

/// Salary and share blocks sit side by side and are listed independently, so a
/// row may pair two different cities.
fn city_layout(report: &StatisticsReport) -> SheetLayout {
    let mut rows = vec![vec![
        text("City"),
        text("Salary level"),
        SheetCell::Blank,
        text("City"),
        text("Vacancy share"),
    ]];

    let height = report.city_salaries.len().max(report.city_shares.len());
    for index in 0..height {
        let mut row = match report.city_salaries.get(index) {
            Some(salary) => vec![
                text(salary.city.clone()),
                SheetCell::Number(salary.average_salary as f64),
            ],
            None => vec![SheetCell::Blank, SheetCell::Blank],
        };
        row.push(SheetCell::Blank);
        match report.city_shares.get(index) {
            Some(share) => {
                row.push(text(share.city.clone()));
                row.push(SheetCell::Percent(share.share));
            }
            None => row.extend([SheetCell::Blank, SheetCell::Blank]),
        }
        rows.push(row);
    }

    SheetLayout {
        name: CITY_SHEET,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::views::{CitySalaryRow, CityShareRow, YearlyStatsRow};

    fn report() -> StatisticsReport {
        StatisticsReport {
            profession: "Analyst".to_string(),
            generated_at: "2024-01-01 00:00".to_string(),
            total_records: 4,
            profession_fallback_applied: false,
            city_keys_aligned: false,
            yearly: vec![YearlyStatsRow {
                year: 2021,
                average_salary: 120,
                average_salary_for_profession: 150,
                vacancies: 4,
                vacancies_for_profession: 1,
            }],
            city_salaries: vec![CitySalaryRow {
                city: "Kazan".to_string(),
                average_salary: 150,
            }],
            city_shares: vec![
                CityShareRow {
                    city: "Moscow".to_string(),
                    share: 0.75,
                    share_label: "75.00%".to_string(),
                },
                CityShareRow {
                    city: "Kazan".to_string(),
                    share: 0.25,
                    share_label: "25.00%".to_string(),
                },
            ],
            other_share: 0.0,
            other_share_label: "0.00%".to_string(),
        }
    }

    #[test]
    fn yearly_sheet_names_profession_columns() {
        let [yearly, _] = WorkbookExporter::layouts(&report());

        assert_eq!(yearly.name, "Yearly statistics");
        assert_eq!(yearly.rows.len(), 2);
        assert_eq!(yearly.rows[0][2], text("Average salary - Analyst"));
        assert_eq!(yearly.rows[0][4], text("Vacancies - Analyst"));
        assert_eq!(
            yearly.rows[1],
            vec![
                SheetCell::Number(2021.0),
                SheetCell::Number(120.0),
                SheetCell::Number(150.0),
                SheetCell::Number(4.0),
                SheetCell::Number(1.0),
            ]
        );
    }

    #[test]
    fn city_sheet_pads_shorter_block_and_formats_shares() {
        let [_, cities] = WorkbookExporter::layouts(&report());

        assert_eq!(cities.name, "City statistics");
        assert_eq!(cities.rows.len(), 3);
        assert_eq!(cities.rows[0][2], SheetCell::Blank);
        assert_eq!(
            cities.rows[1],
            vec![
                text("Kazan"),
                SheetCell::Number(150.0),
                SheetCell::Blank,
                text("Moscow"),
                SheetCell::Percent(0.75),
            ]
        );
        assert_eq!(
            cities.rows[2],
            vec![
                SheetCell::Blank,
                SheetCell::Blank,
                SheetCell::Blank,
                text("Kazan"),
                SheetCell::Percent(0.25),
            ]
        );
    }

    #[test]
    fn workbook_holds_both_named_sheets() {
        let mut workbook = WorkbookExporter::build(&report()).expect("workbook builds");

        let names: Vec<String> = (0..2)
            .map(|index| {
                workbook
                    .worksheet_from_index(index)
                    .expect("sheet exists")
                    .name()
            })
            .collect();
        assert_eq!(names, vec!["Yearly statistics", "City statistics"]);
        assert!(workbook.worksheet_from_index(2).is_err());

        let bytes = workbook.save_to_buffer().expect("workbook serializes");
        assert!(bytes.starts_with(b"PK"));
    }
}
