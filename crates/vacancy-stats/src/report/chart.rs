use super::views::StatisticsReport;
use super::RenderError;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::f64::consts::{FRAC_PI_2, TAU};

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 900;
const CAPTION_SIZE: u32 = 18;
const LABEL_SIZE: u32 = 12;

const OVERALL_COLOR: RGBColor = RGBColor(31, 119, 180);
const PROFESSION_COLOR: RGBColor = RGBColor(255, 127, 14);
const SLICE_COLORS: [RGBColor; 11] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
    RGBColor(199, 199, 199),
];

fn chart_error<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Chart(err.to_string())
}

/// Draws the four-panel statistics figure: salary and vacancy bars by year, city
/// salaries as horizontal bars, and city shares as a pie with an "Other" slice.
pub struct ChartRenderer;

impl ChartRenderer {
    pub fn render_svg(report: &StatisticsReport) -> Result<String, RenderError> {
        let years: Vec<String> = report.yearly.iter().map(|row| row.year.to_string()).collect();
        let profession_legend = format!("{} salary", report.profession);
        let profession_count_legend = format!("{} vacancies", report.profession);

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
            root.fill(&WHITE).map_err(chart_error)?;
            let panels = root.split_evenly((2, 2));

            draw_grouped_bars(
                &panels[0],
                "Salary level by year",
                &years,
                [
                    BarSeries {
                        legend: "Average salary",
                        values: report.yearly.iter().map(|row| row.average_salary as f64).collect(),
                        color: OVERALL_COLOR,
                    },
                    BarSeries {
                        legend: &profession_legend,
                        values: report
                            .yearly
                            .iter()
                            .map(|row| row.average_salary_for_profession as f64)
                            .collect(),
                        color: PROFESSION_COLOR,
                    },
                ],
            )?;
            draw_grouped_bars(
                &panels[1],
                "Vacancy count by year",
                &years,
                [
                    BarSeries {
                        legend: "Vacancies",
                        values: report.yearly.iter().map(|row| row.vacancies as f64).collect(),
                        color: OVERALL_COLOR,
                    },
                    BarSeries {
                        legend: &profession_count_legend,
                        values: report
                            .yearly
                            .iter()
                            .map(|row| row.vacancies_for_profession as f64)
                            .collect(),
                        color: PROFESSION_COLOR,
                    },
                ],
            )?;

            let cities: Vec<(&str, f64)> = report
                .city_salaries
                .iter()
                .map(|row| (row.city.as_str(), row.average_salary as f64))
                .collect();
            draw_city_salaries(&panels[2], &cities)?;

            let mut slices: Vec<(String, f64)> = report
                .city_shares
                .iter()
                .map(|row| (format!("{} {}", row.city, row.share_label), row.share))
                .collect();
            slices.push((format!("Other {}", report.other_share_label), report.other_share));
            draw_share_pie(&panels[3], &slices)?;

            root.present().map_err(chart_error)?;
        }

        Ok(svg)
    }
}

struct BarSeries<'a> {
    legend: &'a str,
    values: Vec<f64>,
    color: RGBColor,
}

fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, f64::max).max(1.0) * 1.1
}

/// Maps a key point back to a category name when it falls on an integer slot.
fn slot_label(names: &[String], position: f64) -> String {
    let slot = position.round();
    if (position - slot).abs() > 1e-6 || slot < 0.0 {
        return String::new();
    }
    names.get(slot as usize).cloned().unwrap_or_default()
}

fn draw_grouped_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    caption: &str,
    categories: &[String],
    series: [BarSeries<'_>; 2],
) -> Result<(), RenderError> {
    let slots = categories.len().max(1) as f64;
    let max = axis_max(series.iter().flat_map(|bars| bars.values.iter().copied()));

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", CAPTION_SIZE))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..slots - 0.5, 0.0..max)
        .map_err(chart_error)?;

    let x_label = |position: &f64| slot_label(categories, *position);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(categories.len() + 1)
        .x_label_formatter(&x_label)
        .y_label_formatter(&|value| format!("{value:.0}"))
        .label_style(("sans-serif", LABEL_SIZE))
        .draw()
        .map_err(chart_error)?;

    for (offset, bars) in [(-0.4, &series[0]), (0.0, &series[1])] {
        let color = bars.color;
        chart
            .draw_series(bars.values.iter().enumerate().map(|(slot, value)| {
                let left = slot as f64 + offset;
                Rectangle::new([(left, 0.0), (left + 0.4, *value)], color.filled())
            }))
            .map_err(chart_error)?
            .label(bars.legend)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .label_font(("sans-serif", LABEL_SIZE))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_error)?;

    Ok(())
}

fn draw_city_salaries<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    cities: &[(&str, f64)],
) -> Result<(), RenderError> {
    let slots = cities.len().max(1) as f64;
    let max = axis_max(cities.iter().map(|(_, salary)| *salary));
    // Highest salary on top.
    let names: Vec<String> = cities.iter().rev().map(|(city, _)| city.to_string()).collect();

    let mut chart = ChartBuilder::on(area)
        .caption("Salary level by city", ("sans-serif", CAPTION_SIZE))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(140)
        .build_cartesian_2d(0.0..max, -0.5..slots - 0.5)
        .map_err(chart_error)?;

    let y_label = |position: &f64| slot_label(&names, *position);
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(cities.len() + 1)
        .y_label_formatter(&y_label)
        .x_label_formatter(&|value| format!("{value:.0}"))
        .label_style(("sans-serif", LABEL_SIZE))
        .draw()
        .map_err(chart_error)?;

    let top = cities.len().saturating_sub(1);
    chart
        .draw_series(cities.iter().enumerate().map(|(rank, (_, salary))| {
            let slot = (top - rank) as f64;
            Rectangle::new([(0.0, slot - 0.4), (*salary, slot + 0.4)], OVERALL_COLOR.filled())
        }))
        .map_err(chart_error)?;

    Ok(())
}

fn draw_share_pie<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    slices: &[(String, f64)],
) -> Result<(), RenderError> {
    let area = area
        .titled("Vacancy share by city", ("sans-serif", CAPTION_SIZE))
        .map_err(chart_error)?;
    let (width, height) = area.dim_in_pixel();
    let center = (f64::from(width) * 0.35, f64::from(height) * 0.5);
    let radius = f64::from(width.min(height)) * 0.4;

    let mut start = -FRAC_PI_2;
    for (index, (_, share)) in slices.iter().enumerate() {
        if *share <= 0.0 {
            continue;
        }
        let sweep = share * TAU;
        let steps = ((sweep / TAU) * 120.0).ceil().max(2.0) as usize;
        let mut points = vec![(center.0 as i32, center.1 as i32)];
        points.extend((0..=steps).map(|step| {
            let angle = start + sweep * step as f64 / steps as f64;
            (
                (center.0 + radius * angle.cos()) as i32,
                (center.1 + radius * angle.sin()) as i32,
            )
        }));
        let color = SLICE_COLORS[index % SLICE_COLORS.len()];
        area.draw(&Polygon::new(points, color.filled()))
            .map_err(chart_error)?;
        start += sweep;
    }

    let legend_x = (f64::from(width) * 0.72) as i32;
    for (index, (label, _)) in slices.iter().enumerate() {
        let y = 20 + index as i32 * 20;
        let color = SLICE_COLORS[index % SLICE_COLORS.len()];
        area.draw(&Rectangle::new(
            [(legend_x, y), (legend_x + 12, y + 12)],
            color.filled(),
        ))
        .map_err(chart_error)?;
        area.draw(&Text::new(
            label.clone(),
            (legend_x + 18, y),
            ("sans-serif", LABEL_SIZE).into_font(),
        ))
        .map_err(chart_error)?;
    }

    Ok(())
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
            city_keys_aligned: true,
            yearly: vec![
                YearlyStatsRow {
                    year: 2020,
                    average_salary: 100,
                    average_salary_for_profession: 80,
                    vacancies: 3,
                    vacancies_for_profession: 1,
                },
                YearlyStatsRow {
                    year: 2021,
                    average_salary: 120,
                    average_salary_for_profession: 0,
                    vacancies: 1,
                    vacancies_for_profession: 0,
                },
            ],
            city_salaries: vec![
                CitySalaryRow {
                    city: "Kazan".to_string(),
                    average_salary: 150,
                },
                CitySalaryRow {
                    city: "Moscow".to_string(),
                    average_salary: 90,
                },
            ],
            city_shares: vec![
                CityShareRow {
                    city: "Moscow".to_string(),
                    share: 0.5,
                    share_label: "50.00%".to_string(),
                },
                CityShareRow {
                    city: "Kazan".to_string(),
                    share: 0.25,
                    share_label: "25.00%".to_string(),
                },
            ],
            other_share: 0.25,
            other_share_label: "25.00%".to_string(),
        }
    }

    #[test]
    fn renders_four_panels_into_svg() {
        let svg = ChartRenderer::render_svg(&report()).expect("chart renders");

        assert!(svg.contains("<svg"));
        for caption in [
            "Salary level by year",
            "Vacancy count by year",
            "Salary level by city",
            "Vacancy share by city",
        ] {
            assert!(svg.contains(caption), "missing panel {caption}");
        }
        assert!(svg.contains("Other 25.00%"));
        assert!(svg.contains("Analyst salary"));
        assert!(svg.contains("<polygon"));
    }

    #[test]
    fn empty_city_tables_still_render() {
        let mut report = report();
        report.city_salaries.clear();
        report.city_shares.clear();
        report.other_share = 1.0;
        report.other_share_label = "100.00%".to_string();

        let svg = ChartRenderer::render_svg(&report).expect("chart renders");

        assert!(svg.contains("Other 100.00%"));
    }

    #[test]
    fn slot_labels_only_land_on_integer_positions() {
        let names = vec!["2020".to_string(), "2021".to_string()];
        assert_eq!(slot_label(&names, 1.0), "2021");
        assert_eq!(slot_label(&names, 0.5), "");
        assert_eq!(slot_label(&names, -1.0), "");
        assert_eq!(slot_label(&names, 5.0), "");
    }
}
