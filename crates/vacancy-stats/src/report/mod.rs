//! Report artifacts built from finalized statistics: an HTML document with an inline
//! chart, the chart on its own as SVG, a two-sheet workbook, and an optional PDF
//! conversion of the HTML.

mod chart;
mod html;
mod pdf;
pub mod views;
mod workbook;

pub use chart::ChartRenderer;
pub use html::HtmlReportRenderer;
pub use pdf::WkhtmltopdfConverter;
pub use views::{percent_label, CitySalaryRow, CityShareRow, StatisticsReport, YearlyStatsRow};
pub use workbook::{SheetCell, SheetLayout, WorkbookExporter, CITY_SHEET, YEARLY_SHEET};

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const HTML_FILE: &str = "report.html";
pub const WORKBOOK_FILE: &str = "report.xlsx";
pub const CHART_FILE: &str = "chart.svg";
pub const PDF_FILE: &str = "report.pdf";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
    #[error("chart error: {0}")]
    Chart(String),
    #[error("pdf converter exited with status {}: {stderr}", .status.map_or_else(|| "unknown".to_string(), |code| code.to_string()))]
    Converter { status: Option<i32>, stderr: String },
}

/// Paths written by one [`ReportWriter::write_all`] call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportArtifacts {
    pub html: PathBuf,
    pub workbook: PathBuf,
    pub chart: PathBuf,
    pub pdf: Option<PathBuf>,
}

impl ReportArtifacts {
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        [
            self.html.as_path(),
            self.workbook.as_path(),
            self.chart.as_path(),
        ]
        .into_iter()
        .chain(self.pdf.as_deref())
    }
}

/// Renders the chart and the HTML document in one step.
pub fn render_html(
    renderer: &HtmlReportRenderer,
    report: &StatisticsReport,
) -> Result<(String, String), RenderError> {
    let chart = ChartRenderer::render_svg(report)?;
    let html = renderer.render(report, &chart)?;
    Ok((html, chart))
}

/// Writes every report artifact into one output directory.
pub struct ReportWriter {
    output_dir: PathBuf,
    renderer: HtmlReportRenderer,
    pdf: Option<WkhtmltopdfConverter>,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, RenderError> {
        Ok(Self {
            output_dir: output_dir.into(),
            renderer: HtmlReportRenderer::new()?,
            pdf: None,
        })
    }

    pub fn with_pdf(mut self, converter: WkhtmltopdfConverter) -> Self {
        self.pdf = Some(converter);
        self
    }

    pub fn write_all(&self, report: &StatisticsReport) -> Result<ReportArtifacts, RenderError> {
        std::fs::create_dir_all(&self.output_dir)?;

        let (html, chart) = render_html(&self.renderer, report)?;
        let chart_path = self.output_dir.join(CHART_FILE);
        std::fs::write(&chart_path, &chart)?;
        let html_path = self.output_dir.join(HTML_FILE);
        std::fs::write(&html_path, &html)?;

        let workbook_path = self.output_dir.join(WORKBOOK_FILE);
        WorkbookExporter::save(report, &workbook_path)?;

        let pdf = match &self.pdf {
            Some(converter) => {
                let pdf_path = self.output_dir.join(PDF_FILE);
                converter.convert(&html, &pdf_path)?;
                Some(pdf_path)
            }
            None => None,
        };

        let artifacts = ReportArtifacts {
            html: html_path,
            workbook: workbook_path,
            chart: chart_path,
            pdf,
        };
        info!(
            output_dir = %self.output_dir.display(),
            files = artifacts.paths().count(),
            "wrote statistics report"
        );

        Ok(artifacts)
    }
}
