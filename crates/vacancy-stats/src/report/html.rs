use super::views::StatisticsReport;
use super::RenderError;
use tera::{Context, Tera};

const REPORT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Vacancy statistics{% if report.profession %}: {{ report.profession }}{% endif %}</title>
  <style>
    body { font-family: Verdana, sans-serif; margin: 24px; }
    h1 { text-align: center; }
    h2 { text-align: center; margin-top: 32px; }
    table { border-collapse: collapse; margin: 0 auto; }
    th, td { border: 1px solid #000; padding: 4px 10px; text-align: center; }
    th { font-weight: bold; }
    .note { text-align: center; color: #555; font-size: 12px; }
    .chart { text-align: center; margin-top: 16px; }
    .chart svg { max-width: 100%; height: auto; }
  </style>
</head>
<body>
  <h1>Vacancy statistics for profession "{{ report.profession }}"</h1>
  <p class="note">{{ report.total_records }} vacancies analysed, generated {{ report.generated_at }}</p>
  {% if chart %}<div class="chart">{{ chart | safe }}</div>{% endif %}

  <h2>Statistics by year</h2>
  <table>
    <tr>
      <th>Year</th>
      <th>Average salary</th>
      <th>Average salary - {{ report.profession }}</th>
      <th>Vacancies</th>
      <th>Vacancies - {{ report.profession }}</th>
    </tr>
    {% for row in report.yearly %}
    <tr>
      <td>{{ row.year }}</td>
      <td>{{ row.average_salary }}</td>
      <td>{{ row.average_salary_for_profession }}</td>
      <td>{{ row.vacancies }}</td>
      <td>{{ row.vacancies_for_profession }}</td>
    </tr>
    {% endfor %}
  </table>
  {% if report.profession_fallback_applied %}<p class="note">No vacancy titles contain "{{ report.profession }}".</p>{% endif %}

  <h2>Statistics by city</h2>
  <table>
    <tr><th>City</th><th>Salary level</th></tr>
    {% for row in report.city_salaries %}
    <tr><td>{{ row.city }}</td><td>{{ row.average_salary }}</td></tr>
    {% endfor %}
  </table>
  <br>
  <table>
    <tr><th>City</th><th>Vacancy share</th></tr>
    {% for row in report.city_shares %}
    <tr><td>{{ row.city }}</td><td>{{ row.share_label }}</td></tr>
    {% endfor %}
    <tr><td>Other</td><td>{{ report.other_share_label }}</td></tr>
  </table>
</body>
</html>
"#;

/// Renders the statistics document through an embedded Tera template.
pub struct HtmlReportRenderer {
    template_engine: Tera,
}

impl HtmlReportRenderer {
    const TEMPLATE_NAME: &'static str = "statistics.html";

    pub fn new() -> Result<Self, RenderError> {
        let mut template_engine = Tera::default();
        template_engine.add_raw_template(Self::TEMPLATE_NAME, REPORT_TEMPLATE)?;
        Ok(Self { template_engine })
    }

    /// `chart` is inline SVG markup placed under the heading; pass an empty string to
    /// leave the figure out.
    pub fn render(&self, report: &StatisticsReport, chart: &str) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("report", report);
        context.insert("chart", chart);
        Ok(self.template_engine.render(Self::TEMPLATE_NAME, &context)?)
    }
}
