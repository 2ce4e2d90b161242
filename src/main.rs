use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;
use vacancy_stats::config::AppConfig;
use vacancy_stats::error::AppError;
use vacancy_stats::loader::{collapse_whitespace, VacancyCsvLoader};
use vacancy_stats::report::{ReportArtifacts, ReportWriter, StatisticsReport, WkhtmltopdfConverter};
use vacancy_stats::statistics::{CurrencyTable, TableName, VacancyStatistics};
use vacancy_stats::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "vacancy-stats",
    about = "Salary and vacancy statistics over job-posting exports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the statistics tables and write the report (default command)
    Report(ReportArgs),
    /// List the currency conversion rates in effect
    Currencies,
}

#[derive(Args, Debug, Default)]
struct ReportArgs {
    /// Vacancy CSV export (prompted for when omitted)
    #[arg(long)]
    file: Option<PathBuf>,
    /// Substring selecting the profession's postings by title (prompted for when omitted)
    #[arg(long)]
    profession: Option<String>,
    /// Override the configured report directory
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Do not convert the HTML report to PDF even when a converter is configured
    #[arg(long)]
    skip_pdf: bool,
    /// Print the tables without writing report files
    #[arg(long)]
    print_only: bool,
    /// Print the tables as JSON instead of text lines
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Report(ReportArgs::default()));

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let currencies = config.statistics.currency_table()?;

    match command {
        Command::Report(args) => run_report(args, &config, &currencies),
        Command::Currencies => {
            let stdout = io::stdout();
            write_currencies(&mut stdout.lock(), &currencies)?;
            Ok(())
        }
    }
}

fn run_report(
    args: ReportArgs,
    config: &AppConfig,
    currencies: &CurrencyTable,
) -> Result<(), AppError> {
    let ReportArgs {
        file,
        profession,
        output_dir,
        skip_pdf,
        print_only,
        json,
    } = args;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut prompt_out = io::stdout();

    let file = match file {
        Some(path) => path,
        None => PathBuf::from(prompt(&mut input, &mut prompt_out, "Enter the vacancy file name")?),
    };
    let profession = match profession {
        Some(value) => collapse_whitespace(&value),
        None => prompt(&mut input, &mut prompt_out, "Enter the profession name")?,
    };

    let records = VacancyCsvLoader::from_path(&file)?;
    let statistics = VacancyStatistics::compute(&records, &profession, currencies)?;
    statistics.ensure_not_empty()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &statistics).map_err(io::Error::from)?;
        writeln!(out)?;
    } else {
        write_tables(&mut out, &statistics)?;
    }

    if print_only {
        return Ok(());
    }

    let output_dir = output_dir.unwrap_or_else(|| config.statistics.output_dir.clone());
    let mut writer = ReportWriter::new(output_dir)?;
    match (&config.statistics.wkhtmltopdf, skip_pdf) {
        (Some(binary), false) => writer = writer.with_pdf(WkhtmltopdfConverter::new(binary)),
        (Some(_), true) => info!("pdf export skipped on request"),
        (None, _) => info!("no pdf converter configured; writing html, workbook and chart only"),
    }

    let report = StatisticsReport::from_statistics(&statistics);
    let artifacts = writer.write_all(&report)?;
    write_artifacts(&mut out, &artifacts)?;

    Ok(())
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> io::Result<String> {
    write!(output, "{label}: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(collapse_whitespace(&line))
}

fn write_tables<W: Write>(out: &mut W, statistics: &VacancyStatistics) -> io::Result<()> {
    for name in TableName::ordered() {
        writeln!(out, "{}: {}", name.label(), statistics.table_line(name))?;
    }
    if !statistics.city_keys_aligned() {
        writeln!(
            out,
            "Note: the salary and share rankings list different cities."
        )?;
    }
    Ok(())
}

fn write_artifacts<W: Write>(out: &mut W, artifacts: &ReportArtifacts) -> io::Result<()> {
    writeln!(out, "\nReport files")?;
    for path in artifacts.paths() {
        writeln!(out, "- {}", path.display())?;
    }
    Ok(())
}

fn write_currencies<W: Write>(out: &mut W, currencies: &CurrencyTable) -> io::Result<()> {
    for code in currencies.codes() {
        if let Some(entry) = currencies.get(code) {
            writeln!(out, "{code}\t{}\t{}", entry.rate, entry.name)?;
        }
    }
    Ok(())
}
