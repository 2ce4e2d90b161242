use crate::statistics::{CurrencyTable, CurrencyTableError};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration shared by the CLI and the HTTP service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub statistics: StatisticsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let ansi = env::var("APP_LOG_ANSI")
            .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let output_dir = env::var("STATS_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("reports"));
        let currency_rates = optional_path("STATS_CURRENCY_RATES");
        let wkhtmltopdf = optional_path("STATS_WKHTMLTOPDF");

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            statistics: StatisticsConfig {
                output_dir,
                currency_rates,
                wkhtmltopdf,
            },
        })
    }
}

fn optional_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Inputs and outputs of a statistics run.
#[derive(Debug, Clone)]
pub struct StatisticsConfig {
    /// Directory receiving the HTML, CSV, and PDF artifacts.
    pub output_dir: PathBuf,
    /// Optional `code,rate[,name]` file replacing the standard currency table.
    pub currency_rates: Option<PathBuf>,
    /// Path to a `wkhtmltopdf` binary; PDF export is skipped when unset.
    pub wkhtmltopdf: Option<PathBuf>,
}

impl StatisticsConfig {
    /// Loads the configured rate override, or the standard table when none is set.
    pub fn currency_table(&self) -> Result<CurrencyTable, CurrencyTableError> {
        match &self.currency_rates {
            Some(path) => CurrencyTable::from_path(path),
            None => Ok(CurrencyTable::standard()),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_LOG_ANSI",
            "STATS_OUTPUT_DIR",
            "STATS_CURRENCY_RATES",
            "STATS_WKHTMLTOPDF",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(!config.telemetry.ansi);
        assert_eq!(config.statistics.output_dir, PathBuf::from("reports"));
        assert!(config.statistics.currency_rates.is_none());
        assert!(config.statistics.wkhtmltopdf.is_none());
    }

    #[test]
    fn reads_statistics_paths_and_ignores_blank_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("STATS_OUTPUT_DIR", "out/stats");
        env::set_var("STATS_CURRENCY_RATES", "rates.csv");
        env::set_var("STATS_WKHTMLTOPDF", "   ");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.statistics.output_dir, PathBuf::from("out/stats"));
        assert_eq!(
            config.statistics.currency_rates,
            Some(PathBuf::from("rates.csv"))
        );
        assert!(config.statistics.wkhtmltopdf.is_none());
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PORT", "eighty");
        let error = AppConfig::load().expect_err("port must be numeric");
        assert!(matches!(error, ConfigError::InvalidPort));
        reset_env();
    }

    #[test]
    fn currency_table_prefers_configured_override() {
        let dir = tempfile::tempdir().expect("tempdir");
        let rates = dir.path().join("rates.csv");
        std::fs::write(&rates, "code,rate\nusd,90\n").expect("write rates");

        let mut statistics = StatisticsConfig {
            output_dir: dir.path().to_path_buf(),
            currency_rates: Some(rates),
            wkhtmltopdf: None,
        };
        let table = statistics.currency_table().expect("override loads");
        assert_eq!(table.rate("USD"), Some(90.0));
        assert_eq!(table.len(), 1);

        statistics.currency_rates = None;
        assert_eq!(statistics.currency_table().expect("standard").len(), 10);
    }

    #[test]
    fn accepts_localhost_host() {
        let server = ServerConfig {
            host: "localhost".to_string(),
            port: 8080,
        };
        let addr = server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 8080));
    }
}
