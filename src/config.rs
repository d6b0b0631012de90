use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::metrics::{DeltaColor, MetricConfig};

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "sample_store.toml";

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "sample-store-explorer")]
#[command(about = "Explore sales by category, city and year")]
pub struct CliArgs {
    /// Sales data file (.csv, .json or .parquet); overrides `data_path`.
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parsing error in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// File loaded at startup.
    pub data_path: PathBuf,
    pub default_categories: Vec<String>,
    pub default_city: Option<String>,
    /// Slider minimum and maximum.
    pub year_bounds: (i32, i32),
    /// Slider initial selection.
    pub default_years: (i32, i32),
    /// chrono format string for the table's date column.
    pub date_display_format: String,
    pub table_height: f32,
    pub chart_height: f32,
    pub metrics: Vec<MetricConfig>,
    /// Centered text under the chart.
    pub footer: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/Superstore_Orders.csv"),
            default_categories: vec!["Technology".to_string()],
            default_city: Some("Houston".to_string()),
            year_bounds: (2020, 2023),
            default_years: (2021, 2023),
            date_display_format: "%-d %b %Y".to_string(),
            table_height: 212.0,
            chart_height: 320.0,
            metrics: vec![
                MetricConfig::new("Furniture Sales", "Furniture", "1.2%", DeltaColor::Normal),
                MetricConfig::new(
                    "Office Supplies Sales",
                    "Office Supplies",
                    "0.0%",
                    DeltaColor::Off,
                ),
                MetricConfig::new("Technology Sales", "Technology", "-0.5%", DeltaColor::Normal),
            ],
            footer: "Developed with ❤ by Ankit Aggarwal".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load from an explicit path, else from [`DEFAULT_CONFIG_FILE`] when it
    /// exists, else fall back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !p.exists() {
                    log::debug!("no {DEFAULT_CONFIG_FILE}, using defaults");
                    return Ok(Self::default());
                }
                p
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        config.validate()?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply command line overrides.
    pub fn with_args(mut self, args: &CliArgs) -> Self {
        if let Some(data) = &args.data {
            self.data_path = data.clone();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (lo, hi) = self.year_bounds;
        if lo > hi {
            return Err(ConfigError::Invalid {
                field: "year_bounds",
                message: format!("{lo} is after {hi}"),
            });
        }
        let (start, end) = self.default_years;
        if start > end || start < lo || end > hi {
            return Err(ConfigError::Invalid {
                field: "default_years",
                message: format!("({start}, {end}) must be an ordered range inside ({lo}, {hi})"),
            });
        }
        if StrftimeItems::new(&self.date_display_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Invalid {
                field: "date_display_format",
                message: format!("'{}' is not a valid date format", self.date_display_format),
            });
        }
        if self.table_height <= 0.0 || self.chart_height <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "table_height/chart_height",
                message: "heights must be positive".to_string(),
            });
        }
        if self.metrics.is_empty() {
            return Err(ConfigError::Invalid {
                field: "metrics",
                message: "at least one metric card is required".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = DashboardConfig::default();
        config.validate().unwrap();
        assert_eq!(config.metrics.len(), 3);
        assert_eq!(config.metrics[1].delta_color, DeltaColor::Off);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = DashboardConfig::from_toml_str(
            r#"
            default_city = "Seattle"
            default_years = [2022, 2023]

            [[metrics]]
            label = "Tech"
            category = "Technology"
            delta = "2%"
            delta_color = "inverse"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_city.as_deref(), Some("Seattle"));
        assert_eq!(config.default_years, (2022, 2023));
        assert_eq!(config.year_bounds, (2020, 2023));
        assert_eq!(config.metrics.len(), 1);
        assert_eq!(config.metrics[0].delta_color, DeltaColor::Inverse);
        config.validate().unwrap();
    }

    #[test]
    fn default_years_outside_bounds_are_rejected() {
        let config = DashboardConfig {
            default_years: (2018, 2021),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "default_years", .. })
        ));
    }

    #[test]
    fn unknown_date_specifier_is_rejected() {
        let config = DashboardConfig::from_toml_str("date_display_format = \"%Q\"").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "date_display_format", .. })
        ));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("explorer.toml");
        std::fs::write(&path, "date_display_format = \"%d %Q\"\n").unwrap();
        assert!(DashboardConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn load_from_file_and_cli_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("explorer.toml");
        std::fs::write(&path, "data_path = \"orders.json\"\nyear_bounds = [2019, 2024]\n").unwrap();

        let config = DashboardConfig::load(Some(&path)).unwrap();
        assert_eq!(config.data_path, PathBuf::from("orders.json"));
        assert_eq!(config.year_bounds, (2019, 2024));

        let args = CliArgs {
            data: Some(PathBuf::from("other.csv")),
            config: None,
        };
        assert_eq!(config.with_args(&args).data_path, PathBuf::from("other.csv"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DashboardConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "year_bounds = \"soon\"").unwrap();
        assert!(matches!(
            DashboardConfig::load(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
    }
}
