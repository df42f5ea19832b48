use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(version, about = "Filter and summarise Airbnb NYC or book sales data")]
pub struct Args {
    /// Path to a TOML settings file.
    #[arg(short, long, value_name = "CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub dataset: DatasetCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum DatasetCommand {
    /// Airbnb NYC listings dashboard.
    Airbnb {
        /// CSV file, overrides `airbnb.data` from the settings file.
        #[arg(long, value_name = "CSV_PATH")]
        data: Option<PathBuf>,
        #[arg(long, default_value = "All")]
        neighbourhood_group: String,
        #[arg(long, default_value = "All")]
        room_type: String,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
    },
    /// Book sales portfolio dashboard.
    Books {
        /// CSV file, overrides `books.data` from the settings file.
        #[arg(long, value_name = "CSV_PATH")]
        data: Option<PathBuf>,
        #[arg(long, default_value = "All")]
        category: String,
        #[arg(long, default_value = "All")]
        region: String,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        min_rating: Option<f64>,
    },
}

// ---------------------------------------------------------------------------
// Settings file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirbnbSettings {
    pub data: PathBuf,
    /// Neighbourhoods shown in the price-by-neighbourhood chart.
    pub top_neighbourhoods: usize,
    /// Width in dollars of the price range labels.
    pub price_band_width: u32,
    /// Slider bounds used when no price range label parses.
    pub fallback_price_range: (i64, i64),
}

impl Default for AirbnbSettings {
    fn default() -> Self {
        AirbnbSettings {
            data: PathBuf::from("data/AB_NYC_2019.csv"),
            top_neighbourhoods: 20,
            price_band_width: 50,
            fallback_price_range: (0, 10_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookSettings {
    pub data: PathBuf,
}

impl Default for BookSettings {
    fn default() -> Self {
        BookSettings {
            data: PathBuf::from("data/book_sales.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Rows of the filtered table printed by the text report.
    pub table_rows: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings { table_rows: 20 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub airbnb: AirbnbSettings,
    pub books: BookSettings,
    pub report: ReportSettings,
}

impl Settings {
    /// Load settings from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing settings file {}", path.display()))
    }

    /// Settings from `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [airbnb]
            top_neighbourhoods = 5
            fallback_price_range = [10, 500]

            [report]
            table_rows = 3
            "#,
        )
        .unwrap();
        assert_eq!(settings.airbnb.top_neighbourhoods, 5);
        assert_eq!(settings.airbnb.fallback_price_range, (10, 500));
        assert_eq!(settings.airbnb.price_band_width, 50);
        assert_eq!(settings.books, BookSettings::default());
        assert_eq!(settings.report.table_rows, 3);
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(Settings::load(None).unwrap(), Settings::default());
    }

    #[test]
    fn missing_settings_file_is_an_error() {
        assert!(Settings::from_file(Path::new("/no/such/settings.toml")).is_err());
    }

    #[test]
    fn arguments_parse() {
        let args = Args::try_parse_from([
            "dashboard",
            "--format",
            "json",
            "airbnb",
            "--room-type",
            "Private room",
            "--max-price",
            "200",
        ])
        .unwrap();
        assert_eq!(args.format, OutputFormat::Json);
        match args.dataset {
            DatasetCommand::Airbnb {
                neighbourhood_group,
                room_type,
                min_price,
                max_price,
                ..
            } => {
                assert_eq!(neighbourhood_group, "All");
                assert_eq!(room_type, "Private room");
                assert_eq!(min_price, None);
                assert_eq!(max_price, Some(200.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
