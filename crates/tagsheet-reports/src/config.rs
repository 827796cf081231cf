//! Report configuration
//!
//! ```toml
//! report_month = 2022-04-01   # or "2022-04"
//! number_of_months = 12
//!
//! [paths]
//! data_dir = "data"
//! template_dir = "templates"
//! output_dir = "outputs"
//! ```

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer};

use crate::error::{ReportError, ReportResult};
use crate::periods;

/// Settings for one build of the reports
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Publication month; the day is ignored
    #[serde(deserialize_with = "deserialize_month")]
    pub report_month: NaiveDate,

    /// How many months the summary and trend sheets cover
    pub number_of_months: u32,

    /// Where inputs and outputs live
    pub paths: PathsConfig,
}

/// Directory configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory holding the CSV extracts
    pub data_dir: PathBuf,
    /// Directory holding `<project>_template.xlsx` files
    pub template_dir: PathBuf,
    /// Directory the outputs are written to
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            report_month: NaiveDate::from_ymd_opt(2022, 4, 1).unwrap_or_default(),
            number_of_months: 12,
            paths: PathsConfig::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            template_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("outputs"),
        }
    }
}

impl ReportConfig {
    /// Load configuration from a TOML file; missing keys take defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> ReportResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ReportError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values make sense together
    pub fn validate(&self) -> ReportResult<()> {
        if self.number_of_months == 0 {
            return Err(ReportError::Config(
                "number_of_months must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Month labels covered by the report, latest first (`Apr-22`, `Mar-22`, ...)
    pub fn report_months(&self) -> ReportResult<Vec<String>> {
        periods::report_months(self.report_month, self.number_of_months)
    }
}

/// Parse a month given as `YYYY-MM` or `YYYY-MM-DD`; the result is the first
/// of that month.
pub fn parse_report_month(text: &str) -> ReportResult<NaiveDate> {
    let text = text.trim();
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", text), "%Y-%m-%d"))
        .map_err(|_| ReportError::InvalidDate(format!("'{}' is not YYYY-MM or YYYY-MM-DD", text)))?;
    date.with_day(1)
        .ok_or_else(|| ReportError::InvalidDate(text.to_string()))
}

/// Accept either a TOML date or a string
fn deserialize_month<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match toml::Value::deserialize(deserializer)? {
        toml::Value::Datetime(datetime) => {
            let date = datetime
                .date
                .ok_or_else(|| D::Error::custom("report_month needs a date"))?;
            NaiveDate::from_ymd_opt(i32::from(date.year), u32::from(date.month), 1)
                .ok_or_else(|| D::Error::custom(format!("invalid report_month {}", datetime)))
        }
        toml::Value::String(text) => parse_report_month(&text).map_err(D::Error::custom),
        other => Err(D::Error::custom(format!(
            "report_month must be a date, got {}",
            other.type_str()
        ))),
    }
}
