//! # tagsheet-reports
//!
//! Monthly appointment reports assembled from CSV extracts and written into
//! tag-marked workbook templates.
//!
//! Each [`Project`] opens `<name>_template.xlsx`, fills its sheets in a fixed
//! order and saves `<name>_output.xlsx`:
//!
//! - `easy`: `Easy A` and `Easy B`, copied from their extracts
//! - `medium`: the daily breakdowns `Table 2a`..`Table 2d`, the geographic
//!   breakdowns `Table 3a`..`Table 3d`, then the weekday trend `Table 5`
//! - `advanced`: the tag-keyed summary `Table 1`, then the `medium` sheets
//!
//! Settings come from a [`ReportConfig`], usually read from TOML.
//!
//! ```rust,no_run
//! use tagsheet_reports::{build_project, Project, ReportConfig};
//!
//! let config = ReportConfig::from_file("tagsheet.toml")?;
//! let output = build_project(Project::Medium, &config)?;
//! println!("wrote {}", output.display());
//! # Ok::<(), tagsheet_reports::ReportError>(())
//! ```

pub mod config;
pub mod error;
pub mod periods;
pub mod project;
pub mod reshape;
pub mod sheets;
pub mod sources;

pub use config::{parse_report_month, PathsConfig, ReportConfig};
pub use error::{ReportError, ReportResult};
pub use project::{build_project, fill_project, Project, Step};
pub use reshape::Aggregate;
pub use sources::SourceData;
