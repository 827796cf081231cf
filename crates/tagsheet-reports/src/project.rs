//! Report projects: which template is filled, with which sheets, in what order

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tagsheet_core::Workbook;
use tagsheet_xlsx::{XlsxReader, XlsxWriter};
use tracing::{debug, info};

use crate::config::ReportConfig;
use crate::error::{ReportError, ReportResult};
use crate::sheets::{
    write_by_date_sheet, write_easy_sheet, write_geography_sheet, write_summary_sheet,
    write_trend_sheet, ByDateSheet, GeographySheet, EASY_A_SHEET, EASY_B_SHEET, SUMMARY_SHEET,
    TABLE_2A, TABLE_2B, TABLE_2C, TABLE_2D, TABLE_3A, TABLE_3B, TABLE_3C, TABLE_3D, TREND_SHEET,
};
use crate::sources::{
    SourceData, APPOINTMENTS_FILE, EASY_A_FILE, EASY_B_FILE, PRACTICES_FILE, TABLE1_FILE,
};

/// A report workbook built from one template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Project {
    /// Plain extracts copied into two sheets
    Easy,
    /// Daily and geographic breakdowns plus the monthly trend
    Medium,
    /// The summary sheet followed by everything in `Medium`
    Advanced,
}

impl Project {
    /// Every project, in build order
    pub const ALL: [Project; 3] = [Project::Easy, Project::Medium, Project::Advanced];

    /// Short name used in file names and on the command line
    pub fn name(self) -> &'static str {
        match self {
            Project::Easy => "easy",
            Project::Medium => "medium",
            Project::Advanced => "advanced",
        }
    }

    /// `<name>_template.xlsx`
    pub fn template_file(self) -> String {
        format!("{}_template.xlsx", self.name())
    }

    /// `<name>_output.xlsx`
    pub fn output_file(self) -> String {
        format!("{}_output.xlsx", self.name())
    }

    /// Sheets written by this project, in order
    pub fn steps(self) -> Vec<Step> {
        let medium = [
            Step::ByDate(&TABLE_2A),
            Step::ByDate(&TABLE_2B),
            Step::ByDate(&TABLE_2C),
            Step::ByDate(&TABLE_2D),
            Step::ByGeography(&TABLE_3A),
            Step::ByGeography(&TABLE_3B),
            Step::ByGeography(&TABLE_3C),
            Step::ByGeography(&TABLE_3D),
            Step::Trend,
        ];

        match self {
            Project::Easy => vec![Step::EasyA, Step::EasyB],
            Project::Medium => medium.to_vec(),
            Project::Advanced => std::iter::once(Step::Summary).chain(medium).collect(),
        }
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Project {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Project::ALL
            .into_iter()
            .find(|project| project.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ReportError::Config(format!(
                    "unknown project '{}', expected easy, medium or advanced",
                    s
                ))
            })
    }
}

/// One sheet of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `Easy A` from its own extract
    EasyA,
    /// `Easy B` from its own extract
    EasyB,
    /// A `Table 2x` daily breakdown
    ByDate(&'static ByDateSheet),
    /// A `Table 3x` geographic breakdown
    ByGeography(&'static GeographySheet),
    /// `Table 1`
    Summary,
    /// `Table 5`
    Trend,
}

impl Step {
    /// The template sheet this step fills
    pub fn sheet(&self) -> &'static str {
        match self {
            Step::EasyA => EASY_A_SHEET,
            Step::EasyB => EASY_B_SHEET,
            Step::ByDate(spec) => spec.sheet,
            Step::ByGeography(spec) => spec.sheet,
            Step::Summary => SUMMARY_SHEET,
            Step::Trend => TREND_SHEET,
        }
    }

    /// Extracts the step reads
    pub fn sources(&self) -> &'static [&'static str] {
        match self {
            Step::EasyA => &[EASY_A_FILE],
            Step::EasyB => &[EASY_B_FILE],
            Step::ByDate(_) => &[APPOINTMENTS_FILE],
            Step::ByGeography(_) => &[APPOINTMENTS_FILE, PRACTICES_FILE],
            Step::Summary | Step::Trend => &[TABLE1_FILE],
        }
    }

    /// Fill this step's sheet. `sources` must already hold [`Step::sources`].
    pub fn run(
        &self,
        workbook: &mut Workbook,
        sources: &SourceData,
        months: &[String],
    ) -> ReportResult<()> {
        match self {
            Step::EasyA => {
                write_easy_sheet(workbook, EASY_A_SHEET, sources.frame(EASY_A_FILE)?)?;
            }
            Step::EasyB => {
                write_easy_sheet(workbook, EASY_B_SHEET, sources.frame(EASY_B_FILE)?)?;
            }
            Step::ByDate(spec) => {
                write_by_date_sheet(workbook, sources.frame(APPOINTMENTS_FILE)?, spec)?;
            }
            Step::ByGeography(spec) => {
                write_geography_sheet(
                    workbook,
                    sources.frame(APPOINTMENTS_FILE)?,
                    sources.frame(PRACTICES_FILE)?,
                    spec,
                )?;
            }
            Step::Summary => {
                write_summary_sheet(workbook, sources.frame(TABLE1_FILE)?, months)?;
            }
            Step::Trend => {
                write_trend_sheet(workbook, sources.frame(TABLE1_FILE)?, months)?;
            }
        }
        Ok(())
    }
}

/// Fill `workbook` with every sheet of `project`, loading extracts as needed
pub fn fill_project(
    project: Project,
    workbook: &mut Workbook,
    sources: &mut SourceData,
    months: &[String],
) -> ReportResult<()> {
    for step in project.steps() {
        sources.ensure_all(step.sources())?;
        step.run(workbook, sources, months)?;
        debug!(project = project.name(), sheet = step.sheet(), "filled sheet");
    }
    Ok(())
}

/// Build one project from its template and return the output path.
///
/// Nothing is written when any sheet fails.
pub fn build_project(project: Project, config: &ReportConfig) -> ReportResult<PathBuf> {
    config.validate()?;
    let months = config.report_months()?;
    let template = config.paths.template_dir.join(project.template_file());

    let mut workbook = XlsxReader::read_file(&template)?;
    let mut sources = SourceData::new(&config.paths.data_dir);
    fill_project(project, &mut workbook, &mut sources, &months)?;

    std::fs::create_dir_all(&config.paths.output_dir)?;
    let output = config.paths.output_dir.join(project.output_file());
    XlsxWriter::write_file(&workbook, &output)?;

    info!(
        project = project.name(),
        template = %template.display(),
        output = %output.display(),
        "built project"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_names_and_files() {
        assert_eq!("Medium".parse::<Project>().unwrap(), Project::Medium);
        assert_eq!(Project::Advanced.to_string(), "advanced");
        assert_eq!(Project::Easy.template_file(), "easy_template.xlsx");
        assert_eq!(Project::Easy.output_file(), "easy_output.xlsx");
        assert!(matches!("hard".parse::<Project>(), Err(ReportError::Config(_))));
    }

    #[test]
    fn test_steps() {
        let sheets = |project: Project| -> Vec<&str> {
            project.steps().iter().map(|step| step.sheet()).collect()
        };

        assert_eq!(sheets(Project::Easy), vec!["Easy A", "Easy B"]);
        assert_eq!(
            sheets(Project::Medium),
            vec![
                "Table 2a", "Table 2b", "Table 2c", "Table 2d", "Table 3a", "Table 3b",
                "Table 3c", "Table 3d", "Table 5",
            ]
        );
        let advanced = sheets(Project::Advanced);
        assert_eq!(advanced[0], "Table 1");
        assert_eq!(advanced[1..], sheets(Project::Medium)[..]);
    }

    #[test]
    fn test_easy_b_reads_its_own_extract() {
        assert_eq!(Step::EasyB.sources(), &[EASY_B_FILE]);
        assert_eq!(Step::ByGeography(&TABLE_3C).sources(), &[APPOINTMENTS_FILE, PRACTICES_FILE]);
    }

    #[test]
    fn test_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ReportConfig::default();
        config.paths.template_dir = dir.path().join("templates");
        config.paths.output_dir = dir.path().join("outputs");

        let err = build_project(Project::Easy, &config).unwrap_err();
        assert!(matches!(err, ReportError::Xlsx(_)));
        assert!(!config.paths.output_dir.join("easy_output.xlsx").exists());
    }
}
