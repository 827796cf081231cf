//! tagsheet CLI - build report workbooks and inspect template tags

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tagsheet::prelude::*;
use tagsheet::tag_cells;
use tagsheet_reports::{build_project, parse_report_month, Project, ReportConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Looked for in the working directory when `--config` is not given
const DEFAULT_CONFIG: &str = "tagsheet.toml";

#[derive(Parser)]
#[command(name = "tagsheet")]
#[command(author, version, about = "Fill tag-marked spreadsheet templates with report data")]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one or all report projects
    Build {
        /// Project to build
        #[arg(value_enum, default_value_t = ProjectArg::All)]
        project: ProjectArg,

        /// TOML configuration file (default: ./tagsheet.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Report month as YYYY-MM or YYYY-MM-DD
        #[arg(long, value_name = "MONTH")]
        report_month: Option<String>,

        /// Number of months covered by the summary and trend sheets
        #[arg(long, value_name = "N")]
        months: Option<u32>,

        /// Directory holding the CSV extracts
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Directory holding the project templates
        #[arg(long)]
        template_dir: Option<PathBuf>,

        /// Directory the outputs are written to
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Print the cell holding a tag
    Locate {
        /// Template workbook
        template: PathBuf,

        /// Sheet to search
        sheet: String,

        /// Exact tag text, e.g. "<start>"
        tag: String,

        /// Search only this column (letters, e.g. C)
        #[arg(short, long)]
        column: Option<String>,
    },

    /// List every tag in a template
    Tags {
        /// Template workbook
        template: PathBuf,

        /// Only list tags in this sheet
        #[arg(short, long)]
        sheet: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProjectArg {
    Easy,
    Medium,
    Advanced,
    All,
}

impl ProjectArg {
    fn projects(self) -> Vec<Project> {
        match self {
            ProjectArg::Easy => vec![Project::Easy],
            ProjectArg::Medium => vec![Project::Medium],
            ProjectArg::Advanced => vec![Project::Advanced],
            ProjectArg::All => Project::ALL.to_vec(),
        }
    }
}

/// Command-line values that override the configuration file
#[derive(Debug, Default)]
struct Overrides {
    report_month: Option<String>,
    months: Option<u32>,
    data_dir: Option<PathBuf>,
    template_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build {
            project,
            config,
            report_month,
            months,
            data_dir,
            template_dir,
            output_dir,
        } => {
            let overrides = Overrides {
                report_month,
                months,
                data_dir,
                template_dir,
                output_dir,
            };
            build(project, config.as_deref(), overrides)
        }
        Commands::Locate {
            template,
            sheet,
            tag,
            column,
        } => locate_tag(&template, &sheet, &tag, column.as_deref()),
        Commands::Tags { template, sheet } => list_tags(&template, sheet.as_deref()),
    }
}

/// `RUST_LOG` wins; otherwise info, or debug with `--verbose`
fn init_logging(verbose: bool) {
    // Targets are module paths, so `tagsheet` covers every tagsheet_* crate
    let default = if verbose { "tagsheet=debug" } else { "tagsheet=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>, overrides: Overrides) -> Result<ReportConfig> {
    let mut config = match path {
        Some(path) => ReportConfig::from_file(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None if Path::new(DEFAULT_CONFIG).exists() => ReportConfig::from_file(DEFAULT_CONFIG)
            .with_context(|| format!("Failed to load config '{}'", DEFAULT_CONFIG))?,
        None => ReportConfig::default(),
    };

    if let Some(month) = overrides.report_month {
        config.report_month = parse_report_month(&month)?;
    }
    if let Some(months) = overrides.months {
        config.number_of_months = months;
    }
    if let Some(dir) = overrides.data_dir {
        config.paths.data_dir = dir;
    }
    if let Some(dir) = overrides.template_dir {
        config.paths.template_dir = dir;
    }
    if let Some(dir) = overrides.output_dir {
        config.paths.output_dir = dir;
    }

    config.validate()?;
    debug!(?config, "resolved configuration");
    Ok(config)
}

fn build(project: ProjectArg, config: Option<&Path>, overrides: Overrides) -> Result<()> {
    let config = load_config(config, overrides)?;

    for project in project.projects() {
        let output = build_project(project, &config)
            .with_context(|| format!("Failed to build the {} project", project))?;
        println!("{}", output.display());
    }
    Ok(())
}

fn open_template(path: &Path) -> Result<Workbook> {
    Workbook::open(path).with_context(|| format!("Failed to open '{}'", path.display()))
}

fn locate_tag(template: &Path, sheet: &str, tag: &str, column: Option<&str>) -> Result<()> {
    let workbook = open_template(template)?;
    let Some(worksheet) = workbook.worksheet_by_name(sheet) else {
        bail!("Sheet '{}' not found in '{}'", sheet, template.display());
    };

    let scope = match column {
        Some(letters) => SearchScope::column(letters)?,
        None => SearchScope::Sheet,
    };
    let coord = locate(worksheet, scope, tag)?;
    println!("{}", coord);
    Ok(())
}

fn list_tags(template: &Path, only: Option<&str>) -> Result<()> {
    let workbook = open_template(template)?;

    if let Some(name) = only {
        if workbook.worksheet_by_name(name).is_none() {
            bail!("Sheet '{}' not found in '{}'", name, template.display());
        }
    }

    for sheet in workbook.worksheets() {
        if only.map_or(false, |name| name != sheet.name()) {
            continue;
        }
        for (coord, tag) in tag_cells(sheet) {
            println!("{}\t{}\t{}", sheet.name(), coord, tag);
        }
    }
    Ok(())
}
