//! Caseflow command-line interface.
//!
//! Thin dispatch over the ingest, storage, sentinel, and report layers. Every
//! command prints a human-readable message; failures go to stderr and exit
//! nonzero.

use anyhow::{bail, Result};
use caseflow_db::{CaseDb, WriteMode};
use caseflow_ingest::TemplateFormat;
use caseflow_sentinel::SentinelConfig;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

mod add;
mod report;

#[derive(Parser, Debug)]
#[command(name = "caseflow", about = "Case record ingestion, storage, and reporting", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a spreadsheet into the excel_import staging table
    Excel {
        /// Spreadsheet file to load
        path: PathBuf,
        /// Sheet name (first sheet when omitted)
        #[arg(long)]
        sheet: Option<String>,
        #[arg(long, env = "CASEFLOW_DB", default_value = "./data/app.db")]
        db: PathBuf,
    },

    /// Load a manual CSV into the manual_inputs staging table
    Manual {
        /// CSV file to load
        path: PathBuf,
        #[arg(long, env = "CASEFLOW_DB", default_value = "./data/app.db")]
        db: PathBuf,
    },

    /// Run a read-only SQL query and write a summary CSV
    Db {
        /// SELECT statement to run
        query: String,
        /// SQLite database to query
        #[arg(long, env = "CASEFLOW_CONN")]
        conn: Option<PathBuf>,
    },

    /// Summarize a CSV file and chart its numeric columns
    Report {
        /// CSV file to summarize
        path: PathBuf,
        /// Output summary CSV path
        #[arg(long, default_value = "report_summary.csv")]
        out: PathBuf,
    },

    /// Create a new case template CSV/XLSX
    Template {
        /// Output path for the template file
        path: PathBuf,
        /// File format to create (inferred from the extension when omitted)
        #[arg(long, value_enum)]
        format: Option<TemplateFormatArg>,
    },

    /// Import a filled template CSV/XLSX into the database
    ImportTemplate {
        /// Path to the filled template file
        path: PathBuf,
        #[arg(long, env = "CASEFLOW_DB", default_value = "./data/app.db")]
        db: PathBuf,
    },

    /// Interactively add a single case row
    Add {
        #[arg(long, env = "CASEFLOW_DB", default_value = "./data/app.db")]
        db: PathBuf,
    },

    /// Generate aggregated case reports and charts
    ReportCases {
        #[arg(long, env = "CASEFLOW_DB", default_value = "./data/app.db")]
        db: PathBuf,
        /// Output summary CSV path
        #[arg(long, default_value = "cases_summary.csv")]
        out_csv: PathBuf,
        /// Output prefix for per-chart files
        #[arg(long, default_value = "cases_report")]
        out_prefix: String,
    },

    /// Run the file-drop scheduler to auto-import templates
    RunScheduler {
        #[arg(long, env = "CASEFLOW_DB", default_value = "./data/app.db")]
        db: PathBuf,
        /// Drop folder to watch
        #[arg(long, default_value = "./data/drop")]
        drop: PathBuf,
        /// Processed files folder
        #[arg(long, default_value = "./data/processed")]
        processed: PathBuf,
        /// Failed files folder
        #[arg(long, default_value = "./data/failed")]
        failed: PathBuf,
        /// Poll interval in minutes
        #[arg(long, default_value_t = 1)]
        interval: u64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TemplateFormatArg {
    Csv,
    Xlsx,
}

impl From<TemplateFormatArg> for TemplateFormat {
    fn from(arg: TemplateFormatArg) -> Self {
        match arg {
            TemplateFormatArg::Csv => TemplateFormat::Csv,
            TemplateFormatArg::Xlsx => TemplateFormat::Xlsx,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // The scheduler keeps a durable activity log; everything else logs to
    // stderr only.
    let logging = match &cli.command {
        Commands::RunScheduler { drop, .. } => {
            let config = SentinelConfig {
                drop_dir: drop.clone(),
                ..SentinelConfig::default()
            };
            caseflow_logging::init_logging_with_file(&config.log_path())
        }
        _ => caseflow_logging::init_logging(),
    };
    if let Err(err) = logging {
        eprintln!("Failed to initialize logging: {err:#}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Excel { path, sheet, db } => {
            let table = caseflow_ingest::read_xlsx(&path, sheet.as_deref())?;
            let store = CaseDb::open(&db).await?;
            let rows = store
                .save_table(&table, "excel_import", WriteMode::Append)
                .await?;
            store.close().await;
            println!("Saved {rows} rows from {} to excel_import", path.display());
        }

        Commands::Manual { path, db } => {
            let table = caseflow_ingest::read_csv(&path)?;
            let store = CaseDb::open(&db).await?;
            let rows = store
                .save_table(&table, "manual_inputs", WriteMode::Append)
                .await?;
            store.close().await;
            println!("Saved {rows} rows from {} to manual_inputs", path.display());
        }

        Commands::Db { query, conn } => {
            let Some(conn) = conn else {
                bail!("No connection string provided. Set CASEFLOW_CONN or use --conn.");
            };
            let store = CaseDb::open_existing(&conn).await?;
            let table = store.query_to_table(&query).await?;
            store.close().await;
            report::write_summary_csv(&table, Path::new("db_query_summary.csv"))?;
            println!("Saved DB query summary to db_query_summary.csv");
        }

        Commands::Report { path, out } => {
            let table = caseflow_ingest::read_csv(&path)?;
            report::write_summary_csv(&table, &out)?;
            let prefix = out.with_extension("").display().to_string();
            let charts = report::plot_numeric_histograms(&table, &prefix)?;
            println!("Report saved to {} ({} charts)", out.display(), charts.len());
        }

        Commands::Template { path, format } => {
            let format = TemplateFormat::for_path(&path, format.map(Into::into));
            caseflow_ingest::write_template(&path, format)?;
            println!("Created template file: {}", path.display());
        }

        Commands::ImportTemplate { path, db } => {
            let count = caseflow_ingest::import_template_into(&path, &db).await?;
            println!("Imported {count} rows into database {}", db.display());
        }

        Commands::Add { db } => {
            add::run(&db).await?;
        }

        Commands::ReportCases {
            db,
            out_csv,
            out_prefix,
        } => {
            let outputs = report::aggregate_cases_report(&db, &out_csv, &out_prefix).await?;
            println!("Report written to {}", outputs.summary_csv.display());
            if !outputs.charts.is_empty() {
                println!("Generated charts:");
                for chart in &outputs.charts {
                    println!(" - {}", chart.display());
                }
            }
        }

        Commands::RunScheduler {
            db,
            drop,
            processed,
            failed,
            interval,
        } => {
            let config = SentinelConfig {
                db_path: db,
                drop_dir: drop,
                processed_dir: processed,
                failed_dir: failed,
                interval: Duration::from_secs(interval * 60),
            };
            println!(
                "Starting scheduler: watching {} every {} minute(s). Ctrl+C to stop.",
                config.drop_dir.display(),
                interval
            );
            caseflow_sentinel::run(config).await?;
        }
    }
    Ok(())
}
