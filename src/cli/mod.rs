//! Command-line surface: argument parsing and dispatch to entities and renderers.

use std::borrow::Cow;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::config;
use crate::entities::context::ContextFlags;
use crate::entities::lookup::MatchMode;
use crate::entities::report::{LookupInput, LookupReport, LookupRequest, lookup};
use crate::entities::symptom::SymptomTable;
use crate::error::SymptomRxError;
use crate::render;
use crate::render::export::ExportFormat;

pub mod log;

#[derive(Parser, Debug)]
#[command(
    name = "symptomrx",
    version,
    about = "Look up likely conditions, OTC medication, and cautions for a symptom"
)]
pub struct Cli {
    /// Print JSON instead of Markdown
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ContextArgs {
    /// Currently pregnant
    #[arg(long)]
    pub pregnant: bool,

    /// Has liver disease
    #[arg(long)]
    pub liver_disease: bool,

    /// Has kidney disease
    #[arg(long)]
    pub kidney_disease: bool,

    /// Takes an anticoagulant
    #[arg(long)]
    pub anticoagulant: bool,

    /// Takes an MAOI or SSRI
    #[arg(long)]
    pub maoi_ssri: bool,
}

impl From<ContextArgs> for ContextFlags {
    fn from(args: ContextArgs) -> Self {
        Self {
            pregnant: args.pregnant,
            liver_disease: args.liver_disease,
            kidney_disease: args.kidney_disease,
            anticoagulant: args.anticoagulant,
            maoi_ssri: args.maoi_ssri,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Free-text description used for hint ranking and red-flag checks
    #[arg(long)]
    pub detail: Option<String>,

    /// Age in years (1-120), echoed in the result
    #[arg(long)]
    pub age: Option<u32>,

    /// CSV symptom table (default: $SYMPTOMRX_TABLE or the built-in table)
    #[arg(long)]
    pub table: Option<PathBuf>,

    #[command(flatten)]
    pub context: ContextArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Match a free-text symptom against the table
    Lookup {
        /// Symptom text, e.g. "두통" or "어제부터 두통이랑 기침"
        text: String,

        /// Matching rule (default: $SYMPTOMRX_MATCH or substring)
        #[arg(long = "match", value_enum)]
        mode: Option<MatchMode>,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Look up one or more exact symptom keys
    Select {
        /// Symptom keys from `symptomrx list`
        #[arg(required = true)]
        symptoms: Vec<String>,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// List the symptoms in the table
    List {
        /// CSV symptom table (default: $SYMPTOMRX_TABLE or the built-in table)
        #[arg(long)]
        table: Option<PathBuf>,
    },

    /// Export a lookup as a JSON summary or a CSV of recommended drugs
    Export {
        /// Symptom text (omit when using --select)
        #[arg(conflicts_with = "select", required_unless_present = "select")]
        text: Option<String>,

        /// Exact symptom keys instead of free text
        #[arg(long, num_args = 1..)]
        select: Vec<String>,

        /// Matching rule for free text (default: $SYMPTOMRX_MATCH or substring)
        #[arg(long = "match", value_enum)]
        mode: Option<MatchMode>,

        /// Payload format
        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Manage the local symptom log
    Log {
        #[command(subcommand)]
        command: log::LogCommand,
    },
}

fn load_table(flag: Option<PathBuf>) -> Result<Cow<'static, SymptomTable>, SymptomRxError> {
    match config::table_path(flag) {
        Some(path) => Ok(Cow::Owned(SymptomTable::from_csv_path(&path)?)),
        None => Ok(Cow::Borrowed(SymptomTable::builtin()?)),
    }
}

fn run_lookup(input: LookupInput, query: QueryArgs) -> Result<LookupReport, SymptomRxError> {
    let table = load_table(query.table)?;
    lookup(
        &table,
        LookupRequest {
            input,
            detail: query.detail,
            age: query.age,
            flags: query.context.into(),
        },
    )
}

fn render_report(report: &LookupReport, json_output: bool) -> Result<String, SymptomRxError> {
    if json_output {
        render::json::to_pretty(report)
    } else {
        render::markdown::lookup_markdown(report)
    }
}

async fn export(
    report: &LookupReport,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<String, SymptomRxError> {
    let payload = match format {
        ExportFormat::Json => {
            let timestamp = render::export::now_rfc3339()?;
            render::json::to_pretty(&render::export::export_report(report, timestamp))?
        }
        ExportFormat::Csv => render::export::drug_rows_csv(report)?,
    };
    let Some(path) = output else {
        return Ok(payload);
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(&path, payload.as_bytes()).await?;
    debug!(path = %path.display(), bytes = payload.len(), "wrote export");
    Ok(format!("Exported to {}", path.display()))
}

pub async fn run(cli: Cli) -> anyhow::Result<String> {
    let json_output = cli.json;
    match cli.command {
        Commands::Lookup { text, mode, query } => {
            let mode = config::match_mode(mode)?;
            let report = run_lookup(LookupInput::Text { input: text, mode }, query)?;
            Ok(render_report(&report, json_output)?)
        }
        Commands::Select { symptoms, query } => {
            let report = run_lookup(LookupInput::Selected(symptoms), query)?;
            Ok(render_report(&report, json_output)?)
        }
        Commands::List { table } => {
            let table = load_table(table)?;
            if json_output {
                return Ok(render::json::to_pretty(&table.records())?);
            }
            Ok(render::markdown::table_markdown(&table)?)
        }
        Commands::Export {
            text,
            select,
            mode,
            format,
            output,
            query,
        } => {
            let input = match text {
                Some(input) => LookupInput::Text {
                    input,
                    mode: config::match_mode(mode)?,
                },
                None => LookupInput::Selected(select),
            };
            let report = run_lookup(input, query)?;
            Ok(export(&report, format, output).await?)
        }
        Commands::Log { command } => log::run(command, json_output).await,
    }
}
