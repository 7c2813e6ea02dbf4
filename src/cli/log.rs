use std::path::PathBuf;

use clap::Subcommand;

use crate::config;
use crate::entities::log::{LogEntry, LogStore};
use crate::render;

#[derive(Subcommand, Debug, Clone)]
pub enum LogCommand {
    /// Append one symptom record (name, age, symptoms) to the log file
    Add {
        /// Person the symptoms belong to
        #[arg(long)]
        name: String,

        /// Age in years (1-120)
        #[arg(long)]
        age: u32,

        /// Symptom; repeat the flag or pass a comma-separated list
        #[arg(long = "symptom", required = true, value_delimiter = ',')]
        symptoms: Vec<String>,

        /// Log file path (default: $SYMPTOMRX_LOG or the user data dir)
        #[arg(long)]
        log: Option<PathBuf>,
    },

    /// Show every saved record
    List {
        /// Log file path (default: $SYMPTOMRX_LOG or the user data dir)
        #[arg(long)]
        log: Option<PathBuf>,
    },

    /// Delete the whole log file
    Clear {
        /// Log file path (default: $SYMPTOMRX_LOG or the user data dir)
        #[arg(long)]
        log: Option<PathBuf>,
    },
}

pub async fn run(command: LogCommand, json_output: bool) -> anyhow::Result<String> {
    match command {
        LogCommand::Add {
            name,
            age,
            symptoms,
            log,
        } => {
            let store = LogStore::new(config::log_path(log));
            let entry = LogEntry::new(&name, age, &symptoms)?;
            let entries = store.append(entry).await?;
            if json_output {
                return Ok(render::json::to_pretty(&entries)?);
            }
            Ok(format!(
                "저장했어요: {} ({}건, {})",
                name.trim(),
                entries.len(),
                store.path().display()
            ))
        }
        LogCommand::List { log } => {
            let store = LogStore::new(config::log_path(log));
            let entries = store.load().await?;
            if json_output {
                return Ok(render::json::to_pretty(&entries)?);
            }
            Ok(render::markdown::log_markdown(&entries, store.path())?)
        }
        LogCommand::Clear { log } => {
            let store = LogStore::new(config::log_path(log));
            let removed = store.clear().await?;
            if json_output {
                return Ok(render::json::to_pretty(&serde_json::json!({
                    "removed": removed,
                    "path": store.path().display().to_string(),
                }))?);
            }
            if removed {
                Ok(format!("기록을 삭제했어요. ({})", store.path().display()))
            } else {
                Ok(format!("삭제할 기록이 없어요. ({})", store.path().display()))
            }
        }
    }
}
