//! `follow-up`: reconcile a monitoring follow-up with its completion.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::{build_service, read_json, read_record};
use crate::cli::output::{format_value, output, readings_table, CommandOutput};
use crate::domain::models::{Config, FollowUpContext, TaskConfig};
use crate::services::FollowUpResolution;

#[derive(Args, Debug)]
pub struct FollowUpArgs {
    /// Completion record of the follow-up task (JSON object)
    #[arg(short, long)]
    pub record: PathBuf,
    /// Task configuration (JSON)
    #[arg(short, long)]
    pub task: PathBuf,
    /// Monitoring context holding the original reading (JSON)
    #[arg(short, long)]
    pub context: PathBuf,
    /// Asset directory mapping ids to names (JSON object)
    #[arg(long)]
    pub directory: Option<PathBuf>,
    /// Reading log dump to use instead of the configured log service
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct FollowUpOutput {
    #[serde(flatten)]
    pub resolution: FollowUpResolution,
    pub state: String,
    pub back_in_range: bool,
}

impl From<FollowUpResolution> for FollowUpOutput {
    fn from(resolution: FollowUpResolution) -> Self {
        Self {
            state: resolution.context.state().as_str().to_string(),
            back_in_range: resolution.is_back_in_range(),
            resolution,
        }
    }
}

impl CommandOutput for FollowUpOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Monitoring state: {}", self.state)];

        let rows: Vec<_> = [&self.resolution.original, &self.resolution.new]
            .into_iter()
            .flatten()
            .cloned()
            .collect();
        if !rows.is_empty() {
            lines.push(readings_table(&rows));
        }

        match (&self.resolution.original, &self.resolution.new) {
            (Some(original), Some(new)) => lines.push(format!(
                "{}: {} -> {}{}",
                original.reading.display_name(),
                format_value(original.reading.value),
                format_value(new.reading.value),
                if self.back_in_range { " (back in range)" } else { " (still out of range)" }
            )),
            (Some(_), None) => lines.push("No follow-up reading recorded yet.".to_string()),
            _ => {}
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: FollowUpArgs, config: &Config, json_mode: bool) -> Result<()> {
    let record = read_record(&args.record)?;
    let task: TaskConfig = read_json(&args.task)?;
    let context: FollowUpContext = read_json(&args.context)?;

    let service = build_service(config, args.log_file.as_ref(), args.directory.as_ref())?;
    let resolution = service.resolve_follow_up(&record, &task, &context).await?;

    output(&FollowUpOutput::from(resolution), json_mode);
    Ok(())
}
