//! `evaluate`: resolve, classify and decide for one completion.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::{build_service, read_json, read_record};
use crate::cli::output::{decision_lines, output, readings_table, CommandOutput};
use crate::domain::models::{Config, FollowUpContext, TaskConfig};
use crate::services::ComplianceReport;

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Completion record (JSON object)
    #[arg(short, long)]
    pub record: PathBuf,
    /// Task configuration (JSON): assets, template defaults, thresholds
    #[arg(short, long)]
    pub task: PathBuf,
    /// Follow-up context of the task being evaluated (JSON)
    #[arg(long)]
    pub context: Option<PathBuf>,
    /// Asset directory mapping ids to names (JSON object)
    #[arg(long)]
    pub directory: Option<PathBuf>,
    /// Reading log dump to use instead of the configured log service
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct EvaluateOutput {
    #[serde(flatten)]
    pub report: ComplianceReport,
    pub failed: usize,
    pub missing: usize,
}

impl From<ComplianceReport> for EvaluateOutput {
    fn from(report: ComplianceReport) -> Self {
        Self {
            failed: report.failed_count(),
            missing: report.missing_count(),
            report,
        }
    }
}

impl CommandOutput for EvaluateOutput {
    fn to_human(&self) -> String {
        if self.report.readings.is_empty() {
            let mut lines = vec!["No readings found.".to_string()];
            lines.extend(decision_lines(&self.report.decision));
            return lines.join("\n");
        }

        let mut lines = vec![
            readings_table(&self.report.readings),
            format!(
                "{} reading(s), {} failed, {} missing",
                self.report.readings.len(),
                self.failed,
                self.missing
            ),
        ];
        lines.extend(decision_lines(&self.report.decision));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: EvaluateArgs, config: &Config, json_mode: bool) -> Result<()> {
    let record = read_record(&args.record)?;
    let task: TaskConfig = read_json(&args.task)?;
    let context: FollowUpContext = match &args.context {
        Some(path) => read_json(path)?,
        None => FollowUpContext::none(),
    };

    let service = build_service(config, args.log_file.as_ref(), args.directory.as_ref())?;
    let report = service.evaluate_completion(&record, &task, &context).await;

    output(&EvaluateOutput::from(report), json_mode);
    Ok(())
}
