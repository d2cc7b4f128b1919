//! Output formatting utilities for the CLI.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use console::style;
use serde::Serialize;

use crate::domain::models::{ComplianceStatus, EvaluatedReading, FollowUpDecision};

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Render a reading value; missing readings are shown explicitly.
pub fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "no reading".to_string(), |v| format!("{v}°"))
}

fn status_color(status: ComplianceStatus) -> Color {
    match status {
        ComplianceStatus::Ok => Color::Green,
        ComplianceStatus::Warning => Color::Yellow,
        ComplianceStatus::Failed => Color::Red,
    }
}

fn status_icon(status: ComplianceStatus) -> &'static str {
    match status {
        ComplianceStatus::Ok => "✓",
        ComplianceStatus::Warning => "⚠",
        ComplianceStatus::Failed => "✗",
    }
}

fn status_cell(reading: &EvaluatedReading) -> Cell {
    if !reading.reading.has_value() {
        return Cell::new("missing").fg(Color::DarkGrey);
    }
    if console::colors_enabled() {
        Cell::new(reading.status.as_str()).fg(status_color(reading.status))
    } else {
        Cell::new(format!("{} {}", status_icon(reading.status), reading.status))
    }
}

/// Table of evaluated readings.
pub fn readings_table(readings: &[EvaluatedReading]) -> String {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            ["Asset", "ID", "Reading", "Range", "Status", "Source"]
                .into_iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

    for evaluated in readings {
        let reading = &evaluated.reading;
        table.add_row(vec![
            Cell::new(reading.display_name()),
            Cell::new(reading.asset_id.as_deref().unwrap_or("-")),
            Cell::new(format_value(reading.value)),
            Cell::new(evaluated.range.map_or_else(|| "-".to_string(), |r| r.to_string())),
            status_cell(evaluated),
            Cell::new(reading.source.as_str()),
        ]);
    }

    table.to_string()
}

/// Headline and justification lines for a follow-up decision.
pub fn decision_lines(decision: &FollowUpDecision) -> Vec<String> {
    if !decision.is_required() {
        return vec![format!("{}", style("No follow-up required").green())];
    }

    let headline = if decision.awaiting_operator_choice {
        format!(
            "{} choose monitor, callout or both",
            style("Follow-up required:").red().bold()
        )
    } else if decision.requires_confirmation {
        format!("{} {}", style("Follow-up required:").red().bold(), decision.action)
    } else {
        format!("{} {}", style("Follow-up suggested:").yellow(), decision.action)
    };

    std::iter::once(headline)
        .chain(decision.reasons.iter().map(|r| format!("  - {r}")))
        .collect()
}
