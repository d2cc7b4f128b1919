//! Completion record model.
//!
//! A completion record is the untyped key/value bag a task completion
//! stores. Readings can sit under any of several shapes; this type only
//! gives typed access to the fields whose meaning is fixed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::normalize::{first_text, parse_timestamp, sanitize_identifier};

pub const EQUIPMENT_LIST_FIELD: &str = "equipment_list";
pub const TEMPERATURES_FIELD: &str = "temperatures";
pub const KEYED_FIELD_PREFIX: &str = "temp_";

/// Top-level keys with structural meaning. Never treated as asset ids or
/// heuristic reading keys.
pub const RESERVED_FIELDS: &[&str] = &[
    "equipment_list",
    "temperatures",
    "id",
    "task_id",
    "template_id",
    "site_id",
    "value",
    "status",
    "notes",
    "comments",
    "photos",
    "attachments",
    "signature",
    "completed_at",
    "completed_by",
    "recorded_by",
    "created_at",
    "updated_at",
    "pass_fail",
    "result",
    "flag_reason",
    "tempAction",
    "checklist",
    "follow_up",
];

/// Manually recorded pass/fail outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualResult {
    Pass,
    Fail,
}

impl ManualResult {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pass" | "passed" | "ok" | "yes" => Some(Self::Pass),
            "fail" | "failed" | "no" => Some(Self::Fail),
            _ => None,
        }
    }
}

/// Operator's choice of follow-up when one is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorChoice {
    Monitor,
    Callout,
    Both,
}

impl OperatorChoice {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "monitor" | "monitoring" => Some(Self::Monitor),
            "callout" | "call_out" | "contractor" => Some(Self::Callout),
            "both" | "monitor_and_callout" => Some(Self::Both),
            _ => None,
        }
    }
}

/// A checklist or yes/no item recorded on the completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub response: Option<Value>,
}

impl ChecklistItem {
    /// Required item left blank or answered negatively.
    pub fn is_unsatisfied(&self) -> bool {
        if !self.required {
            return false;
        }
        match &self.response {
            None | Some(Value::Null) => true,
            Some(Value::Bool(answer)) => !answer,
            Some(Value::String(s)) => {
                let s = s.trim().to_lowercase();
                s.is_empty() || s == "no" || s == "false" || s == "fail"
            }
            Some(Value::Array(items)) => items.is_empty(),
            Some(_) => false,
        }
    }
}

/// Untyped completion data for one task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionRecord {
    fields: Map<String, Value>,
}

impl CompletionRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Build from any JSON value; only objects are accepted.
    pub fn from_value(value: Value) -> DomainResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(DomainError::InvalidRecord(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn equipment_list(&self) -> Option<&Vec<Value>> {
        self.fields.get(EQUIPMENT_LIST_FIELD).and_then(Value::as_array)
    }

    pub fn temperatures(&self) -> Option<&Vec<Value>> {
        self.fields.get(TEMPERATURES_FIELD).and_then(Value::as_array)
    }

    /// The record overlaid on template defaults. Record values win.
    pub fn merged_with_defaults(&self, defaults: &Map<String, Value>) -> Map<String, Value> {
        let mut merged = defaults.clone();
        for (key, value) in &self.fields {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    pub fn recorded_by(&self) -> Option<String> {
        first_text(&self.fields, &["recorded_by", "completed_by"])
    }

    pub fn site_id(&self) -> Option<String> {
        match self.fields.get("site_id")? {
            Value::String(s) => sanitize_identifier(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.fields.get("completed_at").and_then(parse_timestamp)
    }

    pub fn manual_result(&self) -> Option<ManualResult> {
        ["pass_fail", "result"]
            .iter()
            .filter_map(|field| self.fields.get(*field))
            .find_map(|value| match value {
                Value::String(s) => ManualResult::from_str(s),
                Value::Bool(true) => Some(ManualResult::Pass),
                Value::Bool(false) => Some(ManualResult::Fail),
                _ => None,
            })
    }

    pub fn operator_choice(&self) -> Option<OperatorChoice> {
        ["flag_reason", "tempAction"]
            .iter()
            .filter_map(|field| self.fields.get(*field))
            .find_map(|value| value.as_str().and_then(OperatorChoice::from_str))
    }

    /// Checklist items; malformed entries are skipped.
    pub fn checklist(&self) -> Vec<ChecklistItem> {
        self.fields
            .get("checklist")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
