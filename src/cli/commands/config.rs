//! `config`: show the effective configuration.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct ConfigArgs {}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub config: Config,
    pub log_source_authenticated: bool,
}

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        let mut rendered = serde_yaml::to_string(&self.config).unwrap_or_default();
        if self.log_source_authenticated {
            rendered.push_str("# log_source.api_key is set\n");
        }
        rendered.trim_end().to_string()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(_args: ConfigArgs, config: &Config, json_mode: bool) -> Result<()> {
    output(
        &ConfigOutput {
            log_source_authenticated: config.log_source.api_key.is_some(),
            config: config.clone(),
        },
        json_mode,
    );
    Ok(())
}
