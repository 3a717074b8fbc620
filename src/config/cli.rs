use crate::core::probe::DEFAULT_TIMEOUT;
use crate::utils::error::{MonitorError, Result};
use crate::utils::validation::{
    validate_path, validate_positive_number, validate_range, validate_required_field, Validate,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "small-uptime")]
#[command(about = "Periodically probes HTTP endpoints and reports per-domain availability")]
pub struct CliConfig {
    /// Path to the YAML/JSON endpoint list; prompted for when omitted
    #[arg(short, long, env = "ENDPOINTS_FILE")]
    pub endpoints: Option<String>,

    /// Seconds to wait between rounds
    #[arg(short, long, env = "INTERVAL")]
    pub interval: Option<u64>,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_millis() as u64)]
    pub timeout_ms: u64,

    /// Responses slower than this are counted as failures
    #[arg(long)]
    pub latency_ceiling_ms: Option<u64>,

    /// Stop after this many rounds instead of running until interrupted
    #[arg(long)]
    pub rounds: Option<u64>,

    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    pub fn interval(&self) -> Result<Duration> {
        let seconds = validate_required_field("interval", &self.interval)?;
        Ok(Duration::from_secs(*seconds))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn latency_ceiling(&self) -> Option<Duration> {
        self.latency_ceiling_ms.map(Duration::from_millis)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.interval()?;

        validate_positive_number("timeout_ms", self.timeout_ms, 1)?;

        if let Some(ceiling) = self.latency_ceiling_ms {
            validate_range("latency_ceiling_ms", ceiling, 1, self.timeout_ms)?;
        }

        if let Some(rounds) = self.rounds {
            validate_positive_number("rounds", rounds, 1)?;
        }

        if let Some(path) = &self.endpoints {
            validate_path("endpoints", path)?;
        }

        Ok(())
    }
}

/// 互動式詢問端點檔案路徑
pub fn prompt_for_path<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    write!(output, "Enter the file path: ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(MonitorError::MissingConfigError {
            field: "endpoints".to_string(),
        });
    }

    let path = line.trim().to_string();
    validate_path("endpoints", &path)?;
    Ok(path)
}
