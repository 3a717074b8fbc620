pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, ReportFormat};

pub use config::EndpointList;
pub use core::{
    aggregator::AvailabilityAggregator,
    probe::HttpProber,
    report::{ConsoleReporter, JsonReporter},
    scheduler::RoundScheduler,
};
pub use domain::model::{EndpointDescriptor, ProbeOutcome, RoundReport, RunSummary};
pub use utils::error::{MonitorError, Result};
