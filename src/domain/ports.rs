use crate::domain::model::{EndpointDescriptor, ProbeOutcome, RoundReport};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Issues one request for one endpoint and classifies it.
///
/// Implementations never fail: transport problems become unsuccessful outcomes.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, endpoint: &EndpointDescriptor) -> ProbeOutcome;
}

pub trait Reporter: Send {
    fn round_started(&mut self, round: u64) -> Result<()>;
    fn round_finished(&mut self, report: &RoundReport) -> Result<()>;
    fn round_separator(&mut self) -> Result<()>;
}
