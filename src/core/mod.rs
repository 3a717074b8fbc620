pub mod aggregator;
pub mod probe;
pub mod report;
pub mod scheduler;
pub mod shutdown;

pub use crate::domain::model::{
    DomainAvailability, DomainCounters, EndpointDescriptor, HttpMethod, ProbeOutcome, RoundReport,
    RunSummary,
};
pub use crate::domain::ports::{Prober, Reporter};
pub use crate::utils::error::Result;
