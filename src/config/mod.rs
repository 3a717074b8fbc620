#[cfg(feature = "cli")]
pub mod cli;
pub mod endpoints;

#[cfg(feature = "cli")]
pub use cli::{prompt_for_path, CliConfig, ReportFormat};
pub use endpoints::EndpointList;
