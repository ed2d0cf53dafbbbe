//! Campaign module: drives a run from the loaded recipients to the summary.

mod orchestrator;
mod shutdown;
mod summary;

pub use orchestrator::{Campaign, CampaignSettings};
pub use shutdown::Shutdown;
pub use summary::{RunReport, RunSummary};
