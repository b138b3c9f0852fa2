//! Enterprise Scheduling Service (ESS) job submission and monitoring

mod job;
mod scheduler;

pub use job::{JobPayload, SchedulerJob};
pub use scheduler::EnterpriseScheduler;

/// Literal ESS uses for "no value" in a positional job parameter
pub const ESS_PARAM_NULL: &str = "#NULL";

/// Operation name sent with every job submission
pub const SUBMIT_OPERATION: &str = "submitESSJobRequest";

/// ERP integration resource, relative to the pod base URL
pub const ERP_INTEGRATION_PATH: &str = "fscmRestApi/resources/11.13.18.05/erpintegrations";

/// Statuses that keep the monitor polling, compared case-insensitively.
///
/// ESS reports `COMPLETED` and `READY` for intermediate states too, so they
/// are not terminal here.
pub const PROGRESS_STATUSES: [&str; 6] = ["WAIT", "BLOCKED", "RUNNING", "PAUSED", "COMPLETED", "READY"];

/// Prefix marking a terminal status as a failed job
pub const ERROR_STATUS_PREFIX: &str = "ERROR";
