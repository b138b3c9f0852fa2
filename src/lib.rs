//! # Oracle Cloud ESS Rust SDK
//!
//! This crate provides a Rust SDK for running jobs on the Oracle Cloud
//! Enterprise Scheduling Service (ESS) and for scheduling BI Publisher reports.
//!
//! ## Features
//!
//! - **Enterprise Scheduler**: Submit an ESS job and poll it to a final status
//! - **BI Publisher**: Schedule reports and email their output over SOAP
//! - **Pluggable transport**: Basic-auth HTTP by default, replaceable for tests
//!
//! ## Quick Start
//!
//! ### Running an ESS job
//!
//! ```rust,no_run
//! use oracloud_ess_sdk::ess::{EnterpriseScheduler, SchedulerJob};
//! use oracloud_ess_sdk::Pod;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pod = Pod::new("https://server.oraclecloud.com", "username", "password")
//!         .with_poll_interval(30);
//!     let mut scheduler = EnterpriseScheduler::new(pod);
//!
//!     let mut job = SchedulerJob::new(
//!         "/oracle/apps/ess/financials/commonModules/shared/common/interfaceLoader/",
//!         "SyncBellNotifications",
//!     );
//!     job.add_parameter(None);
//!
//!     let (request_id, status) = scheduler.run(&job).await?;
//!     println!("Request {} finished: {}", request_id, status);
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Handling job outcomes
//!
//! A job that is still running when polling gives up, or that finishes with
//! an `ERROR*` status, comes back as an error carrying its request id:
//!
//! ```rust,no_run
//! use oracloud_ess_sdk::prelude::*;
//!
//! # async fn example(scheduler: &mut EnterpriseScheduler, job: &SchedulerJob) {
//! match scheduler.run(job).await {
//!     Ok((id, status)) => println!("{} -> {}", id, status),
//!     Err(SdkError::Timeout { request_id }) => println!("{} still running", request_id),
//!     Err(SdkError::RemoteJob { request_id, status }) => println!("{} failed: {}", request_id, status),
//!     Err(e) => println!("error: {}", e),
//! }
//! # }
//! ```

pub mod bip;
pub mod error;
pub mod ess;
pub mod pod;
pub mod transport;

pub use error::{Result, SdkError};
pub use pod::{Credentials, Pod};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::bip::{BipReport, BipScheduler, EmailOptions};
    pub use crate::error::{Result, SdkError};
    pub use crate::ess::{EnterpriseScheduler, SchedulerJob};
    pub use crate::pod::Pod;
    pub use crate::transport::{HttpTransport, RawResponse, Transport};
}
