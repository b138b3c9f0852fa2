//! Submits an ESS job and waits for it to finish
//!
//! Reads the pod from ESS_URL, ESS_USERNAME and ESS_PASSWORD (plus the
//! optional ESS_VERBOSE, ESS_MAX_POLL and ESS_POLL_INTERVAL).
//! Run with `RUST_LOG=info ESS_VERBOSE=1` to see each poll.

use oracloud_ess_sdk::ess::{EnterpriseScheduler, SchedulerJob};
use oracloud_ess_sdk::{Pod, SdkError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let pod = Pod::from_env()?;
    println!("Pod: {:?}", pod);

    let mut scheduler = EnterpriseScheduler::new(pod);

    let mut job = SchedulerJob::new(
        "/oracle/apps/ess/financials/commonModules/shared/common/interfaceLoader/",
        "SyncBellNotifications",
    );
    job.add_parameter(None);

    println!("Submitting {} with parameters {}", job, job.ess_parameter());

    match scheduler.run(&job).await {
        Ok((request_id, status)) => {
            println!("Request {} finished with status {}", request_id, status);
        }
        Err(SdkError::Timeout { request_id }) => {
            println!("Request {} is still running, check it later", request_id);
        }
        Err(SdkError::RemoteJob { request_id, status }) => {
            eprintln!("Request {} failed with status {}", request_id, status);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
