//! Schedules a BI Publisher report and emails the output

use oracloud_ess_sdk::bip::{BipReport, BipScheduler, EmailOptions};
use oracloud_ess_sdk::Pod;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let pod = Pod::from_env()?;
    let scheduler = BipScheduler::new(pod);

    let mut report = BipReport::new("/Custom/Finance/Invoices.xdo").with_format("xlsx");
    report.add_param("P_BUSINESS_UNIT", "US1 Business Unit");

    let options = EmailOptions::new("ap-team@example.com")
        .cc("controller@example.com")
        .body("Daily invoice extract attached.");

    let response = scheduler.email(&report, &options).await?;
    println!("ScheduleReport response:\n{}", response);

    Ok(())
}
