//! BI Publisher report scheduler

use crate::error::Result;
use crate::pod::Pod;
use crate::transport::{HttpTransport, Transport};
use super::report::{envelope, BipReport, EmailOptions};
use super::SCHEDULE_REPORT_PATH;

/// Schedules BI Publisher reports through the ScheduleReport web service
///
/// Fire-and-forget: the response body is returned as-is and the scheduled
/// report is not monitored.
pub struct BipScheduler<T: Transport = HttpTransport> {
    pod: Pod,
    transport: T,
}

impl BipScheduler<HttpTransport> {
    pub fn new(pod: Pod) -> Self {
        let transport = HttpTransport::new(pod.credentials.clone());
        Self::with_transport(pod, transport)
    }
}

impl<T: Transport> BipScheduler<T> {
    pub fn with_transport(pod: Pod, transport: T) -> Self {
        Self { pod, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// ScheduleReport service endpoint
    pub fn schedule_report_url(&self) -> String {
        format!("{}/{}", self.pod.base_url(), SCHEDULE_REPORT_PATH)
    }

    /// Schedules `report` and emails the output
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use oracloud_ess_sdk::bip::{BipReport, BipScheduler, EmailOptions};
    /// use oracloud_ess_sdk::Pod;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let pod = Pod::new("https://server.oraclecloud.com", "username", "password");
    /// let scheduler = BipScheduler::new(pod);
    ///
    /// let report = BipReport::new("/Custom/Finance/Invoices.xdo");
    /// let response = scheduler
    ///     .email(&report, &EmailOptions::new("ap@example.com"))
    ///     .await?;
    /// println!("{}", response);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn email(&self, report: &BipReport, options: &EmailOptions) -> Result<String> {
        self.run(report, Some(options)).await
    }

    /// Schedules `report` with an optional delivery channel and returns the
    /// raw SOAP response
    pub async fn run(&self, report: &BipReport, delivery: Option<&EmailOptions>) -> Result<String> {
        let url = self.schedule_report_url();
        let payload = envelope(report, delivery)?;

        if self.pod.verbose {
            log::info!("Submitting {}", report.report_name());
            log::info!("Url: {}", url);
            log::info!("Payload: {}", payload);
        }

        let response = self.transport.post_xml(&url, payload).await?;
        if self.pod.verbose {
            log::info!("Response: {}", response.status);
        }

        let response = response.error_for_status().map_err(|e| {
            if self.pod.verbose {
                log::warn!("{}", e);
            }
            e
        })?;
        Ok(response.body)
    }
}
