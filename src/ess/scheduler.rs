//! Enterprise Scheduler: submit a job, then poll it to completion

use serde_json::Value;
use std::fmt::Display;
use tokio::time::sleep;
use crate::error::{Result, SdkError};
use crate::pod::Pod;
use crate::transport::{HttpTransport, RawResponse, Transport};
use super::job::SchedulerJob;
use super::{ERP_INTEGRATION_PATH, ERROR_STATUS_PREFIX, PROGRESS_STATUSES};

/// Enterprise Scheduler client
///
/// Drives one job at a time through submission and status polling. The
/// runner is reusable: each [`run`](Self::run) is independent, and only the
/// outcome of the last successful one is cached.
pub struct EnterpriseScheduler<T: Transport = HttpTransport> {
    pod: Pod,
    transport: T,
    run_request_id: Option<String>,
    run_status: Option<String>,
}

impl EnterpriseScheduler<HttpTransport> {
    /// Creates a new scheduler talking to the pod over HTTP
    ///
    /// # Example
    ///
    /// ```rust
    /// use oracloud_ess_sdk::{ess::EnterpriseScheduler, Pod};
    ///
    /// let pod = Pod::new("https://server.oraclecloud.com", "username", "password");
    /// let scheduler = EnterpriseScheduler::new(pod);
    /// assert_eq!(
    ///     scheduler.erp_integration_url(),
    ///     "https://server.oraclecloud.com/fscmRestApi/resources/11.13.18.05/erpintegrations"
    /// );
    /// ```
    pub fn new(pod: Pod) -> Self {
        let transport = HttpTransport::new(pod.credentials.clone());
        Self::with_transport(pod, transport)
    }
}

impl<T: Transport> EnterpriseScheduler<T> {
    /// Creates a scheduler on top of a custom transport
    pub fn with_transport(pod: Pod, transport: T) -> Self {
        Self {
            pod,
            transport,
            run_request_id: None,
            run_status: None,
        }
    }

    pub fn pod(&self) -> &Pod {
        &self.pod
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Request id of the last successful [`run`](Self::run)
    pub fn run_request_id(&self) -> Option<&str> {
        self.run_request_id.as_deref()
    }

    /// Final status of the last successful [`run`](Self::run)
    pub fn run_status(&self) -> Option<&str> {
        self.run_status.as_deref()
    }

    /// Statuses that keep the monitor polling
    pub fn progress_statuses(&self) -> &'static [&'static str] {
        &PROGRESS_STATUSES
    }

    /// Job submission endpoint
    pub fn erp_integration_url(&self) -> String {
        format!("{}/{}", self.pod.base_url(), ERP_INTEGRATION_PATH)
    }

    /// Status endpoint for `request_id`, restricted to the status field
    pub fn job_monitor_url(&self, request_id: &str) -> String {
        format!(
            "{}?finder=ESSJobStatusRF;requestId={}&onlyData=True&fields=RequestStatus",
            self.erp_integration_url(),
            request_id
        )
    }

    /// Submits the job and waits for its final status
    ///
    /// Returns `(request_id, status)`. Errors from either step are returned
    /// unchanged and leave the cached last-run state untouched.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use oracloud_ess_sdk::{ess::{EnterpriseScheduler, SchedulerJob}, Pod};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let pod = Pod::new("https://server.oraclecloud.com", "username", "password");
    /// let mut scheduler = EnterpriseScheduler::new(pod);
    ///
    /// let mut job = SchedulerJob::new("/oracle/apps/ess/custom/", "MyJob");
    /// job.add_parameter("300000001");
    ///
    /// let (request_id, status) = scheduler.run(&job).await?;
    /// println!("{} finished with {}", request_id, status);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(&mut self, job: &SchedulerJob) -> Result<(String, String)> {
        let request_id = self.submit(job).await?;
        let status = self.monitor(&request_id).await?;

        self.run_request_id = Some(request_id.clone());
        self.run_status = Some(status.clone());
        Ok((request_id, status))
    }

    /// Submits the job and returns the request id assigned by ESS
    pub async fn submit(&self, job: &SchedulerJob) -> Result<String> {
        self.try_submit(job).await.map_err(|e| self.report(e))
    }

    /// Polls `request_id` until it leaves the progress statuses
    ///
    /// Sleeps `poll_interval` seconds before every poll, including the first.
    /// Fails with [`SdkError::Timeout`] once `max_poll` polls have all come
    /// back in progress, and with [`SdkError::RemoteJob`] when the final
    /// status starts with `ERROR`.
    pub async fn monitor(&self, request_id: &str) -> Result<String> {
        self.try_monitor(request_id).await.map_err(|e| self.report(e))
    }

    /// Fails with [`SdkError::RemoteJob`] if `status` marks a failed job
    pub fn raise_for_job_status(&self, request_id: &str, status: &str) -> Result<()> {
        if status.starts_with(ERROR_STATUS_PREFIX) {
            return Err(SdkError::RemoteJob {
                request_id: request_id.to_string(),
                status: status.to_string(),
            });
        }
        Ok(())
    }

    fn is_in_progress(status: &str) -> bool {
        PROGRESS_STATUSES
            .iter()
            .any(|progress| progress.eq_ignore_ascii_case(status))
    }

    async fn try_submit(&self, job: &SchedulerJob) -> Result<String> {
        let url = self.erp_integration_url();
        let payload = serde_json::to_value(job.payload())?;

        self.display_message(format_args!("Submitting {}", job));
        self.display_message(format_args!("Url: {}", url));
        self.display_message(format_args!("Payload: {}", payload));

        let response = self.transport.post_json(&url, &payload).await?;
        self.display_message(format_args!("Response: {}", response.status));

        let body = parse_body(response.error_for_status()?)?;
        let request_id = extract_request_id(&body)?;
        self.display_message(format_args!("Request Id: {}", request_id));

        Ok(request_id)
    }

    async fn try_monitor(&self, request_id: &str) -> Result<String> {
        let url = self.job_monitor_url(request_id);
        let interval = self.pod.poll_interval();

        self.display_message(format_args!("Start monitoring request id {}", request_id));
        self.display_message(format_args!("Url: {}", url));
        self.display_message(format_args!("Max poll: {}", self.pod.max_poll));
        self.display_message(format_args!("Poll interval: {} sec", self.pod.poll_interval));

        for attempt in 1..=self.pod.max_poll {
            sleep(interval).await;

            let response = self.transport.get(&url).await?.error_for_status()?;
            let status = extract_request_status(&parse_body(response)?)?;
            self.display_message(format_args!(
                "Poll {}/{}: {}",
                attempt, self.pod.max_poll, status
            ));

            if !Self::is_in_progress(&status) {
                self.raise_for_job_status(request_id, &status)?;
                return Ok(status);
            }
        }

        Err(SdkError::Timeout {
            request_id: request_id.to_string(),
        })
    }

    fn display_message(&self, message: impl Display) {
        if self.pod.verbose {
            log::info!("{}", message);
        }
    }

    fn report(&self, error: SdkError) -> SdkError {
        if self.pod.verbose {
            log::warn!("{}", error);
        }
        error
    }
}

fn parse_body(response: RawResponse) -> Result<Value> {
    serde_json::from_str(&response.body)
        .map_err(|e| SdkError::MalformedResponse(format!("invalid JSON body: {}", e)))
}

fn extract_request_id(body: &Value) -> Result<String> {
    let request_id = match body.get("ReqstId") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => String::new(),
    };

    if request_id.is_empty() {
        return Err(SdkError::MalformedResponse(
            "submission response has no ReqstId".to_string(),
        ));
    }
    Ok(request_id)
}

fn extract_request_status(body: &Value) -> Result<String> {
    body.get("items")
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|item| item.get("RequestStatus"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            SdkError::MalformedResponse("status response has no items[0].RequestStatus".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::FakeTransport;
    use std::time::Duration;

    const BASE: &str = "https://server.oraclecloud.com";

    fn scheduler(max_poll: u32, fake: FakeTransport) -> EnterpriseScheduler<FakeTransport> {
        let pod = Pod::new(BASE, "username", "password")
            .with_max_poll(max_poll)
            .with_poll_interval(0);
        EnterpriseScheduler::with_transport(pod, fake)
    }

    fn job() -> SchedulerJob {
        let mut job = SchedulerJob::new("/oracle/apps/ess/custom/", "MyJob");
        job.add_parameter("P1");
        job
    }

    #[test]
    fn test_erp_integration_url() {
        let scheduler = scheduler(1, FakeTransport::new());
        assert_eq!(
            scheduler.erp_integration_url(),
            format!("{}/fscmRestApi/resources/11.13.18.05/erpintegrations", BASE)
        );
    }

    #[test]
    fn test_job_monitor_url() {
        let scheduler = scheduler(1, FakeTransport::new());
        assert_eq!(
            scheduler.job_monitor_url("123456"),
            format!(
                "{}/fscmRestApi/resources/11.13.18.05/erpintegrations\
                 ?finder=ESSJobStatusRF;requestId=123456&onlyData=True&fields=RequestStatus",
                BASE
            )
        );
    }

    #[test]
    fn test_progress_statuses() {
        let scheduler = scheduler(1, FakeTransport::new());
        assert_eq!(
            scheduler.progress_statuses(),
            ["WAIT", "BLOCKED", "RUNNING", "PAUSED", "COMPLETED", "READY"]
        );
    }

    #[test]
    fn test_raise_for_job_status() {
        let scheduler = scheduler(1, FakeTransport::new());
        assert!(scheduler.raise_for_job_status("1", "SUCCEEDED").is_ok());
        assert!(scheduler.raise_for_job_status("1", "WARNING").is_ok());
        assert!(matches!(
            scheduler.raise_for_job_status("1", "ERROR"),
            Err(SdkError::RemoteJob { .. })
        ));
    }

    #[tokio::test]
    async fn test_submit_posts_payload_and_returns_request_id() {
        let scheduler = scheduler(1, FakeTransport::new().submitted("98765"));

        let request_id = scheduler.submit(&job()).await.unwrap();
        assert_eq!(request_id, "98765");

        let calls = scheduler.transport().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "POST");
        assert_eq!(calls[0].url, scheduler.erp_integration_url());

        let body: Value = serde_json::from_str(&calls[0].body).unwrap();
        assert_eq!(body["OperationName"], "submitESSJobRequest");
        assert_eq!(body["JobDefName"], "MyJob");
        assert_eq!(body["ESSParameters"], "P1");
        assert_eq!(body["ReqstId"], Value::Null);
    }

    #[tokio::test]
    async fn test_submit_accepts_numeric_request_id() {
        let scheduler = scheduler(1, FakeTransport::new().respond(201, r#"{"ReqstId": 4242}"#));
        assert_eq!(scheduler.submit(&job()).await.unwrap(), "4242");
    }

    #[tokio::test]
    async fn test_submit_non_success_is_transport_error() {
        let scheduler = scheduler(1, FakeTransport::new().respond(401, "Unauthorized"));

        match scheduler.submit(&job()).await {
            Err(SdkError::Transport { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "Unauthorized");
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_malformed_responses() {
        for body in [r#"{}"#, r#"{"ReqstId": ""}"#, r#"{"ReqstId": null}"#, "<html/>"] {
            let scheduler = scheduler(1, FakeTransport::new().respond(200, body));
            let result = scheduler.submit(&job()).await;
            assert!(
                matches!(result, Err(SdkError::MalformedResponse(_))),
                "body {} gave {:?}",
                body,
                result
            );
        }
    }

    #[tokio::test]
    async fn test_monitor_returns_first_terminal_status() {
        let fake = FakeTransport::new().statuses(&["WAIT", "running", "SUCCEEDED", "RUNNING"]);
        let scheduler = scheduler(10, fake);

        let status = scheduler.monitor("77").await.unwrap();
        assert_eq!(status, "SUCCEEDED");
        assert_eq!(scheduler.transport().count("GET"), 3);

        let calls = scheduler.transport().calls();
        assert!(calls.iter().all(|c| c.url == scheduler.job_monitor_url("77")));
    }

    #[tokio::test]
    async fn test_completed_and_ready_keep_polling() {
        let fake = FakeTransport::new().statuses(&["COMPLETED", "Ready", "WARNING"]);
        let scheduler = scheduler(5, fake);

        assert_eq!(scheduler.monitor("1").await.unwrap(), "WARNING");
        assert_eq!(scheduler.transport().count("GET"), 3);
    }

    #[tokio::test]
    async fn test_monitor_remote_error_after_three_polls() {
        let fake = FakeTransport::new().statuses(&["RUNNING", "RUNNING", "ERROR_VALIDATION"]);
        let scheduler = scheduler(3, fake);

        match scheduler.monitor("555").await {
            Err(SdkError::RemoteJob { request_id, status }) => {
                assert_eq!(request_id, "555");
                assert_eq!(status, "ERROR_VALIDATION");
            }
            other => panic!("expected remote job error, got {:?}", other),
        }
        assert_eq!(scheduler.transport().count("GET"), 3);
    }

    #[tokio::test]
    async fn test_monitor_times_out_without_extra_poll() {
        let fake = FakeTransport::new().statuses(&["WAIT", "WAIT"]);
        let scheduler = scheduler(2, fake);

        let err = scheduler.monitor("556").await.unwrap_err();
        assert!(matches!(err, SdkError::Timeout { .. }));
        assert_eq!(err.request_id(), Some("556"));
        assert_eq!(scheduler.transport().count("GET"), 2);
    }

    #[tokio::test]
    async fn test_monitor_lowercase_error_is_not_a_failure() {
        let scheduler = scheduler(1, FakeTransport::new().statuses(&["error"]));
        assert_eq!(scheduler.monitor("1").await.unwrap(), "error");
    }

    #[tokio::test]
    async fn test_monitor_transport_fault_stops_polling() {
        let fake = FakeTransport::new()
            .statuses(&["RUNNING"])
            .respond(503, "Service Unavailable")
            .statuses(&["SUCCEEDED"]);
        let scheduler = scheduler(5, fake);

        let err = scheduler.monitor("1").await.unwrap_err();
        assert!(err.is_server_error());
        assert_eq!(scheduler.transport().count("GET"), 2);
    }

    #[tokio::test]
    async fn test_monitor_malformed_status_body() {
        for body in [r#"{"items": []}"#, r#"{"items": [{}]}"#, r#"{"count": 0}"#] {
            let scheduler = scheduler(3, FakeTransport::new().respond(200, body));
            let result = scheduler.monitor("1").await;
            assert!(matches!(result, Err(SdkError::MalformedResponse(_))), "{}", body);
            assert_eq!(scheduler.transport().count("GET"), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_sleeps_before_first_poll() {
        let pod = Pod::new(BASE, "u", "p").with_max_poll(2).with_poll_interval(10);
        let fake = FakeTransport::new().statuses(&["RUNNING", "SUCCEEDED"]);
        let scheduler = EnterpriseScheduler::with_transport(pod, fake);

        let started = tokio::time::Instant::now();
        scheduler.monitor("1").await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(20));
    }

    #[tokio::test]
    async fn test_run_returns_and_caches_outcome() {
        let fake = FakeTransport::new().submitted("1001").statuses(&["READY", "SUCCEEDED"]);
        let mut scheduler = scheduler(5, fake);
        assert_eq!(scheduler.run_request_id(), None);
        assert_eq!(scheduler.run_status(), None);

        let (request_id, status) = scheduler.run(&job()).await.unwrap();
        assert_eq!(request_id, "1001");
        assert_eq!(status, "SUCCEEDED");
        assert_eq!(scheduler.run_request_id(), Some("1001"));
        assert_eq!(scheduler.run_status(), Some("SUCCEEDED"));
        assert_eq!(scheduler.transport().count("POST"), 1);
        assert_eq!(scheduler.transport().count("GET"), 2);
    }

    #[tokio::test]
    async fn test_failed_run_keeps_previous_outcome() {
        let fake = FakeTransport::new()
            .submitted("1")
            .statuses(&["SUCCEEDED"])
            .submitted("2")
            .statuses(&["ERROR"]);
        let mut scheduler = scheduler(1, fake);

        scheduler.run(&job()).await.unwrap();
        let err = scheduler.run(&job()).await.unwrap_err();

        assert_eq!(err.request_id(), Some("2"));
        assert_eq!(scheduler.run_request_id(), Some("1"));
        assert_eq!(scheduler.run_status(), Some("SUCCEEDED"));
    }

    #[tokio::test]
    async fn test_run_submission_failure_skips_monitoring() {
        let fake = FakeTransport::new().respond(500, "boom");
        let mut scheduler = scheduler(3, fake);

        let err = scheduler.run(&job()).await.unwrap_err();
        assert!(matches!(err, SdkError::Transport { status: 500, .. }));
        assert_eq!(scheduler.transport().count("GET"), 0);
    }

    #[tokio::test]
    async fn test_verbose_does_not_change_outcome() {
        let pod = Pod::new(BASE, "u", "p")
            .with_max_poll(1)
            .with_poll_interval(0)
            .with_verbose(true);
        let fake = FakeTransport::new().submitted("9").statuses(&["WAIT"]);
        let mut scheduler = EnterpriseScheduler::with_transport(pod, fake);

        let err = scheduler.run(&job()).await.unwrap_err();
        assert!(matches!(err, SdkError::Timeout { ref request_id } if request_id == "9"));
    }
}
