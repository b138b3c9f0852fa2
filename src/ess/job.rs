//! ESS job descriptor

use serde::{Deserialize, Serialize};
use std::fmt;
use super::{ESS_PARAM_NULL, SUBMIT_OPERATION};

/// Request body for `submitESSJobRequest`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JobPayload {
    #[serde(rename = "OperationName")]
    pub operation_name: String,
    #[serde(rename = "JobPackageName")]
    pub job_package_name: String,
    #[serde(rename = "JobDefName")]
    pub job_def_name: String,
    #[serde(rename = "ESSParameters")]
    pub ess_parameters: String,
    /// Assigned by ESS; always null when submitting
    #[serde(rename = "ReqstId")]
    pub reqst_id: Option<String>,
}

/// A single Enterprise Scheduler job
///
/// Run it with [`EnterpriseScheduler::run`](super::EnterpriseScheduler::run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerJob {
    package: String,
    definition: String,
    parameters: Vec<String>,
}

impl SchedulerJob {
    /// Creates a new job with no parameters
    ///
    /// # Arguments
    ///
    /// * `package` - The package path of the job
    /// * `definition` - The job definition name inside the package
    ///
    /// # Example
    ///
    /// ```rust
    /// use oracloud_ess_sdk::ess::SchedulerJob;
    ///
    /// let mut job = SchedulerJob::new(
    ///     "/oracle/apps/ess/financials/commonModules/shared/common/interfaceLoader/",
    ///     "SyncBellNotifications",
    /// );
    /// job.add_parameter("PARAM1").add_parameter(None);
    /// assert_eq!(job.ess_parameter(), "PARAM1,#NULL");
    /// ```
    pub fn new(package: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            definition: definition.into(),
            parameters: Vec::new(),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Appends a positional parameter; `None` appends `#NULL`
    pub fn add_parameter<'a>(&mut self, parameter: impl Into<Option<&'a str>>) -> &mut Self {
        let parameter = parameter.into().unwrap_or(ESS_PARAM_NULL);
        self.parameters.push(parameter.to_string());
        self
    }

    /// Parameters joined by commas, or `#NULL` when there are none
    pub fn ess_parameter(&self) -> String {
        if self.parameters.is_empty() {
            return ESS_PARAM_NULL.to_string();
        }
        self.parameters.join(",")
    }

    /// Submission payload for this job
    pub fn payload(&self) -> JobPayload {
        JobPayload {
            operation_name: SUBMIT_OPERATION.to_string(),
            job_package_name: self.package.clone(),
            job_def_name: self.definition.clone(),
            ess_parameters: self.ess_parameter(),
            reqst_id: None,
        }
    }
}

impl fmt::Display for SchedulerJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.package.trim_end_matches('/'), self.definition)
    }
}
