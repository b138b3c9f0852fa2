//! Connection configuration for an Oracle Cloud pod
//!
//! A [`Pod`] carries everything the schedulers need to reach a remote
//! environment: the base URL, the basic-auth credentials and the polling
//! settings used while monitoring a job.

use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use url::Url;
use crate::error::{Result, SdkError};

/// Default number of status polls before giving up on a job
pub const DEFAULT_MAX_POLL: u32 = 500;

/// Default wait between status polls, in seconds
pub const DEFAULT_POLL_INTERVAL: u64 = 10;

/// Basic-auth credentials for a pod
///
/// The password is never printed: `Debug` shows a masked username and a
/// fixed placeholder instead.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// Username with everything past the first two characters hidden
    pub fn masked_username(&self) -> String {
        let visible: String = self.username.chars().take(2).collect();
        let hidden = self.username.chars().count().saturating_sub(2);
        format!("{}{}", visible, "*".repeat(hidden))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.masked_username())
            .field("password", &"****")
            .finish()
    }
}

/// Pod configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Pod {
    /// Base URL of the pod (e.g. "https://server.oraclecloud.com")
    pub url: String,
    /// Basic-auth credentials
    #[serde(flatten)]
    pub credentials: Credentials,
    /// Emit diagnostic log records while submitting and polling
    #[serde(default)]
    pub verbose: bool,
    /// Maximum number of status polls
    #[serde(default = "default_max_poll")]
    pub max_poll: u32,
    /// Wait before each status poll, in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

fn default_max_poll() -> u32 {
    DEFAULT_MAX_POLL
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL
}

impl Pod {
    /// Creates a pod configuration with default polling settings
    ///
    /// # Example
    ///
    /// ```rust
    /// use oracloud_ess_sdk::Pod;
    ///
    /// let pod = Pod::new("https://server.oraclecloud.com", "username", "password")
    ///     .with_max_poll(30)
    ///     .with_poll_interval(5);
    /// assert_eq!(pod.max_poll, 30);
    /// ```
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            credentials: Credentials::new(username, password),
            verbose: false,
            max_poll: DEFAULT_MAX_POLL,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_max_poll(mut self, max_poll: u32) -> Self {
        self.max_poll = max_poll;
        self
    }

    pub fn with_poll_interval(mut self, seconds: u64) -> Self {
        self.poll_interval = seconds;
        self
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - ESS_URL (required)
    /// - ESS_USERNAME (required)
    /// - ESS_PASSWORD (required)
    /// - ESS_VERBOSE (optional, "true"/"1", default: false)
    /// - ESS_MAX_POLL (optional, default: 500)
    /// - ESS_POLL_INTERVAL (optional, seconds, default: 10)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| {
                SdkError::InvalidConfig(format!("{} environment variable not set", key))
            })
        };

        let mut pod = Self::new(
            required("ESS_URL")?,
            required("ESS_USERNAME")?,
            required("ESS_PASSWORD")?,
        );

        if let Some(verbose) = lookup("ESS_VERBOSE") {
            pod.verbose = matches!(verbose.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(max_poll) = lookup("ESS_MAX_POLL") {
            pod.max_poll = max_poll
                .parse()
                .map_err(|_| SdkError::InvalidConfig(format!("ESS_MAX_POLL: '{}'", max_poll)))?;
        }
        if let Some(interval) = lookup("ESS_POLL_INTERVAL") {
            pod.poll_interval = interval.parse().map_err(|_| {
                SdkError::InvalidConfig(format!("ESS_POLL_INTERVAL: '{}'", interval))
            })?;
        }

        pod.validate()?;
        Ok(pod)
    }

    /// Checks that the configuration can be used to reach a pod
    pub fn validate(&self) -> Result<()> {
        Url::parse(self.base_url())?;

        if self.credentials.username().is_empty() {
            return Err(SdkError::InvalidConfig("username must not be empty".to_string()));
        }
        if self.max_poll == 0 {
            return Err(SdkError::InvalidConfig("max_poll must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }
}
