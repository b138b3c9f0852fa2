//! BI Publisher report scheduling over SOAP
//!
//! [`envelope`] maps a [`BipReport`] and its delivery options to a SOAP 1.2
//! `scheduleReport` request; [`BipScheduler`] posts it to the pod.

mod report;
mod scheduler;

pub use report::{envelope, BipReport, EmailOptions};
pub use scheduler::BipScheduler;

/// SOAP 1.2 envelope namespace
pub const SOAP_NS: &str = "http://www.w3.org/2003/05/soap-envelope";

/// ScheduleReportService namespace
pub const SCH_NS: &str = "http://xmlns.oracle.com/oxp/service/ScheduleReportService";

/// ScheduleReport web service, relative to the pod base URL
pub const SCHEDULE_REPORT_PATH: &str = "xmlpserver/services/ScheduleReportWSSService";

/// Sender used when email options do not name one
pub const DEFAULT_EMAIL_FROM: &str = "noreply@oracle.com";
