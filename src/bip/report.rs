//! BI Publisher report request and SOAP envelope mapping

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use crate::error::{Result, SdkError};
use super::{DEFAULT_EMAIL_FROM, SCH_NS, SOAP_NS};

/// A BI Publisher report to schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BipReport {
    report_name: String,
    format: String,
    params: Vec<(String, String)>,
}

impl BipReport {
    /// Creates a CSV report request for the report at `report_name`
    /// (its absolute catalog path, e.g. `/Custom/Finance/Invoices.xdo`)
    pub fn new(report_name: impl Into<String>) -> Self {
        Self {
            report_name: report_name.into(),
            format: "csv".to_string(),
            params: Vec::new(),
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn report_name(&self) -> &str {
        &self.report_name
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Appends a report parameter; order is kept in the request
    pub fn add_param(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.push((name.into(), value.into()));
        self
    }

    fn write_request(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        start(writer, "reportRequest")?;
        text_element(writer, "attributeFormat", &self.format)?;

        start(writer, "parameterNameValue")?;
        for (name, value) in &self.params {
            start(writer, "listOfParamNameValues")?;
            text_element(writer, "name", name)?;
            text_element(writer, "values", value)?;
            end(writer, "listOfParamNameValues")?;
        }
        end(writer, "parameterNameValue")?;

        text_element(writer, "reportAbsolutePath", &self.report_name)?;
        end(writer, "reportRequest")
    }
}

/// Email delivery channel for a scheduled report
///
/// Unset subject and attachment name fall back to `"{report} Report"` and
/// `"output.{format}"` for the report being scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailOptions {
    to: String,
    cc: Option<String>,
    from: String,
    subject: Option<String>,
    attachment_name: Option<String>,
    body: Option<String>,
}

impl EmailOptions {
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            cc: None,
            from: DEFAULT_EMAIL_FROM.to_string(),
            subject: None,
            attachment_name: None,
            body: None,
        }
    }

    pub fn cc(mut self, cc: impl Into<String>) -> Self {
        self.cc = Some(cc.into());
        self
    }

    pub fn from_address(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn attachment_name(mut self, name: impl Into<String>) -> Self {
        self.attachment_name = Some(name.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    fn write_options(&self, writer: &mut Writer<Vec<u8>>, report: &BipReport) -> Result<()> {
        let subject = non_empty(&self.subject)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} Report", report.report_name));
        let attachment = non_empty(&self.attachment_name)
            .map(str::to_string)
            .unwrap_or_else(|| format!("output.{}", report.format));

        start(writer, "emailOptions")?;
        text_element(writer, "emailTo", &self.to)?;
        if let Some(cc) = non_empty(&self.cc) {
            text_element(writer, "emailCC", cc)?;
        }
        text_element(writer, "emailFrom", &self.from)?;
        text_element(writer, "emailSubject", &subject)?;
        text_element(writer, "emailAttachmentName", &attachment)?;
        if let Some(body) = non_empty(&self.body) {
            text_element(writer, "emailBody", body)?;
        }
        end(writer, "emailOptions")
    }
}

/// Builds the SOAP `scheduleReport` envelope for `report`
///
/// # Example
///
/// ```rust
/// use oracloud_ess_sdk::bip::{envelope, BipReport, EmailOptions};
///
/// let mut report = BipReport::new("/Custom/Finance/Invoices.xdo");
/// report.add_param("P_BU", "US1");
///
/// let xml = envelope(&report, Some(&EmailOptions::new("ap@example.com"))).unwrap();
/// assert!(xml.contains("<emailTo>ap@example.com</emailTo>"));
/// assert!(xml.contains("<reportAbsolutePath>/Custom/Finance/Invoices.xdo</reportAbsolutePath>"));
/// ```
pub fn envelope(report: &BipReport, delivery: Option<&EmailOptions>) -> Result<String> {
    let mut writer = Writer::new(Vec::new());

    let root = BytesStart::new("soap:Envelope")
        .with_attributes([("xmlns:soap", SOAP_NS), ("xmlns:sch", SCH_NS)]);
    writer.write_event(Event::Start(root))?;
    writer.write_event(Event::Empty(BytesStart::new("soap:Header")))?;
    start(&mut writer, "soap:Body")?;
    start(&mut writer, "sch:scheduleReport")?;
    start(&mut writer, "scheduleRequest")?;

    start(&mut writer, "deliveryChannels")?;
    if let Some(options) = delivery {
        options.write_options(&mut writer, report)?;
    }
    end(&mut writer, "deliveryChannels")?;
    report.write_request(&mut writer)?;

    end(&mut writer, "scheduleRequest")?;
    end(&mut writer, "sch:scheduleReport")?;
    end(&mut writer, "soap:Body")?;
    end(&mut writer, "soap:Envelope")?;

    String::from_utf8(writer.into_inner()).map_err(|e| SdkError::Xml(e.to_string()))
}

fn start(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn end(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    start(writer, name)?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    end(writer, name)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
