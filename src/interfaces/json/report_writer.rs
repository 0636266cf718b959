use crate::application::workflow::PaymentOutcome;
use crate::domain::lookup::LookupData;
use crate::error::{PaymentFailure, Result, Step};
use serde::Serialize;
use serde_json::Value;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Succeeded,
    Rejected,
    Failed,
}

/// Flat summary of a payment run's terminal outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReport {
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<Step>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liability_shifted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub three_d_secure_info: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup: Option<LookupData>,
}

impl From<&PaymentOutcome> for PaymentReport {
    fn from(outcome: &PaymentOutcome) -> Self {
        let empty = Self {
            status: ReportStatus::Failed,
            step: None,
            error: None,
            liability_shifted: None,
            three_d_secure_info: None,
            nonce: None,
            bin: None,
            lookup: None,
        };

        match outcome {
            Ok(verified) => Self {
                status: ReportStatus::Succeeded,
                liability_shifted: Some(verified.verification.liability_shifted),
                three_d_secure_info: Some(verified.verification.three_d_secure_info.clone()),
                nonce: Some(verified.verification.nonce.clone()),
                bin: Some(verified.verification.bin.clone()),
                lookup: verified.lookup.clone(),
                ..empty
            },
            Err(PaymentFailure::LiabilityNotShifted(e)) => Self {
                status: ReportStatus::Rejected,
                error: Some(e.to_string()),
                liability_shifted: Some(e.liability_shifted),
                three_d_secure_info: Some(e.three_d_secure_info.clone()),
                ..empty
            },
            Err(PaymentFailure::Stage(e)) => Self {
                step: Some(e.step),
                error: Some(e.source.to_string()),
                ..empty
            },
        }
    }
}

/// Writes payment reports as JSON lines.
pub struct ReportWriter<W: Write> {
    writer: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_report(&mut self, report: &PaymentReport) -> Result<()> {
        serde_json::to_writer(&mut self.writer, report)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
