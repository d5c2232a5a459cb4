//! Payloads delivered by the inbound channel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::analysis::{AnalysisNotification, AnalysisRecord};
use crate::domain::foundation::{AnalysisId, ValidationError};

/// Which payload shape the inbound channel carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InboundMode {
    /// `{ analysisId, analysisType }` notifications; records are resolved.
    #[default]
    Resolve,
    /// Full analysis documents; resolution is skipped.
    Hydrated,
}

impl fmt::Display for InboundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InboundMode::Resolve => write!(f, "resolve"),
            InboundMode::Hydrated => write!(f, "hydrated"),
        }
    }
}

impl FromStr for InboundMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resolve" => Ok(InboundMode::Resolve),
            "hydrated" => Ok(InboundMode::Hydrated),
            other => Err(ValidationError::invalid_format(
                "pipeline.inbound_mode",
                format!("expected 'resolve' or 'hydrated', got '{}'", other),
            )),
        }
    }
}

/// One item from the inbound channel.
///
/// Deployments that resolve receive `Notification`; deployments fed with the
/// registry's full payload receive `Hydrated` and skip resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundPayload {
    Notification(AnalysisNotification),
    Hydrated(AnalysisRecord),
}

impl InboundPayload {
    pub fn analysis_id(&self) -> &AnalysisId {
        match self {
            InboundPayload::Notification(n) => &n.analysis_id,
            InboundPayload::Hydrated(r) => r.analysis_id(),
        }
    }

    pub fn analysis_type(&self) -> &str {
        match self {
            InboundPayload::Notification(n) => &n.analysis_type,
            InboundPayload::Hydrated(r) => r.analysis_type(),
        }
    }
}

impl From<AnalysisNotification> for InboundPayload {
    fn from(notification: AnalysisNotification) -> Self {
        InboundPayload::Notification(notification)
    }
}

impl From<AnalysisRecord> for InboundPayload {
    fn from(record: AnalysisRecord) -> Self {
        InboundPayload::Hydrated(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_mode_parses_case_insensitively() {
        assert_eq!("Hydrated".parse::<InboundMode>().unwrap(), InboundMode::Hydrated);
        assert_eq!(" resolve ".parse::<InboundMode>().unwrap(), InboundMode::Resolve);
        assert!("stream".parse::<InboundMode>().is_err());
    }

    #[test]
    fn payload_exposes_identity_for_both_shapes() {
        let id = AnalysisId::new("A1").unwrap();
        let notification: InboundPayload =
            AnalysisNotification::new(id.clone(), "sequencing_experiment").into();
        let hydrated: InboundPayload = AnalysisRecord::builder(id)
            .analysis_type("sequencing_alignment")
            .study_id("S1")
            .build()
            .unwrap()
            .into();

        assert_eq!(notification.analysis_id().as_str(), "A1");
        assert_eq!(notification.analysis_type(), "sequencing_experiment");
        assert_eq!(hydrated.analysis_type(), "sequencing_alignment");
    }
}
