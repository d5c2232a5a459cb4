//! Inbound trigger payload announcing a published analysis.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::AnalysisId;

use super::AcceptanceSubject;

/// Minimal notification that an analysis was published upstream.
///
/// Carries just enough to decide whether resolving the full record is worth
/// a registry round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisNotification {
    pub analysis_id: AnalysisId,
    pub analysis_type: String,
}

impl AnalysisNotification {
    /// Creates a new notification.
    pub fn new(analysis_id: AnalysisId, analysis_type: impl Into<String>) -> Self {
        Self {
            analysis_id,
            analysis_type: analysis_type.into(),
        }
    }
}

impl AcceptanceSubject for AnalysisNotification {
    fn analysis_type(&self) -> &str {
        &self.analysis_type
    }

    // State is only known once the record is resolved.
    fn analysis_state(&self) -> Option<&str> {
        None
    }
}
