//! Event Transformer - maps a resolved record to the canonical event.

use crate::domain::foundation::EventId;

use super::{AnalysisRecord, GraphEvent, GraphEventFile};

/// Pure, total mapping from [`AnalysisRecord`] to [`GraphEvent`].
pub struct EventTransformer;

impl EventTransformer {
    /// Builds the canonical event. A fresh `id` is generated on every call.
    pub fn transform(record: &AnalysisRecord) -> GraphEvent {
        GraphEvent {
            id: EventId::new(),
            analysis_id: record.analysis_id().clone(),
            analysis_state: record.analysis_state().to_string(),
            analysis_type: record.analysis_type().to_string(),
            study_id: record.study_id().to_string(),
            donor_ids: record.donor_ids().to_vec(),
            files: record
                .files()
                .iter()
                .map(|f| GraphEventFile {
                    data_type: f.data_type.clone(),
                })
                .collect(),
            experimental_strategy: record.experimental_strategy().to_string(),
        }
    }
}
