//! Canonical outbound event.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AnalysisId, DomainEvent, EventId};

/// Schema name advertised in the outbound content type.
pub const GRAPH_EVENT_SCHEMA: &str = "GraphEvent";

/// File entry in the outbound shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEventFile {
    pub data_type: String,
}

/// Stable event emitted once per accepted analysis.
///
/// Everything except `id` is a deterministic function of the source record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEvent {
    pub id: EventId,
    pub analysis_id: AnalysisId,
    pub analysis_state: String,
    pub analysis_type: String,
    pub study_id: String,
    pub donor_ids: Vec<String>,
    pub files: Vec<GraphEventFile>,
    pub experimental_strategy: String,
}

impl DomainEvent for GraphEvent {
    fn schema_name(&self) -> &'static str {
        GRAPH_EVENT_SCHEMA
    }

    fn event_id(&self) -> EventId {
        self.id.clone()
    }

    fn partition_key(&self) -> String {
        self.analysis_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_camel_case_field_names() {
        let event = GraphEvent {
            id: EventId::from_string("evt-1"),
            analysis_id: AnalysisId::new("A1").unwrap(),
            analysis_state: "PUBLISHED".to_string(),
            analysis_type: "sequencing_experiment".to_string(),
            study_id: "S1".to_string(),
            donor_ids: vec!["D1".to_string()],
            files: vec![GraphEventFile {
                data_type: "BAM".to_string(),
            }],
            experimental_strategy: "WGS".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "id": "evt-1",
                "analysisId": "A1",
                "analysisState": "PUBLISHED",
                "analysisType": "sequencing_experiment",
                "studyId": "S1",
                "donorIds": ["D1"],
                "files": [{"dataType": "BAM"}],
                "experimentalStrategy": "WGS"
            })
        );
        assert_eq!(event.partition_key(), "A1");
    }
}
