//! Resolved analysis record.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AnalysisId, ValidationError};

use super::AcceptanceSubject;

/// A file attached to an analysis. Only the data type is carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisFile {
    pub data_type: String,
}

impl AnalysisFile {
    pub fn new(data_type: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
        }
    }
}

/// Full analysis record as resolved from the registry.
///
/// Immutable once built. `donor_ids` is deduplicated at construction,
/// keeping the first occurrence of each donor in flattening order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRecord {
    analysis_id: AnalysisId,
    analysis_type: String,
    analysis_state: String,
    study_id: String,
    donor_ids: Vec<String>,
    files: Vec<AnalysisFile>,
    experimental_strategy: String,
}

impl AnalysisRecord {
    /// Starts building a record for the given analysis.
    pub fn builder(analysis_id: AnalysisId) -> AnalysisRecordBuilder {
        AnalysisRecordBuilder::new(analysis_id)
    }

    pub fn analysis_id(&self) -> &AnalysisId {
        &self.analysis_id
    }

    pub fn analysis_type(&self) -> &str {
        &self.analysis_type
    }

    pub fn analysis_state(&self) -> &str {
        &self.analysis_state
    }

    pub fn study_id(&self) -> &str {
        &self.study_id
    }

    pub fn donor_ids(&self) -> &[String] {
        &self.donor_ids
    }

    pub fn files(&self) -> &[AnalysisFile] {
        &self.files
    }

    /// Experimental strategy, empty when the registry had none.
    pub fn experimental_strategy(&self) -> &str {
        &self.experimental_strategy
    }
}

impl AcceptanceSubject for AnalysisRecord {
    fn analysis_type(&self) -> &str {
        &self.analysis_type
    }

    fn analysis_state(&self) -> Option<&str> {
        Some(&self.analysis_state)
    }
}

/// Builder for [`AnalysisRecord`].
#[derive(Debug, Clone)]
pub struct AnalysisRecordBuilder {
    analysis_id: AnalysisId,
    analysis_type: String,
    analysis_state: String,
    study_id: String,
    donor_ids: Vec<String>,
    files: Vec<AnalysisFile>,
    experimental_strategy: String,
}

impl AnalysisRecordBuilder {
    fn new(analysis_id: AnalysisId) -> Self {
        Self {
            analysis_id,
            analysis_type: String::new(),
            analysis_state: String::new(),
            study_id: String::new(),
            donor_ids: Vec::new(),
            files: Vec::new(),
            experimental_strategy: String::new(),
        }
    }

    pub fn analysis_type(mut self, analysis_type: impl Into<String>) -> Self {
        self.analysis_type = analysis_type.into();
        self
    }

    pub fn analysis_state(mut self, analysis_state: impl Into<String>) -> Self {
        self.analysis_state = analysis_state.into();
        self
    }

    pub fn study_id(mut self, study_id: impl Into<String>) -> Self {
        self.study_id = study_id.into();
        self
    }

    /// Appends donors in order. Duplicates are allowed here and removed on build.
    pub fn donors<I, S>(mut self, donor_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.donor_ids.extend(donor_ids.into_iter().map(Into::into));
        self
    }

    pub fn files<I>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = AnalysisFile>,
    {
        self.files.extend(files);
        self
    }

    pub fn experimental_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.experimental_strategy = strategy.into();
        self
    }

    /// Validates required fields and deduplicates donors.
    pub fn build(self) -> Result<AnalysisRecord, ValidationError> {
        if self.analysis_type.trim().is_empty() {
            return Err(ValidationError::empty_field("analysisType"));
        }
        if self.study_id.trim().is_empty() {
            return Err(ValidationError::empty_field("studyId"));
        }

        Ok(AnalysisRecord {
            analysis_id: self.analysis_id,
            analysis_type: self.analysis_type,
            analysis_state: self.analysis_state,
            study_id: self.study_id,
            donor_ids: dedup_preserving_order(self.donor_ids),
            files: self.files,
            experimental_strategy: self.experimental_strategy,
        })
    }
}

fn dedup_preserving_order(ids: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> AnalysisRecordBuilder {
        AnalysisRecord::builder(AnalysisId::new("A1").unwrap())
            .analysis_type("sequencing_experiment")
            .analysis_state("PUBLISHED")
            .study_id("S1")
    }

    #[test]
    fn build_deduplicates_donors_keeping_first_seen_order() {
        let record = builder().donors(["D2", "D1", "D2", "D3", "D1"]).build().unwrap();
        assert_eq!(record.donor_ids(), &["D2", "D1", "D3"]);
    }

    #[test]
    fn donors_accumulate_across_calls() {
        let record = builder()
            .donors(["D1"])
            .donors(["D1", "D2"])
            .build()
            .unwrap();
        assert_eq!(record.donor_ids(), &["D1", "D2"]);
    }

    #[test]
    fn build_requires_analysis_type() {
        let result = AnalysisRecord::builder(AnalysisId::new("A1").unwrap())
            .study_id("S1")
            .build();
        assert_eq!(result, Err(ValidationError::empty_field("analysisType")));
    }

    #[test]
    fn build_requires_study_id() {
        let result = AnalysisRecord::builder(AnalysisId::new("A1").unwrap())
            .analysis_type("sequencing_experiment")
            .build();
        assert_eq!(result, Err(ValidationError::empty_field("studyId")));
    }

    #[test]
    fn experimental_strategy_defaults_to_empty() {
        let record = builder().build().unwrap();
        assert_eq!(record.experimental_strategy(), "");
        assert!(record.files().is_empty());
    }

    #[test]
    fn record_exposes_state_for_filtering() {
        let record = builder().build().unwrap();
        assert_eq!(AcceptanceSubject::analysis_state(&record), Some("PUBLISHED"));
    }
}
