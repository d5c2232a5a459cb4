//! Wire shapes for analysis documents.
//!
//! The same DTO decodes both the registry's GraphQL projection (flat
//! `donors`, `analysisType` as a string) and the hydrated publication payload
//! (`analysisType.name`, donors nested under samples and specimens). Every
//! collection is optional so partially populated documents still decode.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::analysis::{experiment, AnalysisFile, AnalysisRecord};
use crate::domain::foundation::{AnalysisId, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDto {
    pub analysis_id: String,
    #[serde(default)]
    pub analysis_type: Option<AnalysisTypeDto>,
    #[serde(default)]
    pub analysis_state: Option<String>,
    #[serde(default)]
    pub study_id: Option<String>,
    #[serde(default)]
    pub donors: Option<Vec<DonorDto>>,
    #[serde(default)]
    pub analysis_samples: Option<Vec<SampleDto>>,
    #[serde(default)]
    pub files: Option<Vec<FileDto>>,
    /// Kept loose; interpreted by [`experiment::strategy_or_default`].
    #[serde(default)]
    pub experiment: Option<JsonValue>,
}

/// `"sequencing_experiment"` or `{ "name": "sequencing_experiment" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisTypeDto {
    Name(String),
    Named { name: String },
}

impl AnalysisTypeDto {
    pub fn name(&self) -> &str {
        match self {
            AnalysisTypeDto::Name(name) | AnalysisTypeDto::Named { name } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleDto {
    #[serde(default)]
    pub analysis_specimens: Option<Vec<SpecimenDto>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecimenDto {
    #[serde(default)]
    pub analysis_donors: Option<Vec<DonorDto>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorDto {
    #[serde(default)]
    pub donor_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDto {
    #[serde(default)]
    pub data_type: Option<String>,
}

impl AnalysisDto {
    /// Donor ids in document order: flat `donors` first, then the nested
    /// sample/specimen tree. Duplicates are removed by the record builder.
    fn donor_ids(&self) -> Vec<String> {
        let flat = self.donors.iter().flatten();
        let nested = self
            .analysis_samples
            .iter()
            .flatten()
            .flat_map(|sample| sample.analysis_specimens.iter().flatten())
            .flat_map(|specimen| specimen.analysis_donors.iter().flatten());

        flat.chain(nested)
            .filter_map(|donor| donor.donor_id.clone())
            .filter(|id| !id.trim().is_empty())
            .collect()
    }

    pub fn into_record(self) -> Result<AnalysisRecord, ValidationError> {
        let analysis_id = AnalysisId::new(self.analysis_id.clone())?;
        let strategy =
            experiment::strategy_or_default(analysis_id.as_str(), self.experiment.as_ref());
        let donors = self.donor_ids();
        let files = self
            .files
            .unwrap_or_default()
            .into_iter()
            .map(|f| AnalysisFile::new(f.data_type.unwrap_or_default()));

        AnalysisRecord::builder(analysis_id)
            .analysis_type(self.analysis_type.as_ref().map(|t| t.name()).unwrap_or_default())
            .analysis_state(self.analysis_state.unwrap_or_default())
            .study_id(self.study_id.unwrap_or_default())
            .donors(donors)
            .files(files)
            .experimental_strategy(strategy)
            .build()
    }
}
