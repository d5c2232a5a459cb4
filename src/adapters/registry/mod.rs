//! Analysis registry adapters.
//!
//! - `RdpcClient` - GraphQL-over-HTTP implementation of `AnalysisRegistry`
//! - `AnalysisDto` - Wire shape shared with hydrated inbound payloads

mod client;
mod dto;

pub use client::{RdpcClient, RdpcConfig, GET_ANALYSIS_DETAILS_QUERY};
pub use dto::{AnalysisDto, AnalysisTypeDto, DonorDto, FileDto, SampleDto, SpecimenDto};
