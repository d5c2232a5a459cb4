//! # Property-Based Tests
//!
//! Invariants of record construction, acceptance, and transformation.

use ingestion_node::domain::analysis::{
    AcceptanceFilter, AnalysisFile, AnalysisNotification, AnalysisRecord, EventTransformer,
};
use ingestion_node::domain::analysis::experiment::experimental_strategy;
use ingestion_node::domain::foundation::AnalysisId;
use proptest::collection::vec;
use proptest::prelude::*;
use serde_json::json;
use std::collections::HashSet;

fn record_with(donors: &[String], files: &[String], strategy: &str) -> AnalysisRecord {
    AnalysisRecord::builder(AnalysisId::new("A1").unwrap())
        .analysis_type("sequencing_experiment")
        .analysis_state("PUBLISHED")
        .study_id("S1")
        .donors(donors.iter().cloned())
        .files(files.iter().map(AnalysisFile::new))
        .experimental_strategy(strategy)
        .build()
        .unwrap()
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Output donors are unique and keep first-seen order.
    #[test]
    fn donor_ids_are_unique_and_ordered(donors in vec("D[0-9]{1,2}", 0..40)) {
        let record = record_with(&donors, &[], "WGS");
        let event = EventTransformer::transform(&record);

        let unique: HashSet<_> = event.donor_ids.iter().collect();
        prop_assert_eq!(unique.len(), event.donor_ids.len());

        let mut seen = HashSet::new();
        let expected: Vec<_> = donors.iter().filter(|d| seen.insert(d.as_str())).cloned().collect();
        prop_assert_eq!(event.donor_ids, expected);
    }

    /// Two transforms of the same record differ only in the event id.
    #[test]
    fn transform_is_deterministic_except_id(
        donors in vec("D[0-9]{1,3}", 0..10),
        files in vec("[A-Za-z ]{1,12}", 0..5),
        strategy in "[A-Z-]{0,8}",
    ) {
        let record = record_with(&donors, &files, &strategy);

        let first = EventTransformer::transform(&record);
        let mut second = EventTransformer::transform(&record);

        prop_assert_ne!(&first.id, &second.id);
        second.id = first.id.clone();
        prop_assert_eq!(first, second);
    }

    /// Type matching ignores case on both sides.
    #[test]
    fn acceptance_is_case_insensitive(analysis_type in "[a-z_]{1,24}", flips in vec(any::<bool>(), 24)) {
        let mangled: String = analysis_type
            .chars()
            .zip(flips.iter().cycle())
            .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
            .collect();

        let filter = AcceptanceFilter::for_type(&analysis_type).unwrap();
        let notification = AnalysisNotification::new(AnalysisId::new("A1").unwrap(), mangled.clone());
        prop_assert!(filter.accepts(&notification));

        let upper_filter = AcceptanceFilter::for_type(&mangled.to_ascii_uppercase()).unwrap();
        let lower = AnalysisNotification::new(AnalysisId::new("A1").unwrap(), analysis_type);
        prop_assert!(upper_filter.accepts(&lower));
    }

    /// Scalar or list experiments never produce a strategy.
    #[test]
    fn non_map_experiment_is_a_mapping_error(n in any::<i64>(), s in ".*") {
        prop_assert!(experimental_strategy(Some(&json!(n))).is_err());
        prop_assert!(experimental_strategy(Some(&json!(s))).is_err());
        prop_assert!(experimental_strategy(Some(&json!([s]))).is_err());
    }
}
