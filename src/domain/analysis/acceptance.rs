//! Acceptance Filter - decides which analyses are relevant downstream.
//!
//! Pure predicate over analysis type and, when known, analysis state.
//! Comparisons are case-insensitive. A notification only carries the type,
//! so it can be rejected early; the state check waits for the resolved record.

use std::fmt;

use crate::domain::foundation::ValidationError;

/// Anything the filter can judge.
pub trait AcceptanceSubject {
    fn analysis_type(&self) -> &str;

    /// `None` when the state is not yet known.
    fn analysis_state(&self) -> Option<&str>;
}

/// Outcome of evaluating a subject against the criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    RejectedType { found: String },
    RejectedState { found: String },
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accepted => write!(f, "accepted"),
            Verdict::RejectedType { found } => write!(f, "analysis type '{}' not accepted", found),
            Verdict::RejectedState { found } => {
                write!(f, "analysis state '{}' not accepted", found)
            }
        }
    }
}

/// Configured acceptance criteria.
///
/// An empty state list accepts any state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptanceFilter {
    accepted_types: Vec<String>,
    accepted_states: Vec<String>,
}

impl AcceptanceFilter {
    /// Creates a filter. At least one accepted type is required.
    pub fn new<T, S>(accepted_types: T, accepted_states: S) -> Result<Self, ValidationError>
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        let accepted_types = normalize(accepted_types);
        if accepted_types.is_empty() {
            return Err(ValidationError::empty_field("acceptance.analysis_types"));
        }

        Ok(Self {
            accepted_types,
            accepted_states: normalize(accepted_states),
        })
    }

    /// Filter on a single type with no state restriction.
    pub fn for_type(accepted_type: &str) -> Result<Self, ValidationError> {
        Self::new([accepted_type], std::iter::empty::<&str>())
    }

    /// Restricts accepted states, replacing any previous restriction.
    pub fn with_states<S>(mut self, accepted_states: S) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        self.accepted_states = normalize(accepted_states);
        self
    }

    pub fn accepted_types(&self) -> &[String] {
        &self.accepted_types
    }

    pub fn accepted_states(&self) -> &[String] {
        &self.accepted_states
    }

    /// Evaluates the subject, reporting why it was rejected.
    pub fn evaluate<T: AcceptanceSubject + ?Sized>(&self, subject: &T) -> Verdict {
        let analysis_type = subject.analysis_type();
        if !contains_ignore_case(&self.accepted_types, analysis_type) {
            return Verdict::RejectedType {
                found: analysis_type.to_string(),
            };
        }

        if let Some(state) = subject.analysis_state() {
            if !self.accepted_states.is_empty()
                && !contains_ignore_case(&self.accepted_states, state)
            {
                return Verdict::RejectedState {
                    found: state.to_string(),
                };
            }
        }

        Verdict::Accepted
    }

    pub fn accepts<T: AcceptanceSubject + ?Sized>(&self, subject: &T) -> bool {
        self.evaluate(subject).is_accepted()
    }
}

fn normalize<I>(values: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

// Accepted values are stored lowercased.
fn contains_ignore_case(accepted: &[String], value: &str) -> bool {
    let value = value.trim().to_lowercase();
    accepted.iter().any(|a| *a == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Subject {
        analysis_type: &'static str,
        analysis_state: Option<&'static str>,
    }

    impl AcceptanceSubject for Subject {
        fn analysis_type(&self) -> &str {
            self.analysis_type
        }

        fn analysis_state(&self) -> Option<&str> {
            self.analysis_state
        }
    }

    fn subject(analysis_type: &'static str, analysis_state: Option<&'static str>) -> Subject {
        Subject {
            analysis_type,
            analysis_state,
        }
    }

    fn experiment_published() -> AcceptanceFilter {
        AcceptanceFilter::for_type("sequencing_experiment")
            .unwrap()
            .with_states(["PUBLISHED"])
    }

    #[test]
    fn type_comparison_is_case_insensitive() {
        let filter = AcceptanceFilter::for_type("sequencing_experiment").unwrap();

        assert!(filter.accepts(&subject("Sequencing_Experiment", None)));
        assert!(filter.accepts(&subject("sequencing_experiment", None)));
        assert!(filter.accepts(&subject("SEQUENCING_EXPERIMENT", None)));
    }

    #[test]
    fn other_type_is_rejected() {
        let verdict = experiment_published().evaluate(&subject("sequencing_alignment", Some("PUBLISHED")));
        assert_eq!(
            verdict,
            Verdict::RejectedType {
                found: "sequencing_alignment".to_string()
            }
        );
    }

    #[test]
    fn matching_type_and_state_is_accepted() {
        let filter = experiment_published();
        assert!(filter.accepts(&subject("sequencing_experiment", Some("PUBLISHED"))));
        assert!(filter.accepts(&subject("sequencing_experiment", Some("published"))));
    }

    #[test]
    fn other_state_is_rejected() {
        let verdict = experiment_published().evaluate(&subject("sequencing_experiment", Some("UNPUBLISHED")));
        assert!(matches!(verdict, Verdict::RejectedState { .. }));
    }

    #[test]
    fn unknown_state_passes_until_resolved() {
        assert!(experiment_published().accepts(&subject("sequencing_experiment", None)));
    }

    #[test]
    fn empty_state_list_accepts_any_state() {
        let filter = AcceptanceFilter::for_type("sequencing_experiment").unwrap();
        assert!(filter.accepts(&subject("sequencing_experiment", Some("SUPPRESSED"))));
    }

    #[test]
    fn multiple_types_are_supported() {
        let filter = AcceptanceFilter::new(
            ["sequencing_experiment", "sequencing_alignment"],
            std::iter::empty::<&str>(),
        )
        .unwrap();
        assert!(filter.accepts(&subject("sequencing_alignment", None)));
        assert!(!filter.accepts(&subject("variant_calling", None)));
    }

    #[test]
    fn requires_at_least_one_type() {
        let result = AcceptanceFilter::new([" ", ""], std::iter::empty::<&str>());
        assert!(result.is_err());
    }

    #[test]
    fn verdict_displays_reason() {
        let verdict = Verdict::RejectedState {
            found: "UNPUBLISHED".to_string(),
        };
        assert_eq!(verdict.to_string(), "analysis state 'UNPUBLISHED' not accepted");
    }
}
