//! Draw errors.
//!
//! Pairing rejections never surface here: they are ordinary values that
//! steer the search. Only two situations become errors: input that cannot
//! produce a draw at all, and a search the caller chose to treat as fatal.

use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    #[error(
        "Malformed draw input: {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    MalformedInput(Vec<ValidationError>),

    #[error("Search exhausted: {attempts} attempt(s), {backtracks} backtracks")]
    SearchExhausted { attempts: usize, backtracks: u64 },

    #[error("No valid draw exists ({backtracks} backtracks)")]
    Infeasible { backtracks: u64 },
}

impl DrawError {
    /// Whether re-running with a different seed may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            DrawError::SearchExhausted { .. } => true,
            DrawError::MalformedInput(_) => false,
            DrawError::Infeasible { .. } => false,
        }
    }

    /// Validation errors carried by a malformed-input error.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            DrawError::MalformedInput(errors) => errors,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompetitionProfile, EntrantSeed};
    use crate::validation::validate_input;

    #[test]
    fn test_retryable() {
        assert!(DrawError::SearchExhausted {
            attempts: 1,
            backtracks: 50_001
        }
        .is_retryable());
        assert!(!DrawError::Infeasible { backtracks: 12 }.is_retryable());
        assert!(!DrawError::MalformedInput(Vec::new()).is_retryable());
    }

    #[test]
    fn test_malformed_message_lists_problems() {
        let seeds = vec![EntrantSeed::new("Porto", "POR"), EntrantSeed::new("Porto", "POR")];
        let errors = validate_input(&seeds, &CompetitionProfile::new(1, 1, 1)).unwrap_err();
        let err = DrawError::MalformedInput(errors);

        let text = err.to_string();
        assert!(text.starts_with("Malformed draw input: "));
        assert!(text.contains("Duplicate entrant: Porto (POR)"));
        assert!(!err.validation_errors().is_empty());
    }

    #[test]
    fn test_validation_error_display() {
        let seeds = vec![EntrantSeed::new("", "POR"), EntrantSeed::new("Porto", "POR")];
        let errors = validate_input(&seeds, &CompetitionProfile::new(1, 1, 1)).unwrap_err();
        assert!(errors.len() >= 2);
        for e in &errors {
            assert_eq!(e.to_string(), e.message);
        }

        // Each problem appears once, in order, separated by "; "
        let joined = errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; ");
        assert_eq!(
            DrawError::MalformedInput(errors).to_string(),
            format!("Malformed draw input: {joined}")
        );
    }

    #[test]
    fn test_exhausted_message() {
        let err = DrawError::SearchExhausted {
            attempts: 3,
            backtracks: 900,
        };
        assert_eq!(
            err.to_string(),
            "Search exhausted: 3 attempt(s), 900 backtracks"
        );
        assert!(err.validation_errors().is_empty());
    }
}
