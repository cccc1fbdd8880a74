//! # Error Types
//!
//! Structured error types for loss_core. The closed-form formula library
//! raises [`LossError`]; the dispatcher wraps whatever escapes a loss model
//! into a [`LossComputationError`] that carries the diagnostic category and
//! severity a user needs to correct the input.
//!
//! ## Example
//!
//! ```rust
//! use loss_core::errors::{LossError, LossResult};
//!
//! fn validate_humidity(h: f64) -> LossResult<()> {
//!     if !(0.0..=100.0).contains(&h) {
//!         return Err(LossError::invalid_input(
//!             "relative_humidity",
//!             h.to_string(),
//!             "Relative humidity must be between 0 and 100 percent",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_humidity(75.0).is_ok());
//! ```

use std::panic::Location;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bridge::SegmentKey;

/// Result type alias for loss_core operations
pub type LossResult<T> = Result<T, LossError>;

/// Structured error type raised by the formula library and the collaborators.
///
/// Each variant names the code article that was violated where one applies,
/// so the message can be traced back to the governing specification.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum LossError {
    /// An input value is invalid (out of range, wrong sign, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Jacking stress is outside the band assumed by the relaxation equations
    #[error(
        "Jacking stress of {fpj:.2} ksi in the {strand} strands must be between \
         {min_ratio:.2}fpu and {max_ratio:.2}fpu (fpu = {fpu:.1} ksi). See LRFD {article}"
    )]
    JackingStressOutOfRange {
        strand: String,
        fpj: f64,
        fpu: f64,
        min_ratio: f64,
        max_ratio: f64,
        article: String,
    },

    /// Concrete strength is outside the range the equations were calibrated for
    #[error(
        "{element} concrete strength of {fc:.2} ksi is outside the range {min:.1} to \
         {max:.1} ksi for which the loss equations are valid. See LRFD {article}"
    )]
    ConcreteStrengthOutOfRange {
        element: String,
        fc: f64,
        min: f64,
        max: f64,
        article: String,
    },

    /// The selected relaxation method does not apply to the strand type
    #[error(
        "The {method} relaxation loss method is not applicable to {strand} strands. \
         See LRFD {article}"
    )]
    RelaxationMethodIncompatible {
        method: String,
        strand: String,
        article: String,
    },

    /// Loss method is not permitted for the concrete type
    #[error(
        "The {method} loss method cannot be used with {concrete} concrete under {edition}: {reason}"
    )]
    IncompatibleConcreteType {
        concrete: String,
        method: String,
        edition: String,
        reason: String,
    },

    /// An iterative solution failed to settle
    #[error("{quantity} did not converge within {iterations} iterations (tolerance {tolerance:e})")]
    IterationDidNotConverge {
        quantity: String,
        iterations: usize,
        tolerance: f64,
    },

    /// Any other failure inside the formula evaluation
    #[error("Loss computation failed at {location}: {reason}")]
    LibraryFailure { reason: String, location: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl LossError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        LossError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConcreteStrengthOutOfRange error
    pub fn concrete_strength_out_of_range(
        element: impl Into<String>,
        fc: f64,
        (min, max): (f64, f64),
        article: impl Into<String>,
    ) -> Self {
        LossError::ConcreteStrengthOutOfRange {
            element: element.into(),
            fc,
            min,
            max,
            article: article.into(),
        }
    }

    /// Create a LibraryFailure error tagged with the caller's source location
    #[track_caller]
    pub fn library_failure(reason: impl Into<String>) -> Self {
        let location = Location::caller();
        LossError::LibraryFailure {
            reason: reason.into(),
            location: format!("{}:{}", location.file(), location.line()),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        LossError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            LossError::InvalidInput { .. } => "INVALID_INPUT",
            LossError::JackingStressOutOfRange { .. } => "JACKING_STRESS_OUT_OF_RANGE",
            LossError::ConcreteStrengthOutOfRange { .. } => "CONCRETE_STRENGTH_OUT_OF_RANGE",
            LossError::RelaxationMethodIncompatible { .. } => "RELAXATION_METHOD_INCOMPATIBLE",
            LossError::IncompatibleConcreteType { .. } => "INCOMPATIBLE_CONCRETE_TYPE",
            LossError::IterationDidNotConverge { .. } => "NOT_CONVERGED",
            LossError::LibraryFailure { .. } => "LIBRARY_FAILURE",
            LossError::FileError { .. } => "FILE_ERROR",
            LossError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }

    /// Diagnostic category of this error when it aborts a loss computation
    pub fn category(&self) -> ErrorCategory {
        match self {
            LossError::JackingStressOutOfRange { .. }
            | LossError::ConcreteStrengthOutOfRange { .. }
            | LossError::RelaxationMethodIncompatible { .. } => ErrorCategory::AssumptionViolated,
            LossError::IncompatibleConcreteType { .. } => ErrorCategory::ConcreteTypeIncompatible,
            _ => ErrorCategory::UnspecifiedLibraryFailure,
        }
    }

    /// Severity communicated to the user for this error
    ///
    /// Out-of-range concrete strength is reported as a warning even though
    /// the computation for the segment is still abandoned.
    pub fn severity(&self) -> Severity {
        match self {
            LossError::ConcreteStrengthOutOfRange { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// Category a failed loss computation is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// An assumption of the closed-form equations does not hold
    AssumptionViolated,
    /// Anything the equations could not classify
    UnspecifiedLibraryFailure,
    /// The loss method cannot be used with the segment's concrete
    ConcreteTypeIncompatible,
}

impl ErrorCategory {
    /// Stable reason code handed to the status center
    pub fn reason_code(&self) -> &'static str {
        match self {
            ErrorCategory::AssumptionViolated => "LOSS_ASSUMPTION_VIOLATED",
            ErrorCategory::UnspecifiedLibraryFailure => "LOSS_UNKNOWN_ERROR",
            ErrorCategory::ConcreteTypeIncompatible => "LOSS_CONCRETE_TYPE_INCOMPATIBLE",
        }
    }
}

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A loss computation that was abandoned for one segment.
///
/// No partial result accompanies this error.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[error("Prestress losses could not be computed for {segment}: {error}")]
pub struct LossComputationError {
    /// Segment whose computation was abandoned
    pub segment: SegmentKey,
    /// Diagnostic category
    pub category: ErrorCategory,
    /// Severity shown to the user
    pub severity: Severity,
    /// Underlying cause
    pub error: LossError,
}

impl LossComputationError {
    /// Classify a library error for the given segment
    pub fn new(segment: SegmentKey, error: LossError) -> Self {
        LossComputationError {
            segment,
            category: error.category(),
            severity: error.severity(),
            error,
        }
    }

    /// Stable reason code for the status center
    pub fn reason_code(&self) -> &'static str {
        self.category.reason_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = LossError::invalid_input("relative_humidity", "120", "Must not exceed 100");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: LossError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(LossError::invalid_input("a", "b", "c").error_code(), "INVALID_INPUT");
        assert_eq!(LossError::library_failure("boom").error_code(), "LIBRARY_FAILURE");
    }

    #[test]
    fn test_library_failure_records_location() {
        let error = LossError::library_failure("boom");
        match error {
            LossError::LibraryFailure { location, .. } => assert!(location.contains("errors.rs")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_classification() {
        let strength =
            LossError::concrete_strength_out_of_range("Girder", 18.0, (2.4, 15.0), "5.4.2.1");
        assert_eq!(strength.category(), ErrorCategory::AssumptionViolated);
        assert_eq!(strength.severity(), Severity::Warning);

        let relaxation = LossError::RelaxationMethodIncompatible {
            method: "simplified".into(),
            strand: "stress-relieved".into(),
            article: "5.9.5.4.2c".into(),
        };
        assert_eq!(relaxation.category(), ErrorCategory::AssumptionViolated);
        assert_eq!(relaxation.severity(), Severity::Error);

        let converge = LossError::IterationDidNotConverge {
            quantity: "fcgp".into(),
            iterations: 50,
            tolerance: 1e-6,
        };
        assert_eq!(converge.category(), ErrorCategory::UnspecifiedLibraryFailure);
    }

    #[test]
    fn test_computation_error_reason_code() {
        let err = LossComputationError::new(
            SegmentKey::new(0, 1, 0),
            LossError::IncompatibleConcreteType {
                concrete: "PCI-UHPC".into(),
                method: "approximate".into(),
                edition: "LRFD 8th Edition 2017".into(),
                reason: "refined estimate required".into(),
            },
        );
        assert_eq!(err.reason_code(), "LOSS_CONCRETE_TYPE_INCOMPATIBLE");
        assert!(err.to_string().contains("Group 0"));
    }
}
