//! Request validation utilities for consistent validation across handlers.
//!
//! The `RequestValidation` trait and helper macros centralize validation
//! logic and keep error messages uniform.

use crate::error::ApiError;

/// Trait for validating request payloads.
///
/// Implemented by every create/update request type the boundary accepts.
pub trait RequestValidation {
    /// Validates the request and returns an error if validation fails.
    ///
    /// # Errors
    ///
    /// An [`ApiError`] with a validation message.
    fn validate(&self) -> Result<(), ApiError>;
}

/// Validate a field with a custom predicate.
#[macro_export]
macro_rules! validate_field {
    ($field:expr, $predicate:expr, $message:expr) => {
        if !$predicate {
            return Err($crate::error::ApiError::validation($message));
        }
    };
}

/// Validate a required field (non-empty string after trimming).
#[macro_export]
macro_rules! validate_required {
    ($field:expr, $message:expr) => {
        validate_field!($field, !$field.trim().is_empty(), $message);
    };
}

/// Validate an email format (basic check).
#[macro_export]
macro_rules! validate_email {
    ($field:expr, $message:expr) => {
        validate_field!($field, $field.contains('@') && $field.contains('.'), $message);
    };
}

/// Validate string length bounds.
#[macro_export]
macro_rules! validate_length {
    ($field:expr, $min:expr, $max:expr, $message:expr) => {
        let len = $field.len();
        validate_field!($field, len >= $min && len <= $max, $message);
    };
}
