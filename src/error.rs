// src/error.rs
//! Error types for algebra construction and fallible operations.

use thiserror::Error;

/// Errors surfaced by the algebra engine.
///
/// Internal contract violations (a dispatch cache handing a generator a shape
/// it cannot express) are not represented here: they panic, since they mean
/// the engine itself is inconsistent rather than the caller's input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgebraError {
    /// Inconsistent or malformed construction input: a bad signature, a
    /// key/value length mismatch, or an out-of-range grade.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Lookup of a blade name outside the canonical set for this dimension.
    #[error("unknown blade: {0}")]
    UnknownBlade(String),

    /// Inversion or division whose denominator is algebraically zero for the
    /// operand's shape, or numerically zero for its values.
    #[error("multivector is not invertible")]
    NotInvertible,
}

pub type Result<T> = std::result::Result<T, AlgebraError>;
