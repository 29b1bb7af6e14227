// src/prelude.rs
//! The "everything" import for the engine.
//!
//! Brings you the most commonly used types with one glob:
//! ```rust
//! use clifford_engine::prelude::*;
//! ```

pub use crate::algebra::{Algebra, AlgebraOptions};
pub use crate::error::AlgebraError;
pub use crate::multivector::Multivector;
