//! # clifford_engine Quickstart
//!
//! ```rust
//! use clifford_engine::prelude::*;
//!
//! // 3D Euclidean algebra; rotate e1 90° in the e1e2 plane.
//! let alg = Algebra::new(3, 0, 0).unwrap();
//! let half = std::f64::consts::FRAC_PI_4;
//! let rotor = &alg.scalar(half.cos()) - &(&alg.blade("e12").unwrap() * half.sin());
//! let v = alg.vector(&[1.0, 0.0, 0.0]).unwrap();
//! let rotated = rotor.sw(&v);
//!
//! const EPS: f64 = 1e-12;
//! assert!((rotated.coeff(1)).abs() < EPS);
//! assert!((rotated.coeff(2) - 1.0).abs() < EPS);
//! ```
//!
//! The engine is signature-generic: `Algebra::new(p, q, r)` derives the full
//! `2^d × 2^d` multiplication structure from the signature, and every
//! operator (products, contractions, inverse, outer exponential family) is
//! compiled on demand into a function specialized to its operands' sparsity
//! pattern and cached for reuse.

// Core modules
pub mod algebra;
pub mod blade_dict;
pub mod blades;
pub mod cayley;
pub mod codegen; // per-operator expression synthesizers
pub mod dispatch; // sparsity-keyed kernel caches
pub mod error;
pub mod expr; // symbolic polynomials and kernel lowering
pub mod graph; // serialization boundary for external visualizers
pub mod multivector;
pub mod prelude;
pub mod signature;

// --- Public API exports ---

pub use algebra::{Algebra, AlgebraOptions};
pub use blade_dict::BladeDict;
pub use blades::BladeIndexer;
pub use cayley::{CayleyEntry, CayleyTable};
pub use error::AlgebraError;
pub use graph::GraphData;
pub use multivector::Multivector;
pub use signature::Signature;
