// src/dispatch.rs
//! Specializing operator dispatch.
//!
//! Each operator kind owns one cache keyed by the operands' structural shape:
//! the exact tuple(s) of active blade indices, never their values. A miss
//! runs the operator's generator, optionally simplifies, lowers the result
//! into a compiled kernel, and stores it; every future operand (pair) with
//! the same shape reuses that kernel. Builds are deterministic, so a racing
//! duplicate build is discarded on insert, never unsafe to use.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::codegen::{GenCtx, SymMv};
use crate::error::{AlgebraError, Result};
use crate::expr::{Poly, Program};

/// Generator for a binary operator: Cayley context plus both operand shapes.
pub type BinaryGen = fn(&GenCtx, &[usize], &[usize]) -> SymMv;
/// Generator for a unary operator.
pub type UnaryGen = fn(&GenCtx, &[usize]) -> SymMv;

/// Expression-processing switches, taken from the owning algebra's options.
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Combine like terms and drop identically zero output components.
    pub simplify: bool,
    /// Value-number the lowered tape so shared subexpressions fuse.
    pub cse: bool,
    /// Lower to the tape evaluator; off means term-by-term interpretation.
    pub compile: bool,
}

/// An immutable compiled function for one structural key.
///
/// Maps the operands' coefficient slices to output coefficients, one per
/// entry of `out_keys`, possibly over a shared scalar denominator.
#[derive(Debug)]
pub struct CompiledKernel {
    out_keys: Vec<usize>,
    polys: Vec<Poly>,
    /// `None` when the denominator is the constant 1.
    denom: Option<Poly>,
    /// The denominator is the zero polynomial: every evaluation reports
    /// `NotInvertible`. Still a legitimate cacheable kernel.
    denom_identically_zero: bool,
    program: Option<Program>,
}

impl CompiledKernel {
    fn build(sym: SymMv, options: BuildOptions) -> Self {
        let mut out_keys = Vec::new();
        let mut polys = Vec::new();
        for (key, poly) in sym.comps {
            let poly = if options.simplify { poly.normalized() } else { poly };
            if poly.is_zero() {
                continue;
            }
            out_keys.push(key);
            polys.push(poly);
        }

        let denom_normalized = sym.denom.clone().normalized();
        let denom_identically_zero = denom_normalized.is_zero();
        let denom = if denom_normalized == Poly::one() {
            None
        } else if options.simplify {
            Some(denom_normalized)
        } else {
            Some(sym.denom)
        };

        let program = options.compile.then(|| {
            let mut program = Program::new(options.cse);
            for poly in &polys {
                program.add_output(poly);
            }
            program
        });

        Self { out_keys, polys, denom, denom_identically_zero, program }
    }

    /// Active output blade indices, ascending.
    pub fn out_keys(&self) -> &[usize] {
        &self.out_keys
    }

    /// Evaluate against the operands' coefficient slices (one per operand,
    /// in that operand's key order).
    pub fn eval(&self, inputs: &[&[f64]]) -> Result<Vec<f64>> {
        if self.denom_identically_zero {
            return Err(AlgebraError::NotInvertible);
        }
        let mut out = vec![0.0f64; self.out_keys.len()];
        match &self.program {
            Some(program) => program.run(inputs, &mut out),
            None => {
                for (o, poly) in out.iter_mut().zip(&self.polys) {
                    *o = poly.eval(inputs);
                }
            }
        }
        if let Some(denom) = &self.denom {
            let d = denom.eval(inputs);
            if d == 0.0 {
                return Err(AlgebraError::NotInvertible);
            }
            for o in &mut out {
                *o /= d;
            }
        }
        Ok(out)
    }

    /// Operation count of a term-by-term evaluation of the kernel's
    /// expressions. Exposes how much work `simplify` removed.
    pub fn op_count(&self) -> usize {
        self.polys.iter().map(Poly::op_count).sum()
    }
}

/// Cache of compiled kernels for one binary operator.
#[derive(Debug)]
pub struct OperatorDict {
    name: &'static str,
    generator: BinaryGen,
    cache: Mutex<HashMap<(Vec<usize>, Vec<usize>), Arc<CompiledKernel>>>,
    builds: AtomicUsize,
}

impl OperatorDict {
    pub fn new(name: &'static str, generator: BinaryGen) -> Self {
        Self {
            name,
            generator,
            cache: Mutex::new(HashMap::new()),
            builds: AtomicUsize::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Kernel for the given pair of shapes, building it on first request.
    /// The build runs outside the lock; a concurrent duplicate build loses
    /// the insert race and is dropped.
    pub fn kernel(
        &self,
        ctx: &GenCtx,
        options: BuildOptions,
        left: &[usize],
        right: &[usize],
    ) -> Arc<CompiledKernel> {
        let key = (left.to_vec(), right.to_vec());
        if let Some(hit) = self.cache.lock().get(&key) {
            return Arc::clone(hit);
        }
        debug!(operator = self.name, ?left, ?right, "building specialized kernel");
        let sym = (self.generator)(ctx, left, right);
        let kernel = Arc::new(CompiledKernel::build(sym, options));
        self.builds.fetch_add(1, Ordering::Relaxed);
        Arc::clone(self.cache.lock().entry(key).or_insert(kernel))
    }

    /// Number of kernel builds performed (cache misses), for diagnostics and
    /// the build-once guarantees.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    /// Number of cached kernels.
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

/// Cache of compiled kernels for one unary operator.
#[derive(Debug)]
pub struct UnaryOperatorDict {
    name: &'static str,
    generator: UnaryGen,
    cache: Mutex<HashMap<Vec<usize>, Arc<CompiledKernel>>>,
    builds: AtomicUsize,
}

impl UnaryOperatorDict {
    pub fn new(name: &'static str, generator: UnaryGen) -> Self {
        Self {
            name,
            generator,
            cache: Mutex::new(HashMap::new()),
            builds: AtomicUsize::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kernel(
        &self,
        ctx: &GenCtx,
        options: BuildOptions,
        keys: &[usize],
    ) -> Arc<CompiledKernel> {
        if let Some(hit) = self.cache.lock().get(keys) {
            return Arc::clone(hit);
        }
        debug!(operator = self.name, ?keys, "building specialized kernel");
        let sym = (self.generator)(ctx, keys);
        let kernel = Arc::new(CompiledKernel::build(sym, options));
        self.builds.fetch_add(1, Ordering::Relaxed);
        Arc::clone(self.cache.lock().entry(keys.to_vec()).or_insert(kernel))
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}
