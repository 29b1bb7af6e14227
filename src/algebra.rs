// src/algebra.rs
//! The aggregate root: a geometric (Clifford) algebra of signature
//! `(p, q, r)`.
//!
//! Construction eagerly resolves the signature, builds the blade index and
//! the Cayley/sign tables, and wires one dispatch cache per operator to its
//! code generator. Blade representations and operator kernels are then
//! populated lazily and live as long as the algebra does.

use tracing::debug;

use crate::blade_dict::BladeDict;
use crate::blades::BladeIndexer;
use crate::cayley::CayleyTable;
use crate::codegen::{products, unary, GenCtx};
use crate::dispatch::{BuildOptions, OperatorDict, UnaryOperatorDict};
use crate::error::{AlgebraError, Result};
use crate::multivector::Multivector;
use crate::signature::Signature;

/// Construction-time switches. The defaults match the reference semantics:
/// simplification and CSE on, graded representations and tape compilation
/// off. None of these change observable values, only kernel shape pressure
/// and evaluation cost.
#[derive(Debug, Clone, Copy)]
pub struct AlgebraOptions {
    /// Common-subexpression elimination on lowered kernels.
    pub cse: bool,
    /// Algebraic simplification of generated expressions.
    pub simplify: bool,
    /// Represent blades and operands per grade slice instead of per exact
    /// sparsity pattern. Coarser keys, fewer distinct kernels.
    pub graded: bool,
    /// Lower kernels to the tape evaluator instead of interpreting the
    /// expression terms directly.
    pub compile: bool,
    /// Override of the blade-name digit offset; auto-derived when `None`.
    pub start_index: Option<u32>,
}

impl Default for AlgebraOptions {
    fn default() -> Self {
        Self {
            cse: true,
            simplify: true,
            graded: false,
            compile: false,
            start_index: None,
        }
    }
}

/// The static operator table: one dispatch cache per operator kind, each
/// wired to its generator at construction.
#[derive(Debug)]
pub struct Operators {
    gp: OperatorDict,
    sw: OperatorDict,
    cp: OperatorDict,
    acp: OperatorDict,
    ip: OperatorDict,
    sp: OperatorDict,
    lc: OperatorDict,
    rc: OperatorDict,
    op: OperatorDict,
    rp: OperatorDict,
    proj: OperatorDict,
    div: OperatorDict,
    inv: UnaryOperatorDict,
    normsq: UnaryOperatorDict,
    outerexp: UnaryOperatorDict,
    outersin: UnaryOperatorDict,
    outercos: UnaryOperatorDict,
    outertan: UnaryOperatorDict,
}

impl Operators {
    fn new() -> Self {
        Self {
            gp: OperatorDict::new("gp", products::gp),
            sw: OperatorDict::new("sw", products::sw),
            cp: OperatorDict::new("cp", products::cp),
            acp: OperatorDict::new("acp", products::acp),
            ip: OperatorDict::new("ip", products::ip),
            sp: OperatorDict::new("sp", products::sp),
            lc: OperatorDict::new("lc", products::lc),
            rc: OperatorDict::new("rc", products::rc),
            op: OperatorDict::new("op", products::op),
            rp: OperatorDict::new("rp", products::rp),
            proj: OperatorDict::new("proj", products::proj),
            div: OperatorDict::new("div", products::div),
            inv: UnaryOperatorDict::new("inv", unary::inv),
            normsq: UnaryOperatorDict::new("normsq", unary::normsq),
            outerexp: UnaryOperatorDict::new("outerexp", unary::outerexp),
            outersin: UnaryOperatorDict::new("outersin", unary::outersin),
            outercos: UnaryOperatorDict::new("outercos", unary::outercos),
            outertan: UnaryOperatorDict::new("outertan", unary::outertan),
        }
    }

    pub fn gp(&self) -> &OperatorDict {
        &self.gp
    }
    pub fn sw(&self) -> &OperatorDict {
        &self.sw
    }
    pub fn cp(&self) -> &OperatorDict {
        &self.cp
    }
    pub fn acp(&self) -> &OperatorDict {
        &self.acp
    }
    pub fn ip(&self) -> &OperatorDict {
        &self.ip
    }
    pub fn sp(&self) -> &OperatorDict {
        &self.sp
    }
    pub fn lc(&self) -> &OperatorDict {
        &self.lc
    }
    pub fn rc(&self) -> &OperatorDict {
        &self.rc
    }
    pub fn op(&self) -> &OperatorDict {
        &self.op
    }
    pub fn rp(&self) -> &OperatorDict {
        &self.rp
    }
    pub fn proj(&self) -> &OperatorDict {
        &self.proj
    }
    pub fn div(&self) -> &OperatorDict {
        &self.div
    }
    pub fn inv(&self) -> &UnaryOperatorDict {
        &self.inv
    }
    pub fn normsq(&self) -> &UnaryOperatorDict {
        &self.normsq
    }
    pub fn outerexp(&self) -> &UnaryOperatorDict {
        &self.outerexp
    }
    pub fn outersin(&self) -> &UnaryOperatorDict {
        &self.outersin
    }
    pub fn outercos(&self) -> &UnaryOperatorDict {
        &self.outercos
    }
    pub fn outertan(&self) -> &UnaryOperatorDict {
        &self.outertan
    }
}

#[derive(Debug)]
pub struct Algebra {
    signature: Signature,
    indexer: BladeIndexer,
    cayley: CayleyTable,
    blades: BladeDict,
    operators: Operators,
    options: AlgebraOptions,
}

impl Algebra {
    /// Algebra with `p` positive, `q` negative and `r` null generators.
    pub fn new(p: usize, q: usize, r: usize) -> Result<Self> {
        Self::with_options(p, q, r, AlgebraOptions::default())
    }

    pub fn with_options(p: usize, q: usize, r: usize, options: AlgebraOptions) -> Result<Self> {
        Self::build(p, q, r, None, options)
    }

    /// Algebra from an explicit per-generator square sequence.
    pub fn from_signature(signature: &[i8]) -> Result<Self> {
        Self::from_signature_with_options(signature, AlgebraOptions::default())
    }

    pub fn from_signature_with_options(
        signature: &[i8],
        options: AlgebraOptions,
    ) -> Result<Self> {
        Self::build(0, 0, 0, Some(signature), options)
    }

    fn build(
        p: usize,
        q: usize,
        r: usize,
        explicit: Option<&[i8]>,
        options: AlgebraOptions,
    ) -> Result<Self> {
        let signature = Signature::resolve(p, q, r, explicit, options.start_index)?;
        let indexer = BladeIndexer::new(&signature);
        let cayley = CayleyTable::build(&signature, &indexer);
        let blades = BladeDict::new(&indexer, options.graded);
        debug!(
            p = signature.p(),
            q = signature.q(),
            r = signature.r(),
            d = signature.dim(),
            lazy_blades = blades.is_lazy(),
            "algebra constructed"
        );
        Ok(Self {
            signature,
            indexer,
            cayley,
            blades,
            operators: Operators::new(),
            options,
        })
    }

    // --- accessors ---

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Number of generators.
    pub fn dim(&self) -> usize {
        self.signature.dim()
    }

    /// Number of basis blades, `2^d`.
    pub fn basis_len(&self) -> usize {
        self.indexer.len()
    }

    pub fn indexer(&self) -> &BladeIndexer {
        &self.indexer
    }

    pub fn cayley(&self) -> &CayleyTable {
        &self.cayley
    }

    pub fn blade_dict(&self) -> &BladeDict {
        &self.blades
    }

    pub fn operators(&self) -> &Operators {
        &self.operators
    }

    pub fn options(&self) -> &AlgebraOptions {
        &self.options
    }

    pub(crate) fn ctx(&self) -> GenCtx<'_> {
        GenCtx { cayley: &self.cayley, dim: self.dim() }
    }

    fn build_options(&self) -> BuildOptions {
        BuildOptions {
            simplify: self.options.simplify,
            cse: self.options.cse,
            compile: self.options.compile,
        }
    }

    // --- multivector construction ---

    /// Multivector from explicit blade indices and aligned coefficients.
    /// Keys must be valid, distinct blade indices.
    pub fn multivector(&self, keys: &[usize], values: &[f64]) -> Result<Multivector<'_>> {
        if keys.len() != values.len() {
            return Err(AlgebraError::Configuration(format!(
                "{} keys with {} values",
                keys.len(),
                values.len()
            )));
        }
        for (pos, &k) in keys.iter().enumerate() {
            if k >= self.basis_len() {
                return Err(AlgebraError::UnknownBlade(format!("index {k}")));
            }
            if keys[..pos].contains(&k) {
                return Err(AlgebraError::Configuration(format!(
                    "duplicate blade index {k}"
                )));
            }
        }
        Ok(self.wrap_result(keys.to_vec(), values.to_vec()))
    }

    /// Multivector from a dense coefficient vector of length `2^d`, indexed
    /// by blade index. Zero slots are dropped from the shape.
    pub fn from_coefficients(&self, coefficients: &[f64]) -> Result<Multivector<'_>> {
        if coefficients.len() != self.basis_len() {
            return Err(AlgebraError::Configuration(format!(
                "expected {} coefficients, got {}",
                self.basis_len(),
                coefficients.len()
            )));
        }
        let mut keys = Vec::new();
        let mut values = Vec::new();
        for (k, &v) in coefficients.iter().enumerate() {
            if v != 0.0 {
                keys.push(k);
                values.push(v);
            }
        }
        Ok(self.wrap_result(keys, values))
    }

    /// Multivector spanning exactly the given grades, with coefficients in
    /// grade-slice order (each grade's indices ascending).
    pub fn graded_multivector(&self, grades: &[usize], values: &[f64]) -> Result<Multivector<'_>> {
        for &g in grades {
            if g > self.dim() {
                return Err(AlgebraError::Configuration(format!(
                    "grade {g} exceeds dimension {}",
                    self.dim()
                )));
            }
        }
        let keys = self.indexer.indices_for_grades(grades);
        if keys.len() != values.len() {
            return Err(AlgebraError::Configuration(format!(
                "grades {grades:?} span {} blades, got {} values",
                keys.len(),
                values.len()
            )));
        }
        Ok(Multivector::from_keys_values(
            self,
            keys.to_vec(),
            values.to_vec(),
        ))
    }

    /// Multivector of a single grade.
    pub fn purevector(&self, grade: usize, values: &[f64]) -> Result<Multivector<'_>> {
        self.graded_multivector(&[grade], values)
    }

    /// Even-subalgebra multivector.
    pub fn evenmv(&self, values: &[f64]) -> Result<Multivector<'_>> {
        let grades: Vec<usize> = (0..=self.dim()).filter(|g| g % 2 == 0).collect();
        self.graded_multivector(&grades, values)
    }

    /// Odd-grade multivector (the complement of the even subalgebra).
    pub fn oddmv(&self, values: &[f64]) -> Result<Multivector<'_>> {
        let grades: Vec<usize> = (0..=self.dim()).filter(|g| g % 2 == 1).collect();
        self.graded_multivector(&grades, values)
    }

    pub fn scalar(&self, value: f64) -> Multivector<'_> {
        self.wrap_result(vec![0], vec![value])
    }

    pub fn vector(&self, values: &[f64]) -> Result<Multivector<'_>> {
        self.purevector(1, values)
    }

    pub fn bivector(&self, values: &[f64]) -> Result<Multivector<'_>> {
        self.purevector(2, values)
    }

    pub fn trivector(&self, values: &[f64]) -> Result<Multivector<'_>> {
        self.purevector(3, values)
    }

    pub fn quadvector(&self, values: &[f64]) -> Result<Multivector<'_>> {
        self.purevector(4, values)
    }

    /// Top-grade multivector.
    pub fn pseudoscalar(&self, value: f64) -> Multivector<'_> {
        self.wrap_result(vec![self.basis_len() - 1], vec![value])
    }

    pub fn pseudovector(&self, values: &[f64]) -> Result<Multivector<'_>> {
        self.co_grade(1, values)
    }

    pub fn pseudobivector(&self, values: &[f64]) -> Result<Multivector<'_>> {
        self.co_grade(2, values)
    }

    pub fn pseudotrivector(&self, values: &[f64]) -> Result<Multivector<'_>> {
        self.co_grade(3, values)
    }

    pub fn pseudoquadvector(&self, values: &[f64]) -> Result<Multivector<'_>> {
        self.co_grade(4, values)
    }

    fn co_grade(&self, below_top: usize, values: &[f64]) -> Result<Multivector<'_>> {
        let grade = self.dim().checked_sub(below_top).ok_or_else(|| {
            AlgebraError::Configuration(format!(
                "no grade {} below the top in dimension {}",
                below_top,
                self.dim()
            ))
        })?;
        self.purevector(grade, values)
    }

    /// The unit pseudoscalar.
    pub fn pss(&self) -> Multivector<'_> {
        let payload = self
            .blades
            .get_by_index(&self.indexer, self.basis_len() - 1);
        Multivector::from_keys_values(self, payload.keys.clone(), payload.values.clone())
    }

    /// The basis blade with the given canonical name, e.g. `"e12"`.
    pub fn blade(&self, name: &str) -> Result<Multivector<'_>> {
        let payload = self.blades.get(&self.indexer, name)?;
        Ok(Multivector::from_keys_values(
            self,
            payload.keys.clone(),
            payload.values.clone(),
        ))
    }

    // --- dispatch plumbing ---

    /// Wrap raw keys/values into a multivector, widening the shape to full
    /// grade slices when the algebra is graded.
    pub(crate) fn wrap_result(&self, keys: Vec<usize>, values: Vec<f64>) -> Multivector<'_> {
        if !self.options.graded || keys.is_empty() {
            return Multivector::from_keys_values(self, keys, values);
        }
        let mut grades: Vec<usize> = keys.iter().map(|k| k.count_ones() as usize).collect();
        grades.sort_unstable();
        grades.dedup();
        let wide_keys = self.indexer.indices_for_grades(&grades);
        let wide_values = wide_keys
            .iter()
            .map(|&k| {
                keys.iter()
                    .position(|&existing| existing == k)
                    .map(|p| values[p])
                    .unwrap_or(0.0)
            })
            .collect();
        Multivector::from_keys_values(self, wide_keys.to_vec(), wide_values)
    }

    pub(crate) fn check_same_algebra(&self, other: &Algebra) {
        assert!(
            std::ptr::eq(self, other),
            "operands belong to different algebras"
        );
    }

    pub(crate) fn binary<'a>(
        &'a self,
        dict: &OperatorDict,
        a: &Multivector<'a>,
        b: &Multivector<'a>,
    ) -> Multivector<'a> {
        self.binary_fallible(dict, a, b)
            .unwrap_or_else(|e| panic!("operator {} cannot fail, got {e}", dict.name()))
    }

    pub(crate) fn binary_fallible<'a>(
        &'a self,
        dict: &OperatorDict,
        a: &Multivector<'a>,
        b: &Multivector<'a>,
    ) -> Result<Multivector<'a>> {
        self.check_same_algebra(a.algebra());
        self.check_same_algebra(b.algebra());
        let kernel = dict.kernel(&self.ctx(), self.build_options(), a.keys(), b.keys());
        let out = kernel.eval(&[a.values(), b.values()])?;
        Ok(self.wrap_result(kernel.out_keys().to_vec(), out))
    }

    pub(crate) fn unary<'a>(
        &'a self,
        dict: &UnaryOperatorDict,
        x: &Multivector<'a>,
    ) -> Multivector<'a> {
        self.unary_fallible(dict, x)
            .unwrap_or_else(|e| panic!("operator {} cannot fail, got {e}", dict.name()))
    }

    pub(crate) fn unary_fallible<'a>(
        &'a self,
        dict: &UnaryOperatorDict,
        x: &Multivector<'a>,
    ) -> Result<Multivector<'a>> {
        self.check_same_algebra(x.algebra());
        let kernel = dict.kernel(&self.ctx(), self.build_options(), x.keys());
        let out = kernel.eval(&[x.values()])?;
        Ok(self.wrap_result(kernel.out_keys().to_vec(), out))
    }
}
