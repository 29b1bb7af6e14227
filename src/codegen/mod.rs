// src/codegen/mod.rs
//! Per-operator expression synthesizers.
//!
//! Each generator receives the algebra's Cayley data plus the operand
//! sparsity pattern(s) and returns, for every potentially nonzero output
//! blade, a polynomial in the input coefficients: the contract consumed by
//! the dispatch caches. The workhorse is `SymMv`, a multivector whose
//! components are symbolic polynomials; products are bilinear extension over
//! the Cayley table, and everything else composes from that.

pub mod products;
pub mod unary;

use std::collections::BTreeMap;

use crate::cayley::{CayleyEntry, CayleyTable};
use crate::expr::{var, Poly};

/// Everything a generator may read: the finished Cayley table and the
/// dimension. Generators never see coefficient values.
pub struct GenCtx<'a> {
    pub cayley: &'a CayleyTable,
    pub dim: usize,
}

impl GenCtx<'_> {
    /// Bitmask of the pseudoscalar.
    #[inline]
    pub fn full_mask(&self) -> usize {
        self.cayley.len() - 1
    }
}

/// A symbolic multivector: blade index → polynomial component, all over a
/// shared scalar denominator (the constant 1 except downstream of an
/// inversion).
#[derive(Debug, Clone)]
pub struct SymMv {
    pub comps: BTreeMap<usize, Poly>,
    pub denom: Poly,
}

impl SymMv {
    pub fn zero() -> Self {
        Self { comps: BTreeMap::new(), denom: Poly::one() }
    }

    pub fn scalar_one() -> Self {
        let mut comps = BTreeMap::new();
        comps.insert(0, Poly::one());
        Self { comps, denom: Poly::one() }
    }

    /// The symbolic form of one operand: component `keys[i]` is the i-th
    /// coefficient slot of operand `operand`.
    pub fn from_operand(operand: usize, keys: &[usize]) -> Self {
        let mut comps = BTreeMap::new();
        for (position, &key) in keys.iter().enumerate() {
            comps.insert(key, Poly::variable(var(operand, position)));
        }
        Self { comps, denom: Poly::one() }
    }

    fn has_unit_denom(&self) -> bool {
        self.denom == Poly::one()
    }

    /// Component polynomial for a blade, zero if absent.
    pub fn comp(&self, key: usize) -> Poly {
        self.comps.get(&key).cloned().unwrap_or_else(Poly::zero)
    }

    /// Scalar (grade 0) component, ignoring the denominator.
    pub fn scalar_part(&self) -> Poly {
        self.comp(0)
    }

    /// Drop identically zero components.
    pub fn prune(mut self) -> Self {
        self.comps.retain(|_, p| {
            p.normalize();
            !p.is_zero()
        });
        self
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self {
            comps: self
                .comps
                .iter()
                .map(|(&k, p)| (k, p.scale(factor)))
                .collect(),
            denom: self.denom.clone(),
        }
    }

    pub fn neg(&self) -> Self {
        self.scale(-1.0)
    }

    /// Sum with cross-multiplied denominators where they differ.
    pub fn add(&self, other: &Self) -> Self {
        if self.denom == other.denom {
            let mut comps = self.comps.clone();
            for (&k, p) in &other.comps {
                let entry = comps.entry(k).or_insert_with(Poly::zero);
                *entry = entry.add(p);
            }
            return Self { comps, denom: self.denom.clone() };
        }
        let mut comps: BTreeMap<usize, Poly> = BTreeMap::new();
        for (&k, p) in &self.comps {
            comps.insert(k, p.mul(&other.denom));
        }
        for (&k, p) in &other.comps {
            let scaled = p.mul(&self.denom);
            let entry = comps.entry(k).or_insert_with(Poly::zero);
            *entry = entry.add(&scaled);
        }
        Self { comps, denom: self.denom.mul(&other.denom) }
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Subtract a scalar polynomial (same denominator assumed).
    pub fn sub_scalar(&self, scalar: &Poly) -> Self {
        debug_assert!(self.has_unit_denom());
        let mut out = self.clone();
        let entry = out.comps.entry(0).or_insert_with(Poly::zero);
        *entry = entry.sub(scalar);
        out
    }

    /// Keep only components of the given grade.
    pub fn grade_select(&self, grade: usize) -> Self {
        Self {
            comps: self
                .comps
                .iter()
                .filter(|(k, _)| k.count_ones() as usize == grade)
                .map(|(&k, p)| (k, p.clone()))
                .collect(),
            denom: self.denom.clone(),
        }
    }

    /// Grades with at least one (possibly cancelling) component present.
    pub fn grades(&self) -> Vec<usize> {
        let mut grades: Vec<usize> = self.comps.keys().map(|k| k.count_ones() as usize).collect();
        grades.sort_unstable();
        grades.dedup();
        grades
    }

    /// Reversion: grade g picks up `(-1)^(g(g-1)/2)`.
    pub fn reverse(&self) -> Self {
        self.involution(|g| g / 2 % 2 == 1)
    }

    /// Grade involution: odd grades flip.
    pub fn involute(&self) -> Self {
        self.involution(|g| g % 2 == 1)
    }

    /// Clifford conjugation: grade g picks up `(-1)^(g(g+1)/2)`.
    pub fn conjugate(&self) -> Self {
        self.involution(|g| (g + 1) / 2 % 2 == 1)
    }

    fn involution(&self, flips: impl Fn(usize) -> bool) -> Self {
        Self {
            comps: self
                .comps
                .iter()
                .map(|(&k, p)| {
                    let g = k.count_ones() as usize;
                    (k, if flips(g) { p.neg() } else { p.clone() })
                })
                .collect(),
            denom: self.denom.clone(),
        }
    }
}

/// Bilinear extension of the Cayley table with a per-term grade filter:
/// a term `eI * eJ -> eK` contributes only when `filter(gI, gJ, gK)` holds.
/// This one function carries every product variant.
pub fn gp_filtered(
    ctx: &GenCtx,
    a: &SymMv,
    b: &SymMv,
    filter: impl Fn(usize, usize, usize) -> bool,
) -> SymMv {
    let mut comps: BTreeMap<usize, Poly> = BTreeMap::new();
    for (&ka, pa) in &a.comps {
        let ga = ka.count_ones() as usize;
        for (&kb, pb) in &b.comps {
            let gb = kb.count_ones() as usize;
            match ctx.cayley.entry(ka, kb) {
                CayleyEntry::Zero => {}
                CayleyEntry::Blade { sign, index } => {
                    let gout = index.count_ones() as usize;
                    if !filter(ga, gb, gout) {
                        continue;
                    }
                    let term = pa.mul(pb).scale(sign as f64);
                    let entry = comps.entry(index).or_insert_with(Poly::zero);
                    *entry = entry.add(&term);
                }
            }
        }
    }
    SymMv { comps, denom: a.denom.mul(&b.denom) }
}

/// Unfiltered geometric product.
pub fn gp(ctx: &GenCtx, a: &SymMv, b: &SymMv) -> SymMv {
    gp_filtered(ctx, a, b, |_, _, _| true)
}

/// Symbolic inverse via Shirokov's recursion.
///
/// With `N = 2^ceil(d/2)`, iterate `U_1 = x`, `c_k = (N/k) <U_k>_0`,
/// `U_{k+1} = x (U_k - c_k)`; then `U_N` is a scalar and
/// `x^-1 = (U_{N-1} - c_{N-1}) / U_N`. A denominator that is identically
/// zero (or evaluates to zero) is reported by the kernel as not invertible.
pub fn sym_inverse(ctx: &GenCtx, x: &SymMv) -> SymMv {
    if !x.has_unit_denom() {
        // (n/d)^-1 = d * n^-1: invert the numerator, carry d into it.
        let numerator = SymMv { comps: x.comps.clone(), denom: Poly::one() };
        let inv = sym_inverse(ctx, &numerator);
        let comps = inv
            .comps
            .iter()
            .map(|(&k, p)| (k, p.mul(&x.denom)))
            .collect();
        return SymMv { comps, denom: inv.denom };
    }

    let n = 1usize << ((ctx.dim + 1) / 2);
    if n == 1 {
        // Scalar algebra: 1 / x.
        let mut out = SymMv::scalar_one();
        out.denom = x.scalar_part();
        return out;
    }

    let mut u = x.clone();
    let mut adj = SymMv::zero();
    for k in 1..n {
        let c = u.scalar_part().normalized();
        let c = c.scale(n as f64 / k as f64);
        adj = u.sub_scalar(&c);
        // Prune each step: the recursion multiplies polynomials repeatedly,
        // and identically zero components would otherwise fan out.
        u = gp(ctx, x, &adj).prune();
    }

    // Non-scalar parts of U_N vanish identically; only its scalar survives
    // as the denominator.
    SymMv { comps: adj.comps, denom: u.scalar_part().normalized() }
}
