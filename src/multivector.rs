// src/multivector.rs
//! Sparse multivectors over an algebra's basis blades.
//!
//! A multivector stores the active blade indices and their coefficients, plus
//! a back-reference to the algebra that owns all the derived tables; it
//! never owns the algebra itself. Every product goes through the owning
//! algebra's dispatch caches, so two multivectors with the same sparsity
//! pattern share one compiled kernel.

use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Mul, Neg, Not, Sub};

use crate::algebra::Algebra;
use crate::error::Result;

#[derive(Clone)]
pub struct Multivector<'a> {
    algebra: &'a Algebra,
    keys: Vec<usize>,
    values: Vec<f64>,
}

impl<'a> Multivector<'a> {
    /// Build from aligned keys and values. Callers guarantee the keys are
    /// valid blade indices; the public constructors on `Algebra` validate.
    pub(crate) fn from_keys_values(
        algebra: &'a Algebra,
        keys: Vec<usize>,
        values: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(keys.len(), values.len());
        Self { algebra, keys, values }
    }

    pub fn algebra(&self) -> &'a Algebra {
        self.algebra
    }

    /// Active blade indices, the multivector's structural shape.
    pub fn keys(&self) -> &[usize] {
        &self.keys
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Coefficient of a blade index, 0 when the slot is absent.
    pub fn coeff(&self, index: usize) -> f64 {
        self.keys
            .iter()
            .position(|&k| k == index)
            .map(|p| self.values[p])
            .unwrap_or(0.0)
    }

    /// Scalar (grade 0) coefficient.
    pub fn scalar_coeff(&self) -> f64 {
        self.coeff(0)
    }

    /// Grades with at least one active slot.
    pub fn grades(&self) -> Vec<usize> {
        let mut grades: Vec<usize> = self.keys.iter().map(|k| k.count_ones() as usize).collect();
        grades.sort_unstable();
        grades.dedup();
        grades
    }

    /// True when every coefficient is zero (including the empty shape).
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }

    /// The grade-g part.
    pub fn grade(&self, grade: usize) -> Multivector<'a> {
        let mut keys = Vec::new();
        let mut values = Vec::new();
        for (&k, &v) in self.keys.iter().zip(&self.values) {
            if k.count_ones() as usize == grade {
                keys.push(k);
                values.push(v);
            }
        }
        Self::from_keys_values(self.algebra, keys, values)
    }

    fn map_signs(&self, flips: impl Fn(usize) -> bool) -> Multivector<'a> {
        let values = self
            .keys
            .iter()
            .zip(&self.values)
            .map(|(&k, &v)| if flips(k.count_ones() as usize) { -v } else { v })
            .collect();
        Self::from_keys_values(self.algebra, self.keys.clone(), values)
    }

    /// Reversion `x̃`: grade g picks up `(-1)^(g(g-1)/2)`.
    pub fn reverse(&self) -> Multivector<'a> {
        self.map_signs(|g| g / 2 % 2 == 1)
    }

    /// Grade involution `x̂`: odd grades flip sign.
    pub fn involute(&self) -> Multivector<'a> {
        self.map_signs(|g| g % 2 == 1)
    }

    /// Clifford conjugation `x̄`: grade g picks up `(-1)^(g(g+1)/2)`.
    pub fn conjugate(&self) -> Multivector<'a> {
        self.map_signs(|g| (g + 1) / 2 % 2 == 1)
    }

    // --- cached operators, dispatched through the owning algebra ---

    /// Geometric product.
    pub fn gp(&self, other: &Multivector<'a>) -> Multivector<'a> {
        self.algebra.binary(self.algebra.operators().gp(), self, other)
    }

    /// Sandwich product `self · other · self̃`.
    pub fn sw(&self, other: &Multivector<'a>) -> Multivector<'a> {
        self.algebra.binary(self.algebra.operators().sw(), self, other)
    }

    /// Commutator product.
    pub fn cp(&self, other: &Multivector<'a>) -> Multivector<'a> {
        self.algebra.binary(self.algebra.operators().cp(), self, other)
    }

    /// Anti-commutator product.
    pub fn acp(&self, other: &Multivector<'a>) -> Multivector<'a> {
        self.algebra.binary(self.algebra.operators().acp(), self, other)
    }

    /// Inner product.
    pub fn ip(&self, other: &Multivector<'a>) -> Multivector<'a> {
        self.algebra.binary(self.algebra.operators().ip(), self, other)
    }

    /// Scalar product.
    pub fn sp(&self, other: &Multivector<'a>) -> Multivector<'a> {
        self.algebra.binary(self.algebra.operators().sp(), self, other)
    }

    /// Left contraction.
    pub fn lc(&self, other: &Multivector<'a>) -> Multivector<'a> {
        self.algebra.binary(self.algebra.operators().lc(), self, other)
    }

    /// Right contraction.
    pub fn rc(&self, other: &Multivector<'a>) -> Multivector<'a> {
        self.algebra.binary(self.algebra.operators().rc(), self, other)
    }

    /// Outer (exterior) product.
    pub fn op(&self, other: &Multivector<'a>) -> Multivector<'a> {
        self.algebra.binary(self.algebra.operators().op(), self, other)
    }

    /// Regressive product.
    pub fn rp(&self, other: &Multivector<'a>) -> Multivector<'a> {
        self.algebra.binary(self.algebra.operators().rp(), self, other)
    }

    /// Projection of `self` onto `other`. Fails when `other` is not
    /// invertible.
    pub fn proj(&self, other: &Multivector<'a>) -> Result<Multivector<'a>> {
        self.algebra
            .binary_fallible(self.algebra.operators().proj(), self, other)
    }

    /// Division `self · other⁻¹`.
    pub fn div(&self, other: &Multivector<'a>) -> Result<Multivector<'a>> {
        self.algebra
            .binary_fallible(self.algebra.operators().div(), self, other)
    }

    /// Multivector inverse.
    pub fn inv(&self) -> Result<Multivector<'a>> {
        self.algebra.unary_fallible(self.algebra.operators().inv(), self)
    }

    /// Squared norm `x x̃` (a full multivector for mixed-grade input).
    pub fn normsq(&self) -> Multivector<'a> {
        self.algebra.unary(self.algebra.operators().normsq(), self)
    }

    /// Norm: square root of the magnitude of `normsq`'s scalar part.
    pub fn norm(&self) -> f64 {
        self.normsq().scalar_coeff().abs().sqrt()
    }

    /// Outer exponential.
    pub fn outerexp(&self) -> Multivector<'a> {
        self.algebra.unary(self.algebra.operators().outerexp(), self)
    }

    /// Outer sine.
    pub fn outersin(&self) -> Multivector<'a> {
        self.algebra.unary(self.algebra.operators().outersin(), self)
    }

    /// Outer cosine.
    pub fn outercos(&self) -> Multivector<'a> {
        self.algebra.unary(self.algebra.operators().outercos(), self)
    }

    /// Outer tangent. Fails when the outer cosine is not invertible.
    pub fn outertan(&self) -> Result<Multivector<'a>> {
        self.algebra
            .unary_fallible(self.algebra.operators().outertan(), self)
    }

    // --- linear structure ---

    pub fn scale(&self, factor: f64) -> Multivector<'a> {
        Self::from_keys_values(
            self.algebra,
            self.keys.clone(),
            self.values.iter().map(|v| v * factor).collect(),
        )
    }

    fn linear_combine(&self, other: &Multivector<'a>, sign: f64) -> Multivector<'a> {
        self.algebra.check_same_algebra(other.algebra);
        let mut keys = self.keys.clone();
        let mut values = self.values.clone();
        for (&k, &v) in other.keys.iter().zip(&other.values) {
            match keys.iter().position(|&existing| existing == k) {
                Some(p) => values[p] += sign * v,
                None => {
                    keys.push(k);
                    values.push(sign * v);
                }
            }
        }
        self.algebra.wrap_result(keys, values)
    }
}

impl PartialEq for Multivector<'_> {
    /// Structural shapes may differ; equality compares coefficients densely.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.algebra, other.algebra)
            && (0..self.algebra.basis_len()).all(|i| self.coeff(i) == other.coeff(i))
    }
}

impl fmt::Debug for Multivector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Multivector({self})")
    }
}

impl fmt::Display for Multivector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (&k, &v) in self.keys.iter().zip(&self.values) {
            if v == 0.0 {
                continue;
            }
            let name = self.algebra.indexer().name(k);
            let blade = if name == "e" { "1" } else { name };
            if first {
                write!(f, "{v} {blade}")?;
                first = false;
            } else if v < 0.0 {
                write!(f, " - {} {blade}", -v)?;
            } else {
                write!(f, " + {v} {blade}")?;
            }
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}

impl<'a> Add for &Multivector<'a> {
    type Output = Multivector<'a>;
    fn add(self, rhs: Self) -> Multivector<'a> {
        self.linear_combine(rhs, 1.0)
    }
}

impl<'a> Sub for &Multivector<'a> {
    type Output = Multivector<'a>;
    fn sub(self, rhs: Self) -> Multivector<'a> {
        self.linear_combine(rhs, -1.0)
    }
}

impl<'a> Neg for &Multivector<'a> {
    type Output = Multivector<'a>;
    fn neg(self) -> Multivector<'a> {
        self.scale(-1.0)
    }
}

/// `a * b` is the geometric product.
impl<'a> Mul for &Multivector<'a> {
    type Output = Multivector<'a>;
    fn mul(self, rhs: Self) -> Multivector<'a> {
        self.gp(rhs)
    }
}

impl<'a> Mul<f64> for &Multivector<'a> {
    type Output = Multivector<'a>;
    fn mul(self, rhs: f64) -> Multivector<'a> {
        self.scale(rhs)
    }
}

/// `a ^ b` is the outer product.
impl<'a> BitXor for &Multivector<'a> {
    type Output = Multivector<'a>;
    fn bitxor(self, rhs: Self) -> Multivector<'a> {
        self.op(rhs)
    }
}

/// `a | b` is the inner product.
impl<'a> BitOr for &Multivector<'a> {
    type Output = Multivector<'a>;
    fn bitor(self, rhs: Self) -> Multivector<'a> {
        self.ip(rhs)
    }
}

/// `a & b` is the regressive product.
impl<'a> BitAnd for &Multivector<'a> {
    type Output = Multivector<'a>;
    fn bitand(self, rhs: Self) -> Multivector<'a> {
        self.rp(rhs)
    }
}

/// `!a` is reversion.
impl<'a> Not for &Multivector<'a> {
    type Output = Multivector<'a>;
    fn not(self) -> Multivector<'a> {
        self.reverse()
    }
}
