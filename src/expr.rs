// src/expr.rs
//! Symbolic scalar layer for the code generators.
//!
//! Every cached operator kernel is, per output blade, a polynomial in the
//! operands' coefficient slots (products and contractions are bilinear; the
//! inverse and the outer trig family produce higher degrees), possibly over a
//! shared scalar denominator. This module provides that polynomial form, its
//! algebraic simplification, and the lowering into an executable instruction
//! tape with optional common-subexpression elimination.

use smallvec::SmallVec;
use std::collections::HashMap;

/// A coefficient slot of one operand: `operand << 16 | position`, where
/// `position` indexes into that operand's active-key tuple.
pub type Var = u32;

#[inline]
pub fn var(operand: usize, position: usize) -> Var {
    debug_assert!(operand < 4 && position < (1 << 16));
    ((operand as u32) << 16) | position as u32
}

#[inline]
pub fn var_operand(v: Var) -> usize {
    (v >> 16) as usize
}

#[inline]
pub fn var_position(v: Var) -> usize {
    (v & 0xFFFF) as usize
}

/// A product of coefficient slots, kept sorted so equal monomials compare
/// equal. The empty monomial is the constant 1.
pub type Monomial = SmallVec<[Var; 4]>;

/// Sparse polynomial: a sum of `coefficient * monomial` terms.
///
/// Terms are not implicitly combined; `normalize` merges like monomials and
/// drops exact zeros, producing the canonical form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Poly {
    pub terms: Vec<(f64, Monomial)>,
}

impl Poly {
    pub fn zero() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn constant(c: f64) -> Self {
        if c == 0.0 {
            Self::zero()
        } else {
            Self { terms: vec![(c, Monomial::new())] }
        }
    }

    pub fn one() -> Self {
        Self::constant(1.0)
    }

    pub fn variable(v: Var) -> Self {
        let mut m = Monomial::new();
        m.push(v);
        Self { terms: vec![(1.0, m)] }
    }

    /// True when no terms remain. Only meaningful after `normalize` for
    /// polynomials that may contain cancelling terms.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn add_assign(&mut self, other: &Poly) {
        self.terms.extend(other.terms.iter().cloned());
    }

    pub fn add(&self, other: &Poly) -> Poly {
        let mut out = self.clone();
        out.add_assign(other);
        out
    }

    pub fn sub(&self, other: &Poly) -> Poly {
        let mut out = self.clone();
        out.terms
            .extend(other.terms.iter().map(|(c, m)| (-c, m.clone())));
        out
    }

    pub fn scale(&self, factor: f64) -> Poly {
        if factor == 0.0 {
            return Poly::zero();
        }
        Poly {
            terms: self
                .terms
                .iter()
                .map(|(c, m)| (c * factor, m.clone()))
                .collect(),
        }
    }

    pub fn neg(&self) -> Poly {
        self.scale(-1.0)
    }

    /// Product of two polynomials. The result is normalized: composition
    /// (e.g. the inverse recursion) multiplies repeatedly, and carrying
    /// uncombined terms through would blow up the term count.
    pub fn mul(&self, other: &Poly) -> Poly {
        let mut out = Poly {
            terms: Vec::with_capacity(self.terms.len() * other.terms.len()),
        };
        for (ca, ma) in &self.terms {
            for (cb, mb) in &other.terms {
                let mut m = ma.clone();
                m.extend(mb.iter().copied());
                m.sort_unstable();
                out.terms.push((ca * cb, m));
            }
        }
        out.normalize();
        out
    }

    /// Canonical form: like monomials combined, zero coefficients dropped,
    /// terms sorted by monomial.
    pub fn normalize(&mut self) {
        if self.terms.is_empty() {
            return;
        }
        self.terms.sort_by(|a, b| a.1.cmp(&b.1));
        let mut merged: Vec<(f64, Monomial)> = Vec::with_capacity(self.terms.len());
        for (c, m) in self.terms.drain(..) {
            match merged.last_mut() {
                Some((lc, lm)) if *lm == m => *lc += c,
                _ => merged.push((c, m)),
            }
        }
        merged.retain(|(c, _)| *c != 0.0);
        self.terms = merged;
    }

    pub fn normalized(mut self) -> Poly {
        self.normalize();
        self
    }

    /// Evaluate term by term against the operands' coefficient slices.
    pub fn eval(&self, inputs: &[&[f64]]) -> f64 {
        let mut acc = 0.0;
        for (c, m) in &self.terms {
            let mut t = *c;
            for &v in m {
                t *= inputs[var_operand(v)][var_position(v)];
            }
            acc += t;
        }
        acc
    }

    /// Number of multiplications and additions a term-by-term evaluation
    /// performs.
    pub fn op_count(&self) -> usize {
        self.terms.len().saturating_sub(1)
            + self.terms.iter().map(|(_, m)| m.len()).sum::<usize>()
    }
}

/// One instruction of a lowered kernel tape. Operands are indices of earlier
/// tape slots.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Instr {
    Load(Var),
    Const(f64),
    Mul(usize, usize),
    Add(usize, usize),
}

/// Hashable identity of an instruction, for value numbering. Commutative
/// instructions are keyed with ordered operands so `a*b` and `b*a` share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum InstrKey {
    Load(Var),
    Const(u64),
    Mul(usize, usize),
    Add(usize, usize),
}

/// A straight-line program computing one scalar per registered output.
///
/// Lowering is value-numbered when `cse` is on: structurally identical
/// subexpressions (shared blade products, reused partial sums) collapse to a
/// single tape slot.
#[derive(Debug, Default)]
pub struct Program {
    tape: Vec<Instr>,
    memo: Option<HashMap<InstrKey, usize>>,
    outputs: Vec<Option<usize>>,
}

impl Program {
    pub fn new(cse: bool) -> Self {
        Self {
            tape: Vec::new(),
            memo: cse.then(HashMap::new),
            outputs: Vec::new(),
        }
    }

    fn push(&mut self, instr: Instr) -> usize {
        let key = match instr {
            Instr::Load(v) => InstrKey::Load(v),
            Instr::Const(c) => InstrKey::Const(c.to_bits()),
            Instr::Mul(a, b) => InstrKey::Mul(a.min(b), a.max(b)),
            Instr::Add(a, b) => InstrKey::Add(a.min(b), a.max(b)),
        };
        if let Some(memo) = &mut self.memo {
            if let Some(&slot) = memo.get(&key) {
                return slot;
            }
            let slot = self.tape.len();
            memo.insert(key, slot);
            self.tape.push(instr);
            slot
        } else {
            self.tape.push(instr);
            self.tape.len() - 1
        }
    }

    fn lower_poly(&mut self, poly: &Poly) -> Option<usize> {
        let mut sum: Option<usize> = None;
        for (c, m) in &poly.terms {
            let mut prod: Option<usize> = None;
            for &v in m {
                let loaded = self.push(Instr::Load(v));
                prod = Some(match prod {
                    Some(p) => self.push(Instr::Mul(p, loaded)),
                    None => loaded,
                });
            }
            let term = match prod {
                Some(p) if *c == 1.0 => p,
                Some(p) => {
                    let k = self.push(Instr::Const(*c));
                    self.push(Instr::Mul(p, k))
                }
                None => self.push(Instr::Const(*c)),
            };
            sum = Some(match sum {
                Some(s) => self.push(Instr::Add(s, term)),
                None => term,
            });
        }
        sum
    }

    /// Lower a polynomial and register it as the next output. Identically
    /// empty polynomials become absent outputs (evaluated as 0).
    pub fn add_output(&mut self, poly: &Poly) {
        let slot = self.lower_poly(poly);
        self.outputs.push(slot);
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Tape length. Diagnostic, used to observe the effect of `cse`.
    pub fn len(&self) -> usize {
        self.tape.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tape.is_empty()
    }

    /// Run the tape and write one value per registered output.
    pub fn run(&self, inputs: &[&[f64]], out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.outputs.len());
        let mut slots = vec![0.0f64; self.tape.len()];
        for (i, instr) in self.tape.iter().enumerate() {
            slots[i] = match *instr {
                Instr::Load(v) => inputs[var_operand(v)][var_position(v)],
                Instr::Const(c) => c,
                Instr::Mul(a, b) => slots[a] * slots[b],
                Instr::Add(a, b) => slots[a] + slots[b],
            };
        }
        for (o, slot) in out.iter_mut().zip(&self.outputs) {
            *o = slot.map(|s| slots[s]).unwrap_or(0.0);
        }
    }
}
