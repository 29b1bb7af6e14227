// src/codegen/unary.rs
//! Unary operator generators: inverse, squared norm, and the outer
//! exponential/trigonometric family.

use super::{products::outer, sym_inverse, GenCtx, SymMv};

/// Multivector inverse.
pub fn inv(ctx: &GenCtx, keys: &[usize]) -> SymMv {
    sym_inverse(ctx, &SymMv::from_operand(0, keys))
}

/// Squared norm `x x̃`. Not necessarily scalar for mixed-grade input; the
/// full product is returned, as in the reference semantics.
pub fn normsq(ctx: &GenCtx, keys: &[usize]) -> SymMv {
    let x = SymMv::from_operand(0, keys);
    super::gp(ctx, &x, &x.reverse())
}

/// Number of series terms: wedge powers of a single grade-g blade vanish
/// past `d / g`, so the series is truncated there; mixed-grade (or scalar)
/// input falls back to `d` terms.
fn series_terms(ctx: &GenCtx, x: &SymMv) -> usize {
    let grades = x.grades();
    match grades.as_slice() {
        [g] if *g > 0 => ctx.dim / g,
        _ => ctx.dim,
    }
}

/// Successive wedge powers `x^∧k / k!` for `k = 1..=nterms`, stopping early
/// once a power vanishes identically.
fn wedge_series(ctx: &GenCtx, x: &SymMv, nterms: usize) -> Vec<SymMv> {
    let mut terms = Vec::new();
    let mut power = x.clone();
    for k in 1..=nterms {
        if k > 1 {
            power = outer(ctx, &power, x).scale(1.0 / k as f64).prune();
        }
        if power.comps.is_empty() {
            break;
        }
        terms.push(power.clone());
    }
    terms
}

/// Outer exponential: `1 + x + x∧x/2! + …` (finite, since wedge powers
/// terminate).
pub fn outerexp(ctx: &GenCtx, keys: &[usize]) -> SymMv {
    let x = SymMv::from_operand(0, keys);
    let mut acc = SymMv::scalar_one();
    for term in wedge_series(ctx, &x, series_terms(ctx, &x)) {
        acc = acc.add(&term);
    }
    acc
}

/// Outer sine: the odd wedge-power terms.
pub fn outersin(ctx: &GenCtx, keys: &[usize]) -> SymMv {
    let x = SymMv::from_operand(0, keys);
    let mut acc = SymMv::zero();
    for (i, term) in wedge_series(ctx, &x, series_terms(ctx, &x)).iter().enumerate() {
        if i % 2 == 0 {
            // k = i + 1 odd
            acc = acc.add(term);
        }
    }
    acc
}

/// Outer cosine: 1 plus the even wedge-power terms.
pub fn outercos(ctx: &GenCtx, keys: &[usize]) -> SymMv {
    let x = SymMv::from_operand(0, keys);
    let mut acc = SymMv::scalar_one();
    for (i, term) in wedge_series(ctx, &x, series_terms(ctx, &x)).iter().enumerate() {
        if i % 2 == 1 {
            acc = acc.add(term);
        }
    }
    acc
}

/// Outer tangent: `outersin(x) / outercos(x)` (geometric division).
pub fn outertan(ctx: &GenCtx, keys: &[usize]) -> SymMv {
    let sin = outersin(ctx, keys).prune();
    let cos = outercos(ctx, keys).prune();
    super::gp(ctx, &sin, &sym_inverse(ctx, &cos))
}
