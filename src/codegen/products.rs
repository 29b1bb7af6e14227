// src/codegen/products.rs
//! Binary operator generators. Each takes the Cayley context plus the two
//! operand sparsity patterns and returns the symbolic result multivector.

use super::{gp_filtered, sym_inverse, GenCtx, SymMv};

/// Geometric product `a b`.
pub fn gp(ctx: &GenCtx, left: &[usize], right: &[usize]) -> SymMv {
    let a = SymMv::from_operand(0, left);
    let b = SymMv::from_operand(1, right);
    super::gp(ctx, &a, &b)
}

/// Sandwich product `a b ã`: conjugation of `b` by the versor `a`.
pub fn sw(ctx: &GenCtx, left: &[usize], right: &[usize]) -> SymMv {
    let a = SymMv::from_operand(0, left);
    let b = SymMv::from_operand(1, right);
    let ab = super::gp(ctx, &a, &b).prune();
    super::gp(ctx, &ab, &a.reverse())
}

/// Commutator product `(a b - b a) / 2`.
pub fn cp(ctx: &GenCtx, left: &[usize], right: &[usize]) -> SymMv {
    let a = SymMv::from_operand(0, left);
    let b = SymMv::from_operand(1, right);
    let ab = super::gp(ctx, &a, &b);
    let ba = super::gp(ctx, &b, &a);
    ab.sub(&ba).scale(0.5)
}

/// Anti-commutator product `(a b + b a) / 2`.
pub fn acp(ctx: &GenCtx, left: &[usize], right: &[usize]) -> SymMv {
    let a = SymMv::from_operand(0, left);
    let b = SymMv::from_operand(1, right);
    let ab = super::gp(ctx, &a, &b);
    let ba = super::gp(ctx, &b, &a);
    ab.add(&ba).scale(0.5)
}

/// Inner product: keeps the `|g_a - g_b|` grade part of each blade product.
pub fn ip(ctx: &GenCtx, left: &[usize], right: &[usize]) -> SymMv {
    let a = SymMv::from_operand(0, left);
    let b = SymMv::from_operand(1, right);
    gp_filtered(ctx, &a, &b, |ga, gb, gout| gout == ga.abs_diff(gb))
}

/// Scalar product: the grade-0 part of the geometric product.
pub fn sp(ctx: &GenCtx, left: &[usize], right: &[usize]) -> SymMv {
    let a = SymMv::from_operand(0, left);
    let b = SymMv::from_operand(1, right);
    gp_filtered(ctx, &a, &b, |_, _, gout| gout == 0)
}

/// Left contraction: keeps the `g_b - g_a` grade part.
pub fn lc(ctx: &GenCtx, left: &[usize], right: &[usize]) -> SymMv {
    let a = SymMv::from_operand(0, left);
    let b = SymMv::from_operand(1, right);
    gp_filtered(ctx, &a, &b, |ga, gb, gout| gb >= ga && gout == gb - ga)
}

/// Right contraction: keeps the `g_a - g_b` grade part.
pub fn rc(ctx: &GenCtx, left: &[usize], right: &[usize]) -> SymMv {
    let a = SymMv::from_operand(0, left);
    let b = SymMv::from_operand(1, right);
    gp_filtered(ctx, &a, &b, |ga, gb, gout| ga >= gb && gout == ga - gb)
}

/// Outer (exterior) product: the grade-raising part, `g_a + g_b`.
pub fn op(ctx: &GenCtx, left: &[usize], right: &[usize]) -> SymMv {
    let a = SymMv::from_operand(0, left);
    let b = SymMv::from_operand(1, right);
    outer(ctx, &a, &b)
}

pub(super) fn outer(ctx: &GenCtx, a: &SymMv, b: &SymMv) -> SymMv {
    gp_filtered(ctx, a, b, |ga, gb, gout| gout == ga + gb)
}

/// Regressive product, computed through complements so it stays meaningful
/// in degenerate metrics: `a ∨ b = lcomp(rcomp(a) ∧ rcomp(b))`.
///
/// The right complement of `e_I` is the blade `e_Ic` (complementary mask)
/// signed so that `e_I ∧ rcomp(e_I)` is the positive pseudoscalar; the signs
/// are pure swap parities, so no metric factor (in particular no null
/// square) ever enters.
pub fn rp(ctx: &GenCtx, left: &[usize], right: &[usize]) -> SymMv {
    let a = right_complement(ctx, &SymMv::from_operand(0, left));
    let b = right_complement(ctx, &SymMv::from_operand(1, right));
    left_complement(ctx, &outer(ctx, &a, &b))
}

fn right_complement(ctx: &GenCtx, x: &SymMv) -> SymMv {
    complement(ctx, x, |ctx, key, comp| ctx.cayley.swaps(key, comp))
}

fn left_complement(ctx: &GenCtx, x: &SymMv) -> SymMv {
    complement(ctx, x, |ctx, key, comp| ctx.cayley.swaps(comp, key))
}

fn complement(
    ctx: &GenCtx,
    x: &SymMv,
    swaps: impl Fn(&GenCtx, usize, usize) -> u32,
) -> SymMv {
    let full = ctx.full_mask();
    let comps = x
        .comps
        .iter()
        .map(|(&key, poly)| {
            let comp = full ^ key;
            let poly = if swaps(ctx, key, comp) % 2 == 1 {
                poly.neg()
            } else {
                poly.clone()
            };
            (comp, poly)
        })
        .collect();
    SymMv { comps, denom: x.denom.clone() }
}

/// Projection of `a` onto `b`: `(a ⌋ b) b⁻¹`.
pub fn proj(ctx: &GenCtx, left: &[usize], right: &[usize]) -> SymMv {
    let contraction = lc(ctx, left, right).prune();
    let b_inv = sym_inverse(ctx, &SymMv::from_operand(1, right));
    super::gp(ctx, &contraction, &b_inv)
}

/// Division `a b⁻¹`.
pub fn div(ctx: &GenCtx, left: &[usize], right: &[usize]) -> SymMv {
    let a = SymMv::from_operand(0, left);
    let b_inv = sym_inverse(ctx, &SymMv::from_operand(1, right));
    super::gp(ctx, &a, &b_inv)
}
