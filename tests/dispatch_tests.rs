// tests/dispatch_tests.rs
use clifford_engine::prelude::*;

const EPS: f64 = 1e-12;

#[test]
fn same_sparsity_pattern_builds_one_kernel() {
    let alg = Algebra::new(3, 0, 0).unwrap();
    let a1 = alg.vector(&[1.0, 2.0, 3.0]).unwrap();
    let b1 = alg.vector(&[4.0, 5.0, 6.0]).unwrap();
    // Different values, same shape.
    let a2 = alg.vector(&[-1.0, 0.5, 9.0]).unwrap();
    let b2 = alg.vector(&[0.25, -3.0, 7.0]).unwrap();

    let _ = &a1 * &b1;
    let _ = &a2 * &b2;
    let _ = &a1 * &b2;
    assert_eq!(alg.operators().gp().builds(), 1);

    // A different operand shape triggers exactly one more build.
    let s = alg.scalar(2.0);
    let _ = &s * &b1;
    let _ = &s * &b2;
    assert_eq!(alg.operators().gp().builds(), 2);
    assert_eq!(alg.operators().gp().len(), 2);
}

#[test]
fn each_operator_owns_an_independent_cache() {
    let alg = Algebra::new(2, 0, 0).unwrap();
    let a = alg.vector(&[1.0, 2.0]).unwrap();
    let b = alg.vector(&[3.0, 4.0]).unwrap();
    let _ = &a * &b;
    let _ = &a ^ &b;
    let _ = &a | &b;
    assert_eq!(alg.operators().gp().builds(), 1);
    assert_eq!(alg.operators().op().builds(), 1);
    assert_eq!(alg.operators().ip().builds(), 1);
    assert_eq!(alg.operators().sp().builds(), 0);
}

#[test]
fn unary_caches_key_on_one_shape() {
    let alg = Algebra::new(3, 0, 0).unwrap();
    let v1 = alg.vector(&[3.0, 4.0, 0.0]).unwrap();
    let v2 = alg.vector(&[1.0, 1.0, 1.0]).unwrap();
    let _ = v1.inv().unwrap();
    let _ = v2.inv().unwrap();
    assert_eq!(alg.operators().inv().builds(), 1);
    let _ = alg.blade("e1").unwrap().inv().unwrap();
    assert_eq!(alg.operators().inv().builds(), 2);
}

#[test]
fn graded_mode_coarsens_structural_keys() {
    let options = AlgebraOptions { graded: true, ..Default::default() };
    let alg = Algebra::with_options(3, 0, 0, options).unwrap();
    // Different exact sparsity, same grade: one kernel in graded mode.
    let a = alg.multivector(&[1], &[2.0]).unwrap();
    let b = alg.multivector(&[2], &[5.0]).unwrap();
    let c = alg.multivector(&[4], &[-1.0]).unwrap();
    let _ = &a * &b;
    let _ = &b * &c;
    let _ = &c * &a;
    assert_eq!(alg.operators().gp().builds(), 1);
}

#[test]
fn zero_shaped_operands_are_cacheable() {
    let alg = Algebra::new(2, 0, 0).unwrap();
    let zero = alg.multivector(&[], &[]).unwrap();
    let v = alg.vector(&[1.0, 2.0]).unwrap();
    let product = &zero * &v;
    assert!(product.is_zero());
    assert!(product.keys().is_empty());
    let _ = &zero * &v;
    assert_eq!(alg.operators().gp().builds(), 1);
}

#[test]
fn identically_zero_results_are_cached_not_errors() {
    let alg = Algebra::new(3, 0, 1).unwrap();
    let e0 = alg.blade("e0").unwrap();
    // e0 * e0 = 0 structurally.
    let product = &e0 * &e0;
    assert!(product.is_zero());
    let again = &e0 * &e0;
    assert!(again.is_zero());
    assert_eq!(alg.operators().gp().builds(), 1);
}

#[test]
fn not_invertible_kernels_are_cached_too() {
    let alg = Algebra::new(3, 0, 1).unwrap();
    let e0 = alg.blade("e0").unwrap();
    assert_eq!(e0.inv().unwrap_err(), AlgebraError::NotInvertible);
    assert_eq!(e0.scale(7.0).inv().unwrap_err(), AlgebraError::NotInvertible);
    assert_eq!(alg.operators().inv().builds(), 1);
}

#[test]
fn concurrent_callers_share_the_caches() {
    let alg = Algebra::new(3, 0, 0).unwrap();
    std::thread::scope(|scope| {
        for i in 0..8 {
            let alg = &alg;
            scope.spawn(move || {
                let v = alg.vector(&[i as f64 + 1.0, 2.0, 3.0]).unwrap();
                let w = alg.vector(&[4.0, 5.0, i as f64]).unwrap();
                let product = &v * &w;
                assert!(!product.is_zero());
                let _ = v.inv().unwrap();
            });
        }
    });
    // Duplicate racing builds may happen, but at most one kernel per shape
    // survives in the cache.
    assert_eq!(alg.operators().gp().len(), 1);
    assert_eq!(alg.operators().inv().len(), 1);
}

#[test]
fn kernels_reach_the_same_values_through_different_shapes() {
    let alg = Algebra::new(2, 0, 0).unwrap();
    // The same mathematical vector through a sparse and a padded shape.
    let sparse = alg.multivector(&[1], &[3.0]).unwrap();
    let padded = alg.multivector(&[1, 2], &[3.0, 0.0]).unwrap();
    let w = alg.vector(&[1.0, 2.0]).unwrap();
    let p1 = &sparse * &w;
    let p2 = &padded * &w;
    for i in 0..alg.basis_len() {
        assert!((p1.coeff(i) - p2.coeff(i)).abs() < EPS);
    }
    // Two shapes, two kernels.
    assert_eq!(alg.operators().gp().builds(), 2);
}
