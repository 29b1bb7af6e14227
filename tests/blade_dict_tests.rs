// tests/blade_dict_tests.rs
use clifford_engine::prelude::*;

#[test]
fn blades_are_eager_up_to_six_dimensions() {
    let alg = Algebra::new(3, 0, 1).unwrap();
    assert!(!alg.blade_dict().is_lazy());
    assert_eq!(alg.blade_dict().len(), 16);
}

#[test]
fn blades_are_lazy_above_six_dimensions() {
    let alg = Algebra::new(7, 0, 0).unwrap();
    assert!(alg.blade_dict().is_lazy());
    assert_eq!(alg.blade_dict().len(), 0);
    let e12 = alg.blade("e12").unwrap();
    assert_eq!(e12.keys(), &[0b11]);
    assert_eq!(e12.values(), &[1.0]);
    assert_eq!(alg.blade_dict().len(), 1);
    // A repeat lookup is served from the cache.
    let again = alg.blade("e12").unwrap();
    assert_eq!(alg.blade_dict().len(), 1);
    assert_eq!(e12, again);
}

#[test]
fn lazy_and_eager_policies_return_identical_blades() {
    // Same blade name in a 6D (eager) and 7D (lazy) algebra has the same
    // index and payload.
    let eager = Algebra::new(6, 0, 0).unwrap();
    let lazy = Algebra::new(7, 0, 0).unwrap();
    for name in ["e", "e1", "e24", "e123456"] {
        let a = eager.blade(name).unwrap();
        let b = lazy.blade(name).unwrap();
        assert_eq!(a.keys(), b.keys());
        assert_eq!(a.values(), b.values());
    }
}

#[test]
fn unknown_blade_lookup_is_recoverable() {
    let alg = Algebra::new(2, 0, 0).unwrap();
    assert_eq!(
        alg.blade("e3").unwrap_err(),
        AlgebraError::UnknownBlade("e3".to_string())
    );
    // The algebra remains fully usable afterwards.
    assert!(alg.blade("e12").is_ok());
}

#[test]
fn graded_blades_span_their_grade_slice() {
    let options = AlgebraOptions { graded: true, ..Default::default() };
    let alg = Algebra::with_options(2, 0, 0, options).unwrap();
    let e1 = alg.blade("e1").unwrap();
    assert_eq!(e1.keys(), &[1, 2]);
    assert_eq!(e1.values(), &[1.0, 0.0]);
    // Value content is unchanged: it is still just e1.
    assert_eq!(e1.coeff(1), 1.0);
    assert_eq!(e1.coeff(2), 0.0);
}

#[test]
fn scalar_blade_is_the_bare_e() {
    let alg = Algebra::new(3, 0, 0).unwrap();
    let one = alg.blade("e").unwrap();
    assert_eq!(one.keys(), &[0]);
    assert_eq!(one.scalar_coeff(), 1.0);
}
