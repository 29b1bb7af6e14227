// tests/operator_tests.rs
use clifford_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EPS: f64 = 1e-10;

fn assert_close(a: &Multivector, b: &Multivector) {
    let n = a.algebra().basis_len();
    for i in 0..n {
        assert!(
            (a.coeff(i) - b.coeff(i)).abs() < EPS,
            "blade {i}: {} vs {}",
            a.coeff(i),
            b.coeff(i)
        );
    }
}

fn random_mv<'a>(alg: &'a Algebra, rng: &mut StdRng) -> Multivector<'a> {
    let coefficients: Vec<f64> = (0..alg.basis_len())
        .map(|_| if rng.gen_bool(0.6) { rng.gen_range(-2.0..2.0) } else { 0.0 })
        .collect();
    alg.from_coefficients(&coefficients).unwrap()
}

#[test]
fn vector_product_splits_into_dot_and_wedge() {
    let alg = Algebra::new(3, 0, 0).unwrap();
    let v1 = alg.vector(&[1.0, 2.0, 3.0]).unwrap();
    let v2 = alg.vector(&[4.0, 5.0, 6.0]).unwrap();
    let product = &v1 * &v2;
    // Dot part: 1*4 + 2*5 + 3*6 = 32.
    assert!((product.scalar_coeff() - 32.0).abs() < EPS);
    // Wedge part: antisymmetric combinations on e12, e13, e23.
    assert!((product.coeff(0b011) - (1.0 * 5.0 - 2.0 * 4.0)).abs() < EPS);
    assert!((product.coeff(0b101) - (1.0 * 6.0 - 3.0 * 4.0)).abs() < EPS);
    assert!((product.coeff(0b110) - (2.0 * 6.0 - 3.0 * 5.0)).abs() < EPS);
}

#[test]
fn outer_product_is_grade_raising_and_alternating() {
    let alg = Algebra::new(3, 0, 0).unwrap();
    let v = alg.vector(&[1.0, 2.0, 3.0]).unwrap();
    assert!((&v ^ &v).is_zero());
    let e1 = alg.blade("e1").unwrap();
    let e2 = alg.blade("e2").unwrap();
    let wedge = &e1 ^ &e2;
    assert_eq!(wedge.grades(), vec![2]);
    assert!((wedge.coeff(0b011) - 1.0).abs() < EPS);
}

#[test]
fn contractions_lower_grade_from_either_side() {
    let alg = Algebra::new(3, 0, 0).unwrap();
    let e1 = alg.blade("e1").unwrap();
    let e12 = alg.blade("e12").unwrap();
    // e1 ⌋ e12 = e2.
    let left = e1.lc(&e12);
    assert!((left.coeff(0b010) - 1.0).abs() < EPS);
    // e12 ⌊ e1 = -e2.
    let right = e12.rc(&e1);
    assert!((right.coeff(0b010) + 1.0).abs() < EPS);
    // The wrong-way contraction vanishes.
    assert!(e12.lc(&e1).is_zero());
}

#[test]
fn scalar_and_inner_products_filter_grades() {
    let alg = Algebra::new(3, 0, 0).unwrap();
    let v1 = alg.vector(&[1.0, 2.0, 3.0]).unwrap();
    let v2 = alg.vector(&[4.0, 5.0, 6.0]).unwrap();
    let sp = v1.sp(&v2);
    assert_eq!(sp.grades(), vec![0]);
    assert!((sp.scalar_coeff() - 32.0).abs() < EPS);

    let ip = &v1 | &v2;
    assert!((ip.scalar_coeff() - 32.0).abs() < EPS);
    assert_eq!(ip.grades(), vec![0]);
}

#[test]
fn commutator_and_anticommutator_split_the_product() {
    let alg = Algebra::new(3, 0, 0).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let a = random_mv(&alg, &mut rng);
    let b = random_mv(&alg, &mut rng);
    let recombined = &a.cp(&b) + &a.acp(&b);
    assert_close(&recombined, &(&a * &b));
}

#[test]
fn regressive_product_with_the_pseudoscalar_is_identity() {
    let alg = Algebra::new(3, 0, 1).unwrap();
    let pss = alg.pss();
    for name in ["e0", "e1", "e12", "e012", "e0123"] {
        let blade = alg.blade(name).unwrap();
        assert_close(&blade.rp(&pss), &blade);
        assert_close(&pss.rp(&blade), &blade);
    }
}

#[test]
fn sandwich_by_a_rotor_rotates() {
    let alg = Algebra::new(3, 0, 0).unwrap();
    let half = std::f64::consts::FRAC_PI_4;
    // R = cos(θ/2) - sin(θ/2) e12, θ = π/2.
    let rotor = &alg.scalar(half.cos()) - &(&alg.blade("e12").unwrap() * half.sin());
    let v = alg.vector(&[1.0, 0.0, 0.0]).unwrap();
    let rotated = rotor.sw(&v);
    assert!((rotated.coeff(0b001)).abs() < EPS);
    assert!((rotated.coeff(0b010) - 1.0).abs() < EPS);
    assert!((rotated.coeff(0b100)).abs() < EPS);
}

#[test]
fn vector_inverse_is_the_vector_over_its_square() {
    let alg = Algebra::new(3, 0, 0).unwrap();
    let v = alg.vector(&[3.0, 4.0, 0.0]).unwrap();
    let inv = v.inv().unwrap();
    assert_close(&inv, &v.scale(1.0 / 25.0));
    assert_close(&(&v * &inv), &alg.scalar(1.0));
}

#[test]
fn mixed_grade_inverse_multiplies_back_to_one() {
    let alg = Algebra::new(2, 1, 0).unwrap();
    // Scalar-dominant operands keep the denominator well away from zero.
    let cases: [&[f64]; 3] = [
        &[3.0, 0.5, -0.3, 0.0, 0.8, 0.0, -0.2, 0.1],
        &[2.0, 0.0, 1.0, 0.0, 0.0, -0.5, 0.0, 0.0],
        &[-4.0, 1.0, 0.0, 0.5, 0.0, 0.0, 0.25, -1.0],
    ];
    for coefficients in cases {
        let x = alg.from_coefficients(coefficients).unwrap();
        let inv = x.inv().unwrap();
        assert_close(&(&x * &inv), &alg.scalar(1.0));
        assert_close(&(&inv * &x), &alg.scalar(1.0));
    }
}

#[test]
fn null_vector_inversion_fails() {
    let alg = Algebra::new(3, 0, 1).unwrap();
    let e0 = alg.blade("e0").unwrap();
    assert_eq!(e0.inv().unwrap_err(), AlgebraError::NotInvertible);
    // A numerically zero multivector fails too (PGA vectors have 4 slots).
    let zero = alg.vector(&[0.0, 0.0, 0.0, 0.0]).unwrap();
    assert_eq!(zero.inv().unwrap_err(), AlgebraError::NotInvertible);
}

#[test]
fn division_undoes_multiplication() {
    let alg = Algebra::new(3, 0, 0).unwrap();
    let mut rng = StdRng::seed_from_u64(23);
    let a = random_mv(&alg, &mut rng);
    let b = alg.vector(&[1.0, -2.0, 0.5]).unwrap();
    let quotient = (&a * &b).div(&b).unwrap();
    assert_close(&quotient, &a);
}

#[test]
fn projection_of_a_vector_onto_an_axis() {
    let alg = Algebra::new(3, 0, 0).unwrap();
    let v = alg.vector(&[3.0, 4.0, 0.0]).unwrap();
    let e1 = alg.blade("e1").unwrap();
    let onto = v.proj(&e1).unwrap();
    assert_close(&onto, &alg.vector(&[3.0, 0.0, 0.0]).unwrap());
    // Projecting onto an uninvertible blade fails.
    let pga = Algebra::new(3, 0, 1).unwrap();
    let x = pga.blade("e1").unwrap();
    let e0 = pga.blade("e0").unwrap();
    assert_eq!(x.proj(&e0).unwrap_err(), AlgebraError::NotInvertible);
}

#[test]
fn normsq_and_norm_of_a_rotor() {
    let alg = Algebra::new(3, 0, 0).unwrap();
    let half = 0.3f64;
    let rotor = &alg.scalar(half.cos()) - &(&alg.blade("e12").unwrap() * half.sin());
    let nsq = rotor.normsq();
    assert_eq!(nsq.grades(), vec![0]);
    assert!((nsq.scalar_coeff() - 1.0).abs() < EPS);
    assert!((rotor.norm() - 1.0).abs() < EPS);
}

#[test]
fn outer_exponential_of_a_simple_bivector() {
    let alg = Algebra::new(4, 0, 0).unwrap();
    let b = alg.blade("e12").unwrap().scale(2.5);
    let exp = b.outerexp();
    // e12 ∧ e12 = 0, so the series is 1 + B.
    assert_close(&exp, &(&alg.scalar(1.0) + &b));
    assert_close(&b.outersin(), &b);
    assert_close(&b.outercos(), &alg.scalar(1.0));
    assert_close(&b.outertan().unwrap(), &b);
}

#[test]
fn outer_trig_of_a_non_simple_bivector() {
    let alg = Algebra::new(4, 0, 0).unwrap();
    // B = 3 e12 + 5 e34: B ∧ B = 30 e1234.
    let e12 = alg.blade("e12").unwrap();
    let e34 = alg.blade("e34").unwrap();
    let b = &e12.scale(3.0) + &e34.scale(5.0);
    let cos = b.outercos();
    assert!((cos.scalar_coeff() - 1.0).abs() < EPS);
    assert!((cos.coeff(alg.basis_len() - 1) - 15.0).abs() < EPS);
    // sin + cos together reproduce the outer exponential.
    assert_close(&(&b.outersin() + &cos), &b.outerexp());
}

#[test]
fn involutions_act_per_grade() {
    let alg = Algebra::new(3, 0, 0).unwrap();
    let x = alg
        .from_coefficients(&[1.0, 2.0, 0.0, 3.0, 0.0, 0.0, 0.0, 4.0])
        .unwrap();
    let rev = x.reverse();
    assert_eq!(rev.coeff(0), 1.0);
    assert_eq!(rev.coeff(1), 2.0);
    assert_eq!(rev.coeff(3), -3.0);
    assert_eq!(rev.coeff(7), -4.0);
    let inv = x.involute();
    assert_eq!(inv.coeff(1), -2.0);
    assert_eq!(inv.coeff(3), 3.0);
    assert_eq!(inv.coeff(7), -4.0);
    let conj = x.conjugate();
    assert_eq!(conj.coeff(1), -2.0);
    assert_eq!(conj.coeff(3), -3.0);
    assert_eq!(conj.coeff(7), 4.0);
}

#[test]
fn geometric_product_is_associative_and_distributive() {
    let alg = Algebra::new(2, 1, 1).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..10 {
        let a = random_mv(&alg, &mut rng);
        let b = random_mv(&alg, &mut rng);
        let c = random_mv(&alg, &mut rng);
        assert_close(&(&(&a * &b) * &c), &(&a * &(&b * &c)));
        assert_close(&(&a * &(&b + &c)), &(&(&a * &b) + &(&a * &c)));
    }
}

#[test]
fn reversion_antidistributes_over_products() {
    let alg = Algebra::new(3, 0, 0).unwrap();
    let mut rng = StdRng::seed_from_u64(99);
    let a = random_mv(&alg, &mut rng);
    let b = random_mv(&alg, &mut rng);
    assert_close(&(&a * &b).reverse(), &(&b.reverse() * &a.reverse()));
}
