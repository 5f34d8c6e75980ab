//! Coefficient types and the tolerance layer.
//!
//! The engines are generic over a scalar `N: Num`. Three scalars are
//! supported: `i64` (exact, gcd-reduced) and `f32`/`f64` (approximate,
//! compared against an absolute tolerance). Arithmetic goes through the
//! `ref_*` methods so the generic code reads the same for Copy scalars
//! and for any future by-reference scalar.

use std::fmt::{Debug, Display};
use std::str::FromStr;

/// Scalar contract for the engines.
pub trait Num: Clone + PartialOrd + PartialEq + Debug + Display + FromStr + 'static {
    /// Whether arithmetic on this scalar is exact. Exact scalars use a
    /// zero tolerance and gcd normalization.
    const EXACT: bool;

    fn zero() -> Self;
    fn one() -> Self;
    fn abs(&self) -> Self;
    fn ref_neg(&self) -> Self;
    fn ref_add(&self, other: &Self) -> Self;
    fn ref_sub(&self, other: &Self) -> Self;
    fn ref_mul(&self, other: &Self) -> Self;
    /// Division. Exact scalars only see divisors that divide evenly
    /// (gcd factors and pivot entries).
    fn ref_div(&self, other: &Self) -> Self;
    /// Positive gcd of two scalars, with `gcd(0, 0) = 1`. Approximate
    /// scalars return 1 so gcd reduction degenerates to a no-op.
    fn gcd(&self, other: &Self) -> Self;
}

impl Num for i64 {
    const EXACT: bool = true;

    fn zero() -> Self {
        0
    }

    fn one() -> Self {
        1
    }

    fn abs(&self) -> Self {
        i64::abs(*self)
    }

    fn ref_neg(&self) -> Self {
        -self
    }

    fn ref_add(&self, other: &Self) -> Self {
        self + other
    }

    fn ref_sub(&self, other: &Self) -> Self {
        self - other
    }

    fn ref_mul(&self, other: &Self) -> Self {
        self * other
    }

    fn ref_div(&self, other: &Self) -> Self {
        self / other
    }

    fn gcd(&self, other: &Self) -> Self {
        let (mut a, mut b) = (self.abs(), other.abs());
        if a == 0 && b == 0 {
            return 1;
        }
        if a == 0 {
            return b;
        }
        while b != 0 {
            let r = a % b;
            a = b;
            b = r;
        }
        a
    }
}

macro_rules! impl_float_num {
    ($($ty:ty),*) => {
        $(impl Num for $ty {
            const EXACT: bool = false;

            fn zero() -> Self {
                0.0
            }

            fn one() -> Self {
                1.0
            }

            fn abs(&self) -> Self {
                <$ty>::abs(*self)
            }

            fn ref_neg(&self) -> Self {
                -self
            }

            fn ref_add(&self, other: &Self) -> Self {
                self + other
            }

            fn ref_sub(&self, other: &Self) -> Self {
                self - other
            }

            fn ref_mul(&self, other: &Self) -> Self {
                self * other
            }

            fn ref_div(&self, other: &Self) -> Self {
                self / other
            }

            fn gcd(&self, _other: &Self) -> Self {
                1.0
            }
        })*
    };
}

impl_float_num!(f32, f64);

/// Sign of a scalar under a tolerance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

/// Absolute tolerance used for every comparison against zero.
///
/// Exact scalars use `Tolerance::exact()`, which degenerates every
/// comparison to the strict one.
#[derive(Clone, Copy, Debug)]
pub struct Tolerance<N> {
    eps: N,
    neg_eps: N,
}

impl<N: Num> Tolerance<N> {
    pub fn new(eps: N) -> Self {
        let eps = eps.abs();
        let neg_eps = eps.ref_neg();
        Self { eps, neg_eps }
    }

    pub fn exact() -> Self {
        Self::new(N::zero())
    }

    pub fn eps(&self) -> &N {
        &self.eps
    }

    pub fn is_zero(&self, value: &N) -> bool {
        value.abs() <= self.eps
    }

    pub fn is_positive(&self, value: &N) -> bool {
        *value > self.eps
    }

    pub fn is_negative(&self, value: &N) -> bool {
        *value < self.neg_eps
    }

    pub fn sign(&self, value: &N) -> Sign {
        if self.is_negative(value) {
            Sign::Negative
        } else if self.is_positive(value) {
            Sign::Positive
        } else {
            Sign::Zero
        }
    }
}

impl<N: Num> Default for Tolerance<N> {
    fn default() -> Self {
        Self::exact()
    }
}

/// Positive gcd of a slice, 1 for the all-zero slice.
///
/// Walks the elements and stops early once the gcd collapses to 1.
pub fn gcd_slice<N: Num>(values: &[N]) -> N {
    let mut delta = N::one();
    let mut rest = values.iter();
    for value in rest.by_ref() {
        if *value != N::zero() {
            delta = value.abs();
            break;
        }
    }
    for value in rest {
        if *value != N::zero() {
            delta = delta.gcd(value);
            if delta == N::one() {
                break;
            }
        }
    }
    delta
}

/// In-place canonicalization of a coefficient vector.
pub trait Normalizer<N>: Default {
    /// Returns false when the vector is identically zero and could not
    /// be normalized.
    fn normalize(&self, values: &mut [N]) -> bool;
}

/// Divides through by the positive gcd of the components.
#[derive(Clone, Copy, Debug, Default)]
pub struct GcdNormalizer;

impl<N: Num> Normalizer<N> for GcdNormalizer {
    fn normalize(&self, values: &mut [N]) -> bool {
        let delta = gcd_slice(values);
        if delta != N::one() {
            for value in values.iter_mut() {
                *value = value.ref_div(&delta);
            }
        }
        values.iter().any(|v| *v != N::zero())
    }
}

/// Divides through by the largest absolute component.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaxNormalizer;

impl<N: Num> Normalizer<N> for MaxNormalizer {
    fn normalize(&self, values: &mut [N]) -> bool {
        let Some(first) = values.first() else {
            return false;
        };
        let mut max_abs = first.abs();
        for value in &values[1..] {
            let abs = value.abs();
            if abs > max_abs {
                max_abs = abs;
            }
        }
        if max_abs == N::zero() {
            return false;
        }
        for value in values.iter_mut() {
            *value = value.ref_div(&max_abs);
        }
        true
    }
}

/// The canonical normalizer for a scalar: gcd reduction when exact,
/// max-abs scaling otherwise.
pub trait DefaultNormalizer: Num {
    type Norm: Normalizer<Self> + Default;
}

impl DefaultNormalizer for i64 {
    type Norm = GcdNormalizer;
}

impl DefaultNormalizer for f32 {
    type Norm = MaxNormalizer;
}

impl DefaultNormalizer for f64 {
    type Norm = MaxNormalizer;
}

#[cfg(test)]
mod tests {
    use super::{GcdNormalizer, MaxNormalizer, Normalizer, Num, Sign, Tolerance, gcd_slice};

    #[test]
    fn gcd_follows_the_usual_laws() {
        assert_eq!(12i64.gcd(&18), 6);
        assert_eq!((-12i64).gcd(&18), 6);
        assert_eq!(12i64.gcd(&-18), 6);
        assert_eq!(0i64.gcd(&0), 1);
        assert_eq!(0i64.gcd(&-7), 7);
        assert_eq!((-7i64).gcd(&0), 7);
    }

    #[test]
    fn gcd_slice_ignores_zeros() {
        assert_eq!(gcd_slice(&[0i64, 6, 0, -9]), 3);
        assert_eq!(gcd_slice(&[0i64, 0]), 1);
        assert_eq!(gcd_slice::<i64>(&[]), 1);
    }

    #[test]
    fn gcd_normalization_is_idempotent() {
        let mut v = vec![4i64, -6, 10];
        assert!(GcdNormalizer.normalize(&mut v));
        assert_eq!(v, vec![2, -3, 5]);
        let reduced = v.clone();
        assert!(GcdNormalizer.normalize(&mut v));
        assert_eq!(v, reduced);
    }

    #[test]
    fn max_normalization_is_idempotent_and_preserves_sign() {
        let mut v = vec![0.5f64, -2.0, 1.0];
        assert!(MaxNormalizer.normalize(&mut v));
        assert_eq!(v, vec![0.25, -1.0, 0.5]);
        let scaled = v.clone();
        assert!(MaxNormalizer.normalize(&mut v));
        assert_eq!(v, scaled);
    }

    #[test]
    fn zero_vector_does_not_normalize() {
        let mut v = vec![0.0f64; 3];
        assert!(!MaxNormalizer.normalize(&mut v));
        let mut w = vec![0i64; 3];
        assert!(!GcdNormalizer.normalize(&mut w));
        assert_eq!(w, vec![0; 3]);
    }

    #[test]
    fn tolerance_classifies_signs() {
        let tol = Tolerance::new(1e-8f64);
        assert_eq!(tol.sign(&1e-9), Sign::Zero);
        assert_eq!(tol.sign(&-1e-9), Sign::Zero);
        assert_eq!(tol.sign(&1e-6), Sign::Positive);
        assert_eq!(tol.sign(&-1e-6), Sign::Negative);

        let exact = Tolerance::<i64>::exact();
        assert_eq!(exact.sign(&0), Sign::Zero);
        assert_eq!(exact.sign(&1), Sign::Positive);
        assert_eq!(exact.sign(&-1), Sign::Negative);
    }
}
