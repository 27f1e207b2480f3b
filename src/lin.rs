//! A minimal linear space trait for the minimizer.
//!
//! The main interface is `Lin` with an implementation for a vector of real
//! numbers, `Rn<F>`, and a trivial one for any scalar `F: Float` so that
//! one-dimensional problems need no wrapper.
//!
//! ```rust
//! use newton_cg_min::{Lin, Rn};
//!
//! let x = Rn::new(vec![1., 2.]);
//! let y = Rn::new(vec![2., -3.]);
//!
//! assert_eq!(x.dot(&y), -4.);
//! assert_eq!(x.dim(), 2);
//! ```

use num_traits::{Float, One};
use std::iter::repeat;
use std::ops::{Add, Deref, DerefMut, Mul};

/// Trait defining basic operations for an element of a linear space.
///
/// The focus is on operations _in place_: methods that return a `Lin` object
/// modify the object in place. This is what lets the solver run an entire
/// minimization with a fixed set of buffers.
pub trait Lin {
    /// Scalars for this linear space.
    type S: Float;

    /// Dimension of the space; bounds the conjugate gradient iteration.
    fn dim(&self) -> usize;

    /// Dot product (inner product).
    fn dot(&self, other: &Self) -> Self::S;

    /// Multiplication by a constant.
    fn scale(&mut self, a: Self::S) -> &mut Self;

    /// Adds a vector multiplied by a constant to this vector.
    fn ray_to(&mut self, other: &Self, t: Self::S) -> &mut Self;

    /// Return the origin of the vector space to which self belongs.
    fn origin(&self) -> Self;

    /// `true` if every component is finite.
    fn all_finite(&self) -> bool;

    /// Norm of the vector.
    fn norm(&self) -> Self::S {
        self.norm_squared().sqrt()
    }

    /// Square of the norm.
    fn norm_squared(&self) -> Self::S {
        self.dot(self)
    }

    /// Distance between two vectors.
    ///
    /// Default implementation uses
    /// `|x - y| = sqrt(x.x - 2 x.y + y.y)`
    /// to avoid copying.
    fn dist(&self, other: &Self) -> Self::S {
        (self.norm_squared() + other.norm_squared()
            - (Self::S::one() + Self::S::one()) * self.dot(other))
        .sqrt()
    }

    /// Adds a vector to this vector.
    fn add_mut(&mut self, other: &Self) -> &mut Self {
        self.ray_to(other, Self::S::one())
    }

    /// Creates a linear combination: `self = a * self + b * other`.
    fn combine(&mut self, a: Self::S, other: &Self, b: Self::S) -> &mut Self {
        self.scale(a).ray_to(other, b)
    }
}

/// An implementation of the `Lin` trait: an n-dimensional real vector.
///
/// Backed by a `Vec<F>`, where `F` is `Float`.
#[derive(Clone, Debug, PartialEq)]
pub struct Rn<F: Float> {
    vec: Vec<F>,
}

impl<F: Float> Rn<F> {
    pub fn new(v: Vec<F>) -> Self {
        Rn { vec: v }
    }
}

impl<F: Float> Deref for Rn<F> {
    type Target = Vec<F>;

    fn deref(&self) -> &Vec<F> {
        &self.vec
    }
}

impl<F: Float> DerefMut for Rn<F> {
    fn deref_mut(&mut self) -> &mut Vec<F> {
        &mut self.vec
    }
}

impl<F: Float> Mul<F> for Rn<F> {
    type Output = Rn<F>;

    fn mul(mut self, other: F) -> Self {
        self.scale(other);
        self
    }
}

impl<F: Float> Add for Rn<F> {
    type Output = Rn<F>;

    fn add(mut self, other: Self) -> Self {
        self.add_mut(&other);
        self
    }
}

impl<F: Float> Lin for Rn<F> {
    type S = F;

    fn dim(&self) -> usize {
        self.len()
    }

    fn dist(&self, other: &Self) -> Self::S {
        assert_eq!(self.len(), other.len());
        self.iter()
            .zip(other.iter())
            .fold(Self::S::zero(), |sum, (&x, &y)| sum + (x - y).powi(2))
            .sqrt()
    }

    fn dot(&self, other: &Self) -> Self::S {
        assert_eq!(self.len(), other.len());
        self.iter()
            .zip(other.iter())
            .fold(Self::S::zero(), |sum, (&x, &y)| sum + x * y)
    }

    fn scale(&mut self, a: Self::S) -> &mut Self {
        for x in self.iter_mut() {
            *x = *x * a;
        }
        self
    }

    fn combine(&mut self, a: Self::S, other: &Self, b: Self::S) -> &mut Self {
        assert_eq!(self.len(), other.len());
        for (x, y) in self.iter_mut().zip(other.iter()) {
            *x = *x * a + *y * b;
        }
        self
    }

    fn ray_to(&mut self, other: &Self, b: Self::S) -> &mut Self {
        assert_eq!(self.len(), other.len());
        for (x, y) in self.iter_mut().zip(other.iter()) {
            *x = *x + *y * b;
        }
        self
    }

    fn origin(&self) -> Self {
        Rn::new(repeat(Self::S::zero()).take(self.len()).collect())
    }

    fn all_finite(&self) -> bool {
        self.iter().all(|x| x.is_finite())
    }
}

// Trivial implementation of `Lin` for any `num_traits::Float` as an element
// of a one-dimensional linear space over itself.
impl<F: Float> Lin for F {
    type S = F;

    fn dim(&self) -> usize {
        1
    }

    fn dot(&self, other: &Self) -> Self::S {
        *self * *other
    }

    fn scale(&mut self, a: Self::S) -> &mut Self {
        *self = *self * a;
        self
    }

    fn combine(&mut self, a: Self::S, other: &Self, b: Self::S) -> &mut Self {
        *self = *self * a + *other * b;
        self
    }

    fn ray_to(&mut self, other: &Self, b: Self::S) -> &mut Self {
        *self = *self + *other * b;
        self
    }

    fn origin(&self) -> Self {
        F::zero()
    }

    fn all_finite(&self) -> bool {
        Float::is_finite(*self)
    }

    fn dist(&self, other: &Self) -> Self::S {
        (*self - *other).abs()
    }

    fn norm(&self) -> Self::S {
        self.abs()
    }
}

#[cfg(test)]
mod test {
    use super::{Lin, Rn};
    use quickcheck::{quickcheck, TestResult};
    use std::cmp::min;

    // relative error: this shouldn't be too small
    const EPS: f64 = 1e-10;

    fn eps_eq(a: f64, b: f64) -> bool {
        let m = a.abs() + b.abs();
        (a - b).abs() <= EPS * m
    }

    // quickcheck generates NaN, infinities and overflow-scale floats; those
    // make relative comparisons meaningless, so the properties discard them
    fn tame(v: &[f64]) -> bool {
        v.iter().all(|x| x.is_finite() && x.abs() < 1e100)
    }

    fn trunc(v: Vec<f64>, w: Vec<f64>) -> (Rn<f64>, Rn<f64>) {
        let mut v = Rn::new(v);
        let mut w = Rn::new(w);
        let l = min(v.len(), w.len());
        v.truncate(l);
        w.truncate(l);
        (v, w)
    }

    #[test]
    fn lin_f64_scalar() {
        fn prop(a: f64, b: f64, c: f64) -> TestResult {
            if !tame(&[a, b, c]) {
                return TestResult::discard();
            }
            let mut d = a;
            d.ray_to(&b, c);
            TestResult::from_bool(
                eps_eq(a.norm(), a.dist(&a.origin()))
                    && eps_eq(d.dot(&a), a.norm_squared() + c * a * b),
            )
        }

        quickcheck(prop as fn(f64, f64, f64) -> TestResult);
        let mut a = 1.;
        a.combine(2., &3., 4.);
        assert_eq!(a.norm(), 1. * 2. + 3. * 4.);
        assert_eq!(a.dim(), 1);
    }

    #[test]
    fn scale_norm_zero() {
        fn prop(v: Vec<f64>) -> TestResult {
            if !tame(&v) {
                return TestResult::discard();
            }
            let mut v = Rn::new(v);
            TestResult::from_bool(eps_eq(0., v.scale(0.).norm()))
        }
        quickcheck(prop as fn(Vec<f64>) -> TestResult);
    }

    #[test]
    fn dot_equal_norm_squared() {
        fn prop(v: Vec<f64>) -> TestResult {
            if !tame(&v) {
                return TestResult::discard();
            }
            let v = Rn::new(v);
            TestResult::from_bool(eps_eq(v.dot(&v), v.norm().powi(2)))
        }
        quickcheck(prop as fn(Vec<f64>) -> TestResult);
    }

    #[test]
    fn origin() {
        fn prop(v: Vec<f64>) -> TestResult {
            if !tame(&v) {
                return TestResult::discard();
            }
            let v = Rn::new(v);
            let o = v.origin();
            TestResult::from_bool(eps_eq(o.norm(), 0.) && o.dim() == v.dim())
        }
        quickcheck(prop as fn(Vec<f64>) -> TestResult);
    }

    #[test]
    fn dist_norm() {
        fn prop(v: Vec<f64>, w: Vec<f64>) -> TestResult {
            if !tame(&v) || !tame(&w) {
                return TestResult::discard();
            }
            let (mut v, w) = trunc(v, w);

            let d = v.dist(&w);
            v.ray_to(&w, -1.);

            TestResult::from_bool(eps_eq(d, v.norm()))
        }
        quickcheck(prop as fn(Vec<f64>, Vec<f64>) -> TestResult);
    }

    #[test]
    fn combine_ray_to() {
        fn prop(v: Vec<f64>, w: Vec<f64>, a: f64) -> TestResult {
            if !tame(&v) || !tame(&w) || !tame(&[a]) {
                return TestResult::discard();
            }
            let (mut v, w) = trunc(v, w);

            let mut v1 = v.clone();
            v.combine(1., &w, a);
            v1.ray_to(&w, a);

            TestResult::from_bool(eps_eq(v.dist(&v1), 0.))
        }
        quickcheck(prop as fn(Vec<f64>, Vec<f64>, f64) -> TestResult);
    }

    #[test]
    fn combine_dot() {
        fn prop(v: Vec<f64>, w: Vec<f64>, z: Vec<f64>, a: f64) -> TestResult {
            if !tame(&v) || !tame(&w) || !tame(&z) || !tame(&[a]) {
                return TestResult::discard();
            }
            let mut v = Rn::new(v);
            let mut w = Rn::new(w);
            let mut z = Rn::new(z);
            let l = min(v.len(), min(w.len(), z.len()));
            v.truncate(l);
            w.truncate(l);
            z.truncate(l);

            let b = 3.5;

            let dv = v.dot(&z);
            let dw = w.dot(&z);

            v.combine(a, &w, b);

            let dvw = v.dot(&z);
            TestResult::from_bool(eps_eq(a * dv + b * dw, dvw))
        }
        quickcheck(prop as fn(Vec<f64>, Vec<f64>, Vec<f64>, f64) -> TestResult);
    }

    #[test]
    fn all_finite_flags_nan_and_inf() {
        assert!(Rn::new(vec![1., -2., 0.]).all_finite());
        assert!(!Rn::new(vec![1., f64::NAN]).all_finite());
        assert!(!Rn::new(vec![f64::INFINITY, 0.]).all_finite());
        assert!(!f64::NAN.all_finite());
    }
}
