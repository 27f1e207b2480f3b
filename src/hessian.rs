//! Hessian operator abstraction.
//!
//! The conjugate gradient solver only ever multiplies the Hessian by a
//! vector, so the Hessian is represented as an opaque linear operator with
//! two concrete forms: a dense symmetric matrix materialized once per outer
//! iteration (`DenseHessian`), and a user routine computing `H(x)·p`
//! directly without forming the matrix (`HessianProduct`).

use crate::lin::{Lin, Rn};
use ndarray::Array2;
use num_traits::Float;

/// A linear operator `p ↦ H(x)·p` for the Hessian at an iterate `x`.
///
/// `refresh` is called once per outer iteration, before any `apply`, so the
/// operator always acts at the current iterate. `eval_count` reports how
/// many times the underlying oracle has been consulted: once per `refresh`
/// for the dense form, once per `apply` for the product form.
pub trait HessianOp<V: Lin> {
    /// Rebuild the operator at the iterate `x`.
    fn refresh(&mut self, x: &V);

    /// Compute `y = H(x)·p`.
    fn apply(&mut self, p: &V, y: &mut V);

    /// Number of oracle evaluations performed so far.
    fn eval_count(&self) -> i32;
}

/// Hessian supplied as a dense symmetric matrix.
///
/// The closure is invoked once per outer iteration; every application inside
/// the inner CG loop is then a plain matrix-vector product.
pub struct DenseHessian<F: Float, H>
where
    H: FnMut(&Rn<F>) -> Array2<F>,
{
    hess: H,
    matrix: Array2<F>,
    evals: i32,
}

impl<F: Float, H> DenseHessian<F, H>
where
    H: FnMut(&Rn<F>) -> Array2<F>,
{
    pub fn new(hess: H) -> Self {
        DenseHessian {
            hess,
            matrix: Array2::zeros((0, 0)),
            evals: 0,
        }
    }
}

impl<F: Float, H> HessianOp<Rn<F>> for DenseHessian<F, H>
where
    H: FnMut(&Rn<F>) -> Array2<F>,
{
    fn refresh(&mut self, x: &Rn<F>) {
        self.matrix = (self.hess)(x);
        self.evals += 1;
        assert_eq!(self.matrix.nrows(), x.dim());
        assert_eq!(self.matrix.ncols(), x.dim());
    }

    fn apply(&mut self, p: &Rn<F>, y: &mut Rn<F>) {
        assert_eq!(self.matrix.nrows(), p.dim());
        assert_eq!(p.dim(), y.dim());
        for (yi, row) in y.iter_mut().zip(self.matrix.outer_iter()) {
            *yi = row
                .iter()
                .zip(p.iter())
                .fold(F::zero(), |sum, (&h, &pj)| sum + h * pj);
        }
    }

    fn eval_count(&self) -> i32 {
        self.evals
    }
}

/// Hessian supplied as a vector-product routine `(x, p, y) ↦ y = H(x)·p`.
///
/// The routine is invoked once per inner CG step, so its evaluation count
/// grows with the inner iterations, not the outer ones.
pub struct HessianProduct<V, P>
where
    V: Lin + Clone,
    P: FnMut(&V, &V, &mut V),
{
    hessp: P,
    x: Option<V>,
    evals: i32,
}

impl<V, P> HessianProduct<V, P>
where
    V: Lin + Clone,
    P: FnMut(&V, &V, &mut V),
{
    pub fn new(hessp: P) -> Self {
        HessianProduct {
            hessp,
            x: None,
            evals: 0,
        }
    }
}

impl<V, P> HessianOp<V> for HessianProduct<V, P>
where
    V: Lin + Clone,
    P: FnMut(&V, &V, &mut V),
{
    fn refresh(&mut self, x: &V) {
        match self.x {
            Some(ref mut x0) => x0.clone_from(x),
            None => self.x = Some(x.clone()),
        }
    }

    fn apply(&mut self, p: &V, y: &mut V) {
        let hessp = &mut self.hessp;
        let x = self.x.as_ref().expect("refresh must precede apply");
        hessp(x, p, y);
        self.evals += 1;
    }

    fn eval_count(&self) -> i32 {
        self.evals
    }
}
