//! The truncated Newton (Newton-CG) outer iteration.

use crate::backtracking::{Backtracking, BacktrackingError};
use crate::cg::{CGStop, TruncatedCG};
use crate::hessian::HessianOp;
use crate::lin::Lin;
use num_traits::Float;

/// Parameters of the truncated Newton method.
#[derive(Debug, Clone)]
pub struct NewtonCG<S: Float> {
    /// Inexact Newton direction solver.
    pub cg: TruncatedCG<S>,
    /// Parameters for the Armijo backtracking line search.
    pub line_method: Backtracking<S>,
    /// Desired norm of the gradient.
    pub grad_norm_tol: S,
    /// Step-size stagnation tolerance: the method stops once the norm of the
    /// update between consecutive iterates falls below this value.
    pub step_tol: S,
    /// Maximum number of outer iterations to take.
    pub max_iter: i32,
}

/// Why the method stopped. `MaxIterReached` is a reported outcome, not an
/// error; the iterate found so far is still returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Gradient norm fell below `grad_norm_tol`.
    GradientNorm,
    /// Update between consecutive iterates fell below `step_tol`.
    StepSize,
    /// Outer iteration cap reached without satisfying a tolerance.
    MaxIterReached,
}

/// Result of a minimization run.
#[derive(Debug, Clone)]
pub struct Solution<V, S> {
    /// Final iterate.
    pub x: V,
    /// Objective value at the final iterate.
    pub value: S,
    /// Gradient norm at the final iterate.
    pub grad_norm: S,
    /// Why the method stopped.
    pub termination: Termination,
    /// Number of outer iterations performed.
    pub iterations: i32,
    /// Number of objective/gradient oracle evaluations (the oracle computes
    /// both in one call).
    pub eval_count: i32,
    /// Number of Hessian oracle evaluations: matrix builds for the dense
    /// form, products for the vector-product form.
    pub hess_eval_count: i32,
}

#[derive(Debug, Clone)]
pub enum NewtonCGError<V> {
    /// Objective or gradient stopped being finite; carries the iterate at
    /// which the non-finite value was observed.
    NonFiniteValue(V),
    /// No acceptable step along the CG direction nor along the raw negative
    /// gradient; carries the current iterate and the last direction tried.
    LineSearchFailed(V, V, BacktrackingError),
}

impl<V> std::fmt::Display for NewtonCGError<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NewtonCGError::NonFiniteValue(_) => {
                write!(f, "objective or gradient evaluated to a non-finite value")
            }
            NewtonCGError::LineSearchFailed(_, _, e) => {
                write!(f, "line search failed along both candidate directions: {}", e)
            }
        }
    }
}

impl<V: std::fmt::Debug> std::error::Error for NewtonCGError<V> {}

/// Information about a performed outer iteration.
#[derive(Debug, Clone)]
pub struct NewtonCGIteration<S> {
    /// Iteration number (indexed from 0).
    pub k: i32,
    /// Function value at the beginning of the iteration.
    pub value: S,
    /// Gradient norm at the beginning of the iteration.
    pub grad_norm: S,
    /// Number of inner CG updates used for the direction.
    pub cg_iterations: i32,
    /// How the inner CG iteration stopped.
    pub cg_stop: CGStop,
    /// Whether the iteration fell back to the steepest descent direction.
    pub steepest_descent: bool,
    /// Accepted line search step.
    pub alpha: S,
    /// Number of oracle evaluations by the line search.
    pub line_eval_count: i32,
}

impl NewtonCG<f32> {
    pub fn new() -> Self {
        NewtonCG {
            cg: Default::default(),
            line_method: Default::default(),
            grad_norm_tol: 1e-3,
            step_tol: 1e-6,
            max_iter: 100,
        }
    }
}

impl NewtonCG<f64> {
    pub fn new() -> Self {
        NewtonCG {
            cg: Default::default(),
            line_method: Default::default(),
            grad_norm_tol: 1e-6,
            step_tol: 1e-9,
            max_iter: 100,
        }
    }
}

impl<S: Float> NewtonCG<S> {
    /// Minimize the given nonlinear function over a linear space.
    ///
    /// The function `f` must provide its value as well as its gradient,
    /// returned in the provided `&mut V` (to avoid allocation). `hess`
    /// supplies the Hessian at each iterate, either as a dense matrix or as
    /// a vector-product routine. `x0` is used as the initial guess.
    pub fn minimize<Func, V, H>(
        &self,
        x0: &V,
        f: Func,
        hess: H,
    ) -> Result<Solution<V, S>, NewtonCGError<V>>
    where
        Func: FnMut(&V, &mut V) -> S,
        V: Lin<S = S> + Clone,
        H: HessianOp<V>,
    {
        self.minimize_with_trace(x0, f, hess, |_, _| {})
    }

    /// The same as `minimize`, but allows to pass in a callback function
    /// that is called after every outer iteration. It is provided with the
    /// accepted point and with additional information about the performed
    /// iteration.
    pub fn minimize_with_trace<Func, V, H, Callback>(
        &self,
        x0: &V,
        mut f: Func,
        mut hess: H,
        mut callback: Callback,
    ) -> Result<Solution<V, S>, NewtonCGError<V>>
    where
        Func: FnMut(&V, &mut V) -> S,
        V: Lin<S = S> + Clone,
        H: HessianOp<V>,
        Callback: FnMut(&V, NewtonCGIteration<S>),
    {
        // allocate storage
        let mut x = x0.clone();
        let mut g = x0.origin();
        let mut x_temp = x0.clone();
        let mut grad_temp = x0.clone();

        let mut eval_count = 1;
        let mut fx = f(&x, &mut g);

        let mut k = 0;
        loop {
            if !fx.is_finite() || !g.all_finite() {
                return Err(NewtonCGError::NonFiniteValue(x));
            }

            let grad_norm = g.norm();
            if grad_norm <= self.grad_norm_tol {
                return Ok(Solution {
                    x,
                    value: fx,
                    grad_norm,
                    termination: Termination::GradientNorm,
                    iterations: k,
                    eval_count,
                    hess_eval_count: hess.eval_count(),
                });
            }
            if k >= self.max_iter {
                return Ok(Solution {
                    x,
                    value: fx,
                    grad_norm,
                    termination: Termination::MaxIterReached,
                    iterations: k,
                    eval_count,
                    hess_eval_count: hess.eval_count(),
                });
            }

            // the operator must act at the current iterate, never a stale one
            hess.refresh(&x);
            let (mut d, cg_summary) = self.cg.solve(&g, &mut hess);

            // roundoff can leave the CG output non-descending; fall back to
            // the raw negative gradient for this iteration
            let mut slope = d.dot(&g);
            let mut steepest_descent = false;
            if !(slope < S::zero()) {
                d.clone_from(&g);
                d.scale(-S::one());
                slope = -grad_norm * grad_norm;
                steepest_descent = true;
            }

            // minimize along the ray
            let mut line_eval_count = 0;
            let (alpha, fx_next) = loop {
                let r = {
                    let mut phi = |t| {
                        line_eval_count += 1;
                        x_temp.clone_from(&x);
                        x_temp.ray_to(&d, t);
                        f(&x_temp, &mut grad_temp)
                    };
                    self.line_method.search(&mut phi, fx, slope)
                };
                match r {
                    Ok(step) => break step,
                    Err(e) => {
                        if steepest_descent {
                            return Err(NewtonCGError::LineSearchFailed(x, d, e));
                        }
                        // one recovery attempt along the raw gradient
                        d.clone_from(&g);
                        d.scale(-S::one());
                        slope = -grad_norm * grad_norm;
                        steepest_descent = true;
                    }
                }
            };
            eval_count += line_eval_count;

            // the accepted step is the line search's last probe; reuse its
            // value and gradient instead of paying another oracle call
            let step_norm = alpha * d.norm();
            x.clone_from(&x_temp);
            g.clone_from(&grad_temp);
            let value = fx;
            fx = fx_next;

            callback(
                &x,
                NewtonCGIteration {
                    k,
                    value,
                    grad_norm,
                    cg_iterations: cg_summary.iterations,
                    cg_stop: cg_summary.stop,
                    steepest_descent,
                    alpha,
                    line_eval_count,
                },
            );
            k += 1;

            if step_norm <= self.step_tol {
                let grad_norm = g.norm();
                return Ok(Solution {
                    x,
                    value: fx,
                    grad_norm,
                    termination: Termination::StepSize,
                    iterations: k,
                    eval_count,
                    hess_eval_count: hess.eval_count(),
                });
            }
        }
    }
}
