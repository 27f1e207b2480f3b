//! Truncated conjugate gradient solver for the Newton direction.
//!
//! Approximately solves `H·d = -g` by the Steihaug-style CG iteration:
//! the loop stops early when non-positive curvature is detected, which keeps
//! the method usable on indefinite Hessians away from a minimum, and
//! otherwise runs until the residual satisfies a forcing tolerance or the
//! iteration cap is hit.

use crate::hessian::HessianOp;
use crate::lin::Lin;
use num_traits::Float;

/// Parameters of the truncated conjugate gradient iteration.
#[derive(Debug, Clone)]
pub struct TruncatedCG<S: Float> {
    /// Cap on the forcing term: the residual tolerance is
    /// `min(eta_max, sqrt(|g|)) * |g|`, loose far from a minimum and tight
    /// close to one.
    pub eta_max: S,
    /// Inner iteration cap; the effective cap is the smaller of this and the
    /// problem dimension.
    pub max_iter: i32,
}

/// Why the inner iteration stopped. All three are usable outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CGStop {
    /// Residual fell below the forcing tolerance.
    Tolerance,
    /// Curvature `pᵀHp ≤ 0` (or not finite) detected; the accumulated
    /// direction is returned, or `-g` when no step had been taken yet.
    NonPositiveCurvature,
    /// Iteration cap reached; the best direction so far is returned.
    IterationCap,
}

/// Outcome of one inner CG solve.
#[derive(Debug, Clone, Copy)]
pub struct CGSummary {
    /// Number of completed CG updates.
    pub iterations: i32,
    /// Why the iteration stopped.
    pub stop: CGStop,
}

impl Default for TruncatedCG<f32> {
    fn default() -> Self {
        TruncatedCG {
            eta_max: 0.5,
            max_iter: 200,
        }
    }
}

impl Default for TruncatedCG<f64> {
    fn default() -> Self {
        TruncatedCG {
            eta_max: 0.5,
            max_iter: 200,
        }
    }
}

impl TruncatedCG<f32> {
    pub fn new() -> Self {
        Default::default()
    }
}

impl TruncatedCG<f64> {
    pub fn new() -> Self {
        Default::default()
    }
}

impl<S: Float> TruncatedCG<S> {
    /// Approximately solve `H·d = -g` for the current gradient `g`.
    ///
    /// The returned direction is a descent direction whenever `g` is finite
    /// and nonzero: the iteration starts from `d = 0` along `p = -g` and
    /// every accepted update keeps `dᵀg < 0`; the non-positive-curvature
    /// bail-out at the very first step returns `-g` itself.
    pub fn solve<V, H>(&self, g: &V, hess: &mut H) -> (V, CGSummary)
    where
        V: Lin<S = S> + Clone,
        H: HessianOp<V>,
    {
        let mut d = g.origin();
        let mut r = g.clone();
        r.scale(-S::one()); // r = -g
        let mut p = r.clone();
        let mut hp = g.origin();

        let g_norm = g.norm();
        let tol = self.eta_max.min(g_norm.sqrt()) * g_norm;
        let cap = (self.max_iter.max(1) as usize).min(g.dim().max(1));

        let mut rr = r.norm_squared();
        let mut iterations = 0;

        for k in 0..cap {
            hess.apply(&p, &mut hp);
            let kappa = p.dot(&hp);
            if kappa <= S::zero() || !kappa.is_finite() {
                if k == 0 {
                    d.clone_from(&p);
                }
                return (
                    d,
                    CGSummary {
                        iterations,
                        stop: CGStop::NonPositiveCurvature,
                    },
                );
            }

            let tau = rr / kappa;
            d.ray_to(&p, tau);
            r.ray_to(&hp, -tau);
            iterations += 1;

            let rr_next = r.norm_squared();
            if rr_next.sqrt() <= tol {
                return (
                    d,
                    CGSummary {
                        iterations,
                        stop: CGStop::Tolerance,
                    },
                );
            }

            let beta = rr_next / rr;
            p.combine(beta, &r, S::one()); // p = r + beta * p
            rr = rr_next;
        }

        (
            d,
            CGSummary {
                iterations,
                stop: CGStop::IterationCap,
            },
        )
    }
}
