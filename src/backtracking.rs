//! Armijo backtracking line search.
//!
//! The full Newton step is trusted first; on rejection the step is contracted
//! by a fixed factor until the sufficient-decrease condition holds or the
//! budget runs out.

use num_traits::Float;

/// Parameters of the Armijo backtracking line search.
#[derive(Debug, Clone)]
pub struct Backtracking<S: Float> {
    /// `c1` constant of the sufficient-decrease condition
    /// `phi(t) <= phi(0) + c1 * t * phi'(0)`.
    pub c1: S,
    /// Contraction factor applied to the step on rejection; in `(0, 1)`.
    pub rho: S,
    /// Maximum number of trial steps.
    pub max_iter: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BacktrackingError {
    MaxIterReached(i32),
}

impl std::fmt::Display for BacktrackingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BacktrackingError::MaxIterReached(n) => {
                write!(f, "no acceptable step within {} trial steps", n)
            }
        }
    }
}

impl std::error::Error for BacktrackingError {}

impl Default for Backtracking<f32> {
    fn default() -> Self {
        Backtracking {
            c1: 1e-4,
            rho: 0.5,
            max_iter: 50,
        }
    }
}

impl Default for Backtracking<f64> {
    fn default() -> Self {
        Backtracking {
            c1: 1e-4,
            rho: 0.5,
            max_iter: 50,
        }
    }
}

impl Backtracking<f32> {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Backtracking<f64> {
    pub fn new() -> Self {
        Default::default()
    }
}

impl<S: Float> Backtracking<S> {
    /// Find a step `t > 0` satisfying the Armijo condition along a descent
    /// direction.
    ///
    ///   - `phi` is the restriction of the objective to the ray,
    ///     `phi = |t| f(x + t*d)`.
    ///   - `phi0` is `phi(0)`, already known to the caller.
    ///   - `slope` is the directional derivative `phi'(0) = grad f(x)·d`;
    ///     it must be negative.
    ///
    /// Returns the accepted step together with the objective value there.
    /// A non-finite trial value never satisfies the comparison, so NaN or
    /// overflow regions shrink the step rather than being accepted.
    pub fn search<Func>(&self, mut phi: Func, phi0: S, slope: S) -> Result<(S, S), BacktrackingError>
    where
        Func: FnMut(S) -> S,
    {
        debug_assert!(slope < S::zero());

        let mut t = S::one();
        for _ in 0..self.max_iter {
            let v = phi(t);
            if v <= phi0 + self.c1 * t * slope {
                return Ok((t, v));
            }
            t = t * self.rho;
        }

        Err(BacktrackingError::MaxIterReached(self.max_iter))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn full_newton_step_on_quadratic() {
        let ls: Backtracking<f64> = Default::default();

        // phi(t) = (1 - t)^2: the Newton step from x = 1 on f(x) = x^2
        let phi = |t: f64| (1. - t).powi(2);
        let r = ls.search(phi, 1., -2.);

        assert_eq!(r, Ok((1., 0.)));
    }

    #[test]
    fn contracts_on_rejection() {
        let ls: Backtracking<f64> = Default::default();

        // steepest descent step from x = 1 on f(x) = x^2 overshoots:
        // phi(t) = (1 - 2t)^2, phi(1) = 1 fails Armijo, phi(1/2) = 0 passes
        let phi = |t: f64| (1. - 2. * t).powi(2);
        let r = ls.search(phi, 1., -4.);

        assert_eq!(r, Ok((0.5, 0.)));
    }

    #[test]
    fn budget_exhaustion_is_reported() {
        let ls: Backtracking<f64> = Default::default();

        let mut evals = 0;
        let phi = |_t: f64| {
            evals += 1;
            1.
        };
        // value never decreases along the ray
        let r = ls.search(phi, 0., -1.);

        assert_eq!(r, Err(BacktrackingError::MaxIterReached(ls.max_iter)));
        assert_eq!(evals, ls.max_iter);
    }

    #[test]
    fn nan_plateau_shrinks_the_step() {
        let ls: Backtracking<f64> = Default::default();

        // objective is NaN for t > 1/4, quadratic decrease below
        let phi = |t: f64| {
            if t > 0.25 {
                f64::NAN
            } else {
                (1. - 2. * t).powi(2)
            }
        };
        let r = ls.search(phi, 1., -4.);

        assert_eq!(r, Ok((0.25, 0.25)));
    }
}
