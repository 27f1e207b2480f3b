//! Truncated Newton (Newton-CG) minimization of smooth nonlinear functions.
//!
//! At every outer iteration the Newton system `H(x)·d = -∇f(x)` is solved
//! approximately by a conjugate gradient iteration that stops early on
//! non-positive curvature or once the residual satisfies a forcing tolerance.
//! The resulting direction is globalized by an Armijo backtracking line
//! search. The Hessian may be supplied either as a dense matrix or as a
//! Hessian-vector product routine without ever forming the matrix.

mod backtracking;
mod cg;
mod hessian;
mod lin;
mod newton;

pub use crate::backtracking::{Backtracking, BacktrackingError};
pub use crate::cg::{CGStop, CGSummary, TruncatedCG};
pub use crate::hessian::{DenseHessian, HessianOp, HessianProduct};
pub use crate::lin::{Lin, Rn};
pub use crate::newton::{NewtonCG, NewtonCGError, NewtonCGIteration, Solution, Termination};
