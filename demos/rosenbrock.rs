//! Minimize the n-dimensional Rosenbrock function, once with the dense
//! Hessian and once with the Hessian-vector product routine.

use ndarray::Array2;
use newton_cg_min::{DenseHessian, HessianProduct, NewtonCG, Rn};

fn rosenbrock(x: &Rn<f64>, g: &mut Rn<f64>) -> f64 {
    let n = x.len();
    for gi in g.iter_mut() {
        *gi = 0.;
    }
    let mut f = 0.;
    for i in 0..n - 1 {
        let t = x[i + 1] - x[i] * x[i];
        f += 100. * t * t + (1. - x[i]).powi(2);
        g[i] += -400. * x[i] * t - 2. * (1. - x[i]);
        g[i + 1] += 200. * t;
    }
    f
}

fn rosenbrock_hess(x: &Rn<f64>) -> Array2<f64> {
    let n = x.len();
    let mut h = Array2::zeros((n, n));
    for i in 0..n - 1 {
        h[[i, i]] += 1200. * x[i] * x[i] - 400. * x[i + 1] + 2.;
        h[[i + 1, i + 1]] += 200.;
        h[[i, i + 1]] += -400. * x[i];
        h[[i + 1, i]] += -400. * x[i];
    }
    h
}

fn rosenbrock_hessp(x: &Rn<f64>, p: &Rn<f64>, y: &mut Rn<f64>) {
    let n = x.len();
    for yi in y.iter_mut() {
        *yi = 0.;
    }
    for i in 0..n - 1 {
        let dii = 1200. * x[i] * x[i] - 400. * x[i + 1] + 2.;
        let off = -400. * x[i];
        y[i] += dii * p[i] + off * p[i + 1];
        y[i + 1] += off * p[i] + 200. * p[i + 1];
    }
}

fn main() {
    let mut m: NewtonCG<f64> = NewtonCG::<f64>::new();
    m.grad_norm_tol = 1e-8;

    let x0 = Rn::new(vec![1.3, 0.7, 0.8, 1.9, 1.2]);

    println!("dense Hessian:");
    let r = m.minimize_with_trace(
        &x0,
        rosenbrock,
        DenseHessian::new(rosenbrock_hess),
        |_x, info| println!("\t{:?}", info),
    );
    println!("{:#?}", r);

    println!("Hessian-vector product:");
    let r = m.minimize(&x0, rosenbrock, HessianProduct::new(rosenbrock_hessp));
    println!("{:#?}", r);
}
