use newton_cg_min::{HessianProduct, NewtonCG, Rn};

fn quad2d(x: &Rn<f64>, grad: &mut Rn<f64>) -> f64 {
    assert_eq!(x.len(), 2);
    assert_eq!(grad.len(), 2);

    grad[0] = 2. * x[0];
    grad[1] = 20. * x[1];

    x[0].powi(2) + 10. * x[1].powi(2)
}

fn quad2d_hessp(_x: &Rn<f64>, p: &Rn<f64>, y: &mut Rn<f64>) {
    y[0] = 2. * p[0];
    y[1] = 20. * p[1];
}

fn main() {
    let m: NewtonCG<f64> = NewtonCG::<f64>::new();

    println!("f(x) = x^2");

    let r = m.minimize(
        &1f64,
        |x: &f64, grad: &mut f64| {
            *grad = 2. * x;
            x * x
        },
        HessianProduct::new(|_x: &f64, p: &f64, y: &mut f64| *y = 2. * p),
    );

    println!("\tresult: {:?}", r);

    println!("f(x) = x1^2 + 10 x2^2");

    let x0 = Rn::new(vec![1., 1.]);
    let r = m.minimize_with_trace(
        &x0,
        quad2d,
        HessianProduct::new(quad2d_hessp),
        |x, info| {
            println!("{:?}, {:?}", x, info);
        },
    );

    println!("\tresult: {:?}", r);
}
