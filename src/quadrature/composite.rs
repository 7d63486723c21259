use super::{
    CountingEvaluator, QuadratureMethod, QuadratureNode, QuadratureResult, check_interval,
    check_subdivisions,
};
use crate::NumericError;
use crate::numeric::linspace;
use crate::traits::PointEvaluator;

/// Composite midpoint rule
///
/// `n` (at least 1) panels, each contributing `f(midpoint) · h`.
pub fn run_rectangle<F: PointEvaluator + ?Sized>(
    f: &F,
    a: f64,
    b: f64,
    n: usize,
) -> Result<QuadratureResult, NumericError> {
    check_interval(a, b)?;
    let method = QuadratureMethod::Rectangle;
    let n = check_subdivisions(method, n)?;
    let h = (b - a) / n as f64;

    let mut eval = CountingEvaluator::new(f);
    let nodes: Vec<QuadratureNode> = (0..n)
        .map(|i| {
            let left = a + i as f64 * h;
            let right = a + (i + 1) as f64 * h;
            let x = 0.5 * (left + right);
            let fx = eval.at(x);
            QuadratureNode {
                index: i,
                x,
                fx,
                coefficient: 1.0,
                contribution: fx * h,
            }
        })
        .collect();

    Ok(finish(method, h, n, nodes, eval))
}

/// Composite trapezoidal rule: weights `1, 2, …, 2, 1`, scale `h/2`
pub fn run_trapezoidal<F: PointEvaluator + ?Sized>(
    f: &F,
    a: f64,
    b: f64,
    n: usize,
) -> Result<QuadratureResult, NumericError> {
    weighted(QuadratureMethod::Trapezoidal, f, a, b, n, |i, n| {
        if i == 0 || i == n { 1.0 } else { 2.0 }
    })
}

/// Composite Simpson 1/3 rule: weights `1, 4, 2, …, 4, 1`, scale `h/3`
///
/// An odd `n` is rounded up to the next even count.
pub fn run_simpson_13<F: PointEvaluator + ?Sized>(
    f: &F,
    a: f64,
    b: f64,
    n: usize,
) -> Result<QuadratureResult, NumericError> {
    weighted(QuadratureMethod::Simpson13, f, a, b, n, |i, n| {
        if i == 0 || i == n {
            1.0
        } else if i % 2 == 1 {
            4.0
        } else {
            2.0
        }
    })
}

/// Composite Simpson 3/8 rule: weights `1, 3, 3, 2, …, 3, 3, 1`, scale `3h/8`
///
/// `n` is rounded up to a multiple of 3.
pub fn run_simpson_38<F: PointEvaluator + ?Sized>(
    f: &F,
    a: f64,
    b: f64,
    n: usize,
) -> Result<QuadratureResult, NumericError> {
    weighted(QuadratureMethod::Simpson38, f, a, b, n, |i, n| {
        if i == 0 || i == n {
            1.0
        } else if i % 3 == 0 {
            2.0
        } else {
            3.0
        }
    })
}

/// Composite Boole rule: weights `7, 32, 12, 32, 14, …, 32, 7`, scale `2h/45`
///
/// `n` is rounded up to a multiple of 4.
pub fn run_boole<F: PointEvaluator + ?Sized>(
    f: &F,
    a: f64,
    b: f64,
    n: usize,
) -> Result<QuadratureResult, NumericError> {
    weighted(QuadratureMethod::Boole, f, a, b, n, |i, n| {
        if i == 0 || i == n {
            7.0
        } else if i % 4 == 0 {
            14.0
        } else if i % 2 == 0 {
            12.0
        } else {
            32.0
        }
    })
}

/// Scale factor applied to the weighted sum of a closed Newton-Cotes rule
fn scale(method: QuadratureMethod, h: f64) -> f64 {
    match method {
        QuadratureMethod::Trapezoidal => h / 2.0,
        QuadratureMethod::Simpson13 => h / 3.0,
        QuadratureMethod::Simpson38 => 3.0 * h / 8.0,
        QuadratureMethod::Boole => 2.0 * h / 45.0,
        QuadratureMethod::Rectangle | QuadratureMethod::Adaptive => h,
    }
}

/// Closed rule over `n + 1` equally spaced nodes with coefficients `weight(i, n)`
fn weighted<F: PointEvaluator + ?Sized>(
    method: QuadratureMethod,
    f: &F,
    a: f64,
    b: f64,
    n: usize,
    weight: impl Fn(usize, usize) -> f64,
) -> Result<QuadratureResult, NumericError> {
    check_interval(a, b)?;
    let n = check_subdivisions(method, n)?;
    let h = (b - a) / n as f64;
    let factor = scale(method, h);

    let mut eval = CountingEvaluator::new(f);
    let nodes: Vec<QuadratureNode> = linspace(a, b, n + 1)
        .into_iter()
        .enumerate()
        .map(|(i, x)| {
            let fx = eval.at(x);
            let coefficient = weight(i, n);
            QuadratureNode {
                index: i,
                x,
                fx,
                coefficient,
                contribution: fx * coefficient * factor,
            }
        })
        .collect();

    Ok(finish(method, h, n, nodes, eval))
}

fn finish<F: PointEvaluator + ?Sized>(
    method: QuadratureMethod,
    h: f64,
    n: usize,
    nodes: Vec<QuadratureNode>,
    eval: CountingEvaluator<'_, F>,
) -> QuadratureResult {
    let value: f64 = nodes.iter().map(|node| node.contribution).sum();
    log::debug!(
        "{}: n = {}, value = {}, {} evaluation(s), {} undefined",
        method,
        n,
        value,
        eval.evals,
        eval.undefined
    );
    QuadratureResult {
        method,
        value,
        h: Some(h),
        n,
        evals: eval.evals,
        error_estimate: None,
        nodes,
        tolerance_met: true,
        undefined_points: eval.undefined,
    }
}
