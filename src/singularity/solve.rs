//! Real zeros of a denominator inside a closed interval

use super::poly::Polynomial;
use crate::Expr;
use crate::compiler::eval_expr;
use std::f64::consts::PI;

/// Number of panels for the sign-change scan
const SCAN_PANELS: usize = 2000;

/// Largest denominator tried when snapping to `p/q` or `k·π/q`
const SNAP_MAX_DENOMINATOR: i32 = 12;

/// Residual below which a local minimum of `|g|` counts as a zero
const MINIMUM_ZERO_TOLERANCE: f64 = 1e-12;

/// Zeros of `den` in `[lo, hi]`, sorted and deduplicated
///
/// Polynomials of degree 1 and 2 are solved in closed form; everything else
/// goes through a scan for sign changes (refined by bisection) and for local
/// minima of `|den|` touching zero (refined by golden-section search). Each
/// root is then snapped to a nearby integer, small rational or rational
/// multiple of π when that does not increase the residual.
pub(crate) fn solve_zeros(den: &Expr, lo: f64, hi: f64) -> Vec<f64> {
    if !den.contains_var() || !lo.is_finite() || !hi.is_finite() {
        return Vec::new();
    }

    let poly = Polynomial::try_from_expr(den);
    let residual = |x: f64| -> f64 {
        match &poly {
            Some(p) => p.eval(x).abs(),
            None => eval_expr(den, x).map_or(f64::INFINITY, f64::abs),
        }
    };

    let raw = match poly.as_ref().and_then(Polynomial::closed_form_roots) {
        Some(roots) => roots,
        None => {
            let g = |x: f64| match &poly {
                Some(p) => Some(p.eval(x)),
                None => eval_expr(den, x).ok(),
            };
            scan(&g, lo, hi)
        }
    };

    let mut roots: Vec<f64> = raw
        .into_iter()
        .filter(|r| r.is_finite())
        .map(|r| snap(r, &residual))
        .filter(|r| lo <= *r && *r <= hi)
        .collect();

    roots.sort_by(f64::total_cmp);
    roots.dedup_by(|a, b| (*a - *b).abs() <= 1e-9 * (1.0 + b.abs()));
    roots
}

/// Sign-change and near-zero-minimum scan of `g` over `[lo, hi]`
fn scan(g: &impl Fn(f64) -> Option<f64>, lo: f64, hi: f64) -> Vec<f64> {
    if lo == hi {
        return match g(lo) {
            Some(v) if v == 0.0 => vec![lo],
            _ => Vec::new(),
        };
    }

    let step = (hi - lo) / SCAN_PANELS as f64;
    let xs: Vec<f64> = (0..=SCAN_PANELS)
        .map(|i| {
            if i == SCAN_PANELS {
                hi
            } else {
                lo + i as f64 * step
            }
        })
        .collect();
    let ys: Vec<Option<f64>> = xs.iter().map(|&x| g(x)).collect();

    let mut roots = Vec::new();
    for i in 0..xs.len() {
        let Some(yi) = ys[i] else { continue };

        if yi == 0.0 {
            roots.push(xs[i]);
            continue;
        }

        // Sign change on [x_i, x_{i+1}]
        if let Some(Some(yn)) = ys.get(i + 1)
            && *yn != 0.0
            && (yi < 0.0) != (*yn < 0.0)
            && let Some(c) = bisect(g, xs[i], xs[i + 1], yi)
        {
            // A pole also changes sign; keep only genuine zeros
            let scale = yi.abs().max(yn.abs()).max(1.0);
            if g(c).is_some_and(|v| v.abs() <= 1e-8 * scale) {
                roots.push(c);
            }
            continue;
        }

        // Local minimum of |g| without a sign change (even-multiplicity zero)
        if i > 0
            && let (Some(yp), Some(Some(yn))) = (ys[i - 1], ys.get(i + 1))
            && (yp < 0.0) == (yi < 0.0)
            && (*yn < 0.0) == (yi < 0.0)
            && yi.abs() < yp.abs()
            && yi.abs() <= yn.abs()
        {
            let c = golden_section_min(g, xs[i - 1], xs[i + 1]);
            if g(c).is_some_and(|v| v.abs() <= MINIMUM_ZERO_TOLERANCE) {
                roots.push(c);
            }
        }
    }
    roots
}

/// Bisection on a bracket where `g(a)` has the sign of `ga`
fn bisect(g: &impl Fn(f64) -> Option<f64>, mut a: f64, mut b: f64, ga: f64) -> Option<f64> {
    let negative_at_a = ga < 0.0;
    for _ in 0..200 {
        let m = 0.5 * (a + b);
        if m <= a || m >= b {
            break;
        }
        let gm = g(m)?;
        if gm == 0.0 {
            return Some(m);
        }
        if (gm < 0.0) == negative_at_a {
            a = m;
        } else {
            b = m;
        }
    }
    Some(0.5 * (a + b))
}

/// Minimise `|g|` on `[a, b]`
fn golden_section_min(g: &impl Fn(f64) -> Option<f64>, mut a: f64, mut b: f64) -> f64 {
    let inv_phi = (5.0_f64.sqrt() - 1.0) / 2.0;
    let h = |x: f64| g(x).map_or(f64::INFINITY, f64::abs);

    let mut c = b - inv_phi * (b - a);
    let mut d = a + inv_phi * (b - a);
    let (mut hc, mut hd) = (h(c), h(d));

    for _ in 0..200 {
        if (b - a).abs() <= 1e-15 * (1.0 + a.abs().max(b.abs())) {
            break;
        }
        if hc < hd {
            b = d;
            d = c;
            hd = hc;
            c = b - inv_phi * (b - a);
            hc = h(c);
        } else {
            a = c;
            c = d;
            hc = hd;
            d = a + inv_phi * (b - a);
            hd = h(d);
        }
    }
    0.5 * (a + b)
}

/// Replace `r` by a nearby exact-looking value when the residual allows it
fn snap(r: f64, residual: &impl Fn(f64) -> f64) -> f64 {
    let tolerance = 1e-6 * (1.0 + r.abs());
    let base = residual(r);
    let accept = base.max(f64::EPSILON);

    let mut best = r;
    let mut best_residual = base;
    let mut consider = |candidate: f64| {
        if candidate == best || (candidate - r).abs() > tolerance {
            return;
        }
        let res = residual(candidate);
        if res <= accept && (res < best_residual || best == r) {
            best = candidate;
            best_residual = res;
        }
    };

    // Prefer the simplest form: integers, then small rationals, then multiples of π
    consider(r.round());
    for q in 2..=SNAP_MAX_DENOMINATOR {
        let q = f64::from(q);
        consider((r * q).round() / q);
    }
    for q in 1..=SNAP_MAX_DENOMINATOR {
        let q = f64::from(q);
        consider((r * q / PI).round() * PI / q);
    }

    // -0.0 and 0.0 are the same point
    if best == 0.0 { 0.0 } else { best }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile_expression;
    use std::f64::consts::FRAC_PI_2;

    fn zeros(text: &str, lo: f64, hi: f64) -> Vec<f64> {
        let f = compile_expression(text).unwrap();
        solve_zeros(f.expr(), lo, hi)
    }

    #[test]
    fn test_linear_and_quadratic() {
        assert_eq!(zeros("x - 1", 0.0, 2.0), vec![1.0]);
        assert_eq!(zeros("x^2 - 4", -3.0, 3.0), vec![-2.0, 2.0]);
        assert_eq!(zeros("x^2 - 4", 0.0, 3.0), vec![2.0]);
        assert_eq!(zeros("(x - 1)^2", 0.0, 2.0), vec![1.0]);
        assert!(zeros("x^2 + 1", -5.0, 5.0).is_empty());
    }

    #[test]
    fn test_endpoints_are_inclusive() {
        assert_eq!(zeros("x", 0.0, 1.0), vec![0.0]);
        assert_eq!(zeros("x - 1", 0.0, 1.0), vec![1.0]);
    }

    #[test]
    fn test_cubic_by_scan() {
        assert_eq!(zeros("x^3 - x", -2.0, 2.0), vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_transcendental_snaps_to_pi() {
        assert_eq!(zeros("cos(x)", 0.0, 3.0), vec![FRAC_PI_2]);
        assert_eq!(zeros("sin(x)", -1.0, 4.0), vec![0.0, PI]);
    }

    #[test]
    fn test_even_multiplicity_transcendental() {
        assert_eq!(zeros("sin(x)^2", 2.0, 4.0), vec![PI]);
    }

    #[test]
    fn test_pole_is_not_a_zero() {
        // tan changes sign across pi/2 without vanishing there
        assert_eq!(zeros("tan(x)", 1.0, 2.0), Vec::<f64>::new());
    }

    #[test]
    fn test_constant_denominator() {
        assert!(zeros("2", -1.0, 1.0).is_empty());
    }
}
