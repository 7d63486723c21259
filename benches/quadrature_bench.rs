//! Numeric Pipeline Benchmarks
//!
//! Measures compilation, singularity analysis, root finding and quadrature
//! on a mix of small and large integrands.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use num_anafis::{
    AdaptiveOptions, RootOptions, analyze_singularities, build_safe_evaluator, compile_expression,
    run_adaptive, run_aitken, run_boole, run_fixed_point, run_newton, run_simpson_13,
    run_trapezoidal,
};
use std::fmt::Write;
use std::hint::black_box;

// =============================================================================
// Expression Generator
// =============================================================================

/// Builds a sum of `n` mixed terms that stays defined on (0, 10]
fn generate_mixed_sum(n: usize) -> String {
    let mut s = String::with_capacity(n * 24);
    for i in 1..=n {
        if i > 1 {
            s.push_str(if i % 2 == 0 { " + " } else { " - " });
        }
        match i % 4 {
            0 => write!(s, "{}*x^{}", i, i % 5 + 1).unwrap(),
            1 => write!(s, "sin({}*x)", i).unwrap(),
            2 => write!(s, "exp(x/{})", i).unwrap(),
            _ => write!(s, "(x^2 + {})/(x + {})", i, i).unwrap(),
        }
    }
    s
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    for n in [10, 100] {
        let text = generate_mixed_sum(n);
        group.bench_with_input(BenchmarkId::new("mixed_sum", n), &text, |b, text| {
            b.iter(|| compile_expression(black_box(text)))
        });
    }
    group.finish();
}

fn bench_singularities(c: &mut Criterion) {
    let mut group = c.benchmark_group("singularities");
    let sinc = compile_expression("sin(x)/x").unwrap();
    let rational = compile_expression("(x^3 - x)/(x^2 - 1) + 1/(x - 3)").unwrap();

    group.bench_function("sinc", |b| {
        b.iter(|| analyze_singularities(black_box(&sinc), -1.0, 1.0))
    });
    group.bench_function("rational", |b| {
        b.iter(|| analyze_singularities(black_box(&rational), -4.0, 4.0))
    });
    group.finish();
}

fn bench_roots(c: &mut Criterion) {
    let mut group = c.benchmark_group("roots");
    let options = RootOptions::default().max_iter(200);
    let f = compile_expression("x^3 - 2*x - 5").unwrap();
    let df = f.derivative();
    let g = compile_expression("cos(x)").unwrap();

    group.bench_function("newton_numeric", |b| {
        b.iter(|| run_newton(black_box(&f), None, 2.0, &options))
    });
    group.bench_function("newton_symbolic", |b| {
        b.iter(|| run_newton(black_box(&f), Some(&df), 2.0, &options))
    });
    group.bench_function("fixed_point_cos", |b| {
        b.iter(|| run_fixed_point(black_box(&g), 0.5, &options))
    });
    group.bench_function("aitken_cos", |b| {
        b.iter(|| run_aitken(black_box(&g), 0.5, &options))
    });
    group.finish();
}

fn bench_quadrature(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadrature");
    let smooth = compile_expression(&generate_mixed_sum(20)).unwrap();
    let sinc = build_safe_evaluator(compile_expression("sin(x)/x").unwrap(), -1.0, 1.0);

    for n in [12, 120, 1200] {
        group.bench_with_input(BenchmarkId::new("trapezoidal", n), &n, |b, &n| {
            b.iter(|| run_trapezoidal(black_box(&smooth), 1.0, 10.0, n))
        });
        group.bench_with_input(BenchmarkId::new("simpson_13", n), &n, |b, &n| {
            b.iter(|| run_simpson_13(black_box(&smooth), 1.0, 10.0, n))
        });
        group.bench_with_input(BenchmarkId::new("boole", n), &n, |b, &n| {
            b.iter(|| run_boole(black_box(&smooth), 1.0, 10.0, n))
        });
    }

    group.bench_function("simpson_13/sinc_safe", |b| {
        b.iter(|| run_simpson_13(black_box(&sinc), -1.0, 1.0, 100))
    });

    let options = AdaptiveOptions::new().tol(1e-8);
    group.bench_function("adaptive/mixed_sum", |b| {
        b.iter(|| run_adaptive(black_box(&smooth), 1.0, 10.0, &options))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_compile,
    bench_singularities,
    bench_roots,
    bench_quadrature
);

criterion_main!(benches);
