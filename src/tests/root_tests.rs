use crate::{
    IterationDetail, NumericError, RootMethod, RootOptions, RootProblem, compile_expression,
    run_aitken, run_fixed_point, run_newton,
};

#[test]
fn test_newton_sqrt_two_within_ten_steps() {
    let f = compile_expression("x^2 - 2").unwrap();
    let options = RootOptions::default();
    let outcome = run_newton(&f, None, 1.0, &options).unwrap();

    assert!((outcome.root.unwrap() - std::f64::consts::SQRT_2).abs() < 1e-12);
    assert!(outcome.trace.len() < 10);
    let converging = &outcome.trace[outcome.trace.len() - 2];
    assert!(converging.err_abs < options.tol);
    // Indices run 0, 1, 2, ... including the closing record
    for (i, record) in outcome.trace.iter().enumerate() {
        assert_eq!(record.n, i);
    }
}

#[test]
fn test_newton_symbolic_derivative_matches_numeric() {
    let f = compile_expression("exp(x) - 3").unwrap();
    let df = f.derivative();
    let options = RootOptions::default();
    let numeric = run_newton(&f, None, 0.0, &options).unwrap();
    let symbolic = run_newton(&f, Some(&df), 0.0, &options).unwrap();
    let expected = 3f64.ln();
    assert!((numeric.root.unwrap() - expected).abs() < 1e-10);
    assert!((symbolic.root.unwrap() - expected).abs() < 1e-12);
}

#[test]
fn test_newton_without_real_root_never_converges() {
    let f = compile_expression("x^2 + 1").unwrap();
    for x0 in [0.5, 2.0, -3.0] {
        match run_newton(&f, None, x0, &RootOptions::default()) {
            Ok(outcome) => assert!(outcome.root.is_none()),
            Err(err) => {
                assert!(matches!(err, NumericError::DerivativeNearZero { .. }));
                assert!(!err.is_input_error());
            }
        }
    }
}

#[test]
fn test_newton_flat_start_carries_trace() {
    let f = compile_expression("cos(x)").unwrap();
    let df = compile_expression("-sin(x)").unwrap();
    let err = run_newton(&f, Some(&df), 0.0, &RootOptions::default()).unwrap_err();
    assert!(matches!(err, NumericError::DerivativeNearZero { x, .. } if x == 0.0));
    assert_eq!(err.trace().map(<[_]>::len), Some(0));
}

#[test]
fn test_aitken_beats_fixed_point() {
    let g = compile_expression("(x + 2/x)/2").unwrap();
    let slow_g = compile_expression("x - (x^2 - 2)/4").unwrap();
    let options = RootOptions::default().max_iter(200);

    let plain = run_fixed_point(&slow_g, 1.0, &options).unwrap();
    let fast = run_aitken(&slow_g, 1.0, &options).unwrap();
    assert!((plain.root.unwrap() - std::f64::consts::SQRT_2).abs() < 1e-7);
    assert!((fast.root.unwrap() - std::f64::consts::SQRT_2).abs() < 1e-7);
    assert!(fast.trace.len() < plain.trace.len());

    let babylonian = run_fixed_point(&g, 1.0, &options).unwrap();
    let babylonian_fast = run_aitken(&g, 1.0, &options).unwrap();
    assert!((babylonian.root.unwrap() - std::f64::consts::SQRT_2).abs() < 1e-12);
    assert!((babylonian_fast.root.unwrap() - std::f64::consts::SQRT_2).abs() < 1e-12);
    assert!(babylonian_fast.trace.len() < babylonian.trace.len());
}

#[test]
fn test_no_root_reported_where_function_is_undefined() {
    let f = compile_expression("log(x)").unwrap();
    let df = compile_expression("1/x").unwrap();
    let outcome = run_newton(&f, Some(&df), 3.0, &RootOptions::default()).unwrap();
    assert!(outcome.root.is_none());
    assert!(outcome.trace.iter().all(|r| f.call(r.x).is_ok()));

    for method in [RootMethod::FixedPoint, RootMethod::Aitken] {
        let report = RootProblem::new(method, 3.0).gx("sqrt(x - 5)").solve().unwrap();
        assert_eq!(report.root, None);
        assert!(!report.converged);
    }
}

#[test]
fn test_fixed_point_closing_record() {
    let g = compile_expression("cos(x)").unwrap();
    let outcome = run_fixed_point(&g, 0.5, &RootOptions::default().max_iter(500)).unwrap();
    let root = outcome.root.unwrap();
    let last = outcome.trace.last().unwrap();
    assert_eq!(last.x, root);
    assert_eq!((last.err_abs, last.err_rel), (0.0, 0.0));
    assert_eq!(last.detail, IterationDetail::FixedPoint { x_next: root.cos() });
}

#[test]
fn test_max_iter_bounds_the_trace() {
    let g = compile_expression("3*x").unwrap();
    let options = RootOptions::default().max_iter(7);
    let outcome = run_fixed_point(&g, 1.0, &options).unwrap();
    assert_eq!(outcome.trace.len(), 7);
    assert!(!outcome.converged());

    let outcome = run_aitken(&g, 1.0, &options).unwrap();
    assert!(outcome.trace.len() <= 7);
}

#[test]
fn test_problem_plot_ranges() {
    let report = RootProblem::new(RootMethod::Aitken, 1.0)
        .gx("cos(x)")
        .fx("x - cos(x)")
        .solve()
        .unwrap();
    let root = report.root.unwrap();
    let (lo, hi) = report.plot_range;
    assert!(lo <= root - 1.0 && root + 1.0 <= hi);
    assert!(report.curve_f.is_some() && report.curve_g.is_some());
    // With f present the iteration points follow f
    let (x0, y0) = report.iteration_points[0];
    assert_eq!(x0, 1.0);
    assert!((y0.unwrap() - (1.0 - 1f64.cos())).abs() < 1e-15);
}

#[test]
fn test_problem_rejects_bad_tolerance() {
    let err = RootProblem::new(RootMethod::FixedPoint, 1.0)
        .gx("cos(x)")
        .tol(-1.0)
        .solve()
        .unwrap_err();
    assert!(matches!(err, NumericError::InvalidParameter { name: "tol", .. }));
    assert!(err.is_input_error());
}
