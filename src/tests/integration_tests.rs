use crate::{
    AdaptiveOptions, IntegrationProblem, NumericError, QuadratureMethod, build_safe_evaluator,
    compile_expression, run_adaptive, run_boole, run_rectangle, run_simpson_13, run_simpson_38,
    run_trapezoidal,
};
use std::f64::consts::PI;

#[test]
fn test_simpson_exact_on_quadratic_for_any_even_n() {
    let f = compile_expression("x^2").unwrap();
    for n in (2..=40).step_by(2) {
        let result = run_simpson_13(&f, 0.0, 3.0, n).unwrap();
        assert_eq!(result.n, n);
        assert!(
            (result.value - 9.0).abs() < 1e-12,
            "n = {}: {}",
            n,
            result.value
        );
    }
}

#[test]
fn test_trapezoidal_error_decreases() {
    let f = compile_expression("x^2").unwrap();
    let errors: Vec<f64> = [10, 100, 1000]
        .iter()
        .map(|&n| (run_trapezoidal(&f, 0.0, 1.0, n).unwrap().value - 1.0 / 3.0).abs())
        .collect();
    assert!(errors[0] > errors[1]);
    assert!(errors[1] > errors[2]);
}

#[test]
fn test_boole_adjusts_ten_to_twelve() {
    let f = compile_expression("exp(x)").unwrap();
    let result = run_boole(&f, 0.0, 1.0, 10).unwrap();
    assert_eq!(result.n, 12);
    assert_eq!(result.evals, 13);
    assert_eq!(result.nodes.len(), 13);
    assert!((result.value - (1f64.exp() - 1.0)).abs() < 1e-12);
}

#[test]
fn test_all_rules_agree_on_smooth_integrand() {
    let f = compile_expression("cos(x)").unwrap();
    let expected = 1f64.sin();
    let rules = [
        run_rectangle(&f, 0.0, 1.0, 200).unwrap(),
        run_trapezoidal(&f, 0.0, 1.0, 200).unwrap(),
        run_simpson_13(&f, 0.0, 1.0, 20).unwrap(),
        run_simpson_38(&f, 0.0, 1.0, 21).unwrap(),
        run_boole(&f, 0.0, 1.0, 20).unwrap(),
        run_adaptive(&f, 0.0, 1.0, &AdaptiveOptions::default()).unwrap(),
    ];
    for result in rules {
        assert!(
            (result.value - expected).abs() < 1e-5,
            "{}: {}",
            result.method,
            result.value
        );
        let total: f64 = result.nodes.iter().map(|n| n.contribution).sum();
        if result.method != QuadratureMethod::Adaptive {
            assert!((total - result.value).abs() < 1e-12);
        }
    }
}

#[test]
fn test_adaptive_sine() {
    let f = compile_expression("sin(x)").unwrap();
    let options = AdaptiveOptions::new().tol(1e-8);
    let result = run_adaptive(&f, 0.0, PI, &options).unwrap();
    assert!((result.value - 2.0).abs() < 1e-8);
    assert!(result.tolerance_met);
    assert!(result.error_estimate.unwrap() < 1e-8);

    let capped = run_adaptive(&f, 0.0, PI, &options.max_depth(1)).unwrap();
    assert!(!capped.tolerance_met);
    assert!(capped.evals <= 3 + 2 * 3);
}

#[test]
fn test_removable_singularity_inside_interval() {
    let safe = build_safe_evaluator(compile_expression("sin(x)/x").unwrap(), -1.0, 1.0);
    let result = run_simpson_13(&safe, -1.0, 1.0, 10).unwrap();
    assert_eq!(result.undefined_points, 0);
    assert_eq!(result.nodes[5].x, 0.0);
    assert_eq!(result.nodes[5].fx, 1.0);
    assert!((result.value - 1.892_166_140_734).abs() < 1e-5);
}

#[test]
fn test_problem_sinc() {
    let report = IntegrationProblem::new(QuadratureMethod::Trapezoidal, "sin(x)/x", 0.0, 2.0)
        .n(50)
        .solve()
        .unwrap();
    assert_eq!(report.singular_points.critical_points(), vec![0.0]);
    assert_eq!(report.curve[0].y, Some(1.0));
    assert_eq!(report.result.undefined_points, 0);
    assert!((report.result.value - 1.605_412_976_8).abs() < 1e-3);
}

#[test]
fn test_problem_errors() {
    let degenerate = IntegrationProblem::new(QuadratureMethod::Boole, "x", 1.0, 1.0).solve();
    assert_eq!(degenerate, Err(NumericError::DegenerateInterval { a: 1.0, b: 1.0 }));

    let invalid = IntegrationProblem::new(QuadratureMethod::Boole, "x +* 2", 0.0, 1.0).solve();
    assert!(invalid.unwrap_err().is_invalid_expression());

    let bad_tol = IntegrationProblem::new(QuadratureMethod::Adaptive, "x", 0.0, 1.0)
        .tol(0.0)
        .solve();
    assert!(matches!(bad_tol, Err(NumericError::InvalidParameter { .. })));

    let huge = IntegrationProblem::new(QuadratureMethod::Boole, "x", 0.0, 1.0)
        .n(usize::MAX)
        .solve();
    assert!(matches!(huge, Err(NumericError::InvalidParameter { name: "n", .. })));
}

#[test]
fn test_pole_inside_interval_stays_finite() {
    let report = IntegrationProblem::new(QuadratureMethod::Simpson13, "1/x", -1.0, 1.0)
        .n(10)
        .solve()
        .unwrap();
    assert!(report.result.value.is_finite());
    assert!(report.result.value.abs() < 1e-6);
}
