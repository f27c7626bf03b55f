//! Integration tests for talkcalc.

#![allow(clippy::expect_used)]

use talkcalc::{EvalError, EvalLimits, Evaluator, Number, evaluate};
use test_case::test_case;

fn result_of(input: &str) -> String {
    evaluate(input)
        .expect("expression should evaluate")
        .result
        .to_string()
}

#[test]
fn test_documented_examples() {
    assert_eq!(result_of("3 + 4 * 2"), "11");
    assert_eq!(result_of("(3 + 4) * 2"), "14");
    assert_eq!(result_of("10 / 4"), "2.5");
    assert_eq!(result_of("10 // 4"), "2");
    assert_eq!(result_of("2 ** 10"), "1024");
    assert_eq!(evaluate("1 / 0"), Err(EvalError::DivisionByZero));
    assert_eq!(evaluate(""), Err(EvalError::EmptyInput));
    assert_eq!(evaluate("   "), Err(EvalError::EmptyInput));
}

#[test_case("__import__('os')" ; "import call")]
#[test_case("__import__('os').system('ls')" ; "import chain")]
#[test_case("1; 2" ; "multiple statements")]
#[test_case("a + 1" ; "free name")]
#[test_case("open('/etc/passwd').read()" ; "file read")]
#[test_case("(lambda: 1)()" ; "lambda")]
#[test_case("[1, 2][0]" ; "list subscript")]
#[test_case("().__class__" ; "dunder attribute")]
#[test_case("'a' * 3" ; "string repetition")]
#[test_case("x = 5" ; "assignment")]
#[test_case("1 if 1 else 2" ; "conditional")]
#[test_case("1 < 2" ; "comparison")]
#[test_case("abs(-1)" ; "builtin call")]
fn test_rejects_non_arithmetic(input: &str) {
    let err = evaluate(input).expect_err("input must be rejected");
    assert!(
        matches!(err, EvalError::Disallowed { .. } | EvalError::Syntax { .. }),
        "{input:?} gave {err:?}"
    );
    assert!(err.position().is_some());
}

#[test_case("2 ^ 3", "8" ; "caret as power")]
#[test_case("6 × 7", "42" ; "times sign")]
#[test_case("9 ÷ 2", "4.5" ; "division sign")]
#[test_case("5 − 8", "-3" ; "minus sign")]
#[test_case("-7 // 2", "-4" ; "floor division rounds down")]
#[test_case("-7 % 3", "2" ; "modulo follows divisor")]
#[test_case("-2 ** 2", "-4" ; "power binds tighter than sign")]
#[test_case("2 ** -1", "0.5" ; "negative exponent")]
#[test_case("2 ** 3 ** 2", "512" ; "power is right associative")]
#[test_case("0.1 + 0.2", "0.30000000000000004" ; "float addition")]
#[test_case("1_000 * 2", "2000" ; "digit separators")]
fn test_evaluates(input: &str, expected: &str) {
    assert_eq!(result_of(input), expected);
}

#[test]
fn test_limits_are_enforced() {
    let evaluator = Evaluator::with_limits(EvalLimits {
        max_length: 20,
        max_depth: 4,
        max_exponent: 100.0,
    });

    assert!(matches!(
        evaluator.evaluate(&"1+".repeat(20)),
        Err(EvalError::TooLong { .. })
    ));
    assert!(matches!(
        evaluator.evaluate("((((((1))))))"),
        Err(EvalError::Evaluation { .. })
    ));
    assert!(matches!(
        evaluator.evaluate("2 ** 101"),
        Err(EvalError::Evaluation { .. })
    ));
    assert!(evaluator.evaluate("2 ** 100").is_ok());
}

#[test]
fn test_overflow_falls_back_to_float() {
    let evaluation = evaluate("9223372036854775807 + 1").expect("evaluates");
    assert!(matches!(evaluation.result, Number::Float(_)));
    assert_eq!(evaluation.result.to_string(), "9.223372036854776e18");
}

#[test]
fn test_normalized_expression_reevaluates() {
    for input in ["((1 + 2)) * 3", "2^3^2", "-(-(4))", "10 // 3 % 2", "1.50 * 2"] {
        let first = evaluate(input).expect("evaluates");
        let second = evaluate(&first.expression).expect("normalized form evaluates");
        assert_eq!(first, second, "{input:?}");
    }
}

mod property_tests {
    use proptest::prelude::*;
    use talkcalc::expr::parser::parse;
    use talkcalc::expr::{BinaryOp, DEFAULT_MAX_LENGTH, Expr, UnaryOp};
    use talkcalc::{Number, evaluate};

    fn arb_binary_op() -> impl Strategy<Value = BinaryOp> {
        prop_oneof![
            Just(BinaryOp::Add),
            Just(BinaryOp::Sub),
            Just(BinaryOp::Mul),
            Just(BinaryOp::Div),
            Just(BinaryOp::FloorDiv),
            Just(BinaryOp::Mod),
            Just(BinaryOp::Pow),
        ]
    }

    fn arb_expr() -> impl Strategy<Value = Expr> {
        let leaf = prop_oneof![
            (0i64..1_000_000).prop_map(Expr::int),
            (0u32..10_000).prop_map(|n| Expr::float(f64::from(n) / 8.0)),
        ];
        leaf.prop_recursive(6, 48, 2, |inner| {
            prop_oneof![
                (prop_oneof![Just(UnaryOp::Neg), Just(UnaryOp::Pos)], inner.clone())
                    .prop_map(|(op, operand)| Expr::unary(op, operand)),
                (arb_binary_op(), inner.clone(), inner)
                    .prop_map(|(op, left, right)| Expr::binary(op, left, right)),
            ]
        })
    }

    /// Dense operator chains such as `7^2%3+9*1-4` that run close to the
    /// default length limit.
    fn arb_dense_input() -> impl Strategy<Value = String> {
        let op = prop::sample::select(vec!["+", "-", "*", "%", "//", "^"]);
        (
            1u8..10,
            prop::collection::vec((op, 1u8..10), 1..150),
        )
            .prop_map(|(first, rest)| {
                let mut input = first.to_string();
                for (op, digit) in rest {
                    input.push_str(op);
                    input.push_str(&digit.to_string());
                }
                input
            })
            .prop_filter("within length limit", |input| {
                input.chars().count() <= DEFAULT_MAX_LENGTH
            })
    }

    proptest! {
        #[test]
        fn normalized_expression_resubmits_near_length_limit(input in arb_dense_input()) {
            if let Ok(first) = evaluate(&input) {
                prop_assert!(first.expression.chars().count() <= DEFAULT_MAX_LENGTH);
                let second = evaluate(&first.expression);
                prop_assert_eq!(second, Ok(first));
            }
        }

        #[test]
        fn compact_tree_text_resubmits(expr in arb_expr()) {
            let input = format!("{expr:#}");
            prop_assume!(input.chars().count() <= DEFAULT_MAX_LENGTH);
            if let Ok(first) = evaluate(&input) {
                let second = evaluate(&first.expression);
                prop_assert_eq!(second, Ok(first));
            }
        }

        #[test]
        fn normalized_text_parses_to_same_tree(expr in arb_expr()) {
            let text = expr.to_string();
            let reparsed = parse(&text, 1_000).expect("normalized text parses");
            prop_assert_eq!(&reparsed, &expr);
            let compact = parse(&format!("{expr:#}"), 1_000).expect("compact text parses");
            prop_assert_eq!(compact, expr);
        }

        #[test]
        fn evaluation_is_idempotent(a in -1000i64..1000, b in -1000i64..1000, c in 1i64..50) {
            let input = format!("({a}) * ({b}) // ({c}) + ({a}) % ({c})");
            prop_assert_eq!(evaluate(&input), evaluate(&input));
        }

        #[test]
        fn normalized_expression_has_same_result(a in -1000i64..1000, b in 1i64..1000) {
            let input = format!("(({a})) - ({b}) / (({b} + {a}) ** 2 + 1)");
            let first = evaluate(&input).expect("evaluates");
            let second = evaluate(&first.expression).expect("normalized form evaluates");
            prop_assert_eq!(first.result, second.result);
        }

        #[test]
        fn true_division_matches_f64(a in -100_000i64..100_000, b in 1i64..1000) {
            let evaluation = evaluate(&format!("{a} / {b}")).expect("evaluates");
            #[allow(clippy::cast_precision_loss)]
            let expected = a as f64 / b as f64;
            prop_assert!((evaluation.result.as_f64() - expected).abs() < 1e-9);
        }

        #[test]
        fn floor_division_identity(a in -100_000i64..100_000, b in -1000i64..1000) {
            prop_assume!(b != 0);
            let input = format!("(({a}) // ({b})) * ({b}) + ({a}) % ({b})");
            let evaluation = evaluate(&input).expect("evaluates");
            prop_assert_eq!(evaluation.result, Number::Int(a));
        }

        #[test]
        fn modulo_takes_sign_of_divisor(a in -100_000i64..100_000, b in -1000i64..1000) {
            prop_assume!(b != 0);
            let evaluation = evaluate(&format!("({a}) % ({b})")).expect("evaluates");
            let Number::Int(r) = evaluation.result else {
                return Err(TestCaseError::fail("integer modulo produced a float"));
            };
            prop_assert!(r == 0 || (r < 0) == (b < 0));
        }

        #[test]
        fn arbitrary_text_never_panics(input in ".{0,64}") {
            let _ = evaluate(&input);
        }
    }
}

mod cli_tests {
    use clap::Parser;
    use talkcalc::cli::commands::execute;
    use talkcalc::cli::output::{OutputFormat, format_error};
    use talkcalc::cli::parser::{Cli, Commands};
    use talkcalc::expr::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_EXPONENT, DEFAULT_MAX_LENGTH};

    /// Helper to create a CLI struct with the given format.
    fn make_cli(format: &str, command: Commands) -> Cli {
        Cli {
            verbose: false,
            format: format.to_string(),
            log_json: false,
            max_length: DEFAULT_MAX_LENGTH,
            max_depth: DEFAULT_MAX_DEPTH,
            max_exponent: DEFAULT_MAX_EXPONENT,
            command,
        }
    }

    fn eval(expression: &str) -> Commands {
        Commands::Eval {
            expression: vec![expression.to_string()],
        }
    }

    #[test]
    fn test_cmd_eval() {
        let output = execute(&make_cli("text", eval("2 ** 10"))).expect("eval output");
        assert_eq!(output, "1024\n");
    }

    #[test]
    fn test_cmd_eval_json() {
        let output = execute(&make_cli("json", eval("10/4"))).expect("eval output");
        let json: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");
        assert_eq!(json["expression"], "10 / 4");
        assert_eq!(json["result"], 2.5);
    }

    #[test]
    fn test_cmd_eval_error_text() {
        let err = execute(&make_cli("text", eval("2 * (3 +"))).expect_err("syntax error");
        let text = format_error(&err, OutputFormat::Text);
        assert!(text.starts_with("syntax error at position 8"));
        assert!(text.contains("  2 * (3 +\n"));
        assert!(text.ends_with(&format!("  {}^", " ".repeat(8))));
    }

    #[test]
    fn test_cmd_eval_error_json() {
        let err = execute(&make_cli("json", eval("1 + foo"))).expect_err("disallowed");
        let json: serde_json::Value =
            serde_json::from_str(&format_error(&err, OutputFormat::Json)).expect("valid JSON");
        assert_eq!(json["ok"], false);
        assert_eq!(json["kind"], "disallowed_expression");
        assert_eq!(json["position"], 4);
    }

    #[test]
    fn test_cmd_normalize() {
        let cli = make_cli(
            "text",
            Commands::Normalize {
                expression: vec!["2^(3)".to_string()],
            },
        );
        assert_eq!(execute(&cli).expect("normalize output"), "2 ** 3\n");
    }

    #[test]
    fn test_cli_parses_env_style_limits() {
        let cli = Cli::try_parse_from(["talkcalc", "--max-exponent", "8", "eval", "2 ** 9"])
            .expect("parses");
        assert!(execute(&cli).is_err());
    }
}

#[cfg(feature = "server")]
mod server_tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use talkcalc::config::DEFAULT_BODY_LIMIT;
    use talkcalc::{AppState, router};
    use tower::ServiceExt as _;

    async fn post(body: String) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/calculate")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .expect("request");
        let response = router(AppState::default(), DEFAULT_BODY_LIMIT)
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = serde_json::from_slice(&bytes).expect("JSON body");
        (status, json)
    }

    #[tokio::test]
    async fn test_injection_attempts_are_structured_failures() {
        for expression in ["__import__('os').system('id')", "1; 2", "a + 1"] {
            let body = serde_json::json!({ "expression": expression }).to_string();
            let (status, json) = post(body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["ok"], false);
            assert_eq!(json["input"], expression);
            assert!(json["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_oversized_body_is_refused() {
        let body = serde_json::json!({ "expression": "1".repeat(DEFAULT_BODY_LIMIT * 2) });
        let (status, json) = post(body.to_string()).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json["ok"], false);
        assert_eq!(json["kind"], "invalid_request");
    }

    #[tokio::test]
    async fn test_success_returns_normalized_expression() {
        let (status, json) = post(r#"{"expression": "(3+4)*2"}"#.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["expression"], "(3 + 4) * 2");
        assert_eq!(json["result"], 14);
    }
}
