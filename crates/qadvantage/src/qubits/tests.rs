use super::*;
use crate::expr::CompiledFn;
use proptest::prelude::*;

#[test]
fn classification_normalizes_braces_and_whitespace() {
    let cases = [
        ("q", MappingKind::Linear),
        (" {q} ", MappingKind::Linear),
        ("2^{q}", MappingKind::Exponential),
        ("2^(q)", MappingKind::Exponential),
        ("2 ^ Q", MappingKind::Exponential),
        ("2^(2^{q})", MappingKind::DoubleExponential),
        ("2^(2^q)", MappingKind::DoubleExponential),
        ("log({q})", MappingKind::Logarithmic { base: 10.0 }),
        ("log10(q)", MappingKind::Logarithmic { base: 10.0 }),
        ("log(q, 2)", MappingKind::Logarithmic { base: 2.0 }),
        ("log2(q)", MappingKind::Logarithmic { base: 2.0 }),
    ];
    for (text, kind) in cases {
        let m = QubitMapping::classify(text);
        assert_eq!(m.kind, kind, "{text}");
        assert_eq!(m.source, text);
        assert!(m.is_builtin());
    }
    let custom = QubitMapping::classify(" {q}^2 / 2 ");
    assert_eq!(custom.kind, MappingKind::Custom("q^2 / 2".into()));
    assert!(!custom.is_builtin());
}

#[test]
fn exponential_inverse_matches_reference_point() {
    let m = QubitMapping::classify("2^{q}");
    let v = m.size_exponent_to_qubits_log10(6.0);
    let q = 6.0 / 2f64.log10();
    assert!((q - 19.93).abs() < 0.01);
    assert!((v - q.log10()).abs() < 1e-12);
    assert!((v - 1.30).abs() < 0.01);
}

#[test]
fn linear_and_custom_pass_through() {
    for text in ["q", "3*q + 1"] {
        let m = QubitMapping::classify(text);
        assert_eq!(m.size_exponent_to_qubits_log10(4.5), 4.5);
        assert_eq!(m.size_exponent_to_qubits_log10(f64::NAN), MIN_LOG10_Q);
    }
}

#[test]
fn inverse_never_returns_non_finite() {
    let xs = [-1e6, -10.0, -1.0, 0.0, 1e-9, 1.0, 300.0, 1e6, f64::INFINITY, f64::NAN];
    for text in ["q", "2^q", "2^(2^q)", "log(q)", "log2(q)", "q^3"] {
        let m = QubitMapping::classify(text);
        for x in xs {
            let v = m.size_exponent_to_qubits_log10(x);
            assert!(v.is_finite(), "{text} at {x} gave {v}");
        }
    }
}

#[test]
fn double_exponential_clamps_small_sizes() {
    let m = QubitMapping::classify("2^(2^q)");
    // size 1 ⇒ log2 of the floored inner value
    let v = m.size_exponent_to_qubits_log10(0.0);
    assert!((v - MIN_LOG10_Q).abs() < 1e-12);
    // size 10^300 ⇒ q = log2(300·log2 10) ≈ 9.96
    let v = m.size_exponent_to_qubits_log10(300.0);
    assert!((10f64.powf(v) - (300.0 * LOG2_10).log2()).abs() < 1e-9);
}

#[test]
fn logarithmic_inverse_stays_in_log_space() {
    let m = QubitMapping::classify("log(q)");
    // q = 10^1000 is not representable, its log10 is
    let v = m.size_exponent_to_qubits_log10(3.0);
    assert!((v - 1000.0).abs() < 1e-9);
    let base2 = QubitMapping::classify("log(q, 2)");
    let v = base2.size_exponent_to_qubits_log10(1.0);
    assert!((v - 10.0 * LOG10_2).abs() < 1e-12);
}

#[test]
fn forward_closed_forms() {
    let cfg = MappingCfg::default();
    let eval = |text: &str, q: f64| QubitMapping::classify(text).qubits_to_value(q, &cfg);
    assert_eq!(eval("q", 7.0), Ok(7.0));
    assert_eq!(eval("2^q", 10.0), Ok(1024.0));
    assert_eq!(eval("2^(2^q)", 3.0), Ok(256.0));
    assert_eq!(eval("2^(2^q)", 20.0), Ok(DEFAULT_CLAMP));
    assert!((eval("log(q)", 1000.0).unwrap() - 3.0).abs() < 1e-12);
    assert!((eval("log2(q)", 1024.0).unwrap() - 10.0).abs() < 1e-12);
}

#[test]
fn forward_rejects_invalid_logarithms_and_non_positive_values() {
    let cfg = MappingCfg::default();
    let log = QubitMapping::classify("log(q)");
    assert_eq!(log.qubits_to_value(0.0, &cfg), Err(MappingError::NonPositive(0.0)));
    assert_eq!(log.qubits_to_value(-3.0, &cfg), Err(MappingError::NonPositive(-3.0)));
    // log10(1) == 0 is only accepted on request
    assert!(log.qubits_to_value(1.0, &cfg).is_err());
    let lenient = MappingCfg {
        allow_non_positive: true,
        ..cfg
    };
    assert_eq!(log.qubits_to_value(1.0, &lenient), Ok(0.0));
    assert_eq!(
        QubitMapping::classify("q").qubits_to_value(f64::NAN, &cfg),
        Err(MappingError::NonFinite)
    );
}

#[test]
fn custom_mappings_use_the_expression_engine() {
    let cfg = MappingCfg::default();
    let m = QubitMapping::classify("{q}^2 / 2");
    assert_eq!(m.qubits_to_value(6.0, &cfg), Ok(18.0));

    let neg = QubitMapping::classify("q - 10");
    assert_eq!(neg.qubits_to_value(4.0, &cfg), Err(MappingError::NonPositive(-6.0)));

    let huge = QubitMapping::classify("10^q");
    let capped = MappingCfg {
        clamp_ceiling: 1e200,
        ..cfg
    };
    assert_eq!(huge.qubits_to_value(400.0, &capped), Ok(1e200));

    let broken = QubitMapping::classify("q + + ");
    assert!(matches!(
        broken.qubits_to_value(1.0, &cfg),
        Err(MappingError::Expr(_))
    ));
    let unbound = QubitMapping::classify("q * k");
    let err = unbound.qubits_to_value(1.0, &cfg).unwrap_err();
    assert!(err.to_string().contains('k'));
}

#[test]
fn deeply_nested_custom_mapping_is_an_error() {
    let cfg = MappingCfg::default();
    let deep = format!("{}q{}", "(".repeat(100_000), ")".repeat(100_000));
    let m = QubitMapping::classify(&deep);
    assert!(matches!(m.kind, MappingKind::Custom(_)));
    assert_eq!(
        m.qubits_to_value(3.0, &cfg),
        Err(MappingError::Expr(ExprError::TooDeep {
            limit: crate::cfg::MAX_EXPR_DEPTH
        }))
    );
    assert!(m.qubits_log10_to_size_log10(0.5, &cfg).is_err());

    let shallow = format!("{}q{}", "(".repeat(50), ")".repeat(50));
    assert_eq!(QubitMapping::classify(&shallow).qubits_to_value(3.0, &cfg), Ok(3.0));
}

struct Doubling;

impl ExprEngine for Doubling {
    fn compile(&self, _source: &str) -> Result<CompiledFn, ExprError> {
        Ok(Box::new(|scope: &Scope| {
            scope
                .get("q")
                .map(|q| 2.0 * q)
                .ok_or_else(|| ExprError::UndefinedSymbol("q".into()))
        }))
    }
}

#[test]
fn engine_is_substitutable() {
    let m = QubitMapping::classify("anything at all");
    let v = m.qubits_to_value_with(&Doubling, 21.0, &MappingCfg::default());
    assert_eq!(v, Ok(42.0));
    // named families never reach the engine
    let v = QubitMapping::classify("2^q").qubits_to_value_with(&Doubling, 3.0, &MappingCfg::default());
    assert_eq!(v, Ok(8.0));
}

#[test]
fn log_space_forward_handles_double_exponential() {
    let cfg = MappingCfg::default();
    let m = QubitMapping::classify("2^(2^q)");
    let log_q = 20f64.log10();
    let v = m.qubits_log10_to_size_log10(log_q, &cfg).unwrap();
    assert!((v - 2f64.powi(20) * LOG10_2).abs() < 1e-6);
    let v = m.qubits_log10_to_size_log10(4.0, &cfg).unwrap();
    assert_eq!(v, DEFAULT_CLAMP.log10());
    assert_eq!(
        QubitMapping::classify("log(q)").qubits_log10_to_size_log10(0.0, &cfg),
        Err(MappingError::NonPositive(0.0))
    );
}

proptest! {
    #[test]
    fn prop_closed_forms_round_trip(x in 0.05f64..2.3, which in 0usize..3) {
        let text = ["q", "2^q", "log(q)"][which];
        let m = QubitMapping::classify(text);
        let q = 10f64.powf(m.size_exponent_to_qubits_log10(x));
        let value = m.qubits_to_value(q, &MappingCfg::default()).unwrap();
        prop_assert!((value.log10() - x).abs() < 1e-9, "{} at {}", text, x);
    }

    #[test]
    fn prop_log_space_inverse_round_trip(x in 0.5f64..250.0, which in 0usize..5) {
        let text = ["q", "2^q", "2^(2^q)", "log(q)", "log(q,2)"][which];
        let m = QubitMapping::classify(text);
        let log_q = m.size_exponent_to_qubits_log10(x);
        let back = m.qubits_log10_to_size_log10(log_q, &MappingCfg::default()).unwrap();
        prop_assert!((back - x).abs() < 1e-6 * x.max(1.0), "{} at {}: {}", text, x, back);
    }
}
