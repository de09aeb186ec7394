use computor::{
    Config, EvalError, Session, SymbolTable, Value, define_function, define_variable, evaluate,
    format, lookup,
};
use pretty_assertions::assert_eq;

fn number(input: &str) -> f64 {
    match evaluate(input, &SymbolTable::new()) {
        Ok(Value::Number(n)) => n,
        other => panic!("{input}: expected a number, got {other:?}"),
    }
}

#[test]
fn arithmetic() {
    assert_eq!(number("2+2"), 4.0);
    assert_eq!(number("(52+2)^2*(2+(1+1))"), 11664.0);
    assert_eq!(number("7 % 4 + 1.5 * 2"), 6.0);
    assert_eq!(number("((((1))))"), 1.0);
}

#[test]
fn chains_group_left_to_right() {
    assert_eq!(number("1-2-3"), -4.0);
    assert_eq!(number("2^3^2"), 64.0);
    assert_eq!(number("16/4/2"), 2.0);
}

#[test]
fn signs() {
    assert_eq!(number("-3+2"), -1.0);
    assert_eq!(number("2+(-(-3))"), 5.0);
    assert_eq!(number("2+--2"), 4.0);
    assert_eq!(number("2*-3"), -6.0);
    assert_eq!(number("+4"), 4.0);
}

#[test]
fn self_reference_reads_the_old_value() {
    let mut table = SymbolTable::new();
    assert_eq!(define_variable("a", "1", &mut table), Ok(Value::Number(1.0)));
    assert_eq!(define_variable("a", "a+1", &mut table), Ok(Value::Number(2.0)));
    assert_eq!(lookup("a", &table), Ok(Value::Number(2.0)));
}

#[test]
fn unresolved_reference() {
    let err = evaluate("b+1", &SymbolTable::new()).unwrap_err();
    assert!(
        matches!(&err, EvalError::UnresolvedReference { name, .. } if name == "b"),
        "{err:?}"
    );
}

#[test]
fn names_ignore_case() {
    let mut table = SymbolTable::new();
    define_variable("A", "5", &mut table).unwrap();
    assert_eq!(lookup("a", &table), Ok(Value::Number(5.0)));
    assert_eq!(evaluate("a * A", &table), Ok(Value::Number(25.0)));
}

#[test]
fn matrix_addition() {
    let sum = evaluate("[[2,3];[1,2]] + [[1,2];[1,2]]", &SymbolTable::new()).unwrap();
    assert_eq!(format(&sum), "[[3,5];[2,4]]");

    let err = evaluate("[[1,2]] + [[1,2];[1,2]]", &SymbolTable::new()).unwrap_err();
    assert!(matches!(err, EvalError::DimensionMismatch { .. }), "{err:?}");
}

#[test]
fn matrices_from_variables() {
    let mut table = SymbolTable::new();
    define_variable("m", "[[1,2];[3,4]]", &mut table).unwrap();
    define_variable("k", "10", &mut table).unwrap();
    let value = evaluate("m + [[k,k];[k,-k]] + m", &table).unwrap();
    assert_eq!(format(&value), "[[12,14];[16,-2]]");
}

#[test]
fn matrix_misuse() {
    let table = SymbolTable::new();
    for input in ["[[1,2]] * [[1,2]]", "2 + [[1]]", "-[[1]]"] {
        let err = evaluate(input, &table).unwrap_err();
        assert!(
            matches!(err, EvalError::MalformedExpression { .. }),
            "{input}: {err:?}"
        );
    }
    for input in ["[[1,2];[3]]", "[1,2]", "[[[[1]]]]", "[[1,2]"] {
        let err = evaluate(input, &table).unwrap_err();
        assert!(
            matches!(err, EvalError::MalformedMatrix { .. }),
            "{input}: {err:?}"
        );
    }
}

#[test]
fn reserved_name() {
    let mut table = SymbolTable::new();
    assert_eq!(
        define_variable("i", "1", &mut table),
        Err(EvalError::InvalidVariableName {
            name: "i".to_string()
        })
    );
    assert!(table.is_empty());
}

#[test]
fn unbalanced_and_malformed() {
    let table = SymbolTable::new();
    assert!(matches!(
        evaluate("(1+2", &table),
        Err(EvalError::UnbalancedParentheses { .. })
    ));
    assert!(matches!(
        evaluate("1 2", &table),
        Err(EvalError::MalformedExpression { .. })
    ));
    assert!(matches!(
        evaluate("1 +", &table),
        Err(EvalError::MalformedExpression { .. })
    ));
    assert!(matches!(
        evaluate("2 ? 3", &table),
        Err(EvalError::InvalidToken { .. })
    ));
}

#[test]
fn division_by_zero() {
    let table = SymbolTable::new();
    for input in ["1/0", "5 % (2-2)"] {
        assert!(
            matches!(evaluate(input, &table), Err(EvalError::DivisionByZero { .. })),
            "{input}"
        );
    }
}

#[test]
fn reads_are_idempotent() {
    let mut table = SymbolTable::new();
    define_variable("x", "3", &mut table).unwrap();
    define_function("f", "y", "y * x", &mut table).unwrap();
    let first = evaluate("[[f(2), x]] + [[1, 1]]", &table).unwrap();
    assert_eq!(format(&first), "[[7,4]]");
    for _ in 0..3 {
        assert_eq!(evaluate("[[f(2), x]] + [[1, 1]]", &table), Ok(first.clone()));
    }
    assert_eq!(table.len(), 2);
}

#[test]
fn failed_assignment_changes_nothing() {
    let mut table = SymbolTable::new();
    define_variable("a", "1", &mut table).unwrap();
    for expression in ["a / 0", "a + nope", "(a", "[[a];[a,a]]"] {
        assert!(define_variable("a", expression, &mut table).is_err());
        assert_eq!(lookup("a", &table), Ok(Value::Number(1.0)));
    }
    assert!(define_variable("b", "a / 0", &mut table).is_err());
    assert!(lookup("b", &table).is_err());
}

#[test]
fn functions_substitute_their_argument() {
    let mut table = SymbolTable::new();
    define_function("f", "x", "x * 2", &mut table).unwrap();
    assert_eq!(evaluate("f(4)", &table), Ok(Value::Number(8.0)));
    assert_eq!(evaluate("F(1) + f(2)", &table), Ok(Value::Number(6.0)));

    // the body sees the table at call time
    define_function("g", "x", "x + offset", &mut table).unwrap();
    assert!(matches!(
        evaluate("g(1)", &table),
        Err(EvalError::UnresolvedReference { .. })
    ));
    define_variable("offset", "10", &mut table).unwrap();
    assert_eq!(evaluate("g(1)", &table), Ok(Value::Number(11.0)));

    // a deferred function has no value of its own
    assert!(matches!(
        lookup("f", &table),
        Err(EvalError::UnresolvedReference { .. })
    ));
}

#[test]
fn parameters_reach_matrix_elements() {
    let mut table = SymbolTable::new();
    define_function("f", "x", "[[x, 1]] + [[1, 1]]", &mut table).unwrap();
    assert_eq!(evaluate("f(2)", &table).map(|v| format(&v)), Ok("[[3,2]]".to_string()));

    // a global of the same name must not leak into the body
    define_variable("x", "100", &mut table).unwrap();
    assert_eq!(evaluate("f(2)", &table).map(|v| format(&v)), Ok("[[3,2]]".to_string()));
    assert_eq!(evaluate("f(x)", &table).map(|v| format(&v)), Ok("[[101,2]]".to_string()));
}

#[test]
fn matrices_as_arguments() {
    let mut table = SymbolTable::new();
    define_function("g", "m", "m + m", &mut table).unwrap();
    assert_eq!(evaluate("g([[1,2]])", &table).map(|v| format(&v)), Ok("[[2,4]]".to_string()));

    define_variable("k", "3", &mut table).unwrap();
    assert_eq!(
        evaluate("g([[k, k + 1]; [0, -k]])", &table).map(|v| format(&v)),
        Ok("[[6,8];[0,-6]]".to_string())
    );
    assert!(matches!(
        evaluate("g([[1]]) + 1", &table),
        Err(EvalError::MalformedExpression { .. })
    ));
}

#[test]
fn non_finite_results_are_rejected() {
    let table = SymbolTable::new();
    for input in ["0^-1", "(-8)^0.5", "10^400", "[[10^308]] + [[10^308]]"] {
        let err = evaluate(input, &table).unwrap_err();
        assert!(
            matches!(err, EvalError::MalformedExpression { .. }),
            "{input}: {err:?}"
        );
    }
}

#[test]
fn function_bodies_are_checked_when_defined() {
    let mut table = SymbolTable::new();
    assert!(matches!(
        define_function("f", "x", "(x", &mut table),
        Err(EvalError::UnbalancedParentheses { .. })
    ));
    assert!(matches!(
        define_function("f", "x", "x x", &mut table),
        Err(EvalError::MalformedExpression { .. })
    ));
    assert!(matches!(
        define_function("f", "i", "i", &mut table),
        Err(EvalError::InvalidVariableName { .. })
    ));
    assert!(table.is_empty());
}

#[test]
fn eager_functions_ignore_their_argument() {
    let mut table = SymbolTable::with_config(Config::default().eager(true));
    define_variable("x", "5", &mut table).unwrap();
    define_function("f", "x", "x * 2", &mut table).unwrap();
    assert_eq!(evaluate("f(1)", &table), Ok(Value::Number(10.0)));
    assert_eq!(evaluate("f(100)", &table), Ok(Value::Number(10.0)));
    assert_eq!(lookup("f", &table), Ok(Value::Number(10.0)));

    // the parameter is never bound, so it must already resolve
    assert!(matches!(
        define_function("g", "y", "y + 1", &mut table),
        Err(EvalError::UnresolvedReference { .. })
    ));
}

#[test]
fn recursion_is_bounded() {
    let mut table = SymbolTable::with_config(Config::default().max_depth(16));
    define_function("f", "x", "f(x) + 1", &mut table).unwrap();
    assert!(matches!(
        evaluate("f(0)", &table),
        Err(EvalError::TooDeep { limit: 16, .. })
    ));
}

#[test]
fn number_formatting() {
    let table = SymbolTable::new();
    let show = |input: &str| format(&evaluate(input, &table).unwrap());
    assert_eq!(show("2+2"), "4");
    assert_eq!(show("1/4"), "0.25");
    assert_eq!(show("-0"), "0");
    assert_eq!(show("[[1/2, 3]]"), "[[0.5,3]]");
}

#[test]
fn session_statements() {
    let mut session = Session::default();
    let mut run = |line: &str| session.execute(line).map(|outcome| outcome.to_string());
    assert_eq!(run("x = 2"), Ok("2".to_string()));
    assert_eq!(run("sq(y) = y ^ 2"), Ok("sq(y) = y ^ 2".to_string()));
    assert_eq!(run("sq(x + 1) - x = ?"), Ok("7".to_string()));
    assert_eq!(run("X"), Ok("2".to_string()));
    assert!(matches!(
        run("i = 3"),
        Err(EvalError::InvalidVariableName { .. })
    ));
}
