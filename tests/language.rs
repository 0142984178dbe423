use std::fs;

use calci::{
    error::{Error, ParseError, RuntimeError},
    interpreter::{session::Interpreter, value::core::Value},
};
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

fn run(src: &str) -> (Result<Value, Error>, String) {
    let mut session = Interpreter::new(Vec::new());
    let result = session.run(src);
    let output = String::from_utf8(session.into_output()).expect("output is UTF-8");
    (result, output)
}

fn assert_output(src: &str, expected: &str) {
    let (result, output) = run(src);
    if let Err(e) = result {
        panic!("Script failed: {e}\n{src}");
    }
    assert_eq!(output, expected);
}

fn assert_value(src: &str, expected: Value) {
    match run(src).0 {
        Ok(value) => assert_eq!(value, expected),
        Err(e) => panic!("Script failed: {e}\n{src}"),
    }
}

fn assert_failure(src: &str) -> Error {
    match run(src).0 {
        Ok(value) => panic!("Script succeeded with `{value}` but was expected to fail:\n{src}"),
        Err(e) => e,
    }
}

#[test]
fn script_fixtures_match_expected_output() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/programs").into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| e.path().extension().is_some_and(|ext| ext == "calci"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expected_path = path.with_extension("out");
        let expected = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
                                                             panic!("Failed to read {expected_path:?}: {e}")
                                                         });

        count += 1;
        let (result, output) = run(&source);
        if let Err(e) = result {
            panic!("Fixture {path:?} failed:\n{e}");
        }
        assert_eq!(output, expected, "output of {path:?}");
    }

    assert!(count > 0, "No fixtures found in tests/programs");
}

#[test]
fn integer_literals_evaluate_to_themselves() {
    for n in [0_i64, 1, 42, -17, 9_223_372_036_854_775_807, -9_223_372_036_854_775_808] {
        assert_value(&n.to_string(), Value::Integer(n));
    }
}

#[test]
fn float_arithmetic_matches_double_precision() {
    assert_output("displayl 5.5*2.2 - 5.5 + (5.5 % 2.2)", "7.700000000000001\n");
    assert_output("displayl 0.1 + 0.2", "0.30000000000000004\n");
    assert_output("displayl 1 + 2.0", "3.0\n");
}

#[test]
fn compound_assignments() {
    assert_value("var x = 2\nx += 3\nx", Value::Integer(5));
    assert_value("var x = 7\nx -= 2\nx", Value::Integer(5));
    assert_value("var x = 4\nx *= 2\nx", Value::Integer(8));
    assert_value("var x = 9\nx /= 2\nx", Value::Integer(4));
    assert_value("var x = -7\nx %= 3\nx", Value::Integer(2));
}

#[test]
fn declared_types_are_accepted() {
    assert_value("var integer a = 3; var decimal b = 0.5; var uinteger c = 1; a + b + c",
                 Value::Float(4.5));
}

#[test]
fn assignment_needs_a_declaration() {
    let error = assert_failure("y = 3");
    assert!(matches!(error, Error::Runtime(RuntimeError::UnboundName { ref name, line: 1 }) if name == "y"));
    assert_eq!(error.to_string(), "Error on line 1: `y` is not bound to a value.");

    assert_value("var y = 0\ny = 3\ny", Value::Integer(3));
}

#[test]
fn names_bound_in_bodies_do_not_leak() {
    assert!(matches!(assert_failure("while False { }\nfn f() { var inner = 1 }\nf()\ninner"),
                     Error::Runtime(RuntimeError::UnboundName { line: 4, .. })));
    assert!(matches!(assert_failure("for (var i = 0; i < 3; i += 1) { var seen = i }\nseen"),
                     Error::Runtime(RuntimeError::UnboundName { line: 2, .. })));
}

#[test]
fn later_declarations_shadow_before_they_run() {
    let error = assert_failure("var x = 1\nfn f() {\n  displayl x\n  var x = 2\n}\nf()");
    assert!(matches!(error, Error::Runtime(RuntimeError::UnboundName { line: 3, .. })));
}

#[test]
fn conditionals_yield_values() {
    assert_value("if 5 == 5 then 10 end", Value::Integer(10));
    assert_value("if 5 == 6 then 10 end", Value::Unit);
    assert_value("if 1 > 2 then { 1 } else { 2 } end", Value::Integer(2));
    assert_output("displayl if 1 > 2 then 10 end", "");
    assert!(matches!(assert_failure("if 1 then 2 end"),
                     Error::Runtime(RuntimeError::TypeMismatch { .. })));
}

#[test]
fn logical_operators_are_eager() {
    let src = "var hits = 0\nfn touch() { hits += 1; True }\nvar r = False and touch()\nr = True or touch()\nhits";
    assert_value(src, Value::Integer(2));
    assert!(matches!(assert_failure("True and 1"),
                     Error::Runtime(RuntimeError::TypeMismatch { .. })));
}

#[test]
fn characters_and_codes() {
    assert_output("displayl char(66)", "B\n");
    assert_output("displayl ascii('a')", "97\n");
    assert_output("displayl char(ascii(\"a\") + 1)", "b\n");
}

#[test]
fn array_aliasing_and_methods() {
    assert_output("var a = [1, 2, 3]; var b = a; b[0] = 9; displayl a; displayl b",
                  "[9, 2, 3]\n[9, 2, 3]\n");
    assert_output("var a = [1, 2, 3, 4, 5]\na.PushFront(0)\ndisplayl a\ndisplayl a.PopBack\ndisplayl a",
                  "[0, 1, 2, 3, 4, 5]\n5\n[0, 1, 2, 3, 4]\n");
}

#[test]
fn recursive_functions_terminate() {
    assert_value("fnrec fact(n) { if n <= 1 then 1 else n * fact(n - 1) end }\nfact(5)",
                 Value::Integer(120));
}

#[test]
fn sessions_keep_bindings_between_runs() {
    let mut session = Interpreter::new(Vec::new());
    session.run("var total = 1").unwrap();
    session.run("fn bump(n) { total += n }").unwrap();
    session.run("bump(4)").unwrap();
    assert_eq!(session.run("total").unwrap(), Value::Integer(5));

    assert!(session.run("total = ghost").is_err());
    assert_eq!(session.run("total").unwrap(), Value::Integer(5));
}

#[test]
fn pure_programs_are_repeatable() {
    let src = "var x = 3\nfor (var i = 0; i < 4; i += 1) { display x * i; display \" \" }\ndisplayl 2.5 ÷ 2";
    let (first, first_output) = run(src);
    let (second, second_output) = run(src);
    assert!(first.is_ok() && second.is_ok());
    assert_eq!(first_output, "0 3 6 9 1.25\n");
    assert_eq!(first_output, second_output);
}

#[test]
fn runtime_errors() {
    assert!(matches!(assert_failure("1 / 0"),
                     Error::Runtime(RuntimeError::DivisionByZero { line: 1 })));
    assert!(matches!(assert_failure("5 % 0"),
                     Error::Runtime(RuntimeError::DivisionByZero { .. })));
    assert!(matches!(assert_failure("9223372036854775807 + 1"),
                     Error::Runtime(RuntimeError::Overflow { .. })));
    assert!(matches!(assert_failure("\"a\" + 1"),
                     Error::Runtime(RuntimeError::TypeMismatch { .. })));
    assert!(matches!(assert_failure("var a = [1]\na[1]"),
                     Error::Runtime(RuntimeError::IndexOutOfRange { index: 1, len: 1, line: 2 })));
    assert!(matches!(assert_failure("[].PopBack"),
                     Error::Runtime(RuntimeError::EmptyContainer { .. })));
    assert!(matches!(assert_failure("fn f(a) { a }\nf(1, 2)"),
                     Error::Runtime(RuntimeError::Arity { expected: 1, found: 2, .. })));
    assert!(matches!(assert_failure("char(-5)"),
                     Error::Runtime(RuntimeError::InvalidCharacterCode { code: -5, .. })));
}

#[test]
fn output_before_a_runtime_error_is_kept() {
    let (result, output) = run("displayl 1\ndisplayl 1 / 0\ndisplayl 2");
    assert!(result.is_err());
    assert_eq!(output, "1\n");
}

#[test]
fn syntax_errors() {
    assert!(matches!(assert_failure("var = 3"),
                     Error::Parse(ParseError::UnexpectedToken { line: 1, .. })));
    assert!(matches!(assert_failure("3 = 4"),
                     Error::Parse(ParseError::InvalidAssignmentTarget { .. })));
    assert!(matches!(assert_failure("var a = []\na.Sort"),
                     Error::Parse(ParseError::UnknownMethod { line: 2, .. })));
    assert!(matches!(assert_failure("var a = []\na.PushBack"),
                     Error::Parse(ParseError::MethodArity { expected: 1, found: 0, .. })));
    assert!(matches!(assert_failure("var a = 1 @ 2"),
                     Error::Parse(ParseError::UnexpectedCharacter { .. })));
}

#[test]
fn syntax_errors_run_nothing() {
    let (result, output) = run("displayl 1\ndisplayl (2");
    assert!(matches!(result, Err(Error::Parse(_))));
    assert_eq!(output, "");
}

#[test]
fn groups_may_hold_assignments_and_declarations() {
    let (result, output) = run("var x = 5\ndisplay (x -= 2)\nx");
    assert_eq!(result.unwrap(), Value::Integer(3));
    assert_eq!(output, "");

    assert_output("display( var integer x = 3+7-1)\ndisplayl x", "9\n");
}

#[test]
fn comments_may_wrap() {
    assert_output("/~ a comment\nover two lines ~/ displayl 1\ndisplayl 2", "1\n2\n");
    assert!(matches!(assert_failure("/~ a comment\nover two lines ~/\nghost"),
                     Error::Runtime(RuntimeError::UnboundName { line: 3, .. })));
}

#[test]
fn arrays_may_contain_themselves() {
    assert_output("var a = [1]\na.PushBack(a)\ndisplayl a.Length\ndisplayl a\ndisplayl a == a",
                  "2\n[1, [...]]\nTrue\n");
    assert_output("var a = [1]; a.PushBack(a)\nvar b = [1]; b.PushBack(b)\ndisplayl a == b",
                  "True\n");
}

#[test]
fn runaway_recursion_is_an_error() {
    let mut session = Interpreter::new(Vec::new());
    session.run("fnrec count(n) { if n == 0 then 0 else 1 + count(n - 1) end }").unwrap();

    let error = session.run("displayl 0\ncount(100000)").unwrap_err();
    assert!(matches!(error, Error::Runtime(RuntimeError::RecursionLimit { depth: 1000, .. })));
    assert_eq!(error.line(), Some(1));

    assert_eq!(session.run("count(10)").unwrap(), Value::Integer(10));
}

#[test]
fn deeply_nested_expressions_evaluate() {
    let src = format!("{}1{}", "(1 + ".repeat(1000), ")".repeat(1000));
    assert_value(&src, Value::Integer(1001));
}

#[test]
fn errors_know_their_line() {
    assert_eq!(assert_failure("var x = 1\nx + ghost").line(), Some(2));
    assert_eq!(assert_failure("var x = 1\n\nvar = 2").line(), Some(3));
}
