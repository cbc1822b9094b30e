//! End-to-end language tests
//!
//! Each test drives a full source string through the public `run`
//! entry point and checks the output text, exactly as a display
//! layer would see it.

use pascalet::run;

/// Run a program and assert its STDOUT.
fn assert_output(source: &str, expected: &str) {
    let outcome = run(source);
    assert_eq!(outcome.output, expected, "source: {source}");
}

/// Run a program and assert it fails with the given tagged error.
fn assert_error(source: &str, expected: &str) {
    let outcome = run(source);
    assert_eq!(outcome.output, expected, "source: {source}");
}

#[test]
fn empty_program_produces_no_output() {
    assert_output("PROGRAM empty; BEGIN END.", "");
}

#[test]
fn write_prints_an_integer() {
    assert_output(
        "PROGRAM p; VAR x: INTEGER; BEGIN x := 42; write(x) END.",
        "42",
    );
}

#[test]
fn write_prints_a_real() {
    assert_output("PROGRAM p; VAR x: REAL; BEGIN x := 2.5; write(x) END.", "2.5");
}

#[test]
fn arithmetic_precedence() {
    assert_output(
        "PROGRAM p; VAR x: INTEGER; BEGIN x := 2 + 3 * 4; write(x) END.",
        "14",
    );
}

#[test]
fn parentheses_override_precedence() {
    assert_output(
        "PROGRAM p; VAR x: INTEGER; BEGIN x := (2 + 3) * 4; write(x) END.",
        "20",
    );
}

#[test]
fn integer_division_floors() {
    assert_output(
        "PROGRAM p; VAR x: INTEGER; BEGIN x := 7 DIV 2; write(x) END.",
        "3",
    );
}

#[test]
fn float_division_keeps_fraction() {
    assert_output(
        "PROGRAM p; VAR x: REAL; BEGIN x := 7 / 2; write(x) END.",
        "3.5",
    );
}

#[test]
fn oversized_integer_literal_saturates_instead_of_zeroing() {
    let outcome = run(
        "PROGRAM p; VAR x: INTEGER; BEGIN x := 99999999999999999999; write(x) END.",
    );
    assert_ne!(outcome.output, "0");
    assert_eq!(outcome.output, (i64::MAX as f64).to_string());
}

#[test]
fn later_actual_evaluates_against_earlier_formals() {
    assert_output(
        "PROGRAM p; VAR x: REAL; \
         PROCEDURE q(x: REAL; y: REAL); BEGIN write(x); write(y) END; \
         BEGIN x := 1; q(5, x) END.",
        "55",
    );
}

#[test]
fn unary_operators_chain() {
    assert_output(
        "PROGRAM p; VAR x: INTEGER; BEGIN x := --5 + -2; write(x) END.",
        "3",
    );
}

#[test]
fn comments_are_skipped() {
    assert_output(
        "PROGRAM p; VAR x: INTEGER; { setup } BEGIN { assign } x := 1; write(x) END.",
        "1",
    );
}

#[test]
fn assignment_overwrites() {
    assert_output(
        "PROGRAM p; VAR x: INTEGER; BEGIN x := 1; x := x + 1; write(x) END.",
        "2",
    );
}

#[test]
fn multi_name_declaration_declares_each() {
    assert_output(
        "PROGRAM p; VAR a, b: INTEGER; BEGIN a := 1; b := 2; write(a); write(b) END.",
        "12",
    );
}

#[test]
fn procedure_call_with_expression_arguments() {
    assert_output(
        "PROGRAM p; \
         PROCEDURE double(n: REAL); BEGIN write(n + n) END; \
         BEGIN double(3 + 1) END.",
        "8",
    );
}

#[test]
fn nested_compound_statements() {
    assert_output(
        "PROGRAM p; VAR x: INTEGER; BEGIN BEGIN x := 5 END; write(x) END.",
        "5",
    );
}

#[test]
fn trailing_semicolon_is_an_empty_statement() {
    assert_output(
        "PROGRAM p; VAR x: INTEGER; BEGIN x := 9; write(x); END.",
        "9",
    );
}

#[test]
fn integer_widens_into_real_variable() {
    assert_output("PROGRAM p; VAR x: REAL; BEGIN x := 3; write(x) END.", "3");
}

#[test]
fn part10_style_program() {
    // The classic multi-section showcase: declarations, nested
    // compounds, DIV and / over mixed types.
    let source = "\
PROGRAM Part10;
VAR
   number     : INTEGER;
   a, b, c, x : INTEGER;
   y          : REAL;

BEGIN {Part10}
   BEGIN
      number := 2;
      a := number;
      b := 10 * a + 10 * number DIV 4;
      c := a - - b
   END;
   x := 11;
   y := 20 / 7 + 3.14;
   write(y)
END.  {Part10}";
    assert_output(source, (20.0f64 / 7.0 + 3.14).to_string().as_str());
}

#[test]
fn lexer_error_is_tagged() {
    assert_error(
        "PROGRAM p; BEGIN x := @ END.",
        "Lexer Error: Unexpected char '@'",
    );
}

#[test]
fn parser_error_is_tagged() {
    let outcome = run("PROGRAM p; VAR x INTEGER; BEGIN END.");
    assert!(
        outcome.output.starts_with("Parser Error: "),
        "got: {}",
        outcome.output
    );
}

#[test]
fn missing_semicolon_between_statements_is_rejected() {
    let outcome = run("PROGRAM p; VAR x, y: INTEGER; BEGIN x := 1 y := 2 END.");
    assert!(
        outcome.output.starts_with("Parser Error: "),
        "got: {}",
        outcome.output
    );
}

#[test]
fn keywords_are_case_sensitive() {
    let outcome = run("program p; BEGIN END.");
    assert!(
        outcome.output.starts_with("Parser Error: "),
        "got: {}",
        outcome.output
    );
}

#[test]
fn undeclared_variable_is_a_semantic_error() {
    assert_error(
        "PROGRAM p; BEGIN x := 1 END.",
        "Semantic Error: x not found in scope",
    );
}

#[test]
fn duplicate_declaration_is_a_semantic_error() {
    let outcome = run("PROGRAM p; VAR x: INTEGER; VAR x: REAL; BEGIN END.");
    assert!(
        outcome.output.starts_with("Semantic Error: "),
        "got: {}",
        outcome.output
    );
}

#[test]
fn real_into_integer_is_a_semantic_error() {
    let outcome = run("PROGRAM p; VAR x: INTEGER; BEGIN x := 1.5 END.");
    assert!(
        outcome.output.starts_with("Semantic Error: "),
        "got: {}",
        outcome.output
    );
}

#[test]
fn div_on_reals_is_a_semantic_error() {
    let outcome = run("PROGRAM p; VAR x: INTEGER; BEGIN x := 1.0 DIV 2 END.");
    assert!(
        outcome.output.starts_with("Semantic Error: "),
        "got: {}",
        outcome.output
    );
}

#[test]
fn calling_a_variable_is_a_semantic_error() {
    let outcome = run("PROGRAM p; VAR x: INTEGER; BEGIN x(1) END.");
    assert!(
        outcome.output.starts_with("Semantic Error: "),
        "got: {}",
        outcome.output
    );
}

#[test]
fn wrong_arity_is_a_semantic_error() {
    let outcome = run(
        "PROGRAM p; PROCEDURE q(a: INTEGER); BEGIN END; BEGIN q(1, 2) END.",
    );
    assert!(
        outcome.output.starts_with("Semantic Error: "),
        "got: {}",
        outcome.output
    );
}

#[test]
fn real_argument_for_integer_param_is_a_semantic_error() {
    let outcome = run(
        "PROGRAM p; PROCEDURE q(a: INTEGER); BEGIN END; BEGIN q(1.5) END.",
    );
    assert!(
        outcome.output.starts_with("Semantic Error: "),
        "got: {}",
        outcome.output
    );
}

#[test]
fn procedure_scope_does_not_leak() {
    assert_error(
        "PROGRAM p; \
         PROCEDURE q(a: INTEGER); BEGIN write(a) END; \
         BEGIN a := 1 END.",
        "Semantic Error: a not found in scope",
    );
}

#[test]
fn outer_variables_are_visible_inside_procedures() {
    assert_output(
        "PROGRAM p; VAR g: INTEGER; \
         PROCEDURE show; BEGIN write(g) END; \
         BEGIN g := 7; show END.",
        "7",
    );
}

#[test]
fn recursion_stops_at_the_depth_limit() {
    let outcome = run(
        "PROGRAM p; PROCEDURE f(n: INTEGER); BEGIN f(n + 1) END; BEGIN f(0) END.",
    );
    assert!(
        outcome.output.starts_with("Name Error: Call depth limit"),
        "got: {}",
        outcome.output
    );
}

#[test]
fn tokens_carry_byte_spans() {
    let outcome = run("PROGRAM p; BEGIN END.");
    let first = &outcome.tokens[0];
    assert_eq!((first.span.start, first.span.end), (0, 7));
    let last = outcome.tokens.last().unwrap();
    // EOF sits one past the end of the source
    assert_eq!(last.span.start, 21);
}

#[test]
fn symbol_table_lists_global_declarations() {
    let outcome = run("PROGRAM p; VAR x: INTEGER; y: REAL; BEGIN END.");
    let symbols = outcome.symbols.expect("symbols");
    assert!(symbols.contains_key("x"));
    assert!(symbols.contains_key("y"));
}
