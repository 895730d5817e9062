use pretty_assertions::assert_eq;
use crate::interpreter::error::ErrorKind;
use crate::interpreter::interpreter::Interpreter;
use crate::interpreter::lexer::TokenPos;
use super::*;

fn run_error(source: &str) -> Error {
    let mut interpreter = Interpreter::new(16).unwrap();
    interpreter.run(source).unwrap_err()
}

#[test]
pub fn test_runtime_error_with_trace() {
    let source = "let x = 1;\nx = y;";

    assert_eq!(render(&run_error(source), source, false), [
        "runtime error: Variable 'y' could not be resolved",
        " --> 2:5",
        "  |",
        "2 | x = y;",
        "  |     ^",
        " at 2:3",
    ].join("\n"));
}

#[test]
pub fn test_parse_error_at_end_of_input() {
    let source = "let x = 5";

    assert_eq!(render(&run_error(source), source, false), [
        "parse error: Expected ';' after variable declaration, got end of input",
        " --> 1:10",
        "  |",
        "1 | let x = 5",
        "  |          ^",
        " at 1:1",
    ].join("\n"));
}

#[test]
pub fn test_lex_error() {
    let source = "let a = 1;\n\tlet b = a # 2;";

    let rendered = render(&run_error(source), source, false);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "lex error: Unexpected character '#'");
    assert_eq!(lines[1], " --> 2:12");
    // The tab is kept so the caret lines up
    assert_eq!(lines[4], "  | \t          ^");
}

#[test]
pub fn test_error_without_trace() {
    let error = Error::new(ErrorKind::DivisionByZero);

    assert_eq!(render(&error, "", false), "runtime error: Division by zero");
}

#[test]
pub fn test_wide_line_numbers() {
    let source = format!("{}1 / 0", "\n".repeat(11));
    let error = Error::at(ErrorKind::DivisionByZero, TokenPos::new(13));

    assert_eq!(render(&error, &source, false), [
        "runtime error: Division by zero",
        "  --> 12:3",
        "   |",
        "12 | 1 / 0",
        "   |   ^",
    ].join("\n"));
}

#[test]
pub fn test_colors() {
    let error = Error::at(ErrorKind::DivisionByZero, TokenPos::new(0));
    let rendered = render(&error, "1 / 0", true);

    assert!(rendered.starts_with("\x1b[1;31mruntime error\x1b[0m: \x1b[1mDivision by zero\x1b[0m"));
    assert!(rendered.contains("\x1b[1;34m-->\x1b[0m 1:1"));
    assert!(rendered.ends_with("\x1b[1;31m^\x1b[0m"));
}
