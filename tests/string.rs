mod common;
use common::run;

#[test]
fn a_string_literal_prints_without_quotes() {
    assert_eq!(run("print \"hello\";"), "hello\n");
}

#[test]
fn string_concatenation_with_plus() {
    assert_eq!(run("print \"foo\" + \"bar\";"), "foobar\n");
}

#[test]
fn strings_may_span_multiple_lines() {
    assert_eq!(run("print \"line one\nline two\";"), "line one\nline two\n");
}

#[test]
fn an_unterminated_string_is_a_scan_error_and_the_program_does_not_run() {
    assert_eq!(run("print \"unterminated"), "");
}

#[test]
fn string_equality_compares_contents_not_identity() {
    assert_eq!(run("print \"a\" == \"a\"; print \"a\" == \"b\";"), "true\nfalse\n");
}
