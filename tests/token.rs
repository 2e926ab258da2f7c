mod common;
use common::run;

#[test]
fn an_unrecognized_character_is_a_scan_error_and_the_program_does_not_run() {
    assert_eq!(run("print 1; # print 2;"), "");
}

#[test]
fn line_comments_are_skipped() {
    assert_eq!(run("// this whole line is a comment\nprint 1;"), "1\n");
}

#[test]
fn identifiers_may_contain_digits_and_underscores_after_the_first_character() {
    assert_eq!(run("var _a1_b2 = 1; print _a1_b2;"), "1\n");
}
