mod common;
use common::run;

#[test]
fn a_function_with_no_return_statement_returns_nil() {
    assert_eq!(run("fun noop() {} print noop();"), "nil\n");
}

#[test]
fn parameters_are_bound_in_the_function_is_own_scope() {
    assert_eq!(run("fun add(a, b) { return a + b; } print add(1, 2);"), "3\n");
}

#[test]
fn recursion_works_through_the_function_is_own_name() {
    let source = "\
        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        print fib(8);
    ";
    assert_eq!(run(source), "21\n");
}

#[test]
fn a_function_value_stringifies_with_its_name() {
    assert_eq!(run("fun greet() {} print greet;"), "<fn greet>\n");
}

#[test]
fn functions_can_be_passed_as_values_and_called_indirectly() {
    let source = "\
        fun add(a, b) { return a + b; }
        fun apply(f, x, y) { return f(x, y); }
        print apply(add, 2, 3);
    ";
    assert_eq!(run(source), "5\n");
}

#[test]
fn native_clock_is_callable_with_no_arguments_and_returns_a_number() {
    assert_eq!(run("print clock() > 0;"), "true\n");
}
