mod common;
use common::run;

#[test]
fn init_runs_as_part_of_construction() {
    let source = "\
        class Point {
            init(x, y) {
                this.x = x;
                this.y = y;
            }
        }
        var p = Point(1, 2);
        print p.x;
        print p.y;
    ";
    assert_eq!(run(source), "1\n2\n");
}

#[test]
fn init_always_returns_this_even_with_a_bare_return() {
    let source = "\
        class Thing {
            init() { return; }
        }
        print Thing().init();
    ";
    assert_eq!(run(source), "Thing instance\n");
}

#[test]
fn returning_a_value_from_init_is_resolved_as_an_error_and_the_program_does_not_run() {
    let source = "\
        class Thing {
            init() { return 1; }
        }
        print \"unreachable\";
    ";
    assert_eq!(run(source), "");
}

#[test]
fn calling_init_directly_reinitializes_and_still_returns_this() {
    let source = "\
        class Counter {
            init() { this.count = 0; }
        }
        var c = Counter();
        c.count = 5;
        c.init();
        print c.count;
    ";
    assert_eq!(run(source), "0\n");
}

#[test]
fn constructor_arity_mismatch_is_a_runtime_error() {
    let source = "\
        class Point {
            init(x, y) { this.x = x; this.y = y; }
        }
        Point(1);
        print \"unreachable\";
    ";
    assert_eq!(run(source), "");
}
