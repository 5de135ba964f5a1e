//! Loops, break/continue, return, and the call-depth guard

mod common;

use common::assert_eq;
use common::*;

#[test]
fn while_loop_rechecks_its_condition() {
    let output = run_program(
        r#"
        var i = 0;
        while (i < 3) {
            print i;
            i = i + 1;
        }
        "#,
    );
    assert_eq!(output, "0\n1\n2\n");
}

#[test]
fn break_exits_the_innermost_loop_only() {
    let output = run_program(
        r#"
        var i = 0;
        while (i < 3) {
            var j = 0;
            while (true) {
                if (j == 2) break;
                j = j + 1;
            }
            print j;
            i = i + 1;
        }
        print "done";
        "#,
    );
    assert_eq!(output, "2\n2\n2\ndone\n");
}

#[test]
fn continue_skips_to_the_next_condition_check() {
    let output = run_program(
        r#"
        var i = 0;
        while (i < 5) {
            i = i + 1;
            if (i == 3) continue;
            print i;
        }
        "#,
    );
    assert_eq!(output, "1\n2\n4\n5\n");
}

#[test]
fn return_unwinds_through_nested_blocks_and_loops() {
    let output = run_program(
        r#"
        fun find_first_over(limit) {
            var n = 0;
            while (true) {
                n = n + 7;
                if (n > limit) {
                    return n;
                }
            }
        }
        print find_first_over(20);
        "#,
    );
    assert_eq!(output, "21\n");
}

#[test]
fn function_falls_off_the_end_to_nil() {
    let output = run_program(
        r#"
        fun nothing() {}
        print nothing();
        "#,
    );
    assert_eq!(output, "nil\n");
}

#[test]
fn recursion_works_through_the_declaration_scope() {
    let output = run_program(
        r#"
        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        print fib(15);
        "#,
    );
    assert_eq!(output, "610\n");
}

#[test]
fn runaway_recursion_hits_the_frame_limit() {
    let diagnostics = try_run_program(
        r#"
        fun forever() { return forever(); }
        forever();
        "#,
    )
    .unwrap_err();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, "RL0408");
}

#[test]
fn deep_but_bounded_recursion_succeeds() {
    let output = run_program(
        r#"
        fun countdown(n) {
            if (n == 0) return 0;
            return countdown(n - 1);
        }
        print countdown(200);
        "#,
    );
    assert_eq!(output, "0\n");
}

#[test]
fn if_uses_truthiness() {
    let output = run_program(
        r#"
        if (0) print "zero is truthy";
        if ("") print "empty string is truthy";
        if (nil) print "unreachable"; else print "nil is falsy";
        "#,
    );
    assert_eq!(
        output,
        "zero is truthy\nempty string is truthy\nnil is falsy\n"
    );
}

#[test]
fn calling_a_non_callable_is_an_error() {
    let diagnostics = try_run_program(r#"var x = 3; x();"#).unwrap_err();
    assert_eq!(diagnostics[0].code, "RL0404");
}

#[test]
fn arity_is_exact() {
    let diagnostics = try_run_program(
        r#"
        fun two(a, b) { return a + b; }
        two(1);
        "#,
    )
    .unwrap_err();
    assert_eq!(diagnostics[0].code, "RL0405");
}

#[test]
fn arguments_evaluate_left_to_right() {
    let output = run_program(
        r#"
        fun trace(x) { print x; return x; }
        fun sum3(a, b, c) { return a + b + c; }
        print sum3(trace(1), trace(2), trace(3));
        "#,
    );
    assert_eq!(output, "1\n2\n3\n6\n");
}
