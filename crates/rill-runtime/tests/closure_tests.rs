//! Closure semantics
//!
//! Closures capture bindings, not values: a function shares the very
//! environment it was declared in, and mutations through one reference are
//! visible through every other.

mod common;

use common::assert_eq;
use common::*;

#[test]
fn counter_closure_shares_its_captured_binding() {
    let output = run_program(
        r#"
        fun make_counter() {
            var count = 0;
            fun increment() {
                count = count + 1;
                return count;
            }
            return increment;
        }
        var counter = make_counter();
        print counter();
        print counter();
        print counter();
        "#,
    );
    assert_eq!(output, "1\n2\n3\n");
}

#[test]
fn separate_calls_produce_independent_environments() {
    let output = run_program(
        r#"
        fun make_counter() {
            var count = 0;
            fun increment() {
                count = count + 1;
                return count;
            }
            return increment;
        }
        var a = make_counter();
        var b = make_counter();
        print a();
        print a();
        print b();
        "#,
    );
    assert_eq!(output, "1\n2\n1\n");
}

#[test]
fn capture_is_lexical_not_dynamic() {
    // The classic resolver test: `show` must keep seeing the binding that
    // existed when it was declared, not a later shadowing declaration.
    let output = run_program(
        r#"
        var a = "global";
        {
            fun show() {
                print a;
            }
            show();
            var a = "block";
            show();
            print a;
        }
        "#,
    );
    assert_eq!(output, "global\nglobal\nblock\n");
}

#[test]
fn two_closures_over_the_same_scope_share_state() {
    let output = run_program(
        r#"
        fun make_pair() {
            var value = 0;
            fun set(v) { value = v; }
            fun get() { return value; }
            // poor man's pair: stash both in globals
            setter = set;
            getter = get;
        }
        var setter = nil;
        var getter = nil;
        make_pair();
        setter(42);
        print getter();
        "#,
    );
    assert_eq!(output, "42\n");
}

#[test]
fn anonymous_functions_are_expressions() {
    let output = run_program(
        r#"
        fun apply_twice(f, x) {
            return f(f(x));
        }
        print apply_twice(fun (n) { return n + 1; }, 5);
        var square = fun (n) { return n * n; };
        print square(6);
        "#,
    );
    assert_eq!(output, "7\n36\n");
}

#[test]
fn closures_capture_loop_variable_binding() {
    // one `i` binding per loop is NOT what var gives you here: the single
    // binding is shared, so the closure sees the final value
    let output = run_program(
        r#"
        var saved = nil;
        var i = 0;
        while (i < 3) {
            fun show() { print i; }
            saved = show;
            i = i + 1;
        }
        saved();
        "#,
    );
    assert_eq!(output, "3\n");
}

#[test]
fn higher_order_functions_compose() {
    let output = run_program(
        r#"
        fun compose(f, g) {
            fun composed(x) { return f(g(x)); }
            return composed;
        }
        fun add_one(n) { return n + 1; }
        fun double(n) { return n * 2; }
        print compose(add_one, double)(5);
        print compose(double, add_one)(5);
        "#,
    );
    assert_eq!(output, "11\n12\n");
}
