//! Lexical scoping and shadowing

mod common;

use common::assert_eq;
use common::*;

#[test]
fn blocks_nest_and_restore() {
    let output = run_program(
        r#"
        var a = "outer";
        {
            var a = "inner";
            print a;
        }
        print a;
        "#,
    );
    assert_eq!(output, "inner\nouter\n");
}

#[test]
fn shadowing_two_deep_then_one() {
    let output = run_program(
        r#"
        var x = 1;
        {
            var x = 2;
            {
                var x = 3;
                print x;
            }
            print x;
        }
        print x;
        "#,
    );
    assert_eq!(output, "3\n2\n1\n");
}

#[test]
fn inner_scope_reads_through_to_outer() {
    let output = run_program(
        r#"
        var a = "found";
        {
            {
                print a;
            }
        }
        "#,
    );
    assert_eq!(output, "found\n");
}

#[test]
fn assignment_writes_the_binding_it_resolves_to() {
    let output = run_program(
        r#"
        var x = "old";
        {
            x = "new";
        }
        print x;
        "#,
    );
    assert_eq!(output, "new\n");
}

#[test]
fn assignment_through_shadow_does_not_leak_outward() {
    let output = run_program(
        r#"
        var x = "outer";
        {
            var x = "inner";
            x = "changed";
            print x;
        }
        print x;
        "#,
    );
    assert_eq!(output, "changed\nouter\n");
}

#[test]
fn globals_allow_redefinition() {
    let output = run_program(
        r#"
        var v = 1;
        var v = 2;
        print v;
        "#,
    );
    assert_eq!(output, "2\n");
}

#[test]
fn global_functions_can_be_defined_after_use_site() {
    // the body references a global that only exists by call time
    let output = run_program(
        r#"
        fun call_later() { return helper(); }
        fun helper() { return "late"; }
        print call_later();
        "#,
    );
    assert_eq!(output, "late\n");
}

#[test]
fn undefined_variable_is_a_runtime_error() {
    let diagnostics = try_run_program("print ghost;").unwrap_err();
    assert_eq!(diagnostics[0].code, "RL0402");
}

#[test]
fn assignment_to_undefined_variable_is_a_runtime_error() {
    let diagnostics = try_run_program("ghost = 1;").unwrap_err();
    assert_eq!(diagnostics[0].code, "RL0402");
}

#[test]
fn parameters_shadow_globals() {
    let output = run_program(
        r#"
        var n = "global";
        fun show(n) { print n; }
        show("param");
        print n;
        "#,
    );
    assert_eq!(output, "param\nglobal\n");
}
