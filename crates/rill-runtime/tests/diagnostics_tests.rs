//! Diagnostic reporting: codes, collection, and rendered output

mod common;

use common::assert_eq;
use common::*;
use insta::assert_snapshot;
use rill_runtime::parser::Parser;
use rill_runtime::{has_errors, DiagnosticLevel};

#[test]
fn lexer_reports_every_bad_character() {
    let diagnostics = static_diagnostics("var a = 1 @ # ;");
    let codes: Vec<_> = diagnostics.iter().map(|d| d.code.as_str()).collect();
    assert_eq!(codes, vec!["RL0101", "RL0101"]);
}

#[test]
fn parser_recovers_and_reports_multiple_errors() {
    let diagnostics = static_diagnostics(
        r#"
        var = 1;
        var ok = 2;
        print ok +;
        "#,
    );
    let codes: Vec<_> = diagnostics.iter().map(|d| d.code.as_str()).collect();
    assert_eq!(codes, vec!["RL0201", "RL0201"]);
}

#[test]
fn parser_finishes_on_a_lone_semicolon() {
    let diagnostics = static_diagnostics(";");
    let codes: Vec<_> = diagnostics.iter().map(|d| d.code.as_str()).collect();
    assert_eq!(codes, vec!["RL0201"]);
}

#[test]
fn parser_finishes_when_the_error_follows_a_semicolon() {
    let diagnostics = static_diagnostics("var x = 1; ?");
    let codes: Vec<_> = diagnostics.iter().map(|d| d.code.as_str()).collect();
    assert_eq!(codes, vec!["RL0201"]);
}

#[test]
fn parser_accepts_an_empty_token_stream() {
    let (program, diagnostics) = Parser::new(Vec::new()).parse();
    assert!(program.statements.is_empty());
    assert!(diagnostics.is_empty());
}

#[test]
fn invalid_assignment_target_is_reported() {
    let diagnostics = static_diagnostics("1 + 2 = 3;");
    assert!(diagnostics.iter().any(|d| d.code == "RL0202"));
}

#[test]
fn static_errors_from_all_phases_are_collected_together() {
    // one lex error, one resolve error, in a single pass
    let diagnostics = static_diagnostics("var a = @1; break;");
    let codes: Vec<_> = diagnostics.iter().map(|d| d.code.as_str()).collect();
    assert_eq!(codes, vec!["RL0101", "RL0305"]);
}

#[test]
fn execution_is_refused_when_static_errors_exist() {
    // the print must never run despite being valid on its own
    let result = try_run_program(
        r#"
        print "must not run";
        return 1;
        "#,
    );
    let diagnostics = result.unwrap_err();
    assert_eq!(diagnostics[0].code, "RL0303");
}

#[test]
fn warnings_do_not_refuse_execution() {
    let output = run_program(
        r#"
        {
            var unused = 1;
        }
        print "ran";
        "#,
    );
    assert_eq!(output, "ran\n");

    let diagnostics = static_diagnostics("{ var unused = 1; }");
    assert!(!has_errors(&diagnostics));
    assert_eq!(diagnostics[0].level, DiagnosticLevel::Warning);
    assert_eq!(diagnostics[0].code, "RL0390");
}

#[test]
fn human_format_for_a_runtime_error() {
    let diagnostics = try_run_program("var x = 1;\nprint missing;").unwrap_err();
    assert_snapshot!(diagnostics[0].to_human_string(), @r###"
    error[RL0402]: Undefined variable 'missing'
      --> line 2, column 18
    "###);
}

#[test]
fn human_format_for_a_resolver_error() {
    let diagnostics = static_diagnostics("return 1;");
    assert_snapshot!(diagnostics[0].to_human_string(), @r###"
    error[RL0303]: Can't return from top-level code
      --> line 1, column 1
    "###);
}

#[test]
fn human_format_for_an_unused_variable_warning() {
    let diagnostics = static_diagnostics("{ var lonely = 1; }");
    assert_snapshot!(diagnostics[0].to_human_string(), @r###"
    warning[RL0390]: Unused local variable 'lonely'
      --> line 1, column 7
    "###);
}

#[test]
fn diagnostics_serialize_to_json() {
    let diagnostics = static_diagnostics("break;");
    let json = diagnostics[0].to_json().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["code"], "RL0305");
    assert_eq!(parsed["level"], "error");
    assert_eq!(parsed["line"], 1);
}

#[test]
fn runtime_error_spans_point_at_the_site() {
    let diagnostics = try_run_program("var a = 10;\nvar b = a + nil;").unwrap_err();
    assert_eq!(diagnostics[0].code, "RL0401");
    assert_eq!(diagnostics[0].line, 2);
}
