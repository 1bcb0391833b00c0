mod common;
use common::*;
use expect_test::expect;

// Block matching
#[test]
fn test_nested_blocks_are_clean() {
    check_clean(
        r#"<ul>
@if(user)
  @each(item in items)
    <li>{{ item.name }}</li>
  @end
@else
  <li>{{ fallback }}</li>
@end
</ul>"#,
    );
}

#[test]
fn test_sequential_blocks_are_clean() {
    check_clean("@if(user)\nHello\n@end\n@each(item in items)\n{{ item }}\n@end");
}

#[test]
fn test_unclosed_if_reports_missing_end_at_opener() {
    let diagnostics = diagnostics("@if(x)\nbody\n");
    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.code, DiagnosticCode::MissingEnd);
    assert_eq!(diagnostic.severity, DiagnosticSeverity::Error);
    assert_eq!(diagnostic.range.start, Position::new(0, 0));
    assert_eq!(diagnostic.range.end, Position::new(0, 6));
    assert_eq!(diagnostic.source, "stencil");
}

#[test]
fn test_bare_end_is_unmatched() {
    expect![[r#"
        1:1-1:5 error[E103]: `@end` without matching block directive
    "#]]
    .assert_eq(&render("@end"));
}

#[test]
fn test_generic_end_pops_innermost_block() {
    expect![[r#"
        1:1-1:10 error[E105]: `@if` directive missing its matching `@end`
    "#]]
    .assert_eq(&render(
        "@if(user)\nHello\n@each(item in items)\n{{ item }}\n@end",
    ));
}

#[test]
fn test_typed_end_removes_nearest_frame_of_its_type() {
    check_clean("@if(a)\n@each(x in y)\n@endif\n@end");
    check_clean("@section('main')\n@if(a)\n@endif\n@endsection");
}

#[test]
fn test_typed_end_without_opener() {
    expect![[r#"
        2:1-2:9 error[E104]: `@endeach` without matching `@each` directive
        1:1-1:7 error[E105]: `@if` directive missing its matching `@end`
    "#]]
    .assert_eq(&render("@if(a)\n@endeach\n"));
}

#[test]
fn test_missing_ends_reported_in_push_order_after_others() {
    assert_eq!(
        codes("@if(a)\n@each(x in y)\n{{ }}\n"),
        vec![
            DiagnosticCode::EmptyInterpolation,
            DiagnosticCode::MissingEnd,
            DiagnosticCode::MissingEnd,
        ]
    );
    let diagnostics = diagnostics("@if(a)\n@each(x in y)\n");
    assert_eq!(diagnostics[0].range.start.line, 0);
    assert_eq!(diagnostics[1].range.start.line, 1);
}

#[test]
fn test_self_closing_form_never_opens_a_block() {
    check_clean("@!component('modal', { title: 'Hi' })\n<p>after</p>");
}

#[test]
fn test_inline_and_unknown_directives_are_inert() {
    check_clean("@set('x', 1)\n@debugger\n@custom(thing)\n@else\nmail user@example.com");
}

// Directive arguments
#[test]
fn test_condition_required() {
    expect![[r#"
        1:1-1:6 error[E101]: `@if` directive missing condition
    "#]]
    .assert_eq(&render("@if()\n@end"));
    assert_eq!(codes("@unless\n@end"), vec![DiagnosticCode::MissingCondition]);
    assert_eq!(codes("@elseif(  )"), vec![DiagnosticCode::MissingCondition]);
}

#[test]
fn test_loop_requires_in_keyword() {
    expect![[r#"
        1:1-1:13 error[E102]: `@each` directive missing `in` keyword
    "#]]
    .assert_eq(&render("@each(items)\n@end"));
    assert_eq!(codes("@each()\n@end"), vec![DiagnosticCode::MissingCondition]);
    check_clean("@each((item, index) in items)\n@end");
}

#[test]
fn test_component_and_slot_names() {
    expect![[r#"
        1:1-1:19 warning[W101]: `@component` name `1bad` is not a valid identifier
    "#]]
    .assert_eq(&render("@component('1bad')\n@end"));
    assert_eq!(codes("@slot('1bad')\n@end"), vec![DiagnosticCode::InvalidName]);
    check_clean("@component('goodName.sub-1')\n@end");
    assert_eq!(
        codes("@slot('main.sub')\n@end"),
        vec![DiagnosticCode::InvalidName]
    );
    check_clean("@slot('main-area_2')\n@end");
}

#[test]
fn test_relative_include_path() {
    expect![[r#"
        1:1-1:28 warning[W103]: Avoid relative paths in includes
    "#]]
    .assert_eq(&render("@include('../partials/nav')"));
    check_clean("@include('partials/nav')");
    assert_eq!(
        codes("@includeIf(show, '../x')"),
        vec![DiagnosticCode::RelativeInclude]
    );
}

// Interpolations
#[test]
fn test_empty_interpolation() {
    expect![[r#"
        1:1-1:6 warning[W102]: Empty interpolation
    "#]]
    .assert_eq(&render("{{ }}"));
    assert_eq!(codes("{{{}}}"), vec![DiagnosticCode::EmptyInterpolation]);
    check_clean("{{ x }}");
    check_clean("@{{ }}");
}

// Syntax errors
#[test]
fn test_error_nodes_become_syntax_errors() {
    expect![[r#"
        1:1-1:5 error[E001]: Syntax error
    "#]]
    .assert_eq(&render("{{ a"));
    assert_eq!(
        codes("@if(user\n"),
        vec![DiagnosticCode::SyntaxError, DiagnosticCode::MissingEnd]
    );
}

#[test]
fn test_traversal_continues_after_syntax_error() {
    assert_eq!(codes("{{-- open\n@end"), vec![DiagnosticCode::SyntaxError]);
    assert_eq!(
        codes("{{ a\n@if(x)\n@end\n{{ }}"),
        vec![DiagnosticCode::SyntaxError, DiagnosticCode::EmptyInterpolation]
    );
}
