//! End-to-end parses of yapl sources
//!
//! Each test feeds a complete source (already terminated with the end-of-input marker)
//! through the shared grammar and checks the resulting tree or error.

use rstest::rstest;
use yapl::yapl::error::Excerpt;
use yapl::yapl::token::Span;
use yapl::yapl::{
    parse, parse_with, Block, ErrorKind, IndentationError, Module, ParseError, ParseOptions,
    Program, Statement,
};

const NO_LOCATIONS: ParseOptions = ParseOptions {
    capture_locations: false,
};

fn module(name: &str, body: Option<Block>) -> Statement {
    Statement::Module(Module {
        name: name.to_string(),
        body,
        location: None,
    })
}

fn block(comment: Option<&str>, statements: Vec<Statement>) -> Option<Block> {
    Some(Block {
        comment: comment.map(str::to_string),
        statements,
        location: None,
    })
}

fn program(statements: Vec<Statement>) -> Program {
    Program {
        statements,
        location: None,
    }
}

#[test]
fn test_single_dotted_module() {
    let parsed = parse("module a.b.c\n@@EOF@@").unwrap();
    assert_eq!(parsed.statements.len(), 1);
    let module = parsed.modules().next().unwrap();
    assert_eq!(module.name, "a.b.c");
    assert_eq!(module.body, None);
    // without a block the module covers its keyword only
    assert_eq!(module.location, Some(Span::new(0, 6, 1, 1, 0, 6)));
    assert_eq!(parsed.location, Some(Span::new(0, 20, 1, 2, 0, 7)));
}

#[test]
fn test_block_with_only_a_comment() {
    let parsed = parse("module a.b:\n    ;comment here\n@@EOF@@").unwrap();
    let module = parsed.modules().next().unwrap();
    let body = module.body.as_ref().unwrap();
    assert_eq!(body.comment.as_deref(), Some("comment here"));
    assert!(body.statements.is_empty());
    assert_eq!(body.location, Some(Span::new(10, 37, 1, 3, 10, 7)));
    assert_eq!(module.location, Some(Span::new(0, 37, 1, 3, 0, 7)));
}

#[test]
fn test_blank_line_between_siblings() {
    let parsed = parse_with("module a.b\n\nmodule c.d\n@@EOF@@", NO_LOCATIONS).unwrap();
    assert_eq!(
        parsed,
        program(vec![module("a.b", None), module("c.d", None)])
    );
}

#[test]
fn test_reopening_block_shallower_than_unit() {
    let source = "module a.b:\n    module x.y\nmodule c.d:\n  module e.f\n@@EOF@@";
    let err = parse(source).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Indentation);
    assert_eq!(
        err,
        ParseError::Indentation(IndentationError::NotDeeper {
            found: 0,
            enclosing: 0,
            line: 4
        })
    );
}

#[test]
fn test_stray_punctuation() {
    let err = parse("module ?\n@@EOF@@").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedCharacter {
            character: '?',
            line: 1,
            column: 7,
            excerpt: Some(Excerpt {
                source_line: "module ?".to_string(),
                column: 7
            }),
        }
    );
    assert_eq!(
        err.to_string(),
        "\n\nmodule ?\n       ^\nUnexpected token: \"?\" at 1:7."
    );
}

#[test]
fn test_keyword_without_name() {
    let err = parse("module\n@@EOF@@").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(
        err,
        ParseError::UnexpectedToken {
            text: "\n@@EOF@@".to_string(),
            line: 1,
            column: 6,
            expected: vec!["DOT_DELIMITED_IDENTIFIER".to_string()],
            excerpt: Some(Excerpt {
                source_line: "module".to_string(),
                column: 6
            }),
        }
    );
    assert!(err
        .to_string()
        .ends_with(r#"Unexpected token: "\n@@EOF@@" at 1:6. Expected one of: DOT_DELIMITED_IDENTIFIER."#));
}

#[test]
fn test_nested_blocks() {
    let source = "\
module a.b:
    ;doc
    module c.d:
        module e.f
    module g.h
module i.j
@@EOF@@";
    let parsed = parse_with(source, NO_LOCATIONS).unwrap();
    assert_eq!(
        parsed,
        program(vec![
            module(
                "a.b",
                block(
                    Some("doc"),
                    vec![
                        module("c.d", block(None, vec![module("e.f", None)])),
                        module("g.h", None),
                    ]
                )
            ),
            module("i.j", None),
        ])
    );
}

#[rstest]
#[case::trailing_line_break("module a.b\n\n@@EOF@@", &["a.b"])]
#[case::three_siblings("module a.b\nmodule c.d\nmodule e.f\n@@EOF@@", &["a.b", "c.d", "e.f"])]
#[case::block_then_sibling("module a.b:\n    module c.d\nmodule e.f\n@@EOF@@", &["a.b", "e.f"])]
#[case::block_at_end("module a.b:\n    module c.d:\n        ;deep\n@@EOF@@", &["a.b"])]
#[case::extra_spaces("module   a.b  \nmodule c.d\n@@EOF@@", &["a.b", "c.d"])]
#[case::wide_unit("module a.b:\n        module c.d\n@@EOF@@", &["a.b"])]
fn test_top_level_names(#[case] source: &str, #[case] names: &[&str]) {
    let parsed = parse(source).unwrap();
    let found: Vec<&str> = parsed.modules().map(|m| m.name.as_str()).collect();
    assert_eq!(found, names);
}

#[rstest]
#[case::unknown_character("module a.b\nmodule c.d!\n@@EOF@@", ErrorKind::Lexical)]
#[case::indent_without_block("module a.b\n    module c.d\n@@EOF@@", ErrorKind::Indentation)]
#[case::block_not_deeper("module a.b:\nmodule c.d\n@@EOF@@", ErrorKind::Indentation)]
#[case::not_a_multiple("module a.b:\n        module c.d:\n            module e.f\n@@EOF@@", ErrorKind::Indentation)]
#[case::skipped_level("module a.b:\n    module c.d:\n            module e.f\n@@EOF@@", ErrorKind::Indentation)]
#[case::plain_identifier("module a\n@@EOF@@", ErrorKind::Syntax)]
#[case::missing_marker("module a.b\n", ErrorKind::Syntax)]
#[case::empty_block_body("module a.b:\n    \n@@EOF@@", ErrorKind::Syntax)]
#[case::partial_dedent("module a.b:\n        module c.d\n    module e.f\n@@EOF@@", ErrorKind::Internal)]
fn test_error_kinds(#[case] source: &str, #[case] kind: ErrorKind) {
    let err = parse(source).unwrap_err();
    assert_eq!(err.kind(), kind, "{}", err);
}

#[test]
fn test_missing_marker_is_end_of_input() {
    assert_eq!(
        parse("module a.b\n").unwrap_err(),
        ParseError::UnexpectedEndOfInput
    );
    insta::assert_snapshot!(ParseError::UnexpectedEndOfInput.to_string(), @"Unexpected end of input.");
}

#[test]
fn test_every_node_has_a_location() {
    let parsed = parse("module a.b:\n    module c.d\n@@EOF@@").unwrap();
    assert!(parsed.location.is_some());
    let outer = parsed.modules().next().unwrap();
    assert!(outer.location.is_some());
    let body = outer.body.as_ref().unwrap();
    assert!(body.location.is_some());
    match &body.statements[0] {
        Statement::Module(inner) => {
            assert_eq!(inner.location, Some(Span::new(16, 22, 2, 2, 4, 10)))
        }
    }
}
