//! Property-based tests for indentation handling
//!
//! Sources are generated from random module trees, rendered with a 4-space indentation
//! unit, so the expected block structure is known up front.

use proptest::prelude::*;
use yapl::yapl::grammar::Grammar;
use yapl::yapl::token::Token;
use yapl::yapl::{parse_with, Block, ErrorKind, Module, ParseOptions, Program, Statement};

#[derive(Debug, Clone)]
struct Node {
    name: String,
    comment: Option<String>,
    children: Vec<Node>,
}

impl Node {
    fn opens_block(&self) -> bool {
        self.comment.is_some() || !self.children.is_empty()
    }

    fn render(&self, depth: usize, lines: &mut Vec<String>) {
        let indent = "    ".repeat(depth);
        let colon = if self.opens_block() { ":" } else { "" };
        lines.push(format!("{}module {}{}", indent, self.name, colon));
        if let Some(comment) = &self.comment {
            lines.push(format!("{}    ;{}", indent, comment));
        }
        for child in &self.children {
            child.render(depth + 1, lines);
        }
    }

    fn expected(&self) -> Statement {
        let body = self.opens_block().then(|| Block {
            comment: self.comment.clone(),
            statements: self.children.iter().map(Node::expected).collect(),
            location: None,
        });
        Statement::Module(Module {
            name: self.name.clone(),
            body,
            location: None,
        })
    }

    fn blocks(&self) -> usize {
        usize::from(self.opens_block()) + self.children.iter().map(Node::blocks).sum::<usize>()
    }
}

fn render(nodes: &[Node]) -> String {
    let mut lines = Vec::new();
    for node in nodes {
        node.render(0, &mut lines);
    }
    lines.push("@@EOF@@".to_string());
    lines.join("\n")
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,4}(\\.[a-z][a-z0-9_]{0,4}){1,2}"
}

fn comment_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,6}( [a-z]{1,6}){0,2}"
}

fn node_strategy() -> impl Strategy<Value = Node> {
    let leaf = (name_strategy(), proptest::option::of(comment_strategy())).prop_map(
        |(name, comment)| Node {
            name,
            comment,
            children: Vec::new(),
        },
    );
    leaf.prop_recursive(4, 32, 3, |inner| {
        (
            name_strategy(),
            proptest::option::of(comment_strategy()),
            prop::collection::vec(inner, 1..4),
        )
            .prop_map(|(name, comment, children)| Node {
                name,
                comment,
                children,
            })
    })
}

fn forest_strategy() -> impl Strategy<Value = Vec<Node>> {
    prop::collection::vec(node_strategy(), 1..4)
}

fn kind_names(source: &str) -> Vec<String> {
    let grammar = Grammar::yapl();
    let tokens: Vec<Token> = grammar.tokenize(source).expect("source to lex");
    tokens
        .iter()
        .map(|t| grammar.tables().symbol_name(t.kind).unwrap_or("?").to_string())
        .collect()
}

/// `depth` nested blocks, then a line back at column 0.
fn nested_then_top_level(depth: usize) -> String {
    let mut lines = Vec::new();
    for level in 0..=depth {
        let colon = if level < depth { ":" } else { "" };
        lines.push(format!("{}module m{}.x{}", "    ".repeat(level), level, colon));
    }
    lines.push("module top.level".to_string());
    lines.push("@@EOF@@".to_string());
    lines.join("\n")
}

proptest! {
    #[test]
    fn test_block_opens_match_block_closes(nodes in forest_strategy()) {
        let kinds = kind_names(&render(&nodes));
        let opens = kinds.iter().filter(|k| *k == "INDENT").count();
        let closes = kinds.iter().filter(|k| *k == "DEDENT").count();
        let expected: usize = nodes.iter().map(Node::blocks).sum();
        prop_assert_eq!(opens, expected);
        prop_assert_eq!(closes, expected);
    }

    #[test]
    fn test_generated_trees_parse_back(nodes in forest_strategy()) {
        let source = render(&nodes);
        let parsed = parse_with(&source, ParseOptions { capture_locations: false });
        let expected = Program {
            statements: nodes.iter().map(Node::expected).collect(),
            location: None,
        };
        prop_assert_eq!(parsed, Ok(expected));
    }

    #[test]
    fn test_multi_level_dedent_is_one_batch(depth in 1usize..6) {
        let kinds = kind_names(&nested_then_top_level(depth));
        // the innermost module is followed by exactly `depth` closes and one separator
        let innermost = kinds
            .iter()
            .rposition(|k| k == "DOT_DELIMITED_IDENTIFIER")
            .and_then(|last| kinds[..last].iter().rposition(|k| k == "DOT_DELIMITED_IDENTIFIER"))
            .expect("two module names");
        let mut expected = vec!["DEDENT".to_string(); depth];
        expected.push("NL".to_string());
        expected.push("KEYWORD_MODULE".to_string());
        prop_assert_eq!(&kinds[innermost + 1..innermost + depth + 3], &expected[..]);
    }

    #[test]
    fn test_block_not_deeper_always_fails(depth in 0usize..5, back in 0usize..5) {
        let width = depth.saturating_sub(back);
        let mut lines = Vec::new();
        for level in 0..=depth {
            lines.push(format!("{}module m{}.x:", "    ".repeat(level), level));
        }
        lines.push(format!("{}module bad.block", "    ".repeat(width)));
        lines.push("@@EOF@@".to_string());
        let err = parse_with(&lines.join("\n"), ParseOptions::default()).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Indentation);
    }
}
