//! Lexical rules
//!
//!     A lexical grammar is an ordered list of regex rules. At every cursor position the
//!     rules active in the current mode are tried top to bottom and the first one that
//!     matches wins, so a rule listed earlier shadows any later rule that would match the
//!     same text (keywords before identifiers, dotted identifiers before plain ones).
//!     Longest match is only guaranteed within a single rule's own pattern.
//!
//!     Rules are written against terminal names and compiled against a set of grammar
//!     tables, which resolves every name to the symbol id the parsing tables use. The
//!     structural terminals synthesized from indentation (block-open, block-close and the
//!     line separator) are named on the builder, and only need to exist in the tables when
//!     the rule set measures indentation or closes blocks at end of input.
//!
//!     Rules that drive indentation must capture the indentation run as group 1:
//!
//!         :\n((    )*)        block-open, width = length of group 1
//!         \n((    )*)         line break, width = length of group 1

use regex::Regex;

use crate::yapl::error::GrammarError;
use crate::yapl::parsing::GrammarTables;
use crate::yapl::token::SymbolId;

/// The mode every lexer starts in, and the one rules belong to by default.
pub const INITIAL: &str = "INITIAL";

/// What happens when a rule matches. `K` is a terminal name before compilation and a
/// [`SymbolId`] after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction<K> {
    /// Emit a token of this kind carrying the matched text.
    Emit(K),
    /// Emit a token whose text drops the first `prefix` bytes of the match.
    EmitStripped { kind: K, prefix: usize },
    /// The caller-appended end-of-input sentinel. Closes every open block first.
    EndOfInput(K),
    /// Open a block at the width captured by group 1.
    BlockOpen,
    /// Separate lines, or close blocks, depending on the width captured by group 1.
    LineBreak,
    /// Consume the match without producing a token.
    Skip,
}

impl<K> RuleAction<K> {
    fn measures_indentation(&self) -> bool {
        matches!(self, RuleAction::BlockOpen | RuleAction::LineBreak)
    }

    fn is_structural(&self) -> bool {
        matches!(
            self,
            RuleAction::BlockOpen | RuleAction::LineBreak | RuleAction::EndOfInput(_)
        )
    }

    fn map<T>(self, f: impl Fn(K) -> T) -> RuleAction<T> {
        match self.try_map(|kind| Ok::<T, std::convert::Infallible>(f(kind))) {
            Ok(action) => action,
            Err(never) => match never {},
        }
    }

    fn try_map<T, E>(self, f: impl Fn(K) -> Result<T, E>) -> Result<RuleAction<T>, E> {
        Ok(match self {
            RuleAction::Emit(kind) => RuleAction::Emit(f(kind)?),
            RuleAction::EmitStripped { kind, prefix } => RuleAction::EmitStripped {
                kind: f(kind)?,
                prefix,
            },
            RuleAction::EndOfInput(kind) => RuleAction::EndOfInput(f(kind)?),
            RuleAction::BlockOpen => RuleAction::BlockOpen,
            RuleAction::LineBreak => RuleAction::LineBreak,
            RuleAction::Skip => RuleAction::Skip,
        })
    }
}

/// A compiled rule.
#[derive(Debug, Clone)]
pub struct LexRule {
    pattern: String,
    regex: Regex,
    action: RuleAction<SymbolId>,
    modes: Vec<String>,
}

impl LexRule {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn action(&self) -> &RuleAction<SymbolId> {
        &self.action
    }

    pub fn is_active_in(&self, mode: &str) -> bool {
        self.modes.iter().any(|m| m == mode)
    }
}

/// Symbol ids of the terminals the lexer synthesizes from indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuralTerminals {
    pub indent: SymbolId,
    pub dedent: SymbolId,
    pub newline: SymbolId,
}

/// An ordered, compiled rule set. Immutable and shareable across lexers.
#[derive(Debug, Clone)]
pub struct LexicalGrammar {
    rules: Vec<LexRule>,
    structural: Option<StructuralTerminals>,
    end: SymbolId,
}

impl LexicalGrammar {
    pub fn builder() -> LexicalGrammarBuilder {
        LexicalGrammarBuilder::default()
    }

    pub fn rules(&self) -> &[LexRule] {
        &self.rules
    }

    /// Rules active in `mode`, in priority order.
    pub fn rules_for<'a>(&'a self, mode: &'a str) -> impl Iterator<Item = &'a LexRule> + 'a {
        self.rules.iter().filter(move |rule| rule.is_active_in(mode))
    }

    /// Structural terminal ids, present whenever a rule depends on them.
    pub fn structural(&self) -> Option<StructuralTerminals> {
        self.structural
    }

    /// Kind of the token returned once the cursor reaches the end of the text.
    pub fn end_symbol(&self) -> SymbolId {
        self.end
    }
}

#[derive(Debug, Clone)]
struct RuleSpec {
    pattern: String,
    action: RuleAction<String>,
    modes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LexicalGrammarBuilder {
    rules: Vec<RuleSpec>,
    indent: String,
    dedent: String,
    newline: String,
}

impl Default for LexicalGrammarBuilder {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            indent: "INDENT".to_string(),
            dedent: "DEDENT".to_string(),
            newline: "NL".to_string(),
        }
    }
}

impl LexicalGrammarBuilder {
    /// Append a rule active in the initial mode.
    pub fn rule(self, pattern: &str, action: RuleAction<&str>) -> Self {
        self.rule_in(&[INITIAL], pattern, action)
    }

    /// Append a rule active only in the given modes.
    pub fn rule_in(mut self, modes: &[&str], pattern: &str, action: RuleAction<&str>) -> Self {
        self.rules.push(RuleSpec {
            pattern: pattern.to_string(),
            action: action.map(str::to_string),
            modes: modes.iter().map(|m| m.to_string()).collect(),
        });
        self
    }

    /// Name the terminals used for block-open, block-close and line separators.
    pub fn structural(mut self, indent: &str, dedent: &str, newline: &str) -> Self {
        self.indent = indent.to_string();
        self.dedent = dedent.to_string();
        self.newline = newline.to_string();
        self
    }

    /// Compile every pattern and resolve terminal names against `tables`.
    pub fn compile(self, tables: &GrammarTables) -> Result<LexicalGrammar, GrammarError> {
        let resolve = |name: String| {
            tables
                .terminal(&name)
                .ok_or(GrammarError::UnknownTerminal(name))
        };

        let structural = if self.rules.iter().any(|spec| spec.action.is_structural()) {
            Some(StructuralTerminals {
                indent: resolve(self.indent)?,
                dedent: resolve(self.dedent)?,
                newline: resolve(self.newline)?,
            })
        } else {
            None
        };

        let mut rules = Vec::with_capacity(self.rules.len());
        for spec in self.rules {
            let regex = Regex::new(&format!("^(?:{})", spec.pattern)).map_err(|err| {
                GrammarError::InvalidPattern {
                    pattern: spec.pattern.clone(),
                    message: err.to_string(),
                }
            })?;
            if spec.action.measures_indentation() && regex.captures_len() < 2 {
                return Err(GrammarError::MissingIndentGroup {
                    pattern: spec.pattern,
                });
            }
            rules.push(LexRule {
                action: spec.action.try_map(&resolve)?,
                pattern: spec.pattern,
                regex,
                modes: spec.modes,
            });
        }

        Ok(LexicalGrammar {
            rules,
            structural,
            end: tables.end_symbol(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> GrammarTables {
        GrammarTables::from_json(
            r#"{
                "tokens": {"NL": 1, "INDENT": 2, "DEDENT": 3, "WORD": 4, "$": 5},
                "productions": [[-1, 1]],
                "table": [{"5": "acc"}]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_compile_resolves_names() {
        let grammar = LexicalGrammar::builder()
            .rule("[a-z]+", RuleAction::Emit("WORD"))
            .rule(r"\n((    )*)", RuleAction::LineBreak)
            .compile(&tables())
            .unwrap();
        assert_eq!(grammar.rules().len(), 2);
        assert_eq!(grammar.rules()[0].action(), &RuleAction::Emit(4));
        assert_eq!(
            grammar.structural(),
            Some(StructuralTerminals {
                indent: 2,
                dedent: 3,
                newline: 1
            })
        );
        assert_eq!(grammar.end_symbol(), 5);
    }

    #[test]
    fn test_patterns_are_anchored() {
        let grammar = LexicalGrammar::builder()
            .rule("[a-z]+", RuleAction::Emit("WORD"))
            .compile(&tables())
            .unwrap();
        let regex = grammar.rules()[0].regex();
        assert!(regex.is_match("abc def"));
        assert!(!regex.is_match(" abc"));
    }

    #[test]
    fn test_unknown_terminal() {
        let err = LexicalGrammar::builder()
            .rule("[0-9]+", RuleAction::Emit("NUMBER"))
            .compile(&tables())
            .unwrap_err();
        assert_eq!(err, GrammarError::UnknownTerminal("NUMBER".to_string()));

        let err = LexicalGrammar::builder()
            .rule(r"\n((    )*)", RuleAction::LineBreak)
            .structural("BEGIN", "DEDENT", "NL")
            .compile(&tables())
            .unwrap_err();
        assert_eq!(err, GrammarError::UnknownTerminal("BEGIN".to_string()));
    }

    #[test]
    fn test_structural_terminals_only_when_needed() {
        let grammar = LexicalGrammar::builder()
            .rule("[a-z]+", RuleAction::Emit("WORD"))
            .structural("BEGIN", "END", "SEP")
            .compile(&tables())
            .unwrap();
        assert_eq!(grammar.structural(), None);
    }

    #[test]
    fn test_indentation_rule_needs_a_group() {
        let err = LexicalGrammar::builder()
            .rule(r"\n +", RuleAction::LineBreak)
            .compile(&tables())
            .unwrap_err();
        assert!(matches!(err, GrammarError::MissingIndentGroup { .. }));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = LexicalGrammar::builder()
            .rule("[a-z", RuleAction::Emit("WORD"))
            .compile(&tables())
            .unwrap_err();
        assert!(matches!(err, GrammarError::InvalidPattern { .. }));
    }

    #[test]
    fn test_modes_filter_rules() {
        let grammar = LexicalGrammar::builder()
            .rule("[a-z]+", RuleAction::Emit("WORD"))
            .rule_in(&["raw"], ".+", RuleAction::Emit("WORD"))
            .rule_in(&[INITIAL, "raw"], r"\s+", RuleAction::Skip)
            .compile(&tables())
            .unwrap();
        let initial: Vec<_> = grammar.rules_for(INITIAL).map(LexRule::pattern).collect();
        let raw: Vec<_> = grammar.rules_for("raw").map(LexRule::pattern).collect();
        assert_eq!(initial, vec!["[a-z]+", r"\s+"]);
        assert_eq!(raw, vec![".+", r"\s+"]);
    }
}
