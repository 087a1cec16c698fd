/// Module that provides the AST type.
mod ast;
pub(crate) use ast::Ast;

/// Module that provides the backtracking matcher.
mod backtracker;
pub(crate) use backtracker::Backtracker;

/// Module with the per-operation run budget.
mod budget;
pub(crate) use budget::{Budget, MatcherRun};

/// Module that provides character predicates for NFA edge labels.
mod char_spec;

/// Module that provides the lazy DFA.
mod dfa;

/// Module that provides the DFA table-walk matcher.
mod dfa_matcher;
pub(crate) use dfa_matcher::DfaMatcher;

/// Module for the automata state ID types.
mod ids;

/// Module that provides the pattern lexer.
mod lexer;

/// Module that provides the NFA and Thompson's construction.
mod nfa;
pub(crate) use nfa::Nfa;

/// Module that provides the NFA simulation matcher.
mod nfa_matcher;
pub(crate) use nfa_matcher::NfaMatcher;

/// Module that provides the pattern parser.
mod parser;
pub(crate) use parser::parse;

/// Module that provides the bounded compiled-pattern cache.
mod pattern_cache;
pub(crate) use pattern_cache::PatternCache;
