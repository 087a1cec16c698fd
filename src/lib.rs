#![forbid(missing_docs)]
//! # `rgx`
//! The `rgx` crate is a small regular-expression engine with three
//! interchangeable matching strategies: a continuation-passing
//! backtracker with a bounded backtrack budget, a multi-state NFA
//! simulation and a lazily constructed subset-construction DFA.
//! Patterns are compiled through a hand-written lexer and
//! recursive-descent parser into an AST, which is translated to an NFA
//! with Thompson's construction; the lazy DFA grows on top of the NFA
//! during matching.
//! Compiled patterns are kept in a bounded cache keyed by the verbatim
//! pattern string, and every operation runs under a wall-clock budget.
//!
//! ```
//! use rgx::{Engine, Rgx};
//!
//! let rgx = Rgx::new();
//! let result = rgx.find("[0-9]+", "abc 123 def", Engine::Backtracking).unwrap();
//! assert_eq!(result.text(), Some("123"));
//! assert_eq!((result.start(), result.end()), (4, 7));
//! ```

/// Module that provides the compiled pattern artifact.
mod compiled_pattern;
pub use compiled_pattern::CompiledPattern;

/// Module with the engine configuration.
mod config;
pub use config::EngineConfig;

/// Module with the engine selector.
mod engine;
pub use engine::Engine;

/// Module with error definitions.
mod errors;
pub use errors::{Result, RgxError, RgxErrorKind};

/// The module with internal implementation details.
mod internal;

/// Module that provides the match result types.
mod match_types;
pub use match_types::{Match, MatchResult, ReplaceResult};

/// The module with the matching façade.
mod rgx;
pub use rgx::Rgx;

/// The module with the façade builder.
mod rgx_builder;
pub use rgx_builder::RgxBuilder;

/// Module that provides a span type.
mod span;
pub use span::Span;
