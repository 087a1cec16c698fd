use serde::{Deserialize, Serialize};

/// The matching strategy used to run an operation.
///
/// All three strategies agree on `match_full`. For `find`, the backtracking
/// matcher implements leftmost-first semantics while the NFA and DFA
/// matchers implement leftmost-longest, so they may report different end
/// positions for patterns like `(a|ab)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Engine {
    /// Continuation-passing backtracker over the AST, with a bounded
    /// backtrack budget. Leftmost-first `find`.
    #[default]
    Backtracking,
    /// Multi-state NFA simulation with ε-closure. Linear in the input,
    /// leftmost-longest `find`.
    Nfa,
    /// Lazily constructed subset-construction DFA. Amortized linear,
    /// leftmost-longest `find`.
    Dfa,
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Engine::Backtracking => write!(f, "backtracking"),
            Engine::Nfa => write!(f, "nfa"),
            Engine::Dfa => write!(f, "dfa"),
        }
    }
}
