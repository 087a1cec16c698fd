use crate::internal::Ast;

/// A compiled pattern: the verbatim pattern string, its AST and compile-time
/// diagnostics.
///
/// Compiled patterns are immutable and cheap to share between operations.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPattern {
    pattern: String,
    pub(crate) ast: Ast,
    compile_ms: f64,
    pretty: String,
}

impl CompiledPattern {
    pub(crate) fn new(pattern: String, ast: Ast, compile_ms: f64) -> Self {
        let pretty = ast.pretty();
        Self {
            pattern,
            ast,
            compile_ms,
            pretty,
        }
    }

    /// The verbatim pattern string.
    #[inline]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Wall-clock time spent compiling, in milliseconds.
    #[inline]
    pub fn compile_ms(&self) -> f64 {
        self.compile_ms
    }

    /// An indented diagnostic rendering of the AST.
    #[inline]
    pub fn pretty(&self) -> &str {
        &self.pretty
    }
}

impl std::fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pattern.escape_default())
    }
}
