use serde::{Deserialize, Serialize};

use crate::Span;

/// A single match in the input.
#[derive(Debug, Clone, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// The underlying match span.
    span: Span,
    /// The matched substring.
    text: String,
}

impl Match {
    /// Create a new match.
    pub(crate) fn new(span: Span, text: String) -> Self {
        Self { span, text }
    }

    /// Get the start of the match.
    #[inline]
    pub fn start(&self) -> usize {
        self.span.start
    }

    /// Get the end of the match.
    #[inline]
    pub fn end(&self) -> usize {
        self.span.end
    }

    /// Get the span of the match.
    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the matched substring.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the length of the match.
    #[inline]
    pub fn len(&self) -> usize {
        self.span.len()
    }

    /// Check if the match is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }
}

/// The outcome of a match operation.
///
/// For `find_all` the individual matches are available via
/// [MatchResult::matches]; the top-level span and text then describe the
/// first match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    matched: bool,
    span: Option<Span>,
    text: Option<String>,
    work_units: u64,
    elapsed_ms: f64,
    matches: Vec<Match>,
}

impl MatchResult {
    pub(crate) fn no_match(work_units: u64, elapsed_ms: f64) -> Self {
        Self {
            matched: false,
            span: None,
            text: None,
            work_units,
            elapsed_ms,
            matches: Vec::new(),
        }
    }

    pub(crate) fn hit(span: Span, text: String, work_units: u64, elapsed_ms: f64) -> Self {
        Self {
            matched: true,
            span: Some(span),
            text: Some(text),
            work_units,
            elapsed_ms,
            matches: Vec::new(),
        }
    }

    pub(crate) fn hits(matches: Vec<Match>, work_units: u64, elapsed_ms: f64) -> Self {
        let span = matches.first().map(|m| m.span());
        let text = matches.first().map(|m| m.text().to_string());
        Self {
            matched: !matches.is_empty(),
            span,
            text,
            work_units,
            elapsed_ms,
            matches,
        }
    }

    /// Whether the operation found a match.
    #[inline]
    pub fn matched(&self) -> bool {
        self.matched
    }

    /// The start index of the match in code points, or -1 if unmatched.
    #[inline]
    pub fn start(&self) -> isize {
        self.span.map_or(-1, |s| s.start as isize)
    }

    /// The end index of the match in code points (exclusive), or -1 if
    /// unmatched.
    #[inline]
    pub fn end(&self) -> isize {
        self.span.map_or(-1, |s| s.end as isize)
    }

    /// The span of the match, if any.
    #[inline]
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// The matched substring, if any.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The matcher-specific work counter: backtracks for the backtracking
    /// matcher, state visits plus ε-edges for the NFA matcher, transitions
    /// for the DFA matcher.
    #[inline]
    pub fn work_units(&self) -> u64 {
        self.work_units
    }

    /// Wall-clock time spent matching, in milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// The ordered list of matches found by `find_all`.
    #[inline]
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }
}

/// The outcome of a replace operation.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReplaceResult {
    text: String,
    count: usize,
}

impl ReplaceResult {
    pub(crate) fn new(text: String, count: usize) -> Self {
        Self { text, count }
    }

    /// The input with every match replaced.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The number of replacements performed.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Consume the result and return the replaced text.
    #[inline]
    pub fn into_text(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_reports_negative_indices() {
        let result = MatchResult::no_match(7, 0.5);
        assert!(!result.matched());
        assert_eq!(result.start(), -1);
        assert_eq!(result.end(), -1);
        assert_eq!(result.text(), None);
        assert_eq!(result.work_units(), 7);
        assert!(result.matches().is_empty());
    }

    #[test]
    fn test_hits_expose_the_first_match() {
        let matches = vec![
            Match::new(Span::new(2, 5), "abc".to_string()),
            Match::new(Span::new(7, 8), "x".to_string()),
        ];
        let result = MatchResult::hits(matches, 3, 0.1);
        assert!(result.matched());
        assert_eq!((result.start(), result.end()), (2, 5));
        assert_eq!(result.text(), Some("abc"));
        assert_eq!(result.matches().len(), 2);
    }

    #[test]
    fn test_empty_hit_list_is_a_no_match() {
        let result = MatchResult::hits(Vec::new(), 0, 0.0);
        assert!(!result.matched());
        assert_eq!(result.start(), -1);
    }

    #[test]
    fn test_match_accessors() {
        let m = Match::new(Span::new(4, 4), String::new());
        assert!(m.is_empty());
        assert_eq!(m.len(), 0);
        let m = Match::new(Span::new(1, 3), "αβ".to_string());
        assert_eq!(m.len(), 2);
        assert_eq!(m.span().range(), 1..3);
    }
}
