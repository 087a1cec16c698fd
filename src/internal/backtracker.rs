//! The backtracking matcher.
//!
//! Matching is continuation-passing over the AST: every node consumes part
//! of the input and hands the reached cursor to its continuation. The
//! cursor travels by value, so a failing continuation automatically leaves
//! the caller free to try the next alternative. Greedy quantifiers are
//! iterative: the greedy phase records the cursor after every advancing
//! iteration, then the continuation is tried from the longest prefix down
//! to the required minimum. The recursion depth is bounded by the pattern
//! size, never by the input length.

use crate::{Result, RgxError, RgxErrorKind, Span};

use super::{
    ast::{Ast, EMPTY_PATTERN},
    budget::{Budget, MatcherRun},
    char_spec::{is_class_whitespace, is_line_terminator},
};

/// The continuation invoked with the cursor a node run has reached.
type Cont<'c> = &'c mut dyn FnMut(&mut RunState, usize) -> Result<bool>;

// Per-run mutable state, separate from the matcher so continuations can
// thread it without borrowing the matcher mutably.
struct RunState {
    backtracks: u64,
}

/// A backtracking matcher bound to one AST.
pub(crate) struct Backtracker<'a> {
    ast: &'a Ast,
    max_backtracks: u64,
    budget: Budget,
}

impl<'a> Backtracker<'a> {
    pub(crate) fn new(ast: &'a Ast, max_backtracks: u64, budget: Budget) -> Self {
        Self {
            ast,
            max_backtracks,
            budget,
        }
    }

    /// Match iff some run of the AST from position 0 consumes the entire
    /// input.
    pub(crate) fn match_full(&self, input: &[char]) -> Result<MatcherRun> {
        let mut st = RunState { backtracks: 0 };
        let len = input.len();
        let matched = self.match_node(
            &mut st,
            self.ast,
            input,
            0,
            &mut |_st: &mut RunState, pos: usize| -> Result<bool> { Ok(pos == len) },
        )?;
        Ok(MatcherRun {
            span: if matched { Some(Span::new(0, len)) } else { None },
            work: st.backtracks,
        })
    }

    /// Leftmost-first search: the first start position with a match wins,
    /// and the end is whatever the first successful run reaches.
    pub(crate) fn find(&self, input: &[char]) -> Result<MatcherRun> {
        let mut st = RunState { backtracks: 0 };
        let span = self.find_from(&mut st, input, 0)?;
        Ok(MatcherRun {
            span,
            work: st.backtracks,
        })
    }

    /// All non-overlapping matches in order of increasing start position.
    pub(crate) fn find_all(&self, input: &[char]) -> Result<(Vec<Span>, u64)> {
        let mut st = RunState { backtracks: 0 };
        let mut spans = Vec::new();
        let mut pos = 0;
        while pos <= input.len() {
            match self.find_from(&mut st, input, pos)? {
                Some(span) => {
                    // A zero-width match advances the search position by
                    // one code point to guarantee progress.
                    pos = span.end.max(span.start + 1);
                    spans.push(span);
                }
                None => break,
            }
        }
        Ok((spans, st.backtracks))
    }

    fn find_from(&self, st: &mut RunState, input: &[char], from: usize) -> Result<Option<Span>> {
        for start in from..=input.len() {
            self.budget.check()?;
            let mut end: Option<usize> = None;
            self.match_node(
                st,
                self.ast,
                input,
                start,
                &mut |_st: &mut RunState, pos: usize| -> Result<bool> {
                    end = Some(pos);
                    Ok(true)
                },
            )?;
            if let Some(end) = end {
                return Ok(Some(Span::new(start, end)));
            }
        }
        Ok(None)
    }

    fn match_node(
        &self,
        st: &mut RunState,
        node: &'a Ast,
        input: &[char],
        pos: usize,
        k: Cont,
    ) -> Result<bool> {
        self.budget.check()?;
        match node {
            Ast::Literal(c) if *c == EMPTY_PATTERN => k(st, pos),
            Ast::Literal(c) | Ast::Escaped(c) => self.match_one(st, input, pos, |x| x == *c, k),
            Ast::Tab => self.match_one(st, input, pos, |x| x == '\t', k),
            Ast::Whitespace => self.match_one(st, input, pos, is_class_whitespace, k),
            Ast::AnyChar => self.match_one(st, input, pos, |x| !is_line_terminator(x), k),
            Ast::CharClass(set) => self.match_one(st, input, pos, |x| set.contains(&x), k),
            Ast::NegatedCharClass(set) => self.match_one(
                st,
                input,
                pos,
                |x| !set.contains(&x) && !is_line_terminator(x),
                k,
            ),
            Ast::Group(child) => self.match_node(st, child, input, pos, k),
            Ast::Concat(children) => self.match_seq(st, children, input, pos, k),
            Ast::Alternation(branches) => {
                for branch in branches {
                    if self.match_node(st, branch, input, pos, &mut *k)? {
                        return Ok(true);
                    }
                    self.note_backtrack(st)?;
                }
                Ok(false)
            }
            Ast::Star(child) => self.match_repeat(st, child, input, pos, 0, usize::MAX, k),
            Ast::Plus(child) => self.match_repeat(st, child, input, pos, 1, usize::MAX, k),
            Ast::Question(child) => self.match_repeat(st, child, input, pos, 0, 1, k),
        }
    }

    // A single consuming atom: advance on success, otherwise fail without
    // touching the continuation.
    fn match_one(
        &self,
        st: &mut RunState,
        input: &[char],
        pos: usize,
        pred: impl Fn(char) -> bool,
        k: Cont,
    ) -> Result<bool> {
        match input.get(pos) {
            Some(&c) if pred(c) => k(st, pos + 1),
            _ => Ok(false),
        }
    }

    fn match_seq(
        &self,
        st: &mut RunState,
        nodes: &'a [Ast],
        input: &[char],
        pos: usize,
        k: Cont,
    ) -> Result<bool> {
        match nodes.split_first() {
            None => k(st, pos),
            Some((first, rest)) => self.match_node(st, first, input, pos, &mut |st, next| {
                self.match_seq(st, rest, input, next, &mut *k)
            }),
        }
    }

    fn match_repeat(
        &self,
        st: &mut RunState,
        child: &'a Ast,
        input: &[char],
        pos: usize,
        min: usize,
        max: usize,
        k: Cont,
    ) -> Result<bool> {
        // Greedy phase. A successful iteration that does not advance the
        // cursor ends the loop (ε-matchable children would otherwise
        // iterate forever) and is recorded at most once, to satisfy the
        // minimum.
        let mut positions = vec![pos];
        let mut cur = pos;
        while positions.len() - 1 < max {
            let mut landed: Option<usize> = None;
            self.match_node(
                st,
                child,
                input,
                cur,
                &mut |_st: &mut RunState, p: usize| -> Result<bool> {
                    landed = Some(p);
                    Ok(true)
                },
            )?;
            match landed {
                Some(p) if p > cur => {
                    positions.push(p);
                    cur = p;
                }
                Some(_) => {
                    if positions.len() - 1 < min {
                        positions.push(cur);
                    }
                    break;
                }
                None => break,
            }
        }
        if positions.len() - 1 < min {
            return Ok(false);
        }

        // Backtracking phase: longest first, each step down is one
        // backtrack.
        let mut first = true;
        for idx in (min..positions.len()).rev() {
            if !first {
                self.note_backtrack(st)?;
            }
            first = false;
            if k(st, positions[idx])? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn note_backtrack(&self, st: &mut RunState) -> Result<()> {
        st.backtracks += 1;
        if st.backtracks > self.max_backtracks {
            return Err(RgxError::new(RgxErrorKind::BacktrackLimitExceeded {
                limit: self.max_backtracks,
                actual: st.backtracks,
            }));
        }
        self.budget.check()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use crate::internal::parser::parse;
    use crate::RgxErrorKind;

    use super::*;

    fn matcher_for(ast: &Ast, max_backtracks: u64) -> Backtracker<'_> {
        Backtracker::new(ast, max_backtracks, Budget::new(Instant::now(), 10_000))
    }

    fn full(pattern: &str, input: &str) -> bool {
        let ast = parse(pattern).unwrap();
        let chars: Vec<char> = input.chars().collect();
        matcher_for(&ast, 100_000)
            .match_full(&chars)
            .unwrap()
            .span
            .is_some()
    }

    fn find_span(pattern: &str, input: &str) -> Option<(usize, usize)> {
        let ast = parse(pattern).unwrap();
        let chars: Vec<char> = input.chars().collect();
        matcher_for(&ast, 100_000)
            .find(&chars)
            .unwrap()
            .span
            .map(|s| (s.start, s.end))
    }

    #[test]
    fn test_match_full_basics() {
        assert!(full("abc", "abc"));
        assert!(!full("abc", "abx"));
        assert!(!full("abc", "abcd"));
        assert!(full("a|b", "b"));
        assert!(full("(cat|dog)s", "dogs"));
        assert!(full("colou?r", "colour"));
        assert!(full("colou?r", "color"));
    }

    #[test]
    fn test_quantifiers_against_the_empty_input() {
        assert!(full("a*", ""));
        assert!(!full("a+", ""));
        assert!(full("a?", ""));
        assert!(full("", ""));
    }

    #[test]
    fn test_any_char_excludes_line_terminators() {
        assert!(full(".", "a"));
        assert!(!full(".", "\n"));
        assert!(!full(".", "\r"));
        assert!(!full("[^x]", "\n"));
    }

    #[test]
    fn test_greedy_quantifier_backs_off() {
        // a* must give back one 'a' for the trailing literal.
        assert!(full("a*a", "aaa"));
        assert!(full("a*ab", "aab"));
    }

    #[test]
    fn test_epsilon_matchable_quantifiers_terminate() {
        assert!(full("(a?)*", ""));
        assert!(full("(a?)*", "aaa"));
        assert!(full("(a?)+", ""));
        assert!(full("(a*)*", "aaa"));
    }

    #[test]
    fn test_find_is_leftmost_first() {
        assert_eq!(find_span("[0-9]+", "abc 123 def 456"), Some((4, 7)));
        // Leftmost-first: the first alternation branch wins even though a
        // longer match exists at the same start.
        assert_eq!(find_span("a|ab", "ab"), Some((0, 1)));
        assert_eq!(find_span("x", "abc"), None);
    }

    #[test]
    fn test_find_all_zero_width_progress() {
        let ast = parse("a*").unwrap();
        let chars: Vec<char> = "ba".chars().collect();
        let (spans, _) = matcher_for(&ast, 100_000).find_all(&chars).unwrap();
        let spans: Vec<(usize, usize)> = spans.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(spans, vec![(0, 0), (1, 2), (2, 2)]);
    }

    #[test]
    fn test_backtrack_limit_aborts_catastrophic_patterns() {
        let ast = parse("a*a*a*a*a*b").unwrap();
        let input: Vec<char> = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaac".chars().collect();
        let err = matcher_for(&ast, 100).match_full(&input).unwrap_err();
        match *err.source {
            RgxErrorKind::BacktrackLimitExceeded { limit, actual } => {
                assert_eq!(limit, 100);
                assert!(actual > limit);
            }
            other => panic!("expected backtrack limit error, got {other:?}"),
        }
    }

    #[test]
    fn test_backtracks_are_counted() {
        let ast = parse("(cat|dog)s").unwrap();
        let chars: Vec<char> = "dogs".chars().collect();
        let run = matcher_for(&ast, 100_000).match_full(&chars).unwrap();
        assert!(run.span.is_some());
        assert_eq!(run.work, 1);
    }

    #[test]
    fn test_timeout_is_reported() {
        let ast = parse("a*a*a*a*a*a*b").unwrap();
        let input: Vec<char> = "a".repeat(40).chars().collect();
        let matcher = Backtracker::new(&ast, u64::MAX, Budget::new(Instant::now(), 0));
        // A zero budget times out on the first check.
        std::thread::sleep(std::time::Duration::from_millis(2));
        let err = matcher.match_full(&input).unwrap_err();
        assert!(matches!(*err.source, RgxErrorKind::Timeout { .. }));
    }
}
