//! Multi-state NFA simulation.
//!
//! The classic two-set scheme: the current state set is advanced over one
//! code point into the next set via move + ε-closure. No backtracking takes
//! place; run time is O(|input| × |states|). Work units are state visits
//! plus ε-edges traversed.

use crate::{Result, Span};

use super::{
    budget::{Budget, MatcherRun},
    nfa::Nfa,
};

/// An NFA simulation matcher bound to one NFA.
pub(crate) struct NfaMatcher<'a> {
    nfa: &'a Nfa,
    budget: Budget,
}

impl<'a> NfaMatcher<'a> {
    pub(crate) fn new(nfa: &'a Nfa, budget: Budget) -> Self {
        Self { nfa, budget }
    }

    /// Match iff an accepting state is live after the entire input has
    /// been consumed.
    pub(crate) fn match_full(&self, input: &[char]) -> Result<MatcherRun> {
        let mut work = 0u64;
        let mut current = self
            .nfa
            .epsilon_closure_set_counted(vec![self.nfa.start_state()], &mut work);
        for &c in input {
            self.budget.check()?;
            work += current.len() as u64;
            let moved = self.nfa.move_set(&current, c);
            current = self.nfa.epsilon_closure_set_counted(moved, &mut work);
            if current.is_empty() {
                return Ok(MatcherRun { span: None, work });
            }
        }
        let matched = current.iter().any(|&s| self.nfa.is_accepting(s));
        Ok(MatcherRun {
            span: if matched {
                Some(Span::new(0, input.len()))
            } else {
                None
            },
            work,
        })
    }

    /// Leftmost-longest search: the first start position from which any
    /// accepting state is reachable wins, with the largest end recorded
    /// for that start.
    pub(crate) fn find(&self, input: &[char]) -> Result<MatcherRun> {
        let mut work = 0u64;
        let span = self.find_from(input, 0, &mut work)?;
        Ok(MatcherRun { span, work })
    }

    /// All non-overlapping matches in order of increasing start position.
    pub(crate) fn find_all(&self, input: &[char]) -> Result<(Vec<Span>, u64)> {
        let mut work = 0u64;
        let mut spans = Vec::new();
        let mut pos = 0;
        while pos <= input.len() {
            match self.find_from(input, pos, &mut work)? {
                Some(span) => {
                    pos = span.end.max(span.start + 1);
                    spans.push(span);
                }
                None => break,
            }
        }
        Ok((spans, work))
    }

    pub(crate) fn find_from(
        &self,
        input: &[char],
        from: usize,
        work: &mut u64,
    ) -> Result<Option<Span>> {
        for start in from..=input.len() {
            self.budget.check()?;
            let mut current = self
                .nfa
                .epsilon_closure_set_counted(vec![self.nfa.start_state()], work);
            let mut best_end = if current.iter().any(|&s| self.nfa.is_accepting(s)) {
                Some(start)
            } else {
                None
            };
            for (i, &c) in input.iter().enumerate().skip(start) {
                self.budget.check()?;
                *work += current.len() as u64;
                let moved = self.nfa.move_set(&current, c);
                current = self.nfa.epsilon_closure_set_counted(moved, work);
                if current.is_empty() {
                    break;
                }
                if current.iter().any(|&s| self.nfa.is_accepting(s)) {
                    best_end = Some(i + 1);
                }
            }
            if let Some(end) = best_end {
                return Ok(Some(Span::new(start, end)));
            }
        }
        Ok(None)
    }
}
