//! Table-walk matching on the lazy DFA.
//!
//! Each consumed code point is one transition, resolved from the cache or
//! built on demand. When the DFA saturates its state budget the matcher
//! completes the operation on the underlying NFA instead; results are
//! identical, only slower. Work units are transitions taken.

use log::debug;

use crate::{Result, Span};

use super::{
    budget::{Budget, MatcherRun},
    dfa::{DfaStep, LazyDfa},
    nfa::Nfa,
    nfa_matcher::NfaMatcher,
};

// The outcome of one search sweep over the start positions.
enum FindOutcome {
    Found(Span),
    NotFound,
    Saturated,
}

/// A matcher that owns its lazy DFA. The transition cache mutates during
/// matching, so an instance is single-owner for its lifetime.
pub(crate) struct DfaMatcher {
    dfa: LazyDfa,
    budget: Budget,
}

impl DfaMatcher {
    pub(crate) fn new(nfa: Nfa, budget: Budget) -> Self {
        Self {
            dfa: LazyDfa::new(nfa),
            budget,
        }
    }

    /// Match iff the state reached after the entire input accepts.
    pub(crate) fn match_full(&mut self, input: &[char]) -> Result<MatcherRun> {
        let mut work = 0u64;
        let mut state = self.dfa.start_state();
        for &c in input {
            self.budget.check()?;
            work += 1;
            match self.dfa.step(state, c) {
                DfaStep::Goto(next) => state = next,
                DfaStep::Dead => return Ok(MatcherRun { span: None, work }),
                DfaStep::Saturated => {
                    self.log_fallback();
                    let run = NfaMatcher::new(self.dfa.nfa(), self.budget).match_full(input)?;
                    return Ok(MatcherRun {
                        span: run.span,
                        work: work + run.work,
                    });
                }
            }
        }
        let matched = self.dfa.is_accepting(state);
        Ok(MatcherRun {
            span: if matched {
                Some(Span::new(0, input.len()))
            } else {
                None
            },
            work,
        })
    }

    /// Leftmost-longest search, as the NFA matcher but driving the DFA.
    pub(crate) fn find(&mut self, input: &[char]) -> Result<MatcherRun> {
        let mut work = 0u64;
        match self.find_from(input, 0, &mut work)? {
            FindOutcome::Found(span) => Ok(MatcherRun {
                span: Some(span),
                work,
            }),
            FindOutcome::NotFound => Ok(MatcherRun { span: None, work }),
            FindOutcome::Saturated => {
                self.log_fallback();
                let run = NfaMatcher::new(self.dfa.nfa(), self.budget).find(input)?;
                Ok(MatcherRun {
                    span: run.span,
                    work: work + run.work,
                })
            }
        }
    }

    /// All non-overlapping matches in order of increasing start position.
    pub(crate) fn find_all(&mut self, input: &[char]) -> Result<(Vec<Span>, u64)> {
        let mut work = 0u64;
        let mut spans = Vec::new();
        let mut pos = 0;
        while pos <= input.len() {
            match self.find_from(input, pos, &mut work)? {
                FindOutcome::Found(span) => {
                    pos = span.end.max(span.start + 1);
                    spans.push(span);
                }
                FindOutcome::NotFound => break,
                FindOutcome::Saturated => {
                    self.log_fallback();
                    let nfa_matcher = NfaMatcher::new(self.dfa.nfa(), self.budget);
                    while pos <= input.len() {
                        match nfa_matcher.find_from(input, pos, &mut work)? {
                            Some(span) => {
                                pos = span.end.max(span.start + 1);
                                spans.push(span);
                            }
                            None => break,
                        }
                    }
                    break;
                }
            }
        }
        Ok((spans, work))
    }

    fn find_from(&mut self, input: &[char], from: usize, work: &mut u64) -> Result<FindOutcome> {
        for start in from..=input.len() {
            self.budget.check()?;
            let mut state = self.dfa.start_state();
            let mut best_end = if self.dfa.is_accepting(state) {
                Some(start)
            } else {
                None
            };
            for (i, &c) in input.iter().enumerate().skip(start) {
                self.budget.check()?;
                *work += 1;
                match self.dfa.step(state, c) {
                    DfaStep::Goto(next) => {
                        state = next;
                        if self.dfa.is_accepting(state) {
                            best_end = Some(i + 1);
                        }
                    }
                    DfaStep::Dead => break,
                    DfaStep::Saturated => return Ok(FindOutcome::Saturated),
                }
            }
            if let Some(end) = best_end {
                return Ok(FindOutcome::Found(Span::new(start, end)));
            }
        }
        Ok(FindOutcome::NotFound)
    }

    fn log_fallback(&self) {
        debug!(
            "lazy DFA hit its state budget ({} states); finishing on the NFA",
            self.dfa.state_count()
        );
    }
}
