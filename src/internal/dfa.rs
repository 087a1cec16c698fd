//! Lazy subset construction on top of the NFA.
//!
//! Only the start state exists up front; transitions and target states are
//! created on demand while matching and cached for reuse. States are keyed
//! by their canonical item set (the sorted, deduplicated NFA state ids), so
//! any two traversals reaching the same item set share one state.

use rustc_hash::FxHashMap;

use super::{
    ids::{DfaStateID, DfaStateIDBase, StateID},
    nfa::Nfa,
};

/// Hard cap on the number of live DFA states per matcher instance. The
/// transition cache grows in (distinct code points seen × live states), so
/// adversarial inputs could otherwise grow it without bound.
pub(crate) const MAX_DFA_STATES: usize = 10_000;

/// The outcome of one transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DfaStep {
    /// The transition exists (cached or freshly built).
    Goto(DfaStateID),
    /// No NFA state is reachable on this code point.
    Dead,
    /// Building the transition would exceed [MAX_DFA_STATES]. The caller
    /// falls back to NFA simulation for the rest of the operation.
    Saturated,
}

/// A DFA state: its item set, whether the item set contains the NFA accept
/// state, and the lazily filled transition table. The table stores `None`
/// for code points already known to be dead, and only for code points
/// actually seen in the input.
#[derive(Debug, Clone)]
pub(crate) struct DfaState {
    items: Box<[StateID]>,
    accepting: bool,
    transitions: FxHashMap<char, Option<DfaStateID>>,
}

impl DfaState {
    pub(crate) fn items(&self) -> &[StateID] {
        &self.items
    }
}

/// A lazily constructed DFA bound to one NFA.
#[derive(Debug)]
pub(crate) struct LazyDfa {
    nfa: Nfa,
    states: Vec<DfaState>,
    // One DFA state per item set; lookup canonicalizes.
    item_sets: FxHashMap<Box<[StateID]>, DfaStateID>,
    start_state: DfaStateID,
}

impl LazyDfa {
    /// Create the DFA with only its start state: the ε-closure of the NFA
    /// start state.
    pub(crate) fn new(nfa: Nfa) -> Self {
        let items: Box<[StateID]> = nfa.epsilon_closure(nfa.start_state()).into_boxed_slice();
        let accepting = items.iter().any(|&s| nfa.is_accepting(s));
        let start = DfaState {
            items: items.clone(),
            accepting,
            transitions: FxHashMap::default(),
        };
        let mut item_sets = FxHashMap::default();
        let start_state = DfaStateID::new(0);
        item_sets.insert(items, start_state);
        Self {
            nfa,
            states: vec![start],
            item_sets,
            start_state,
        }
    }

    pub(crate) fn start_state(&self) -> DfaStateID {
        self.start_state
    }

    #[inline]
    pub(crate) fn is_accepting(&self, state: DfaStateID) -> bool {
        self.states[state].accepting
    }

    pub(crate) fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    /// The number of states built so far.
    pub(crate) fn state_count(&self) -> usize {
        self.states.len()
    }

    pub(crate) fn states(&self) -> &[DfaState] {
        &self.states
    }

    /// Resolve the transition from `from` on `c`, building the target state
    /// on a cache miss.
    pub(crate) fn step(&mut self, from: DfaStateID, c: char) -> DfaStep {
        if let Some(&cached) = self.states[from].transitions.get(&c) {
            return match cached {
                Some(target) => DfaStep::Goto(target),
                None => DfaStep::Dead,
            };
        }

        let moved = self.nfa.move_set(self.states[from].items(), c);
        let target_items = self.nfa.epsilon_closure_set(moved);
        if target_items.is_empty() {
            // Remember the dead lookup for this code point only.
            self.states[from].transitions.insert(c, None);
            return DfaStep::Dead;
        }

        // move_set and the closure keep the ids sorted and deduplicated, so
        // the item set is already canonical.
        let items: Box<[StateID]> = target_items.into_boxed_slice();
        let target_state = if let Some(&existing) = self.item_sets.get(&items) {
            existing
        } else {
            if self.states.len() >= MAX_DFA_STATES {
                return DfaStep::Saturated;
            }
            let id = DfaStateID::new(self.states.len() as DfaStateIDBase);
            let accepting = items.iter().any(|&s| self.nfa.is_accepting(s));
            self.states.push(DfaState {
                items: items.clone(),
                accepting,
                transitions: FxHashMap::default(),
            });
            self.item_sets.insert(items, id);
            id
        };

        self.states[from].transitions.insert(c, Some(target_state));
        DfaStep::Goto(target_state)
    }
}

#[cfg(test)]
mod tests {
    use crate::internal::parser::parse;

    use super::*;

    fn build(pattern: &str) -> LazyDfa {
        LazyDfa::new(Nfa::from_ast(&parse(pattern).unwrap()))
    }

    fn goto(dfa: &mut LazyDfa, from: DfaStateID, c: char) -> DfaStateID {
        match dfa.step(from, c) {
            DfaStep::Goto(target) => target,
            other => panic!("expected a transition on '{c}', got {other:?}"),
        }
    }

    #[test]
    fn test_start_state_is_the_closure_of_the_nfa_start() {
        let dfa = build("a*");
        // a* accepts the empty string, so the start state accepts.
        assert!(dfa.is_accepting(dfa.start_state()));
        assert_eq!(dfa.state_count(), 1);
    }

    #[test]
    fn test_transitions_are_built_on_demand() {
        let mut dfa = build("ab");
        assert_eq!(dfa.state_count(), 1);
        let start = dfa.start_state();
        let s1 = goto(&mut dfa, start, 'a');
        assert_eq!(dfa.state_count(), 2);
        let s2 = goto(&mut dfa, s1, 'b');
        assert_eq!(dfa.state_count(), 3);
        assert!(dfa.is_accepting(s2));
    }

    #[test]
    fn test_repeated_steps_reuse_the_cache() {
        let mut dfa = build("a*");
        let start = dfa.start_state();
        let first = goto(&mut dfa, start, 'a');
        let second = goto(&mut dfa, start, 'a');
        assert_eq!(first, second);
        assert_eq!(dfa.state_count(), 2);
    }

    #[test]
    fn test_dead_lookups_are_cached_per_code_point() {
        let mut dfa = build("ab");
        let start = dfa.start_state();
        assert_eq!(dfa.step(start, 'z'), DfaStep::Dead);
        assert_eq!(dfa.step(start, 'z'), DfaStep::Dead);
        assert_eq!(dfa.state_count(), 1);
    }

    #[test]
    fn test_equal_item_sets_yield_the_same_state() {
        // Both alternation branches converge on the same accept item set
        // after consuming 'x'.
        let mut dfa = build("(a|b)x");
        let start = dfa.start_state();
        let after_a = goto(&mut dfa, start, 'a');
        let after_b = goto(&mut dfa, start, 'b');
        assert_ne!(after_a, after_b);
        let from_a = goto(&mut dfa, after_a, 'x');
        let from_b = goto(&mut dfa, after_b, 'x');
        assert_eq!(from_a, from_b);
        assert_eq!(
            dfa.states()[from_a].items(),
            dfa.states()[from_b].items()
        );
    }

    #[test]
    fn test_star_loop_converges_to_one_state() {
        let mut dfa = build("a*");
        let start = dfa.start_state();
        let s1 = goto(&mut dfa, start, 'a');
        let s2 = goto(&mut dfa, s1, 'a');
        assert_eq!(s1, s2);
        assert_eq!(dfa.state_count(), 2);
    }
}
