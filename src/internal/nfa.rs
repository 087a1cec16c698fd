//! This module contains the NFA (Non-deterministic Finite Automaton)
//! implementation. The NFA is built from the AST with Thompson's
//! construction and is the substrate for both the NFA simulation matcher
//! and the lazy DFA.

use super::{
    ast::{Ast, EMPTY_PATTERN},
    char_spec::CharSpec,
    ids::{StateID, StateIDBase},
};

/// The NFA of a single pattern. Exactly one start state and one end state;
/// the end state is the only accepting state and has no outgoing edges.
#[derive(Debug, Clone, Default)]
pub(crate) struct Nfa {
    pub(crate) states: Vec<NfaState>,
    pub(crate) start_state: StateID,
    pub(crate) end_state: StateID,
}

impl Nfa {
    pub(crate) fn new() -> Self {
        Self {
            states: vec![NfaState::default()],
            start_state: StateID::default(),
            end_state: StateID::default(),
        }
    }

    // Returns true if the NFA is empty, i.e. no states and no transitions
    // have been added.
    fn is_empty(&self) -> bool {
        self.start_state == StateID::default()
            && self.end_state == StateID::default()
            && self.states.len() == 1
            && self.states[0].is_empty()
    }

    pub(crate) fn start_state(&self) -> StateID {
        self.start_state
    }

    pub(crate) fn end_state(&self) -> StateID {
        self.end_state
    }

    pub(crate) fn states(&self) -> &[NfaState] {
        &self.states
    }

    /// Only the single end state accepts.
    #[inline]
    pub(crate) fn is_accepting(&self, state: StateID) -> bool {
        state == self.end_state
    }

    fn add_state(&mut self, state: NfaState) {
        self.states.push(state);
    }

    fn set_start_state(&mut self, state: StateID) {
        self.start_state = state;
    }

    fn set_end_state(&mut self, state: StateID) {
        self.end_state = state;
    }

    fn add_transition(&mut self, from: StateID, spec: CharSpec, target_state: StateID) {
        self.states[from]
            .transitions
            .push(NfaTransition { spec, target_state });
    }

    fn add_epsilon_transition(&mut self, from: StateID, target_state: StateID) {
        self.states[from]
            .epsilon_transitions
            .push(EpsilonTransition { target_state });
    }

    fn new_state(&mut self) -> StateID {
        let state = StateID::new(self.states.len() as StateIDBase);
        self.add_state(NfaState::new(state));
        state
    }

    /// Apply an offset to every state number.
    fn shift_ids(&mut self, offset: usize) -> (StateID, StateID) {
        for state in self.states.iter_mut() {
            state.offset(offset);
        }
        self.start_state = StateID::new(self.start_state.id() + offset as StateIDBase);
        self.end_state = StateID::new(self.end_state.id() + offset as StateIDBase);
        (self.start_state, self.end_state)
    }

    /// Move the states of the given NFA to the current NFA and thereby
    /// consume the NFA.
    fn append(&mut self, mut nfa: Nfa) {
        self.states.append(nfa.states.as_mut());
        // Check the index constraints
        debug_assert!(self
            .states
            .iter()
            .enumerate()
            .all(|(i, s)| s.id().as_usize() == i));
    }

    /// Concatenates the current NFA with another NFA.
    fn concat(&mut self, nfa: Nfa) {
        if self.is_empty() {
            *self = nfa;
            return;
        }

        // Apply an offset to the state numbers of the given NFA
        let mut nfa = nfa;
        let (nfa_start_state, nfa_end_state) = nfa.shift_ids(self.states.len());
        self.append(nfa);

        // Connect the end state of the current NFA to the start state of the
        // new NFA
        self.add_epsilon_transition(self.end_state, nfa_start_state);
        self.set_end_state(nfa_end_state);
    }

    fn alternation(&mut self, nfa: Nfa) {
        if self.is_empty() {
            *self = nfa;
            return;
        }

        // Apply an offset to the state numbers of the given NFA
        let mut nfa = nfa;
        let (nfa_start_state, nfa_end_state) = nfa.shift_ids(self.states.len());
        self.append(nfa);

        // A new start state with ε-edges to both branch starts
        let start_state = self.new_state();
        self.add_epsilon_transition(start_state, self.start_state);
        self.add_epsilon_transition(start_state, nfa_start_state);

        // A new end state fed by both branch ends
        let end_state = self.new_state();
        self.add_epsilon_transition(self.end_state, end_state);
        self.add_epsilon_transition(nfa_end_state, end_state);

        self.set_start_state(start_state);
        self.set_end_state(end_state);
    }

    fn zero_or_one(&mut self) {
        // A new start state that can skip the fragment entirely
        let start_state = self.new_state();
        self.add_epsilon_transition(start_state, self.start_state);
        self.add_epsilon_transition(start_state, self.end_state);

        self.set_start_state(start_state);
    }

    fn one_or_more(&mut self) {
        let start_state = self.new_state();
        self.add_epsilon_transition(start_state, self.start_state);

        let end_state = self.new_state();
        self.add_epsilon_transition(self.end_state, end_state);
        // Loop back for further iterations
        self.add_epsilon_transition(self.end_state, self.start_state);

        self.set_start_state(start_state);
        self.set_end_state(end_state);
    }

    fn zero_or_more(&mut self) {
        let start_state = self.new_state();
        self.add_epsilon_transition(start_state, self.start_state);
        self.add_epsilon_transition(start_state, self.end_state);

        let end_state = self.new_state();
        self.add_epsilon_transition(self.end_state, end_state);
        self.add_epsilon_transition(self.end_state, self.start_state);

        self.set_start_state(start_state);
        self.set_end_state(end_state);
    }

    /// Thompson's construction. Grouping is parse-only, so a group
    /// translates to its child's fragment.
    pub(crate) fn from_ast(ast: &Ast) -> Self {
        let mut nfa = Nfa::new();
        match ast {
            Ast::Literal(c) if *c == EMPTY_PATTERN => {
                let start_state = nfa.end_state();
                let end_state = nfa.new_state();
                nfa.set_end_state(end_state);
                nfa.add_epsilon_transition(start_state, end_state);
            }
            Ast::Literal(c) | Ast::Escaped(c) => nfa.add_leaf(CharSpec::Char(*c)),
            Ast::Tab => nfa.add_leaf(CharSpec::Char('\t')),
            Ast::Whitespace => nfa.add_leaf(CharSpec::Whitespace),
            Ast::AnyChar => nfa.add_leaf(CharSpec::Any),
            Ast::CharClass(set) => nfa.add_leaf(CharSpec::Class(set.clone())),
            Ast::NegatedCharClass(set) => nfa.add_leaf(CharSpec::NegatedClass(set.clone())),
            Ast::Group(child) => return Self::from_ast(child),
            Ast::Concat(children) => {
                for child in children {
                    nfa.concat(Self::from_ast(child));
                }
            }
            Ast::Alternation(branches) => {
                for branch in branches {
                    nfa.alternation(Self::from_ast(branch));
                }
            }
            Ast::Star(child) => {
                nfa = Self::from_ast(child);
                nfa.zero_or_more();
            }
            Ast::Plus(child) => {
                nfa = Self::from_ast(child);
                nfa.one_or_more();
            }
            Ast::Question(child) => {
                nfa = Self::from_ast(child);
                nfa.zero_or_one();
            }
        }
        nfa
    }

    fn add_leaf(&mut self, spec: CharSpec) {
        let start_state = self.end_state();
        let end_state = self.new_state();
        self.set_end_state(end_state);
        self.add_transition(start_state, spec, end_state);
    }

    /// Calculate the epsilon closure of a single state.
    pub(crate) fn epsilon_closure(&self, state: StateID) -> Vec<StateID> {
        self.epsilon_closure_set(vec![state])
    }

    /// Calculate the epsilon closure of a set of states.
    pub(crate) fn epsilon_closure_set(&self, seed: Vec<StateID>) -> Vec<StateID> {
        let mut work = 0u64;
        self.epsilon_closure_set_counted(seed, &mut work)
    }

    /// Epsilon closure that counts every ε-edge it traverses into `work`.
    /// The seed states are always part of the closure.
    pub(crate) fn epsilon_closure_set_counted(
        &self,
        seed: Vec<StateID>,
        work: &mut u64,
    ) -> Vec<StateID> {
        let mut closure = seed;
        let mut i = 0;
        while i < closure.len() {
            let current_state = closure[i];
            for epsilon_transition in self.states[current_state].epsilon_transitions() {
                *work += 1;
                if !closure.contains(&epsilon_transition.target_state()) {
                    closure.push(epsilon_transition.target_state());
                }
            }
            i += 1;
        }
        closure.sort_unstable();
        closure.dedup();
        closure
    }

    /// Calculate move(T, c) for a set of states T and a code point c: the
    /// set of states reachable from T by consuming c.
    pub(crate) fn move_set(&self, states: &[StateID], c: char) -> Vec<StateID> {
        let mut moved = Vec::new();
        for &state in states {
            for transition in self.states[state].transitions() {
                if transition.spec().matches(c) {
                    moved.push(transition.target_state());
                }
            }
        }
        moved.sort_unstable();
        moved.dedup();
        moved
    }
}

impl std::fmt::Display for Nfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "NFA")?;
        writeln!(f, "Start state: {}", self.start_state)?;
        writeln!(f, "End state: {}", self.end_state)?;
        writeln!(f, "Transitions:")?;
        for state in &self.states {
            for transition in state.transitions() {
                writeln!(
                    f,
                    "{} --{}--> {}",
                    state.id(),
                    transition.spec(),
                    transition.target_state()
                )?;
            }
            for epsilon_transition in state.epsilon_transitions() {
                writeln!(f, "{} --ε--> {}", state.id(), epsilon_transition.target_state())?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct NfaState {
    state: StateID,
    epsilon_transitions: Vec<EpsilonTransition>,
    transitions: Vec<NfaTransition>,
}

impl NfaState {
    fn new(state: StateID) -> Self {
        Self {
            state,
            epsilon_transitions: Vec::new(),
            transitions: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.transitions.is_empty() && self.epsilon_transitions.is_empty()
    }

    pub(crate) fn id(&self) -> StateID {
        self.state
    }

    pub(crate) fn transitions(&self) -> &[NfaTransition] {
        &self.transitions
    }

    pub(crate) fn epsilon_transitions(&self) -> &[EpsilonTransition] {
        &self.epsilon_transitions
    }

    /// Apply an offset to every state number.
    fn offset(&mut self, offset: usize) {
        self.state = StateID::new(self.state.id() + offset as StateIDBase);
        for transition in self.transitions.iter_mut() {
            transition.target_state =
                StateID::new(transition.target_state.id() + offset as StateIDBase);
        }
        for epsilon_transition in self.epsilon_transitions.iter_mut() {
            epsilon_transition.target_state =
                StateID::new(epsilon_transition.target_state.id() + offset as StateIDBase);
        }
    }
}

/// A consuming transition in the NFA.
#[derive(Debug, Clone)]
pub(crate) struct NfaTransition {
    spec: CharSpec,
    target_state: StateID,
}

impl NfaTransition {
    pub(crate) fn target_state(&self) -> StateID {
        self.target_state
    }

    pub(crate) fn spec(&self) -> &CharSpec {
        &self.spec
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct EpsilonTransition {
    target_state: StateID,
}

impl EpsilonTransition {
    #[inline]
    pub(crate) fn target_state(&self) -> StateID {
        self.target_state
    }
}
