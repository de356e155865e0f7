use rustc_hash::FxHashMap;

use faro_utilities::VecSet;

use crate::Automaton;
use crate::AutomatonError;
use crate::AutomatonKind;
use crate::TransitionRelation;

/// An incremental builder for automata.
///
/// States, symbols and transitions can be added in any order; `finish` runs
/// the validated constructor, so the builder can never leak an automaton that
/// violates a structural invariant.
pub struct AutomatonBuilder {
    states: VecSet<String>,
    alphabet: VecSet<String>,
    transitions: TransitionRelation,
    start: Option<String>,
    accepting: VecSet<String>,
    kind: AutomatonKind,
}

impl AutomatonBuilder {
    /// Creates a builder for an automaton with the given declared kind.
    pub fn new(kind: AutomatonKind) -> Self {
        Self {
            states: VecSet::new(),
            alphabet: VecSet::new(),
            transitions: FxHashMap::default(),
            start: None,
            accepting: VecSet::new(),
            kind,
        }
    }

    /// Adds a state.
    pub fn add_state(&mut self, state: &str) -> &mut Self {
        self.states.insert(state.to_string());
        self
    }

    /// Adds a symbol to the alphabet.
    pub fn add_symbol(&mut self, symbol: &str) -> &mut Self {
        self.alphabet.insert(symbol.to_string());
        self
    }

    /// Sets the start state. The state itself must be added separately.
    pub fn set_start(&mut self, state: &str) -> &mut Self {
        self.start = Some(state.to_string());
        self
    }

    /// Marks the given state as accepting.
    pub fn add_accepting(&mut self, state: &str) -> &mut Self {
        self.accepting.insert(state.to_string());
        self
    }

    /// Adds a transition edge. The symbol may be the epsilon marker.
    pub fn add_transition(&mut self, from: &str, symbol: &str, to: &str) -> &mut Self {
        self.transitions
            .entry(from.to_string())
            .or_default()
            .entry(symbol.to_string())
            .or_default()
            .insert(to.to_string());
        self
    }

    /// Finishes the builder through the validated constructor.
    pub fn finish(self) -> Result<Automaton, AutomatonError> {
        let start = self.start.ok_or_else(|| {
            AutomatonError::MalformedAutomaton("no start state was set".to_string())
        })?;

        Automaton::new(
            self.states,
            self.alphabet,
            self.transitions,
            start,
            self.accepting,
            self.kind,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_builder_assembles_an_automaton() {
        let mut builder = AutomatonBuilder::new(AutomatonKind::Dfa);
        builder
            .add_state("q0")
            .add_state("q1")
            .add_symbol("a")
            .set_start("q0")
            .add_accepting("q1")
            .add_transition("q0", "a", "q1");
        let automaton = builder.finish().unwrap();

        assert_eq!(automaton.states().len(), 2);
        assert_eq!(automaton.start(), "q0");
        assert!(automaton.accepting().contains("q1"));
        assert_eq!(automaton.num_of_transitions(), 1);
    }

    #[test]
    fn test_builder_requires_a_start_state() {
        let mut builder = AutomatonBuilder::new(AutomatonKind::Dfa);
        builder.add_state("q0");

        assert!(matches!(
            builder.finish(),
            Err(AutomatonError::MalformedAutomaton(_))
        ));
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let mut builder = AutomatonBuilder::new(AutomatonKind::Nfa);
        builder
            .add_state("q0")
            .add_symbol("a")
            .set_start("q0")
            .add_transition("q0", "a", "q0")
            .add_transition("q0", "a", "q0");
        let automaton = builder.finish().unwrap();

        assert_eq!(automaton.num_of_transitions(), 1);
    }
}
