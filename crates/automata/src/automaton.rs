use std::fmt;

use rustc_hash::FxHashMap;

use faro_utilities::VecSet;

use crate::AutomatonError;

/// The reserved marker for transitions that consume no input symbol.
///
/// It may appear as a key in the transition relation of an NFA, but never in
/// the alphabet itself.
pub const EPSILON: &str = "ε";

/// The transition relation: source state to symbol to destination set.
pub type TransitionRelation = FxHashMap<String, FxHashMap<String, VecSet<String>>>;

/// The declared kind of an automaton.
///
/// The declared kind is independent of the structural check
/// [`Automaton::is_structurally_deterministic`]: an NFA-declared automaton may
/// well have a deterministic transition relation, and both views are exposed
/// without reconciling them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutomatonKind {
    Dfa,
    Nfa,
}

impl fmt::Display for AutomatonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomatonKind::Dfa => write!(f, "DFA"),
            AutomatonKind::Nfa => write!(f, "NFA"),
        }
    }
}

/// A finite automaton over string-labelled states and symbols.
///
/// The value is immutable after construction: [`Automaton::new`] validates
/// every structural invariant and only read accessors are exposed afterwards.
/// Transition targets are always a set of states; a DFA is the structural
/// constraint that every target set has at most one element, not a different
/// value shape. Names and identifiers of persisted automata are the concern
/// of the store, the engine only works on the structural payload.
#[derive(Clone, PartialEq, Eq)]
pub struct Automaton {
    states: VecSet<String>,
    alphabet: VecSet<String>,
    transitions: TransitionRelation,
    start: String,
    accepting: VecSet<String>,
    kind: AutomatonKind,
}

impl Automaton {
    /// Creates a validated automaton.
    ///
    /// Returns `MalformedAutomaton` when the start or an accepting state is
    /// not a member of the state set, a transition references an undeclared
    /// state or symbol, the alphabet contains the epsilon marker, or a
    /// DFA-declared automaton has an epsilon transition or a multi-target
    /// set.
    pub fn new(
        states: VecSet<String>,
        alphabet: VecSet<String>,
        transitions: TransitionRelation,
        start: String,
        accepting: VecSet<String>,
        kind: AutomatonKind,
    ) -> Result<Self, AutomatonError> {
        if alphabet.contains(EPSILON) {
            return Err(AutomatonError::MalformedAutomaton(
                "the alphabet must not contain the epsilon marker".to_string(),
            ));
        }

        if !states.contains(start.as_str()) {
            return Err(AutomatonError::MalformedAutomaton(format!(
                "start state '{start}' is not in the state set"
            )));
        }

        for state in &accepting {
            if !states.contains(state.as_str()) {
                return Err(AutomatonError::MalformedAutomaton(format!(
                    "accepting state '{state}' is not in the state set"
                )));
            }
        }

        for (source, by_symbol) in &transitions {
            if !states.contains(source.as_str()) {
                return Err(AutomatonError::MalformedAutomaton(format!(
                    "transition source '{source}' is not in the state set"
                )));
            }

            for (symbol, targets) in by_symbol {
                if symbol != EPSILON && !alphabet.contains(symbol.as_str()) {
                    return Err(AutomatonError::MalformedAutomaton(format!(
                        "transition symbol '{symbol}' is not in the alphabet"
                    )));
                }

                for target in targets {
                    if !states.contains(target.as_str()) {
                        return Err(AutomatonError::MalformedAutomaton(format!(
                            "transition target '{target}' is not in the state set"
                        )));
                    }
                }

                if kind == AutomatonKind::Dfa {
                    if symbol == EPSILON {
                        return Err(AutomatonError::MalformedAutomaton(format!(
                            "a DFA must not have epsilon transitions, found one from '{source}'"
                        )));
                    }
                    if targets.len() > 1 {
                        return Err(AutomatonError::MalformedAutomaton(format!(
                            "a DFA allows at most one target for ('{source}', '{symbol}'), found {}",
                            targets.len()
                        )));
                    }
                }
            }
        }

        Ok(Self {
            states,
            alphabet,
            transitions,
            start,
            accepting,
            kind,
        })
    }

    /// Returns the set of states.
    pub fn states(&self) -> &VecSet<String> {
        &self.states
    }

    /// Returns the alphabet, which never contains the epsilon marker.
    pub fn alphabet(&self) -> &VecSet<String> {
        &self.alphabet
    }

    /// Returns the start state.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Returns the set of accepting states.
    pub fn accepting(&self) -> &VecSet<String> {
        &self.accepting
    }

    /// Returns the declared kind.
    pub fn kind(&self) -> AutomatonKind {
        self.kind
    }

    /// Returns the full transition relation.
    pub fn transitions(&self) -> &TransitionRelation {
        &self.transitions
    }

    /// Returns the destination states for the given state and symbol. An
    /// undefined pair yields an empty iterator, which reads as implicit
    /// rejection during simulation.
    pub fn transitions_from(&self, state: &str, symbol: &str) -> impl Iterator<Item = &String> {
        self.transitions
            .get(state)
            .and_then(|by_symbol| by_symbol.get(symbol))
            .into_iter()
            .flatten()
    }

    /// Returns all transition edges as (source, symbol, target) triples in a
    /// deterministic order: sources in state order, symbols sorted per source.
    pub fn transition_edges(&self) -> Vec<(&str, &str, &str)> {
        let mut edges = Vec::new();

        for state in &self.states {
            if let Some(by_symbol) = self.transitions.get(state.as_str()) {
                let mut symbols: Vec<&String> = by_symbol.keys().collect();
                symbols.sort();

                for symbol in symbols {
                    for target in &by_symbol[symbol] {
                        edges.push((state.as_str(), symbol.as_str(), target.as_str()));
                    }
                }
            }
        }

        edges
    }

    /// Returns the number of transition edges.
    pub fn num_of_transitions(&self) -> usize {
        self.transitions
            .values()
            .map(|by_symbol| by_symbol.values().map(VecSet::len).sum::<usize>())
            .sum()
    }

    /// Returns true iff the transition relation is structurally deterministic:
    /// there are no epsilon transitions and every (state, symbol) pair has at
    /// most one destination. Undefined pairs do not disqualify.
    ///
    /// This check is independent of the declared [`Automaton::kind`] and is
    /// what gates minimization.
    pub fn is_structurally_deterministic(&self) -> bool {
        self.transitions.values().all(|by_symbol| {
            by_symbol
                .iter()
                .all(|(symbol, targets)| symbol != EPSILON && targets.len() <= 1)
        })
    }

    /// Returns the smallest superset of the given states that is closed under
    /// epsilon transitions.
    ///
    /// Uses a worklist with a visited check, so it terminates on cyclic
    /// epsilon graphs.
    pub fn epsilon_closure(&self, states: &VecSet<String>) -> VecSet<String> {
        let mut closure = states.clone();
        let mut worklist: Vec<String> = states.iter().cloned().collect();

        while let Some(state) = worklist.pop() {
            for target in self.transitions_from(&state, EPSILON) {
                if closure.insert(target.clone()) {
                    worklist.push(target.clone());
                }
            }
        }

        closure
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Kind: {}", self.kind)?;
        writeln!(f, "Number of states: {}", self.states.len())?;
        writeln!(f, "Number of symbols: {}", self.alphabet.len())?;
        write!(f, "Number of transitions: {}", self.num_of_transitions())
    }
}

impl fmt::Debug for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{self}")?;
        writeln!(f, "Start state: {}", self.start)?;
        writeln!(f, "Accepting states: {:?}", self.accepting)?;

        for (source, symbol, target) in self.transition_edges() {
            writeln!(f, "{source} --[{symbol}]-> {target}")?;
        }

        Ok(())
    }
}
