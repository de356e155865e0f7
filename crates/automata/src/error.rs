use thiserror::Error;

/// The failures of the automaton engine.
///
/// All of these are local, synchronous failures without retry semantics:
/// retrying with the same automaton and input can never succeed, the caller
/// has to supply a corrected one. The engine only returns these typed values
/// and never decides how they are surfaced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    /// A structural invariant was violated at construction or load.
    #[error("malformed automaton: {0}")]
    MalformedAutomaton(String),

    /// A simulated input contains a symbol outside the alphabet.
    #[error("unknown symbol '{0}' in the input")]
    UnknownSymbol(String),

    /// Minimization was requested on an automaton that is not structurally
    /// deterministic.
    #[error("not a deterministic automaton: {0}")]
    NotADeterministicAutomaton(String),

    /// Determinization found no state reachable from the start state.
    #[error("the automaton has no reachable start configuration")]
    EmptyAutomaton,

    /// Removing the states unreachable from the start state emptied the
    /// automaton.
    #[error("no states remain after discarding unreachable states")]
    NoReachableStates,
}
