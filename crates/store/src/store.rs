use std::fmt;

use thiserror::Error;

use faro_automata::Automaton;
use faro_automata::AutomatonError;

/// The public identifier a store assigns to a persisted automaton.
///
/// Identifiers are assigned by the store on save, never by the engine.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AutomatonId(String);

impl AutomatonId {
    /// Creates an identifier from its textual form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the textual form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AutomatonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of derivation that produced one stored automaton from another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DerivationKind {
    Determinize,
    Minimize,
}

impl fmt::Display for DerivationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DerivationKind::Determinize => write!(f, "DETERMINIZE"),
            DerivationKind::Minimize => write!(f, "MINIMIZE"),
        }
    }
}

/// A recorded membership test for a stored automaton.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestRecord {
    pub automaton: AutomatonId,
    pub input: String,
    pub accepted: bool,
}

/// A recorded provenance edge from a source automaton to a derived result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivationRecord {
    pub source: AutomatonId,
    pub result: AutomatonId,
    pub kind: DerivationKind,
}

#[derive(Error, Debug)]
pub enum StoreError {
    /// A history entry referenced an identifier the store does not know.
    #[error("unknown automaton id '{0}'")]
    UnknownId(String),

    /// A stored payload failed validation on load. Corrupt data fails closed
    /// instead of yielding a partially-valid automaton.
    #[error(transparent)]
    Malformed(#[from] AutomatonError),
}

/// The narrow persistence contract between the automaton engine and its
/// collaborators.
///
/// The engine never opens a store itself; callers invoke these operations
/// around the pure engine functions, for example recording a test only after
/// `accepts` has returned. Implementations must round-trip the complete
/// structural payload, including epsilon edges and multi-target NFA sets, and
/// serialize their own writes per identifier.
pub trait AutomatonStore {
    /// Returns the automaton stored under the given id, or None when there is
    /// none.
    fn load(&self, id: &AutomatonId) -> Result<Option<Automaton>, StoreError>;

    /// Persists the structural payload under a freshly assigned identifier.
    fn save(&mut self, name: &str, automaton: &Automaton) -> Result<AutomatonId, StoreError>;

    /// Appends the outcome of a membership test to the history of the given
    /// automaton.
    fn record_test(&mut self, id: &AutomatonId, input: &str, accepted: bool) -> Result<(), StoreError>;

    /// Appends a provenance edge for a persisted derivation.
    fn record_derivation(
        &mut self,
        source: &AutomatonId,
        result: &AutomatonId,
        kind: DerivationKind,
    ) -> Result<(), StoreError>;

    /// Lists the stored automata as (id, name) pairs, newest first.
    fn list(&self) -> Vec<(AutomatonId, String)>;
}
