use log::debug;

use faro_automata::Automaton;

use crate::AutomatonId;
use crate::AutomatonStore;
use crate::DerivationKind;
use crate::DerivationRecord;
use crate::StoreError;
use crate::TestRecord;

/// An in-memory implementation of the persistence gateway.
///
/// The store value owns the identifier registry and both history logs, so
/// listing automata goes through an explicit object instead of any global
/// state. Writes take the receiver exclusively, which gives the
/// at-most-one-writer-per-identifier guarantee for free.
#[derive(Default)]
pub struct MemoryStore {
    /// The stored automata in insertion order.
    automata: Vec<(AutomatonId, String, Automaton)>,
    tests: Vec<TestRecord>,
    derivations: Vec<DerivationRecord>,
    next_id: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded membership tests for the given automaton, oldest
    /// first.
    pub fn tests_for<'a>(&'a self, id: &'a AutomatonId) -> impl Iterator<Item = &'a TestRecord> {
        self.tests.iter().filter(move |record| record.automaton == *id)
    }

    /// Returns the recorded derivations that used the given automaton as
    /// their source, oldest first.
    pub fn derivations_of<'a>(
        &'a self,
        source: &'a AutomatonId,
    ) -> impl Iterator<Item = &'a DerivationRecord> {
        self.derivations.iter().filter(move |record| record.source == *source)
    }

    /// Assigns the next public identifier.
    fn make_public_id(&mut self) -> AutomatonId {
        self.next_id += 1;
        AutomatonId::new(format!("FA{:04}", self.next_id))
    }

    fn contains(&self, id: &AutomatonId) -> bool {
        self.automata.iter().any(|(stored, _, _)| stored == id)
    }
}

impl AutomatonStore for MemoryStore {
    fn load(&self, id: &AutomatonId) -> Result<Option<Automaton>, StoreError> {
        Ok(self
            .automata
            .iter()
            .find(|(stored, _, _)| stored == id)
            .map(|(_, _, automaton)| automaton.clone()))
    }

    fn save(&mut self, name: &str, automaton: &Automaton) -> Result<AutomatonId, StoreError> {
        let id = self.make_public_id();
        debug!("Storing automaton '{name}' as {id}");

        self.automata.push((id.clone(), name.to_string(), automaton.clone()));
        Ok(id)
    }

    fn record_test(&mut self, id: &AutomatonId, input: &str, accepted: bool) -> Result<(), StoreError> {
        if !self.contains(id) {
            return Err(StoreError::UnknownId(id.as_str().to_string()));
        }

        self.tests.push(TestRecord {
            automaton: id.clone(),
            input: input.to_string(),
            accepted,
        });
        Ok(())
    }

    fn record_derivation(
        &mut self,
        source: &AutomatonId,
        result: &AutomatonId,
        kind: DerivationKind,
    ) -> Result<(), StoreError> {
        if !self.contains(source) {
            return Err(StoreError::UnknownId(source.as_str().to_string()));
        }
        if !self.contains(result) {
            return Err(StoreError::UnknownId(result.as_str().to_string()));
        }

        self.derivations.push(DerivationRecord {
            source: source.clone(),
            result: result.clone(),
            kind,
        });
        Ok(())
    }

    fn list(&self) -> Vec<(AutomatonId, String)> {
        self.automata
            .iter()
            .rev()
            .map(|(id, name, _)| (id.clone(), name.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use faro_automata::AutomatonBuilder;
    use faro_automata::AutomatonKind;

    fn sample_automaton() -> Automaton {
        let mut builder = AutomatonBuilder::new(AutomatonKind::Dfa);
        builder
            .add_state("q0")
            .add_state("q1")
            .add_symbol("a")
            .set_start("q0")
            .add_accepting("q1")
            .add_transition("q0", "a", "q1");
        builder.finish().unwrap()
    }

    #[test]
    fn test_save_assigns_ids_and_load_round_trips() {
        let mut store = MemoryStore::new();
        let automaton = sample_automaton();

        let first = store.save("ends-in-a", &automaton).unwrap();
        let second = store.save("ends-in-a-again", &automaton).unwrap();
        assert_ne!(first, second);

        let loaded = store.load(&first).unwrap().unwrap();
        assert_eq!(loaded, automaton);

        assert!(store.load(&AutomatonId::new("FA9999")).unwrap().is_none());
    }

    #[test]
    fn test_list_is_newest_first() {
        let mut store = MemoryStore::new();
        let automaton = sample_automaton();

        let first = store.save("first", &automaton).unwrap();
        let second = store.save("second", &automaton).unwrap();

        let listed = store.list();
        assert_eq!(listed[0], (second, "second".to_string()));
        assert_eq!(listed[1], (first, "first".to_string()));
    }

    #[test]
    fn test_history_is_append_only() {
        let mut store = MemoryStore::new();
        let automaton = sample_automaton();
        let id = store.save("sample", &automaton).unwrap();

        // The caller simulates first and records the literal outcome after.
        let accepted = automaton.accepts(["a"]).unwrap();
        store.record_test(&id, "a", accepted).unwrap();
        store.record_test(&id, "b", false).unwrap();

        let records: Vec<&TestRecord> = store.tests_for(&id).collect();
        assert_eq!(records.len(), 2);
        assert!(records[0].accepted);
        assert_eq!(records[1].input, "b");
    }

    #[test]
    fn test_derivation_provenance() {
        let mut store = MemoryStore::new();
        let automaton = sample_automaton();

        let source = store.save("source", &automaton).unwrap();
        let result = store.save("derived", &automaton).unwrap();
        store
            .record_derivation(&source, &result, DerivationKind::Determinize)
            .unwrap();

        let records: Vec<&DerivationRecord> = store.derivations_of(&source).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].result, result);
        assert_eq!(records[0].kind, DerivationKind::Determinize);
    }

    #[test]
    fn test_history_rejects_unknown_ids() {
        let mut store = MemoryStore::new();

        assert!(matches!(
            store.record_test(&AutomatonId::new("FA0001"), "a", true),
            Err(StoreError::UnknownId(_))
        ));
    }
}
