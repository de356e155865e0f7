use std::collections::VecDeque;

use itertools::Itertools;
use log::debug;
use rustc_hash::FxHashSet;

use faro_automata::Automaton;
use faro_automata::AutomatonBuilder;
use faro_automata::AutomatonError;
use faro_automata::AutomatonKind;

use faro_utilities::VecSet;

/// The delimiter joining member names into a canonical subset name.
const SUBSET_DELIMITER: &str = ",";

/// Converts the automaton into a language-equivalent deterministic one using
/// breadth-first subset construction.
///
/// Every reachable set of source states becomes one state of the result,
/// canonically named by sorting the member names and joining them with a
/// comma, so two search paths reaching the same set collapse into the same
/// state. A symbol without successors leaves the transition undefined instead
/// of routing to a trap state. The result is declared `Dfa`, its alphabet is
/// the source alphabet, and epsilon transitions are consumed by the closure
/// computation and never appear in it.
///
/// A structurally deterministic input, which by that check has no epsilon
/// transitions to strip, is returned as a fresh copy re-tagged as a DFA.
pub fn determinize(automaton: &Automaton) -> Result<Automaton, AutomatonError> {
    if automaton.is_structurally_deterministic() {
        debug!("The input is already deterministic, re-tagging a copy");
        return Automaton::new(
            automaton.states().clone(),
            automaton.alphabet().clone(),
            automaton.transitions().clone(),
            automaton.start().to_string(),
            automaton.accepting().clone(),
            AutomatonKind::Dfa,
        );
    }

    let initial = automaton.epsilon_closure(&VecSet::singleton(automaton.start().to_string()));
    if initial.is_empty() {
        return Err(AutomatonError::EmptyAutomaton);
    }

    let mut builder = AutomatonBuilder::new(AutomatonKind::Dfa);
    for symbol in automaton.alphabet() {
        builder.add_symbol(symbol);
    }

    let initial_name = canonical_name(&initial);
    builder.add_state(&initial_name);
    builder.set_start(&initial_name);
    if initial.intersects(automaton.accepting()) {
        builder.add_accepting(&initial_name);
    }

    // The FIFO worklist of frontier subsets; every distinct subset is visited
    // once, so the construction terminates.
    let mut visited: FxHashSet<String> = FxHashSet::default();
    visited.insert(initial_name);
    let mut worklist: VecDeque<VecSet<String>> = VecDeque::new();
    worklist.push_back(initial);

    while let Some(subset) = worklist.pop_front() {
        let name = canonical_name(&subset);

        for symbol in automaton.alphabet() {
            let mut reached = VecSet::new();
            for state in &subset {
                reached.extend(automaton.transitions_from(state, symbol).cloned());
            }

            if reached.is_empty() {
                // Reject by omission: the transition stays undefined.
                continue;
            }

            let target = automaton.epsilon_closure(&reached);
            let target_name = canonical_name(&target);

            if visited.insert(target_name.clone()) {
                builder.add_state(&target_name);
                if target.intersects(automaton.accepting()) {
                    builder.add_accepting(&target_name);
                }
                worklist.push_back(target);
            }

            builder.add_transition(&name, symbol, &target_name);
        }
    }

    debug!("Subset construction visited {} subsets", visited.len());

    builder.finish()
}

/// Returns the canonical name of a subset of states: the member names in
/// sorted order, joined with a fixed delimiter.
fn canonical_name(subset: &VecSet<String>) -> String {
    subset.iter().join(SUBSET_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use faro_automata::EPSILON;
    use faro_automata::random_input;
    use faro_automata::random_nfa;
    use faro_utilities::random_test;

    /// The NFA over {a, b} accepting exactly the words ending in "ab":
    /// q0 -a-> {q0, q1}, q1 -b-> {q2}.
    fn sample_nfa() -> Automaton {
        let mut builder = AutomatonBuilder::new(AutomatonKind::Nfa);
        builder
            .add_state("q0")
            .add_state("q1")
            .add_state("q2")
            .add_symbol("a")
            .add_symbol("b")
            .set_start("q0")
            .add_accepting("q2")
            .add_transition("q0", "a", "q0")
            .add_transition("q0", "a", "q1")
            .add_transition("q1", "b", "q2");
        builder.finish().unwrap()
    }

    #[test]
    fn test_subset_construction_reachable_subsets() {
        let dfa = determinize(&sample_nfa()).unwrap();

        // Exactly the subsets {q0}, {q0,q1} and {q2} are reachable.
        assert_eq!(dfa.states().len(), 3);
        assert!(dfa.states().contains("q0"));
        assert!(dfa.states().contains("q0,q1"));
        assert!(dfa.states().contains("q2"));

        // The subset {q2} has no outgoing transitions.
        assert_eq!(dfa.transitions_from("q2", "a").count(), 0);
        assert_eq!(dfa.transitions_from("q2", "b").count(), 0);

        assert_eq!(dfa.kind(), AutomatonKind::Dfa);
        assert!(dfa.is_structurally_deterministic());
    }

    #[test]
    fn test_subset_construction_preserves_the_language() {
        let nfa = sample_nfa();
        let dfa = determinize(&nfa).unwrap();

        for input in [vec![], vec!["a"], vec!["b"], vec!["a", "b"], vec!["a", "a", "b"], vec!["a", "b", "a"]] {
            assert_eq!(
                nfa.accepts(input.iter().copied()).unwrap(),
                dfa.accepts(input.iter().copied()).unwrap(),
                "the language differs on {input:?}"
            );
        }
    }

    #[test]
    fn test_epsilon_transitions_are_stripped() {
        // Deterministic on the alphabet, but with an epsilon edge that must
        // force the construction path.
        let mut builder = AutomatonBuilder::new(AutomatonKind::Nfa);
        builder
            .add_state("q0")
            .add_state("q1")
            .add_state("q2")
            .add_symbol("a")
            .set_start("q0")
            .add_accepting("q2")
            .add_transition("q0", EPSILON, "q1")
            .add_transition("q1", "a", "q2");
        let nfa = builder.finish().unwrap();

        let dfa = determinize(&nfa).unwrap();

        assert!(dfa.is_structurally_deterministic());
        assert!(!dfa.alphabet().contains(EPSILON));
        assert!(dfa.accepts(["a"]).unwrap());
        assert!(!dfa.accepts([]).unwrap());
    }

    #[test]
    fn test_deterministic_input_is_retagged() {
        let mut builder = AutomatonBuilder::new(AutomatonKind::Nfa);
        builder
            .add_state("q0")
            .add_state("q1")
            .add_symbol("a")
            .set_start("q0")
            .add_accepting("q1")
            .add_transition("q0", "a", "q1");
        let nfa = builder.finish().unwrap();

        let dfa = determinize(&nfa).unwrap();

        assert_eq!(dfa.kind(), AutomatonKind::Dfa);
        assert_eq!(dfa.states(), nfa.states());
        assert_eq!(dfa.num_of_transitions(), nfa.num_of_transitions());
    }

    #[test]
    fn test_random_subset_construction_preserves_the_language() {
        random_test(100, |rng| {
            let nfa = random_nfa(rng, 6, 2, 2, 1);
            let dfa = determinize(&nfa).unwrap();

            assert!(dfa.is_structurally_deterministic());

            for length in 0..6 {
                let input = random_input(rng, nfa.alphabet(), length);
                assert_eq!(
                    nfa.accepts(input.iter().copied()).unwrap(),
                    dfa.accepts(input.iter().copied()).unwrap(),
                    "the language differs on {input:?}"
                );
            }
        });
    }
}
