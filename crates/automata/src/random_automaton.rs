use rand::Rng;

use faro_utilities::VecSet;

use crate::Automaton;
use crate::AutomatonBuilder;
use crate::AutomatonKind;
use crate::EPSILON;

/// Generates a random NFA with the desired number of states and symbols.
///
/// Every state gets up to `outdegree` symbol transitions and up to
/// `epsilon_degree` epsilon transitions towards random states, and roughly a
/// third of the states accept. States are named `q0..qn`.
pub fn random_nfa(
    rng: &mut impl Rng,
    num_of_states: usize,
    num_of_symbols: u32,
    outdegree: usize,
    epsilon_degree: usize,
) -> Automaton {
    assert!(num_of_states > 0, "An automaton needs at least a start state.");

    let states = state_names(num_of_states);
    let symbols = symbol_names(num_of_symbols);

    let mut builder = AutomatonBuilder::new(AutomatonKind::Nfa);
    for state in &states {
        builder.add_state(state);
        if rng.random_range(0..3) == 0 {
            builder.add_accepting(state);
        }
    }
    for symbol in &symbols {
        builder.add_symbol(symbol);
    }
    builder.set_start(&states[0]);

    for state in &states {
        for _ in 0..rng.random_range(0..=outdegree) {
            let symbol = &symbols[rng.random_range(0..symbols.len())];
            let to = &states[rng.random_range(0..states.len())];
            builder.add_transition(state, symbol, to);
        }

        for _ in 0..rng.random_range(0..=epsilon_degree) {
            let to = &states[rng.random_range(0..states.len())];
            builder.add_transition(state, EPSILON, to);
        }
    }

    builder
        .finish()
        .expect("A generated automaton only references its own states and symbols")
}

/// Generates a random DFA with the desired number of states and symbols.
///
/// Every (state, symbol) pair gets at most one target; pairs are left
/// undefined with the given probability out of 100, so partial automata are
/// generated as well.
pub fn random_dfa(
    rng: &mut impl Rng,
    num_of_states: usize,
    num_of_symbols: u32,
    undefined_percentage: u32,
) -> Automaton {
    assert!(num_of_states > 0, "An automaton needs at least a start state.");

    let states = state_names(num_of_states);
    let symbols = symbol_names(num_of_symbols);

    let mut builder = AutomatonBuilder::new(AutomatonKind::Dfa);
    for state in &states {
        builder.add_state(state);
        if rng.random_range(0..3) == 0 {
            builder.add_accepting(state);
        }
    }
    for symbol in &symbols {
        builder.add_symbol(symbol);
    }
    builder.set_start(&states[0]);

    for state in &states {
        for symbol in &symbols {
            if rng.random_range(0..100) >= undefined_percentage {
                let to = &states[rng.random_range(0..states.len())];
                builder.add_transition(state, symbol, to);
            }
        }
    }

    builder
        .finish()
        .expect("A generated automaton only references its own states and symbols")
}

/// Picks a random input over the given alphabet with the given length.
pub fn random_input<'a>(
    rng: &mut impl Rng,
    alphabet: &'a VecSet<String>,
    length: usize,
) -> Vec<&'a str> {
    let symbols: Vec<&str> = alphabet.iter().map(String::as_str).collect();
    if symbols.is_empty() {
        return Vec::new();
    }

    (0..length)
        .map(|_| symbols[rng.random_range(0..symbols.len())])
        .collect()
}

/// Introduces the state names q0..qn.
fn state_names(num_of_states: usize) -> Vec<String> {
    (0..num_of_states).map(|i| format!("q{i}")).collect()
}

/// Introduces lower case letters for the symbols.
fn symbol_names(num_of_symbols: u32) -> Vec<String> {
    assert!(
        num_of_symbols < 26,
        "Too many symbols requested, we only support alphabetic symbols."
    );

    (0..num_of_symbols)
        .map(|i| {
            char::from_digit(i + 10, 36)
                .expect("Radix is less than 37, so should not panic")
                .to_string()
        })
        .collect()
}
