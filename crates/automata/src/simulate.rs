use log::trace;

use faro_utilities::VecSet;

use crate::Automaton;
use crate::AutomatonError;
use crate::AutomatonKind;

impl Automaton {
    /// Runs the input against the automaton and returns whether it accepts.
    ///
    /// A declared DFA uses the deterministic walk, everything else the subset
    /// walk; [`Automaton::accepts_deterministic`] and
    /// [`Automaton::accepts_subset`] let a caller opt into a semantics
    /// explicitly. Every input symbol is checked against the alphabet before
    /// the walk starts, so an `UnknownSymbol` failure is reported before any
    /// state is visited and a caller recording the outcome observes a single
    /// well-defined result. The simulation itself has no side effects.
    pub fn accepts<'a, I>(&self, input: I) -> Result<bool, AutomatonError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        match self.kind() {
            AutomatonKind::Dfa => self.accepts_deterministic(input),
            AutomatonKind::Nfa => self.accepts_subset(input),
        }
    }

    /// Deterministic semantics: follow the single outgoing transition for
    /// every input symbol and reject as soon as none is defined, without
    /// consuming the remaining symbols.
    pub fn accepts_deterministic<'a, I>(&self, input: I) -> Result<bool, AutomatonError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let input = self.validated_input(input)?;

        let mut current = self.start();
        for symbol in input {
            match self.transitions_from(current, symbol).next() {
                Some(next) => current = next.as_str(),
                None => {
                    trace!("no transition from '{current}' on '{symbol}', rejecting");
                    return Ok(false);
                }
            }
        }

        Ok(self.accepting().contains(current))
    }

    /// Non-deterministic semantics: track the set of possible states, taking
    /// the epsilon closure after every consumed symbol. Rejects as soon as
    /// the set runs empty, without consuming the remaining symbols.
    pub fn accepts_subset<'a, I>(&self, input: I) -> Result<bool, AutomatonError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let input = self.validated_input(input)?;

        let mut current = self.epsilon_closure(&VecSet::singleton(self.start().to_string()));
        for symbol in input {
            let mut reached = VecSet::new();
            for state in &current {
                reached.extend(self.transitions_from(state, symbol).cloned());
            }

            if reached.is_empty() {
                trace!("no successors from {current:?} on '{symbol}', rejecting");
                return Ok(false);
            }

            current = self.epsilon_closure(&reached);
        }

        Ok(self.accepting().intersects(&current))
    }

    /// Checks every input symbol against the alphabet up front, so that an
    /// unknown symbol fails the simulation before any transition is taken.
    fn validated_input<'a, I>(&self, input: I) -> Result<Vec<&'a str>, AutomatonError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let input: Vec<&str> = input.into_iter().collect();

        for symbol in &input {
            if !self.alphabet().contains(*symbol) {
                return Err(AutomatonError::UnknownSymbol((*symbol).to_string()));
            }
        }

        Ok(input)
    }
}
