use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;

use log::info;
use regex::Regex;
use thiserror::Error;

use faro_utilities::FaroError;

use crate::Automaton;
use crate::AutomatonBuilder;
use crate::AutomatonKind;

#[derive(Error, Debug)]
pub enum IOError {
    #[error("Invalid .fa header {0}")]
    InvalidHeader(&'static str),

    #[error("Invalid .fa line {0}")]
    InvalidLine(String),

    #[error("Invalid transition {0}")]
    InvalidTransition(String),
}

/// Loads an automaton in the .fa format from the given reader. The reader is
/// buffered internally.
///
/// The format consists of a header `fa (<kind>, <num_of_states>,
/// <num_of_transitions>)` with kind either `DFA` or `NFA`, followed by the
/// sections:
///
/// ```text
/// states <name>...
/// alphabet <symbol>...
/// start <name>
/// accepting <name>...
/// ```
///
/// and one line per transition edge, either `(<from>, "<symbol>", <to>)` or
/// `(<from>, <symbol>, <to>)`. Epsilon edges use the symbol `ε`. The payload
/// is validated on load, so corrupt data fails closed instead of producing a
/// partially-valid automaton.
pub fn read_fa(reader: impl Read) -> Result<Automaton, FaroError> {
    info!("Reading automaton in .fa format...");

    let mut lines = BufReader::new(reader)
        .lines()
        .collect::<Result<Vec<String>, _>>()?
        .into_iter()
        .filter(|line| !line.trim().is_empty());

    let header = lines
        .next()
        .ok_or(IOError::InvalidHeader("The first line should be the header"))?;

    // Regex for fa (<kind>, <num_of_states>, <num_of_transitions>)
    let header_regex = Regex::new(r#"fa\s*\(\s*(DFA|NFA)\s*,\s*([0-9]*)\s*,\s*([0-9]*)\s*\)\s*"#)
        .expect("Regex compilation should not fail");

    let (_, [kind_txt, num_of_states_txt, num_of_transitions_txt]) = header_regex
        .captures(&header)
        .ok_or(IOError::InvalidHeader(
            "does not match fa (<kind>, <num_of_states>, <num_of_transitions>)",
        ))?
        .extract();

    let kind = match kind_txt {
        "DFA" => AutomatonKind::Dfa,
        _ => AutomatonKind::Nfa,
    };
    let num_of_states: usize = num_of_states_txt.parse()?;
    let num_of_transitions: usize = num_of_transitions_txt.parse()?;

    let mut builder = AutomatonBuilder::new(kind);
    for line in lines {
        let line = line.trim();

        if let Some(states) = line.strip_prefix("states") {
            for state in states.split_whitespace() {
                builder.add_state(state);
            }
        } else if let Some(symbols) = line.strip_prefix("alphabet") {
            for symbol in symbols.split_whitespace() {
                builder.add_symbol(symbol);
            }
        } else if let Some(start) = line.strip_prefix("start") {
            builder.set_start(start.trim());
        } else if let Some(accepting) = line.strip_prefix("accepting") {
            for state in accepting.split_whitespace() {
                builder.add_accepting(state);
            }
        } else if line.starts_with('(') {
            let (from, symbol, to) =
                read_transition(line).ok_or_else(|| IOError::InvalidTransition(line.to_string()))?;
            builder.add_transition(from, symbol, to);
        } else {
            return Err(IOError::InvalidLine(line.to_string()).into());
        }
    }

    let automaton = builder.finish()?;

    // The declared counts guard against truncated payloads.
    if automaton.states().len() != num_of_states {
        return Err(IOError::InvalidHeader("the declared state count does not match").into());
    }
    if automaton.num_of_transitions() != num_of_transitions {
        return Err(IOError::InvalidHeader("the declared transition count does not match").into());
    }

    info!("Finished reading automaton");

    Ok(automaton)
}

/// Dedicated function to parse the following transition formats:
///     `(<from>, "<symbol>", <to>)`
///     `(<from>, <symbol>, <to>)`
fn read_transition(input: &str) -> Option<(&str, &str, &str)> {
    let start_paren = input.find('(')?;
    let end_paren = input.rfind(')')?;

    // The quoted form is parsed around the quotes, since state names may
    // themselves contain commas (canonical subset names do).
    if let Some(start_quote) = input.find('"') {
        let end_quote = input.rfind('"')?;
        if start_quote == end_quote {
            return None;
        }

        let from = input.get(start_paren + 1..start_quote)?.trim().strip_suffix(',')?.trim();
        let symbol = input.get(start_quote + 1..end_quote)?;
        let to = input.get(end_quote + 1..end_paren)?.trim().strip_prefix(',')?.trim();

        if from.is_empty() || to.is_empty() {
            return None;
        }
        return Some((from, symbol, to));
    }

    // Unquoted fallback, where no field may contain a comma itself.
    let start_comma = input.find(',')?;
    let start_second_comma = input.rfind(',')?;
    if start_comma == start_second_comma {
        return None;
    }

    let from = input.get(start_paren + 1..start_comma)?.trim();
    let symbol = input.get(start_comma + 1..start_second_comma)?.trim();
    let to = input.get(start_second_comma + 1..end_paren)?.trim();

    if from.is_empty() || symbol.is_empty() || to.is_empty() {
        return None;
    }

    Some((from, symbol, to))
}

/// Writes an automaton in the .fa format to the given writer. The writer is
/// buffered internally. The output is deterministic: states, symbols and
/// edges appear in sorted order.
pub fn write_fa(writer: &mut impl Write, automaton: &Automaton) -> Result<(), FaroError> {
    let mut writer = BufWriter::new(writer);

    writeln!(
        writer,
        "fa ({}, {}, {})",
        automaton.kind(),
        automaton.states().len(),
        automaton.num_of_transitions()
    )?;

    write!(writer, "states")?;
    for state in automaton.states() {
        write!(writer, " {state}")?;
    }
    writeln!(writer)?;

    write!(writer, "alphabet")?;
    for symbol in automaton.alphabet() {
        write!(writer, " {symbol}")?;
    }
    writeln!(writer)?;

    writeln!(writer, "start {}", automaton.start())?;

    write!(writer, "accepting")?;
    for state in automaton.accepting() {
        write!(writer, " {state}")?;
    }
    writeln!(writer)?;

    for (from, symbol, to) in automaton.transition_edges() {
        writeln!(writer, "({from}, \"{symbol}\", {to})")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::EPSILON;

    #[test]
    fn test_reading_fa() {
        let file = "\
fa (NFA, 3, 3)
states q0 q1 q2
alphabet a b
start q0
accepting q2
(q0, \"a\", q0)
(q0, \"a\", q1)
(q1, \"b\", q2)
";

        let automaton = read_fa(file.as_bytes()).unwrap();

        assert_eq!(automaton.kind(), AutomatonKind::Nfa);
        assert_eq!(automaton.states().len(), 3);
        assert_eq!(automaton.num_of_transitions(), 3);
        assert_eq!(automaton.start(), "q0");
        assert!(automaton.accepts(["a", "b"]).unwrap());
    }

    #[test]
    fn test_reading_unquoted_symbols() {
        let file = "\
fa (DFA, 2, 1)
states q0 q1
alphabet a
start q0
accepting q1
(q0, a, q1)
";

        let automaton = read_fa(file.as_bytes()).unwrap();
        assert!(automaton.accepts(["a"]).unwrap());
    }

    #[test]
    fn test_fa_failure() {
        let wrong_header = "\
des (0, 2, 3)
states q0
";
        assert!(read_fa(wrong_header.as_bytes()).is_err());

        let wrong_transition = "\
fa (DFA, 1, 1)
states q0
alphabet a
start q0
accepting
(q0, \"a\"
";
        assert!(read_fa(wrong_transition.as_bytes()).is_err());
    }

    #[test]
    fn test_corrupt_payload_fails_closed() {
        // The transition references a state that was never declared.
        let dangling = "\
fa (DFA, 1, 1)
states q0
alphabet a
start q0
accepting
(q0, \"a\", q9)
";
        assert!(read_fa(dangling.as_bytes()).is_err());

        // The declared state count disagrees with the payload.
        let truncated = "\
fa (DFA, 2, 0)
states q0
alphabet a
start q0
accepting
";
        assert!(read_fa(truncated.as_bytes()).is_err());
    }

    #[test]
    fn test_writing_fa() {
        let file = "\
fa (NFA, 3, 3)
states q0 q1 q2
alphabet a b
start q0
accepting q2
(q0, \"a\", q0)
(q0, \"a\", q1)
(q1, \"b\", q2)
";
        let original = read_fa(file.as_bytes()).unwrap();

        // Check that it can be read back after writing, and results in the
        // same automaton.
        let mut buffer: Vec<u8> = Vec::new();
        write_fa(&mut buffer, &original).unwrap();
        let automaton = read_fa(&buffer[0..]).unwrap();

        assert_eq!(automaton, original);
    }

    #[test]
    fn test_subset_state_names_round_trip() {
        // Canonical subset names contain commas; the quoted symbol keeps the
        // transition lines unambiguous.
        let mut builder = AutomatonBuilder::new(AutomatonKind::Dfa);
        builder
            .add_state("q0")
            .add_state("q0,q1")
            .add_symbol("a")
            .set_start("q0")
            .add_accepting("q0,q1")
            .add_transition("q0", "a", "q0,q1")
            .add_transition("q0,q1", "a", "q0,q1");
        let original = builder.finish().unwrap();

        let mut buffer: Vec<u8> = Vec::new();
        write_fa(&mut buffer, &original).unwrap();
        let automaton = read_fa(&buffer[0..]).unwrap();

        assert_eq!(automaton, original);
    }

    #[test]
    fn test_epsilon_and_multi_target_round_trip() {
        let mut builder = AutomatonBuilder::new(AutomatonKind::Nfa);
        builder
            .add_state("q0")
            .add_state("q1")
            .add_state("q2")
            .add_symbol("a")
            .set_start("q0")
            .add_accepting("q2")
            .add_transition("q0", EPSILON, "q1")
            .add_transition("q1", "a", "q1")
            .add_transition("q1", "a", "q2");
        let original = builder.finish().unwrap();

        let mut buffer: Vec<u8> = Vec::new();
        write_fa(&mut buffer, &original).unwrap();
        let automaton = read_fa(&buffer[0..]).unwrap();

        assert_eq!(automaton, original);
        assert!(!automaton.is_structurally_deterministic());
    }
}
