use std::collections::BTreeMap;
use std::collections::VecDeque;

use log::debug;
use rustc_hash::FxHashMap;

use faro_automata::Automaton;
use faro_automata::AutomatonBuilder;
use faro_automata::AutomatonError;
use faro_automata::AutomatonKind;

use faro_utilities::VecSet;

use crate::BlockPartition;

/// The per-symbol behaviour of a state under a partition: for every alphabet
/// symbol the block its transition lands in, or None when the transition is
/// undefined. The None entries form the conceptual trap class without ever
/// materializing a trap state.
type Signature = Vec<Option<usize>>;

/// Minimizes a structurally deterministic automaton by equivalence-partition
/// refinement.
///
/// Returns `NotADeterministicAutomaton` for input that fails the structural
/// check; combining determinization with minimization is the caller's
/// decision, never an implicit step. States unreachable from the start state
/// are discarded before partitioning since they would corrupt the equivalence
/// classes. The final blocks become states `s0, s1, ...` numbered in
/// breadth-first order from the start block over the sorted alphabet, so two
/// automata recognizing the same language minimize to structurally identical
/// results.
pub fn minimize(automaton: &Automaton) -> Result<Automaton, AutomatonError> {
    if !automaton.is_structurally_deterministic() {
        return Err(AutomatonError::NotADeterministicAutomaton(
            "minimization requires a structurally deterministic transition relation".to_string(),
        ));
    }

    let reachable = reachable_states(automaton);
    if reachable.is_empty() {
        return Err(AutomatonError::NoReachableStates);
    }
    debug!(
        "Discarded {} unreachable states",
        automaton.states().len() - reachable.len()
    );

    let partition = refine(automaton, &reachable);
    debug!(
        "Partition refinement merged {} states into {} blocks",
        reachable.len(),
        partition.num_of_blocks()
    );

    rebuild(automaton, &partition)
}

/// Returns the set of states reachable from the start state by alphabet
/// symbols.
fn reachable_states(automaton: &Automaton) -> VecSet<String> {
    let mut reachable = VecSet::new();
    let mut worklist = VecDeque::new();

    reachable.insert(automaton.start().to_string());
    worklist.push_back(automaton.start().to_string());

    while let Some(state) = worklist.pop_front() {
        for symbol in automaton.alphabet() {
            for target in automaton.transitions_from(&state, symbol) {
                if reachable.insert(target.clone()) {
                    worklist.push_back(target.clone());
                }
            }
        }
    }

    reachable
}

/// Refines the accepting/non-accepting split of the reachable states until no
/// block splits anymore.
///
/// Every pass splits every block by the full signature over all alphabet
/// symbols; splitting on the first distinguishing symbol alone is not
/// guaranteed to reach the coarsest stable partition in one pass. Each
/// changed pass strictly increases the number of blocks, which is bounded by
/// the number of states, so the loop reaches the fixed point.
fn refine(automaton: &Automaton, reachable: &VecSet<String>) -> BlockPartition {
    let accepting: VecSet<String> = reachable
        .iter()
        .filter(|state| automaton.accepting().contains(state.as_str()))
        .cloned()
        .collect();
    let rejecting: VecSet<String> = reachable
        .iter()
        .filter(|state| !automaton.accepting().contains(state.as_str()))
        .cloned()
        .collect();

    let mut partition = BlockPartition::new(vec![accepting, rejecting]);

    loop {
        let mut changed = false;
        let mut blocks = Vec::new();

        for block in partition.iter() {
            // Group the block members by their behaviour under the current
            // partition; the BTreeMap keeps the sub-block order deterministic.
            let mut groups: BTreeMap<Signature, VecSet<String>> = BTreeMap::new();
            for state in block {
                groups
                    .entry(signature(automaton, &partition, state))
                    .or_default()
                    .insert(state.clone());
            }

            if groups.len() > 1 {
                changed = true;
            }
            blocks.extend(groups.into_values());
        }

        partition = BlockPartition::new(blocks);
        if !changed {
            return partition;
        }
    }
}

/// Returns the signature of a state: the destination block per alphabet
/// symbol in sorted symbol order.
fn signature(automaton: &Automaton, partition: &BlockPartition, state: &str) -> Signature {
    automaton
        .alphabet()
        .iter()
        .map(|symbol| {
            automaton
                .transitions_from(state, symbol)
                .next()
                .and_then(|target| partition.block_number(target))
        })
        .collect()
}

/// Builds the minimized automaton from the final partition.
///
/// Blocks are renumbered in breadth-first discovery order starting from the
/// block containing the start state, following the alphabet in sorted order.
/// Since every block holds only reachable states, the traversal numbers every
/// block. Each block takes the transitions of one representative member; the
/// members are equivalent, so the choice does not matter.
fn rebuild(automaton: &Automaton, partition: &BlockPartition) -> Result<Automaton, AutomatonError> {
    let start_block = partition
        .block_number(automaton.start())
        .ok_or(AutomatonError::NoReachableStates)?;

    // Breadth-first renumbering of the blocks.
    let mut numbering: FxHashMap<usize, usize> = FxHashMap::default();
    let mut worklist = VecDeque::new();
    numbering.insert(start_block, 0);
    worklist.push_back(start_block);

    while let Some(block) = worklist.pop_front() {
        let representative = partition.block(block).first().expect("Blocks are never empty");

        for symbol in automaton.alphabet() {
            if let Some(target) = automaton.transitions_from(representative, symbol).next() {
                let target_block = partition
                    .block_number(target)
                    .expect("Transitions of reachable states stay within the partition");

                let next_number = numbering.len();
                numbering.entry(target_block).or_insert_with(|| {
                    worklist.push_back(target_block);
                    next_number
                });
            }
        }
    }
    debug_assert_eq!(
        numbering.len(),
        partition.num_of_blocks(),
        "Every block holds reachable states, so the traversal must number all of them"
    );

    let block_name = |block: usize| format!("s{}", numbering[&block]);

    let mut builder = AutomatonBuilder::new(AutomatonKind::Dfa);
    for symbol in automaton.alphabet() {
        builder.add_symbol(symbol);
    }
    builder.set_start(&block_name(start_block));

    for (index, block) in partition.iter().enumerate() {
        let name = block_name(index);
        builder.add_state(&name);

        if block.intersects(automaton.accepting()) {
            builder.add_accepting(&name);
        }

        let representative = block.first().expect("Blocks are never empty");
        for symbol in automaton.alphabet() {
            if let Some(target) = automaton.transitions_from(representative, symbol).next() {
                let target_block = partition
                    .block_number(target)
                    .expect("Transitions of reachable states stay within the partition");
                builder.add_transition(&name, symbol, &block_name(target_block));
            }
        }
    }

    builder.finish()
}
