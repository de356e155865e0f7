use rustc_hash::FxHashMap;

use faro_utilities::VecSet;

/// A partition of a state set into disjoint non-empty blocks.
///
/// The invariants are that the union of all blocks is the original set and
/// that every state belongs to exactly one block. Empty blocks handed to the
/// constructor are dropped so block indices always point at real blocks.
pub struct BlockPartition {
    blocks: Vec<VecSet<String>>,
    block_of: FxHashMap<String, usize>,
}

impl BlockPartition {
    /// Creates a partition from the given blocks, dropping empty ones.
    pub fn new(blocks: Vec<VecSet<String>>) -> Self {
        let blocks: Vec<VecSet<String>> = blocks.into_iter().filter(|block| !block.is_empty()).collect();

        let mut block_of = FxHashMap::default();
        for (index, block) in blocks.iter().enumerate() {
            for state in block {
                let previous = block_of.insert(state.clone(), index);
                debug_assert!(previous.is_none(), "State '{state}' appears in two blocks");
            }
        }

        Self { blocks, block_of }
    }

    /// Returns the number of blocks.
    pub fn num_of_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the index of the block containing the given state, or None when
    /// the state is not part of the partitioned set.
    pub fn block_number(&self, state: &str) -> Option<usize> {
        self.block_of.get(state).copied()
    }

    /// Returns the block with the given index.
    pub fn block(&self, index: usize) -> &VecSet<String> {
        &self.blocks[index]
    }

    /// Returns an iterator over the blocks.
    pub fn iter(&self) -> impl Iterator<Item = &VecSet<String>> {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_partition_drops_empty_blocks() {
        let partition = BlockPartition::new(vec![
            VecSet::new(),
            VecSet::singleton("q0".to_string()),
            ["q1".to_string(), "q2".to_string()].into_iter().collect(),
        ]);

        assert_eq!(partition.num_of_blocks(), 2);
        assert_eq!(partition.block_number("q0"), Some(0));
        assert_eq!(partition.block_number("q1"), partition.block_number("q2"));
        assert_eq!(partition.block_number("q9"), None);
    }
}
