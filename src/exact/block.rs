use crate::datastructures::BitSet;
use crate::graph::BitGraph;
use fxhash::FxHashMap;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::ops::Index;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockId(usize);

/// A connected vertex set together with its open neighborhood.
///
/// `outbound` holds the component of `V \ separator` that faces away from the rest of the
/// decomposition. It is `None` iff the separator is not a minimal separator, i.e. no other
/// component has the full separator as neighborhood.
#[derive(Clone, PartialEq, Eq)]
pub struct Block {
    pub component: BitSet,
    pub separator: BitSet,
    pub outbound: Option<BitSet>,
}

impl Debug for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let t = if self.is_outbound() { "o" } else { "f/i" };
        write!(f, "{}{:?}({:?})", t, self.component, self.separator)
    }
}

impl Block {
    pub fn new(component: BitSet, graph: &BitGraph) -> Self {
        let separator = graph.neighbor_set(&component);
        let mut rest = graph.all();
        rest.and_not(&component);
        rest.and_not(&separator);

        let mut block = Self {
            component,
            separator,
            outbound: None,
        };
        let min_component = block.min_vertex().unwrap_or(usize::MAX);
        let mut v = rest.get_first_set();
        while let Some(start) = v {
            let region = graph.footprint(start, &block.separator);
            if block.separator.is_subset_of(&region) {
                block.outbound = if start < min_component {
                    Some(region.subtract(&block.separator))
                } else {
                    Some(block.component.clone())
                };
                break;
            }
            rest.and_not(&region);
            v = rest.get_next_set(start + 1);
        }
        block
    }

    pub fn is_outbound(&self) -> bool {
        self.outbound.as_ref() == Some(&self.component)
    }

    pub fn of_minimal_separator(&self) -> bool {
        self.outbound.is_some()
    }

    pub fn min_vertex(&self) -> Option<usize> {
        self.component.get_first_set()
    }
}

/// Arena of every [`Block`] created during one decomposition, one per component.
#[derive(Debug, Default)]
pub struct BlockTable {
    blocks: Vec<Block>,
    index: FxHashMap<BitSet, BlockId>,
}

impl Index<BlockId> for BlockTable {
    type Output = Block;

    fn index(&self, id: BlockId) -> &Self::Output {
        &self.blocks[id.0]
    }
}

impl BlockTable {
    pub fn get(&self, component: &BitSet) -> Option<BlockId> {
        self.index.get(component).copied()
    }

    pub fn get_or_create(&mut self, component: &BitSet, graph: &BitGraph) -> BlockId {
        if let Some(id) = self.index.get(component) {
            return *id;
        }
        let id = BlockId(self.blocks.len());
        self.blocks.push(Block::new(component.clone(), graph));
        self.index.insert(component.clone(), id);
        id
    }

    /// Blocks of all components of `V \ separator`, ordered by their smallest vertex.
    pub fn separate_into_blocks(&mut self, separator: &BitSet, graph: &BitGraph) -> Vec<BlockId> {
        graph
            .components(separator)
            .iter()
            .map(|component| self.get_or_create(component, graph))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
