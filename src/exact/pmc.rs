use crate::datastructures::BitSet;
use crate::exact::block::{BlockId, BlockTable};
use crate::graph::BitGraph;
use fxhash::FxHashMap;
use std::fmt;
use std::fmt::{Debug, Formatter};

/// Candidate bag of a decomposition.
///
/// The components of `V \ vertex_set` split into at most one `outbound` block, which the
/// bag is attached towards, and the `inbounds` that have to be solved below it. Components
/// whose separator lies inside the outbound separator belong to neither.
#[derive(Clone)]
pub struct Pmc {
    pub vertex_set: BitSet,
    pub inbounds: Vec<BlockId>,
    pub outbound: Option<BlockId>,
    pub valid: bool,
}

impl Debug for Pmc {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let validity = if self.valid { "valid" } else { "invalid" };
        write!(
            f,
            "PMC({}) {:?} outbound: {:?} inbounds: {:?}",
            validity, self.vertex_set, self.outbound, self.inbounds
        )
    }
}

impl Pmc {
    /// `blocks` must be the blocks of `V \ vertex_set` in the order returned by
    /// [`BlockTable::separate_into_blocks`].
    pub fn new(vertex_set: BitSet, blocks: &[BlockId], table: &BlockTable, graph: &BitGraph) -> Self {
        if vertex_set.empty() {
            return Self {
                vertex_set,
                inbounds: vec![],
                outbound: None,
                valid: false,
            };
        }

        let mut outbound: Option<BlockId> = None;
        for id in blocks {
            let block = &table[*id];
            if block.is_outbound()
                && outbound.map_or(true, |o| table[o].separator.is_subset_of(&block.separator))
            {
                outbound = Some(*id);
            }
        }

        let inbounds: Vec<BlockId> = match outbound {
            None => Vec::from(blocks),
            Some(o) => blocks
                .iter()
                .copied()
                .filter(|id| !table[*id].separator.is_subset_of(&table[o].separator))
                .collect(),
        };

        let valid = Self::is_valid(&vertex_set, &inbounds, outbound, table, graph);
        Self {
            vertex_set,
            inbounds,
            outbound,
            valid,
        }
    }

    fn is_valid(
        vertex_set: &BitSet,
        inbounds: &[BlockId],
        outbound: Option<BlockId>,
        table: &BlockTable,
        graph: &BitGraph,
    ) -> bool {
        if inbounds.iter().any(|id| !table[*id].of_minimal_separator()) {
            return false;
        }
        let outbound_separator = outbound.map(|o| &table[o].separator);
        for v in vertex_set.iter() {
            let mut rest = vertex_set.subtract(graph.neighborhood_as_bitset(v));
            rest.unset_bit(v);
            if let Some(separator) = outbound_separator.filter(|s| s[v]) {
                rest.and_not(separator);
            }
            for id in inbounds.iter().filter(|id| table[**id].separator[v]) {
                rest.and_not(&table[*id].separator);
            }
            if !rest.empty() {
                return false;
            }
        }
        true
    }

    /// Whether every inbound component is already solved.
    pub fn is_ready<V>(&self, table: &BlockTable, solved: &FxHashMap<BitSet, V>) -> bool {
        self.inbounds
            .iter()
            .all(|id| solved.contains_key(&table[*id].component))
    }

    /// The component this bag solves when endorsed, `None` for a terminal bag.
    pub fn target(&self, table: &BlockTable) -> Option<BitSet> {
        let outbound = self.outbound?;
        let mut target = self.vertex_set.subtract(&table[outbound].separator);
        for id in &self.inbounds {
            target.or(&table[*id].component);
        }
        Some(target)
    }
}
