use crate::datastructures::BitSet;
use crate::exact::block::{BlockId, BlockTable};
use crate::exact::pmc::Pmc;
use crate::exact::sieve::LayeredSieve;
use crate::graph::{Bag, BaseGraph, BitGraph};
use crate::util::Stopper;
use fxhash::{FxHashMap, FxHashSet};
#[cfg(feature = "log")]
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Number of processed work items between two polls of the stopper.
pub const TIMEOUT_CHECK: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompositionFailure {
    UpperBoundExceeded { upper_bound: usize },
    Cancelled { target_width: usize },
}

impl Display for DecompositionFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            DecompositionFailure::UpperBoundExceeded { upper_bound } => {
                write!(f, "No decomposition of width at most {}", upper_bound)
            }
            DecompositionFailure::Cancelled { target_width } => {
                write!(f, "Cancelled while trying width {}", target_width)
            }
        }
    }
}

impl Error for DecompositionFailure {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PmcId(usize);

/// A component that is known to decompose within the current bound, rooted at the bag of
/// its endorser.
#[derive(Clone, Copy, Debug)]
pub struct MBlock {
    pub block: BlockId,
    pub endorser: PmcId,
}

/// A separator together with the full component it can still be extended into.
#[derive(Clone, Debug)]
pub struct TBlock {
    pub separator: BitSet,
    pub open_component: BitSet,
}

enum Attempt {
    Solved(Pmc),
    Exhausted,
    Cancelled,
}

/// Search state of one [`MTDecomposer::decompose`] call.
///
/// Blocks, solved blocks and their endorsers survive a failed width and are reused by the
/// next one. Extendable separators and the sieve only hold for the width they were built for.
struct DecompositionContext<'g> {
    graph: &'g BitGraph,
    target_width: usize,
    blocks: BlockTable,
    m_blocks: FxHashMap<BitSet, MBlock>,
    endorsers: Vec<Pmc>,
    t_blocks: FxHashMap<BitSet, TBlock>,
    t_block_sieve: LayeredSieve,
    ready_queue: VecDeque<BitSet>,
    pending_endorsers: Vec<Pmc>,
    pending_sets: FxHashSet<BitSet>,
    solution: Option<Pmc>,
}

impl<'g> DecompositionContext<'g> {
    fn new(graph: &'g BitGraph) -> Self {
        Self {
            graph,
            target_width: 0,
            blocks: BlockTable::default(),
            m_blocks: FxHashMap::default(),
            endorsers: Vec::new(),
            t_blocks: FxHashMap::default(),
            t_block_sieve: LayeredSieve::new(graph.order(), 0),
            ready_queue: VecDeque::new(),
            pending_endorsers: Vec::new(),
            pending_sets: FxHashSet::default(),
            solution: None,
        }
    }

    fn reset_for_width(&mut self, target_width: usize) {
        self.target_width = target_width;
        self.t_blocks.clear();
        self.t_block_sieve = LayeredSieve::new(self.graph.order(), target_width);
        self.ready_queue = self.m_blocks.keys().cloned().collect();
        self.solution = None;
    }

    fn seed_closed_neighborhoods(&mut self) {
        for v in 0..self.graph.order() {
            let closed_neighborhood = self.graph.closed_neighborhood(v);
            if closed_neighborhood.cardinality() <= self.target_width + 1 {
                self.offer_pmc(closed_neighborhood);
            }
        }
    }

    fn offer_pmc(&mut self, vertex_set: BitSet) {
        let blocks = self.blocks.separate_into_blocks(&vertex_set, self.graph);
        let pmc = Pmc::new(vertex_set, &blocks, &self.blocks, self.graph);
        self.offer(pmc);
    }

    fn offer(&mut self, pmc: Pmc) {
        if !pmc.valid {
            return;
        }
        if pmc.is_ready(&self.blocks, &self.m_blocks) {
            self.endorse(pmc);
        } else if self.pending_sets.insert(pmc.vertex_set.clone()) {
            self.pending_endorsers.push(pmc);
        }
    }

    fn endorse(&mut self, pmc: Pmc) {
        let target = match pmc.target(&self.blocks) {
            None => {
                self.solution = Some(pmc);
                return;
            }
            Some(target) => target,
        };
        // a bag whose only neighbor already covers it solves nothing
        if target.empty() || self.m_blocks.contains_key(&target) {
            return;
        }
        let block = self.blocks.get_or_create(&target, self.graph);
        let endorser = PmcId(self.endorsers.len());
        self.endorsers.push(pmc);
        self.m_blocks
            .insert(target.clone(), MBlock { block, endorser });
        self.ready_queue.push_back(target);
    }

    fn process_m_block(&mut self, component: &BitSet) {
        let m_block = match self.m_blocks.get(component) {
            Some(m_block) => *m_block,
            None => return,
        };
        let block = &self.blocks[m_block.block];
        let separator = block.separator.clone();
        let outbound = block.outbound.clone();

        if let Some(open_component) = outbound {
            self.make_simple_t_block(&separator, open_component);
        }

        let super_blocks = self
            .t_block_sieve
            .collect_superblocks(component, &separator);
        for t_separator in super_blocks {
            self.plugin(&t_separator, &separator);
        }
    }

    fn make_simple_t_block(&mut self, separator: &BitSet, open_component: BitSet) {
        if self.t_blocks.contains_key(separator) {
            return;
        }
        self.add_t_block(TBlock {
            separator: separator.clone(),
            open_component,
        });
    }

    fn add_t_block(&mut self, t_block: TBlock) {
        self.t_block_sieve
            .put(&t_block.open_component, t_block.separator.clone());
        self.t_blocks
            .insert(t_block.separator.clone(), t_block.clone());
        self.crown(&t_block);
    }

    /// Offers every bag obtained by adding the open neighbors of a single separator vertex.
    fn crown(&mut self, t_block: &TBlock) {
        for v in t_block.separator.iter() {
            let mut new_separator = self
                .graph
                .neighborhood_as_bitset(v)
                .intersect_with(&t_block.open_component);
            new_separator.or(&t_block.separator);
            if new_separator.cardinality() <= self.target_width + 1 {
                self.offer_pmc(new_separator);
            }
        }
    }

    fn plugin(&mut self, t_separator: &BitSet, m_separator: &BitSet) {
        let new_separator = t_separator.union_with(m_separator);
        let size = new_separator.cardinality();
        if size > self.target_width + 1 {
            return;
        }

        let blocks = self.blocks.separate_into_blocks(&new_separator, self.graph);
        let mut full_block: Option<BlockId> = None;
        for id in &blocks {
            if self.blocks[*id].separator.cardinality() == size {
                if full_block.is_some() {
                    return;
                }
                full_block = Some(*id);
            }
        }

        match full_block {
            None => {
                let pmc = Pmc::new(new_separator, &blocks, &self.blocks, self.graph);
                self.offer(pmc);
            }
            Some(id) => {
                if size <= self.target_width && !self.t_blocks.contains_key(&new_separator) {
                    let open_component = self.blocks[id].component.clone();
                    self.add_t_block(TBlock {
                        separator: new_separator,
                        open_component,
                    });
                }
            }
        }
    }

    /// Runs the fixpoint loop for one target width.
    fn attempt(&mut self, target_width: usize, stopper: &mut Option<Box<dyn Stopper>>) -> Attempt {
        let mut should_stop = || stopper.as_mut().map_or(false, |s| s.stop());
        if should_stop() {
            return Attempt::Cancelled;
        }
        self.reset_for_width(target_width);
        self.seed_closed_neighborhoods();

        let mut processed = 0usize;
        loop {
            if let Some(solution) = self.solution.take() {
                return Attempt::Solved(solution);
            }
            while let Some(component) = self.ready_queue.pop_front() {
                processed += 1;
                if processed % TIMEOUT_CHECK == 0 && should_stop() {
                    return Attempt::Cancelled;
                }
                self.process_m_block(&component);
                if let Some(solution) = self.solution.take() {
                    return Attempt::Solved(solution);
                }
            }

            let pending = std::mem::take(&mut self.pending_endorsers);
            for pmc in pending {
                processed += 1;
                if processed % TIMEOUT_CHECK == 0 && should_stop() {
                    return Attempt::Cancelled;
                }
                if self.solution.is_none() && pmc.is_ready(&self.blocks, &self.m_blocks) {
                    self.pending_sets.remove(&pmc.vertex_set);
                    self.endorse(pmc);
                } else {
                    self.pending_endorsers.push(pmc);
                }
            }

            if self.solution.is_none() && self.ready_queue.is_empty() {
                return Attempt::Exhausted;
            }
        }
    }

    fn carry_out_decomposition(&self, bag: &mut Bag, parent: usize, pmc: &Pmc) {
        for id in &pmc.inbounds {
            let block = &self.blocks[*id];
            let m_block = self.m_blocks.get(&block.component).unwrap_or_else(|| {
                panic!(
                    "inbound component {:?} of {:?} was never solved",
                    block.component, pmc.vertex_set
                )
            });
            let endorser = &self.endorsers[m_block.endorser.0];
            let child = bag.add_nested_bag(endorser.vertex_set.clone());
            let separator = bag.add_separator(block.separator.clone());
            bag.connect(separator, parent);
            bag.connect(separator, child);
            self.carry_out_decomposition(bag, child, endorser);
        }
    }

    #[cfg(feature = "log")]
    fn log_statistics(&self) {
        debug!(
            "width {} failed: {} t-blocks, {} sieve entries, {} m-blocks, {} pending endorsers, {} blocks",
            self.target_width,
            self.t_blocks.len(),
            self.t_block_sieve.len(),
            self.m_blocks.len(),
            self.pending_endorsers.len(),
            self.blocks.len()
        );
    }
}

/// Exact decomposer for the graph of a [`Bag`].
///
/// Starting at `lower_bound`, every target width is attempted in turn until the graph is
/// shown to decompose within it, in which case the nested bags and separators of `bag` are
/// filled with the decomposition found.
pub struct MTDecomposer<'a> {
    bag: &'a mut Bag,
    lower_bound: usize,
    upper_bound: usize,
    stopper: Option<Box<dyn Stopper>>,
}

impl<'a> MTDecomposer<'a> {
    pub fn new(bag: &'a mut Bag, lower_bound: usize, upper_bound: usize) -> Self {
        #[cfg(feature = "log")]
        if !bag.graph().is_connected(&bag.graph().all()) {
            warn!("decomposing a disconnected graph of order {}", bag.size());
        }
        Self {
            bag,
            lower_bound,
            upper_bound,
            stopper: None,
        }
    }

    pub fn with_stopper(mut self, stopper: Box<dyn Stopper>) -> Self {
        self.stopper = Some(stopper);
        self
    }

    /// Returns the width of the computed decomposition.
    pub fn decompose(&mut self) -> Result<usize, DecompositionFailure> {
        if let Some(stopper) = self.stopper.as_mut() {
            stopper.init();
        }
        let graph = self.bag.graph().clone();
        let mut context = DecompositionContext::new(&graph);
        let mut target_width = self.lower_bound;
        loop {
            if target_width > self.upper_bound {
                return Err(DecompositionFailure::UpperBoundExceeded {
                    upper_bound: self.upper_bound,
                });
            }
            if self.bag.size() <= target_width + 1 {
                self.bag.clear_decomposition();
                return Ok(target_width);
            }

            #[cfg(feature = "log")]
            info!("trying width {} on {} vertices", target_width, graph.order());
            match context.attempt(target_width, &mut self.stopper) {
                Attempt::Solved(solution) => {
                    #[cfg(feature = "log")]
                    {
                        let inbounds: Vec<&BitSet> = solution
                            .inbounds
                            .iter()
                            .map(|id| &context.blocks[*id].component)
                            .collect();
                        info!(
                            "solution for width {}: {:?} below inbounds {:?}",
                            target_width, solution.vertex_set, inbounds
                        );
                    }
                    self.bag.initialize_for_decomposition();
                    let root = self.bag.add_nested_bag(solution.vertex_set.clone());
                    context.carry_out_decomposition(self.bag, root, &solution);
                    return Ok(target_width);
                }
                Attempt::Exhausted => {
                    #[cfg(feature = "log")]
                    context.log_statistics();
                    target_width += 1;
                }
                Attempt::Cancelled => {
                    return Err(DecompositionFailure::Cancelled { target_width });
                }
            }
        }
    }
}
