use crate::datastructures::BitSet;

fn bit_length(x: usize) -> usize {
    (usize::BITS - x.leading_zeros()) as usize
}

/// Superset index over `(open region, separator)` pairs, split into layers by how much room
/// the separator leaves below `target_width + 1`.
///
/// Layer `i` holds entries whose margin `target_width + 1 - |separator|` is below `2^i`, so
/// a query can stop descending into a layer as soon as the counted overlap with the query
/// separator exceeds `2^i - 1`.
#[derive(Debug)]
pub struct LayeredSieve {
    target_width: usize,
    sieves: Vec<BlockSieve>,
}

impl LayeredSieve {
    pub fn new(n: usize, target_width: usize) -> Self {
        let layers = bit_length(target_width + 1) + 1;
        let sieves = (0..layers)
            .map(|i| BlockSieve::new(n, target_width, (1 << i) - 1))
            .collect();
        Self {
            target_width,
            sieves,
        }
    }

    pub fn put(&mut self, open_region: &BitSet, separator: BitSet) {
        let margin = (self.target_width + 1).saturating_sub(separator.cardinality());
        self.sieves[bit_length(margin)].put(open_region, separator);
    }

    /// Every registered separator whose open region contains `component` and for which
    /// `|separator| + |open region ∩ query separator| <= target_width + 1`. For a genuine block
    /// the left side is the size of the union of both separators.
    pub fn collect_superblocks(&self, component: &BitSet, separator: &BitSet) -> Vec<BitSet> {
        let mut collector = Vec::new();
        for sieve in &self.sieves {
            sieve.collect(component, separator, &mut collector);
        }
        collector
    }

    pub fn len(&self) -> usize {
        self.sieves.iter().map(|s| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Trie over the 8-bit chunks of the open region, one level per chunk.
#[derive(Debug)]
struct BlockSieve {
    root: SieveNode,
    last: usize,
    target_width: usize,
    margin: usize,
    size: usize,
}

impl BlockSieve {
    fn new(n: usize, target_width: usize, margin: usize) -> Self {
        Self {
            root: SieveNode::default(),
            last: (n.max(1) + 7) / 8 - 1,
            target_width,
            margin,
            size: 0,
        }
    }

    fn put(&mut self, key: &BitSet, value: BitSet) {
        if self.root.put(key, 0, self.last, value) {
            self.size += 1;
        }
    }

    fn collect(&self, component: &BitSet, separator: &BitSet, collector: &mut Vec<BitSet>) {
        let query = Query {
            component,
            separator,
            last: self.last,
            capacity: self.target_width + 1,
            margin: self.margin,
        };
        self.root.filter_superblocks(&query, 0, 0, collector);
    }

    fn len(&self) -> usize {
        self.size
    }
}

struct Query<'a> {
    component: &'a BitSet,
    separator: &'a BitSet,
    last: usize,
    capacity: usize,
    margin: usize,
}

/// Labels are kept sorted; inner nodes carry one child per label, leaves one value.
#[derive(Debug, Default)]
struct SieveNode {
    labels: Vec<u8>,
    children: Vec<SieveNode>,
    values: Vec<BitSet>,
}

impl SieveNode {
    /// Returns false if the key was present already.
    fn put(&mut self, key: &BitSet, depth: usize, last: usize, value: BitSet) -> bool {
        let bits = key.chunk(depth);
        match self.labels.binary_search(&bits) {
            Ok(idx) => {
                if depth == last {
                    false
                } else {
                    self.children[idx].put(key, depth + 1, last, value)
                }
            }
            Err(idx) => {
                self.labels.insert(idx, bits);
                if depth == last {
                    self.values.insert(idx, value);
                } else {
                    let mut child = SieveNode::default();
                    child.put(key, depth + 1, last, value);
                    self.children.insert(idx, child);
                }
                true
            }
        }
    }

    fn filter_superblocks(
        &self,
        query: &Query,
        depth: usize,
        intersects: usize,
        collector: &mut Vec<BitSet>,
    ) {
        let bits = query.component.chunk(depth);
        let neighbor = query.separator.chunk(depth);
        let is_leaf = depth == query.last;
        for (idx, label) in self.labels.iter().copied().enumerate().rev() {
            if bits > label {
                break;
            }
            if bits & !label != 0 {
                continue;
            }
            let intersects = intersects + (label & neighbor).count_ones() as usize;
            if is_leaf {
                if intersects + self.values[idx].cardinality() <= query.capacity {
                    collector.push(self.values[idx].clone());
                }
            } else if intersects <= query.margin {
                self.children[idx].filter_superblocks(query, depth + 1, intersects, collector);
            }
        }
    }
}
