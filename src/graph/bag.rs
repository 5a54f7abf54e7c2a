use crate::datastructures::BitSet;
use crate::graph::{BaseGraph, BitGraph};
use crate::tree_decomposition::{TreeDecomposition, TreeDecompositionValidationError};
use fxhash::FxHashSet;

/// A vertex set of the decomposition below a [`Bag`], linked to the separators it touches.
#[derive(Clone, Debug)]
pub struct NestedBag {
    pub vertex_set: BitSet,
    pub incident_separators: Vec<usize>,
}

/// Intersection between neighboring nested bags.
#[derive(Clone, Debug)]
pub struct Separator {
    pub vertex_set: BitSet,
    pub incident_bags: Vec<usize>,
}

/// A subgraph together with the decomposition computed for it.
///
/// `None` for the nested structure means the bag is not decomposed any further, i.e. the
/// whole vertex set forms a single bag. Incidences between nested bags and separators are
/// stored as indices in both directions.
#[derive(Clone, Debug)]
pub struct Bag {
    graph: BitGraph,
    nested_bags: Option<Vec<NestedBag>>,
    separators: Option<Vec<Separator>>,
}

impl From<BitGraph> for Bag {
    fn from(graph: BitGraph) -> Self {
        Self::new(graph)
    }
}

impl Bag {
    pub fn new(graph: BitGraph) -> Self {
        Self {
            graph,
            nested_bags: None,
            separators: None,
        }
    }

    pub fn graph(&self) -> &BitGraph {
        &self.graph
    }

    /// Number of vertices of the wrapped graph.
    pub fn size(&self) -> usize {
        self.graph.order()
    }

    /// Largest nested bag minus one, or the size of the bag itself when it is not decomposed.
    pub fn width(&self) -> usize {
        let largest = match &self.nested_bags {
            Some(nested) if !nested.is_empty() => nested
                .iter()
                .map(|b| b.vertex_set.cardinality())
                .max()
                .unwrap_or(0),
            _ => self.size(),
        };
        largest.saturating_sub(1)
    }

    pub fn nested_bags(&self) -> Option<&[NestedBag]> {
        self.nested_bags.as_deref()
    }

    pub fn separators(&self) -> Option<&[Separator]> {
        self.separators.as_deref()
    }

    pub fn initialize_for_decomposition(&mut self) {
        self.nested_bags = Some(Vec::new());
        self.separators = Some(Vec::new());
    }

    pub fn clear_decomposition(&mut self) {
        self.nested_bags = None;
        self.separators = None;
    }

    pub fn add_nested_bag(&mut self, vertex_set: BitSet) -> usize {
        let nested = self.nested_bags.get_or_insert_with(Vec::new);
        nested.push(NestedBag {
            vertex_set,
            incident_separators: Vec::new(),
        });
        nested.len() - 1
    }

    pub fn add_separator(&mut self, vertex_set: BitSet) -> usize {
        let separators = self.separators.get_or_insert_with(Vec::new);
        separators.push(Separator {
            vertex_set,
            incident_bags: Vec::new(),
        });
        separators.len() - 1
    }

    /// Links separator and nested bag in both directions.
    pub fn connect(&mut self, separator: usize, nested_bag: usize) {
        if let (Some(separators), Some(nested)) = (&mut self.separators, &mut self.nested_bags) {
            separators[separator].incident_bags.push(nested_bag);
            nested[nested_bag].incident_separators.push(separator);
        }
    }

    /// Flattens the nested structure into a tree decomposition. `labels[v]` is the name of
    /// local vertex `v` in the resulting decomposition.
    pub fn to_tree_decomposition(&self, labels: &[usize]) -> TreeDecomposition {
        let translate =
            |set: &BitSet| -> FxHashSet<usize> { set.iter().map(|v| labels[v]).collect() };
        match &self.nested_bags {
            Some(nested) if !nested.is_empty() => {
                let mut td = TreeDecomposition::default();
                for bag in nested {
                    td.add_bag(translate(&bag.vertex_set));
                }
                for separator in self.separators.iter().flatten() {
                    if let Some((first, rest)) = separator.incident_bags.split_first() {
                        for other in rest {
                            td.add_edge(*first, *other);
                        }
                    }
                }
                td
            }
            _ => TreeDecomposition::with_root(translate(&self.graph.all())),
        }
    }

    /// Checks the decomposition against the wrapped graph.
    pub fn validate(&self) -> Result<(), TreeDecompositionValidationError> {
        if let (Some(separators), Some(nested)) = (&self.separators, &self.nested_bags) {
            for (idx, separator) in separators.iter().enumerate() {
                if separator
                    .incident_bags
                    .iter()
                    .any(|b| !separator.vertex_set.is_subset_of(&nested[*b].vertex_set))
                {
                    return Err(TreeDecompositionValidationError::SeparatorNotContained(idx));
                }
            }
        }
        let labels: Vec<usize> = (0..self.size()).collect();
        self.to_tree_decomposition(&labels).verify(&self.graph)
    }
}

#[cfg(test)]
mod tests {
    use crate::datastructures::BitSet;
    use crate::graph::{Bag, BitGraph};
    use crate::tree_decomposition::TreeDecompositionValidationError;

    fn path() -> Bag {
        Bag::new(BitGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]))
    }

    #[test]
    fn undecomposed_bag_is_single_bag() {
        let bag = path();
        assert!(bag.nested_bags().is_none());
        assert_eq!(bag.size(), 4);
        assert_eq!(bag.width(), 3);
        let td = bag.to_tree_decomposition(&[10, 11, 12, 13]);
        assert_eq!(td.bags.len(), 1);
        assert_eq!(td.max_bag_size, 4);
        assert!(td.bags[0].vertex_set.contains(&13));
        assert!(bag.validate().is_ok());
    }

    #[test]
    fn nested_path_decomposition() {
        let mut bag = path();
        bag.initialize_for_decomposition();
        let a = bag.add_nested_bag(BitSet::from_slice(4, &[0, 1]));
        let b = bag.add_nested_bag(BitSet::from_slice(4, &[1, 2]));
        let c = bag.add_nested_bag(BitSet::from_slice(4, &[2, 3]));
        let s = bag.add_separator(BitSet::from_slice(4, &[1]));
        bag.connect(s, a);
        bag.connect(s, b);
        let s = bag.add_separator(BitSet::from_slice(4, &[2]));
        bag.connect(s, b);
        bag.connect(s, c);

        assert_eq!(bag.width(), 1);
        assert_eq!(bag.nested_bags().unwrap()[b].incident_separators, vec![0, 1]);
        assert_eq!(bag.separators().unwrap()[1].incident_bags, vec![b, c]);
        assert!(bag.validate().is_ok());

        bag.clear_decomposition();
        assert!(bag.separators().is_none());
        assert_eq!(bag.width(), 3);
    }

    #[test]
    fn separator_outside_incident_bag() {
        let mut bag = path();
        bag.initialize_for_decomposition();
        let a = bag.add_nested_bag(BitSet::from_slice(4, &[0, 1, 2]));
        let b = bag.add_nested_bag(BitSet::from_slice(4, &[2, 3]));
        let s = bag.add_separator(BitSet::from_slice(4, &[1, 2]));
        bag.connect(s, a);
        bag.connect(s, b);
        assert!(matches!(
            bag.validate(),
            Err(TreeDecompositionValidationError::SeparatorNotContained(0))
        ));
    }

    #[test]
    fn missing_edge_is_reported() {
        let mut bag = path();
        bag.initialize_for_decomposition();
        let a = bag.add_nested_bag(BitSet::from_slice(4, &[0, 1]));
        let b = bag.add_nested_bag(BitSet::from_slice(4, &[2, 3]));
        let s = bag.add_separator(BitSet::new(4));
        bag.connect(s, a);
        bag.connect(s, b);
        assert!(matches!(
            bag.validate(),
            Err(TreeDecompositionValidationError::MissingEdge((1, 2)))
        ));
    }
}
