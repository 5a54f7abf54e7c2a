use crate::datastructures::BitSet;
use crate::graph::base_graph::BaseGraph;
use std::borrow::Borrow;

/// Adjacency as one neighbor [`BitSet`] per vertex.
#[derive(Clone, Debug)]
pub struct BitGraph {
    graph: Vec<BitSet>,
}

impl From<Vec<BitSet>> for BitGraph {
    fn from(graph: Vec<BitSet>) -> Self {
        Self { graph }
    }
}

impl From<&[BitSet]> for BitGraph {
    fn from(slice: &[BitSet]) -> Self {
        Self {
            graph: Vec::from(slice),
        }
    }
}

impl BitGraph {
    pub fn new(n: usize) -> Self {
        Self {
            graph: vec![BitSet::new(n); n],
        }
    }

    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Self {
        let mut graph = Self::new(n);
        for (u, v) in edges {
            graph.add_edge(*u, *v);
        }
        graph
    }

    /// Self loops are ignored.
    pub fn add_edge(&mut self, u: usize, v: usize) {
        if u != v {
            self.graph[u].set_bit(v);
            self.graph[v].set_bit(u);
        }
    }

    pub fn all(&self) -> BitSet {
        BitSet::new_all_set(self.graph.len())
    }

    pub fn neighborhood_as_bitset(&self, u: usize) -> &BitSet {
        self.graph[u].borrow()
    }

    pub fn closed_neighborhood(&self, u: usize) -> BitSet {
        let mut closed = self.graph[u].clone();
        closed.set_bit(u);
        closed
    }

    /// Open neighborhood of a vertex set: every vertex adjacent to `c` but not in it.
    pub fn neighbor_set(&self, c: &BitSet) -> BitSet {
        let mut border = BitSet::new(self.graph.len());
        for v in c.iter() {
            border.or(&self.graph[v])
        }
        border.and_not(c);
        border
    }

    /// Region reached from `v` without passing through `separator`, together with the
    /// separator vertices it touches.
    pub(crate) fn footprint(&self, v: usize, separator: &BitSet) -> BitSet {
        let mut region = self.graph[v].clone();
        let mut to_be_scanned = region.subtract(separator);
        region.set_bit(v);
        while !to_be_scanned.empty() {
            let save = region.clone();
            for w in to_be_scanned.iter() {
                region.or(&self.graph[w]);
            }
            to_be_scanned = region.subtract(&save);
            to_be_scanned.and_not(separator);
        }
        region
    }

    /// Connected components of the graph after removing `separator`, ordered by their
    /// smallest vertex.
    pub fn components(&self, separator: &BitSet) -> Vec<BitSet> {
        let mut components = Vec::new();
        let mut rest = self.all();
        rest.and_not(separator);
        let mut v = rest.get_first_set();
        while let Some(start) = v {
            let mut component = self.footprint(start, separator);
            component.and_not(separator);
            rest.and_not(&component);
            components.push(component);
            v = rest.get_next_set(start + 1);
        }
        components
    }

    /// Whether `vertices` induces a connected subgraph. The empty set counts as connected.
    pub fn is_connected(&self, vertices: &BitSet) -> bool {
        let start = match vertices.get_first_set() {
            None => return true,
            Some(v) => v,
        };
        let mut outside = self.all();
        outside.and_not(vertices);
        let mut reached = self.footprint(start, &outside);
        reached.and_not(&outside);
        reached.cardinality() == vertices.cardinality()
    }

    pub fn min_degree(&self) -> usize {
        self.graph.iter().map(|n| n.cardinality()).min().unwrap_or(0)
    }

    /// Subgraph induced by `vertices`, relabeled to `0..|vertices|`. The second value maps
    /// every new label back to its original vertex.
    pub fn vertex_induced(&self, vertices: &BitSet) -> (BitGraph, Vec<usize>) {
        let self_to_og: Vec<usize> = vertices.iter().collect();
        let mut og_to_self = vec![usize::MAX; self.graph.len()];
        for (idx, v) in self_to_og.iter().enumerate() {
            og_to_self[*v] = idx;
        }
        let mut graph = BitGraph::new(self_to_og.len());
        for (a, v) in self_to_og.iter().enumerate() {
            for u in self.graph[*v].iter().filter(|u| vertices[*u]) {
                graph.graph[a].set_bit(og_to_self[u]);
            }
        }
        (graph, self_to_og)
    }
}

impl BaseGraph for BitGraph {
    fn degree(&self, u: usize) -> usize {
        self.graph[u].cardinality()
    }

    fn order(&self) -> usize {
        self.graph.len()
    }

    fn has_edge(&self, u: usize, v: usize) -> bool {
        self.graph[u][v]
    }

    fn vertices(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(0..self.graph.len())
    }

    fn neighborhood(&self, u: usize) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(self.graph[u].iter())
    }
}

#[cfg(test)]
mod tests {
    use crate::datastructures::BitSet;
    use crate::graph::{BaseGraph, BitGraph};

    fn two_triangles() -> BitGraph {
        // 0-1-2 and 4-5-6 joined through 3
        BitGraph::from_edges(
            7,
            &[(0, 1), (1, 2), (0, 2), (2, 3), (3, 4), (4, 5), (5, 6), (4, 6)],
        )
    }

    #[test]
    fn neighbor_set() {
        let graph = two_triangles();
        let c = BitSet::from_slice(7, &[0, 1]);
        assert_eq!(graph.neighbor_set(&c).to_vec(), vec![2]);
        let c = BitSet::from_slice(7, &[3]);
        assert_eq!(graph.neighbor_set(&c).to_vec(), vec![2, 4]);
    }

    #[test]
    fn components() {
        let graph = two_triangles();
        let separator = BitSet::from_slice(7, &[3]);
        let components = graph.components(&separator);
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].to_vec(), vec![0, 1, 2]);
        assert_eq!(components[1].to_vec(), vec![4, 5, 6]);

        let components = graph.components(&BitSet::new(7));
        assert_eq!(components.len(), 1);
        assert!(components[0].full());
    }

    #[test]
    fn footprint_keeps_touched_separator() {
        let graph = two_triangles();
        let separator = BitSet::from_slice(7, &[2, 4]);
        assert_eq!(graph.footprint(0, &separator).to_vec(), vec![0, 1, 2]);
        assert_eq!(graph.footprint(3, &separator).to_vec(), vec![2, 3, 4]);
    }

    #[test]
    fn connectivity() {
        let graph = two_triangles();
        assert!(graph.is_connected(&graph.all()));
        assert!(!graph.is_connected(&BitSet::from_slice(7, &[0, 1, 2, 4, 5, 6])));
        assert!(graph.is_connected(&BitSet::from_slice(7, &[1, 2, 3])));
        assert!(graph.is_connected(&BitSet::new(7)));
    }

    #[test]
    fn vertex_induced() {
        let graph = two_triangles();
        let (sub, labels) = graph.vertex_induced(&BitSet::from_slice(7, &[2, 3, 4, 5]));
        assert_eq!(labels, vec![2, 3, 4, 5]);
        assert_eq!(sub.order(), 4);
        assert!(sub.has_edge(0, 1));
        assert!(sub.has_edge(1, 2));
        assert!(sub.has_edge(2, 3));
        assert!(!sub.has_edge(0, 3));
        assert_eq!(sub.min_degree(), 1);
    }
}
