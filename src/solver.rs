use crate::datastructures::BitSet;
use crate::exact::{DecompositionFailure, MTDecomposer};
use crate::graph::{Bag, BaseGraph, BitGraph};
use crate::tree_decomposition::TreeDecomposition;
use crate::util::{NeverStop, Stopper, Timer};
#[cfg(feature = "log")]
use log::info;
use std::cmp::{max, min};
use std::time::Duration;

/// Splits a graph into its connected components, decomposes each one exactly and glues the
/// results together.
#[derive(Clone, Debug)]
pub struct Solver {
    lowerbound: Option<usize>,
    upperbound: Option<usize>,
    timeout: Option<Duration>,
    use_atom_width_as_lower_bound: bool,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            lowerbound: None,
            upperbound: None,
            timeout: None,
            use_atom_width_as_lower_bound: true,
        }
    }
}

impl Solver {
    impl_setter!(self, lowerbound, Option<usize>);
    impl_setter!(self, upperbound, Option<usize>);
    impl_setter!(self, timeout, Option<Duration>);
    impl_setter!(self, use_atom_width_as_lower_bound, bool);

    /// Every component gets the configured timeout on its own.
    pub fn solve(&self, graph: &BitGraph) -> Result<TreeDecomposition, DecompositionFailure> {
        match self.timeout {
            Some(timeout) => self.solve_with_stopper(graph, Timer::new(timeout)),
            None => self.solve_with_stopper(graph, NeverStop),
        }
    }

    pub fn solve_with_stopper<S: Stopper + Clone + 'static>(
        &self,
        graph: &BitGraph,
        stopper: S,
    ) -> Result<TreeDecomposition, DecompositionFailure> {
        #[cfg(feature = "log")]
        info!("attempting to solve graph with {} vertices", graph.order());
        let mut td = TreeDecomposition::default();
        if graph.order() == 0 {
            return Ok(td);
        }

        let components = graph.components(&BitSet::new(graph.order()));
        #[cfg(feature = "log")]
        info!("obtained {} components", components.len());
        if components.len() > 1 {
            td.add_bag(Default::default());
        }

        let mut width = 0;
        for component in &components {
            let (sub_graph, labels) = graph.vertex_induced(component);
            let order = sub_graph.order();
            let mut lowerbound = max(self.lowerbound.unwrap_or(0), sub_graph.min_degree());
            if self.use_atom_width_as_lower_bound {
                lowerbound = max(lowerbound, width);
            }
            lowerbound = min(lowerbound, order - 1);
            let upperbound = self.upperbound.unwrap_or(order - 1);

            #[cfg(feature = "log")]
            info!(
                "solving component with {} vertices, bounds [{}, {}]",
                order, lowerbound, upperbound
            );
            let mut bag = Bag::new(sub_graph);
            let component_width = MTDecomposer::new(&mut bag, lowerbound, upperbound)
                .with_stopper(Box::new(stopper.clone()))
                .decompose()?;
            width = max(width, component_width);

            if let Err(e) = bag.validate() {
                panic!("decomposition of component is invalid: {}", e);
            }
            td.combine_with_or_replace(0, bag.to_tree_decomposition(&labels));
        }

        match td.verify(graph) {
            Ok(_) => {
                #[cfg(feature = "log")]
                info!("computed td of width {} is valid", td.width());
            }
            Err(e) => {
                panic!("computed td is invalid: {}", e);
            }
        }
        Ok(td)
    }
}

#[cfg(test)]
mod tests {
    use crate::exact::DecompositionFailure;
    use crate::graph::BitGraph;
    use crate::solver::Solver;
    use crate::util::Stopper;
    use std::time::Duration;

    #[derive(Clone)]
    struct AlwaysStop;

    impl Stopper for AlwaysStop {
        fn stop(&mut self) -> bool {
            true
        }

        fn init(&mut self) {}
    }

    fn disconnected() -> BitGraph {
        // a 4-cycle, an edge and an isolated vertex
        BitGraph::from_edges(7, &[(0, 1), (1, 2), (2, 3), (3, 0), (4, 5)])
    }

    #[test]
    fn disconnected_graph_yields_single_decomposition() {
        let graph = disconnected();
        let td = Solver::default().solve(&graph).unwrap();
        assert_eq!(td.width(), 2);
        assert!(td.verify(&graph).is_ok());

        let td = Solver::default()
            .use_atom_width_as_lower_bound(false)
            .timeout(Some(Duration::from_secs(60)))
            .solve(&graph)
            .unwrap();
        assert_eq!(td.width(), 2);
        assert!(td.verify(&graph).is_ok());
    }

    #[test]
    fn empty_graph() {
        let td = Solver::default().solve(&BitGraph::new(0)).unwrap();
        assert!(td.bags.is_empty());
    }

    #[test]
    fn lowerbound_above_component_size() {
        let graph = disconnected();
        let td = Solver::default().lowerbound(Some(4)).solve(&graph).unwrap();
        assert!(td.verify(&graph).is_ok());
        assert_eq!(td.width(), 3);
    }

    #[test]
    fn upperbound_too_small() {
        let graph = disconnected();
        let result = Solver::default().upperbound(Some(1)).solve(&graph);
        assert_eq!(
            result.unwrap_err(),
            DecompositionFailure::UpperBoundExceeded { upper_bound: 1 }
        );
    }

    #[test]
    fn stopper_cancels() {
        let graph = disconnected();
        let result = Solver::default().solve_with_stopper(&graph, AlwaysStop);
        assert!(matches!(
            result,
            Err(DecompositionFailure::Cancelled { .. })
        ));
    }
}
