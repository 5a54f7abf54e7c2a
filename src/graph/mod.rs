pub use bag::{Bag, NestedBag, Separator};
pub use base_graph::BaseGraph;
pub use bit_graph::BitGraph;

mod bag;
mod base_graph;
mod bit_graph;
