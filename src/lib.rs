macro_rules! impl_setter {
    ($self:ident, $field:ident, $type:ty) => {
        pub fn $field(mut $self, $field: $type) -> Self {
            $self.$field = $field;
            $self
        }
    };
}

pub(crate) mod datastructures;
pub use datastructures::{BitSet, BitSetIterator};

pub mod exact;
pub mod graph;
pub mod io;
#[cfg(feature = "pace-logging")]
pub mod log;
#[cfg(feature = "handle-ctrlc")]
pub mod signals;
pub mod solver;
pub mod timeout;
pub mod tree_decomposition;
pub mod util;
