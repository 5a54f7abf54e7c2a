mod block;
mod mt_decomposer;
mod pmc;
mod sieve;

pub use block::{Block, BlockId, BlockTable};
pub use mt_decomposer::{DecompositionFailure, MBlock, MTDecomposer, PmcId, TBlock, TIMEOUT_CHECK};
pub use pmc::Pmc;
pub use sieve::LayeredSieve;
