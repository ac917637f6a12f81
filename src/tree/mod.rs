//! Tree genotypes: spanning-tree phenotypes plus the chromosome encodings
//! that decode into them.

pub mod network_random_keys;
pub mod prufer;
#[allow(clippy::module_inception)]
pub mod tree;
pub mod union_find;

pub(crate) use tree::undirected;

pub use network_random_keys::NetworkRandomKeys;
pub use prufer::PruferCode;
pub use tree::{KruskalTree, PotentialGraph, RootedTree, SpanningTree};
pub use union_find::UnionFind;
