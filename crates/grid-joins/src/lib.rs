//! Block joins and the higher-order block-subcluster/block-cluster graphs
//! built from them (C6, C7, C8).

mod blockcluster;
mod join;
mod subcluster;

pub use blockcluster::{build_block_clusters, BlockCluster};
pub use join::{build_joins, BlockJoin, JoinType};
pub use subcluster::{build_block_subclusters, BlockSubcluster};
