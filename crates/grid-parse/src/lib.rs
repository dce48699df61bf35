//! Orchestrator: wires C1-C11 together into a single `parse` entry point.
//!
//! This is the only crate that knows about every other `grid-*` crate;
//! everything downstream (the `gridform` binary, or any other host) talks
//! to `grid-parse` alone.

use grid_blocks::{extract_clusters_and_classify, finalize_blocks, Block, BlockId};
use grid_constructs::{detect, Construct};
use grid_core::{Coord, GridView};
use grid_geom::build_containers;
use grid_joins::{build_block_clusters, build_block_subclusters, build_joins, BlockCluster, BlockJoin, BlockSubcluster};
use grid_style::{emit_style_map, StyleMap};

/// Expansion parameter for the block-level container pass (C2, called with
/// `expand = 2` by default). Cell-cluster extraction always uses
/// `expand = 1` and is not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    pub block_expand: Coord,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self { block_expand: 2 }
    }
}

/// Addresses one `CellCluster` by the block that owns it and its index
/// within `Block::clusters`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterRef {
    pub block: BlockId,
    pub index: usize,
}

/// Everything produced by one parse: the structural graph (C3-C8), the
/// construct tag of every cell cluster (C9), and the merged style map
/// (C10).
#[derive(Debug, Clone)]
pub struct ParseOutput {
    blocks: Vec<Block>,
    joins: Vec<BlockJoin>,
    block_subclusters: Vec<BlockSubcluster>,
    block_clusters: Vec<BlockCluster>,
    constructs: Vec<(ClusterRef, Option<Construct>)>,
    style: StyleMap,
}

impl ParseOutput {
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0)
    }

    pub fn joins(&self) -> &[BlockJoin] {
        &self.joins
    }

    /// Every join touching `id`, in the order `build_joins` emitted them.
    pub fn joins_of(&self, id: BlockId) -> impl Iterator<Item = &BlockJoin> {
        self.joins.iter().filter(move |j| j.a == id || j.b == id)
    }

    pub fn block_subclusters(&self) -> &[BlockSubcluster] {
        &self.block_subclusters
    }

    pub fn block_clusters(&self) -> &[BlockCluster] {
        &self.block_clusters
    }

    pub fn construct_of(&self, r: ClusterRef) -> Option<Construct> {
        self.constructs
            .iter()
            .find(|(cr, _)| *cr == r)
            .and_then(|(_, c)| *c)
    }

    pub fn constructs(&self) -> &[(ClusterRef, Option<Construct>)] {
        &self.constructs
    }

    pub fn style(&self) -> &StyleMap {
        &self.style
    }
}

/// Run the full pipeline over `grid`: proximity-merge filled cells into
/// blocks (C2/C3), extract each block's cell clusters and empty-cell
/// labels (C4/C5), classify block-to-block joins and their higher-order
/// groupings (C6/C7/C8), detect each cluster's construct (C9), and emit
/// the merged style map (C10).
pub fn parse(grid: &dyn GridView, config: &ParseConfig) -> ParseOutput {
    let (rows, cols) = grid.dimensions();
    let points = grid.filled_cells();
    tracing::debug!(target: "grid.parse", filled_cells = points.len(), rows, cols, "parse start");

    let containers = build_containers(&points, config.block_expand, rows, cols);
    let mut blocks = finalize_blocks(containers, rows, cols);
    for block in &mut blocks {
        extract_clusters_and_classify(block, grid, rows, cols);
    }

    let joins = build_joins(&blocks);
    let block_subclusters = build_block_subclusters(&blocks, &joins, rows, cols);
    let block_clusters = build_block_clusters(&block_subclusters, rows, cols);

    let mut constructs = Vec::new();
    for block in &blocks {
        for (index, cluster) in block.clusters.iter().enumerate() {
            let cr = ClusterRef {
                block: block.id,
                index,
            };
            constructs.push((cr, detect(grid, cluster)));
        }
    }

    let style = emit_style_map(grid, &blocks, &block_subclusters, &block_clusters);

    tracing::debug!(
        target: "grid.parse",
        blocks = blocks.len(),
        joins = joins.len(),
        block_subclusters = block_subclusters.len(),
        block_clusters = block_clusters.len(),
        "parse complete"
    );

    ParseOutput {
        blocks,
        joins,
        block_subclusters,
        block_clusters,
        constructs,
        style,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_core::InMemoryGrid;

    #[test]
    fn empty_grid_yields_empty_outputs() {
        let grid = InMemoryGrid::new(5, 5).unwrap();
        let out = parse(&grid, &ParseConfig::default());
        assert!(out.blocks().is_empty());
        assert!(out.joins().is_empty());
        assert!(out.style().is_empty());
    }

    #[test]
    fn single_filled_cell_boundary_case() {
        let mut grid = InMemoryGrid::new(5, 5).unwrap();
        grid.set(2, 2, "x").unwrap();
        let out = parse(&grid, &ParseConfig::default());
        assert_eq!(out.blocks().len(), 1);
        let block = &out.blocks()[0];
        assert_eq!(block.canvas_points.len(), 1);
        assert_eq!(block.clusters.len(), 1);
        assert_eq!(block.clusters[0].subclusters.len(), 1);
        assert!(out.joins().is_empty());
        let cr = ClusterRef {
            block: block.id,
            index: 0,
        };
        assert!(out.construct_of(cr).is_none());
    }

    #[test]
    fn parsing_twice_is_idempotent() {
        let mut grid = InMemoryGrid::new(10, 10).unwrap();
        grid.set(1, 1, "a").unwrap();
        grid.set(1, 2, "b").unwrap();
        grid.set(5, 5, "c").unwrap();
        let out1 = parse(&grid, &ParseConfig::default());
        let out2 = parse(&grid, &ParseConfig::default());
        assert_eq!(out1.blocks().len(), out2.blocks().len());
        assert_eq!(out1.joins().len(), out2.joins().len());
        assert_eq!(out1.style().len(), out2.style().len());
        for (p, labels) in out1.style().iter() {
            assert_eq!(labels, out2.style().labels_of(*p));
        }
    }
}
