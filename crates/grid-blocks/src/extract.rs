//! Per-block cluster extraction (C4 runner) and empty-cell classification
//! (C5 runner). Ties `grid-geom::build_containers` back into `Block`.

use grid_core::{Coord, GridView};
use grid_geom::build_containers;

use crate::block::Block;
use crate::cluster::CellCluster;

/// Run C2 at `expand = 1` over a block's canvas to produce its cell
/// clusters, then classify the block's bounding-box complement (C5).
pub fn extract_clusters_and_classify(block: &mut Block, grid: &dyn GridView, rows: Coord, cols: Coord) {
    let canvas: Vec<_> = block.canvas_points.iter().copied().collect();
    let containers = build_containers(&canvas, 1, rows, cols);
    block.clusters = containers
        .into_iter()
        .map(|c| CellCluster::from_container(block.id, c))
        .collect();
    block.classify_empty_cells(grid);
}
