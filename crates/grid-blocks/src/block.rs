//! Block finalization (C3) and the empty-cell classifier (C5).

use std::collections::BTreeSet;

use grid_core::{Coord, GridView, Point};
use grid_geom::{Container, Rect};

use crate::cluster::CellCluster;

/// Index into the block arena built by a single parse. Stable for the
/// lifetime of one `ParseOutput`; not meaningful across parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub usize);

/// A block: a container's bounding box lifted with border (+1) and frame
/// (+2) outline rings, plus the cell clusters found inside its canvas.
#[derive(Debug, Clone)]
pub struct Block {
    pub id: BlockId,
    pub rect: Rect,
    pub canvas_points: BTreeSet<Point>,
    pub border_points: BTreeSet<Point>,
    pub frame_points: BTreeSet<Point>,
    pub clusters: Vec<CellCluster>,
    pub cluster_empty_points: BTreeSet<Point>,
    pub canvas_empty_points: BTreeSet<Point>,
}

impl Block {
    /// Lift a container into a `Block`. `clusters` and the C5 empty-point
    /// sets are filled in separately once clusters have been extracted.
    pub fn finalize(id: BlockId, container: Container) -> Self {
        let rect = container.rect;
        let border_ring = rect.expand(1);
        let frame_ring = rect.expand(2);
        let border_points: BTreeSet<Point> = border_ring.ring_minus(&rect).into_iter().collect();
        let frame_points: BTreeSet<Point> =
            frame_ring.ring_minus(&border_ring).into_iter().collect();
        tracing::trace!(
            target: "grid.blocks",
            block = id.0,
            canvas = container.points.len(),
            border = border_points.len(),
            frame = frame_points.len(),
            "finalized block"
        );
        Self {
            id,
            rect,
            canvas_points: container.points,
            border_points,
            frame_points,
            clusters: Vec::new(),
            cluster_empty_points: BTreeSet::new(),
            canvas_empty_points: BTreeSet::new(),
        }
    }

    /// Partition the bounding-box complement into cluster-empty vs
    /// canvas-empty cells (C5). Cluster-empty wins whenever a cell is both
    /// inside some cluster's bounding box and raw-empty.
    pub fn classify_empty_cells(&mut self, grid: &dyn GridView) {
        let mut cluster_empty = BTreeSet::new();
        let mut canvas_empty = BTreeSet::new();

        for r in self.rect.top..=self.rect.bottom {
            for c in self.rect.left..=self.rect.right {
                let p = Point::new(r, c);
                if self.canvas_points.contains(&p) {
                    continue;
                }
                let in_some_cluster_box = self
                    .clusters
                    .iter()
                    .any(|cl| cl.rect.contains_point(p) && !cl.filled_points.contains(&p));
                if in_some_cluster_box && !grid_core::is_filled(&grid.raw(r, c)) {
                    cluster_empty.insert(p);
                } else {
                    canvas_empty.insert(p);
                }
            }
        }

        self.cluster_empty_points = cluster_empty;
        self.canvas_empty_points = canvas_empty;
    }
}

/// Finalize every container from a `k=2` container-builder pass into
/// `Block`s, ids assigned in the containers' lexicographic order (so block
/// ordering is deterministic).
pub fn finalize_blocks(containers: Vec<Container>, _rows: Coord, _cols: Coord) -> Vec<Block> {
    containers
        .into_iter()
        .enumerate()
        .map(|(i, c)| Block::finalize(BlockId(i), c))
        .collect()
}
