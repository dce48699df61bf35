//! Style emitter (C10): merge role assignments from C3-C8 into a layered,
//! per-cell label map.

use std::collections::BTreeMap;

use grid_blocks::Block;
use grid_core::{Coord, GridView, Point};
use grid_joins::{BlockCluster, BlockSubcluster};
use serde::Serialize;

/// The label vocabulary emitted onto the style map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Label {
    Disabled,
    Canvas,
    CanvasEmpty,
    Border,
    Frame,
    ClusterEmpty,
    Linked,
    Locked,
    ClusterCanvas,
    ClusterPerimeter,
    ClusterBuffer,
}

/// `(r, c) -> ordered, deduplicated set of labels`. Iterates structures in
/// a fixed order; when a cell receives the same label twice (e.g. two
/// block clusters both claiming a buffer cell) only the
/// first insertion is kept, preserving emission order as the priority
/// order consumers can invert.
#[derive(Debug, Clone, Default)]
pub struct StyleMap {
    rows: Coord,
    cols: Coord,
    entries: BTreeMap<Point, Vec<Label>>,
}

impl StyleMap {
    fn new(rows: Coord, cols: Coord) -> Self {
        Self {
            rows,
            cols,
            entries: BTreeMap::new(),
        }
    }

    fn push(&mut self, p: Point, label: Label) {
        if p.row < 1 || p.col < 1 || p.row > self.rows || p.col > self.cols {
            // Border/frame rings conceptually extend past the grid edge;
            // the emitter silently clips them here.
            return;
        }
        let labels = self.entries.entry(p).or_default();
        if !labels.contains(&label) {
            labels.push(label);
        }
    }

    pub fn labels_of(&self, p: Point) -> &[Label] {
        self.entries.get(&p).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Point, &Vec<Label>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as the `{"R{r}C{c}": [label, ...]}` shape.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|(p, labels)| (p.to_string(), serde_json::to_value(labels).unwrap()))
            .collect();
        serde_json::Value::Object(map)
    }
}

/// Walk blocks, block subclusters, and block clusters in a fixed order,
/// appending labels into a single `StyleMap`.
pub fn emit_style_map(
    grid: &dyn GridView,
    blocks: &[Block],
    subclusters: &[BlockSubcluster],
    block_clusters: &[BlockCluster],
) -> StyleMap {
    let (rows, cols) = grid.dimensions();
    let mut map = StyleMap::new(rows, cols);

    // 1. Disabled marker.
    if grid_core::is_disabled_root(&grid.raw(1, 1)) {
        map.push(Point::new(1, 1), Label::Disabled);
    }

    // 2. Per-block cluster-empty / canvas-empty.
    for b in blocks {
        for &p in &b.cluster_empty_points {
            map.push(p, Label::ClusterEmpty);
        }
        for &p in &b.canvas_empty_points {
            map.push(p, Label::CanvasEmpty);
        }
    }

    // 3. Block subclusters: linked then locked.
    for s in subclusters {
        for &p in &s.linked_points {
            map.push(p, Label::Linked);
        }
        for &p in &s.locked_points {
            map.push(p, Label::Locked);
        }
    }

    // 4. Block clusters: canvas, perimeter, buffer.
    for bc in block_clusters {
        for p in bc.canvas.points() {
            map.push(p, Label::ClusterCanvas);
        }
        for p in bc.perimeter.points() {
            map.push(p, Label::ClusterPerimeter);
        }
        for p in bc.buffer.points() {
            map.push(p, Label::ClusterBuffer);
        }
    }

    // 5. Per-block canvas, border, frame.
    for b in blocks {
        for &p in &b.canvas_points {
            map.push(p, Label::Canvas);
        }
        for &p in &b.border_points {
            map.push(p, Label::Border);
        }
        for &p in &b.frame_points {
            map.push(p, Label::Frame);
        }
    }

    tracing::trace!(target: "grid.style", cells = map.len(), "emitted style map");
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_blocks::finalize_blocks;
    use grid_core::InMemoryGrid;
    use grid_geom::build_containers;
    use grid_joins::{build_block_clusters, build_block_subclusters, build_joins};

    #[test]
    fn disabled_root_gets_disabled_label_and_is_excluded_elsewhere() {
        let mut grid = InMemoryGrid::new(3, 3).unwrap();
        grid.set(1, 1, "^root").unwrap();
        grid.set(2, 2, "x").unwrap();
        let points = grid.filled_cells();
        let containers = build_containers(&points, 2, 3, 3);
        let blocks = finalize_blocks(containers, 3, 3);
        let joins = build_joins(&blocks);
        let subs = build_block_subclusters(&blocks, &joins, 3, 3);
        let clusters = build_block_clusters(&subs, 3, 3);
        let map = emit_style_map(&grid, &blocks, &subs, &clusters);
        assert_eq!(map.labels_of(Point::new(1, 1)), &[Label::Disabled]);
    }

    #[test]
    fn border_and_frame_are_clipped_to_grid() {
        let mut grid = InMemoryGrid::new(2, 2).unwrap();
        grid.set(1, 1, "x").unwrap();
        let points = grid.filled_cells();
        let containers = build_containers(&points, 2, 2, 2);
        let blocks = finalize_blocks(containers, 2, 2);
        let joins = build_joins(&blocks);
        let subs = build_block_subclusters(&blocks, &joins, 2, 2);
        let clusters = build_block_clusters(&subs, 2, 2);
        let map = emit_style_map(&grid, &blocks, &subs, &clusters);
        // Frame ring at distance 2 from (1,1) would include (negative,
        // negative) and out-of-grid cells; none should appear.
        for (p, _) in map.iter() {
            assert!(p.row >= 1 && p.row <= 2 && p.col >= 1 && p.col <= 2);
        }
    }

    #[test]
    fn labels_serialize_to_spec_vocabulary_strings() {
        let v = serde_json::to_value(Label::ClusterEmpty).unwrap();
        assert_eq!(v, serde_json::Value::String("cluster-empty".to_string()));
        let v = serde_json::to_value(Label::ClusterPerimeter).unwrap();
        assert_eq!(
            v,
            serde_json::Value::String("cluster-perimeter".to_string())
        );
    }

    #[test]
    fn empty_grid_yields_empty_style_map() {
        let grid = InMemoryGrid::new(5, 5).unwrap();
        let points = grid.filled_cells();
        let containers = build_containers(&points, 2, 5, 5);
        let blocks = finalize_blocks(containers, 5, 5);
        let joins = build_joins(&blocks);
        let subs = build_block_subclusters(&blocks, &joins, 5, 5);
        let clusters = build_block_clusters(&subs, 5, 5);
        let map = emit_style_map(&grid, &blocks, &subs, &clusters);
        assert!(map.is_empty());
    }
}
