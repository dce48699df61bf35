//! Block-subcluster builder (C7): connected components of the block graph
//! induced by joins.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use grid_blocks::{Block, BlockId};
use grid_core::{Coord, Point};
use grid_geom::Rect;

use crate::join::BlockJoin;

/// A connected component of the block-join graph: the set of blocks it
/// covers, the joins between them, their aggregated linked/locked points,
/// and the +2/+4 rectangles derived from the union of canvas bounds.
#[derive(Debug, Clone)]
pub struct BlockSubcluster {
    pub blocks: BTreeSet<BlockId>,
    pub join_indices: Vec<usize>,
    pub linked_points: BTreeSet<Point>,
    pub locked_points: BTreeSet<Point>,
    pub bounds: Rect,
    pub perimeter: Rect,
    pub buffer: Rect,
}

/// Build one `BlockSubcluster` per connected component of the undirected
/// graph whose vertices are blocks and whose edges are `joins`. Blocks with
/// no joins at all form their own singleton subcluster.
pub fn build_block_subclusters(
    blocks: &[Block],
    joins: &[BlockJoin],
    rows: Coord,
    cols: Coord,
) -> Vec<BlockSubcluster> {
    let mut adjacency: BTreeMap<BlockId, Vec<usize>> = BTreeMap::new();
    for b in blocks {
        adjacency.entry(b.id).or_default();
    }
    for (idx, j) in joins.iter().enumerate() {
        adjacency.entry(j.a).or_default().push(idx);
        adjacency.entry(j.b).or_default().push(idx);
    }

    let block_rects: BTreeMap<BlockId, Rect> = blocks.iter().map(|b| (b.id, b.rect)).collect();

    let mut visited: HashSet<BlockId> = HashSet::new();
    let mut out = Vec::new();

    for b in blocks {
        if visited.contains(&b.id) {
            continue;
        }
        let mut component_blocks = BTreeSet::new();
        let mut component_joins = BTreeSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(b.id);
        visited.insert(b.id);

        while let Some(id) = queue.pop_front() {
            component_blocks.insert(id);
            for &join_idx in adjacency.get(&id).into_iter().flatten() {
                component_joins.insert(join_idx);
                let j = &joins[join_idx];
                let other = if j.a == id { j.b } else { j.a };
                if visited.insert(other) {
                    queue.push_back(other);
                }
            }
        }

        let mut linked_points = BTreeSet::new();
        let mut locked_points = BTreeSet::new();
        for &idx in &component_joins {
            linked_points.extend(joins[idx].linked_points.iter().copied());
            locked_points.extend(joins[idx].locked_points.iter().copied());
        }

        let mut bounds_iter = component_blocks.iter().map(|id| block_rects[id]);
        let first = bounds_iter.next().expect("component is non-empty");
        let bounds = bounds_iter.fold(first, |acc, r| acc.union(&r));

        out.push(BlockSubcluster {
            blocks: component_blocks,
            join_indices: component_joins.into_iter().collect(),
            linked_points,
            locked_points,
            perimeter: bounds.expand_clamped(2, rows, cols),
            buffer: bounds.expand_clamped(4, rows, cols),
            bounds,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::build_joins;
    use grid_blocks::finalize_blocks;
    use grid_core::InMemoryGrid;
    use grid_geom::build_containers;

    #[test]
    fn unjoined_blocks_form_singleton_subclusters() {
        let mut grid = InMemoryGrid::new(10, 10).unwrap();
        grid.set(1, 1, "a").unwrap();
        grid.set(9, 9, "b").unwrap();
        let points = grid.filled_cells();
        let containers = build_containers(&points, 2, 10, 10);
        let blocks = finalize_blocks(containers, 10, 10);
        let joins = build_joins(&blocks);
        assert!(joins.is_empty());
        let subs = build_block_subclusters(&blocks, &joins, 10, 10);
        assert_eq!(subs.len(), 2);
        assert!(subs.iter().all(|s| s.blocks.len() == 1));
    }

    #[test]
    fn joined_blocks_merge_into_one_subcluster() {
        let mut grid = InMemoryGrid::new(10, 10).unwrap();
        for r in 2..=3 {
            for c in 2..=3 {
                grid.set(r, c, "a").unwrap();
            }
        }
        for r in 2..=3 {
            for c in 5..=6 {
                grid.set(r, c, "b").unwrap();
            }
        }
        let points = grid.filled_cells();
        let containers = build_containers(&points, 2, 10, 10);
        let blocks = finalize_blocks(containers, 10, 10);
        let joins = build_joins(&blocks);
        assert_eq!(joins.len(), 1);
        let subs = build_block_subclusters(&blocks, &joins, 10, 10);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].blocks.len(), 2);
    }
}
