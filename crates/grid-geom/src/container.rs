//! Proximity-based container merging (C2).
//!
//! `build_containers` is the one routine both the block builder (k=2 over
//! every filled cell) and the cluster extractor (k=1 over a single block's
//! canvas) call into.

use std::collections::{BTreeSet, HashSet};

use grid_core::{Coord, Point};

use crate::rect::Rect;

/// A rectangle plus the filled points it has absorbed. Containers returned
/// by `build_containers` partition the input point set; their bounding
/// rectangles are pairwise non-overlapping once expanded by `expand`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub rect: Rect,
    pub points: BTreeSet<Point>,
}

/// Group `points` into containers by iteratively expanding each bounding
/// box by `expand` and merging overlaps. Output is ordered
/// lexicographically on `(top, left, bottom, right)`.
pub fn build_containers(points: &[Point], expand: i64, rows: Coord, cols: Coord) -> Vec<Container> {
    tracing::trace!(
        target: "grid.containers",
        input_points = points.len(),
        expand,
        "build_containers"
    );
    let mut absorbed: HashSet<Point> = HashSet::new();
    let mut output: Vec<Container> = Vec::new();

    for &seed in points {
        if absorbed.contains(&seed) {
            continue;
        }
        absorbed.insert(seed);
        let mut container_points: BTreeSet<Point> = BTreeSet::new();
        container_points.insert(seed);
        let mut rect = Rect::from_point(seed);

        loop {
            let mut changed = false;

            // Expand-absorb inner loop: pull in every not-yet-absorbed
            // point that falls inside the expanded, clamped bounding box.
            loop {
                let expanded = rect.expand_clamped(expand, rows, cols);
                let mut absorbed_any = false;
                for &q in points {
                    if absorbed.contains(&q) {
                        continue;
                    }
                    if expanded.contains_point(q) {
                        container_points.insert(q);
                        absorbed.insert(q);
                        absorbed_any = true;
                    }
                }
                if !absorbed_any {
                    break;
                }
                rect = Rect::bounding(container_points.iter().copied())
                    .expect("container_points is never empty");
                changed = true;
            }

            // Merge-with-existing loop: fold in any already-emitted
            // container whose (unexpanded) rect the expanded S overlaps.
            let expanded = rect.expand_clamped(expand, rows, cols);
            let mut merged_any = false;
            let mut i = 0;
            while i < output.len() {
                if expanded.intersects(&output[i].rect) {
                    let absorbed_container = output.remove(i);
                    container_points.extend(absorbed_container.points);
                    merged_any = true;
                } else {
                    i += 1;
                }
            }
            if merged_any {
                rect = Rect::bounding(container_points.iter().copied())
                    .expect("container_points is never empty");
                changed = true;
            }

            if !changed {
                break;
            }
        }

        output.push(Container {
            rect,
            points: container_points,
        });
    }

    output.sort_by_key(|c| (c.rect.top, c.rect.left, c.rect.bottom, c.rect.right));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(i64, i64)]) -> Vec<Point> {
        coords.iter().map(|&(r, c)| Point::new(r, c)).collect()
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(build_containers(&[], 2, 10, 10).is_empty());
    }

    #[test]
    fn single_point_single_container() {
        let p = pts(&[(3, 3)]);
        let out = build_containers(&p, 2, 10, 10);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].points.len(), 1);
    }

    #[test]
    fn nearby_points_merge_at_k2() {
        // Distance 1 apart absorbs readily under expand=2.
        let p = pts(&[(1, 1), (1, 2), (2, 1), (2, 2)]);
        let out = build_containers(&p, 2, 10, 10);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].points.len(), 4);
    }

    #[test]
    fn far_points_stay_separate_at_k2() {
        // Manhattan distance 5 between (1,1) and (1,6): expand-by-2 boxes
        // (cols 1..3 and 4..8) overlap at cols 4? (1+2=3 vs 6-2=4) -> no
        // overlap, so they remain distinct containers.
        let p = pts(&[(1, 1), (1, 6)]);
        let out = build_containers(&p, 2, 10, 10);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn output_is_lexicographically_ordered() {
        let p = pts(&[(5, 5), (1, 1), (3, 3)]);
        let out = build_containers(&p, 1, 10, 10);
        let keys: Vec<_> = out
            .iter()
            .map(|c| (c.rect.top, c.rect.left, c.rect.bottom, c.rect.right))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn chained_merge_joins_three_seeds_transitively() {
        // A seeds at (1,1); absorbing (1,3) via expand=2 grows the box to
        // reach (1,5) only after the merge-with-existing loop runs again.
        let p = pts(&[(1, 1), (1, 3), (1, 5)]);
        let out = build_containers(&p, 2, 10, 10);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].points.len(), 3);
    }
}
