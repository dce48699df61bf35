//! Construct detection (C9): classify a cell cluster into one of
//! `{table, matrix, key-value, tree}`, or none, via four ordered rules.

use grid_blocks::CellCluster;
use grid_core::GridView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructKind {
    Table,
    Matrix,
    KeyValue,
    Tree,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Regular,
    Transposed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Construct {
    pub kind: ConstructKind,
    /// Only meaningful for `KeyValue` and `Tree`; `None` for `Table`/`Matrix`.
    pub orientation: Option<Orientation>,
}

/// Read the raw grid cell at the cluster-relative position `(n, m)`
/// (1-indexed, `R1C1` is the cluster's top-left cell) and apply the same
/// fill predicate `GridView::filled_cells` uses. Deliberately reads the
/// live grid rather than the cluster's own `filled_points`: a cluster
/// narrower or shorter than the positions the rules reference (e.g. a
/// width-1 cluster checking `R1C2`) still needs an answer for that cell,
/// and since clusters are built at `expand = 1` any truly adjacent filled
/// cell would already have been absorbed into the same cluster.
fn filled_at(grid: &dyn GridView, cluster: &CellCluster, n: i64, m: i64) -> bool {
    let row = cluster.rect.top + (n - 1);
    let col = cluster.rect.left + (m - 1);
    grid_core::is_filled(&grid.raw(row, col))
}

/// Apply the four ordered rules to one cell cluster; the first match wins.
/// Returns `None` only when Rule 0's size gate fires.
pub fn detect(grid: &dyn GridView, cluster: &CellCluster) -> Option<Construct> {
    let w = cluster.width();
    let h = cluster.height();

    // Rule 0 — size gate.
    if w < 2 && h < 2 {
        return None;
    }

    // Rules 1 and 2 describe a genuine 2-D rectangle; a strip only one cell
    // wide or tall (e.g. a 3x1 column) is never a table or matrix even
    // though "every cell filled" would trivially hold for it — both rules
    // implicitly require at least two rows and columns.
    if w >= 2 && h >= 2 {
        // Rule 1 — table: every cell in the bounding box is filled.
        let all_filled = (1..=h).all(|n| (1..=w).all(|m| filled_at(grid, cluster, n, m)));
        if all_filled {
            return Some(Construct {
                kind: ConstructKind::Table,
                orientation: None,
            });
        }

        // Rule 2 — matrix: exactly one empty cell, and it is R1C1.
        let empty_count = (1..=h)
            .flat_map(|n| (1..=w).map(move |m| (n, m)))
            .filter(|&(n, m)| !filled_at(grid, cluster, n, m))
            .count();
        if empty_count == 1 && !filled_at(grid, cluster, 1, 1) {
            return Some(Construct {
                kind: ConstructKind::Matrix,
                orientation: None,
            });
        }
    }

    // Rule 3 — key-value.
    let r1c1 = filled_at(grid, cluster, 1, 1);
    let r1c2 = filled_at(grid, cluster, 1, 2);
    let r2c1 = filled_at(grid, cluster, 2, 1);
    let r2c2 = filled_at(grid, cluster, 2, 2);
    let has_col3_plus = (1..=h).any(|n| (3..=w).any(|m| filled_at(grid, cluster, n, m)));
    if r1c1 && !r1c2 && !r2c1 && r2c2 && has_col3_plus {
        let k_row = (1..=w).filter(|&m| filled_at(grid, cluster, 2, m)).count();
        let k_col = (1..=h).filter(|&n| filled_at(grid, cluster, n, 2)).count();
        let orientation = if k_col > k_row {
            Orientation::Regular
        } else if k_row > k_col {
            Orientation::Transposed
        } else {
            Orientation::Regular
        };
        return Some(Construct {
            kind: ConstructKind::KeyValue,
            orientation: Some(orientation),
        });
    }

    // Rule 4 — tree (default).
    let orientation = if r1c1 && r2c1 && !r1c2 {
        Orientation::Regular
    } else if r1c1 && r1c2 && !r2c1 {
        Orientation::Transposed
    } else {
        Orientation::Regular
    };
    Some(Construct {
        kind: ConstructKind::Tree,
        orientation: Some(orientation),
    })
}
