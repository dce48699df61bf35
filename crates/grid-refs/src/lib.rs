//! Reference updater (C11): rewrite `R{r}C{c}` / `R{r1}C{c1}:R{r2}C{c2}`
//! references in formula cells after a block or range move.

use grid_core::{Coord, GridView, InMemoryGrid, Point};
use grid_geom::Rect;
use regex::Regex;
use thiserror::Error;

/// Errors surfaced at the reference-parsing boundary only; the rewrite
/// engine itself never fails on valid input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RefError {
    #[error("'{0}' is not a valid R{{row}}C{{col}} coordinate")]
    MalformedCoordinate(String),
}

/// A single translation applied to the grid: either one cell moving to
/// another cell, or an entire rectangular range shifting by a uniform
/// delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Cell { from: Point, to: Point },
    Range { source: Rect, delta: (Coord, Coord) },
}

impl Move {
    pub fn cell(from: Point, to: Point) -> Self {
        Move::Cell { from, to }
    }

    pub fn range(source: Rect, to_top_left: Point) -> Self {
        let delta = (to_top_left.row - source.top, to_top_left.col - source.left);
        Move::Range { source, delta }
    }
}

/// A grid that can both be read (`GridView`) and have a cell's raw text
/// overwritten. The reference updater is the only `grid-*` component that
/// needs write access — everything upstream of it is pure.
pub trait RefHost: GridView {
    fn write_raw(&mut self, row: Coord, col: Coord, text: String);
}

impl RefHost for InMemoryGrid {
    fn write_raw(&mut self, row: Coord, col: Coord, text: String) {
        // Errors here (out-of-range, disabled-root) are swallowed by
        // `InMemoryGrid::set` itself — a bad write is simply discarded.
        let _ = self.set(row, col, text);
    }
}

/// Parse a single `R{row}C{col}` coordinate string (`^R(\d+)C(\d+)$`).
pub fn parse_coord(s: &str) -> Result<Point, RefError> {
    let re = coord_regex();
    let caps = re
        .captures(s)
        .ok_or_else(|| RefError::MalformedCoordinate(s.to_string()))?;
    let row: Coord = caps[1]
        .parse()
        .map_err(|_| RefError::MalformedCoordinate(s.to_string()))?;
    let col: Coord = caps[2]
        .parse()
        .map_err(|_| RefError::MalformedCoordinate(s.to_string()))?;
    Ok(Point::new(row, col))
}

fn coord_regex() -> Regex {
    Regex::new(r"^R(\d+)C(\d+)$").unwrap()
}

fn reference_regex() -> Regex {
    Regex::new(r"R(\d+)C(\d+)(?::R(\d+)C(\d+))?").unwrap()
}

/// Resolve `p` against `moves`, first-match-wins: an exact `Cell` move, then
/// containment in a `Range` move's source rectangle. `None` means "leave
/// this coordinate untouched".
fn resolve_point(p: Point, moves: &[Move]) -> Option<Point> {
    for m in moves {
        match m {
            Move::Cell { from, to } if *from == p => return Some(*to),
            Move::Range { source, delta } if source.contains_point(p) => {
                return Some(Point::new(p.row + delta.0, p.col + delta.1));
            }
            _ => {}
        }
    }
    None
}

/// `Some(delta)` iff `[r1,c1]..[r2,c2]` exactly equals some `Range` move's
/// source rectangle, in which case the whole range is substituted as a
/// unit rather than resolving each endpoint independently.
fn exact_range_delta(source: &Rect, moves: &[Move]) -> Option<(Coord, Coord)> {
    moves.iter().find_map(|m| match m {
        Move::Range { source: s, delta } if s == source => Some(*delta),
        _ => None,
    })
}

fn in_bounds(p: Point, rows: Coord, cols: Coord) -> bool {
    p.row >= 1 && p.col >= 1 && p.row <= rows && p.col <= cols
}

/// Resolve `p`, but fall back to `p` unchanged if the move target would
/// land out of the grid's bounds — out-of-range moves are silently
/// ignored, original text retained.
fn resolve_or_keep(p: Point, moves: &[Move], rows: Coord, cols: Coord) -> Point {
    resolve_point(p, moves)
        .filter(|np| in_bounds(*np, rows, cols))
        .unwrap_or(p)
}

fn rewrite_formula(text: &str, moves: &[Move], re: &Regex, rows: Coord, cols: Coord) -> String {
    re.replace_all(text, |caps: &regex::Captures| {
        let whole = caps[0].to_string();
        let (r1, c1) = match (caps[1].parse::<Coord>().ok(), caps[2].parse::<Coord>().ok()) {
            (Some(r1), Some(c1)) => (r1, c1),
            _ => return whole,
        };

        if let (Some(r2s), Some(c2s)) = (caps.get(3), caps.get(4)) {
            let (r2, c2) = match (
                r2s.as_str().parse::<Coord>().ok(),
                c2s.as_str().parse::<Coord>().ok(),
            ) {
                (Some(r2), Some(c2)) => (r2, c2),
                _ => return whole,
            };
            let source = Rect::new(r1.min(r2), c1.min(c2), r1.max(r2), c1.max(c2));

            if let Some((dr, dc)) = exact_range_delta(&source, moves) {
                let (nr1, nc1, nr2, nc2) = (r1 + dr, c1 + dc, r2 + dr, c2 + dc);
                if in_bounds(Point::new(nr1, nc1), rows, cols)
                    && in_bounds(Point::new(nr2, nc2), rows, cols)
                {
                    return format!("R{nr1}C{nc1}:R{nr2}C{nc2}");
                }
                return format!("R{r1}C{c1}:R{r2}C{c2}");
            }

            let p1 = resolve_or_keep(Point::new(r1, c1), moves, rows, cols);
            let p2 = resolve_or_keep(Point::new(r2, c2), moves, rows, cols);
            format!("R{}C{}:R{}C{}", p1.row, p1.col, p2.row, p2.col)
        } else {
            let p = resolve_or_keep(Point::new(r1, c1), moves, rows, cols);
            format!("R{}C{}", p.row, p.col)
        }
    })
    .into_owned()
}

/// Scan every filled cell whose raw text begins with `=`, rewrite its
/// `R{r}C{c}`/range references per `moves`, and write the result back.
/// All substitutions for a single formula are computed before that cell
/// is overwritten.
pub fn apply_reference_updates<G: RefHost>(grid: &mut G, moves: &[Move]) {
    if moves.is_empty() {
        return;
    }
    let (rows, cols) = grid.dimensions();
    let re = reference_regex();

    let formula_cells: Vec<Point> = grid
        .filled_cells()
        .into_iter()
        .filter(|p| grid.raw(p.row, p.col).trim_start().starts_with('='))
        .collect();

    for p in formula_cells {
        let original = grid.raw(p.row, p.col);
        let updated = rewrite_formula(&original, moves, &re, rows, cols);
        if updated != original {
            tracing::trace!(target: "grid.refs", cell = %p, "rewrote formula");
            grid.write_raw(p.row, p.col, updated);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_coord_rejects_malformed_input() {
        assert!(parse_coord("R1C").is_err());
        assert_eq!(parse_coord("R3C4").unwrap(), Point::new(3, 4));
    }

    #[test]
    fn single_cell_reference_is_rewritten() {
        let mut grid = InMemoryGrid::new(10, 10).unwrap();
        grid.set(1, 1, "=R2C2").unwrap();
        let moves = vec![Move::cell(Point::new(2, 2), Point::new(5, 5))];
        apply_reference_updates(&mut grid, &moves);
        assert_eq!(grid.raw(1, 1), "=R5C5");
    }

    #[test]
    fn zero_delta_move_is_a_no_op() {
        let mut grid = InMemoryGrid::new(10, 10).unwrap();
        grid.set(1, 1, "=R2C2").unwrap();
        let moves = vec![Move::cell(Point::new(2, 2), Point::new(2, 2))];
        apply_reference_updates(&mut grid, &moves);
        assert_eq!(grid.raw(1, 1), "=R2C2");
    }

    #[test]
    fn malformed_reference_left_untouched() {
        let mut grid = InMemoryGrid::new(10, 10).unwrap();
        grid.set(1, 1, "=R2Cx + 1").unwrap();
        let moves = vec![Move::cell(Point::new(2, 2), Point::new(5, 5))];
        apply_reference_updates(&mut grid, &moves);
        assert_eq!(grid.raw(1, 1), "=R2Cx + 1");
    }

    #[test]
    fn out_of_range_target_retains_original_text() {
        let mut grid = InMemoryGrid::new(3, 3).unwrap();
        grid.set(1, 1, "=R2C2").unwrap();
        let moves = vec![Move::cell(Point::new(2, 2), Point::new(50, 50))];
        apply_reference_updates(&mut grid, &moves);
        assert_eq!(grid.raw(1, 1), "=R2C2");
    }

    #[test]
    fn range_endpoint_inside_moved_range_shifts_by_delta() {
        let mut grid = InMemoryGrid::new(20, 20).unwrap();
        grid.set(1, 1, "=SUM(R2C2:R4C4)").unwrap();
        let source = Rect::new(2, 2, 4, 4);
        let moves = vec![Move::range(source, Point::new(10, 10))];
        apply_reference_updates(&mut grid, &moves);
        assert_eq!(grid.raw(1, 1), "=SUM(R10C10:R12C12)");
    }

    #[test]
    fn non_formula_cells_are_left_alone() {
        let mut grid = InMemoryGrid::new(10, 10).unwrap();
        grid.set(1, 1, "R2C2").unwrap(); // no leading '='
        let moves = vec![Move::cell(Point::new(2, 2), Point::new(5, 5))];
        apply_reference_updates(&mut grid, &moves);
        assert_eq!(grid.raw(1, 1), "R2C2");
    }

    #[test]
    fn parse_coord_rejects_overflowing_digits_instead_of_panicking() {
        let huge = format!("R{}C1", "9".repeat(40));
        assert!(parse_coord(&huge).is_err());
    }

    #[test]
    fn formula_with_overflowing_reference_is_left_untouched() {
        let mut grid = InMemoryGrid::new(10, 10).unwrap();
        let huge_ref = format!("=R{}C1", "9".repeat(40));
        grid.set(1, 1, huge_ref.clone()).unwrap();
        let moves = vec![Move::cell(Point::new(2, 2), Point::new(5, 5))];
        apply_reference_updates(&mut grid, &moves);
        assert_eq!(grid.raw(1, 1), huge_ref);
    }
}
