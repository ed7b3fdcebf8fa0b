use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::grid::{is_walkable, Grid, Tile, TileCoord};

/// Hard ceiling on A* node expansions. Exceeding it is reported as "no path
/// found", not an error, so a degenerate search on a huge grid still
/// terminates inside the frame that issued it.
pub const MAX_EXPANSIONS: usize = 2000;

const CARDINAL_STEP_COST: u32 = 10;
const DIAGONAL_STEP_COST: u32 = 14;

const CARDINALS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONALS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    f_cost: u32,
    h_cost: u32,
    insertion: u64,
    index: usize,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.f_cost, self.h_cost, self.insertion).cmp(&(
            other.f_cost,
            other.h_cost,
            other.insertion,
        ))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* over the tile grid. Returns tile coordinates inclusive of `start` and
/// `goal`, or an empty vector when no path exists (which includes hitting
/// [`MAX_EXPANSIONS`]). Step cost is a fixed base plus a per-destination
/// surcharge from `tile.cost`, so costly terrain is avoided when a cheaper
/// detour exists. Ties on f-cost break on lower heuristic, then insertion
/// order, which keeps repeated searches reproducible without promising any
/// particular optimal path to callers.
pub fn find_path(
    grid: &Grid,
    tiles: &[Tile],
    start: TileCoord,
    goal: TileCoord,
    allow_diagonal: bool,
) -> Vec<TileCoord> {
    if !is_walkable(grid, tiles, start) || !is_walkable(grid, tiles, goal) {
        return Vec::new();
    }
    let Some(start_index) = grid.index_of(start) else {
        return Vec::new();
    };
    let Some(goal_index) = grid.index_of(goal) else {
        return Vec::new();
    };
    if start_index == goal_index {
        return vec![start];
    }

    let cell_count = grid.cell_count();
    let mut closed = vec![false; cell_count];
    let mut best_g = vec![u32::MAX; cell_count];
    let mut parent: Vec<Option<usize>> = vec![None; cell_count];
    let mut open = BinaryHeap::new();
    let mut next_insertion = 0u64;

    best_g[start_index] = 0;
    let start_h = heuristic(start, goal, allow_diagonal);
    open.push(Reverse(OpenNode {
        f_cost: start_h,
        h_cost: start_h,
        insertion: next_insertion,
        index: start_index,
    }));
    next_insertion += 1;

    let mut expansions = 0usize;
    while let Some(Reverse(current)) = open.pop() {
        if closed[current.index] {
            continue;
        }
        closed[current.index] = true;

        if current.index == goal_index {
            return reconstruct(grid, &parent, start_index, goal_index);
        }

        expansions += 1;
        if expansions >= MAX_EXPANSIONS {
            return Vec::new();
        }

        let coord = grid.tile_at_index(current.index);
        let current_g = best_g[current.index];
        for (neighbor, step_cost) in neighbors(grid, tiles, coord, allow_diagonal) {
            let Some(neighbor_index) = grid.index_of(neighbor) else {
                continue;
            };
            if closed[neighbor_index] {
                continue;
            }

            let tentative_g = current_g
                .saturating_add(step_cost)
                .saturating_add(tile_surcharge(tiles[neighbor_index].cost));
            if tentative_g >= best_g[neighbor_index] {
                continue;
            }

            best_g[neighbor_index] = tentative_g;
            parent[neighbor_index] = Some(current.index);
            let h_cost = heuristic(neighbor, goal, allow_diagonal);
            open.push(Reverse(OpenNode {
                f_cost: tentative_g.saturating_add(h_cost),
                h_cost,
                insertion: next_insertion,
                index: neighbor_index,
            }));
            next_insertion += 1;
        }
    }

    Vec::new()
}

/// Extra cost of entering a tile beyond the base step: `round(cost * 10)`
/// normalized around the base-10 cardinal step, never below zero for a
/// minimum-cost tile.
fn tile_surcharge(cost: f32) -> u32 {
    let scaled = ((cost * 10.0).round() as u32).max(1);
    scaled.saturating_sub(CARDINAL_STEP_COST)
}

/// Manhattan for 4-way search, Chebyshev when diagonals are allowed. Both
/// undercount the scaled step costs, so neither overestimates.
fn heuristic(from: TileCoord, goal: TileCoord, allow_diagonal: bool) -> u32 {
    let dx = from.x.abs_diff(goal.x);
    let dy = from.y.abs_diff(goal.y);
    if allow_diagonal {
        dx.max(dy)
    } else {
        dx + dy
    }
}

fn neighbors(
    grid: &Grid,
    tiles: &[Tile],
    from: TileCoord,
    allow_diagonal: bool,
) -> Vec<(TileCoord, u32)> {
    let mut result = Vec::with_capacity(if allow_diagonal { 8 } else { 4 });

    for (dx, dy) in CARDINALS {
        let next = TileCoord::new(from.x + dx, from.y + dy);
        if is_walkable(grid, tiles, next) {
            result.push((next, CARDINAL_STEP_COST));
        }
    }

    if allow_diagonal {
        for (dx, dy) in DIAGONALS {
            let next = TileCoord::new(from.x + dx, from.y + dy);
            // No corner cutting: both orthogonal cells must be open.
            let across_x = TileCoord::new(from.x + dx, from.y);
            let across_y = TileCoord::new(from.x, from.y + dy);
            if is_walkable(grid, tiles, next)
                && is_walkable(grid, tiles, across_x)
                && is_walkable(grid, tiles, across_y)
            {
                result.push((next, DIAGONAL_STEP_COST));
            }
        }
    }

    result
}

fn reconstruct(
    grid: &Grid,
    parent: &[Option<usize>],
    start_index: usize,
    goal_index: usize,
) -> Vec<TileCoord> {
    let mut indices = vec![goal_index];
    let mut cursor = goal_index;
    while cursor != start_index {
        match parent[cursor] {
            Some(previous) => cursor = previous,
            None => return Vec::new(),
        }
        indices.push(cursor);
    }
    indices.reverse();
    indices
        .into_iter()
        .map(|index| grid.tile_at_index(index))
        .collect()
}

/// Bresenham raster between two tile coordinates; false as soon as any
/// rasterized cell is out of bounds or unwalkable.
pub fn has_line_of_sight(grid: &Grid, tiles: &[Tile], a: TileCoord, b: TileCoord) -> bool {
    let mut x0 = a.x;
    let mut y0 = a.y;
    let dx = (b.x - a.x).abs();
    let dy = (b.y - a.y).abs();
    let sx = if a.x < b.x { 1 } else { -1 };
    let sy = if a.y < b.y { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        if !is_walkable(grid, tiles, TileCoord::new(x0, y0)) {
            return false;
        }
        if x0 == b.x && y0 == b.y {
            return true;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// String-pulling pass: greedily extend each segment as far as line of sight
/// allows and emit only the far endpoints. Output is never longer than the
/// input, preserves the endpoints, and every consecutive output pair has
/// mutual line of sight.
pub fn smooth_path(grid: &Grid, tiles: &[Tile], path: &[TileCoord]) -> Vec<TileCoord> {
    if path.len() <= 2 {
        return path.to_vec();
    }

    let mut smoothed = vec![path[0]];
    let mut anchor = 0;
    let mut probe = 1;

    while probe < path.len() {
        while probe + 1 < path.len() && has_line_of_sight(grid, tiles, path[anchor], path[probe + 1])
        {
            probe += 1;
        }
        smoothed.push(path[probe]);
        anchor = probe;
        probe = anchor + 1;
    }

    smoothed
}
