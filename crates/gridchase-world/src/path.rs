//! Pathfinding over a [`GridWorld`].
//!
//! All searches walk [`GridWorld::neighbors4`], so walls are never entered
//! and adjacency is identical to what the generator assumed. Agent occupancy
//! is deliberately ignored: who stands where is a movement-time concern, not
//! a terrain concern.
//!
//! Paths are returned start-to-goal inclusive. A missing path is `None`,
//! never an error.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use gridchase_types::Position;

use crate::grid::GridWorld;

/// Number of passable cells reachable from `start` (the generator's
/// "energy"). Zero when `start` itself is not passable.
pub fn flood_fill(grid: &GridWorld, start: Position) -> usize {
    if !grid.is_passable(start) {
        return 0;
    }

    let mut visited = BTreeSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for neighbor in grid.neighbors4(current) {
            if visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    visited.len()
}

/// Whether every passable cell is reachable from every other one.
///
/// A grid with no passable cells is trivially connected.
pub fn is_connected(grid: &GridWorld) -> bool {
    grid.first_passable()
        .is_none_or(|start| flood_fill(grid, start) == grid.passable_count())
}

/// Breadth-first search from `start` to the closest cell matching
/// `predicate`.
///
/// `start` itself is tested first, so a matching start yields a one-cell
/// path. Returns `None` if `start` is not passable or no matching cell is
/// reachable. The first match dequeued is optimal because BFS visits cells
/// in non-decreasing step order.
pub fn bfs_nearest<F>(grid: &GridWorld, start: Position, predicate: F) -> Option<Vec<Position>>
where
    F: Fn(Position) -> bool,
{
    if !grid.is_passable(start) {
        return None;
    }

    let mut visited = BTreeSet::new();
    let mut prev: BTreeMap<Position, Position> = BTreeMap::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if predicate(current) {
            return Some(reconstruct(&prev, start, current));
        }
        for neighbor in grid.neighbors4(current) {
            if visited.insert(neighbor) {
                prev.insert(neighbor, current);
                queue.push_back(neighbor);
            }
        }
    }

    None
}

/// A* shortest path from `start` to `goal` with the Manhattan heuristic.
///
/// On a 4-connected unit-cost grid the heuristic is admissible and
/// consistent, so the returned path is exactly as long as the BFS one.
/// Among equally promising frontier cells the one inserted first is
/// expanded first, which keeps results deterministic.
pub fn astar(grid: &GridWorld, start: Position, goal: Position) -> Option<Vec<Position>> {
    if !grid.is_passable(start) || !grid.is_passable(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    // Best known cost from start.
    let mut g_score: BTreeMap<Position, usize> = BTreeMap::new();
    // Predecessor map for path reconstruction.
    let mut prev: BTreeMap<Position, Position> = BTreeMap::new();
    // Frontier ordered by (f, insertion sequence). The sequence makes the
    // ordering FIFO among equal f values.
    let mut open: BTreeSet<(usize, u64, Position)> = BTreeSet::new();
    // Current frontier key of each open cell, so it can be re-keyed.
    let mut open_keys: BTreeMap<Position, (usize, u64)> = BTreeMap::new();
    let mut closed: BTreeSet<Position> = BTreeSet::new();
    let mut seq: u64 = 0;

    g_score.insert(start, 0);
    let start_key = (start.manhattan(goal), seq);
    open.insert((start_key.0, start_key.1, start));
    open_keys.insert(start, start_key);

    while let Some(&(f, s, current)) = open.iter().next() {
        open.remove(&(f, s, current));
        open_keys.remove(&current);

        if current == goal {
            return Some(reconstruct(&prev, start, goal));
        }
        closed.insert(current);

        let Some(current_g) = g_score.get(&current).copied() else {
            continue;
        };
        let Some(tentative) = current_g.checked_add(1) else {
            continue;
        };

        for neighbor in grid.neighbors4(current) {
            if closed.contains(&neighbor) {
                continue;
            }
            let is_better = g_score
                .get(&neighbor)
                .is_none_or(|&existing| tentative < existing);
            if !is_better {
                continue;
            }

            if let Some((old_f, old_seq)) = open_keys.remove(&neighbor) {
                open.remove(&(old_f, old_seq, neighbor));
            }
            seq = seq.saturating_add(1);
            let f_score = tentative.saturating_add(neighbor.manhattan(goal));
            g_score.insert(neighbor, tentative);
            prev.insert(neighbor, current);
            open.insert((f_score, seq, neighbor));
            open_keys.insert(neighbor, (f_score, seq));
        }
    }

    None
}

/// Walk the predecessor chain back from `goal` to `start`.
fn reconstruct(prev: &BTreeMap<Position, Position>, start: Position, goal: Position) -> Vec<Position> {
    let mut path = VecDeque::new();
    let mut current = goal;
    path.push_front(current);
    while current != start {
        let Some(&predecessor) = prev.get(&current) else {
            break;
        };
        path.push_front(predecessor);
        current = predecessor;
    }
    path.into_iter().collect()
}
