//! The two-phase IDA* searcher.
//!
//! Phase 1 drives the cube into the G1 subgroup (orientations zero, the
//! E-slice edges home) under the full 18-move set; phase 2 finishes the
//! solve inside G1 where only U, U2, U', D, D2, D', R2, F2, L2 and B2 are
//! available. Both phases walk integer coordinates through the
//! precomputed tables; no cubie state is touched during the search.

use std::time::{Duration, Instant};

use cube_core::coords::N_SLICE_PERM;
use cube_core::{CubeStateError, CubieCube};
use log::{debug, info};
use thiserror::Error;

use crate::solution::Solution;
use crate::tables::{PARITY_MOVE, Tables};
use crate::{start, success, working};

/// Deepest total solution length the search stacks support.
pub const MAX_SEARCH_DEPTH: usize = 30;
const STACK_LEN: usize = MAX_SEARCH_DEPTH + 1;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    #[error(transparent)]
    InvalidCube(#[from] CubeStateError),
    #[error("no solution within the depth limit")]
    DepthExhausted,
    #[error("the search timed out")]
    Timeout,
}

impl SolveError {
    /// Stable numeric code reported on the command-line surface.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            SolveError::InvalidCube(err) => err.code(),
            SolveError::DepthExhausted => 7,
            SolveError::Timeout => 8,
        }
    }
}

/// The searcher: shared tables plus the search budgets. Per-solve scratch
/// lives in a fresh [`SearchState`] per call, so one instance serves any
/// number of consecutive solves and instances may run on separate threads
/// against the same tables.
pub struct TwoPhaseSolver<'a> {
    tables: &'a Tables,
    /// Maximum total solution length, clamped to [`MAX_SEARCH_DEPTH`].
    pub max_depth: u8,
    /// Wall-clock budget, checked at every phase-1 node.
    pub timeout: Duration,
    /// Ceiling on the number of phase-2 moves. Ten is the conventional
    /// cap; raising it towards `max_depth` trades speed for coverage of
    /// rare states whose phase-2 distance exceeds it.
    pub phase2_limit: u8,
}

// Depth-indexed stacks for one solve: the move path, the coordinates of
// every prefix and the heuristic bounds computed along it. Entry `d + 1`
// always derives from entry `d` and the move at depth `d`.
struct SearchState {
    faces: [u8; STACK_LEN],
    turns: [u8; STACK_LEN],
    // Phase 1.
    twist: [u16; STACK_LEN],
    flip: [u16; STACK_LEN],
    slice_pos: [u16; STACK_LEN],
    min_dist_phase1: [u8; STACK_LEN],
    // Phase 2.
    parity: [u8; STACK_LEN],
    corner_perm: [u16; STACK_LEN],
    slice_perm: [u16; STACK_LEN],
    ur_to_ul: [u16; STACK_LEN],
    ub_to_df: [u16; STACK_LEN],
    ud_edge_perm: [u16; STACK_LEN],
    min_dist_phase2: [u8; STACK_LEN],
}

impl SearchState {
    fn new(cube: &CubieCube) -> SearchState {
        let mut state = SearchState {
            faces: [0; STACK_LEN],
            turns: [0; STACK_LEN],
            twist: [0; STACK_LEN],
            flip: [0; STACK_LEN],
            slice_pos: [0; STACK_LEN],
            min_dist_phase1: [0; STACK_LEN],
            parity: [0; STACK_LEN],
            corner_perm: [0; STACK_LEN],
            slice_perm: [0; STACK_LEN],
            ur_to_ul: [0; STACK_LEN],
            ub_to_df: [0; STACK_LEN],
            ud_edge_perm: [0; STACK_LEN],
            min_dist_phase2: [0; STACK_LEN],
        };
        state.twist[0] = cube.twist();
        state.flip[0] = cube.flip();
        let slice = cube.slice();
        state.slice_pos[0] = slice / N_SLICE_PERM as u16;
        state.slice_perm[0] = slice;
        state.parity[0] = cube.corner_parity();
        state.corner_perm[0] = cube.corner_perm_coord();
        state.ur_to_ul[0] = cube.ur_to_ul();
        state.ub_to_df[0] = cube.ub_to_df();
        state
    }

    fn move_index(&self, depth: usize) -> usize {
        3 * usize::from(self.faces[depth]) + usize::from(self.turns[depth]) - 1
    }
}

// Successor faces rejected by the canonical move order: the same face
// twice in a row, and the fixed direction of each opposite-face pair
// (U after D, R after L, F after B).
fn redundant(prev_face: u8, next_face: u8) -> bool {
    prev_face == next_face || prev_face == next_face + 3
}

// U and D run through all three turn amounts in phase 2; the other faces
// only have their half turn.
fn phase2_first_turn(face: u8) -> u8 {
    if face == 0 || face == 3 { 1 } else { 2 }
}

impl<'a> TwoPhaseSolver<'a> {
    #[must_use]
    pub fn new(tables: &'a Tables) -> TwoPhaseSolver<'a> {
        TwoPhaseSolver {
            tables,
            max_depth: 25,
            timeout: Duration::from_secs(10),
            phase2_limit: 10,
        }
    }

    /// Search for a move sequence bringing `cube` to the solved state.
    ///
    /// The result is not guaranteed optimal, but stays within `max_depth`
    /// moves and in practice lands well under it.
    ///
    /// # Errors
    ///
    /// [`SolveError::InvalidCube`] if the state fails verification,
    /// [`SolveError::DepthExhausted`] if no solution exists within
    /// `max_depth`, and [`SolveError::Timeout`] when the wall-clock
    /// budget runs out first.
    pub fn solve(&self, cube: &CubieCube) -> Result<Solution, SolveError> {
        cube.verify()?;
        if cube.is_solved() {
            return Ok(Solution::default());
        }

        info!(start!("Searching for a two-phase solution"));
        let started = Instant::now();
        let max_depth = usize::from(self.max_depth).min(MAX_SEARCH_DEPTH);
        let mut state = SearchState::new(cube);

        for depth_phase1 in 1..=max_depth {
            debug!(working!("Trying phase-1 depth {}"), depth_phase1);
            if let Some(total) = self.search_phase1(&mut state, depth_phase1, max_depth, started)? {
                info!(
                    success!("Solved in {} moves after {:.3}s"),
                    total,
                    started.elapsed().as_secs_f64()
                );
                return Ok(Solution::from_stacks(&state.faces, &state.turns, total));
            }
        }
        Err(SolveError::DepthExhausted)
    }

    // Depth-limited phase-1 DFS with an explicit depth cursor. Returns the
    // total solution length once a phase-1 leaf extends to a full solution
    // that survives the phase-boundary check.
    fn search_phase1(
        &self,
        state: &mut SearchState,
        depth_phase1: usize,
        max_depth: usize,
        started: Instant,
    ) -> Result<Option<usize>, SolveError> {
        let tables = self.tables;
        let mut depth = 0usize;
        state.faces[0] = 0;
        state.turns[0] = 1;

        loop {
            if started.elapsed() > self.timeout {
                return Err(SolveError::Timeout);
            }

            let mv = state.move_index(depth);
            state.flip[depth + 1] = tables.flip_move[usize::from(state.flip[depth])][mv];
            state.twist[depth + 1] = tables.twist_move[usize::from(state.twist[depth])][mv];
            state.slice_pos[depth + 1] = tables.slice_move
                [usize::from(state.slice_pos[depth]) * N_SLICE_PERM][mv]
                / N_SLICE_PERM as u16;
            state.min_dist_phase1[depth + 1] = tables.phase1_dist(
                state.twist[depth + 1],
                state.flip[depth + 1],
                state.slice_pos[depth + 1],
            );

            // A leaf in G1 after exactly `depth_phase1` moves: hand over to
            // phase 2. The boundary check rejects a continuation that the
            // canonical order would have folded into the phase-1 prefix.
            if state.min_dist_phase1[depth + 1] == 0 && depth == depth_phase1 - 1 {
                if let Some(total) = self.search_phase2(state, depth_phase1, max_depth) {
                    if total == depth_phase1
                        || !redundant(state.faces[depth_phase1 - 1], state.faces[depth_phase1])
                    {
                        return Ok(Some(total));
                    }
                }
            }

            if depth + 1 < depth_phase1
                && depth_phase1 - depth - 1 >= usize::from(state.min_dist_phase1[depth + 1])
            {
                // Descend, starting from the first face the canonical order
                // admits after the move above.
                depth += 1;
                state.faces[depth] = 0;
                while redundant(state.faces[depth - 1], state.faces[depth]) {
                    state.faces[depth] += 1;
                }
                state.turns[depth] = 1;
            } else {
                // Advance to the next move at this level, backtracking out
                // of exhausted levels.
                loop {
                    state.turns[depth] += 1;
                    if state.turns[depth] <= 3 {
                        break;
                    }
                    state.turns[depth] = 1;
                    state.faces[depth] += 1;
                    while depth > 0
                        && state.faces[depth] <= 5
                        && redundant(state.faces[depth - 1], state.faces[depth])
                    {
                        state.faces[depth] += 1;
                    }
                    if state.faces[depth] <= 5 {
                        break;
                    }
                    if depth == 0 {
                        return Ok(None);
                    }
                    depth -= 1;
                }
            }
        }
    }

    // Replay the phase-1 prefix through the phase-2 move tables, then run
    // the phase-2 IDA* within the restricted move set. Returns the total
    // solution length, or `None` when no extension fits the budget.
    fn search_phase2(
        &self,
        state: &mut SearchState,
        depth_phase1: usize,
        max_depth: usize,
    ) -> Option<usize> {
        let tables = self.tables;
        let max_phase2 = usize::from(self.phase2_limit).min(max_depth - depth_phase1);

        for i in 0..depth_phase1 {
            let mv = state.move_index(i);
            state.corner_perm[i + 1] =
                tables.corner_perm_move[usize::from(state.corner_perm[i])][mv];
            state.slice_perm[i + 1] = tables.slice_move[usize::from(state.slice_perm[i])][mv];
            state.parity[i + 1] = PARITY_MOVE[usize::from(state.parity[i])][mv];
        }
        let corner_dist = tables.corner_dist(
            state.corner_perm[depth_phase1],
            state.slice_perm[depth_phase1],
            state.parity[depth_phase1],
        );
        if usize::from(corner_dist) > max_phase2 {
            return None;
        }

        // The edge coordinate is only needed past the corner check, so its
        // helpers are replayed separately.
        for i in 0..depth_phase1 {
            let mv = state.move_index(i);
            state.ur_to_ul[i + 1] = tables.ur_to_ul_move[usize::from(state.ur_to_ul[i])][mv];
            state.ub_to_df[i + 1] = tables.ub_to_df_move[usize::from(state.ub_to_df[i])][mv];
        }
        // Inside G1 both helpers stay below 336 and never conflict.
        let merged = tables.merge_ud_edge_perm[usize::from(state.ur_to_ul[depth_phase1])]
            [usize::from(state.ub_to_df[depth_phase1])];
        debug_assert!(merged >= 0);
        state.ud_edge_perm[depth_phase1] = merged as u16;

        let edge_dist = tables.edge_dist(
            state.ud_edge_perm[depth_phase1],
            state.slice_perm[depth_phase1],
            state.parity[depth_phase1],
        );
        if usize::from(edge_dist) > max_phase2 {
            return None;
        }
        if corner_dist.max(edge_dist) == 0 {
            return Some(depth_phase1);
        }

        for depth_phase2 in 1..=max_phase2 {
            if let Some(total) = Self::dfs_phase2(tables, state, depth_phase1, depth_phase2) {
                return Some(total);
            }
        }
        None
    }

    fn dfs_phase2(
        tables: &Tables,
        state: &mut SearchState,
        depth_phase1: usize,
        depth_phase2: usize,
    ) -> Option<usize> {
        let mut depth = depth_phase1;
        state.faces[depth] = 0;
        state.turns[depth] = 1;

        loop {
            let mv = state.move_index(depth);
            state.corner_perm[depth + 1] =
                tables.corner_perm_move[usize::from(state.corner_perm[depth])][mv];
            state.slice_perm[depth + 1] =
                tables.slice_move[usize::from(state.slice_perm[depth])][mv];
            state.parity[depth + 1] = PARITY_MOVE[usize::from(state.parity[depth])][mv];
            state.ud_edge_perm[depth + 1] =
                tables.ud_edge_perm_move[usize::from(state.ud_edge_perm[depth])][mv];
            state.min_dist_phase2[depth + 1] = tables
                .edge_dist(
                    state.ud_edge_perm[depth + 1],
                    state.slice_perm[depth + 1],
                    state.parity[depth + 1],
                )
                .max(tables.corner_dist(
                    state.corner_perm[depth + 1],
                    state.slice_perm[depth + 1],
                    state.parity[depth + 1],
                ));

            if state.min_dist_phase2[depth + 1] == 0 {
                return Some(depth + 1);
            }

            if depth + 1 < depth_phase1 + depth_phase2
                && depth_phase1 + depth_phase2 - depth - 1
                    >= usize::from(state.min_dist_phase2[depth + 1])
            {
                depth += 1;
                state.faces[depth] = 0;
                while state.faces[depth] <= 5
                    && redundant(state.faces[depth - 1], state.faces[depth])
                {
                    state.faces[depth] += 1;
                }
                state.turns[depth] = phase2_first_turn(state.faces[depth]);
            } else {
                loop {
                    let mut advanced_within_face = false;
                    if state.faces[depth] == 0 || state.faces[depth] == 3 {
                        state.turns[depth] += 1;
                        if state.turns[depth] <= 3 {
                            advanced_within_face = true;
                        } else {
                            state.turns[depth] = 1;
                            state.faces[depth] += 1;
                        }
                    } else {
                        state.faces[depth] += 1;
                    }
                    if advanced_within_face {
                        break;
                    }
                    while depth > depth_phase1
                        && state.faces[depth] <= 5
                        && redundant(state.faces[depth - 1], state.faces[depth])
                    {
                        state.faces[depth] += 1;
                    }
                    if state.faces[depth] <= 5 {
                        state.turns[depth] = phase2_first_turn(state.faces[depth]);
                        break;
                    }
                    if depth == depth_phase1 {
                        return None;
                    }
                    depth -= 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_tables::TABLES;
    use cube_core::{Face, Move};

    fn scrambled(moves: &[Move]) -> CubieCube {
        let mut cube = CubieCube::SOLVED;
        cube.apply_moves(moves);
        cube
    }

    fn assert_solves(cube: &CubieCube) -> Solution {
        let solver = TwoPhaseSolver::new(&TABLES);
        let solution = solver.solve(cube).unwrap();
        let mut replay = cube.clone();
        replay.apply_moves(solution.moves());
        assert!(replay.is_solved(), "{solution} does not solve the cube");
        assert!(solution.len() <= 25);
        solution
    }

    #[test]
    fn already_solved_cube_needs_no_moves() {
        let solution = assert_solves(&CubieCube::SOLVED);
        assert!(solution.is_empty());
    }

    #[test]
    fn single_quarter_turn_is_undone() {
        let solution = assert_solves(&scrambled(&[Move { face: Face::U, turns: 1 }]));
        assert_eq!(solution.to_string(), "UUU");
    }

    #[test]
    fn half_turn_is_undone_by_a_half_turn() {
        let solution = assert_solves(&scrambled(&[Move { face: Face::U, turns: 2 }]));
        assert_eq!(solution.to_string(), "UU");
    }

    #[test]
    fn every_single_move_scramble_solves() {
        for index in 0..cube_core::N_MOVES {
            let solution = assert_solves(&scrambled(&[Move::from_index(index)]));
            assert!(solution.len() <= 2);
        }
    }

    #[test]
    fn invalid_cubes_are_rejected_before_searching() {
        let solver = TwoPhaseSolver::new(&TABLES);

        let mut twisted = CubieCube::SOLVED;
        twisted.corner_orient[0] = 1;
        let err = solver.solve(&twisted).unwrap_err();
        assert_eq!(err.code(), 5);

        let mut swapped = CubieCube::SOLVED;
        swapped.edge_perm.swap(0, 1);
        let err = solver.solve(&swapped).unwrap_err();
        assert_eq!(err.code(), 6);

        let mut duplicated = CubieCube::SOLVED;
        duplicated.edge_perm[0] = 1;
        let err = solver.solve(&duplicated).unwrap_err();
        assert_eq!(err.code(), 2);
    }

    #[test]
    fn zero_timeout_reports_timeout() {
        let mut solver = TwoPhaseSolver::new(&TABLES);
        solver.timeout = Duration::ZERO;
        let cube = scrambled(&[
            Move { face: Face::R, turns: 1 },
            Move { face: Face::U, turns: 1 },
            Move { face: Face::F, turns: 3 },
        ]);
        let err = solver.solve(&cube).unwrap_err();
        assert_eq!(err, SolveError::Timeout);
        assert_eq!(err.code(), 8);
    }

    #[test]
    fn exhausted_depth_reports_error() {
        let mut solver = TwoPhaseSolver::new(&TABLES);
        solver.max_depth = 1;
        let cube = scrambled(&[
            Move { face: Face::R, turns: 1 },
            Move { face: Face::U, turns: 1 },
            Move { face: Face::F, turns: 3 },
            Move { face: Face::D, turns: 2 },
            Move { face: Face::B, turns: 1 },
        ]);
        let err = solver.solve(&cube).unwrap_err();
        assert_eq!(err, SolveError::DepthExhausted);
        assert_eq!(err.code(), 7);
    }
}
