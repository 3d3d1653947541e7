use std::sync::LazyLock;

use cube_core::{CubieCube, FaceletCube, Move, parse_move_sequence};
use itertools::Itertools;
use two_phase::{Tables, TwoPhaseSolver};

static TABLES: LazyLock<Tables> = LazyLock::new(Tables::generate);

fn scrambled(sequence: &str) -> CubieCube {
    let mut cube = CubieCube::SOLVED;
    cube.apply_moves(&parse_move_sequence(sequence).unwrap());
    cube
}

fn solve_and_replay(cube: &CubieCube) -> String {
    let solver = TwoPhaseSolver::new(&TABLES);
    let solution = solver.solve(cube).unwrap();
    assert!(solution.len() <= 25);

    let mut replay = cube.clone();
    replay.apply_moves(solution.moves());
    assert!(replay.is_solved(), "{solution} does not solve the scramble");

    let text = solution.to_string();
    assert!(text.chars().all(|c| "URFDLB".contains(c)));
    text
}

#[test_log::test]
fn empty_scramble_yields_empty_solution() {
    assert_eq!(solve_and_replay(&CubieCube::SOLVED), "");
}

#[test_log::test]
fn single_u_turn() {
    let text = solve_and_replay(&scrambled("U"));
    assert!(text.len() <= 3);
}

#[test_log::test]
fn double_u_turn() {
    let text = solve_and_replay(&scrambled("UU"));
    assert!(text.len() <= 2);
}

#[test_log::test]
fn half_turn_scramble() {
    solve_and_replay(&scrambled("RRFFUULLBB"));
}

#[test_log::test]
fn superflip_is_solved() {
    // All twelve edges flipped in place, everything else solved.
    let mut cube = CubieCube::SOLVED;
    cube.edge_orient = [1; 12];
    assert_eq!(cube.verify(), Ok(()));
    solve_and_replay(&cube);
}

#[test_log::test]
fn invalid_twist_reports_error_5() {
    let mut cube = CubieCube::SOLVED;
    cube.corner_orient = [1, 0, 0, 0, 0, 0, 0, 0];
    let solver = TwoPhaseSolver::new(&TABLES);
    let err = solver.solve(&cube).unwrap_err();
    assert_eq!(err.code(), 5);
}

#[test_log::test]
fn random_scrambles_solve_and_replay() {
    fastrand::seed(2023);
    let all_moves = (0..cube_core::N_MOVES).map(Move::from_index).collect_vec();

    for _ in 0..20 {
        let mut cube = CubieCube::SOLVED;
        for _ in 0..20 {
            cube.apply_move(all_moves[fastrand::usize(..all_moves.len())]);
        }
        assert_eq!(cube.verify(), Ok(()));
        solve_and_replay(&cube);
    }
}

#[test_log::test]
fn parsed_diagram_solves_end_to_end() {
    let diagram = "   OOO\n   OOO\n   OOO\nWWWBBBYYYGGG\nGGGWWWBBBYYY\nGGGWWWBBBYYY\n   RRR\n   RRR\n   RRR\n";
    let cube = FaceletCube::parse_diagram(diagram)
        .unwrap()
        .to_cubie()
        .unwrap();
    let text = solve_and_replay(&cube);
    // One U turn away from solved, so three quarter turns at most.
    assert!(text.len() <= 3);
}

#[test_log::test]
fn fixed_scrambles_solve_within_the_move_bound() {
    // A handful of fixed mid-length scrambles, solved and replayed, to pin
    // the <= 25 move contract on something deterministic.
    let scrambles = [
        "U2 R2 F2",
        "R U F D L B",
        "U F U F U F U F",
        "R2 L2 U2 D2 F2 B2",
        "R U R' U' R' F R2 U' R' U' R U R' F'",
    ];
    for sequence in scrambles {
        solve_and_replay(&scrambled(sequence));
    }
}
