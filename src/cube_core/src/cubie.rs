use itertools::Itertools;
use thiserror::Error;

use crate::moves::Move;

// Quarter-turn templates, one per face in U, R, F, D, L, B order. Entry
// `[f][i]` names the slot whose occupant a clockwise turn of face `f`
// moves into slot `i`.
const CORNER_PERM_MOVES: [[u8; 8]; 6] = [
    [3, 0, 1, 2, 4, 5, 6, 7],
    [4, 1, 2, 0, 7, 5, 6, 3],
    [1, 5, 2, 3, 0, 4, 6, 7],
    [0, 1, 2, 3, 5, 6, 7, 4],
    [0, 2, 6, 3, 4, 1, 5, 7],
    [0, 1, 3, 7, 4, 5, 2, 6],
];

// U and D never twist corners; the other faces twist the four corners
// they move.
const CORNER_ORIENT_MOVES: [[u8; 8]; 6] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [2, 0, 0, 1, 1, 0, 0, 2],
    [1, 2, 0, 0, 2, 1, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 1, 2, 0, 0, 2, 1, 0],
    [0, 0, 1, 2, 0, 0, 2, 1],
];

const EDGE_PERM_MOVES: [[u8; 12]; 6] = [
    [3, 0, 1, 2, 4, 5, 6, 7, 8, 9, 10, 11],
    [8, 1, 2, 3, 11, 5, 6, 7, 4, 9, 10, 0],
    [0, 9, 2, 3, 4, 8, 6, 7, 1, 5, 10, 11],
    [0, 1, 2, 3, 5, 6, 7, 4, 8, 9, 10, 11],
    [0, 1, 10, 3, 4, 5, 9, 7, 8, 2, 6, 11],
    [0, 1, 2, 11, 4, 5, 6, 10, 8, 9, 3, 7],
];

// Only F and B flip the edges they move.
const EDGE_ORIENT_MOVES: [[u8; 12]; 6] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 1, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 1],
];

static MOVE_CUBES: [CubieCube; 6] = {
    let mut cubes = [CubieCube::SOLVED; 6];
    let mut face = 0;
    while face < 6 {
        cubes[face] = CubieCube {
            corner_perm: CORNER_PERM_MOVES[face],
            corner_orient: CORNER_ORIENT_MOVES[face],
            edge_perm: EDGE_PERM_MOVES[face],
            edge_orient: EDGE_ORIENT_MOVES[face],
        };
        face += 1;
    }
    cubes
};

/// Why a cubie state cannot be reached from the solved cube.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeStateError {
    #[error("an edge piece is missing or duplicated")]
    InvalidEdgePerm,
    #[error("the edge orientation sum is odd")]
    BadFlipParity,
    #[error("a corner piece is missing or duplicated")]
    InvalidCornerPerm,
    #[error("the corner orientation sum is not divisible by 3")]
    BadTwistParity,
    #[error("corner and edge permutation parities differ")]
    ParityMismatch,
}

impl CubeStateError {
    /// Stable numeric code reported on the command-line surface.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            CubeStateError::InvalidEdgePerm => 2,
            CubeStateError::BadFlipParity => 3,
            CubeStateError::InvalidCornerPerm => 4,
            CubeStateError::BadTwistParity => 5,
            CubeStateError::ParityMismatch => 6,
        }
    }
}

/// Piece-level cube state: which piece occupies each slot and how it is
/// oriented there.
///
/// Corner slots are URF=0, UFL=1, ULB=2, UBR=3, DFR=4, DLF=5, DBL=6,
/// DRB=7; edge slots are UR=0, UF=1, UL=2, UB=3, DR=4, DF=5, DL=6, DB=7,
/// FR=8, FL=9, BL=10, BR=11 (the last four are the E-slice). A corner
/// orientation counts clockwise twists of the piece in its slot, an edge
/// orientation whether the piece is flipped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CubieCube {
    pub corner_perm: [u8; 8],
    pub corner_orient: [u8; 8],
    pub edge_perm: [u8; 12],
    pub edge_orient: [u8; 12],
}

impl Default for CubieCube {
    fn default() -> Self {
        Self::SOLVED
    }
}

impl CubieCube {
    pub const SOLVED: CubieCube = CubieCube {
        corner_perm: [0, 1, 2, 3, 4, 5, 6, 7],
        corner_orient: [0; 8],
        edge_perm: [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        edge_orient: [0; 12],
    };

    /// Apply a face turn by composing the face's quarter-turn template
    /// onto the state once per quarter turn.
    pub fn apply_move(&mut self, mv: Move) {
        let template = &MOVE_CUBES[mv.face.index()];
        for _ in 0..mv.turns {
            self.compose_corners(template);
            self.compose_edges(template);
        }
    }

    /// Apply a sequence of face turns in order.
    pub fn apply_moves(&mut self, moves: &[Move]) {
        for &mv in moves {
            self.apply_move(mv);
        }
    }

    // Permutation composition, `other` applied after `self`.
    fn compose_corners(&mut self, other: &CubieCube) {
        let mut perm = [0u8; 8];
        let mut orient = [0u8; 8];
        for i in 0..8 {
            let from = usize::from(other.corner_perm[i]);
            perm[i] = self.corner_perm[from];
            orient[i] = (self.corner_orient[from] + other.corner_orient[i]) % 3;
        }
        self.corner_perm = perm;
        self.corner_orient = orient;
    }

    fn compose_edges(&mut self, other: &CubieCube) {
        let mut perm = [0u8; 12];
        let mut orient = [0u8; 12];
        for i in 0..12 {
            let from = usize::from(other.edge_perm[i]);
            perm[i] = self.edge_perm[from];
            orient[i] = (self.edge_orient[from] + other.edge_orient[i]) % 2;
        }
        self.edge_perm = perm;
        self.edge_orient = orient;
    }

    /// Parity of the corner permutation: 0 for even, 1 for odd.
    #[must_use]
    pub fn corner_parity(&self) -> u8 {
        Self::permutation_parity(&self.corner_perm)
    }

    /// Parity of the edge permutation: 0 for even, 1 for odd.
    #[must_use]
    pub fn edge_parity(&self) -> u8 {
        Self::permutation_parity(&self.edge_perm)
    }

    fn permutation_parity(perm: &[u8]) -> u8 {
        let mut inversions = 0u32;
        for i in 1..perm.len() {
            for j in 0..i {
                if perm[j] > perm[i] {
                    inversions += 1;
                }
            }
        }
        (inversions % 2) as u8
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        *self == Self::SOLVED
    }

    /// Check the structural invariants that make the state reachable from
    /// the solved cube by face turns.
    ///
    /// # Errors
    ///
    /// One [`CubeStateError`] per violated invariant, checked in the order
    /// edge permutation, edge orientation, corner permutation, corner
    /// orientation, permutation parity.
    pub fn verify(&self) -> Result<(), CubeStateError> {
        if self.edge_perm.iter().any(|&piece| piece >= 12)
            || !self.edge_perm.iter().all_unique()
        {
            return Err(CubeStateError::InvalidEdgePerm);
        }
        if self.edge_orient.iter().map(|&o| u32::from(o)).sum::<u32>() % 2 != 0 {
            return Err(CubeStateError::BadFlipParity);
        }
        if self.corner_perm.iter().any(|&piece| piece >= 8)
            || !self.corner_perm.iter().all_unique()
        {
            return Err(CubeStateError::InvalidCornerPerm);
        }
        if self.corner_orient.iter().map(|&o| u32::from(o)).sum::<u32>() % 3 != 0 {
            return Err(CubeStateError::BadTwistParity);
        }
        if self.edge_parity() != self.corner_parity() {
            return Err(CubeStateError::ParityMismatch);
        }
        Ok(())
    }
}
