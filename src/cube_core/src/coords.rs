//! Integer coordinates over the cubie state.
//!
//! Each coordinate is a bijection between one aspect of the cube and a
//! contiguous integer range, so move application becomes a table lookup.
//! Position parts use the combinatorial number system; permutation parts
//! use a factorial-base encoding produced by rotating the selected pieces
//! into place and recording the rotation counts.

use crate::cubie::CubieCube;

/// Corner orientations, base 3 over the first seven corners.
pub const N_TWIST: usize = 2187;
/// Edge orientations, base 2 over the first eleven edges.
pub const N_FLIP: usize = 2048;
/// Positions of the four E-slice edges: C(12,4).
pub const N_SLICE_POS: usize = 495;
/// Permutations of the four E-slice edges within their positions: 4!.
pub const N_SLICE_PERM: usize = 24;
/// Full E-slice coordinate, position and permutation combined.
pub const N_SLICE: usize = N_SLICE_POS * N_SLICE_PERM;
/// Placement of corners 0..=5: C(8,6) * 6!.
pub const N_CORNER_PERM: usize = 20_160;
/// Placement of edges 0..=5 in G1: C(12,6) is not free there, but the
/// coordinate is defined over the same 20160-value range as the corners.
pub const N_UD_EDGE_PERM: usize = 20_160;
/// Placement of edges UR, UF, UL anywhere on the cube: C(12,3) * 3!.
pub const N_UR_TO_UL: usize = 1320;
/// Placement of edges UB, DR, DF anywhere on the cube.
pub const N_UB_TO_DF: usize = 1320;
/// Permutation parity values.
pub const N_PARITY: usize = 2;
/// Helper coordinates stay below 336 whenever the six tracked edges sit in
/// the eight UD slots, so the merge table is dimensioned 336 x 336.
pub const N_MERGE: usize = 336;

/// Marker the partial edge setters leave in slots they do not determine.
pub(crate) const UNSET_EDGE: u8 = 11;

// Scratch marker used while decoding a full permutation coordinate.
const EMPTY: u8 = 0xFF;

/// Binomial coefficient with the conventions the encodings rely on:
/// `C(n, 0) == 1` and `C(n, k) == 0` whenever `n < k`.
#[must_use]
pub fn n_choose_k(n: usize, k: usize) -> u32 {
    if n < k {
        return 0;
    }
    let k = k.min(n - k);
    let mut result = 1u32;
    for i in 0..k {
        result = result * (n - i) as u32 / (i as u32 + 1);
    }
    result
}

impl CubieCube {
    /// Corner orientation coordinate in `0..2187`. The eighth corner is
    /// implied by the twists summing to 0 mod 3.
    #[must_use]
    pub fn twist(&self) -> u16 {
        self.corner_orient[..7]
            .iter()
            .fold(0, |acc, &orient| 3 * acc + u16::from(orient))
    }

    pub fn set_twist(&mut self, mut twist: u16) {
        let mut sum = 0;
        for i in (0..7).rev() {
            self.corner_orient[i] = (twist % 3) as u8;
            sum += self.corner_orient[i];
            twist /= 3;
        }
        self.corner_orient[7] = (3 - sum % 3) % 3;
    }

    /// Edge orientation coordinate in `0..2048`. The twelfth edge is
    /// implied by the flips summing to 0 mod 2.
    #[must_use]
    pub fn flip(&self) -> u16 {
        self.edge_orient[..11]
            .iter()
            .fold(0, |acc, &orient| 2 * acc + u16::from(orient))
    }

    pub fn set_flip(&mut self, mut flip: u16) {
        let mut sum = 0;
        for i in (0..11).rev() {
            self.edge_orient[i] = (flip % 2) as u8;
            sum += self.edge_orient[i];
            flip /= 2;
        }
        self.edge_orient[11] = (2 - sum % 2) % 2;
    }

    /// E-slice coordinate in `0..11880`: `24 * choice + perm`, where
    /// `choice` encodes which four slots hold the slice edges and `perm`
    /// their order within those slots.
    #[must_use]
    pub fn slice(&self) -> u16 {
        let mut choice = 0u16;
        let mut count = 0usize;
        let mut slice = [0u8; 4];
        for j in (0..12).rev() {
            if self.edge_perm[j] >= 8 {
                choice += n_choose_k(11 - j, count + 1) as u16;
                slice[3 - count] = self.edge_perm[j];
                count += 1;
            }
        }

        let mut perm = 0u16;
        for j in (1..4).rev() {
            let mut rotations = 0u16;
            while slice[j] != j as u8 + 8 {
                slice[..=j].rotate_left(1);
                rotations += 1;
            }
            perm = (j as u16 + 1) * perm + rotations;
        }
        24 * choice + perm
    }

    pub fn set_slice(&mut self, index: u16) {
        let mut slice = [8u8, 9, 10, 11];
        let others = [0u8, 1, 2, 3, 4, 5, 6, 7];
        let mut perm = index % 24;
        let mut choice = i32::from(index / 24);

        self.edge_perm = [EMPTY; 12];
        for j in 1..4 {
            let rotations = perm % (j as u16 + 1);
            perm /= j as u16 + 1;
            for _ in 0..rotations {
                slice[..=j].rotate_right(1);
            }
        }

        let mut count = 3i32;
        for j in 0..12 {
            let weight = n_choose_k(11 - j, (count + 1) as usize) as i32;
            if choice >= weight {
                self.edge_perm[j] = slice[(3 - count) as usize];
                choice -= weight;
                count -= 1;
            }
        }

        let mut next = 0;
        for slot in &mut self.edge_perm {
            if *slot == EMPTY {
                *slot = others[next];
                next += 1;
            }
        }
    }

    /// Phase-2 corner permutation coordinate in `0..20160`: the placement
    /// of corners 0..=5, with the last two implied by parity.
    #[must_use]
    pub fn corner_perm_coord(&self) -> u16 {
        let mut choice = 0u16;
        let mut count = 0usize;
        let mut corners = [0u8; 6];
        for j in 0..8 {
            if self.corner_perm[j] <= 5 {
                choice += n_choose_k(j, count + 1) as u16;
                corners[count] = self.corner_perm[j];
                count += 1;
            }
        }

        let mut perm = 0u16;
        for j in (1..6).rev() {
            let mut rotations = 0u16;
            while corners[j] != j as u8 {
                corners[..=j].rotate_left(1);
                rotations += 1;
            }
            perm = (j as u16 + 1) * perm + rotations;
        }
        720 * choice + perm
    }

    pub fn set_corner_perm_coord(&mut self, index: u16) {
        let mut corners = [0u8, 1, 2, 3, 4, 5];
        let others = [6u8, 7];
        let mut perm = index % 720;
        let mut choice = i32::from(index / 720);

        self.corner_perm = [EMPTY; 8];
        for j in 1..6 {
            let rotations = perm % (j as u16 + 1);
            perm /= j as u16 + 1;
            for _ in 0..rotations {
                corners[..=j].rotate_right(1);
            }
        }

        let mut count = 5i32;
        for j in (0..8).rev() {
            let weight = n_choose_k(j, (count + 1) as usize) as i32;
            if choice >= weight {
                self.corner_perm[j] = corners[count as usize];
                choice -= weight;
                count -= 1;
            }
        }

        let mut next = 0;
        for slot in &mut self.corner_perm {
            if *slot == EMPTY {
                *slot = others[next];
                next += 1;
            }
        }
    }

    /// Phase-2 UD edge permutation coordinate in `0..20160`: the placement
    /// of edges 0..=5. Well-defined as a search coordinate only in G1,
    /// where those edges cannot occupy E-slice slots. Outside G1 the
    /// placement rank exceeds the coordinate range and the value wraps;
    /// the search never follows a non-G1 move through this coordinate.
    #[must_use]
    pub fn ud_edge_perm(&self) -> u16 {
        let mut choice = 0u32;
        let mut count = 0usize;
        let mut edges = [0u8; 6];
        for j in 0..12 {
            if self.edge_perm[j] <= 5 {
                choice += n_choose_k(j, count + 1);
                edges[count] = self.edge_perm[j];
                count += 1;
            }
        }

        let mut perm = 0u32;
        for j in (1..6).rev() {
            let mut rotations = 0u32;
            while edges[j] != j as u8 {
                edges[..=j].rotate_left(1);
                rotations += 1;
            }
            perm = (j as u32 + 1) * perm + rotations;
        }
        (720 * choice + perm) as u16
    }

    pub fn set_ud_edge_perm(&mut self, index: u16) {
        let mut edges = [0u8, 1, 2, 3, 4, 5];
        let others = [6u8, 7, 8, 9, 10, 11];
        let mut perm = index % 720;
        let mut choice = i32::from(index / 720);

        self.edge_perm = [EMPTY; 12];
        for j in 1..6 {
            let rotations = perm % (j as u16 + 1);
            perm /= j as u16 + 1;
            for _ in 0..rotations {
                edges[..=j].rotate_right(1);
            }
        }

        let mut count = 5i32;
        for j in (0..12).rev() {
            let weight = n_choose_k(j, (count + 1) as usize) as i32;
            if choice >= weight {
                self.edge_perm[j] = edges[count as usize];
                choice -= weight;
                count -= 1;
            }
        }

        let mut next = 0;
        for slot in &mut self.edge_perm {
            if *slot == EMPTY {
                *slot = others[next];
                next += 1;
            }
        }
    }

    /// Helper coordinate in `0..1320` tracking edges UR, UF, UL. Together
    /// with [`CubieCube::ub_to_df`] it determines the UD edge permutation
    /// through the precomputed merge table.
    #[must_use]
    pub fn ur_to_ul(&self) -> u16 {
        let mut choice = 0u16;
        let mut count = 0usize;
        let mut edges = [0u8; 3];
        for j in 0..12 {
            if self.edge_perm[j] <= 2 {
                choice += n_choose_k(j, count + 1) as u16;
                edges[count] = self.edge_perm[j];
                count += 1;
            }
        }

        let mut perm = 0u16;
        for j in (1..3).rev() {
            let mut rotations = 0u16;
            while edges[j] != j as u8 {
                edges[..=j].rotate_left(1);
                rotations += 1;
            }
            perm = (j as u16 + 1) * perm + rotations;
        }
        6 * choice + perm
    }

    /// Place edges UR, UF, UL from their helper coordinate, leaving every
    /// other slot holding the unset marker.
    pub fn set_ur_to_ul(&mut self, index: u16) {
        let mut edges = [0u8, 1, 2];
        let mut perm = index % 6;
        let mut choice = i32::from(index / 6);

        self.edge_perm = [UNSET_EDGE; 12];
        for j in 1..3 {
            let rotations = perm % (j as u16 + 1);
            perm /= j as u16 + 1;
            for _ in 0..rotations {
                edges[..=j].rotate_right(1);
            }
        }

        let mut count = 2i32;
        for j in (0..12).rev() {
            let weight = n_choose_k(j, (count + 1) as usize) as i32;
            if choice >= weight {
                self.edge_perm[j] = edges[count as usize];
                choice -= weight;
                count -= 1;
            }
        }
    }

    /// Helper coordinate in `0..1320` tracking edges UB, DR, DF.
    #[must_use]
    pub fn ub_to_df(&self) -> u16 {
        let mut choice = 0u16;
        let mut count = 0usize;
        let mut edges = [0u8; 3];
        for j in 0..12 {
            if (3..=5).contains(&self.edge_perm[j]) {
                choice += n_choose_k(j, count + 1) as u16;
                edges[count] = self.edge_perm[j];
                count += 1;
            }
        }

        let mut perm = 0u16;
        for j in (1..3).rev() {
            let mut rotations = 0u16;
            while edges[j] != j as u8 + 3 {
                edges[..=j].rotate_left(1);
                rotations += 1;
            }
            perm = (j as u16 + 1) * perm + rotations;
        }
        6 * choice + perm
    }

    /// Place edges UB, DR, DF from their helper coordinate, leaving every
    /// other slot holding the unset marker.
    pub fn set_ub_to_df(&mut self, index: u16) {
        let mut edges = [3u8, 4, 5];
        let mut perm = index % 6;
        let mut choice = i32::from(index / 6);

        self.edge_perm = [UNSET_EDGE; 12];
        for j in 1..3 {
            let rotations = perm % (j as u16 + 1);
            perm /= j as u16 + 1;
            for _ in 0..rotations {
                edges[..=j].rotate_right(1);
            }
        }

        let mut count = 2i32;
        for j in (0..12).rev() {
            let weight = n_choose_k(j, (count + 1) as usize) as i32;
            if choice >= weight {
                self.edge_perm[j] = edges[count as usize];
                choice -= weight;
                count -= 1;
            }
        }
    }
}

/// Combine the two helper edge coordinates into the full UD edge
/// permutation coordinate. Returns `None` when the two placements claim
/// the same slot, which cannot happen for coordinates taken from a real
/// G1 state.
#[must_use]
pub fn merge_ur_to_ul_and_ub_to_df(ur_to_ul: u16, ub_to_df: u16) -> Option<u16> {
    let mut first = CubieCube::SOLVED;
    let mut second = CubieCube::SOLVED;
    first.set_ur_to_ul(ur_to_ul);
    second.set_ub_to_df(ub_to_df);

    for i in 0..8 {
        if first.edge_perm[i] != UNSET_EDGE {
            if second.edge_perm[i] != UNSET_EDGE {
                return None;
            }
            second.edge_perm[i] = first.edge_perm[i];
        }
    }
    Some(second.ud_edge_perm())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{Face, Move};

    #[test]
    fn binomials() {
        assert_eq!(n_choose_k(12, 4), 495);
        assert_eq!(n_choose_k(8, 6), 28);
        assert_eq!(n_choose_k(5, 0), 1);
        assert_eq!(n_choose_k(0, 0), 1);
        assert_eq!(n_choose_k(3, 4), 0);
    }

    #[test]
    fn solved_coordinates_are_zero() {
        let cube = CubieCube::SOLVED;
        assert_eq!(cube.twist(), 0);
        assert_eq!(cube.flip(), 0);
        assert_eq!(cube.slice(), 0);
        assert_eq!(cube.corner_perm_coord(), 0);
        assert_eq!(cube.ud_edge_perm(), 0);
        assert_eq!(cube.ur_to_ul(), 0);
    }

    #[test]
    fn twist_round_trip() {
        let mut cube = CubieCube::SOLVED;
        for coord in 0..N_TWIST as u16 {
            cube.set_twist(coord);
            assert_eq!(cube.twist(), coord);
            let sum: u16 = cube.corner_orient.iter().map(|&o| u16::from(o)).sum();
            assert_eq!(sum % 3, 0);
        }
    }

    #[test]
    fn flip_round_trip() {
        let mut cube = CubieCube::SOLVED;
        for coord in 0..N_FLIP as u16 {
            cube.set_flip(coord);
            assert_eq!(cube.flip(), coord);
            let sum: u16 = cube.edge_orient.iter().map(|&o| u16::from(o)).sum();
            assert_eq!(sum % 2, 0);
        }
    }

    #[test]
    fn slice_round_trip() {
        let mut cube = CubieCube::SOLVED;
        for coord in 0..N_SLICE as u16 {
            cube.set_slice(coord);
            assert_eq!(cube.slice(), coord);
        }
    }

    #[test]
    fn corner_perm_round_trip() {
        let mut cube = CubieCube::SOLVED;
        for coord in 0..N_CORNER_PERM as u16 {
            cube.set_corner_perm_coord(coord);
            assert_eq!(cube.corner_perm_coord(), coord);
        }
    }

    #[test]
    fn ud_edge_perm_round_trip() {
        let mut cube = CubieCube::SOLVED;
        for coord in 0..N_UD_EDGE_PERM as u16 {
            cube.set_ud_edge_perm(coord);
            assert_eq!(cube.ud_edge_perm(), coord);
        }
    }

    #[test]
    fn helper_round_trips() {
        let mut cube = CubieCube::SOLVED;
        for coord in 0..N_UR_TO_UL as u16 {
            cube.set_ur_to_ul(coord);
            assert_eq!(cube.ur_to_ul(), coord);
            cube.set_ub_to_df(coord);
            assert_eq!(cube.ub_to_df(), coord);
        }
    }

    #[test]
    fn helper_setter_leaves_unset_marker() {
        let mut cube = CubieCube::SOLVED;
        cube.set_ur_to_ul(0);
        let placed = cube.edge_perm.iter().filter(|&&p| p <= 2).count();
        let unset = cube.edge_perm.iter().filter(|&&p| p == UNSET_EDGE).count();
        assert_eq!(placed, 3);
        assert_eq!(unset, 9);
    }

    #[test]
    fn merge_of_solved_helpers() {
        let cube = CubieCube::SOLVED;
        let merged = merge_ur_to_ul_and_ub_to_df(cube.ur_to_ul(), cube.ub_to_df());
        assert_eq!(merged, Some(0));
    }

    #[test]
    fn merge_detects_conflicts() {
        // Both zero coordinates place their edges in slots 0..3.
        assert_eq!(merge_ur_to_ul_and_ub_to_df(0, 0), None);
    }

    #[test]
    fn merge_agrees_with_direct_encoding_in_g1() {
        let mut cube = CubieCube::SOLVED;
        // A G1 word keeps the tracked edges inside the UD slots.
        for index in [0, 4, 10, 7, 1, 16, 13, 2, 9, 4] {
            cube.apply_move(Move::from_index(index));
            let merged = merge_ur_to_ul_and_ub_to_df(cube.ur_to_ul(), cube.ub_to_df());
            assert_eq!(merged, Some(cube.ud_edge_perm()));
        }
    }

    #[test]
    fn coordinates_follow_moves() {
        // A quarter turn of U permutes UD pieces but twists and flips
        // nothing, while F touches every coordinate family.
        let mut cube = CubieCube::SOLVED;
        cube.apply_move(Move { face: Face::U, turns: 1 });
        assert_eq!(cube.twist(), 0);
        assert_eq!(cube.flip(), 0);
        assert_eq!(cube.slice(), 0);
        assert_ne!(cube.corner_perm_coord(), 0);
        assert_ne!(cube.ud_edge_perm(), 0);

        let mut cube = CubieCube::SOLVED;
        cube.apply_move(Move { face: Face::F, turns: 1 });
        assert_ne!(cube.twist(), 0);
        assert_ne!(cube.flip(), 0);
        assert_ne!(cube.slice(), 0);
    }
}
