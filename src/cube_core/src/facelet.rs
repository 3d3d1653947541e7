use itertools::Itertools;
use thiserror::Error;

use crate::cubie::CubieCube;
use crate::moves::Face;

// Sticker indices (face * 9 + position, positions in reading order) of
// the facelets of each corner slot: the U/D facelet first, then clockwise
// around the piece.
const CORNER_FACELETS: [[usize; 3]; 8] = [
    [8, 9, 20],   // URF
    [6, 18, 38],  // UFL
    [0, 36, 47],  // ULB
    [2, 45, 11],  // UBR
    [29, 26, 15], // DFR
    [27, 44, 24], // DLF
    [33, 53, 42], // DBL
    [35, 17, 51], // DRB
];

const EDGE_FACELETS: [[usize; 2]; 12] = [
    [5, 10],  // UR
    [7, 19],  // UF
    [3, 37],  // UL
    [1, 46],  // UB
    [32, 16], // DR
    [28, 25], // DF
    [30, 43], // DL
    [34, 52], // DB
    [23, 12], // FR
    [21, 41], // FL
    [50, 39], // BL
    [48, 14], // BR
];

// Colors of each piece, in the same facelet order as above.
const CORNER_COLORS: [[Face; 3]; 8] = [
    [Face::U, Face::R, Face::F],
    [Face::U, Face::F, Face::L],
    [Face::U, Face::L, Face::B],
    [Face::U, Face::B, Face::R],
    [Face::D, Face::F, Face::R],
    [Face::D, Face::L, Face::F],
    [Face::D, Face::B, Face::L],
    [Face::D, Face::R, Face::B],
];

const EDGE_COLORS: [[Face; 2]; 12] = [
    [Face::U, Face::R],
    [Face::U, Face::F],
    [Face::U, Face::L],
    [Face::U, Face::B],
    [Face::D, Face::R],
    [Face::D, Face::F],
    [Face::D, Face::L],
    [Face::D, Face::B],
    [Face::F, Face::R],
    [Face::F, Face::L],
    [Face::B, Face::L],
    [Face::B, Face::R],
];

// Color letters of the unfolded-diagram format.
fn color_to_face(color: char) -> Option<Face> {
    match color {
        'O' => Some(Face::U),
        'B' => Some(Face::R),
        'W' => Some(Face::F),
        'R' => Some(Face::D),
        'G' => Some(Face::L),
        'Y' => Some(Face::B),
        _ => None,
    }
}

/// The unfolded diagram is not nine lines of face characters in the
/// expected columns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagramError {
    #[error("the diagram has {0} lines, expected 9")]
    TooFewLines(usize),
    #[error("line {line} ends before the face character expected at column {col}")]
    LineTooShort { line: usize, col: usize },
    #[error("unknown color {found:?} at line {line}, column {col}")]
    UnknownColor {
        line: usize,
        col: usize,
        found: char,
    },
}

/// The stickers are legal colors but do not assemble into real pieces.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceletError {
    #[error("the stickers at corner slot {0} do not form a corner piece")]
    UnrecognizedCorner(usize),
    #[error("the stickers at edge slot {0} do not form an edge piece")]
    UnrecognizedEdge(usize),
}

/// Sticker-level cube state: 54 face colors in U, R, F, D, L, B order,
/// nine per face in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceletCube {
    pub stickers: [Face; 54],
}

impl Default for FaceletCube {
    fn default() -> Self {
        let mut stickers = [Face::U; 54];
        for (i, sticker) in stickers.iter_mut().enumerate() {
            *sticker = Face::from_index(i / 9);
        }
        FaceletCube { stickers }
    }
}

impl FaceletCube {
    /// Parse the nine-line unfolded diagram: the U face at columns 3..6 of
    /// lines 0..3, the L, F, R and B faces side by side at columns 0..12
    /// of lines 3..6, and the D face at columns 3..6 of lines 6..9.
    ///
    /// # Errors
    ///
    /// [`DiagramError`] when the text is shorter than the layout requires
    /// or contains a character outside the color scheme.
    pub fn parse_diagram(text: &str) -> Result<FaceletCube, DiagramError> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.len() < 9 {
            return Err(DiagramError::TooFewLines(lines.len()));
        }

        let mut cube = FaceletCube::default();
        cube.parse_face(&lines, 0, 3, Face::U)?;
        cube.parse_face(&lines, 3, 0, Face::L)?;
        cube.parse_face(&lines, 3, 3, Face::F)?;
        cube.parse_face(&lines, 3, 6, Face::R)?;
        cube.parse_face(&lines, 3, 9, Face::B)?;
        cube.parse_face(&lines, 6, 3, Face::D)?;
        Ok(cube)
    }

    fn parse_face(
        &mut self,
        lines: &[&str],
        start_line: usize,
        start_col: usize,
        face: Face,
    ) -> Result<(), DiagramError> {
        for row in 0..3 {
            let line = start_line + row;
            for col in 0..3 {
                let col_abs = start_col + col;
                let found = lines[line]
                    .chars()
                    .nth(col_abs)
                    .ok_or(DiagramError::LineTooShort {
                        line,
                        col: col_abs,
                    })?;
                let color = color_to_face(found).ok_or(DiagramError::UnknownColor {
                    line,
                    col: col_abs,
                    found,
                })?;
                self.stickers[face.index() * 9 + row * 3 + col] = color;
            }
        }
        Ok(())
    }

    /// Identify the piece and orientation at every slot from its sticker
    /// colors.
    ///
    /// # Errors
    ///
    /// [`FaceletError`] when some slot's colors match no piece, which
    /// happens when the diagram is not a rearrangement of a real cube's
    /// stickers. A well-formed but unsolvable arrangement converts fine
    /// and is caught later by [`CubieCube::verify`].
    pub fn to_cubie(&self) -> Result<CubieCube, FaceletError> {
        let mut cube = CubieCube::SOLVED;

        for (slot, facelets) in CORNER_FACELETS.iter().enumerate() {
            // The facelet showing a U or D color fixes the twist.
            let orient = (0..3)
                .find(|&o| matches!(self.stickers[facelets[o]], Face::U | Face::D))
                .ok_or(FaceletError::UnrecognizedCorner(slot))?;
            let clockwise = self.stickers[facelets[(orient + 1) % 3]];
            let counter = self.stickers[facelets[(orient + 2) % 3]];
            let (piece, _) = CORNER_COLORS
                .iter()
                .find_position(|colors| colors[1] == clockwise && colors[2] == counter)
                .ok_or(FaceletError::UnrecognizedCorner(slot))?;
            cube.corner_perm[slot] = piece as u8;
            cube.corner_orient[slot] = orient as u8;
        }

        for (slot, facelets) in EDGE_FACELETS.iter().enumerate() {
            let colors = [self.stickers[facelets[0]], self.stickers[facelets[1]]];
            let flipped = [colors[1], colors[0]];
            let (piece, orient) = EDGE_COLORS
                .iter()
                .find_position(|&&candidate| candidate == colors)
                .map(|(piece, _)| (piece, 0))
                .or_else(|| {
                    EDGE_COLORS
                        .iter()
                        .find_position(|&&candidate| candidate == flipped)
                        .map(|(piece, _)| (piece, 1))
                })
                .ok_or(FaceletError::UnrecognizedEdge(slot))?;
            cube.edge_perm[slot] = piece as u8;
            cube.edge_orient[slot] = orient;
        }

        Ok(cube)
    }
}
