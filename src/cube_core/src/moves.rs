use std::fmt;

use thiserror::Error;

/// Number of distinct face turns: six faces times three turn amounts.
pub const N_MOVES: usize = 18;

/// The six faces of the cube, in the fixed order used by move indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    U = 0,
    R = 1,
    F = 2,
    D = 3,
    L = 4,
    B = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::U, Face::R, Face::F, Face::D, Face::L, Face::B];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The face at `index` in U, R, F, D, L, B order.
    ///
    /// # Panics
    ///
    /// If `index` is 6 or more.
    #[must_use]
    pub fn from_index(index: usize) -> Face {
        Self::ALL[index]
    }

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Face::U => 'U',
            Face::R => 'R',
            Face::F => 'F',
            Face::D => 'D',
            Face::L => 'L',
            Face::B => 'B',
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A face turn: one to three clockwise quarter turns of a single face.
///
/// The 18 turns are indexed `3 * face + (turns - 1)`, so U=0, U2=1, U'=2,
/// R=3, R2=4, R'=5 and so on through B'=17.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub face: Face,
    /// Clockwise quarter turns, in `1..=3`.
    pub turns: u8,
}

impl Move {
    #[must_use]
    pub fn index(self) -> usize {
        3 * self.face.index() + usize::from(self.turns) - 1
    }

    /// # Panics
    ///
    /// If `index` is not less than [`N_MOVES`].
    #[must_use]
    pub fn from_index(index: usize) -> Move {
        assert!(index < N_MOVES);
        Move {
            face: Face::from_index(index / 3),
            turns: (index % 3) as u8 + 1,
        }
    }

    /// Whether the turn stays within the G1 subgroup: any turn of U and D,
    /// but only the half turn of the other four faces.
    #[must_use]
    pub fn preserves_g1(self) -> bool {
        matches!(self.face, Face::U | Face::D) || self.turns == 2
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.turns {
            1 => write!(f, "{}", self.face),
            2 => write!(f, "{}2", self.face),
            _ => write!(f, "{}'", self.face),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unexpected character {0:?} in move sequence")]
pub struct MoveParseError(pub char);

/// Parse a move sequence in standard notation, e.g. `"R U' F2"`. Each
/// face letter takes an optional `2` or `'` modifier; whitespace is
/// ignored, so compact strings like `"RRFFUU"` work too.
///
/// # Errors
///
/// Reports the first character that is neither a face letter, a
/// modifier in modifier position, nor whitespace.
pub fn parse_move_sequence(text: &str) -> Result<Vec<Move>, MoveParseError> {
    let mut moves = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        let face = Face::ALL
            .into_iter()
            .find(|face| face.letter() == c)
            .ok_or(MoveParseError(c))?;
        let turns = match chars.peek() {
            Some('2') => {
                chars.next();
                2
            }
            Some('\'') => {
                chars.next();
                3
            }
            _ => 1,
        };
        moves.push(Move { face, turns });
    }
    Ok(moves)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_index_round_trip() {
        for index in 0..N_MOVES {
            let mv = Move::from_index(index);
            assert_eq!(mv.index(), index);
        }
        assert_eq!(Move::from_index(0).to_string(), "U");
        assert_eq!(Move::from_index(4).to_string(), "R2");
        assert_eq!(Move::from_index(17).to_string(), "B'");
    }

    #[test]
    fn parses_standard_notation() {
        let moves = parse_move_sequence("R U' F2  B").unwrap();
        assert_eq!(
            moves,
            [
                Move { face: Face::R, turns: 1 },
                Move { face: Face::U, turns: 3 },
                Move { face: Face::F, turns: 2 },
                Move { face: Face::B, turns: 1 },
            ]
        );
        assert_eq!(parse_move_sequence("UU").unwrap().len(), 2);
        assert_eq!(parse_move_sequence("R X"), Err(MoveParseError('X')));
    }

    #[test]
    fn g1_moves() {
        let allowed: Vec<usize> = (0..N_MOVES)
            .filter(|&index| Move::from_index(index).preserves_g1())
            .collect();
        assert_eq!(allowed, [0, 1, 2, 4, 7, 9, 10, 11, 13, 16]);
    }
}
