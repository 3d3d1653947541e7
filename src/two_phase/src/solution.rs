use std::fmt;

use cube_core::{Face, Move};

/// An ordered sequence of face turns returned by the searcher.
///
/// The display form is the positional output encoding: each move's face
/// letter repeated once per clockwise quarter turn, with no separators, so
/// U' becomes `UUU` and R2 becomes `RR`. An already-solved cube yields the
/// empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    moves: Vec<Move>,
}

impl Solution {
    pub(crate) fn from_stacks(faces: &[u8], turns: &[u8], len: usize) -> Solution {
        let moves = faces[..len]
            .iter()
            .zip(&turns[..len])
            .map(|(&face, &turns)| Move {
                face: Face::from_index(usize::from(face)),
                turns,
            })
            .collect();
        Solution { moves }
    }

    /// The underlying moves, for replaying the solution on a cubie state.
    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Number of face turns, counting a half turn as one move.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for mv in &self.moves {
            for _ in 0..mv.turns {
                write!(f, "{}", mv.face.letter())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_encoding() {
        let solution = Solution {
            moves: vec![
                Move { face: Face::U, turns: 3 },
                Move { face: Face::R, turns: 2 },
                Move { face: Face::B, turns: 1 },
            ],
        };
        assert_eq!(solution.to_string(), "UUURRB");
        assert_eq!(solution.len(), 3);
    }

    #[test]
    fn empty_solution_prints_nothing() {
        assert_eq!(Solution::default().to_string(), "");
        assert!(Solution::default().is_empty());
    }
}
