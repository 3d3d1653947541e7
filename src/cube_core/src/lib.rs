#![warn(clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]

pub mod coords;
pub mod cubie;
pub mod facelet;
pub mod moves;

pub use cubie::{CubeStateError, CubieCube};
pub use facelet::{DiagramError, FaceletCube, FaceletError};
pub use moves::{Face, Move, MoveParseError, N_MOVES, parse_move_sequence};
