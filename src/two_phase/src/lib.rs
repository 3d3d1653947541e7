#![warn(clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]

pub mod solution;
pub mod solver;
pub mod tables;

pub use solution::Solution;
pub use solver::{SolveError, TwoPhaseSolver};
pub use tables::Tables;

#[macro_export]
macro_rules! start {
    ($msg:expr) => {
        concat!("⏳ ", $msg)
    };
}

#[macro_export]
macro_rules! working {
    ($msg:expr) => {
        concat!("🛠  ", $msg)
    };
}

#[macro_export]
macro_rules! success {
    ($msg:expr) => {
        concat!("✅ ", $msg)
    };
}

#[cfg(test)]
pub(crate) mod test_tables {
    use crate::tables::Tables;
    use std::sync::LazyLock;

    // Generating the tables takes a moment, so every test shares one set.
    pub static TABLES: LazyLock<Tables> = LazyLock::new(Tables::generate);
}
