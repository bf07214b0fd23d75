//! Square addressing.
//!
//! The canonical form is a flat row-major index `rank * 8 + file` where rank 0
//! is the top row of the rendered board. Every other convention the server has
//! used is converted here and nowhere else.

use std::collections::BTreeSet;
use std::fmt::Display;

use serde::Serialize;

use crate::error::ClientError;

pub const BOARD_SIZE: u8 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Square(u8);

pub type OverlaySet = BTreeSet<Square>;

impl Square {
    pub const COUNT: u8 = BOARD_SIZE * BOARD_SIZE;

    pub fn new(index: i64) -> Result<Square, ClientError> {
        if (0..Square::COUNT as i64).contains(&index) {
            Ok(Square(index as u8))
        } else {
            Err(ClientError::SquareOutOfRange(index))
        }
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..Square::COUNT).map(Square)
    }

    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn rank(self) -> u8 {
        self.0 / BOARD_SIZE
    }

    #[inline]
    pub fn file(self) -> u8 {
        self.0 % BOARD_SIZE
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[inline]
fn on_board(value: i64) -> bool {
    (0..BOARD_SIZE as i64).contains(&value)
}

pub fn to_square(rank: i64, file: i64) -> Result<Square, ClientError> {
    if on_board(rank) && on_board(file) {
        Ok(Square((rank * BOARD_SIZE as i64 + file) as u8))
    } else {
        Err(ClientError::CoordinateOutOfRange { rank, file })
    }
}

pub fn from_square(index: i64) -> Result<(u8, u8), ClientError> {
    let square = Square::new(index)?;
    Ok((square.rank(), square.file()))
}

/// How a paired `(y, x)` coordinate on the wire is numbered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PairConvention {
    #[default]
    ZeroIndexed,
    OneIndexed,
}

/// A square as some protocol generation spelled it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegacyCoord {
    Flat(i64),
    /// `to_y` / `to_x`, both starting at zero.
    Paired { y: i64, x: i64 },
    /// Rank and file counted from one.
    OneIndexed { rank: i64, file: i64 },
}

impl LegacyCoord {
    pub fn paired(y: i64, x: i64, convention: PairConvention) -> LegacyCoord {
        match convention {
            PairConvention::ZeroIndexed => LegacyCoord::Paired { y, x },
            PairConvention::OneIndexed => LegacyCoord::OneIndexed { rank: y, file: x },
        }
    }

    pub fn normalize(self) -> Result<Square, ClientError> {
        match self {
            LegacyCoord::Flat(index) => Square::new(index),
            LegacyCoord::Paired { y, x } => to_square(y, x),
            LegacyCoord::OneIndexed { rank, file } => {
                to_square(rank - 1, file - 1).map_err(|_| ClientError::CoordinateOutOfRange {
                    rank,
                    file,
                })
            }
        }
    }
}

/// Reads a row-major 8x8 overlay grid.
pub fn grid_to_squares(grid: &[[bool; 8]; 8]) -> OverlaySet {
    grid.iter()
        .enumerate()
        .flat_map(|(rank, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, lit)| **lit)
                .map(move |(file, _)| Square((rank * 8 + file) as u8))
        })
        .collect()
}
