use std::fmt::Display;

use serde::Serialize;

use crate::core::coords::Square;
use crate::error::ClientError;

/// Server-assigned piece identifier. Zero is reserved on the wire for
/// "no piece" and is never a valid id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PieceId(u32);

impl PieceId {
    pub fn new(id: u32) -> Option<PieceId> {
        if id == 0 {
            None
        } else {
            Some(PieceId(id))
        }
    }

    /// Reads an id slot of an inbound frame where `0` means "none".
    pub fn from_wire(raw: i64) -> Result<Option<PieceId>, ClientError> {
        match u32::try_from(raw) {
            Ok(id) => Ok(PieceId::new(id)),
            Err(_) => Err(ClientError::malformed(format!("invalid piece id {raw}"))),
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceRole {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceRole {
    pub fn name(self) -> &'static str {
        match self {
            PieceRole::King => "king",
            PieceRole::Queen => "queen",
            PieceRole::Rook => "rook",
            PieceRole::Bishop => "bishop",
            PieceRole::Knight => "knight",
            PieceRole::Pawn => "pawn",
        }
    }

    /// FEN letter, upper case for white.
    pub fn letter(self, color: Color) -> char {
        let letter = match self {
            PieceRole::King => 'k',
            PieceRole::Queen => 'q',
            PieceRole::Rook => 'r',
            PieceRole::Bishop => 'b',
            PieceRole::Knight => 'n',
            PieceRole::Pawn => 'p',
        };
        match color {
            Color::White => letter.to_ascii_uppercase(),
            Color::Black => letter,
        }
    }

    pub fn from_letter(letter: char) -> Option<(PieceRole, Color)> {
        let color = if letter.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let role = match letter.to_ascii_lowercase() {
            'k' => PieceRole::King,
            'q' => PieceRole::Queen,
            'r' => PieceRole::Rook,
            'b' => PieceRole::Bishop,
            'n' => PieceRole::Knight,
            'p' => PieceRole::Pawn,
            _ => return None,
        };
        Some((role, color))
    }
}

/// Roles a pawn can be promoted to, with the server's wire codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PromotionRole {
    Queen = 1,
    Rook = 2,
    Bishop = 3,
    Knight = 4,
}

impl PromotionRole {
    pub const ALL: [PromotionRole; 4] = [
        PromotionRole::Queen,
        PromotionRole::Rook,
        PromotionRole::Bishop,
        PromotionRole::Knight,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    /// `0` means "no promotion" and yields `Ok(None)`.
    pub fn from_code(code: i64) -> Result<Option<PromotionRole>, ClientError> {
        match code {
            0 => Ok(None),
            1 => Ok(Some(PromotionRole::Queen)),
            2 => Ok(Some(PromotionRole::Rook)),
            3 => Ok(Some(PromotionRole::Bishop)),
            4 => Ok(Some(PromotionRole::Knight)),
            _ => Err(ClientError::malformed(format!(
                "unknown promotion code {code}"
            ))),
        }
    }
}

impl From<PromotionRole> for PieceRole {
    fn from(value: PromotionRole) -> Self {
        match value {
            PromotionRole::Queen => PieceRole::Queen,
            PromotionRole::Rook => PieceRole::Rook,
            PromotionRole::Bishop => PieceRole::Bishop,
            PromotionRole::Knight => PieceRole::Knight,
        }
    }
}

/// What the user asked for, before it becomes a wire request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    SelectPiece(PieceId),
    Move { piece: PieceId, to: Square },
    Capture { piece: PieceId, target: PieceId },
    PromotionChoice(PromotionRole),
    /// Closes the promotion dialog without picking a role.
    AbandonPromotion,
    StartGame,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::SelectPiece(_) => "select",
            Intent::Move { .. } => "move",
            Intent::Capture { .. } => "capture",
            Intent::PromotionChoice(_) => "promotion choice",
            Intent::AbandonPromotion => "promotion abandon",
            Intent::StartGame => "start",
        }
    }
}
