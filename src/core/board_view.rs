use std::collections::BTreeMap;

use log::{trace, warn};

use crate::core::coords::{to_square, OverlaySet, Square, BOARD_SIZE};
use crate::core::definitions::{Color, PieceId, PieceRole};
use crate::error::ClientError;

pub const START_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PieceView {
    pub square: Square,
    pub visible: bool,
    pub role: PieceRole,
    pub color: Color,
}

impl PieceView {
    pub fn asset(&self) -> String {
        format!("images/{}_{}.png", self.color.name(), self.role.name())
    }
}

/// What `apply_move` actually changed besides the mover's square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    pub hidden: Option<PieceId>,
    pub promoted: Option<PieceRole>,
}

/// Client-visible picture of the game. Only confirmed server frames change it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoardView {
    pieces: BTreeMap<PieceId, PieceView>,
    overlay: OverlaySet,
}

impl BoardView {
    pub fn new() -> BoardView {
        BoardView::default()
    }

    /// Seeds the board from the placement field of a FEN string.
    ///
    /// Ids are handed out 1, 2, 3, ... in reading order, which is how the
    /// server numbers the pieces it renders.
    pub fn from_fen(fen: &str) -> Result<BoardView, ClientError> {
        let placement = fen.split_whitespace().next().unwrap_or_default();
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != BOARD_SIZE as usize {
            return Err(ClientError::InvalidPlacement(format!(
                "expected 8 rows, got {}",
                rows.len()
            )));
        }
        let mut board = BoardView::new();
        let mut next_id = 1u32;
        for (rank, row) in rows.into_iter().enumerate() {
            let mut file = 0i64;
            for symbol in row.chars() {
                if let Some(skip) = symbol.to_digit(10) {
                    file += skip as i64;
                    continue;
                }
                let (role, color) = PieceRole::from_letter(symbol).ok_or_else(|| {
                    ClientError::InvalidPlacement(format!("unknown piece letter '{symbol}'"))
                })?;
                let square = to_square(rank as i64, file).map_err(|_| {
                    ClientError::InvalidPlacement(format!("row {} is too long", rank + 1))
                })?;
                let id = PieceId::new(next_id)
                    .ok_or_else(|| ClientError::InvalidPlacement("piece id overflow".into()))?;
                board.insert(id, square, role, color);
                next_id += 1;
                file += 1;
            }
            if file != BOARD_SIZE as i64 {
                return Err(ClientError::InvalidPlacement(format!(
                    "row {} covers {file} squares",
                    rank + 1
                )));
            }
        }
        Ok(board)
    }

    pub fn insert(&mut self, id: PieceId, square: Square, role: PieceRole, color: Color) {
        self.pieces.insert(
            id,
            PieceView {
                square,
                visible: true,
                role,
                color,
            },
        );
    }

    pub fn piece(&self, id: PieceId) -> Option<&PieceView> {
        self.pieces.get(&id)
    }

    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &PieceView)> {
        self.pieces.iter().map(|(id, piece)| (*id, piece))
    }

    pub fn piece_at(&self, square: Square) -> Option<(PieceId, &PieceView)> {
        self.pieces()
            .find(|(_, piece)| piece.visible && piece.square == square)
    }

    pub fn overlay(&self) -> &OverlaySet {
        &self.overlay
    }

    /// Moves a piece as the server confirmed it.
    ///
    /// The captured piece is found by id, not by destination: en passant
    /// removes a pawn that does not stand on `to`.
    pub fn apply_move(
        &mut self,
        id: PieceId,
        to: Square,
        captured: Option<PieceId>,
        promoted: Option<PieceRole>,
    ) -> Result<MoveOutcome, ClientError> {
        if !self.pieces.contains_key(&id) {
            return Err(ClientError::UnknownPiece(id));
        }
        let mut outcome = MoveOutcome::default();
        match captured {
            Some(target) if target == id => {
                warn!("Piece {} is reported to capture itself, ignoring capture", id);
            }
            Some(target) => match self.pieces.get_mut(&target) {
                Some(piece) => {
                    piece.visible = false;
                    outcome.hidden = Some(target);
                }
                None => warn!("Captured piece {} is unknown, nothing to hide", target),
            },
            None => (),
        }
        if let Some(piece) = self.pieces.get_mut(&id) {
            trace!("Piece {} {} -> {}", id, piece.square, to);
            piece.square = to;
            if let Some(role) = promoted {
                piece.role = role;
                outcome.promoted = Some(role);
            }
        }
        Ok(outcome)
    }

    pub fn apply_overlay(&mut self, squares: OverlaySet) {
        self.overlay = squares;
    }

    pub fn clear_overlay(&mut self) {
        self.overlay.clear();
    }

    /// Text diagram of the visible pieces; `*` marks highlighted empty squares.
    pub fn ascii(&self) -> String {
        let mut result = String::new();
        for rank in 0..BOARD_SIZE {
            result.push_str(&format!("{} ", BOARD_SIZE - rank));
            for file in 0..BOARD_SIZE {
                let square = to_square(rank as i64, file as i64).ok();
                let symbol = match square.and_then(|square| self.piece_at(square)) {
                    Some((_, piece)) => piece.role.letter(piece.color),
                    None if square.is_some_and(|square| self.overlay.contains(&square)) => '*',
                    None => '.',
                };
                result.push(symbol);
            }
            result.push('\n');
        }
        result.push_str("  abcdefgh\n");
        result
    }
}
