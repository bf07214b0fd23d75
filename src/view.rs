//! Seam towards the document surface that actually draws the board.

use std::fmt::Display;

use crate::core::board_view::BoardView;
use crate::core::coords::Square;
use crate::core::definitions::PieceId;

/// Board units per square, the server lays its pieces out in steps of 10.
pub const DEFAULT_SQUARE_UNITS: u32 = 10;
pub const DRAG_OPACITY: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKey {
    Piece(PieceId),
    Square(Square),
    Overlay(Square),
}

impl Display for ElementKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKey::Piece(id) => write!(f, "piece_{id}"),
            ElementKey::Square(square) => write!(f, "square_{square}"),
            ElementKey::Overlay(square) => write!(f, "square_{square}_overlay"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewCommand {
    PlacePiece { piece: PieceId, square: Square },
    SetVisible { element: ElementKey, visible: bool },
    SetAsset { piece: PieceId, asset: String },
    SetOpacity { piece: PieceId, opacity: f32 },
    PromotionDialog { open: bool },
    Message(String),
}

pub trait ViewSurface {
    fn set_position(&mut self, element: ElementKey, left: u32, top: u32);
    fn set_visibility(&mut self, element: ElementKey, visible: bool);
    fn set_asset(&mut self, element: ElementKey, asset: &str);
    fn set_opacity(&mut self, element: ElementKey, opacity: f32);
    fn show_promotion_choice(&mut self, open: bool);
    fn show_message(&mut self, message: &str);
}

pub fn render<V: ViewSurface + ?Sized>(commands: &[ViewCommand], square_units: u32, surface: &mut V) {
    for command in commands {
        match command {
            ViewCommand::PlacePiece { piece, square } => surface.set_position(
                ElementKey::Piece(*piece),
                square.file() as u32 * square_units,
                square.rank() as u32 * square_units,
            ),
            ViewCommand::SetVisible { element, visible } => {
                surface.set_visibility(*element, *visible)
            }
            ViewCommand::SetAsset { piece, asset } => {
                surface.set_asset(ElementKey::Piece(*piece), asset)
            }
            ViewCommand::SetOpacity { piece, opacity } => {
                surface.set_opacity(ElementKey::Piece(*piece), *opacity)
            }
            ViewCommand::PromotionDialog { open } => surface.show_promotion_choice(*open),
            ViewCommand::Message(message) => surface.show_message(message),
        }
    }
}

/// Overlay elements for every square, lit where `board.overlay()` says so.
pub fn overlay_commands(board: &BoardView) -> Vec<ViewCommand> {
    Square::all()
        .map(|square| ViewCommand::SetVisible {
            element: ElementKey::Overlay(square),
            visible: board.overlay().contains(&square),
        })
        .collect()
}

/// Full redraw: every piece placed, skinned and shown or hidden, then the overlay.
pub fn snapshot_commands(board: &BoardView) -> Vec<ViewCommand> {
    let mut commands = Vec::new();
    for (id, piece) in board.pieces() {
        commands.push(ViewCommand::PlacePiece {
            piece: id,
            square: piece.square,
        });
        commands.push(ViewCommand::SetAsset {
            piece: id,
            asset: piece.asset(),
        });
        commands.push(ViewCommand::SetVisible {
            element: ElementKey::Piece(id),
            visible: piece.visible,
        });
    }
    commands.extend(overlay_commands(board));
    commands
}
