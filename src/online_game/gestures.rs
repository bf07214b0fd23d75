//! Turns clicks, drags and drops on view elements into intents.

use std::collections::HashMap;

use log::{debug, trace};

use crate::core::board_view::BoardView;
use crate::core::coords::{to_square, Square, BOARD_SIZE};
use crate::core::definitions::{Intent, PieceId};
use crate::view::{ElementKey, ViewCommand, DRAG_OPACITY};

/// A pointer gesture as the view surface reports it, by element id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    Click { element: String },
    DragStart { element: String },
    DragEnd { element: String },
    Drop { dragged: String, target: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Piece(PieceId),
    Square(Square),
}

/// Lookup table from element id to what the element stands for.
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    targets: HashMap<String, Target>,
}

impl ElementRegistry {
    /// Registers every piece of `board`, every square and its overlay, and the
    /// `square_<y>_<x>` ids the first page generation used.
    pub fn for_board(board: &BoardView) -> ElementRegistry {
        let mut registry = ElementRegistry::default();
        for (id, _) in board.pieces() {
            registry.register(ElementKey::Piece(id), Target::Piece(id));
        }
        for square in Square::all() {
            registry.register(ElementKey::Square(square), Target::Square(square));
            registry.register(ElementKey::Overlay(square), Target::Square(square));
        }
        for y in 0..BOARD_SIZE as i64 {
            for x in 0..BOARD_SIZE as i64 {
                if let Ok(square) = to_square(y, x) {
                    registry
                        .targets
                        .insert(format!("square_{y}_{x}"), Target::Square(square));
                }
            }
        }
        registry
    }

    pub fn register(&mut self, element: ElementKey, target: Target) {
        self.targets.insert(element.to_string(), target);
    }

    pub fn resolve(&self, element: &str) -> Option<Target> {
        self.targets.get(element).copied()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// At most one intent per gesture, plus presentation-only feedback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureOutput {
    pub intent: Option<Intent>,
    pub feedback: Vec<ViewCommand>,
}

#[derive(Debug, Clone, Default)]
pub struct GestureController {
    registry: ElementRegistry,
}

impl GestureController {
    pub fn new(registry: ElementRegistry) -> GestureController {
        GestureController { registry }
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    fn piece(&self, element: &str) -> Option<PieceId> {
        match self.registry.resolve(element) {
            Some(Target::Piece(id)) => Some(id),
            _ => None,
        }
    }

    pub fn interpret(&self, gesture: &Gesture) -> GestureOutput {
        trace!("Gesture: {:?}", gesture);
        let mut output = GestureOutput::default();
        match gesture {
            Gesture::Click { element } => {
                output.intent = self.piece(element).map(Intent::SelectPiece);
            }
            Gesture::DragStart { element } => {
                if let Some(piece) = self.piece(element) {
                    output.feedback.push(ViewCommand::SetOpacity {
                        piece,
                        opacity: DRAG_OPACITY,
                    });
                    output.intent = Some(Intent::SelectPiece(piece));
                }
            }
            Gesture::DragEnd { element } => {
                if let Some(piece) = self.piece(element) {
                    output
                        .feedback
                        .push(ViewCommand::SetOpacity { piece, opacity: 1.0 });
                }
            }
            Gesture::Drop { dragged, target } => {
                let Some(piece) = self.piece(dragged) else {
                    debug!("Dropped element '{}' is not a piece", dragged);
                    return output;
                };
                output.intent = match self.registry.resolve(target) {
                    Some(Target::Piece(target)) if target == piece => None,
                    Some(Target::Piece(target)) => Some(Intent::Capture { piece, target }),
                    Some(Target::Square(to)) => Some(Intent::Move { piece, to }),
                    None => {
                        debug!("Drop target '{}' is not a board element", target);
                        None
                    }
                };
            }
        }
        output
    }
}
