use std::collections::VecDeque;

use log::{debug, info, warn};

use crate::core::board_view::BoardView;
use crate::core::coords::OverlaySet;
use crate::core::definitions::{Intent, PieceId};
use crate::error::ClientError;
use crate::view::{overlay_commands, ElementKey, ViewCommand};

#[cfg(feature = "network")]
pub mod client;
pub mod definitions;
pub mod gestures;
pub mod promotion;
pub mod session;

use definitions::{MoveFrame, OverlayKind, Request, ServerFrame};
use promotion::PendingPromotion;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    /// Overlay requested or shown for one piece.
    Selected(PieceId),
    PromotionPending(PendingPromotion),
    GameOver(String),
    Disconnected,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Selected(_) => "selected",
            Phase::PromotionPending(_) => "promotion pending",
            Phase::GameOver(_) => "game over",
            Phase::Disconnected => "disconnected",
        }
    }

    fn pending_promotion(&self) -> Option<PendingPromotion> {
        match self {
            Phase::PromotionPending(pending) => Some(*pending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Frame(ServerFrame),
    Intent(Intent),
    ConnectionLost,
}

/// What a transition asks the outside world to do.
#[derive(Debug)]
pub enum Effect {
    Send(Request),
    View(ViewCommand),
    Rejected(ClientError),
}

/// Everything the client knows about the running game.
///
/// `handle_message` is the only way to change it, one inbound message at a
/// time, and it performs no I/O: sends and redraws come back as [`Effect`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientModel {
    phase: Phase,
    board: BoardView,
    /// Pieces whose overlay request is still unanswered, oldest first.
    awaiting_overlay: VecDeque<PieceId>,
    connection_id: Option<i64>,
}

impl ClientModel {
    pub fn new(board: BoardView) -> ClientModel {
        ClientModel {
            board,
            ..Default::default()
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn board(&self) -> &BoardView {
        &self.board
    }

    pub fn connection_id(&self) -> Option<i64> {
        self.connection_id
    }

    pub fn pending_promotion(&self) -> Option<PendingPromotion> {
        self.phase.pending_promotion()
    }

    pub fn handle_message(self, message: Inbound) -> (ClientModel, Vec<Effect>) {
        match message {
            Inbound::Frame(frame) => self.handle_frame(frame),
            Inbound::Intent(intent) => self.handle_intent(intent),
            Inbound::ConnectionLost => self.connection_lost(),
        }
    }

    fn handle_frame(mut self, frame: ServerFrame) -> (ClientModel, Vec<Effect>) {
        let mut effects = Vec::new();
        let phase = std::mem::take(&mut self.phase);
        self.phase = match (phase, frame) {
            (phase @ (Phase::GameOver(_) | Phase::Disconnected), frame) => {
                debug!("Board is frozen ({}), ignoring {:?}", phase.name(), frame);
                phase
            }
            (phase, ServerFrame::Unknown(tag)) => {
                debug!("Ignoring frame with unknown requestType '{}'", tag);
                phase
            }
            (phase, ServerFrame::Welcome { connection_id }) => {
                info!("Server assigned connection id {}", connection_id);
                self.connection_id = Some(connection_id);
                phase
            }
            (phase, ServerFrame::Overlay { kind, squares, piece }) => {
                self.overlay(&phase, kind, squares, piece, &mut effects);
                phase
            }
            (phase, ServerFrame::Move(frame)) => self.confirmed_move(phase, frame, &mut effects),
            (phase, ServerFrame::Promotion(requested)) => {
                let (pending, commands) =
                    promotion::request_promotion(phase.pending_promotion(), requested);
                self.board.clear_overlay();
                effects.extend(commands);
                effects.extend(overlay_commands(&self.board).into_iter().map(Effect::View));
                Phase::PromotionPending(pending)
            }
            (phase, ServerFrame::End { message }) => {
                info!("Game over: {}", message);
                self.awaiting_overlay.clear();
                self.board.clear_overlay();
                if phase.pending_promotion().is_some() {
                    effects.push(Effect::View(ViewCommand::PromotionDialog { open: false }));
                }
                effects.extend(overlay_commands(&self.board).into_iter().map(Effect::View));
                effects.push(Effect::View(ViewCommand::Message(message.clone())));
                Phase::GameOver(message)
            }
        };
        (self, effects)
    }

    /// Applies an overlay only if it answers the active selection.
    fn overlay(
        &mut self,
        phase: &Phase,
        kind: OverlayKind,
        squares: OverlaySet,
        piece: Option<PieceId>,
        effects: &mut Vec<Effect>,
    ) {
        let answered = match piece {
            Some(piece) => {
                if let Some(index) = self.awaiting_overlay.iter().position(|id| *id == piece) {
                    self.awaiting_overlay.remove(index);
                }
                Some(piece)
            }
            None => self.awaiting_overlay.pop_front(),
        };
        match (phase, answered) {
            (Phase::Selected(selected), Some(answered)) if *selected == answered => {
                debug!("{:?} overlay for piece {}: {} squares", kind, answered, squares.len());
                self.board.apply_overlay(squares);
                effects.extend(overlay_commands(&self.board).into_iter().map(Effect::View));
            }
            (phase, answered) => {
                debug!(
                    "Discarding stale {:?} overlay for {:?} while {}",
                    kind,
                    answered,
                    phase.name()
                );
            }
        }
    }

    fn confirmed_move(&mut self, phase: Phase, frame: MoveFrame, effects: &mut Vec<Effect>) -> Phase {
        let promoted = frame.promote.map(Into::into);
        let outcome = match self
            .board
            .apply_move(frame.piece, frame.to, frame.capture, promoted)
        {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("Dropping move frame {:?}: {}", frame, err);
                effects.push(Effect::Rejected(err));
                return phase;
            }
        };
        effects.push(Effect::View(ViewCommand::PlacePiece {
            piece: frame.piece,
            square: frame.to,
        }));
        if let Some(hidden) = outcome.hidden {
            effects.push(Effect::View(ViewCommand::SetVisible {
                element: ElementKey::Piece(hidden),
                visible: false,
            }));
        }
        if outcome.promoted.is_some() {
            if let Some(piece) = self.board.piece(frame.piece) {
                effects.push(Effect::View(ViewCommand::SetAsset {
                    piece: frame.piece,
                    asset: piece.asset(),
                }));
            }
        }
        match phase {
            // The engine may still move while our own move waits for a role.
            Phase::PromotionPending(pending) => Phase::PromotionPending(pending),
            _ => {
                self.board.clear_overlay();
                effects.extend(overlay_commands(&self.board).into_iter().map(Effect::View));
                Phase::Idle
            }
        }
    }

    fn handle_intent(mut self, intent: Intent) -> (ClientModel, Vec<Effect>) {
        let phase = std::mem::take(&mut self.phase);
        let (phase, effects) = match (phase, intent) {
            (Phase::Disconnected, _) => (
                Phase::Disconnected,
                vec![Effect::Rejected(ClientError::ConnectionLost)],
            ),
            (phase @ Phase::GameOver(_), intent) => {
                let rejected = invalid_state(&intent, &phase);
                (phase, vec![rejected])
            }
            (phase @ Phase::PromotionPending(_), Intent::PromotionChoice(role)) => {
                match promotion::resolve_promotion(phase.pending_promotion(), role) {
                    Ok(effects) => (Phase::Idle, effects),
                    Err(err) => (phase, vec![Effect::Rejected(err)]),
                }
            }
            (phase @ Phase::PromotionPending(_), Intent::AbandonPromotion) => {
                match promotion::abandon_promotion(phase.pending_promotion()) {
                    Ok(effects) => (Phase::Idle, effects),
                    Err(err) => (phase, vec![Effect::Rejected(err)]),
                }
            }
            (phase @ Phase::PromotionPending(_), intent) => {
                let rejected = invalid_state(&intent, &phase);
                (phase, vec![rejected])
            }
            (phase, Intent::PromotionChoice(role)) => {
                match promotion::resolve_promotion(None, role) {
                    Ok(effects) => (phase, effects),
                    Err(err) => (phase, vec![Effect::Rejected(err)]),
                }
            }
            (phase, Intent::AbandonPromotion) => match promotion::abandon_promotion(None) {
                Ok(effects) => (phase, effects),
                Err(err) => (phase, vec![Effect::Rejected(err)]),
            },
            (_, Intent::SelectPiece(piece)) => {
                self.awaiting_overlay.push_back(piece);
                (
                    Phase::Selected(piece),
                    vec![Effect::Send(Request::Movement { piece_id: piece })],
                )
            }
            (phase, intent) => match Request::from_intent(intent) {
                Some(request) => (phase, vec![Effect::Send(request)]),
                None => (phase, Vec::new()),
            },
        };
        self.phase = phase;
        (self, effects)
    }

    fn connection_lost(mut self) -> (ClientModel, Vec<Effect>) {
        let mut effects = Vec::new();
        if self.phase.pending_promotion().is_some() {
            effects.push(Effect::View(ViewCommand::PromotionDialog { open: false }));
        }
        if !matches!(self.phase, Phase::Disconnected) {
            warn!("Connection lost while {}", self.phase.name());
            effects.push(Effect::View(ViewCommand::Message(
                "Connection to the server is lost".to_string(),
            )));
        }
        self.awaiting_overlay.clear();
        self.phase = Phase::Disconnected;
        (self, effects)
    }
}

fn invalid_state(intent: &Intent, phase: &Phase) -> Effect {
    Effect::Rejected(ClientError::InvalidState {
        action: intent.name(),
        phase: phase.name(),
    })
}
