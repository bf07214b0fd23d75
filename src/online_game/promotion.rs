//! Promotion negotiation.
//!
//! The server answers a promoting move with a `promotion` frame instead of
//! applying it. The client keeps that move in a single slot until the user
//! picks a role, then sends the same move again with `promote` set.

use log::{info, warn};

use crate::core::coords::Square;
use crate::core::definitions::{PieceId, PromotionRole};
use crate::error::ClientError;
use crate::online_game::definitions::Request;
use crate::online_game::Effect;
use crate::view::ViewCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPromotion {
    pub piece: PieceId,
    pub capture: Option<PieceId>,
    pub to: Square,
}

impl PendingPromotion {
    /// The deferred move, completed with the chosen role.
    pub fn resume(&self, role: PromotionRole) -> Request {
        Request::Move {
            piece_id: self.piece,
            to: self.to,
            capture_id: Some(self.capture.map_or(0, PieceId::get)),
            promote: Some(role.code()),
        }
    }
}

pub fn request_promotion(
    current: Option<PendingPromotion>,
    requested: PendingPromotion,
) -> (PendingPromotion, Vec<Effect>) {
    if let Some(previous) = current {
        warn!(
            "Promotion for piece {} replaced by a new request for piece {}",
            previous.piece, requested.piece
        );
    }
    info!(
        "Server asks for a promotion role: piece {} to {}",
        requested.piece, requested.to
    );
    (
        requested,
        vec![Effect::View(ViewCommand::PromotionDialog { open: true })],
    )
}

pub fn resolve_promotion(
    pending: Option<PendingPromotion>,
    role: PromotionRole,
) -> Result<Vec<Effect>, ClientError> {
    let pending = pending.ok_or(ClientError::InvalidState {
        action: "promotion choice",
        phase: "no promotion is pending",
    })?;
    info!("Promoting piece {} to {:?}", pending.piece, role);
    Ok(vec![
        Effect::View(ViewCommand::PromotionDialog { open: false }),
        Effect::Send(pending.resume(role)),
    ])
}

/// Drops the pending move; nothing is sent, the server never applied it.
pub fn abandon_promotion(pending: Option<PendingPromotion>) -> Result<Vec<Effect>, ClientError> {
    let pending = pending.ok_or(ClientError::InvalidState {
        action: "promotion abandon",
        phase: "no promotion is pending",
    })?;
    info!("Promotion of piece {} abandoned", pending.piece);
    Ok(vec![Effect::View(ViewCommand::PromotionDialog {
        open: false,
    })])
}
