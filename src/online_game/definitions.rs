//! JSON frames exchanged with the game server.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::coords::{grid_to_squares, LegacyCoord, OverlaySet, PairConvention, Square};
use crate::core::definitions::{Intent, PieceId, PromotionRole};
use crate::error::ClientError;
use crate::online_game::promotion::PendingPromotion;

/// First frame on a fresh connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Handshake {
    #[serde(rename = "NewConnection")]
    pub new_connection: bool,
}

impl Handshake {
    pub const NEW_SESSION: Handshake = Handshake {
        new_connection: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "requestType", rename_all = "lowercase")]
pub enum Request {
    /// Asks for the overlay of one piece.
    Movement {
        #[serde(rename = "pieceId")]
        piece_id: PieceId,
    },
    Move {
        #[serde(rename = "pieceId")]
        piece_id: PieceId,
        to: Square,
        #[serde(rename = "captureId", skip_serializing_if = "Option::is_none")]
        capture_id: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        promote: Option<u8>,
    },
    Capture {
        #[serde(rename = "pieceId")]
        piece_id: PieceId,
        #[serde(rename = "captureId")]
        capture_id: PieceId,
    },
    Start,
}

impl Request {
    /// Requests that follow from the intent alone. Promotion intents need the
    /// pending slot and are built by the promotion module instead.
    pub fn from_intent(intent: Intent) -> Option<Request> {
        match intent {
            Intent::SelectPiece(piece_id) => Some(Request::Movement { piece_id }),
            Intent::Move { piece, to } => Some(Request::Move {
                piece_id: piece,
                to,
                capture_id: None,
                promote: None,
            }),
            Intent::Capture { piece, target } => Some(Request::Capture {
                piece_id: piece,
                capture_id: target,
            }),
            Intent::StartGame => Some(Request::Start),
            Intent::PromotionChoice(_) | Intent::AbandonPromotion => None,
        }
    }
}

pub fn encode<T: Serialize>(value: &T) -> Result<String, ClientError> {
    Ok(serde_json::to_string(value)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    /// Legal destinations of the selected piece.
    Surrounding,
    /// Squares the player can currently see.
    Vision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveFrame {
    pub piece: PieceId,
    pub to: Square,
    pub capture: Option<PieceId>,
    pub promote: Option<PromotionRole>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerFrame {
    Welcome {
        connection_id: i64,
    },
    Overlay {
        kind: OverlayKind,
        squares: OverlaySet,
        /// Only newer servers echo the piece the overlay belongs to.
        piece: Option<PieceId>,
    },
    Move(MoveFrame),
    Promotion(PendingPromotion),
    End {
        message: String,
    },
    Unknown(String),
}

#[derive(Deserialize)]
struct WelcomeWire {
    #[serde(rename = "connectionId")]
    connection_id: i64,
}

#[derive(Deserialize)]
struct OverlayWire {
    #[serde(alias = "vision")]
    surrounding: [[bool; 8]; 8],
    #[serde(rename = "pieceId")]
    piece_id: Option<i64>,
}

#[derive(Deserialize)]
struct MoveWire {
    #[serde(rename = "pieceId")]
    piece_id: i64,
    to: Option<i64>,
    to_y: Option<i64>,
    to_x: Option<i64>,
    #[serde(rename = "captureId")]
    capture_id: Option<i64>,
    promote: Option<i64>,
}

#[derive(Deserialize)]
struct PromotionWire {
    #[serde(rename = "pieceId")]
    piece_id: i64,
    to: Option<i64>,
    to_y: Option<i64>,
    to_x: Option<i64>,
    #[serde(rename = "captureId")]
    capture_id: Option<i64>,
}

#[derive(Deserialize)]
struct EndWire {
    msg: String,
}

/// Newer servers send a flat `to`, the first generation sent `to_y`/`to_x`.
fn destination(
    to: Option<i64>,
    to_y: Option<i64>,
    to_x: Option<i64>,
    convention: PairConvention,
) -> Result<Square, ClientError> {
    let coord = match (to, to_y, to_x) {
        (Some(index), _, _) => LegacyCoord::Flat(index),
        (None, Some(y), Some(x)) => LegacyCoord::paired(y, x, convention),
        _ => return Err(ClientError::malformed("missing destination square")),
    };
    coord.normalize()
}

fn moving_piece(raw: i64) -> Result<PieceId, ClientError> {
    PieceId::from_wire(raw)?.ok_or_else(|| ClientError::malformed("pieceId must not be 0"))
}

fn optional_piece(raw: Option<i64>) -> Result<Option<PieceId>, ClientError> {
    raw.map_or(Ok(None), PieceId::from_wire)
}

/// Classifies one inbound text frame by its `requestType`.
///
/// Unknown tags are returned as [`ServerFrame::Unknown`], missing or mistyped
/// fields of a known tag are [`ClientError::MalformedFrame`].
pub fn decode_frame(raw: &str, convention: PairConvention) -> Result<ServerFrame, ClientError> {
    let value: Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(ClientError::malformed("frame is not a JSON object"));
    }
    let tag = match value.get("requestType") {
        Some(Value::String(tag)) => tag.clone(),
        Some(_) => return Err(ClientError::malformed("requestType is not a string")),
        None if value.get("connectionId").is_some() => {
            let welcome: WelcomeWire = serde_json::from_value(value)?;
            return Ok(ServerFrame::Welcome {
                connection_id: welcome.connection_id,
            });
        }
        None => return Err(ClientError::malformed("missing requestType")),
    };
    let frame = match tag.as_str() {
        "surrounding" | "vision" => {
            let overlay: OverlayWire = serde_json::from_value(value)?;
            ServerFrame::Overlay {
                kind: if tag == "vision" {
                    OverlayKind::Vision
                } else {
                    OverlayKind::Surrounding
                },
                squares: grid_to_squares(&overlay.surrounding),
                piece: optional_piece(overlay.piece_id)?,
            }
        }
        "move" => {
            let wire: MoveWire = serde_json::from_value(value)?;
            ServerFrame::Move(MoveFrame {
                piece: moving_piece(wire.piece_id)?,
                to: destination(wire.to, wire.to_y, wire.to_x, convention)?,
                capture: optional_piece(wire.capture_id)?,
                promote: match wire.promote {
                    Some(code) => PromotionRole::from_code(code)?,
                    None => None,
                },
            })
        }
        "promotion" => {
            let wire: PromotionWire = serde_json::from_value(value)?;
            ServerFrame::Promotion(PendingPromotion {
                piece: moving_piece(wire.piece_id)?,
                capture: optional_piece(wire.capture_id)?,
                to: destination(wire.to, wire.to_y, wire.to_x, convention)?,
            })
        }
        "end" => {
            let wire: EndWire = serde_json::from_value(value)?;
            ServerFrame::End { message: wire.msg }
        }
        _ => ServerFrame::Unknown(tag),
    };
    Ok(frame)
}
