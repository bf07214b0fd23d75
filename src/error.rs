use crate::core::definitions::PieceId;

/// Every error the client can produce. None of them is fatal: the caller
/// logs it and keeps the event loop running.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("coordinate (rank {rank}, file {file}) is outside of the board")]
    CoordinateOutOfRange { rank: i64, file: i64 },
    #[error("square {0} is outside of the board")]
    SquareOutOfRange(i64),
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
    #[error("invalid piece placement: {0}")]
    InvalidPlacement(String),
    #[error("piece {0} is not on the board")]
    UnknownPiece(PieceId),
    #[error("{action} is not allowed while {phase}")]
    InvalidState {
        action: &'static str,
        phase: &'static str,
    },
    #[error("connection to the server is lost")]
    ConnectionLost,
    #[cfg(feature = "network")]
    #[error("websocket transport failed: {0}")]
    Transport(#[from] Box<tungstenite::Error>),
}

impl ClientError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ClientError::MalformedFrame(reason.into())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(value: serde_json::Error) -> Self {
        ClientError::MalformedFrame(value.to_string())
    }
}

#[cfg(feature = "network")]
impl From<tungstenite::Error> for ClientError {
    fn from(value: tungstenite::Error) -> Self {
        ClientError::Transport(Box::new(value))
    }
}
