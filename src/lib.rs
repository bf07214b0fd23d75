pub mod core;
pub mod error;
pub mod online_game;
pub mod view;

// module re-exports
pub use crate::core::board_view::{BoardView, PieceView};
pub use crate::core::coords::{from_square, to_square, OverlaySet, Square};
pub use crate::core::definitions::{Color, Intent, PieceId, PieceRole, PromotionRole};
pub use error::ClientError;
pub use online_game::session::{Outbound, Session, SessionConfig};
pub use online_game::{ClientModel, Effect, Inbound, Phase};
