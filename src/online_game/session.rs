use log::{debug, info, warn};
use uuid::Uuid;

use crate::core::board_view::{BoardView, START_PLACEMENT};
use crate::core::coords::PairConvention;
use crate::core::definitions::{Intent, PromotionRole};
use crate::error::ClientError;
use crate::online_game::definitions::{decode_frame, Request, ServerFrame};
use crate::online_game::gestures::{ElementRegistry, Gesture, GestureController};
use crate::online_game::{ClientModel, Effect, Inbound, Phase};
use crate::view::{render, snapshot_commands, ViewCommand, ViewSurface, DEFAULT_SQUARE_UNITS};

/// Where requests go. Sending never waits for an answer.
pub trait Outbound {
    fn send(&mut self, request: &Request) -> Result<(), ClientError>;
}

/// Keeps every request, handy when no server is around.
impl Outbound for Vec<Request> {
    fn send(&mut self, request: &Request) -> Result<(), ClientError> {
        self.push(*request);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Initial placement; must match the position the server starts from.
    pub start_fen: String,
    pub pair_convention: PairConvention,
    pub square_units: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            start_fen: START_PLACEMENT.to_string(),
            pair_convention: PairConvention::default(),
            square_units: DEFAULT_SQUARE_UNITS,
        }
    }
}

/// One game as seen from this client: the model, the gesture table, and the
/// two collaborators it talks to. Owned by a single event loop.
pub struct Session<O: Outbound, V: ViewSurface> {
    id: Uuid,
    config: SessionConfig,
    model: ClientModel,
    gestures: GestureController,
    outbound: O,
    view: V,
}

impl<O: Outbound, V: ViewSurface> Session<O, V> {
    pub fn new(config: SessionConfig, outbound: O, mut view: V) -> Result<Self, ClientError> {
        let board = BoardView::from_fen(&config.start_fen)?;
        let gestures = GestureController::new(ElementRegistry::for_board(&board));
        render(&snapshot_commands(&board), config.square_units, &mut view);
        let id = Uuid::new_v4();
        info!("[{}] Session ready with {} pieces", id, board.pieces().count());
        Ok(Session {
            id,
            config,
            model: ClientModel::new(board),
            gestures,
            outbound,
            view,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn model(&self) -> &ClientModel {
        &self.model
    }

    pub fn phase(&self) -> &Phase {
        self.model.phase()
    }

    pub fn board(&self) -> &BoardView {
        self.model.board()
    }

    pub fn outbound(&self) -> &O {
        &self.outbound
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn handle_gesture(&mut self, gesture: &Gesture) -> Result<(), ClientError> {
        let output = self.gestures.interpret(gesture);
        render(&output.feedback, self.config.square_units, &mut self.view);
        match output.intent {
            Some(intent) => self.dispatch(intent),
            None => Ok(()),
        }
    }

    pub fn dispatch(&mut self, intent: Intent) -> Result<(), ClientError> {
        debug!("[{}] Intent {:?}", self.id, intent);
        self.step(Inbound::Intent(intent))
    }

    pub fn start_game(&mut self) -> Result<(), ClientError> {
        self.dispatch(Intent::StartGame)
    }

    pub fn resolve_promotion(&mut self, role: PromotionRole) -> Result<(), ClientError> {
        self.dispatch(Intent::PromotionChoice(role))
    }

    pub fn abandon_promotion(&mut self) -> Result<(), ClientError> {
        self.dispatch(Intent::AbandonPromotion)
    }

    /// Decodes and applies one text frame. Malformed frames change nothing.
    pub fn handle_raw_frame(&mut self, raw: &str) -> Result<(), ClientError> {
        match decode_frame(raw, self.config.pair_convention) {
            Ok(frame) => self.handle_frame(frame),
            Err(err) => {
                warn!("[{}] Dropping frame {}: {}", self.id, raw, err);
                Err(err)
            }
        }
    }

    pub fn handle_frame(&mut self, frame: ServerFrame) -> Result<(), ClientError> {
        self.step(Inbound::Frame(frame))
    }

    pub fn connection_lost(&mut self) {
        let _ = self.step(Inbound::ConnectionLost);
    }

    fn step(&mut self, message: Inbound) -> Result<(), ClientError> {
        let model = std::mem::take(&mut self.model);
        let (model, effects) = model.handle_message(message);
        self.model = model;
        self.execute(effects)
    }

    fn execute(&mut self, effects: Vec<Effect>) -> Result<(), ClientError> {
        let mut result = Ok(());
        let mut commands: Vec<ViewCommand> = Vec::new();
        let mut lost = false;
        for effect in effects {
            match effect {
                Effect::Send(request) => {
                    if let Err(err) = self.outbound.send(&request) {
                        warn!("[{}] Failed to send {:?}: {}", self.id, request, err);
                        lost |= matches!(err, ClientError::ConnectionLost);
                        result = Err(err);
                    }
                }
                Effect::View(command) => commands.push(command),
                Effect::Rejected(err) => {
                    info!("[{}] Rejected: {}", self.id, err);
                    result = Err(err);
                }
            }
        }
        render(&commands, self.config.square_units, &mut self.view);
        if lost {
            self.connection_lost();
        }
        result
    }
}
