use std::cell::Cell;

use anyhow::Context;
use chess_client::core::board_view::START_PLACEMENT;
use chess_client::core::coords::PairConvention;
use chess_client::online_game::client::{self, ChannelEvent};
use chess_client::online_game::gestures::Gesture;
use chess_client::view::{ElementKey, ViewSurface};
use chess_client::{Outbound, PromotionRole, Session, SessionConfig};
use clap::Parser;
use log::{debug, info, trace, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "chess-client", about = "Terminal front end for the chess board server")]
struct Args {
    /// Websocket endpoint of the game server.
    #[arg(env = "CHESS_SERVER_URL", default_value = "ws://127.0.0.1:3000/ws")]
    url: Url,

    /// Position the server starts from, pieces are numbered in FEN order.
    #[arg(long, env = "CHESS_START_FEN", default_value = START_PLACEMENT)]
    fen: String,

    /// Read legacy `to_y`/`to_x` fields as 1-indexed.
    #[arg(long)]
    one_indexed_pairs: bool,

    /// Send a start request right after connecting (engine vs engine servers).
    #[arg(long)]
    start: bool,
}

/// Stands in for the browser page: logs element updates and reports when the
/// board needs a redraw.
#[derive(Default)]
struct TerminalView {
    dirty: Cell<bool>,
}

impl TerminalView {
    fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }
}

impl ViewSurface for TerminalView {
    fn set_position(&mut self, element: ElementKey, left: u32, top: u32) {
        trace!("{element}: left {left} top {top}");
        self.dirty.set(true);
    }

    fn set_visibility(&mut self, element: ElementKey, visible: bool) {
        trace!("{element}: visible {visible}");
        self.dirty.set(true);
    }

    fn set_asset(&mut self, element: ElementKey, asset: &str) {
        trace!("{element}: asset {asset}");
        self.dirty.set(true);
    }

    fn set_opacity(&mut self, element: ElementKey, opacity: f32) {
        trace!("{element}: opacity {opacity}");
    }

    fn show_promotion_choice(&mut self, open: bool) {
        if open {
            println!("Promotion! Pick one with `promote q|r|b|n` or `abandon`.");
        }
    }

    fn show_message(&mut self, message: &str) {
        println!("{message}");
    }
}

enum Command {
    Gesture(Gesture),
    Promote(PromotionRole),
    Abandon,
    Start,
    Board,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        ["click", element] => Command::Gesture(Gesture::Click {
            element: element.to_string(),
        }),
        ["drag", element] => Command::Gesture(Gesture::DragStart {
            element: element.to_string(),
        }),
        ["dragend", element] => Command::Gesture(Gesture::DragEnd {
            element: element.to_string(),
        }),
        ["drop", dragged, target] => Command::Gesture(Gesture::Drop {
            dragged: dragged.to_string(),
            target: target.to_string(),
        }),
        ["promote", role] => Command::Promote(match *role {
            "q" | "queen" => PromotionRole::Queen,
            "r" | "rook" => PromotionRole::Rook,
            "b" | "bishop" => PromotionRole::Bishop,
            "n" | "knight" => PromotionRole::Knight,
            _ => return None,
        }),
        ["abandon"] => Command::Abandon,
        ["start"] => Command::Start,
        ["board"] => Command::Board,
        ["help"] => Command::Help,
        ["quit"] | ["exit"] => Command::Quit,
        _ => return None,
    };
    Some(command)
}

const HELP: &str = "\
click piece_<id>                 request the overlay of a piece
drag piece_<id> / dragend ...    start or end dragging a piece
drop piece_<id> square_<n>       move a piece
drop piece_<id> piece_<id>       capture a piece
promote q|r|b|n / abandon        answer a promotion request
start                            ask the server to start
board                            print the board
quit";

/// Returns `false` once the user asked to leave.
fn run_command<O: Outbound>(session: &mut Session<O, TerminalView>, line: &str) -> bool {
    let Some(command) = parse_command(line) else {
        if !line.trim().is_empty() {
            println!("Unknown command, try `help`.");
        }
        return true;
    };
    let result = match command {
        Command::Gesture(gesture) => session.handle_gesture(&gesture),
        Command::Promote(role) => session.resolve_promotion(role),
        Command::Abandon => session.abandon_promotion(),
        Command::Start => session.start_game(),
        Command::Board => {
            print!("{}", session.board().ascii());
            Ok(())
        }
        Command::Help => {
            println!("{HELP}");
            Ok(())
        }
        Command::Quit => return false,
    };
    if let Err(err) = result {
        println!("{err}");
    }
    true
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = SessionConfig {
        start_fen: args.fen,
        pair_convention: if args.one_indexed_pairs {
            PairConvention::OneIndexed
        } else {
            PairConvention::ZeroIndexed
        },
        ..Default::default()
    };
    let (channel, mut events) = client::open(&args.url)
        .await
        .with_context(|| format!("Failed to connect to {}", args.url))?;
    let mut session = Session::new(config, channel, TerminalView::default())?;
    info!("Session {} started, type `help` for commands", session.id());
    print!("{}", session.board().ascii());
    session.view().take_dirty();

    if args.start {
        if let Err(err) = session.start_game() {
            warn!("Failed to start the game: {}", err);
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(ChannelEvent::Frame(raw)) => {
                    if let Err(err) = session.handle_raw_frame(&raw) {
                        debug!("Frame not applied: {}", err);
                    }
                    if session.view().take_dirty() {
                        print!("{}", session.board().ascii());
                    }
                }
                Some(ChannelEvent::Closed) | None => {
                    session.connection_lost();
                    break;
                }
            },
            line = lines.next_line() => match line? {
                Some(line) => {
                    if !run_command(&mut session, &line) {
                        break;
                    }
                }
                None => break,
            },
        }
    }
    info!("Session {} finished while {}", session.id(), session.phase().name());
    Ok(())
}
