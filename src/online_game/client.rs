use futures::{SinkExt, StreamExt};
use log::{error, info, trace};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tungstenite::Message;
use url::Url;

use crate::error::ClientError;
use crate::online_game::definitions::{encode, Handshake, Request};
use crate::online_game::session::Outbound;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Frame(String),
    /// Last event of a channel: closed by the server or broken.
    Closed,
}

/// Sending half of an open channel. Dropping it closes the websocket.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    requests: UnboundedSender<Request>,
}

impl Outbound for ChannelHandle {
    fn send(&mut self, request: &Request) -> Result<(), ClientError> {
        self.requests
            .send(*request)
            .map_err(|_| ClientError::ConnectionLost)
    }
}

/// Connects, announces a new session and starts the writer and reader tasks.
///
/// Inbound frames arrive on the returned receiver in the order the server
/// sent them, followed by a single [`ChannelEvent::Closed`].
pub async fn open(url: &Url) -> Result<(ChannelHandle, UnboundedReceiver<ChannelEvent>), ClientError> {
    let (websocket, _) = tokio_tungstenite::connect_async(url.as_str()).await?;
    info!("Connected to {}", url);
    let (mut write, mut read) = websocket.split();
    write
        .send(Message::Text(encode(&Handshake::NEW_SESSION)?))
        .await?;

    let (request_tx, request_rx) = mpsc::unbounded_channel::<Request>();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let requests = UnboundedReceiverStream::new(request_rx);
    tokio::spawn(async move {
        let result = requests
            .filter_map(|request| async move {
                trace!("Sending {:?}", request);
                match encode(&request) {
                    Ok(text) => Some(Ok::<_, tungstenite::Error>(Message::Text(text))),
                    Err(err) => {
                        error!("Failed to encode {:?}: {}", request, err);
                        None
                    }
                }
            })
            .forward(write)
            .await;
        if let Err(err) = result {
            error!("Failed sending websocket msg: {}", err);
        }
    });

    tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    if event_tx.send(ChannelEvent::Frame(text)).is_err() {
                        break;
                    }
                }
                Ok(Message::Close(frame)) => {
                    info!("Server closed the connection: {:?}", frame);
                    break;
                }
                Ok(other) => trace!("Ignoring non text message: {:?}", other),
                Err(err) => {
                    info!("Something went wrong with connection! Err: {}", err);
                    break;
                }
            }
        }
        let _ = event_tx.send(ChannelEvent::Closed);
    });

    Ok((ChannelHandle { requests: request_tx }, event_rx))
}
