//! The room's push channel: a WebSocket that delivers JSON envelopes.
//!
//! Frames are forwarded verbatim; decoding happens in the room so a bad
//! frame never tears the connection down.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{info, trace, warn};

use crate::error::ClientError;

/// A heartbeat goes out every 5 seconds.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// Heartbeats allowed to go unanswered before the connection is dropped.
pub const MAX_MISSED_HEARTBEATS: u8 = 3;

/// Connect to `uri` and forward every text frame to `frames` until the
/// socket closes or the receiving side goes away.
///
/// `heartbeat` is sent as-is on every tick; a frame equal to it is taken as
/// the server's echo and not forwarded. An empty `heartbeat` disables the
/// keepalive.
pub async fn run(
    uri: &str,
    heartbeat: &str,
    frames: mpsc::UnboundedSender<String>,
) -> Result<(), ClientError> {
    let (socket, _) = connect_async(uri).await?;
    info!("push channel connected to {}", uri);

    let (mut sender, mut receiver) = socket.split();

    let mut ticker = tokio::time::interval(HEARTBEAT_INTERVAL);
    ticker.tick().await;
    let mut echoed = true;
    let mut missed: u8 = 0;

    loop {
        tokio::select! {
            next = receiver.next() => {
                let msg = match next {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                };
                match msg {
                    Message::Text(text) => {
                        if !heartbeat.is_empty() && text.as_str() == heartbeat {
                            trace!("heartbeat echoed");
                            echoed = true;
                            continue;
                        }
                        if frames.send(text.as_str().to_owned()).is_err() {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            _ = ticker.tick(), if !heartbeat.is_empty() => {
                if echoed {
                    missed = 0;
                } else {
                    missed += 1;
                    if missed >= MAX_MISSED_HEARTBEATS {
                        warn!("Heartbeat timeout (missed {}), dropping push channel", missed);
                        return Err(ClientError::Closed);
                    }
                }
                echoed = false;
                sender.send(Message::text(heartbeat.to_owned())).await?;
            }
        }
    }

    info!("push channel closed");
    Ok(())
}
