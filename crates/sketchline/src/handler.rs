//! Per-connection handler: frame decoding and event routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Upgrade to WebSocket and assign a session [`PlayerId`]
//!   2. Spawn a writer that drains the player's notification channel
//!   3. Loop: decode client events and route them to the addressed room
//!   4. On close, leave every room the player joined

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use sketchline_protocol::{ClientEvent, Codec, JsonCodec, PlayerId, ProtocolError, RoomId, ServerEvent};
use sketchline_room::{GameStore, JoinRequest, PlayerSender, RoomHandle};
use sketchline_words::WordSource;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

use crate::SketchlineError;
use crate::server::ServerState;

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;

/// Rooms a connection has joined. Dropping it removes the player from
/// all of them.
///
/// `Drop` is synchronous, so the leaves run in a spawned task.
struct Memberships<W: WordSource, S: GameStore> {
    player_id: PlayerId,
    rooms: HashSet<RoomId>,
    state: Arc<ServerState<W, S>>,
}

impl<W: WordSource, S: GameStore> Drop for Memberships<W, S> {
    fn drop(&mut self) {
        if self.rooms.is_empty() {
            return;
        }
        let player_id = self.player_id;
        let rooms = std::mem::take(&mut self.rooms);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            for room_id in rooms {
                if let Err(e) = state.registry.leave(&room_id, player_id).await {
                    tracing::debug!(%player_id, %room_id, error = %e, "leave on disconnect failed");
                }
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<W, S>(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState<W, S>>,
) -> Result<(), SketchlineError>
where
    W: WordSource,
    S: GameStore,
{
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let player_id = state.next_player_id();
    tracing::info!(%player_id, %addr, "player connected");

    let (sink, mut frames) = ws.split();
    let (sender, events) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_events(sink, events, state.codec));

    let mut memberships = Memberships {
        player_id,
        rooms: HashSet::new(),
        state: Arc::clone(&state),
    };

    while let Some(frame) = frames.next().await {
        let decoded = match frame {
            Ok(Message::Text(text)) => decode(&state.codec, text.as_bytes()),
            Ok(Message::Binary(data)) => decode(&state.codec, &data),
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
        };

        match decoded {
            Ok(event) => dispatch(&state, player_id, &sender, &mut memberships, event).await,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "rejected frame");
                let _ = sender.send(ServerEvent::Error {
                    message: e.to_string(),
                });
            }
        }
    }

    tracing::info!(%player_id, rooms = memberships.rooms.len(), "player disconnected");
    drop(memberships);
    writer.abort();
    Ok(())
}

fn decode(codec: &JsonCodec, data: &[u8]) -> Result<ClientEvent, ProtocolError> {
    let event: ClientEvent = codec.decode(data)?;
    event.validate()?;
    Ok(event)
}

/// Routes one client event. Events for rooms that do not exist are
/// dropped without a reply.
async fn dispatch<W, S>(
    state: &ServerState<W, S>,
    player_id: PlayerId,
    sender: &PlayerSender,
    memberships: &mut Memberships<W, S>,
    event: ClientEvent,
) where
    W: WordSource,
    S: GameStore,
{
    match event {
        ClientEvent::JoinRoom {
            room_id,
            username,
            user_id,
        } => {
            let request = JoinRequest {
                player_id,
                user_id,
                username,
                sender: sender.clone(),
            };
            match state.registry.join(&room_id, request).await {
                Ok(()) => {
                    memberships.rooms.insert(room_id);
                }
                Err(e) => tracing::debug!(%player_id, error = %e, "join refused"),
            }
        }

        ClientEvent::LeaveRoom { room_id } => {
            memberships.rooms.remove(&room_id);
            if let Err(e) = state.registry.leave(&room_id, player_id).await {
                tracing::debug!(%player_id, error = %e, "leave refused");
            }
        }

        ClientEvent::SelectWord { room_id, word } => {
            if let Some(room) = find_room(state, &room_id).await {
                report(player_id, room.select_word(player_id, word).await);
            }
        }

        ClientEvent::SendMessage { room_id, message } => {
            if let Some(room) = find_room(state, &room_id).await {
                report(player_id, room.submit_text(player_id, message).await);
            }
        }

        ClientEvent::Draw { room_id, draw_data } => {
            if let Some(room) = find_room(state, &room_id).await {
                report(player_id, room.draw(player_id, draw_data).await);
            }
        }

        ClientEvent::ClearCanvas { room_id } => {
            if let Some(room) = find_room(state, &room_id).await {
                report(player_id, room.clear_canvas(player_id).await);
            }
        }
    }
}

async fn find_room<W: WordSource, S: GameStore>(
    state: &ServerState<W, S>,
    room_id: &RoomId,
) -> Option<RoomHandle> {
    let room = state.registry.get(room_id).await;
    if room.is_none() {
        tracing::debug!(%room_id, "event for missing room ignored");
    }
    room
}

fn report(player_id: PlayerId, result: Result<(), sketchline_room::RoomError>) {
    if let Err(e) = result {
        tracing::debug!(%player_id, error = %e, "room did not take event");
    }
}

/// Drains a player's notifications onto the socket as JSON text frames.
async fn write_events(
    mut sink: WsSink,
    mut events: mpsc::UnboundedReceiver<ServerEvent>,
    codec: JsonCodec,
) {
    while let Some(event) = events.recv().await {
        let text = match codec.encode(&event).map(String::from_utf8) {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::warn!(event = event.name(), error = %e, "frame is not utf-8");
                continue;
            }
            Err(e) => {
                tracing::warn!(event = event.name(), error = %e, "encode failed");
                continue;
            }
        };
        if sink.send(Message::text(text)).await.is_err() {
            break;
        }
    }
    let _ = sink.close().await;
}
