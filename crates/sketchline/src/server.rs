//! `SketchlineServer` builder and accept loop.

use std::future::{Future, pending};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use sketchline_protocol::{JsonCodec, PlayerId};
use sketchline_room::{GameStore, RoomConfig, RoomRegistry};
use sketchline_words::WordSource;
use tokio::net::TcpListener;

use crate::handler::handle_connection;
use crate::{DEFAULT_BIND_ADDR, ServerConfig, SketchlineError};

/// Shared server state passed to each connection task.
pub(crate) struct ServerState<W: WordSource, S: GameStore> {
    pub(crate) registry: RoomRegistry<W, S>,
    pub(crate) codec: JsonCodec,
    next_player_id: AtomicU64,
}

impl<W: WordSource, S: GameStore> ServerState<W, S> {
    /// Session-scoped ids; a reconnecting browser gets a new one.
    pub(crate) fn next_player_id(&self) -> PlayerId {
        PlayerId(self.next_player_id.fetch_add(1, Ordering::Relaxed))
    }
}

/// Builder for configuring and starting a server.
///
/// ```rust,ignore
/// let server = ServerBuilder::new()
///     .bind("0.0.0.0:3001")
///     .room_config(RoomConfig { total_rounds: 5, ..Default::default() })
///     .build(StaticWords::default(), NoopStore)
///     .await?;
/// server.run().await
/// ```
pub struct ServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            room_config: RoomConfig::default(),
        }
    }

    /// Starts from a loaded [`ServerConfig`]. Backends are still passed to
    /// [`build`](Self::build).
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            bind_addr: config.bind_addr.clone(),
            room_config: config.room.clone(),
        }
    }

    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Rules and timings for every room.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds the listener.
    ///
    /// # Errors
    /// Returns [`SketchlineError::Io`] if the address cannot be bound.
    pub async fn build<W: WordSource, S: GameStore>(
        self,
        words: W,
        store: S,
    ) -> Result<SketchlineServer<W, S>, SketchlineError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        tracing::info!(addr = %self.bind_addr, "listening");

        let state = Arc::new(ServerState {
            registry: RoomRegistry::new(self.room_config, words, store),
            codec: JsonCodec,
            next_player_id: AtomicU64::new(1),
        });

        Ok(SketchlineServer { listener, state })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound server. Call [`run`](Self::run) to start accepting players.
pub struct SketchlineServer<W: WordSource, S: GameStore> {
    listener: TcpListener,
    state: Arc<ServerState<W, S>>,
}

impl<W: WordSource, S: GameStore> SketchlineServer<W, S> {
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the process is terminated.
    pub async fn run(self) -> Result<(), SketchlineError> {
        self.run_until(pending()).await
    }

    /// Accepts connections until `shutdown` resolves, then stops every
    /// room.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), SketchlineError>
    where
        F: Future<Output = ()>,
    {
        tracing::info!("sketchline server running");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, addr, state).await {
                                tracing::debug!(%addr, error = %e, "connection ended with error");
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                    }
                },
                () = &mut shutdown => break,
            }
        }

        let rooms = self.state.registry.room_count().await;
        tracing::info!(rooms, "shutting down");
        self.state.registry.shutdown().await;
        Ok(())
    }
}
