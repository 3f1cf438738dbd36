//! WebSocket Push Channel
//!
//! `GET /ws` upgrades to a socket that speaks JSON text frames:
//!
//! - client → server: `ClientFrame` (`subscribe`, `unsubscribe`, `send`)
//! - server → client: deliveries as a bare one-element `Message` array, and
//!   `ServerFrame` acknowledgements and errors
//!
//! A socket may subscribe to any number of user topics. Each subscription is
//! a forwarder task that copies hub deliveries into the socket's outbound
//! queue. A `send` frame persists through `MessageService`, so the message is
//! published to both participants' topics only once it is stored.

use std::collections::HashMap;

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::hub::NotificationHub;
use crate::backend::messaging::MessageService;
use crate::shared::messaging::{ClientFrame, SendMessageRequest, ServerFrame};

const OUTBOUND_BUFFER: usize = 64;

pub async fn handle_push_socket(
    ws: WebSocketUpgrade,
    State(messages): State<MessageService>,
    State(hub): State<NotificationHub>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run_push_session(socket, messages, hub))
}

async fn run_push_session(socket: WebSocket, messages: MessageService, hub: NotificationHub) {
    let (mut sink, mut stream) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(OUTBOUND_BUFFER);
    tracing::info!("[Push] Socket connected");

    let mut send_task = tokio::spawn(async move {
        while let Some(text) = outbound_rx.recv().await {
            if sink.send(WsMessage::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        let mut session = PushSession::new(messages, hub, outbound_tx);
        while let Some(Ok(frame)) = stream.next().await {
            match frame {
                WsMessage::Text(text) => session.handle_text(text.as_str()).await,
                WsMessage::Close(_) => break,
                // pings are answered by axum
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };
    tracing::info!("[Push] Socket closed");
}

/// Per-socket state, independent of the transport
pub struct PushSession {
    messages: MessageService,
    hub: NotificationHub,
    outbound: mpsc::Sender<String>,
    forwarders: HashMap<Uuid, JoinHandle<()>>,
}

impl PushSession {
    pub fn new(
        messages: MessageService,
        hub: NotificationHub,
        outbound: mpsc::Sender<String>,
    ) -> Self {
        Self {
            messages,
            hub,
            outbound,
            forwarders: HashMap::new(),
        }
    }

    pub async fn handle_text(&mut self, text: &str) {
        match serde_json::from_str::<ClientFrame>(text) {
            Ok(frame) => self.handle_frame(frame).await,
            Err(err) => {
                tracing::debug!("[Push] Rejected frame: {}", err);
                self.send_error(format!("invalid frame: {err}")).await;
            }
        }
    }

    pub async fn handle_frame(&mut self, frame: ClientFrame) {
        match frame {
            ClientFrame::Subscribe { user_id } => self.subscribe(user_id).await,
            ClientFrame::Unsubscribe { user_id } => {
                if let Some(forwarder) = self.forwarders.remove(&user_id) {
                    forwarder.abort();
                }
                self.send_frame(&ServerFrame::Unsubscribed { user_id }).await;
            }
            ClientFrame::Send {
                sender,
                receiver,
                text,
            } => {
                let request = SendMessageRequest {
                    id: None,
                    sender,
                    receiver,
                    text,
                };
                // on success the delivery arrives through the topics
                if let Err(err) = self.messages.send(request).await {
                    tracing::warn!("[Push] Send from {} failed: {}", sender, err);
                    self.send_error(err.to_string()).await;
                }
            }
        }
    }

    pub fn subscriptions(&self) -> usize {
        self.forwarders.len()
    }

    async fn subscribe(&mut self, user_id: Uuid) {
        if !self.forwarders.contains_key(&user_id) {
            let Some(mut deliveries) = self.hub.subscribe(user_id) else {
                self.send_error("server is shutting down".to_string()).await;
                return;
            };

            let outbound = self.outbound.clone();
            let forwarder = tokio::spawn(async move {
                loop {
                    match deliveries.recv().await {
                        Ok(payload) => {
                            let text = match serde_json::to_string(&payload) {
                                Ok(text) => text,
                                Err(err) => {
                                    tracing::error!("[Push] Failed to encode delivery: {:?}", err);
                                    continue;
                                }
                            };
                            if outbound.send(text).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(
                                "[Push] Topic {} forwarder lagged, skipped {} deliveries",
                                user_id,
                                skipped
                            );
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            });
            self.forwarders.insert(user_id, forwarder);
            tracing::debug!("[Push] Subscribed to topic {}", user_id);
        }
        self.send_frame(&ServerFrame::Subscribed { user_id }).await;
    }

    async fn send_error(&self, message: String) {
        self.send_frame(&ServerFrame::Error { message }).await;
    }

    async fn send_frame(&self, frame: &ServerFrame) {
        match serde_json::to_string(frame) {
            Ok(text) => {
                // a closed queue means the socket is already going away
                let _ = self.outbound.send(text).await;
            }
            Err(err) => tracing::error!("[Push] Failed to encode frame: {:?}", err),
        }
    }
}

impl Drop for PushSession {
    fn drop(&mut self) {
        for (_, forwarder) in self.forwarders.drain() {
            forwarder.abort();
        }
    }
}
