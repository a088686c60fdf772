//! ElevenLabs Conversational AI client (text mode).
//!
//! Speaks the conversation WebSocket: one socket per session, JSON frames
//! tagged by `type`. Audio frames only drive the speaking status; their
//! payload is not decoded.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::{SinkExt, Stream, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tracing::{debug, info, warn};

use crate::traits::{
    AgentCallbacks, AgentFailure, AgentMessage, AgentService, AgentSession, SessionParams,
};

const DEFAULT_BASE_URL: &str = "wss://api.elevenlabs.io/v1/convai/conversation";

pub struct ElevenLabsService {
    base_url: String,
}

impl ElevenLabsService {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn session_url(&self, params: &SessionParams) -> String {
        let mut url = format!(
            "{}?agent_id={}",
            self.base_url,
            urlencoding::encode(&params.agent_id)
        );
        if let Some(branch) = &params.branch_id {
            url.push_str("&branch_id=");
            url.push_str(&urlencoding::encode(branch));
        }
        url
    }
}

impl Default for ElevenLabsService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentService for ElevenLabsService {
    fn name(&self) -> &str {
        "elevenlabs"
    }

    async fn start_session(
        &self,
        params: SessionParams,
        callbacks: Arc<dyn AgentCallbacks>,
    ) -> Result<Box<dyn AgentSession>> {
        let url = self.session_url(&params);
        let mut request = url
            .as_str()
            .into_client_request()
            .context("invalid conversation url")?;
        request.headers_mut().insert(
            "xi-api-key",
            HeaderValue::from_str(&params.api_key).context("api key is not a valid header")?,
        );

        info!(agent_id = %params.agent_id, "Opening ElevenLabs conversation");
        let (stream, _) = tokio_tungstenite::connect_async(request)
            .await
            .context("failed to connect to ElevenLabs")?;
        let (mut write, read) = stream.split();

        let init = json!({ "type": "conversation_initiation_client_data" });
        write
            .send(Message::Text(init.to_string()))
            .await
            .context("failed to send conversation init")?;

        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();

        tokio::spawn(async move {
            while let Some(frame) = out_rx.recv().await {
                let closing = matches!(frame, Message::Close(_));
                if let Err(e) = write.send(frame).await {
                    warn!(error = %e, "ElevenLabs write failed");
                    break;
                }
                if closing {
                    break;
                }
            }
            let _ = write.close().await;
        });

        tokio::spawn(read_frames(read, callbacks, out_tx.clone()));

        Ok(Box::new(ElevenLabsSession { out_tx }))
    }
}

/// Writer side of an open conversation. Dropping it closes the socket.
struct ElevenLabsSession {
    out_tx: mpsc::UnboundedSender<Message>,
}

#[async_trait]
impl AgentSession for ElevenLabsSession {
    async fn send_user_input(&self, text: &str) -> Result<()> {
        let frame = json!({ "type": "user_message", "text": text });
        self.out_tx
            .send(Message::Text(frame.to_string()))
            .map_err(|_| anyhow::anyhow!("conversation socket is closed"))
    }

    async fn end_session(&self) -> Result<()> {
        self.out_tx
            .send(Message::Close(None))
            .map_err(|_| anyhow::anyhow!("conversation socket is already closed"))
    }
}

impl Drop for ElevenLabsSession {
    fn drop(&mut self) {
        let _ = self.out_tx.send(Message::Close(None));
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerFrame {
    ConversationInitiationMetadata {},
    AgentResponse {
        agent_response_event: AgentResponseEvent,
    },
    UserTranscript {
        user_transcription_event: UserTranscriptionEvent,
    },
    Interruption {},
    Audio {},
    Ping {
        ping_event: PingEvent,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct AgentResponseEvent {
    agent_response: String,
}

#[derive(Debug, Deserialize)]
struct UserTranscriptionEvent {
    user_transcript: String,
}

#[derive(Debug, Deserialize)]
struct PingEvent {
    event_id: u64,
}

/// Reader loop: dispatch frames until the socket closes or fails, then
/// report the disconnect exactly once.
async fn read_frames<S>(
    mut read: S,
    callbacks: Arc<dyn AgentCallbacks>,
    replies: mpsc::UnboundedSender<Message>,
) where
    S: Stream<Item = Result<Message, WsError>> + Unpin,
{
    loop {
        match read.next().await {
            Some(Ok(Message::Text(text))) => {
                if let Some(reply) = handle_frame(&text, callbacks.as_ref()) {
                    let _ = replies.send(reply);
                }
            }
            Some(Ok(Message::Close(_))) | None => break,
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                callbacks.on_error(AgentFailure {
                    message: e.to_string(),
                });
                break;
            }
        }
    }
    callbacks.on_disconnect();
}

/// Map one server frame onto the callbacks. Returns a frame to send back,
/// if the server expects one.
fn handle_frame(raw: &str, callbacks: &dyn AgentCallbacks) -> Option<Message> {
    let frame: ServerFrame = match serde_json::from_str(raw) {
        Ok(frame) => frame,
        Err(e) => {
            debug!(error = %e, "Skipping unparseable ElevenLabs frame");
            return None;
        }
    };

    match frame {
        ServerFrame::ConversationInitiationMetadata {} => {
            callbacks.on_connect();
            callbacks.on_status_change("listening");
        }
        ServerFrame::AgentResponse {
            agent_response_event,
        } => {
            callbacks.on_status_change("speaking");
            callbacks.on_message(AgentMessage {
                text: Some(agent_response_event.agent_response),
            });
            callbacks.on_status_change("listening");
        }
        ServerFrame::UserTranscript {
            user_transcription_event,
        } => {
            debug!(
                chars = user_transcription_event.user_transcript.len(),
                "User transcript received"
            );
        }
        ServerFrame::Interruption {} => callbacks.on_status_change("listening"),
        ServerFrame::Audio {} => callbacks.on_status_change("speaking"),
        ServerFrame::Ping { ping_event } => {
            let pong = json!({ "type": "pong", "event_id": ping_event.event_id });
            return Some(Message::Text(pong.to_string()));
        }
        ServerFrame::Other => {}
    }
    None
}
