//! Repository client for a remote question server.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use crate::data::QuestionRepository;
use crate::error::RepositoryError;
use crate::models::QuestionRecord;
use crate::protocol::{ClientMessage, ServerMessage};

const RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches tests from a question server over WebSocket.
///
/// Every fetch opens its own connection; there is no retry.
#[derive(Debug, Clone)]
pub struct RemoteRepository {
    url: String,
    timeout: Duration,
}

impl RemoteRepository {
    /// `url` is a WebSocket URL such as `ws://192.168.1.10:4000`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: RESPONSE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn request(&self, test_id: &str) -> Result<ServerMessage, RepositoryError> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(|e| RepositoryError::Unavailable(format!("{}: {}", self.url, e)))?;
        let (mut ws_sender, mut ws_receiver) = ws_stream.split();

        let request = serde_json::to_string(&ClientMessage::FetchTest {
            test_id: test_id.to_string(),
        })
        .map_err(|e| RepositoryError::Malformed(e.to_string()))?;

        ws_sender
            .send(Message::Text(request.into()))
            .await
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;

        while let Some(msg) = ws_receiver.next().await {
            let text = match msg {
                Ok(Message::Text(text)) => text.to_string(),
                Ok(Message::Close(_)) => break,
                Err(e) => return Err(RepositoryError::Unavailable(e.to_string())),
                _ => continue,
            };

            let reply = serde_json::from_str::<ServerMessage>(&text)
                .map_err(|e| RepositoryError::Malformed(e.to_string()))?;

            if let Err(e) = ws_sender.send(Message::Close(None)).await {
                debug!("close after reply failed: {}", e);
            }
            return Ok(reply);
        }

        Err(RepositoryError::Unavailable(
            "connection closed before a reply".to_string(),
        ))
    }
}

#[async_trait]
impl QuestionRepository for RemoteRepository {
    async fn fetch(&self, test_id: &str) -> Result<Vec<QuestionRecord>, RepositoryError> {
        let reply = tokio::time::timeout(self.timeout, self.request(test_id))
            .await
            .map_err(|_| {
                warn!(url = %self.url, "question server did not answer in time");
                RepositoryError::Unavailable(format!("no reply from {}", self.url))
            })??;

        match reply {
            ServerMessage::Questions {
                test_id: answered, ..
            } if answered.trim() != test_id.trim() => Err(RepositoryError::Malformed(format!(
                "asked for test {} but the server sent test {}",
                test_id, answered
            ))),
            ServerMessage::Questions { records, .. } if records.is_empty() => {
                Err(RepositoryError::NotFound {
                    test_id: test_id.to_string(),
                })
            }
            ServerMessage::Questions { records, .. } => Ok(records),
            ServerMessage::TestNotFound { test_id } => Err(RepositoryError::NotFound { test_id }),
            ServerMessage::Failed { reason } => Err(RepositoryError::Malformed(reason)),
        }
    }
}
