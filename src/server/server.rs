//! WebSocket question server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::data::{JsonFileRepository, QuestionRepository, load_records_from_json};
use crate::error::{QuizError, RepositoryError};
use crate::protocol::{ClientMessage, ServerMessage};

/// Shared repository handed to every connection.
type SharedRepository = Arc<dyn QuestionRepository>;

/// Serve a JSON question bank on `addr` until Ctrl-C.
pub async fn run<P: AsRef<Path>>(addr: SocketAddr, bank_path: P) -> Result<(), QuizError> {
    let bank_path = bank_path.as_ref();

    // Fail fast on an unreadable bank; requests re-read it anyway.
    let records = load_records_from_json(bank_path)?;
    info!(
        "Loaded {} question rows from {}",
        records.len(),
        bank_path.display()
    );

    let listener = TcpListener::bind(addr).await?;
    info!("Question server listening on {}", listener.local_addr()?);

    let repository: SharedRepository = Arc::new(JsonFileRepository::new(bank_path));
    serve(listener, repository, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    })
    .await;

    info!("Question server stopped");
    Ok(())
}

/// Accept connections on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, repository: SharedRepository, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    let repository = Arc::clone(&repository);
                    tokio::spawn(handle_connection(stream, addr, repository));
                }
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                }
            },
            _ = &mut shutdown => break,
        }
    }
}

/// Handle a single WebSocket connection.
async fn handle_connection(stream: TcpStream, addr: SocketAddr, repository: SharedRepository) {
    let ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake with {} failed: {}", addr, e);
            return;
        }
    };
    debug!("Connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    while let Some(msg) = ws_receiver.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text.to_string(),
            Ok(Message::Close(_)) => break,
            Err(e) => {
                debug!("Connection from {} ended: {}", addr, e);
                break;
            }
            _ => continue,
        };

        let reply = match serde_json::from_str::<ClientMessage>(&text) {
            Ok(request) => handle_request(request, repository.as_ref()).await,
            Err(e) => ServerMessage::Failed {
                reason: format!("unrecognized request: {}", e),
            },
        };

        let json = match serde_json::to_string(&reply) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to encode reply: {}", e);
                break;
            }
        };
        if ws_sender.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }
}

async fn handle_request(request: ClientMessage, repository: &dyn QuestionRepository) -> ServerMessage {
    match request {
        ClientMessage::FetchTest { test_id } => match repository.fetch(&test_id).await {
            Ok(records) => {
                info!("Serving {} questions for test {}", records.len(), test_id);
                ServerMessage::Questions { test_id, records }
            }
            Err(RepositoryError::NotFound { test_id }) => {
                info!("Test {} not found", test_id);
                ServerMessage::TestNotFound { test_id }
            }
            Err(e) => {
                warn!("Failed to read questions for test {}: {}", test_id, e);
                ServerMessage::Failed {
                    reason: e.to_string(),
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::data::{InMemoryRepository, fixtures};

    #[tokio::test]
    async fn test_handle_request_maps_repository_outcomes() {
        let repo = InMemoryRepository::from_records(fixtures::records("1", 2));

        let found = handle_request(
            ClientMessage::FetchTest {
                test_id: "1".to_string(),
            },
            &repo,
        )
        .await;
        assert!(matches!(found, ServerMessage::Questions { ref records, .. } if records.len() == 2));

        let missing = handle_request(
            ClientMessage::FetchTest {
                test_id: "2".to_string(),
            },
            &repo,
        )
        .await;
        assert!(matches!(missing, ServerMessage::TestNotFound { ref test_id } if test_id == "2"));
    }
}
