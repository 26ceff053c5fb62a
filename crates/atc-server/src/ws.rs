use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::debug;

use atc_hub::Hub;

use crate::AppState;

/// Bound on one subscriber write so a dead TCP peer is reaped promptly
/// instead of pinning its writer task.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// `GET /ws` — subscribe to the push channel.
pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| subscriber_loop(socket, state.hub))
}

/// One subscriber's lifetime: replay, push-loop, eviction.
///
/// `Hub::subscribe` enqueues the snapshot and flat-ring replay before the
/// connection joins the broadcast set, so those frames always go out first.
/// The reader half exists only to notice the peer closing; clients do not
/// speak on this channel.
async fn subscriber_loop(socket: WebSocket, hub: Arc<Hub>) {
    let (id, mut rx) = hub.subscribe();
    let (mut sink, mut stream) = socket.split();

    let writer_hub = Arc::clone(&hub);
    let writer = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let send = sink.send(Message::Text(frame.into()));
            match tokio::time::timeout(SEND_TIMEOUT, send).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    debug!(subscriber = %id, %err, "subscriber write failed");
                    break;
                }
                Err(_) => {
                    debug!(subscriber = %id, "subscriber write timed out");
                    break;
                }
            }
        }
        writer_hub.unsubscribe(id);
        let _ = sink.close().await;
    });

    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Close(_)) | Err(_) => break,
            // Clients have nothing to say; ignore pings and stray frames
            Ok(_) => {}
        }
    }

    debug!(subscriber = %id, "subscriber disconnected");
    hub.unsubscribe(id);
    // Unregistering drops the hub-side sender, which ends the writer's
    // recv loop; no need to keep the task around
    writer.abort();
}
