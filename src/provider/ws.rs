//! WebSocket JSON-RPC transport
//!
//! One persistent connection per provider. Calls race independently, so a
//! background read task demultiplexes incoming responses to their in-flight
//! requests by JSON-RPC id. The handshake happens at construction; a read
//! failure or server close fails every pending call and every call issued
//! afterwards.

use super::{JsonRpcRequest, JsonRpcResponse, RpcTransport};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{oneshot, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsSource = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;
type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value>>>>>;

/// Persistent WebSocket transport
pub struct WsTransport {
    sink: Mutex<WsSink>,
    pending: PendingMap,
    next_id: AtomicU64,
}

impl WsTransport {
    /// Connect and spawn the response reader. A failed handshake is a
    /// construction-time failure.
    pub async fn connect(url: &str) -> Result<Self> {
        url::Url::parse(url)
            .map_err(|e| AppError::provider(format!("invalid URL '{}': {}", url, e)))?;

        let (stream, _response) = connect_async(url)
            .await
            .map_err(|e| AppError::provider(format!("WebSocket handshake with '{}' failed: {}", url, e)))?;

        let (sink, source) = stream.split();
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        tokio::spawn(read_loop(source, pending.clone()));

        Ok(Self {
            sink: Mutex::new(sink),
            pending,
            next_id: AtomicU64::new(1),
        })
    }
}

#[async_trait]
impl RpcTransport for WsTransport {
    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = serde_json::to_string(&JsonRpcRequest::new(id, method, params))?;

        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);

        if let Err(e) = self.sink.lock().await.send(Message::Text(request)).await {
            self.pending.lock().await.remove(&id);
            return Err(AppError::transport(format!("WebSocket send failed: {}", e)));
        }

        rx.await
            .map_err(|_| AppError::transport("WebSocket closed before response arrived"))?
    }
}

/// Route incoming frames to their pending calls until the stream ends.
async fn read_loop(mut source: WsSource, pending: PendingMap) {
    while let Some(message) = source.next().await {
        let message = match message {
            Ok(m) => m,
            Err(e) => {
                fail_pending(&pending, &format!("WebSocket read failed: {}", e)).await;
                return;
            }
        };

        if let Message::Text(text) = message {
            let response: JsonRpcResponse = match serde_json::from_str(&text) {
                Ok(r) => r,
                // subscription pushes and other unsolicited frames are ignored
                Err(_) => continue,
            };
            let Some(id) = response.id.as_ref().and_then(Value::as_u64) else {
                continue;
            };
            if let Some(tx) = pending.lock().await.remove(&id) {
                let _ = tx.send(response.into_result());
            }
        }
    }

    fail_pending(&pending, "WebSocket connection closed").await;
}

async fn fail_pending(pending: &PendingMap, reason: &str) {
    let mut map = pending.lock().await;
    for (_, tx) in map.drain() {
        let _ = tx.send(Err(AppError::transport(reason)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    /// Minimal JSON-RPC responder: answers every text frame with a result
    /// echoing the request id, out of order for every second request.
    async fn spawn_stub_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let ws = accept_async(stream).await.unwrap();
            let (mut sink, mut source) = ws.split();

            let mut held: Option<Message> = None;
            let mut count = 0usize;
            while let Some(Ok(message)) = source.next().await {
                if let Message::Text(text) = message {
                    let request: Value = serde_json::from_str(&text).unwrap();
                    let reply = json!({
                        "jsonrpc": "2.0",
                        "id": request["id"],
                        "result": format!("0x{:x}", request["id"].as_u64().unwrap()),
                    });
                    let frame = Message::Text(reply.to_string());
                    count += 1;
                    if count % 2 == 1 {
                        held = Some(frame);
                    } else {
                        // deliver the newer response first
                        sink.send(frame).await.unwrap();
                        if let Some(older) = held.take() {
                            sink.send(older).await.unwrap();
                        }
                    }
                }
            }
        });

        format!("ws://{}", addr)
    }

    #[tokio::test]
    async fn test_calls_demultiplex_by_id() {
        let url = spawn_stub_server().await;
        let transport = Arc::new(WsTransport::connect(&url).await.unwrap());

        let a = tokio::spawn({
            let t = transport.clone();
            async move { t.call("eth_call", json!([])).await }
        });
        let b = tokio::spawn({
            let t = transport.clone();
            async move { t.call("eth_call", json!([])).await }
        });

        let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());
        // ids 1 and 2 round-trip even though the server reorders frames
        let mut results = vec![a, b];
        results.sort_by_key(|v| v.as_str().map(str::to_string));
        assert_eq!(results, vec![json!("0x1"), json!("0x2")]);
    }

    #[tokio::test]
    async fn test_handshake_failure_is_provider_error() {
        // nothing listens on this port
        let result = WsTransport::connect("ws://127.0.0.1:1").await;
        assert!(matches!(result, Err(AppError::Provider(_))));
    }

    #[tokio::test]
    async fn test_server_close_fails_pending_calls() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            // swallow one request, then drop the connection
            let _ = ws.next().await;
        });

        let transport = WsTransport::connect(&format!("ws://{}", addr)).await.unwrap();
        let result = transport.call("eth_call", json!([])).await;
        assert!(matches!(result, Err(AppError::Transport(_))));
    }
}
