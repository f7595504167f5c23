//! Loopback stand-ins for TVs, used by the unit tests of the brand clients
//! and the prober.
//!
//! Every peer binds `127.0.0.1:0` so tests can run in parallel.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;

pub(crate) type Log = Arc<Mutex<Vec<String>>>;

/// Polls `log` until it holds at least `n` entries or `within` elapses.
pub(crate) async fn wait_for(log: &Log, n: usize, within: Duration) -> Vec<String> {
    let deadline = tokio::time::Instant::now() + within;
    loop {
        let snapshot = log.lock().unwrap().clone();
        if snapshot.len() >= n || tokio::time::Instant::now() >= deadline {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// A port nothing is listening on.
pub(crate) fn unused_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

// ── Silent TCP peer ───────────────────────────────────────────────────────────

/// Accepts connections and never answers, like a TV that is up but hung.
pub(crate) async fn silent_peer() -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let task = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    (addr, task)
}

// ── HTTP stub ─────────────────────────────────────────────────────────────────

pub(crate) struct HttpStub {
    pub addr: SocketAddr,
    /// Request lines received, e.g. `"POST /keypress/Home HTTP/1.1"`.
    pub requests: Log,
    _task: JoinHandle<()>,
}

/// Answers every request with `status` and an empty body.
pub(crate) async fn http_stub(status: u16) -> HttpStub {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests: Log = Arc::default();
    let log = Arc::clone(&requests);

    let task = tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let log = Arc::clone(&log);
            tokio::spawn(async move {
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                let text = String::from_utf8_lossy(&head);
                let line = text.lines().next().unwrap_or_default().to_string();
                log.lock().unwrap().push(line);

                let response = format!(
                    "HTTP/1.1 {status} STUB\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    HttpStub {
        addr,
        requests,
        _task: task,
    }
}

// ── WebSocket peer ────────────────────────────────────────────────────────────

pub(crate) struct WsPeer {
    pub addr: SocketAddr,
    /// Request target of the last upgrade, e.g. `/api/v2/...?name=...`.
    pub uri: Arc<Mutex<Option<String>>>,
    /// Text frames received; a close frame is logged as `"<close>"`.
    pub received: Log,
    _task: JoinHandle<()>,
}

/// WebSocket peer that sends `greeting` right after the handshake and then
/// answers each received text frame with whatever `reply` returns.
pub(crate) async fn ws_peer(
    greeting: Vec<String>,
    reply: impl Fn(&str) -> Vec<String> + Send + Sync + 'static,
) -> WsPeer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let uri: Arc<Mutex<Option<String>>> = Arc::default();
    let received: Log = Arc::default();

    let (uri_slot, log) = (Arc::clone(&uri), Arc::clone(&received));
    let task = tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let uri_slot = Arc::clone(&uri_slot);
            let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
                *uri_slot.lock().unwrap() = Some(req.uri().to_string());
                Ok(resp)
            };
            let Ok(mut ws) = accept_hdr_async(stream, callback).await else {
                continue;
            };
            for frame in &greeting {
                let _ = ws.send(Message::Text(frame.clone())).await;
            }
            while let Some(Ok(msg)) = ws.next().await {
                match msg {
                    Message::Text(text) => {
                        log.lock().unwrap().push(text.clone());
                        for answer in reply(&text) {
                            let _ = ws.send(Message::Text(answer)).await;
                        }
                    }
                    Message::Close(_) => {
                        log.lock().unwrap().push("<close>".to_string());
                        break;
                    }
                    _ => {}
                }
            }
        }
    });

    WsPeer {
        addr,
        uri,
        received,
        _task: task,
    }
}
