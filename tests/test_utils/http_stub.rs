//! Minimal HTTP server answering canned JSON per request path.

use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One canned response: request path, status code and JSON body.
#[derive(Debug, Clone)]
pub struct Route {
    pub path: String,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn ok(path: &str, body: serde_json::Value) -> Self {
        Self {
            path: path.to_string(),
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(path: &str, status: u16) -> Self {
        Self {
            path: path.to_string(),
            status,
            body: r#"{"error":"stub"}"#.to_string(),
        }
    }

    pub fn raw(path: &str, body: &str) -> Self {
        Self {
            path: path.to_string(),
            status: 200,
            body: body.to_string(),
        }
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        _ => "Internal Server Error",
    }
}

async fn read_request_path(socket: &mut TcpStream) -> String {
    let mut buf = vec![0u8; 8192];
    let mut read = 0;
    while read < buf.len() {
        let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        read += n;
        if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf[..read])
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string()
}

/// Start the server on an ephemeral port and return its base URL.
/// Unknown paths answer 404. Runs until the test runtime shuts down.
pub async fn serve(routes: Vec<Route>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let routes = routes.clone();
            tokio::spawn(async move {
                let path = read_request_path(&mut socket).await;
                let (status, body) = routes
                    .iter()
                    .find(|r| r.path == path)
                    .map(|r| (r.status, r.body.clone()))
                    .unwrap_or((404, "{}".to_string()));
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason(status),
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}
