//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use handler_echo::config::ServerConfig;
use handler_echo::http::HttpServer;
use handler_echo::lifecycle::Shutdown;
use handler_echo::net::Listener;
use handler_echo::render::Renderer;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// A server running on an ephemeral loopback port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

/// Start a server with `config`, overriding its bind address.
pub async fn start_server(config: ServerConfig) -> TestServer {
    let server = HttpServer::new(config).unwrap();
    spawn(server).await
}

/// Start a server with a custom renderer.
#[allow(dead_code)]
pub async fn start_server_with(renderer: Arc<dyn Renderer>) -> TestServer {
    let server = HttpServer::with_renderer(ServerConfig::default(), renderer);
    spawn(server).await
}

async fn spawn(server: HttpServer) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(Listener::from(listener), rx).await;
    });

    TestServer { addr, shutdown }
}

/// Write `raw`, half-close, and read the reply until the server closes.
pub async fn send_raw(addr: SocketAddr, raw: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();
    stream.shutdown().await.unwrap();
    read_reply(stream).await
}

/// Read until the server closes the connection.
pub async fn read_reply(mut stream: TcpStream) -> String {
    let mut reply = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut reply))
        .await
        .expect("server did not close the connection")
        .unwrap();
    String::from_utf8_lossy(&reply).into_owned()
}

/// Split a raw response at the blank line.
#[allow(dead_code)]
pub fn split_response(response: &str) -> (&str, &str) {
    response.split_once("\r\n\r\n").unwrap_or((response, ""))
}
