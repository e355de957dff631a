//! Shared utilities for integration testing.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use upload_service::{HttpServer, ServiceConfig, Shutdown};

/// Start the service on an ephemeral port.
///
/// The returned [`Shutdown`] must be kept alive for the lifetime of the test;
/// dropping it stops the server.
pub async fn spawn_service(config: ServiceConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config);

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Multipart part of `size` filler bytes, named like an uploaded file.
#[allow(dead_code)]
pub fn file_part(name: &'static str, size: usize) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(vec![b'a'; size]).file_name(name)
}

#[allow(dead_code)]
pub fn upload_url(addr: SocketAddr) -> String {
    format!("http://{addr}/multipartfileuploads")
}
