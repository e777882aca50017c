//! Shared utilities for integration testing.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use locket_voucher::chain::{ChainReader, ChainResult};
use locket_voucher::storage::{content_id, ContentPublisher, StorageResult};

/// Start a programmable mock upstream that dispatches on the request path.
pub async fn start_mock_host<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]).to_string();
                        let path = head
                            .lines()
                            .next()
                            .and_then(|line| line.split_whitespace().nth(1))
                            .unwrap_or("/")
                            .to_string();

                        let (status, body) = f(path).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Render a profile page containing one avatar image for `handle`.
pub fn profile_page(handle: &str) -> String {
    format!(
        concat!(
            r#"<html><body>"#,
            r#"<img alt="banner" src="https://cdn.example/banner.png"/>"#,
            r#"<img alt="avatar" src="https://pbs.twimg.com/profile_images/99/{handle}_normal.jpg"/>"#,
            r#"</body></html>"#
        ),
        handle = handle
    )
}

/// Chain stub with a fixed activity count and a mutable balance.
pub struct StubChain {
    pub activity: u64,
    pub balance: Mutex<U256>,
}

impl StubChain {
    pub fn new(activity: u64, balance: U256) -> Self {
        Self {
            activity,
            balance: Mutex::new(balance),
        }
    }

    pub fn set_balance(&self, balance: U256) {
        *self.balance.lock().unwrap() = balance;
    }
}

#[async_trait]
impl ChainReader for StubChain {
    async fn activity_count(&self, _address: Address) -> ChainResult<u64> {
        Ok(self.activity)
    }

    async fn token_balance(&self, _contract: Address, _owner: Address) -> ChainResult<U256> {
        Ok(*self.balance.lock().unwrap())
    }
}

/// Publisher stub that records uploads and addresses them like the real one.
pub struct RecordingPublisher {
    pub publish_calls: AtomicUsize,
    pub published: Mutex<Vec<(Vec<u8>, String)>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self {
            publish_calls: AtomicUsize::new(0),
            published: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ContentPublisher for RecordingPublisher {
    async fn publish(&self, content: &[u8], content_type: &str) -> StorageResult<String> {
        self.publish_calls.fetch_add(1, Ordering::SeqCst);
        self.published
            .lock()
            .unwrap()
            .push((content.to_vec(), content_type.to_string()));
        Ok(format!("ipfs://{}", content_id(content)))
    }
}
