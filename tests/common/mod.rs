#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, Response};
use axum::Router;
use collection_api::dispatch::DispatchTable;
use collection_api::{Collection, MethodError};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const ORIGIN: &str = "https://app.example.com";

/// Counts how many times each bound method ran
#[derive(Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// Collection method that records the call and returns `value`
    pub fn method(
        &self,
        collection: Collection,
        verb: Method,
        value: serde_json::Value,
    ) -> Collection {
        let counter = Arc::clone(&self.0);
        collection.method(verb, move |_, _, _| {
            let counter = Arc::clone(&counter);
            let value = value.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, MethodError>(value)
            }
        })
    }
}

pub fn router(collections: Vec<Collection>) -> Router {
    DispatchTable::bind(collections).expect("bind").into_router()
}

pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub async fn send(router: &Router, req: Request<Body>) -> Response<Body> {
    router.clone().oneshot(req).await.expect("response")
}

pub async fn body_text(resp: Response<Body>) -> String {
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

/// Collects formatted log output from a scoped subscriber
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        let writer = self.clone();
        tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish()
    }

    /// Captured lines containing `needle`
    pub fn lines_with(&self, needle: &str) -> Vec<String> {
        let bytes = self.0.lock().expect("log buffer").clone();
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_string)
            .collect()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub base_url: String,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Serve `collections` on an unused local port
    pub async fn spawn(collections: Vec<Collection>) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let listener = TcpListener::bind(addr).await.context("bind test listener")?;

        let table = DispatchTable::bind(collections)?;
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(collection_api::server::serve(
            listener,
            collection_api::server::app(table),
            async move {
                let _ = rx.await;
            },
        ));

        let server = Self {
            addr,
            base_url: format!("http://{}", addr),
            shutdown: Some(tx),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if tokio::net::TcpStream::connect(self.addr).await.is_ok() {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
