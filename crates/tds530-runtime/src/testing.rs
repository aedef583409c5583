//! Scripted fake instrument for tests.
//!
//! Listens on a loopback port and answers each `ST` request with the next
//! scripted [`Reply`]. When the script runs out the fallback reply is used.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// What the fake instrument does in response to one request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Send this text as-is.
    Frame(String),
    /// Send the text split into several writes.
    Chunked(Vec<String>),
    /// Do not answer.
    Silence,
    /// Close the connection.
    Disconnect,
}

/// Build a reply frame with channels labelled `M001`, `M002`, ...
pub fn frame(time: &str, values: &[&str]) -> String {
    let mut text = format!("{time}\r\n");
    for (idx, value) in values.iter().enumerate() {
        text.push_str(&format!("M{:03}  {value}\r\n", idx + 1));
    }
    text.push_str("END       \r\n");
    text
}

struct Script {
    replies: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    requests: AtomicUsize,
    connections: AtomicUsize,
}

impl Script {
    fn next(&self) -> Reply {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// A fake TDS530 listening on `127.0.0.1`.
pub struct FakeInstrument {
    addr: SocketAddr,
    script: Arc<Script>,
    task: JoinHandle<()>,
}

impl FakeInstrument {
    /// Start an instrument that plays `replies` and then disconnects.
    pub async fn start(replies: Vec<Reply>) -> std::io::Result<Self> {
        Self::with_fallback(replies, Reply::Disconnect).await
    }

    /// Start an instrument that answers every request with `frame`.
    pub async fn repeating(frame: String) -> std::io::Result<Self> {
        Self::with_fallback(Vec::new(), Reply::Frame(frame)).await
    }

    pub async fn with_fallback(replies: Vec<Reply>, fallback: Reply) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let script = Arc::new(Script {
            replies: Mutex::new(replies.into()),
            fallback,
            requests: AtomicUsize::new(0),
            connections: AtomicUsize::new(0),
        });

        let task = tokio::spawn({
            let script = Arc::clone(&script);
            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    script.connections.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(serve_connection(stream, Arc::clone(&script)));
                }
            }
        });

        Ok(Self { addr, script, task })
    }

    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `host:port` string for settings and clients.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    /// Number of `ST` requests received so far.
    pub fn requests(&self) -> usize {
        self.script.requests.load(Ordering::SeqCst)
    }

    /// Number of accepted connections so far.
    pub fn connections(&self) -> usize {
        self.script.connections.load(Ordering::SeqCst)
    }
}

impl Drop for FakeInstrument {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve_connection(stream: TcpStream, script: Arc<Script>) {
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim() != "ST" {
            continue;
        }
        script.requests.fetch_add(1, Ordering::SeqCst);

        match script.next() {
            Reply::Frame(text) => {
                if write.write_all(text.as_bytes()).await.is_err() {
                    return;
                }
            }
            Reply::Chunked(chunks) => {
                for chunk in chunks {
                    if write.write_all(chunk.as_bytes()).await.is_err() {
                        return;
                    }
                    let _ = write.flush().await;
                    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                }
            }
            Reply::Silence => {}
            Reply::Disconnect => return,
        }
    }
}
