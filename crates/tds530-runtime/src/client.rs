//! TCP client for the instrument.

use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use tds530_core::{Command, FrameCodec, Sample, Settings, parse_frame};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::codec::Framed;
use tracing::{debug, trace, warn};

use crate::error::AcquireError;

/// Socket timing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    pub connect_timeout: Duration,
    /// Wait per read before checking again; expiry alone is not an error.
    pub read_timeout: Duration,
    /// Total wait for one reply. `None` waits indefinitely.
    pub response_timeout: Option<Duration>,
}

impl ClientOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            connect_timeout: settings.connect_timeout(),
            read_timeout: settings.read_timeout(),
            response_timeout: None,
        }
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::with_defaults())
    }
}

/// A connected instrument.
pub struct InstrumentClient {
    framed: Framed<TcpStream, FrameCodec>,
    address: String,
    options: ClientOptions,
}

impl InstrumentClient {
    /// Connect to `address` (`host:port`).
    pub async fn connect(address: &str, options: ClientOptions) -> Result<Self, AcquireError> {
        let stream = timeout(options.connect_timeout, TcpStream::connect(address))
            .await
            .map_err(|_| AcquireError::ConnectTimeout {
                address: address.to_string(),
                timeout_ms: options.connect_timeout.as_millis(),
            })?
            .map_err(|e| AcquireError::Connect {
                address: address.to_string(),
                reason: e.to_string(),
            })?;

        if let Err(e) = stream.set_nodelay(true) {
            warn!(address, "Failed to disable Nagle: {e}");
        }
        debug!(address, peer = ?stream.peer_addr().ok(), "Connected to instrument");

        Ok(Self {
            framed: Framed::new(stream, FrameCodec::new()),
            address: address.to_string(),
            options,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Send `ST` and wait for the raw reply frame.
    pub async fn request_frame(&mut self) -> Result<String, AcquireError> {
        self.framed.send(Command::Status).await?;

        let started = Instant::now();
        loop {
            match timeout(self.options.read_timeout, self.framed.next()).await {
                Err(_) => {
                    if let Some(limit) = self.options.response_timeout {
                        if started.elapsed() >= limit {
                            return Err(AcquireError::ResponseTimeout {
                                timeout_ms: limit.as_millis(),
                            });
                        }
                    }
                    trace!(address = %self.address, "Still waiting for reply");
                }
                Ok(None) => return Err(AcquireError::Disconnected),
                Ok(Some(frame)) => return Ok(frame?),
            }
        }
    }

    /// Send `ST` and parse the reply.
    pub async fn request_sample(&mut self) -> Result<Sample, AcquireError> {
        let frame = self.request_frame().await?;
        Ok(parse_frame(&frame)?)
    }
}

impl std::fmt::Debug for InstrumentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstrumentClient")
            .field("address", &self.address)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeInstrument, Reply, frame};

    fn fast_options() -> ClientOptions {
        ClientOptions {
            connect_timeout: Duration::from_secs(2),
            read_timeout: Duration::from_millis(20),
            response_timeout: Some(Duration::from_millis(300)),
        }
    }

    #[tokio::test]
    async fn test_request_sample_parses_reply() {
        let fake = FakeInstrument::repeating(frame("2024/03/09 07:05:01", &["+1.0E+00", "-OVER"]))
            .await
            .unwrap();
        let mut client = InstrumentClient::connect(&fake.address(), fast_options())
            .await
            .unwrap();

        let sample = client.request_sample().await.unwrap();
        assert_eq!(sample.time_string(), "2024/03/09 07:05:01");
        assert_eq!(sample.values(), vec![Some(1.0), None]);

        client.request_sample().await.unwrap();
        assert_eq!(fake.requests(), 2);
    }

    #[tokio::test]
    async fn test_reply_split_over_writes_is_reassembled() {
        let full = frame("2024/03/09 07:05:01", &["1.5", "2.5"]);
        let (a, b) = full.split_at(17);
        let fake = FakeInstrument::start(vec![Reply::Chunked(vec![a.to_string(), b.to_string()])])
            .await
            .unwrap();
        let mut client = InstrumentClient::connect(&fake.address(), fast_options())
            .await
            .unwrap();

        let sample = client.request_sample().await.unwrap();
        assert_eq!(sample.values(), vec![Some(1.5), Some(2.5)]);
    }

    #[tokio::test]
    async fn test_slow_reply_outlives_read_timeout() {
        // Each chunk arrives after the 20 ms read timeout has expired at least once
        let full = frame("2024/03/09 07:05:01", &["7"]);
        let chunks = full.chars().map(|c| c.to_string()).collect();
        let fake = FakeInstrument::start(vec![Reply::Chunked(chunks)]).await.unwrap();
        let mut options = fast_options();
        options.read_timeout = Duration::from_millis(1);
        options.response_timeout = None;

        let mut client = InstrumentClient::connect(&fake.address(), options).await.unwrap();
        let sample = client.request_sample().await.unwrap();
        assert_eq!(sample.values(), vec![Some(7.0)]);
    }

    #[tokio::test]
    async fn test_peer_close_is_disconnected() {
        let fake = FakeInstrument::start(vec![Reply::Disconnect]).await.unwrap();
        let mut client = InstrumentClient::connect(&fake.address(), fast_options())
            .await
            .unwrap();

        let err = client.request_sample().await.unwrap_err();
        assert!(matches!(err, AcquireError::Disconnected));
    }

    #[tokio::test]
    async fn test_silence_hits_response_timeout() {
        let fake = FakeInstrument::with_fallback(Vec::new(), Reply::Silence)
            .await
            .unwrap();
        let mut client = InstrumentClient::connect(&fake.address(), fast_options())
            .await
            .unwrap();

        let err = client.request_sample().await.unwrap_err();
        assert!(matches!(err, AcquireError::ResponseTimeout { timeout_ms: 300 }));
    }

    #[tokio::test]
    async fn test_malformed_reply_is_protocol_error() {
        let fake = FakeInstrument::start(vec![Reply::Frame("garbage\r\nEND       \r\n".into())])
            .await
            .unwrap();
        let mut client = InstrumentClient::connect(&fake.address(), fast_options())
            .await
            .unwrap();

        let err = client.request_sample().await.unwrap_err();
        assert!(matches!(err, AcquireError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_connect_refused() {
        // Bind then drop to get a port with nothing listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let err = InstrumentClient::connect(&format!("127.0.0.1:{port}"), fast_options())
            .await
            .unwrap_err();
        assert!(matches!(err, AcquireError::Connect { .. }));
    }
}
