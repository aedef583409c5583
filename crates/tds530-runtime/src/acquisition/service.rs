//! Acquisition loop: connect, poll, store, reconnect.

use std::sync::Arc;
use std::time::Duration;

use tds530_core::{AcquisitionEvent, AcquisitionEventEmitter, SampleSink, Settings};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::client::{ClientOptions, InstrumentClient};
use crate::error::AcquireError;

/// Acquisition loop configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionConfig {
    /// Instrument `host:port`.
    pub address: String,
    pub client: ClientOptions,
    /// Pause between a reply and the next request.
    pub poll_interval: Duration,
    /// Reconnect after recoverable errors instead of returning them.
    pub reconnect: bool,
    pub reconnect_delay: Duration,
}

impl AcquisitionConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            address: settings.instrument_address(),
            client: ClientOptions::from_settings(settings),
            poll_interval: settings.poll_interval(),
            reconnect: settings.effective_reconnect(),
            reconnect_delay: settings.reconnect_delay(),
        }
    }
}

/// Polls the instrument and hands every sample to a sink.
pub struct AcquisitionService {
    config: AcquisitionConfig,
    sink: Arc<dyn SampleSink>,
    emitter: Arc<dyn AcquisitionEventEmitter>,
}

impl AcquisitionService {
    pub fn new(
        config: AcquisitionConfig,
        sink: Arc<dyn SampleSink>,
        emitter: Arc<dyn AcquisitionEventEmitter>,
    ) -> Self {
        Self {
            config,
            sink,
            emitter,
        }
    }

    pub const fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    /// Run until cancelled or until an error that cannot be retried.
    ///
    /// Emits `Stopped` on cancellation and `Error` when returning an error.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), AcquireError> {
        let result = self.run_until_cancelled(&cancel).await;
        match &result {
            Ok(()) => {
                info!(address = %self.config.address, "Acquisition stopped");
                self.emitter.emit(AcquisitionEvent::Stopped);
            }
            Err(e) => {
                error!(address = %self.config.address, "Acquisition failed: {e}");
                self.emitter.emit(AcquisitionEvent::error(e.to_string()));
            }
        }
        result
    }

    async fn run_until_cancelled(&self, cancel: &CancellationToken) -> Result<(), AcquireError> {
        let address = &self.config.address;
        loop {
            info!(address = %address, "Connecting to instrument");
            self.emitter.emit(AcquisitionEvent::connecting(address.clone()));

            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => return Ok(()),
                outcome = self.session() => outcome,
            };

            let Err(e) = outcome;
            if !e.is_recoverable() {
                return Err(e);
            }

            warn!(address = %address, "Lost instrument: {e}");
            self.emitter.emit(AcquisitionEvent::disconnected(e.to_string()));
            if !self.config.reconnect {
                return Err(e);
            }

            debug!(delay_ms = self.config.reconnect_delay.as_millis(), "Waiting before reconnect");
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Ok(()),
                () = tokio::time::sleep(self.config.reconnect_delay) => {}
            }
        }
    }

    /// One connection: poll until something fails.
    async fn session(&self) -> Result<std::convert::Infallible, AcquireError> {
        let mut client = InstrumentClient::connect(&self.config.address, self.config.client).await?;
        info!(address = %self.config.address, "Connected to instrument");
        self.emitter
            .emit(AcquisitionEvent::connected(self.config.address.clone()));

        loop {
            let sample = client.request_sample().await?;
            self.sink.record(&sample)?;
            debug!(
                time = %sample.time_string(),
                channels = sample.channel_count(),
                "Sample received"
            );
            self.emitter.emit(AcquisitionEvent::sample(&sample));

            if !self.config.poll_interval.is_zero() {
                tokio::time::sleep(self.config.poll_interval).await;
            }
        }
    }
}

impl std::fmt::Debug for AcquisitionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcquisitionService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
