//! Run command handler: acquisition plus web server.
//!
//! This is the composition root of the long-running mode. The acquisition
//! loop feeds the HTTP stores, an optional TSV recorder and the SSE stream.

use std::sync::Arc;

use tds530_axum::{AxumContext, ServerConfig, serve};
use tds530_core::{
    AcquisitionEventEmitter, EmitterFanout, SampleSink, Settings, SinkFanout,
    normalize_output_path, resolve_www_dir,
};
use tds530_runtime::{AcquisitionConfig, AcquisitionService, TsvRecorder, spawn_acquisition};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::CliError;
use crate::utils::browser;

/// Execute the run command until Ctrl+C or a fatal acquisition error.
pub async fn execute(settings: Settings, open: bool) -> Result<(), CliError> {
    let shutdown = CancellationToken::new();
    let ctx = AxumContext::new(shutdown.child_token());

    let sink: Arc<dyn SampleSink> = Arc::new(build_sink(&settings, &ctx)?);
    let emitter: Arc<dyn AcquisitionEventEmitter> = Arc::new(
        EmitterFanout::new()
            .with(ctx.status.clone())
            .with(ctx.sse.clone()),
    );

    let mut server_config = ServerConfig::from_settings(&settings);
    match resolve_www_dir(settings.www_dir.as_deref())? {
        Some(www) => {
            info!(
                target: "tds530::startup",
                path = %www.path.display(),
                source = ?www.source,
                "Web UI directory"
            );
            server_config = server_config.with_static_dir(www.path);
        }
        None => warn!("No web UI directory found, serving the API only"),
    }

    let bind = server_config.bind_address();
    let listener = TcpListener::bind(&bind)
        .await
        .map_err(|e| CliError::Io(format!("Failed to bind {bind}: {e}")))?;
    let url = browser::local_url(listener.local_addr()?);
    println!("TDS530Logger web UI: {url}");

    let server = tokio::spawn(serve(listener, server_config, ctx));

    let service = AcquisitionService::new(AcquisitionConfig::from_settings(&settings), sink, emitter);
    let mut acquisition = spawn_acquisition(service, shutdown.child_token());

    if open {
        if let Err(e) = browser::open(&url) {
            warn!("Failed to open browser: {e:#}");
        }
    }

    let result = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!("Failed to listen for Ctrl+C: {e}");
            }
            info!("Shutting down");
            shutdown.cancel();
            acquisition.wait().await
        }
        result = acquisition.wait() => {
            shutdown.cancel();
            result
        }
    };

    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Web server error: {e:#}"),
        Err(e) => warn!("Web server task failed: {e}"),
    }

    result.map_err(CliError::from)
}

/// Latest-sample store, then the TSV recorder when an output file is set.
fn build_sink(settings: &Settings, ctx: &AxumContext) -> Result<SinkFanout, CliError> {
    // The HTTP store sees a sample before the file does
    let mut fanout = SinkFanout::new().with(ctx.latest.clone());

    if let Some(raw) = settings.output_path.as_deref() {
        let path = normalize_output_path(raw)?;
        let recorder = TsvRecorder::new(path).map_err(|e| CliError::Io(e.to_string()))?;
        fanout.push(Arc::new(recorder));
    } else {
        info!("No output file, samples are not recorded");
    }

    Ok(fanout)
}
