//! Background task wrapper for [`AcquisitionService`].

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::service::AcquisitionService;
use crate::error::AcquireError;

/// A running acquisition task.
#[derive(Debug)]
pub struct AcquisitionHandle {
    cancel: CancellationToken,
    join: JoinHandle<Result<(), AcquireError>>,
}

/// Spawn `service` on the tokio runtime.
///
/// The task stops when `cancel` (or a parent of it) is cancelled.
pub fn spawn_acquisition(service: AcquisitionService, cancel: CancellationToken) -> AcquisitionHandle {
    let task_cancel = cancel.clone();
    let join = tokio::spawn(async move { service.run(task_cancel).await });
    AcquisitionHandle { cancel, join }
}

impl AcquisitionHandle {
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the task to end on its own.
    pub async fn wait(&mut self) -> Result<(), AcquireError> {
        (&mut self.join)
            .await
            .map_err(|e| AcquireError::Task(e.to_string()))?
    }

    /// Cancel the task and wait for it to finish.
    pub async fn shutdown(mut self) -> Result<(), AcquireError> {
        debug!("Stopping acquisition task");
        self.cancel.cancel();
        self.wait().await
    }
}
