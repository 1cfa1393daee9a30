use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::inpaint::{
    dependencies::InpaintDependencies,
    pipeline::{prepare_mask, run_inpainter},
    types::{InpaintError, InpaintOutcome, InpaintRequest, InpaintStatus},
};

/// Runs inpaint requests off the input thread.
///
/// Requests carry an immutable snapshot of the stroke list, so the editor can
/// keep accepting input while a request is processed.
#[derive(Clone)]
pub struct InpaintManager {
    /// Channel for sending inpaint requests.
    request_tx: mpsc::UnboundedSender<InpaintRequest>,
    /// Shared status of the current request.
    status: Arc<Mutex<InpaintStatus>>,
    /// Outcome of the last request (if any).
    last_result: Arc<Mutex<Option<InpaintOutcome>>>,
}

impl InpaintManager {
    /// Creates a manager and spawns its worker task on `runtime_handle`.
    pub fn new(runtime_handle: &tokio::runtime::Handle, dependencies: InpaintDependencies) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<InpaintRequest>();
        let status = Arc::new(Mutex::new(InpaintStatus::Idle));
        let last_result = Arc::new(Mutex::new(None));

        let status_clone = status.clone();
        let result_clone = last_result.clone();
        let inpainter = dependencies.inpainter.clone();

        runtime_handle.spawn(async move {
            while let Some(request) = request_rx.recv().await {
                log::debug!("Processing inpaint request: {:?}", request);

                *status_clone.lock().await = InpaintStatus::Checking;
                let outcome = match prepare_mask(request).await {
                    Ok((request, mask)) => {
                        *status_clone.lock().await = InpaintStatus::Running;
                        run_inpainter(inpainter.clone(), request, mask).await
                    }
                    Err(err) => Err(err),
                };

                match outcome {
                    Ok(result) => {
                        log::info!(
                            "Inpaint finished ({} marked pixel(s))",
                            result.mask.marked_count()
                        );
                        *status_clone.lock().await = InpaintStatus::Succeeded;
                        *result_clone.lock().await = Some(InpaintOutcome::Success(result));
                    }
                    Err(e) => {
                        let error_message = e.to_string();
                        log::error!("Inpaint failed: {}", error_message);
                        *status_clone.lock().await = InpaintStatus::Failed(error_message.clone());
                        *result_clone.lock().await = Some(InpaintOutcome::Failed(error_message));
                    }
                }
            }
        });

        Self {
            request_tx,
            status,
            last_result,
        }
    }

    /// Queues an inpaint request. Returns immediately.
    pub fn request_inpaint(&self, request: InpaintRequest) -> Result<(), InpaintError> {
        self.request_tx
            .send(request)
            .map_err(|_| InpaintError::ManagerNotRunning)
    }

    pub async fn get_status(&self) -> InpaintStatus {
        self.status.lock().await.clone()
    }

    /// Takes the outcome of the last request, leaving `None` behind.
    pub async fn take_result(&self) -> Option<InpaintOutcome> {
        self.last_result.lock().await.take()
    }

    /// Non-blocking variant of [`take_result`](Self::take_result) for sync callers.
    pub fn try_take_result(&self) -> Option<InpaintOutcome> {
        self.last_result.try_lock().ok().and_then(|mut r| r.take())
    }

    /// Reset status to idle.
    pub async fn reset(&self) {
        *self.status.lock().await = InpaintStatus::Idle;
    }
}

#[cfg(test)]
impl InpaintManager {
    pub(crate) fn with_closed_channel_for_test() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<InpaintRequest>();
        drop(rx);
        Self {
            request_tx: tx,
            status: Arc::new(Mutex::new(InpaintStatus::Idle)),
            last_result: Arc::new(Mutex::new(None)),
        }
    }
}
