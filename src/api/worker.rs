use super::{ApiError, ApiReply, ApiRequest, Dispatch, RequestId, TaskApi};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use tracing::{debug, info, warn};

struct Envelope {
    id: RequestId,
    request: ApiRequest,
}

/// Runs backend calls on a background thread so the UI loop never blocks.
/// Requests execute in the order they were sent. Call `poll()` each tick to
/// collect finished replies. Dropping the worker stops the thread once its
/// current request returns.
pub struct ApiWorker {
    tx: Sender<Envelope>,
    rx: Receiver<ApiReply>,
}

impl ApiWorker {
    pub fn spawn<A>(api: A) -> std::io::Result<Self>
    where
        A: TaskApi + Send + 'static,
    {
        let (tx, request_rx) = mpsc::channel::<Envelope>();
        let (reply_tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("planner-api".to_string())
            .spawn(move || {
                for Envelope { id, request } in request_rx {
                    let action = request.action();
                    let result = request.execute(&api);
                    match &result {
                        Ok(_) => info!(request = %id, action, "request succeeded"),
                        Err(e) => warn!(request = %id, action, error = %e, "request failed"),
                    }
                    if reply_tx.send(ApiReply { id, result }).is_err() {
                        break;
                    }
                }
                debug!("api worker exiting");
            })?;

        Ok(Self { tx, rx })
    }
}

impl Dispatch for ApiWorker {
    fn send(&mut self, request: ApiRequest) -> Result<RequestId, ApiError> {
        let id = RequestId::new();
        info!(request = %id, action = request.action(), "issuing request");
        self.tx
            .send(Envelope { id, request })
            .map_err(|_| ApiError::Disconnected)?;
        Ok(id)
    }

    /// Non-blocking drain of finished replies (may be empty)
    fn poll(&mut self) -> Vec<ApiReply> {
        let mut replies = Vec::new();
        while let Ok(reply) = self.rx.try_recv() {
            replies.push(reply);
        }
        replies
    }
}
