use std::sync::{mpsc, Arc};
use std::thread;

use crate::client::{CompressRequest, Compressor};
use crate::{EngineEvent, JobId};

enum EngineCommand {
    Submit { job_id: JobId, request: CompressRequest },
}

/// Bridge between the synchronous host loop and the async transport.
///
/// Commands cross an mpsc channel into a dedicated thread that owns a tokio
/// runtime; each submission runs to completion as its own task and settles
/// back over the event channel. Nothing here cancels an in-flight request:
/// abandoning a job is the core's business, which discards the settlement
/// by job id.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(compressor: Arc<dyn Compressor>) -> (Self, mpsc::Receiver<EngineEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let compressor = compressor.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(compressor.as_ref(), command, event_tx).await;
                });
            }
        });

        (Self { cmd_tx }, event_rx)
    }

    pub fn submit(&self, job_id: JobId, request: CompressRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Submit { job_id, request });
    }
}

async fn handle_command(
    compressor: &dyn Compressor,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Submit { job_id, request } => {
            let result = compressor.compress(job_id, request).await;
            let _ = event_tx.send(EngineEvent::JobSettled { job_id, result });
        }
    }
}
