use std::sync::{mpsc, Arc};
use std::thread;

use optimizer_core::{CompressedImage, CompressionFailure, Effect, FailureKind, Msg};
use optimizer_engine::{
    self as engine, ClientSettings, CompressRequest, EngineEvent, EngineHandle, ReqwestCompressor,
};
use optimizer_logging::optimizer_info;

/// Executes core effects against the transport and feeds settlements back
/// into the message loop.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings, msg_tx: mpsc::Sender<Msg>) -> Self {
        let compressor = Arc::new(ReqwestCompressor::new(settings));
        let (engine, event_rx) = EngineHandle::new(compressor);
        spawn_event_loop(event_rx, msg_tx);
        Self { engine }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitCompression {
                    job_id,
                    file_name,
                    mime,
                    bytes,
                    quality,
                } => {
                    optimizer_info!(
                        "submitting job {} ({}, {} bytes, quality {})",
                        job_id,
                        file_name,
                        bytes.len(),
                        quality
                    );
                    self.engine.submit(
                        job_id,
                        CompressRequest {
                            file_name,
                            mime,
                            bytes,
                            quality,
                        },
                    );
                }
            }
        }
    }
}

fn spawn_event_loop(event_rx: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            let EngineEvent::JobSettled { job_id, result } = event;
            let outcome = result.map(map_image).map_err(map_failure);
            if msg_tx.send(Msg::JobSettled { job_id, outcome }).is_err() {
                break;
            }
        }
    });
}

fn map_image(image: engine::CompressedImage) -> CompressedImage {
    CompressedImage {
        bytes: image.bytes,
        content_type: image.content_type,
    }
}

fn map_failure(err: engine::CompressError) -> CompressionFailure {
    let kind = match err.kind {
        engine::FailureKind::Network => FailureKind::Network,
        engine::FailureKind::Server { status } => FailureKind::Server { status },
        engine::FailureKind::MalformedResponse => FailureKind::MalformedResponse,
    };
    CompressionFailure {
        kind,
        message: err.message,
    }
}
