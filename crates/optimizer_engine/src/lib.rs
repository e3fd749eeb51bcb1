//! Optimizer engine: transport to the remote compression service.
mod client;
mod engine;
mod types;

pub use client::{ClientSettings, CompressRequest, Compressor, ReqwestCompressor};
pub use engine::EngineHandle;
pub use types::{CompressError, CompressedImage, EngineEvent, FailureKind, JobId};
