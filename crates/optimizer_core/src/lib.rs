//! Optimizer core: pure upload-and-compression workflow state machine.
mod effect;
mod intake;
mod ledger;
mod msg;
mod outcome;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use intake::{
    accept, DropSignal, Intake, IntakeError, RawFile, UploadedFile, ALLOWED_MIME_TYPES,
};
pub use ledger::{HandleId, ResourceLedger};
pub use msg::Msg;
pub use outcome::{CompressedImage, CompressionFailure, FailureKind, JobId};
pub use state::{
    AppState, CompressionJob, CompressionResult, Notice, NoticeKind, Phase, Quality,
    QUALITY_DEFAULT, QUALITY_MAX, QUALITY_MIN, SUGGESTED_RESULT_FILENAME,
};
pub use update::update;
pub use view_model::{FileView, ResultView, WorkflowView};
