use crate::{CompressedImage, CompressionFailure, JobId, RawFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The gesture source yielded accepted files (drop or picker).
    FilesDropped(Vec<RawFile>),
    /// The preview thumbnail rendered successfully for the first time.
    PreviewRendered,
    /// Operator moved the quality control. Clamped to [1, 100].
    QualityChanged(i64),
    /// Operator requested compression of the selected file.
    SubmitClicked,
    /// The transport settled a compression job.
    JobSettled {
        job_id: JobId,
        outcome: Result<CompressedImage, CompressionFailure>,
    },
    /// Operator dismissed the current notice.
    NoticeDismissed,
    /// Operator requested a full workflow reset.
    ResetClicked,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
