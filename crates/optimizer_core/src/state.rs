use std::time::Instant;

use optimizer_logging::optimizer_debug;

use crate::intake::{Intake, UploadedFile};
use crate::ledger::ResourceLedger;
use crate::outcome::{CompressedImage, CompressionFailure, JobId};
use crate::view_model::{FileView, ResultView, WorkflowView};
use crate::HandleId;

/// Filename suggested to the operator for the downloaded result.
pub const SUGGESTED_RESULT_FILENAME: &str = "compressed-image.jpg";

pub const QUALITY_MIN: u8 = 1;
pub const QUALITY_MAX: u8 = 100;
pub const QUALITY_DEFAULT: u8 = 50;

/// JPEG quality parameter, always within [1, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    /// Builds a quality value, clamping to the nearest bound.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(i64::from(QUALITY_MIN), i64::from(QUALITY_MAX)) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(QUALITY_DEFAULT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    FileSelected,
    Compressing,
    Succeeded,
    /// The request failed; the file stays selected so the operator can
    /// adjust quality and resubmit without re-choosing it.
    Failed,
}

/// The one in-flight compression request. At most one exists at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionJob {
    pub id: JobId,
    pub quality: Quality,
    pub started: Instant,
}

/// The settled result blob, owned until superseded or the file changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionResult {
    pub handle: HandleId,
    pub suggested_filename: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Recoverable operator mistake; never fatal.
    Validation,
    /// Non-fatal intake warning the UI may ignore.
    Warning,
    /// A compression request settled with a failure.
    Failure,
}

/// A dismissible message for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Validation,
            message: message.into(),
        }
    }

    pub(crate) fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            message: message.into(),
        }
    }

    pub(crate) fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.into(),
        }
    }
}

/// All workflow entities, owned in one place.
///
/// Mutated exclusively through [`crate::update`]; the host reads it via
/// [`AppState::view`] and the accessors below.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    phase: Phase,
    file: Option<UploadedFile>,
    quality: Quality,
    job: Option<CompressionJob>,
    result: Option<CompressionResult>,
    notice: Option<Notice>,
    ledger: ResourceLedger,
    // Monotonic across resets so a settlement from before a reset can never
    // match a job created after it.
    next_job_id: JobId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> WorkflowView {
        WorkflowView {
            phase: self.phase,
            file: self.file.as_ref().map(|file| FileView {
                name: file.name.clone(),
                size_bytes: file.size_bytes,
                mime: file.mime.clone(),
                preview: file.preview,
            }),
            quality: self.quality.get(),
            result: self.result.as_ref().map(|result| ResultView {
                handle: result.handle,
                suggested_filename: result.suggested_filename.clone(),
                size_bytes: self
                    .ledger
                    .resolve(result.handle)
                    .map(|bytes| bytes.len() as u64)
                    .unwrap_or(0),
            }),
            notice: self.notice.clone(),
            busy: self.phase == Phase::Compressing,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut ResourceLedger {
        &mut self.ledger
    }

    /// Stores a validated intake, superseding any previous file.
    ///
    /// Releases the old preview handle (if still live) and any prior result,
    /// and abandons an in-flight job so its eventual outcome is stale.
    pub(crate) fn replace_file(&mut self, intake: Intake) {
        if let Some(old) = self.file.take() {
            if let Some(preview) = old.preview {
                self.ledger.release(preview);
            }
        }
        if let Some(previous) = self.result.take() {
            self.ledger.release(previous.handle);
        }
        if let Some(job) = self.job.take() {
            optimizer_debug!("abandoning job {} after new file selection", job.id);
        }
        self.notice = intake
            .warning
            .map(|warning| Notice::warning(warning.to_string()));
        self.file = Some(intake.file);
        self.phase = Phase::FileSelected;
        self.dirty = true;
    }

    /// Releases the preview handle after its first successful render.
    /// A repeat render is a no-op; the handle is only released once.
    pub(crate) fn preview_rendered(&mut self) {
        if let Some(file) = self.file.as_mut() {
            if let Some(preview) = file.preview.take() {
                self.ledger.release(preview);
                self.dirty = true;
            }
        }
    }

    pub(crate) fn set_quality(&mut self, quality: Quality) {
        if self.quality != quality {
            self.quality = quality;
            self.dirty = true;
        }
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.dirty = true;
    }

    pub(crate) fn dismiss_notice(&mut self) {
        if self.notice.take().is_some() {
            self.dirty = true;
        }
    }

    pub(crate) fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    /// Allocates the next job id and records the in-flight job.
    pub(crate) fn start_job(&mut self) -> JobId {
        self.next_job_id += 1;
        let id = self.next_job_id;
        self.job = Some(CompressionJob {
            id,
            quality: self.quality,
            started: Instant::now(),
        });
        self.phase = Phase::Compressing;
        self.notice = None;
        self.dirty = true;
        id
    }

    pub(crate) fn is_current_job(&self, job_id: JobId) -> bool {
        self.job.as_ref().is_some_and(|job| job.id == job_id)
    }

    /// Settles the current job with a result blob.
    pub(crate) fn complete_job(&mut self, image: CompressedImage) {
        self.job = None;
        if let Some(previous) = self.result.take() {
            self.ledger.release(previous.handle);
        }
        let handle = self.ledger.acquire(image.bytes);
        self.result = Some(CompressionResult {
            handle,
            suggested_filename: SUGGESTED_RESULT_FILENAME.to_string(),
        });
        self.phase = Phase::Succeeded;
        self.notice = None;
        self.dirty = true;
    }

    /// Settles the current job with a failure. The file stays selected.
    pub(crate) fn fail_job(&mut self, failure: CompressionFailure) {
        self.job = None;
        self.phase = Phase::Failed;
        self.notice = Some(Notice::failure(failure.message));
        self.dirty = true;
    }

    /// Full teardown: releases every handle and clears all entities.
    /// Idempotent; a second reset from a pristine Idle state is a no-op.
    pub(crate) fn reset(&mut self) {
        let pristine = self.phase == Phase::Idle
            && self.file.is_none()
            && self.job.is_none()
            && self.result.is_none()
            && self.notice.is_none()
            && self.quality == Quality::default()
            && self.ledger.live_count() == 0;
        if pristine {
            return;
        }
        self.ledger.release_all();
        self.file = None;
        self.job = None;
        self.result = None;
        self.notice = None;
        self.quality = Quality::default();
        self.phase = Phase::Idle;
        self.dirty = true;
    }
}
