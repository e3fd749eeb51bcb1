use optimizer_logging::optimizer_debug;

use crate::{intake, AppState, Effect, Msg, Notice, Phase, Quality};

/// Shown when submission is attempted with no file selected.
const NO_FILE_MESSAGE: &str = "Please select an image first";
/// Shown when submission is attempted while a request is already in flight.
const BUSY_MESSAGE: &str = "A compression is already in progress";

/// Pure update function: applies a message to state and returns any effects.
///
/// Events are processed one at a time, so every transition is atomic with
/// respect to the others; the only suspension point is between the emitted
/// [`Effect::SubmitCompression`] and the matching [`Msg::JobSettled`].
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesDropped(files) => {
            match intake::accept(files, state.ledger_mut()) {
                Ok(intake) => state.replace_file(intake),
                Err(err) => state.set_notice(Notice::validation(err.to_string())),
            }
            Vec::new()
        }
        Msg::PreviewRendered => {
            state.preview_rendered();
            Vec::new()
        }
        Msg::QualityChanged(value) => {
            state.set_quality(Quality::clamped(value));
            Vec::new()
        }
        Msg::SubmitClicked => {
            if state.phase() == Phase::Compressing {
                // One job at a time: rejected, not queued.
                state.set_notice(Notice::validation(BUSY_MESSAGE));
                return (state, Vec::new());
            }
            let Some(file) = state.file() else {
                state.set_notice(Notice::validation(NO_FILE_MESSAGE));
                return (state, Vec::new());
            };
            let (file_name, mime, bytes) =
                (file.name.clone(), file.mime.clone(), file.bytes.clone());
            let quality = state.quality().get();
            let job_id = state.start_job();
            vec![Effect::SubmitCompression {
                job_id,
                file_name,
                mime,
                bytes,
                quality,
            }]
        }
        Msg::JobSettled { job_id, outcome } => {
            if !state.is_current_job(job_id) {
                // Stale settlement of an abandoned job: dropped without any
                // state or ledger mutation, and never surfaced.
                optimizer_debug!("discarding stale outcome for job {}", job_id);
                return (state, Vec::new());
            }
            match outcome {
                Ok(image) => state.complete_job(image),
                Err(failure) => state.fail_job(failure),
            }
            Vec::new()
        }
        Msg::NoticeDismissed => {
            state.dismiss_notice();
            Vec::new()
        }
        Msg::ResetClicked => {
            state.reset();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
