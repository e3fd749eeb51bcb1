use std::sync::Once;

use bytes::Bytes;
use optimizer_core::{
    update, AppState, CompressedImage, Effect, Msg, NoticeKind, Phase, RawFile,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(optimizer_logging::initialize_for_tests);
}

fn png(name: &str) -> RawFile {
    RawFile {
        name: name.to_string(),
        mime: "image/png".to_string(),
        bytes: Bytes::from_static(b"png-payload"),
    }
}

fn drop_file(state: AppState, file: RawFile) -> (AppState, Vec<Effect>) {
    update(state, Msg::FilesDropped(vec![file]))
}

#[test]
fn quality_is_clamped_to_bounds() {
    init_logging();
    let mut state = AppState::new();

    for (input, expected) in [(0, 1), (-5, 1), (1, 1), (80, 80), (100, 100), (101, 100)] {
        let (next, effects) = update(state, Msg::QualityChanged(input));
        assert!(effects.is_empty());
        assert_eq!(next.view().quality, expected, "input {input}");
        state = next;
    }
}

#[test]
fn submit_without_a_file_is_rejected_synchronously() {
    init_logging();
    let state = AppState::new();

    let (state, effects) = update(state, Msg::SubmitClicked);

    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Idle);
    let notice = state.view().notice.expect("notice");
    assert_eq!(notice.kind, NoticeKind::Validation);
    assert_eq!(notice.message, "Please select an image first");
}

#[test]
fn submit_emits_one_compression_effect() {
    init_logging();
    let state = AppState::new();
    let (state, _effects) = drop_file(state, png("photo.png"));
    let (state, _effects) = update(state, Msg::QualityChanged(80));

    let (state, effects) = update(state, Msg::SubmitClicked);

    assert_eq!(
        effects,
        vec![Effect::SubmitCompression {
            job_id: 1,
            file_name: "photo.png".to_string(),
            mime: "image/png".to_string(),
            bytes: Bytes::from_static(b"png-payload"),
            quality: 80,
        }]
    );
    assert_eq!(state.phase(), Phase::Compressing);
    assert!(state.view().busy);
    assert!(state.view().notice.is_none());
}

#[test]
fn submit_while_compressing_is_rejected_not_queued() {
    init_logging();
    let state = AppState::new();
    let (state, _effects) = drop_file(state, png("photo.png"));
    let (state, _effects) = update(state, Msg::SubmitClicked);

    let (state, effects) = update(state, Msg::SubmitClicked);

    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Compressing);
    let notice = state.view().notice.expect("notice");
    assert_eq!(notice.kind, NoticeKind::Validation);
    assert_eq!(notice.message, "A compression is already in progress");

    // The original job is still the current one and settles normally.
    let outcome = Ok(CompressedImage {
        bytes: Bytes::from_static(b"jpeg"),
        content_type: "image/jpeg".to_string(),
    });
    let (state, _effects) = update(state, Msg::JobSettled { job_id: 1, outcome });
    assert_eq!(state.phase(), Phase::Succeeded);
}

#[test]
fn resubmission_uses_the_retained_file_and_a_fresh_job_id() {
    init_logging();
    let state = AppState::new();
    let (state, _effects) = drop_file(state, png("photo.png"));
    let (state, _effects) = update(state, Msg::SubmitClicked);
    let outcome = Ok(CompressedImage {
        bytes: Bytes::from_static(b"jpeg"),
        content_type: "image/jpeg".to_string(),
    });
    let (state, _effects) = update(state, Msg::JobSettled { job_id: 1, outcome });
    assert_eq!(state.phase(), Phase::Succeeded);

    let (state, effects) = update(state, Msg::SubmitClicked);

    assert_eq!(state.phase(), Phase::Compressing);
    match effects.as_slice() {
        [Effect::SubmitCompression { job_id, file_name, .. }] => {
            assert_eq!(*job_id, 2);
            assert_eq!(file_name, "photo.png");
        }
        other => panic!("unexpected effects: {other:?}"),
    }
}

#[test]
fn quality_survives_file_changes_and_resets_with_the_workflow() {
    init_logging();
    let state = AppState::new();
    let (state, _effects) = drop_file(state, png("first.png"));
    let (state, _effects) = update(state, Msg::QualityChanged(80));

    let (state, _effects) = drop_file(state, png("second.png"));
    assert_eq!(state.view().quality, 80);

    let (state, _effects) = update(state, Msg::ResetClicked);
    assert_eq!(state.view().quality, 50);
}
