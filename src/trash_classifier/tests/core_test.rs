use crate::config::Config;
use crate::frame::{ChannelOrder, Frame};
use crate::frame_source::{StartOutcome, StopOutcome};
use crate::image_classifier::pipeline::Prediction;
use crate::labels::LabelSet;
use crate::trash_classifier::core::{
    init, transition, Effect, Event, Session, Severity, Snapshot, State, NO_FEED_MESSAGE,
};
use crate::trash_classifier::tests::fixture::LABELS;
use std::path::PathBuf;
use std::sync::Arc;

fn labels() -> LabelSet {
    LabelSet::parse(LABELS).unwrap()
}

fn frame() -> Arc<Frame> {
    Arc::new(Frame::solid(8, 8, [1, 2, 3], ChannelOrder::Bgr))
}

fn prediction(label_index: usize) -> Prediction {
    Prediction {
        label_index,
        argmax_index: label_index,
        confidence: 0.6,
        confidences: vec![0.1, 0.2, 0.6, 0.1],
        below_threshold: false,
    }
}

fn step(state: State, event: Event) -> (State, Vec<Effect>) {
    transition(&Config::default(), &labels(), state, event)
}

fn live() -> State {
    let (state, _) = step(init().0, Event::StartCaptureRequested);
    let (state, _) = step(state, Event::CameraStartDone(Ok(StartOutcome::Started)));
    state
}

fn with_snapshot(state: State) -> State {
    State {
        snapshot: Some(Snapshot {
            frame: frame(),
            prediction: prediction(2),
        }),
        ..state
    }
}

#[test]
fn test_init() {
    let (state, effects) = init();

    assert_eq!(state.session, Session::Stopped);
    assert!(state.snapshot.is_none());
    assert!(effects.is_empty());
}

#[test]
fn test_start_flow() {
    let (state, effects) = step(init().0, Event::StartCaptureRequested);
    assert_eq!(state.session, Session::Starting);
    assert_eq!(effects, vec![Effect::StartCamera]);

    let (state, effects) = step(state, Event::CameraStartDone(Ok(StartOutcome::Started)));
    assert_eq!(state.session, Session::Live);
    assert_eq!(effects, vec![Effect::CaptureFrame]);
}

#[test]
fn test_start_while_live_only_warns() {
    let (state, effects) = step(live(), Event::StartCaptureRequested);

    assert_eq!(state.session, Session::Live);
    assert!(effects.is_empty());
    assert_eq!(state.status.unwrap().severity, Severity::Warning);
}

#[test]
fn test_camera_open_failure_returns_to_stopped() {
    let (state, _) = step(init().0, Event::StartCaptureRequested);

    let (state, effects) = step(state, Event::CameraStartDone(Err("no device".into())));

    assert_eq!(state.session, Session::Stopped);
    assert!(effects.is_empty());
    let status = state.status.unwrap();
    assert_eq!(status.severity, Severity::Error);
    assert!(status.text.contains("no device"));
}

#[test]
fn test_stop_when_stopped_is_a_no_op() {
    let (before, _) = init();

    let (after, effects) = step(before.clone(), Event::StopCaptureRequested);

    assert_eq!(after, before);
    assert!(effects.is_empty());
}

#[test]
fn test_stop_cancels_tick_and_releases_camera() {
    let (state, effects) = step(with_snapshot(live()), Event::StopCaptureRequested);

    assert_eq!(state.session, Session::Stopped);
    assert!(state.snapshot.is_none());
    assert_eq!(effects, vec![Effect::CancelTick, Effect::StopCamera]);

    let (state, effects) = step(state, Event::CameraStopDone(Ok(StopOutcome::Stopped)));
    assert_eq!(state.session, Session::Stopped);
    assert!(effects.is_empty());
}

#[test]
fn test_captured_frame_is_classified() {
    let (state, effects) = step(
        live(),
        Event::FrameCaptureDone(Ok(Some(Frame::solid(4, 4, [0, 0, 0], ChannelOrder::Bgr)))),
    );

    assert_eq!(state.session, Session::Live);
    assert!(matches!(effects.as_slice(), [Effect::Classify(_)]));
}

#[test]
fn test_missing_frame_clears_prediction_and_retries() {
    let config = Config::default();

    let (state, effects) = step(with_snapshot(live()), Event::FrameCaptureDone(Ok(None)));

    assert!(state.snapshot.is_none());
    assert_eq!(state.status.unwrap().text, NO_FEED_MESSAGE);
    assert_eq!(effects, vec![Effect::ScheduleTick(config.capture_interval)]);
}

#[test]
fn test_live_classification_rearms_tick() {
    let config = Config::default();

    let (state, effects) = step(
        live(),
        Event::ClassifyDone {
            frame: frame(),
            result: Ok(prediction(1)),
        },
    );

    assert_eq!(state.snapshot.unwrap().prediction.label_index, 1);
    assert_eq!(effects, vec![Effect::ScheduleTick(config.capture_interval)]);
}

#[test]
fn test_failed_classification_still_rearms_tick() {
    let (state, effects) = step(
        live(),
        Event::ClassifyDone {
            frame: frame(),
            result: Err("bad tensor".into()),
        },
    );

    assert_eq!(state.status.unwrap().severity, Severity::Error);
    assert!(matches!(effects.as_slice(), [Effect::ScheduleTick(_)]));
}

#[test]
fn test_still_classification_does_not_schedule() {
    let (state, effects) = step(
        init().0,
        Event::ClassifyDone {
            frame: frame(),
            result: Ok(prediction(0)),
        },
    );

    assert!(state.snapshot.is_some());
    assert!(effects.is_empty());
}

#[test]
fn test_open_image_while_live_is_rejected() {
    let (state, effects) = step(live(), Event::OpenImageRequested(PathBuf::from("can.jpg")));

    assert!(effects.is_empty());
    assert_eq!(state.status.unwrap().text, "Stop webcam first!");
}

#[test]
fn test_open_image_when_stopped_loads_it() {
    let (_, effects) = step(init().0, Event::OpenImageRequested(PathBuf::from("can.jpg")));

    assert_eq!(effects, vec![Effect::LoadStill(PathBuf::from("can.jpg"))]);
}

#[test]
fn test_tick_after_stop_is_ignored() {
    let (state, _) = step(live(), Event::StopCaptureRequested);

    let (_, effects) = step(state, Event::Tick);

    assert!(effects.is_empty());
}

#[test]
fn test_confirm_without_prediction_warns() {
    let (state, effects) = step(init().0, Event::ConfirmRequested);

    assert!(effects.is_empty());
    assert_eq!(state.status.unwrap().severity, Severity::Warning);
}

#[test]
fn test_confirm_uses_reported_label() {
    let state = with_snapshot(init().0);
    let expected_frame = state.snapshot.as_ref().unwrap().frame.clone();

    let (_, effects) = step(state, Event::ConfirmRequested);

    assert_eq!(
        effects,
        vec![Effect::Confirm {
            frame: expected_frame,
            label_index: 2
        }]
    );
}

#[test]
fn test_correction_saves_flagged_frame_under_chosen_label() {
    let state = with_snapshot(live());
    let flagged = state.snapshot.as_ref().unwrap().frame.clone();

    let (state, effects) = step(state, Event::FlagIncorrectRequested);
    assert!(state.correcting.is_some());
    assert!(effects.is_empty());

    // The feed moves on while the user is choosing.
    let (state, _) = step(
        state,
        Event::ClassifyDone {
            frame: frame(),
            result: Ok(prediction(0)),
        },
    );

    let (state, effects) = step(state, Event::CorrectionChosen(1));

    assert!(state.correcting.is_none());
    match effects.as_slice() {
        [Effect::SaveCorrection { frame, label_index }] => {
            assert!(Arc::ptr_eq(frame, &flagged));
            assert_eq!(*label_index, 1);
        }
        other => panic!("unexpected effects: {:?}", other),
    }
}

#[test]
fn test_correction_out_of_range_keeps_picker_open() {
    let (state, _) = step(with_snapshot(init().0), Event::FlagIncorrectRequested);

    let (state, effects) = step(state, Event::CorrectionChosen(7));

    assert!(effects.is_empty());
    assert!(state.correcting.is_some());
    assert_eq!(state.status.unwrap().severity, Severity::Warning);
}

#[test]
fn test_cancel_closes_picker() {
    let (state, _) = step(with_snapshot(init().0), Event::FlagIncorrectRequested);

    let (state, effects) = step(state, Event::CorrectionCancelled);

    assert!(state.correcting.is_none());
    assert!(state.snapshot.is_some());
    assert!(effects.is_empty());
}

#[test]
fn test_save_failure_is_reported_in_status() {
    let (state, effects) = step(
        init().0,
        Event::CorrectionSaveDone(Err("disk full".into())),
    );

    assert!(effects.is_empty());
    let status = state.status.unwrap();
    assert_eq!(status.severity, Severity::Error);
    assert!(status.text.contains("disk full"));
}

#[test]
fn test_quit_releases_camera() {
    let (state, effects) = step(live(), Event::Quit);

    assert_eq!(state.session, Session::Stopped);
    assert_eq!(effects, vec![Effect::CancelTick, Effect::StopCamera]);
}

#[test]
fn test_live_prediction_keeps_action_status() {
    let (state, _) = step(live(), Event::ConfirmDone(Err("disk full".into())));

    let (state, _) = step(
        state,
        Event::ClassifyDone {
            frame: frame(),
            result: Ok(prediction(1)),
        },
    );

    let status = state.status.unwrap();
    assert_eq!(status.severity, Severity::Error);
    assert!(status.text.contains("disk full"));
}

#[test]
fn test_live_prediction_clears_no_feed_message() {
    let (state, _) = step(live(), Event::FrameCaptureDone(Ok(None)));
    assert!(state.status.as_ref().unwrap().transient);

    let (state, _) = step(
        state,
        Event::ClassifyDone {
            frame: frame(),
            result: Ok(prediction(1)),
        },
    );

    assert!(state.status.is_none());
}
