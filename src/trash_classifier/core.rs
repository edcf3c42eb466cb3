use crate::config::Config;
use crate::frame::Frame;
use crate::frame_source::{StartOutcome, StopOutcome};
use crate::image_classifier::pipeline::Prediction;
use crate::labels::LabelSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub type EffectError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub severity: Severity,
    pub text: String,
    /// Progress and capture messages. The next successful prediction clears
    /// these; anything else stays until another status replaces it.
    pub transient: bool,
}

impl Status {
    fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
            transient: false,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Severity::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(Severity::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Severity::Error, text)
    }

    pub fn transient(self) -> Self {
        Self {
            transient: true,
            ..self
        }
    }
}

/// A frame together with what the model made of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub frame: Arc<Frame>,
    pub prediction: Prediction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    Stopped,
    Starting,
    Live,
}

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub session: Session,
    /// Latest prediction on screen.
    pub snapshot: Option<Snapshot>,
    /// Prediction flagged as wrong, waiting for the user to pick a label.
    /// Kept apart from `snapshot` so the live feed can move on meanwhile.
    pub correcting: Option<Snapshot>,
    pub status: Option<Status>,
}

impl State {
    fn with_status(self, status: Status) -> Self {
        Self {
            status: Some(status),
            ..self
        }
    }
}

#[derive(Debug)]
pub enum Event {
    OpenImageRequested(PathBuf),
    StartCaptureRequested,
    StopCaptureRequested,
    ConfirmRequested,
    FlagIncorrectRequested,
    CorrectionChosen(usize),
    CorrectionCancelled,
    Quit,
    Tick,
    CameraStartDone(Result<StartOutcome, EffectError>),
    CameraStopDone(Result<StopOutcome, EffectError>),
    FrameCaptureDone(Result<Option<Frame>, EffectError>),
    StillLoadDone(Result<Frame, EffectError>),
    ClassifyDone {
        frame: Arc<Frame>,
        result: Result<Prediction, EffectError>,
    },
    ConfirmDone(Result<Option<PathBuf>, EffectError>),
    CorrectionSaveDone(Result<PathBuf, EffectError>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StartCamera,
    StopCamera,
    CaptureFrame,
    LoadStill(PathBuf),
    Classify(Arc<Frame>),
    ScheduleTick(Duration),
    CancelTick,
    Confirm { frame: Arc<Frame>, label_index: usize },
    SaveCorrection { frame: Arc<Frame>, label_index: usize },
}

pub const NO_FEED_MESSAGE: &str = "❌ Camera Error: No feed available. Please check connection.";

impl Event {
    /// Events the capture loop produces every interval when all is well.
    pub fn is_capture_cycle(&self) -> bool {
        matches!(
            self,
            Event::Tick
                | Event::FrameCaptureDone(Ok(Some(_)))
                | Event::ClassifyDone { result: Ok(_), .. }
        )
    }
}

impl Effect {
    pub fn is_capture_cycle(&self) -> bool {
        matches!(
            self,
            Effect::CaptureFrame | Effect::Classify(_) | Effect::ScheduleTick(_)
        )
    }
}

pub fn init() -> (State, Vec<Effect>) {
    (
        State {
            session: Session::Stopped,
            snapshot: None,
            correcting: None,
            status: Some(Status::info("Open an image or start the webcam").transient()),
        },
        vec![],
    )
}

pub fn transition(
    config: &Config,
    labels: &LabelSet,
    state: State,
    event: Event,
) -> (State, Vec<Effect>) {
    let label_name = |index: usize| labels.name(index).unwrap_or("?").to_string();

    match (state.session, event) {
        // Live session lifecycle
        (Session::Stopped, Event::StartCaptureRequested) => (
            State {
                session: Session::Starting,
                snapshot: None,
                correcting: None,
                status: Some(Status::info("Starting webcam...").transient()),
            },
            vec![Effect::StartCamera],
        ),
        (_, Event::StartCaptureRequested) => (
            state.with_status(Status::warning("Webcam is already running")),
            vec![],
        ),
        (Session::Starting, Event::CameraStartDone(Ok(_))) => (
            State {
                session: Session::Live,
                status: None,
                ..state
            },
            vec![Effect::CaptureFrame],
        ),
        (Session::Starting, Event::CameraStartDone(Err(e))) => (
            State {
                session: Session::Stopped,
                status: Some(Status::error(format!("Could not open camera: {}", e))),
                ..state
            },
            vec![],
        ),
        (Session::Stopped, Event::StopCaptureRequested) => (state, vec![]),
        (_, Event::StopCaptureRequested) => (
            State {
                session: Session::Stopped,
                snapshot: None,
                correcting: None,
                status: Some(Status::info("Webcam stopped")),
            },
            vec![Effect::CancelTick, Effect::StopCamera],
        ),
        (_, Event::CameraStopDone(Err(e))) => (
            state.with_status(Status::error(format!("Could not release camera: {}", e))),
            vec![],
        ),
        (_, Event::Quit) => (
            State {
                session: Session::Stopped,
                ..state
            },
            vec![Effect::CancelTick, Effect::StopCamera],
        ),

        // Capture loop
        (Session::Live, Event::Tick) => (state, vec![Effect::CaptureFrame]),
        (Session::Live, Event::FrameCaptureDone(Ok(Some(frame)))) => {
            (state, vec![Effect::Classify(Arc::new(frame))])
        }
        (Session::Live, Event::FrameCaptureDone(Ok(None))) => (
            State {
                snapshot: None,
                status: Some(Status::warning(NO_FEED_MESSAGE).transient()),
                ..state
            },
            vec![Effect::ScheduleTick(config.capture_interval)],
        ),
        (Session::Live, Event::FrameCaptureDone(Err(e))) => (
            State {
                snapshot: None,
                status: Some(Status::error(format!("Camera error: {}", e)).transient()),
                ..state
            },
            vec![Effect::ScheduleTick(config.capture_interval)],
        ),

        // Still images
        (Session::Stopped, Event::OpenImageRequested(path)) => (
            state.with_status(Status::info(format!("Loading {}", path.display())).transient()),
            vec![Effect::LoadStill(path)],
        ),
        (_, Event::OpenImageRequested(_)) => (
            state.with_status(Status::warning("Stop webcam first!")),
            vec![],
        ),
        (Session::Stopped, Event::StillLoadDone(Ok(frame))) => {
            (state, vec![Effect::Classify(Arc::new(frame))])
        }
        (_, Event::StillLoadDone(Err(e))) => (
            state.with_status(Status::error(format!("Could not open image: {}", e))),
            vec![],
        ),

        // Predictions
        (session @ (Session::Live | Session::Stopped), Event::ClassifyDone { frame, result }) => {
            let effects = match session {
                Session::Live => vec![Effect::ScheduleTick(config.capture_interval)],
                _ => vec![],
            };

            match result {
                Ok(prediction) => (
                    State {
                        status: state.status.filter(|status| !status.transient),
                        snapshot: Some(Snapshot { frame, prediction }),
                        ..state
                    },
                    effects,
                ),
                Err(e) => {
                    let status = Status::error(format!("Prediction failed: {}", e));
                    let status = match session {
                        Session::Live => status.transient(),
                        _ => status,
                    };
                    (state.with_status(status), effects)
                }
            }
        }

        // Feedback
        (_, Event::ConfirmRequested) => match state.snapshot.clone() {
            Some(snapshot) => {
                let effect = Effect::Confirm {
                    frame: snapshot.frame,
                    label_index: snapshot.prediction.label_index,
                };
                let status = Status::info(format!(
                    "✅ Confirmed: {}",
                    label_name(snapshot.prediction.label_index)
                ));
                (state.with_status(status), vec![effect])
            }
            None => (
                state.with_status(Status::warning("Nothing to confirm yet")),
                vec![],
            ),
        },
        (_, Event::FlagIncorrectRequested) => match state.snapshot.clone() {
            Some(snapshot) => (
                State {
                    correcting: Some(snapshot),
                    status: Some(Status::info("⚠️ Wrong prediction. Choose the correct label")),
                    ..state
                },
                vec![],
            ),
            None => (
                state.with_status(Status::warning("Nothing to correct yet")),
                vec![],
            ),
        },
        (_, Event::CorrectionChosen(index)) => match state.correcting.clone() {
            Some(snapshot) if index < labels.len() => (
                State {
                    correcting: None,
                    ..state
                },
                vec![Effect::SaveCorrection {
                    frame: snapshot.frame,
                    label_index: index,
                }],
            ),
            Some(_) => (
                state.with_status(Status::warning(format!("No label number {}", index))),
                vec![],
            ),
            None => (state, vec![]),
        },
        (_, Event::CorrectionCancelled) => (
            State {
                correcting: None,
                ..state
            },
            vec![],
        ),
        (_, Event::ConfirmDone(Ok(Some(path)))) => (
            state.with_status(Status::info(format!("✅ Saved to {}", path.display()))),
            vec![],
        ),
        (_, Event::ConfirmDone(Err(e))) | (_, Event::CorrectionSaveDone(Err(e))) => (
            state.with_status(Status::error(format!("Could not save image: {}", e))),
            vec![],
        ),
        (_, Event::CorrectionSaveDone(Ok(path))) => (
            state.with_status(Status::info(format!(
                "Saved correction to {}",
                path.display()
            ))),
            vec![],
        ),

        // Stale ticks and results that outlived their session
        _ => (state, vec![]),
    }
}
