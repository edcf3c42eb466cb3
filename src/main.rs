use args::Args;
use clap::Parser;
use config::Config;
use correction_store::CorrectionStore;
use device_camera::impl_fake::DeviceCameraFake;
use device_camera::interface::DeviceCamera;
use device_display::impl_console::{spawn_command_reader, DeviceDisplayConsole};
use device_display::impl_gui::{run_gui, DeviceDisplayGui, SharedView};
use device_display::interface::DeviceDisplay;
use device_speaker::impl_command::DeviceSpeakerCommand;
use device_speaker::impl_console::DeviceSpeakerConsole;
use device_speaker::interface::DeviceSpeaker;
use feedback::FeedbackSink;
use frame_source::FrameSource;
use image_classifier::impl_fake::ImageClassifierFake;
use image_classifier::impl_tract_onnx::ImageClassifierTractOnnx;
use image_classifier::interface::ImageClassifier;
use image_classifier::pipeline::InferencePipeline;
use labels::LabelSet;
use library::clock::impl_system::ClockSystem;
use library::clock::interface::Clock;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use library::scheduler::Scheduler;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use trash_classifier::core::Event;
use trash_classifier::main::TrashClassifier;
use trash_classifier::render::Render;
use trash_classifier::run_effect::RunEffect;

mod args;
mod config;
mod correction_store;
mod device_camera;
mod device_display;
mod device_speaker;
mod feedback;
mod frame;
mod frame_source;
mod image_classifier;
mod labels;
mod library;
mod trash_classifier;

/// Used by `--fake` when the label file does not exist.
const DEMO_LABELS: &str = "cans & bottles\ngeneral\nnothing\npapers\n";

type AppError = Box<dyn std::error::Error + Send + Sync>;

/// Everything the event loop needs that can be built before the front end
/// exists. Building it first means a bad model or label file stops the
/// program before any window opens.
struct Parts {
    config: Config,
    labels: Arc<LabelSet>,
    logger: Arc<dyn Logger + Send + Sync>,
    clock: Arc<dyn Clock>,
    pipeline: InferencePipeline,
    feedback: FeedbackSink,
    fake_camera: bool,
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    let config = args.config();
    config.validate()?;

    let logger = LoggerConsole::new(config.logger_timezone).with_namespace("app");

    let parts = match build_parts(&args, config, logger.clone()) {
        Ok(parts) => parts,
        Err(e) => {
            let _ = logger.error(&format!("Startup failed: {}", e));
            return Err(e);
        }
    };

    if args.console {
        run_console(parts)
    } else {
        run_window(parts)
    }
}

fn build_parts(
    args: &Args,
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Result<Parts, AppError> {
    let label_set = if args.fake && !args.labels.exists() {
        LabelSet::parse(DEMO_LABELS)?
    } else {
        LabelSet::load(&args.labels)?
    };
    let labels = Arc::new(
        label_set
            .with_icons(&config.label_icons)?
            .with_sound_cues(&config.sound_cues)?
            .with_uncertain(&config.uncertain_label)?,
    );
    let _ = logger.info(&format!("Loaded {} labels: {:?}", labels.len(), labels.names()));

    let model = args.model_config();
    let classifier: Box<dyn ImageClassifier> = if args.fake {
        let _ = logger.warn("Demo mode: predictions are random");
        Box::new(ImageClassifierFake::random(labels.len()))
    } else {
        let _ = logger.info(&format!("Loading model {}", model.onnx_model_path.display()));
        Box::new(ImageClassifierTractOnnx::new(&model)?)
    };
    let pipeline = InferencePipeline::new(
        classifier,
        labels.clone(),
        model,
        config.confidence_threshold,
    )?;

    let clock: Arc<dyn Clock> = Arc::new(ClockSystem::new());
    let store = |root: &std::path::Path| {
        CorrectionStore::new(
            root.to_path_buf(),
            clock.clone(),
            config.logger_timezone,
            logger.clone(),
        )
    };
    let feedback = FeedbackSink::new(
        labels.clone(),
        config.save_correct.then(|| store(&config.correct_root)),
        store(&config.misclassified_root),
        build_speaker(&config, logger.clone()),
        logger.clone(),
    );

    Ok(Parts {
        config,
        labels,
        logger,
        clock,
        pipeline,
        feedback,
        fake_camera: args.fake,
    })
}

fn build_speaker(
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Option<Box<dyn DeviceSpeaker>> {
    if !config.play_sounds {
        return None;
    }

    let command = config
        .sound_player
        .as_deref()
        .and_then(|command| DeviceSpeakerCommand::new(command, logger.clone()));

    let speaker: Box<dyn DeviceSpeaker> = match command {
        Some(speaker) => Box::new(speaker),
        None => Box::new(DeviceSpeakerConsole::new(logger)),
    };
    Some(speaker)
}

#[cfg(feature = "webcam")]
fn live_camera(index: u32, logger: Arc<dyn Logger + Send + Sync>) -> Box<dyn DeviceCamera> {
    Box::new(device_camera::impl_nokhwa::DeviceCameraNokhwa::new(
        index, logger,
    ))
}

#[cfg(not(feature = "webcam"))]
fn live_camera(index: u32, logger: Arc<dyn Logger + Send + Sync>) -> Box<dyn DeviceCamera> {
    let _ = logger.warn(&format!(
        "Built without the webcam feature; camera {} is replaced by generated frames",
        index
    ));
    Box::new(DeviceCameraFake::new(logger))
}

/// Wires the loop together. The camera is created here, on the thread that
/// will use it.
fn assemble(
    parts: Parts,
    display: Box<dyn DeviceDisplay>,
    channel: (Sender<Event>, Receiver<Event>),
) -> TrashClassifier {
    let Parts {
        config,
        labels,
        logger,
        clock,
        pipeline,
        feedback,
        fake_camera,
    } = parts;

    let camera: Box<dyn DeviceCamera> = if fake_camera {
        Box::new(DeviceCameraFake::new(logger.clone()))
    } else {
        live_camera(config.camera_index, logger.clone())
    };

    let correction_choices = feedback.correction_choices();
    let run_effect = RunEffect::new(
        FrameSource::new(camera, logger.clone()),
        pipeline,
        feedback,
        Scheduler::new(clock),
        logger.clone(),
    );
    let render = Render::new(
        display,
        labels.clone(),
        config.fallback_icon.clone(),
        correction_choices,
        logger.clone(),
    );

    TrashClassifier::new(config, labels, logger, run_effect, render, channel)
}

fn run_console(parts: Parts) -> Result<(), AppError> {
    let (sender, receiver) = channel();
    spawn_command_reader(sender.clone());

    let mut classifier = assemble(
        parts,
        Box::new(DeviceDisplayConsole::new()),
        (sender, receiver),
    );
    classifier.run();

    Ok(())
}

/// The window has to own the main thread, so the loop runs beside it.
fn run_window(parts: Parts) -> Result<(), AppError> {
    let logger = parts.logger.clone();
    let shared = SharedView::default();
    let (sender, receiver) = channel();

    let display = DeviceDisplayGui::new(shared.clone());
    let loop_sender = sender.clone();
    let event_loop = std::thread::spawn(move || {
        let mut classifier = assemble(parts, Box::new(display), (loop_sender, receiver));
        classifier.run();
    });

    let result = run_gui(shared, sender.clone()).map_err(|e| e.to_string());

    let _ = logger.info("Window closed, shutting down");
    let _ = sender.send(Event::Quit);
    event_loop.join().map_err(|_| "event loop panicked")?;

    result?;
    Ok(())
}
