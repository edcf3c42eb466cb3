use crate::feedback::FeedbackSink;
use crate::frame_source::FrameSource;
use crate::image_classifier::pipeline::InferencePipeline;
use crate::library::logger::interface::Logger;
use crate::library::scheduler::Scheduler;
use crate::trash_classifier::core::{Effect, EffectError, Event};
use std::sync::Arc;

/// Carries out effects against the real collaborators. Every effect runs to
/// completion before the next one starts, so at most one frame is ever being
/// classified.
pub struct RunEffect {
    frame_source: FrameSource,
    pipeline: InferencePipeline,
    feedback: FeedbackSink,
    scheduler: Scheduler,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl RunEffect {
    pub fn new(
        frame_source: FrameSource,
        pipeline: InferencePipeline,
        feedback: FeedbackSink,
        scheduler: Scheduler,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            frame_source,
            pipeline,
            feedback,
            scheduler,
            logger: logger.with_namespace("run_effect"),
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn is_live(&self) -> bool {
        self.frame_source.is_live()
    }

    /// Runs `effect` and returns the event reporting its outcome, if any.
    pub fn run_effect(&mut self, effect: Effect) -> Option<Event> {
        if !effect.is_capture_cycle() {
            let _ = self.logger.info(&format!("Running effect: {:?}", effect));
        }

        match effect {
            Effect::StartCamera => Some(Event::CameraStartDone(
                self.frame_source.start_live().map_err(EffectError::from),
            )),
            Effect::StopCamera => Some(Event::CameraStopDone(
                self.frame_source.stop_live().map_err(EffectError::from),
            )),
            Effect::CaptureFrame => Some(Event::FrameCaptureDone(
                self.frame_source.poll().map_err(EffectError::from),
            )),
            Effect::LoadStill(path) => Some(Event::StillLoadDone(
                self.frame_source
                    .load_still(&path)
                    .map_err(EffectError::from),
            )),
            Effect::Classify(frame) => {
                let result = self.pipeline.predict(&frame).map_err(EffectError::from);
                Some(Event::ClassifyDone { frame, result })
            }
            Effect::ScheduleTick(delay) => {
                self.scheduler.schedule_in(delay);
                None
            }
            Effect::CancelTick => {
                self.scheduler.cancel();
                None
            }
            Effect::Confirm { frame, label_index } => Some(Event::ConfirmDone(
                self.feedback
                    .confirm(&frame, label_index)
                    .map_err(EffectError::from),
            )),
            Effect::SaveCorrection { frame, label_index } => Some(Event::CorrectionSaveDone(
                self.feedback
                    .select_correction(&frame, label_index)
                    .map_err(EffectError::from),
            )),
        }
    }
}
