use crate::config::Config;
use crate::labels::LabelSet;
use crate::library::logger::interface::Logger;
use crate::trash_classifier::core::{init, transition, Effect, Event, State};
use crate::trash_classifier::render::Render;
use crate::trash_classifier::run_effect::RunEffect;
use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The event loop. Owns the state and feeds every event through
/// `transition`, then renders and runs the resulting effects in order.
pub struct TrashClassifier {
    config: Config,
    labels: Arc<LabelSet>,
    logger: Arc<dyn Logger + Send + Sync>,
    state: State,
    run_effect: RunEffect,
    render: Render,
    event_sender: Sender<Event>,
    event_receiver: Receiver<Event>,
}

impl TrashClassifier {
    /// `channel` carries user actions in from the front end.
    pub fn new(
        config: Config,
        labels: Arc<LabelSet>,
        logger: Arc<dyn Logger + Send + Sync>,
        run_effect: RunEffect,
        render: Render,
        channel: (Sender<Event>, Receiver<Event>),
    ) -> Self {
        let (event_sender, event_receiver) = channel;
        Self {
            config,
            labels,
            logger: logger.with_namespace("loop"),
            state: init().0,
            run_effect,
            render,
            event_sender,
            event_receiver,
        }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.event_sender.clone()
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn start(&mut self) {
        let (state, effects) = init();
        self.state = state;
        self.render.render(&self.state);
        self.run_effects(effects);
    }

    /// Handles `event` and every event its effects report back, in order.
    pub fn dispatch(&mut self, event: Event) -> Flow {
        let mut flow = Flow::Continue;
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            if matches!(event, Event::Quit) {
                flow = Flow::Quit;
            }

            // The live loop runs many times a second; only the rest is logged.
            let quiet = event.is_capture_cycle();
            if !quiet {
                let _ = self.logger.info(&format!("event: {:?}", event));
            }
            let (state, effects) =
                transition(&self.config, &self.labels, self.state.clone(), event);
            if !quiet {
                let _ = self.logger.info(&format!(
                    "session: {:?}, status: {:?}, effects: {:?}",
                    state.session, state.status, effects
                ));
            }

            self.state = state;
            self.render.render(&self.state);
            queue.extend(self.run_effects(effects));
        }

        flow
    }

    fn run_effects(&mut self, effects: Vec<Effect>) -> Vec<Event> {
        effects
            .into_iter()
            .filter_map(|effect| self.run_effect.run_effect(effect))
            .collect()
    }

    /// Handles whatever is already queued plus a due tick, without blocking.
    pub fn run_pending(&mut self) -> Flow {
        while let Ok(event) = self.event_receiver.try_recv() {
            if self.dispatch(event) == Flow::Quit {
                return Flow::Quit;
            }
        }
        self.fire_due_tick()
    }

    fn fire_due_tick(&mut self) -> Flow {
        if self.run_effect.scheduler_mut().take_due() {
            self.dispatch(Event::Tick)
        } else {
            Flow::Continue
        }
    }

    /// Blocks until a `Quit` event, sleeping until the next action or tick.
    pub fn run(&mut self) {
        self.start();

        loop {
            let received = match self.run_effect.scheduler().time_until_due() {
                Some(timeout) => match self.event_receiver.recv_timeout(timeout) {
                    Ok(event) => Some(event),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => Some(Event::Quit),
                },
                None => match self.event_receiver.recv() {
                    Ok(event) => Some(event),
                    Err(_) => Some(Event::Quit),
                },
            };

            if let Some(event) = received {
                if self.dispatch(event) == Flow::Quit {
                    break;
                }
            }

            if self.fire_due_tick() == Flow::Quit {
                break;
            }
        }

        if self.run_effect.is_live() {
            let _ = self.logger.warn("Camera still open after shutdown");
        }
        let _ = self.logger.info("Event loop stopped");
    }
}
