use crate::device_display::interface::{DeviceDisplay, View};
use std::error::Error;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct DeviceDisplayFake {
    views: Arc<Mutex<Vec<View>>>,
}

impl DeviceDisplayFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<View> {
        match self.views.lock() {
            Ok(views) => views.last().cloned(),
            Err(poisoned) => poisoned.into_inner().last().cloned(),
        }
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn show(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.views
            .lock()
            .map_err(|e| e.to_string())?
            .push(view.clone());
        Ok(())
    }
}
