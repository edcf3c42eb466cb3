/// Sizes the layout relative to a 1920x1080 reference screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiScale {
    pub factor: f32,
}

impl UiScale {
    pub const REFERENCE_WIDTH: f32 = 1920.0;
    pub const REFERENCE_HEIGHT: f32 = 1080.0;

    pub fn from_screen(width: f32, height: f32) -> Self {
        let factor = (width / Self::REFERENCE_WIDTH).min(height / Self::REFERENCE_HEIGHT);
        Self {
            factor: if factor.is_finite() && factor > 0.0 {
                factor
            } else {
                1.0
            },
        }
    }

    /// Scales to the monitor when its size is known, else to the window.
    pub fn from_monitor(monitor: Option<(f32, f32)>, window: (f32, f32)) -> Self {
        let (width, height) = monitor
            .filter(|(width, height)| *width > 0.0 && *height > 0.0)
            .unwrap_or(window);
        Self::from_screen(width, height)
    }

    /// `base` scaled, but never below `min`.
    pub fn size(&self, base: f32, min: f32) -> f32 {
        (base * self.factor).max(min)
    }

    pub fn heading_font(&self) -> f32 {
        self.size(20.0, 12.0)
    }

    pub fn result_font(&self) -> f32 {
        self.size(16.0, 10.0)
    }

    pub fn body_font(&self) -> f32 {
        self.size(12.0, 8.0)
    }

    /// Preview area, 640x480 at reference size.
    pub fn preview_size(&self) -> (f32, f32) {
        (self.size(640.0, 100.0), self.size(480.0, 75.0))
    }

    pub fn confidence_bar_width(&self) -> f32 {
        self.size(300.0, 50.0)
    }

    pub fn spacing(&self) -> f32 {
        self.size(10.0, 1.0)
    }
}
