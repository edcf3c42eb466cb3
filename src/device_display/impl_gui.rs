use crate::device_display::interface::{DeviceDisplay, View};
use crate::device_display::scale::UiScale;
use crate::frame::Frame;
use crate::trash_classifier::core::{Event, Severity};
use eframe::egui;
use std::error::Error;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type SharedView = Arc<Mutex<Option<View>>>;

/// Hands each view to the window, which draws it on its next frame.
pub struct DeviceDisplayGui {
    shared: SharedView,
}

impl DeviceDisplayGui {
    pub fn new(shared: SharedView) -> Self {
        Self { shared }
    }
}

impl DeviceDisplay for DeviceDisplayGui {
    fn show(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut shared = self
            .shared
            .lock()
            .map_err(|_| "display window state poisoned")?;
        *shared = Some(view.clone());
        Ok(())
    }
}

struct PreviewTexture {
    frame: Arc<Frame>,
    handle: egui::TextureHandle,
}

struct ClassifierWindow {
    shared: SharedView,
    sender: Sender<Event>,
    preview: Option<PreviewTexture>,
    path_input: String,
}

impl ClassifierWindow {
    fn send(&self, event: Event) {
        let _ = self.sender.send(event);
    }

    /// Uploads the frame only when it is a different frame from last time.
    fn preview_texture(&mut self, ctx: &egui::Context, frame: &Arc<Frame>) -> egui::TextureId {
        if let Some(preview) = &self.preview {
            if Arc::ptr_eq(&preview.frame, frame) {
                return preview.handle.id();
            }
        }

        let rgb = frame.to_rgb_image();
        let image = egui::ColorImage::from_rgb(
            [rgb.width() as usize, rgb.height() as usize],
            rgb.as_raw(),
        );
        let handle = ctx.load_texture("preview", image, egui::TextureOptions::LINEAR);
        let id = handle.id();
        self.preview = Some(PreviewTexture {
            frame: frame.clone(),
            handle,
        });
        id
    }

    fn controls(&mut self, ui: &mut egui::Ui, view: &View, scale: UiScale) {
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.path_input)
                    .hint_text("path/to/image.jpg")
                    .desired_width(scale.size(260.0, 80.0)),
            );
            if ui
                .add_enabled(!view.live, egui::Button::new("📂 Open Image"))
                .clicked()
            {
                let path = self.path_input.trim();
                if !path.is_empty() {
                    self.send(Event::OpenImageRequested(PathBuf::from(path)));
                }
            }
            if ui
                .add_enabled(!view.live, egui::Button::new("📷 Start Webcam"))
                .clicked()
            {
                self.send(Event::StartCaptureRequested);
            }
            if ui
                .add_enabled(view.live, egui::Button::new("⏹ Stop Webcam"))
                .clicked()
            {
                self.send(Event::StopCaptureRequested);
            }
        });
    }

    fn result(&mut self, ui: &mut egui::Ui, view: &View, scale: UiScale) {
        if let Some(headline) = &view.headline {
            ui.label(
                egui::RichText::new(headline)
                    .strong()
                    .size(scale.result_font()),
            );
        }

        if let Some(confidence) = view.confidence {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("🎯 Confidence").size(scale.body_font()));
                ui.add(
                    egui::ProgressBar::new(confidence.clamp(0.0, 1.0))
                        .desired_width(scale.confidence_bar_width())
                        .text(format!("{:.2}%", confidence * 100.0)),
                );
            });
        }

        for (label, probability) in &view.probabilities {
            ui.label(
                egui::RichText::new(format!("{}: {:.2}%", label, probability * 100.0))
                    .monospace()
                    .size(scale.body_font()),
            );
        }

        if view.feedback_enabled {
            ui.add_space(scale.spacing());
            ui.horizontal(|ui| {
                if ui.button("✅ Correct").clicked() {
                    self.send(Event::ConfirmRequested);
                }
                if ui.button("❌ Wrong").clicked() {
                    self.send(Event::FlagIncorrectRequested);
                }
            });
        }

        if let Some(status) = &view.status {
            let color = match status.severity {
                Severity::Info => ui.visuals().text_color(),
                Severity::Warning => egui::Color32::from_rgb(230, 160, 0),
                Severity::Error => egui::Color32::from_rgb(220, 50, 50),
            };
            ui.add_space(scale.spacing());
            ui.label(
                egui::RichText::new(&status.text)
                    .color(color)
                    .size(scale.body_font()),
            );
        }
    }

    fn correction_picker(&mut self, ctx: &egui::Context, view: &View, scale: UiScale) {
        if view.correction_choices.is_empty() {
            return;
        }

        egui::Window::new("Select the correct label")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                for (index, choice) in view.correction_choices.iter().enumerate() {
                    let text = egui::RichText::new(choice).size(scale.body_font());
                    if ui.button(text).clicked() {
                        self.send(Event::CorrectionChosen(index));
                    }
                }
                ui.separator();
                if ui.button("Cancel").clicked() {
                    self.send(Event::CorrectionCancelled);
                }
            });
    }
}

impl eframe::App for ClassifierWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let view = self
            .shared
            .lock()
            .ok()
            .and_then(|shared| shared.clone())
            .unwrap_or_default();
        let window = ctx.screen_rect().size();
        let monitor = ctx.input(|i| i.viewport().monitor_size);
        let scale = UiScale::from_monitor(monitor.map(|m| (m.x, m.y)), (window.x, window.y));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(
                    egui::RichText::new("🗑️ Smart Trash Classifier").size(scale.heading_font()),
                );
            });
            ui.add_space(scale.spacing());
            self.controls(ui, &view, scale);
            ui.add_space(scale.spacing());

            let (max_width, max_height) = scale.preview_size();
            match &view.preview {
                Some(frame) => {
                    let fit = (max_width / frame.width() as f32)
                        .min(max_height / frame.height() as f32);
                    let size = egui::vec2(frame.width() as f32 * fit, frame.height() as f32 * fit);
                    let texture = self.preview_texture(ctx, frame);
                    ui.add(egui::Image::new(egui::load::SizedTexture::new(texture, size)));
                }
                None => {
                    let (rect, _) = ui.allocate_exact_size(
                        egui::vec2(max_width, max_height),
                        egui::Sense::hover(),
                    );
                    ui.painter()
                        .rect_filled(rect, 4.0, egui::Color32::from_gray(40));
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "No image",
                        egui::FontId::proportional(scale.body_font()),
                        egui::Color32::from_gray(160),
                    );
                }
            }

            ui.add_space(scale.spacing());
            self.result(ui, &view, scale);
        });

        self.correction_picker(ctx, &view, scale);

        ctx.request_repaint_after(Duration::from_millis(50));
    }
}

/// Opens the window and blocks until it is closed. Must run on the main
/// thread.
pub fn run_gui(shared: SharedView, sender: Sender<Event>) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 800.0])
            .with_min_inner_size([320.0, 240.0]),
        ..Default::default()
    };

    let window = ClassifierWindow {
        shared,
        sender,
        preview: None,
        path_input: String::new(),
    };

    eframe::run_native(
        "Smart Trash Classifier",
        options,
        Box::new(|_cc| Box::new(window)),
    )
}
