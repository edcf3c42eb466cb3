use crate::device_display::interface::{DeviceDisplay, View};
use crate::trash_classifier::core::{Event, Severity};
use std::error::Error;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

/// Prints the view to stdout. Live mode refreshes many times a second, so
/// a view is only printed when it differs from the last one. While live,
/// the per-frame numbers do not count as a difference.
pub struct DeviceDisplayConsole {
    last_printed: Option<String>,
}

impl DeviceDisplayConsole {
    pub fn new() -> Self {
        Self { last_printed: None }
    }

    /// What has to change before a view is printed again.
    fn dedupe_key(view: &View) -> String {
        if !view.live {
            return Self::render_text(view);
        }
        Self::render_text(&View {
            confidence: None,
            probabilities: vec![],
            ..view.clone()
        })
    }

    /// Returns the text to print, or `None` when it would repeat the last view.
    fn next_output(&mut self, view: &View) -> Option<String> {
        let key = Self::dedupe_key(view);
        if self.last_printed.as_deref() == Some(key.as_str()) {
            return None;
        }
        self.last_printed = Some(key);
        Some(Self::render_text(view))
    }

    pub fn render_text(view: &View) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "🗑️ Smart Trash Classifier [{}]",
            if view.live { "webcam" } else { "still" }
        ));

        if let Some(headline) = &view.headline {
            lines.push(headline.clone());
        }
        if let Some(confidence) = view.confidence {
            lines.push(format!("🎯 Confidence: {:.2}%", confidence * 100.0));
        }
        for (label, probability) in &view.probabilities {
            lines.push(format!("  {:<20} {:>6.2}%", label, probability * 100.0));
        }

        if let Some(status) = &view.status {
            let prefix = match status.severity {
                Severity::Info => "",
                Severity::Warning => "warning: ",
                Severity::Error => "error: ",
            };
            lines.push(format!("{}{}", prefix, status.text));
        }

        if !view.correction_choices.is_empty() {
            lines.push("Choose the correct label (pick <n>, or cancel):".to_string());
            for (i, choice) in view.correction_choices.iter().enumerate() {
                lines.push(format!("  [{}] {}", i, choice));
            }
        } else if view.feedback_enabled {
            lines.push("Correct? (ok / wrong)".to_string());
        }

        lines.join("\n")
    }
}

impl Default for DeviceDisplayConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn show(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>> {
        let text = match self.next_output(view) {
            Some(text) => text,
            None => return Ok(()),
        };

        let width = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        println!("┌{}┐", "─".repeat(width + 2));
        for line in text.lines() {
            println!("│ {:<width$} │", line, width = width);
        }
        println!("└{}┘", "─".repeat(width + 2));

        Ok(())
    }
}

/// Maps one line of console input to a user action.
pub fn parse_command(line: &str) -> Option<Event> {
    let line = line.trim();
    let (command, argument) = match line.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (line, ""),
    };

    match (command, argument) {
        ("open", path) if !path.is_empty() => Some(Event::OpenImageRequested(PathBuf::from(path))),
        ("start", "") => Some(Event::StartCaptureRequested),
        ("stop", "") => Some(Event::StopCaptureRequested),
        ("ok" | "correct", "") => Some(Event::ConfirmRequested),
        ("wrong", "") => Some(Event::FlagIncorrectRequested),
        ("pick", n) => n.parse().ok().map(Event::CorrectionChosen),
        ("cancel", "") => Some(Event::CorrectionCancelled),
        ("quit" | "exit", "") => Some(Event::Quit),
        _ => None,
    }
}

pub const HELP: &str =
    "commands: open <path> | start | stop | ok | wrong | pick <n> | cancel | quit";

/// Reads commands from stdin on a background thread until stdin closes or
/// the loop goes away. End of input counts as `quit`.
pub fn spawn_command_reader(sender: Sender<Event>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        println!("{}", HELP);
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Some(event) => {
                    if sender.send(event).is_err() {
                        return;
                    }
                }
                None => println!("{}", HELP),
            }
        }
        let _ = sender.send(Event::Quit);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trash_classifier::core::Status;

    #[test]
    fn test_parse_commands() {
        assert!(matches!(
            parse_command("open  /tmp/my can.jpg "),
            Some(Event::OpenImageRequested(p)) if p == PathBuf::from("/tmp/my can.jpg")
        ));
        assert!(matches!(parse_command("start"), Some(Event::StartCaptureRequested)));
        assert!(matches!(parse_command(" stop "), Some(Event::StopCaptureRequested)));
        assert!(matches!(parse_command("ok"), Some(Event::ConfirmRequested)));
        assert!(matches!(parse_command("wrong"), Some(Event::FlagIncorrectRequested)));
        assert!(matches!(parse_command("pick 2"), Some(Event::CorrectionChosen(2))));
        assert!(matches!(parse_command("quit"), Some(Event::Quit)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_command("open").is_none());
        assert!(parse_command("pick two").is_none());
        assert!(parse_command("start now").is_none());
        assert!(parse_command("dance").is_none());
    }

    #[test]
    fn test_render_text_lists_choices() {
        let view = View {
            headline: Some("📄 PAPERS".to_string()),
            confidence: Some(0.875),
            status: Some(Status::warning("Stop webcam first!")),
            correction_choices: vec!["general".to_string(), "papers".to_string()],
            ..View::default()
        };

        let text = DeviceDisplayConsole::render_text(&view);

        assert!(text.contains("📄 PAPERS"));
        assert!(text.contains("🎯 Confidence: 87.50%"));
        assert!(text.contains("warning: Stop webcam first!"));
        assert!(text.contains("[1] papers"));
        assert!(!text.contains("ok / wrong"));
    }

    #[test]
    fn test_live_view_is_not_reprinted_for_new_numbers() {
        let mut console = DeviceDisplayConsole::new();
        let live = |confidence: f32, headline: &str| View {
            headline: Some(headline.to_string()),
            confidence: Some(confidence),
            probabilities: vec![("papers".to_string(), confidence)],
            live: true,
            ..View::default()
        };

        assert!(console.next_output(&live(0.61, "📄 PAPERS")).is_some());
        assert!(console.next_output(&live(0.64, "📄 PAPERS")).is_none());
        assert!(console.next_output(&live(0.64, "♻️ GENERAL")).is_some());

        let still = View {
            live: false,
            ..live(0.64, "♻️ GENERAL")
        };
        assert!(console.next_output(&still).is_some());
        assert!(console.next_output(&View {
            confidence: Some(0.7),
            ..still.clone()
        })
        .is_some());
    }
}
