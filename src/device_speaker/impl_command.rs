use crate::device_speaker::interface::DeviceSpeaker;
use crate::library::logger::interface::Logger;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;

/// Plays cues through an external program, e.g. `ffplay -nodisp -autoexit`
/// or `afplay`. Playback runs on a detached thread so the loop never waits
/// on audio.
pub struct DeviceSpeakerCommand {
    program: String,
    args: Vec<String>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceSpeakerCommand {
    /// `command_line` is split on whitespace; the sound path is appended last.
    pub fn new(command_line: &str, logger: Arc<dyn Logger + Send + Sync>) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;

        Some(Self {
            program,
            args: parts.collect(),
            logger: logger.with_namespace("speaker").with_namespace("command"),
        })
    }
}

impl DeviceSpeaker for DeviceSpeakerCommand {
    fn play(&self, path: &Path, repeats: u32) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !path.is_file() {
            return Err(format!("sound file {} not found", path.display()).into());
        }

        let program = self.program.clone();
        let args = self.args.clone();
        let path = path.to_path_buf();
        let logger = self.logger.clone();

        std::thread::spawn(move || {
            for _ in 0..=repeats {
                let status = Command::new(&program)
                    .args(&args)
                    .arg(&path)
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status();

                match status {
                    Ok(status) if status.success() => {}
                    Ok(status) => {
                        let _ = logger.error(&format!("{} exited with {}", program, status));
                        break;
                    }
                    Err(e) => {
                        let _ = logger.error(&format!("Error playing sound {}: {}", path.display(), e));
                        break;
                    }
                }
            }
        });

        Ok(())
    }
}
