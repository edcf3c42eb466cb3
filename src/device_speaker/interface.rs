use std::path::Path;

pub trait DeviceSpeaker: Send {
    /// Plays the sound at `path` once, then `repeats` more times.
    fn play(&self, path: &Path, repeats: u32) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
