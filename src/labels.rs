use crate::config::{LabelIconConfig, SoundCueConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("failed to read label file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("label file contains no labels")]
    Empty,
    #[error("label on line {line} is not usable as a directory name: {name:?}")]
    InvalidName { line: usize, name: String },
    #[error("label {0:?} appears more than once")]
    Duplicate(String),
    #[error("{context} refers to unknown label {name:?}")]
    Unknown { context: &'static str, name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoundCue {
    pub path: PathBuf,
    pub repeats: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub name: String,
    pub icon: Option<String>,
    pub sound_cue: Option<SoundCue>,
}

/// The ordered class names the model was trained with.
///
/// A label's position is its class index. The model output, the icon and
/// sound tables and the correction directories all resolve through this one
/// sequence, and it never changes after startup.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSet {
    labels: Vec<Label>,
    uncertain: Option<usize>,
}

impl LabelSet {
    pub fn load(path: &Path) -> Result<Self, LabelError> {
        let text = std::fs::read_to_string(path).map_err(|source| LabelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses one label per line. A leading numeric token (`0 cans & bottles`)
    /// is dropped; blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, LabelError> {
        let mut labels: Vec<Label> = Vec::new();

        for (line_number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let name = strip_index(line);

            if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
                return Err(LabelError::InvalidName {
                    line: line_number + 1,
                    name: name.to_string(),
                });
            }

            if labels.iter().any(|l| l.name == name) {
                return Err(LabelError::Duplicate(name.to_string()));
            }

            labels.push(Label {
                name: name.to_string(),
                icon: None,
                sound_cue: None,
            });
        }

        if labels.is_empty() {
            return Err(LabelError::Empty);
        }

        Ok(Self {
            labels,
            uncertain: None,
        })
    }

    pub fn with_icons(mut self, icons: &[LabelIconConfig]) -> Result<Self, LabelError> {
        for icon in icons {
            let index = self.resolve("icon table", &icon.label)?;
            self.labels[index].icon = Some(icon.icon.clone());
        }
        Ok(self)
    }

    pub fn with_sound_cues(mut self, cues: &[SoundCueConfig]) -> Result<Self, LabelError> {
        for cue in cues {
            let index = self.resolve("sound cue table", &cue.label)?;
            self.labels[index].sound_cue = Some(SoundCue {
                path: cue.path.clone(),
                repeats: cue.repeats,
            });
        }
        Ok(self)
    }

    /// Marks the class reported when the model is not confident enough.
    pub fn with_uncertain(mut self, name: &str) -> Result<Self, LabelError> {
        self.uncertain = Some(self.resolve("uncertain label", name)?);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, index: usize) -> Option<&Label> {
        self.labels.get(index)
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(|l| l.name.as_str())
    }

    pub fn names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.labels.iter().position(|l| l.name == name)
    }

    pub fn uncertain_index(&self) -> Option<usize> {
        self.uncertain
    }

    pub fn is_uncertain(&self, index: usize) -> bool {
        self.uncertain == Some(index)
    }

    fn resolve(&self, context: &'static str, name: &str) -> Result<usize, LabelError> {
        self.index_of(name).ok_or_else(|| LabelError::Unknown {
            context,
            name: name.to_string(),
        })
    }
}

fn strip_index(line: &str) -> &str {
    match line.split_once(char::is_whitespace) {
        Some((head, rest)) if head.chars().all(|c| c.is_ascii_digit()) && !rest.trim().is_empty() => {
            rest.trim()
        }
        _ => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    const TRASH_LABELS: &str = "0 cans & bottles\n1 general\n2 papers\n3 nothing\n";

    #[test]
    fn test_index_prefixes_are_stripped_in_order() {
        let labels = LabelSet::parse(TRASH_LABELS).unwrap();

        assert_eq!(labels.len(), 4);
        assert_eq!(
            labels.names(),
            vec!["cans & bottles", "general", "papers", "nothing"]
        );
    }

    #[test]
    fn test_bare_and_prefixed_lines_mix() {
        let labels = LabelSet::parse("glass\n1 metal\nplastic bag\n  7   organic  \n").unwrap();

        assert_eq!(
            labels.names(),
            vec!["glass", "metal", "plastic bag", "organic"]
        );
    }

    #[test]
    fn test_number_only_line_is_a_label() {
        let labels = LabelSet::parse("42\n").unwrap();
        assert_eq!(labels.name(0), Some("42"));
    }

    #[test]
    fn test_blank_lines_skipped_and_windows_newlines() {
        let labels = LabelSet::parse("0 a\r\n\r\n1 b\r\n").unwrap();
        assert_eq!(labels.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_rejects_empty_duplicate_and_path_names() {
        assert!(matches!(LabelSet::parse("\n \n"), Err(LabelError::Empty)));
        assert!(matches!(
            LabelSet::parse("0 a\n1 a\n"),
            Err(LabelError::Duplicate(name)) if name == "a"
        ));
        assert!(matches!(
            LabelSet::parse("0 ok\n1 ../escape\n"),
            Err(LabelError::InvalidName { line: 2, .. })
        ));
    }

    #[test]
    fn test_default_tables_resolve_against_trash_labels() {
        let config = Config::default();
        let labels = LabelSet::parse(TRASH_LABELS)
            .unwrap()
            .with_icons(&config.label_icons)
            .unwrap()
            .with_sound_cues(&config.sound_cues)
            .unwrap()
            .with_uncertain(&config.uncertain_label)
            .unwrap();

        assert_eq!(labels.uncertain_index(), Some(3));
        assert!(labels.get(3).unwrap().sound_cue.is_none());
        assert_eq!(
            labels.get(0).unwrap().sound_cue.as_ref().unwrap().path,
            PathBuf::from("binRed.mp3")
        );
        assert_eq!(labels.get(2).unwrap().icon.as_deref(), Some("📄"));
    }

    #[test]
    fn test_unknown_table_entry_is_an_error() {
        let labels = LabelSet::parse("0 metal\n1 glass\n").unwrap();

        let result = labels.with_uncertain("nothing");

        assert!(matches!(
            result,
            Err(LabelError::Unknown { name, .. }) if name == "nothing"
        ));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = LabelSet::load(&dir.path().join("labels.txt"));
        assert!(matches!(result, Err(LabelError::Io { .. })));
    }
}
