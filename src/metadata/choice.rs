//! Asking the user for a label and/or directory.

use async_trait::async_trait;

/// What to ask. `None` means that question is not asked at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoicePrompt {
    pub labels: Option<Vec<String>>,
    pub directories: Option<Vec<String>>,
}

/// The user's answer. Directories are entries of the offered list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Choice {
    pub label: Option<String>,
    pub directory: Option<String>,
}

/// Interactive-choice capability, addressed to whoever started the upload.
#[async_trait]
pub trait Chooser: Send + Sync {
    /// `None` when the user dismissed the prompt.
    async fn choose(&self, prompt: ChoicePrompt) -> Option<Choice>;
}

/// Answers every prompt the same way, without asking anyone.
#[derive(Debug, Clone, Default)]
pub struct PresetChooser {
    answer: Option<Choice>,
}

impl PresetChooser {
    pub fn new(label: Option<String>, directory: Option<String>) -> Self {
        Self {
            answer: Some(Choice { label, directory }),
        }
    }

    /// Dismisses every prompt.
    pub fn dismiss() -> Self {
        Self { answer: None }
    }
}

#[async_trait]
impl Chooser for PresetChooser {
    async fn choose(&self, prompt: ChoicePrompt) -> Option<Choice> {
        let answer = self.answer.as_ref()?;
        Some(Choice {
            label: prompt.labels.and(answer.label.clone()),
            directory: prompt.directories.and(answer.directory.clone()),
        })
    }
}
