use crate::domain::{HandoffError, Settings};

/// Turns a video URL plus settings into the prompt text.
pub trait PromptRenderer: Send + Sync {
    fn render(&self, video_url: &str, settings: &Settings) -> Result<String, HandoffError>;
}
