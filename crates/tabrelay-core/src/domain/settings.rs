//! User settings consumed at trigger time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::locale::Locale;

/// Chat assistant the prompt is handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiTarget {
    #[default]
    Gemini,
    Gpt,
    Claude,
}

impl AiTarget {
    pub fn app_url(self) -> &'static str {
        match self {
            AiTarget::Gemini => "https://gemini.google.com/app",
            AiTarget::Gpt => "https://chatgpt.com/",
            AiTarget::Claude => "https://claude.ai/chats",
        }
    }
}

pub const DEFAULT_SUMMARY_LANGUAGE: &str = "English";

fn default_language() -> String {
    DEFAULT_SUMMARY_LANGUAGE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_language")]
    pub summary_language: String,

    #[serde(default)]
    pub short_summary: bool,

    /// Open the target tab in the foreground instead of the background.
    #[serde(default)]
    pub open_page_immediately: bool,

    /// Custom prompt templates keyed by summary language.
    #[serde(default)]
    pub custom_prompts: HashMap<String, String>,

    #[serde(default)]
    pub ai_target: AiTarget,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            summary_language: default_language(),
            short_summary: false,
            open_page_immediately: false,
            custom_prompts: HashMap::new(),
            ai_target: AiTarget::default(),
        }
    }
}

impl Settings {
    pub fn locale(&self) -> Locale {
        Locale::from_language(&self.summary_language)
    }

    pub fn custom_prompt(&self) -> Option<&str> {
        self.custom_prompts
            .get(&self.summary_language)
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let s: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.ai_target.app_url(), "https://gemini.google.com/app");
        assert_eq!(s.locale(), Locale::En);
    }

    #[test]
    fn custom_prompt_is_looked_up_by_language() {
        let s: Settings = serde_json::from_value(serde_json::json!({
            "summaryLanguage": "Korean",
            "customPrompts": { "Korean": "요약: {videoUrl}", "English": "sum {videoUrl}" },
            "aiTarget": "claude"
        }))
        .unwrap();
        assert_eq!(s.custom_prompt(), Some("요약: {videoUrl}"));
        assert_eq!(s.locale(), Locale::Ko);
        assert_eq!(s.ai_target, AiTarget::Claude);
    }
}
