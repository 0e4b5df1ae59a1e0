//! TemplateRenderer - デフォルトのプロンプト生成

use crate::domain::{HandoffError, Settings};
use crate::ports::PromptRenderer;

pub const VIDEO_URL_PLACEHOLDER: &str = "{videoUrl}";

/// Renders the custom template for the summary language, or the built-in
/// default, replacing every `{videoUrl}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn default_template(language: &str, short_summary: bool) -> String {
        let short_line = if short_summary {
            "Keep it short and focused in 3-5 bullet points."
        } else {
            "Provide enough detail to understand key ideas."
        };

        if language == "Korean" {
            return [
                "다음 영상 URL을 요약해 주세요: {videoUrl}",
                "",
                "반드시 한국어로 답변해 주세요.",
                short_line,
                "아래 형식으로 작성해 주세요:",
                "1) 전체 요약",
                "2) 핵심 포인트",
                "3) 실천 가능한 인사이트",
                "4) 추론한 내용이 있으면 명확히 표시",
            ]
            .join("\n");
        }

        [
            "Summarize the video from this URL: {videoUrl}".to_string(),
            String::new(),
            format!("Write the full response in {language}."),
            short_line.to_string(),
            "Please include:".to_string(),
            "1) A concise overall summary".to_string(),
            "2) Key points as bullet points".to_string(),
            "3) Actionable takeaways".to_string(),
            "4) If something is inferred, clearly state it".to_string(),
        ]
        .join("\n")
    }
}

impl PromptRenderer for TemplateRenderer {
    fn render(&self, video_url: &str, settings: &Settings) -> Result<String, HandoffError> {
        if video_url.is_empty() {
            return Err(HandoffError::Prompt("empty video url".into()));
        }
        let template = match settings.custom_prompt() {
            Some(custom) => custom.to_string(),
            None => Self::default_template(&settings.summary_language, settings.short_summary),
        };
        Ok(template.replace(VIDEO_URL_PLACEHOLDER, video_url))
    }
}
