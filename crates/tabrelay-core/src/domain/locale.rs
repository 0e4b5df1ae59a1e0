//! Locale and the user-facing message catalog.

use serde::{Deserialize, Serialize};

/// Wording used for notifications. Carried on each pending task, never
/// interpreted by the coordinator itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ko,
}

impl Locale {
    /// Maps the configured summary language onto a notification locale.
    pub fn from_language(language: &str) -> Self {
        if language == "Korean" {
            Locale::Ko
        } else {
            Locale::En
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ko => "ko",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    AppTitle,
    SummaryDoneTitle,
    ButtonOk,
    ButtonMove,
    UnsupportedUrl,
    AutoSubmitFailed,
    Submitted,
    ProcessingError,
}

pub fn message(locale: Locale, key: MessageKey) -> &'static str {
    match locale {
        Locale::En => english(key),
        Locale::Ko => korean(key),
    }
}

/// Looks up `key` and substitutes `{name}` placeholders from `vars`.
pub fn format_message(locale: Locale, key: MessageKey, vars: &[(&str, &str)]) -> String {
    let mut text = message(locale, key).to_string();
    for (name, value) in vars {
        text = text.replacen(&format!("{{{name}}}"), value, 1);
    }
    text
}

fn english(key: MessageKey) -> &'static str {
    match key {
        MessageKey::AppTitle => "Video Summary Extension",
        MessageKey::SummaryDoneTitle => "Summary Request Sent",
        MessageKey::ButtonOk => "OK",
        MessageKey::ButtonMove => "Go to tab",
        MessageKey::UnsupportedUrl => {
            "This works only on supported video URLs (YouTube/Vimeo, etc.)."
        }
        MessageKey::AutoSubmitFailed => {
            "Automatic input failed. Move to the tab and paste manually."
        }
        MessageKey::Submitted => "Summary prompt was submitted.",
        MessageKey::ProcessingError => "An error occurred: {error}",
    }
}

fn korean(key: MessageKey) -> &'static str {
    match key {
        MessageKey::AppTitle => "Video Summary Extension",
        MessageKey::SummaryDoneTitle => "요약 요청 완료",
        MessageKey::ButtonOk => "확인",
        MessageKey::ButtonMove => "해당 탭으로 이동",
        MessageKey::UnsupportedUrl => {
            "지원되는 영상 URL(YouTube/Vimeo 등)에서만 사용할 수 있습니다."
        }
        MessageKey::AutoSubmitFailed => {
            "자동 입력에 실패했습니다. 탭으로 이동해 수동으로 붙여넣어 주세요."
        }
        MessageKey::Submitted => "요약 요청을 전송했습니다.",
        MessageKey::ProcessingError => "처리 중 오류가 발생했습니다: {error}",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Korean", Locale::Ko)]
    #[case("English", Locale::En)]
    #[case("Japanese", Locale::En)]
    #[case("", Locale::En)]
    fn locale_follows_summary_language(#[case] language: &str, #[case] expected: Locale) {
        assert_eq!(Locale::from_language(language), expected);
    }

    #[test]
    fn processing_error_substitutes_placeholder() {
        let text = format_message(
            Locale::En,
            MessageKey::ProcessingError,
            &[("error", "boom")],
        );
        assert_eq!(text, "An error occurred: boom");

        let text = format_message(Locale::Ko, MessageKey::ProcessingError, &[("error", "x")]);
        assert!(text.ends_with(": x"));
    }

    #[test]
    fn locale_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Locale::Ko).unwrap(), "\"ko\"");
        assert_eq!(Locale::Ko.code(), "ko");
    }
}
