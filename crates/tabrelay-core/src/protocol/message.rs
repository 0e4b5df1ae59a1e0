//! Wire messages between the coordinator and the in-page capability.
//!
//! One request, one response per attempt. There is no streaming and no
//! partial response.

use serde::{Deserialize, Serialize};

/// Request sent to the capability hosted inside the target tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RemoteRequest {
    #[serde(
        rename = "SUBMIT_REQUEST",
        alias = "AUTO_SUBMIT_PROMPT",
        alias = "AUTO_SUBMIT_GEMINI_PROMPT"
    )]
    Submit {
        #[serde(rename = "promptText", alias = "prompt", default)]
        prompt_text: String,
    },
}

impl RemoteRequest {
    pub fn submit(prompt_text: impl Into<String>) -> Self {
        RemoteRequest::Submit {
            prompt_text: prompt_text.into(),
        }
    }

    pub fn prompt_text(&self) -> &str {
        match self {
            RemoteRequest::Submit { prompt_text } => prompt_text,
        }
    }
}

/// Chat application detected by the capability from the page host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gpt,
    Claude,
    Gemini,
    Generic,
}

impl Provider {
    pub fn detect(hostname: &str) -> Self {
        let host = hostname.to_ascii_lowercase();
        if host.contains("chatgpt.com") {
            Provider::Gpt
        } else if host.contains("claude.ai") {
            Provider::Claude
        } else if host.contains("gemini.google.com") {
            Provider::Gemini
        } else {
            Provider::Generic
        }
    }

    /// Whether the Enter fallback needs the platform modifier held.
    pub fn wants_modified_enter(self) -> bool {
        matches!(self, Provider::Gpt | Provider::Claude)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub ok: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
}

impl SubmitResponse {
    pub fn ok(provider: Provider) -> Self {
        Self {
            ok: true,
            reason: None,
            provider: Some(provider),
        }
    }

    pub fn failed(reason: impl Into<String>, provider: Option<Provider>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
            provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_kind_tag() {
        let v = serde_json::to_value(RemoteRequest::submit("hi")).unwrap();
        assert_eq!(v, serde_json::json!({"kind": "SUBMIT_REQUEST", "promptText": "hi"}));
    }

    #[test]
    fn legacy_request_shape_is_accepted() {
        let req: RemoteRequest =
            serde_json::from_str(r#"{"kind":"AUTO_SUBMIT_PROMPT","prompt":"p"}"#).unwrap();
        assert_eq!(req.prompt_text(), "p");
    }

    #[test]
    fn response_without_reason_parses() {
        let resp: SubmitResponse =
            serde_json::from_str(r#"{"ok":true,"provider":"gemini"}"#).unwrap();
        assert_eq!(resp, SubmitResponse::ok(Provider::Gemini));
    }

    #[test]
    fn provider_detection_by_host() {
        assert_eq!(Provider::detect("chatgpt.com"), Provider::Gpt);
        assert_eq!(Provider::detect("CLAUDE.AI"), Provider::Claude);
        assert_eq!(Provider::detect("gemini.google.com"), Provider::Gemini);
        assert_eq!(Provider::detect("example.org"), Provider::Generic);
        assert!(Provider::Gpt.wants_modified_enter());
        assert!(!Provider::Gemini.wants_modified_enter());
    }
}
