//! Inner retry layer: what the in-page capability does for one request.
//!
//! Polls for an input surface, injects the prompt, waits briefly, then
//! prefers clicking a real send button over a synthetic Enter key. This loop
//! is bounded on its own (about 30s) and sits underneath the retry driver's
//! attempt counter.

use std::time::Duration;

use async_trait::async_trait;

use super::message::{Provider, SubmitResponse};

/// DOM-level operations the capability needs from the hosting page.
#[async_trait]
pub trait ComposerSurface: Send + Sync {
    fn hostname(&self) -> String;

    /// Locate the prompt input and inject `prompt` so the page's reactivity
    /// notices. `false` when no usable input exists yet.
    async fn inject_prompt(&self, provider: Provider, prompt: &str) -> bool;

    /// Click an enabled send button, if one is present.
    async fn click_send(&self, provider: Provider) -> bool;

    /// Synthetic Enter on the input, with the platform modifier when asked.
    async fn press_enter(&self, with_modifier: bool);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityTiming {
    pub input_wait: Duration,
    pub input_poll: Duration,
    pub settle: Duration,
    pub send_attempts: u32,
    pub send_poll: Duration,
}

impl Default for CapabilityTiming {
    fn default() -> Self {
        Self {
            input_wait: Duration::from_secs(30),
            input_poll: Duration::from_millis(500),
            settle: Duration::from_millis(250),
            send_attempts: 16,
            send_poll: Duration::from_millis(200),
        }
    }
}

impl CapabilityTiming {
    fn input_steps(&self) -> u128 {
        let poll = self.input_poll.as_millis();
        if poll == 0 {
            return 1;
        }
        (self.input_wait.as_millis() / poll).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SendPath {
    Clicked,
    KeyFallback,
}

/// Handle one submit request against `surface`.
pub async fn run_capability(
    surface: &dyn ComposerSurface,
    prompt: &str,
    timing: &CapabilityTiming,
) -> SubmitResponse {
    let provider = Provider::detect(&surface.hostname());

    for _ in 0..timing.input_steps() {
        if surface.inject_prompt(provider, prompt).await {
            tokio::time::sleep(timing.settle).await;
            let path = press_send(surface, provider, timing).await;
            tracing::debug!(?provider, ?path, "prompt sent by capability");
            return SubmitResponse::ok(provider);
        }
        tokio::time::sleep(timing.input_poll).await;
    }

    SubmitResponse::failed("composer_not_found", Some(provider))
}

async fn press_send(
    surface: &dyn ComposerSurface,
    provider: Provider,
    timing: &CapabilityTiming,
) -> SendPath {
    for _ in 0..timing.send_attempts {
        if surface.click_send(provider).await {
            return SendPath::Clicked;
        }
        tokio::time::sleep(timing.send_poll).await;
    }
    surface.press_enter(provider.wants_modified_enter()).await;
    SendPath::KeyFallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::ScriptedSurface;

    #[tokio::test(start_paused = true)]
    async fn waits_for_input_then_clicks_send() {
        let surface = ScriptedSurface::new("gemini.google.com")
            .input_ready_after(3)
            .send_ready_after(2);

        let resp = run_capability(&surface, "hello", &CapabilityTiming::default()).await;

        assert_eq!(resp, SubmitResponse::ok(Provider::Gemini));
        assert_eq!(surface.injected().as_deref(), Some("hello"));
        assert_eq!(surface.clicks(), 1);
        assert_eq!(surface.enter_presses(), Vec::<bool>::new());
    }

    #[tokio::test(start_paused = true)]
    async fn falls_back_to_enter_when_no_button() {
        let surface = ScriptedSurface::new("chatgpt.com").send_never();
        let timing = CapabilityTiming::default();

        let started = tokio::time::Instant::now();
        let resp = run_capability(&surface, "x", &timing).await;

        assert!(resp.ok);
        assert_eq!(resp.provider, Some(Provider::Gpt));
        assert_eq!(surface.clicks(), 0);
        assert_eq!(surface.enter_presses(), vec![true]);
        assert!(started.elapsed() >= timing.settle + timing.send_poll * 16);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_when_input_never_appears() {
        let surface = ScriptedSurface::new("claude.ai").input_never();
        let timing = CapabilityTiming {
            input_wait: Duration::from_secs(2),
            ..CapabilityTiming::default()
        };

        let resp = run_capability(&surface, "x", &timing).await;

        assert!(!resp.ok);
        assert_eq!(resp.reason.as_deref(), Some("composer_not_found"));
        assert_eq!(surface.input_probes(), 4);
    }
}
