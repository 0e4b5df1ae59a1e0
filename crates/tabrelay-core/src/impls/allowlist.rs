//! HostAllowlist - URL 分類のデフォルト実装

use url::Url;

use crate::ports::UrlClassifier;

pub const SUPPORTED_VIDEO_HOSTS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "vimeo.com",
    "twitch.tv",
    "dailymotion.com",
];

pub const SUPPORTED_AI_HOSTS: &[&str] = &["gemini.google.com", "chatgpt.com", "claude.ai"];

/// Host-based classifier.
///
/// Sources: http(s) only, host equal to or a subdomain of an allowed video
/// host. Targets: host containing one of the chat application hosts.
#[derive(Debug, Clone)]
pub struct HostAllowlist {
    video_hosts: Vec<String>,
    ai_hosts: Vec<String>,
}

impl HostAllowlist {
    pub fn new<V, A>(video_hosts: V, ai_hosts: A) -> Self
    where
        V: IntoIterator,
        V::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            video_hosts: video_hosts.into_iter().map(Into::into).collect(),
            ai_hosts: ai_hosts.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for HostAllowlist {
    fn default() -> Self {
        Self::new(
            SUPPORTED_VIDEO_HOSTS.iter().copied(),
            SUPPORTED_AI_HOSTS.iter().copied(),
        )
    }
}

fn host_of(raw: &str) -> Option<(String, String)> {
    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();
    Some((url.scheme().to_string(), host))
}

impl UrlClassifier for HostAllowlist {
    fn is_source(&self, url: &str) -> bool {
        let Some((scheme, host)) = host_of(url) else {
            return false;
        };
        if scheme != "http" && scheme != "https" {
            return false;
        }
        self.video_hosts
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{d}")))
    }

    fn is_target(&self, url: &str) -> bool {
        let Some((_, host)) = host_of(url) else {
            return false;
        };
        self.ai_hosts.iter().any(|d| host.contains(d.as_str()))
    }
}
