/// Domain allowlist checks for source and target pages.
pub trait UrlClassifier: Send + Sync {
    /// May the user trigger a summary from this page?
    fn is_source(&self, url: &str) -> bool;

    /// Is this page the chat application that receives prompts?
    fn is_target(&self, url: &str) -> bool;
}
