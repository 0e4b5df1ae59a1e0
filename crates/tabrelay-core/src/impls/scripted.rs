//! Scripted collaborators for tests and the CLI demo.
//!
//! - `ScriptedRemote`: replays a queue of submit results
//! - `RecordingSink`: keeps every notification shown
//! - `FakeTabs`: an in-memory tab strip that can emit browser events
//! - `ScriptedSurface`: a chat page whose composer shows up after N probes

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::domain::{
    BrowserEvent, HandoffError, Notification, NotificationId, TabId, TabInfo, TabStatus,
};
use crate::ports::{NotificationSink, RemoteSubmitter, TabHost};
use crate::protocol::{ComposerSurface, DeliveryError, Provider, RemoteRequest, SubmitResponse};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

type SubmitResult = Result<SubmitResponse, DeliveryError>;

/// One recorded call to [`ScriptedRemote::submit`].
#[derive(Debug, Clone)]
pub struct RemoteCall {
    pub tab: TabId,
    pub prompt: String,
    pub at: Instant,
}

pub struct ScriptedRemote {
    script: Mutex<VecDeque<SubmitResult>>,
    fallback: SubmitResult,
    latency: Duration,
    calls: Mutex<Vec<RemoteCall>>,
}

impl ScriptedRemote {
    /// Answers `fallback` once the script is used up.
    pub fn new(fallback: SubmitResult) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn always_ok() -> Self {
        Self::new(Ok(SubmitResponse::ok(Provider::Gemini)))
    }

    pub fn always_failing() -> Self {
        Self::new(Ok(SubmitResponse::failed("composer_not_found", None)))
    }

    /// Fail `n` times (alternating rejection and missing receiver), then succeed.
    pub fn failing_first(n: usize) -> Self {
        let remote = Self::always_ok();
        for i in 0..n {
            let failure = if i % 2 == 0 {
                Err(DeliveryError::NoReceiver)
            } else {
                Ok(SubmitResponse::failed("composer_not_found", None))
            };
            remote.push(failure);
        }
        remote
    }

    pub fn then(self, result: SubmitResult) -> Self {
        self.push(result);
        self
    }

    /// Delay every answer by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn push(&self, result: SubmitResult) {
        lock(&self.script).push_back(result);
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

#[async_trait]
impl RemoteSubmitter for ScriptedRemote {
    async fn submit(&self, tab: TabId, request: RemoteRequest) -> SubmitResult {
        lock(&self.calls).push(RemoteCall {
            tab,
            prompt: request.prompt_text().to_string(),
            at: Instant::now(),
        });
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let next = lock(&self.script).pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    shown: Mutex<Vec<Notification>>,
    cleared: Mutex<Vec<NotificationId>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<Notification> {
        lock(&self.shown).clone()
    }

    pub fn cleared(&self) -> Vec<NotificationId> {
        lock(&self.cleared).clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn show(&self, notification: &Notification) -> Result<(), HandoffError> {
        lock(&self.shown).push(notification.clone());
        Ok(())
    }

    async fn clear(&self, id: NotificationId) {
        lock(&self.cleared).push(id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedTab {
    pub id: TabId,
    pub url: String,
    pub active: bool,
}

#[derive(Default)]
struct TabStrip {
    next_id: u64,
    tabs: BTreeMap<TabId, TabInfo>,
    active: Option<TabId>,
    opened: Vec<OpenedTab>,
    focused: Vec<TabId>,
    open_error: Option<String>,
}

/// In-memory browser tabs.
///
/// With an event channel attached, opening a tab emits `loading` then
/// `complete` updates, and [`FakeTabs::close`] emits a removal.
pub struct FakeTabs {
    strip: Mutex<TabStrip>,
    events: Mutex<Option<mpsc::Sender<BrowserEvent>>>,
}

impl FakeTabs {
    pub fn new() -> Self {
        Self {
            strip: Mutex::new(TabStrip {
                next_id: 100,
                ..TabStrip::default()
            }),
            events: Mutex::new(None),
        }
    }

    /// Start with one active tab showing `url`.
    pub fn with_active(url: impl Into<String>) -> Self {
        let tabs = Self::new();
        {
            let mut strip = lock(&tabs.strip);
            let id = TabId::new(1);
            strip.tabs.insert(id, TabInfo::new(id, url));
            strip.active = Some(id);
        }
        tabs
    }

    pub fn emit_to(&self, tx: mpsc::Sender<BrowserEvent>) {
        *lock(&self.events) = Some(tx);
    }

    /// Id the next `open_tab` call will hand out.
    pub fn next_tab_id(&self) -> TabId {
        TabId::new(lock(&self.strip).next_id)
    }

    /// Make the next `open_tab` calls fail with `message`.
    pub fn fail_open(&self, message: impl Into<String>) {
        lock(&self.strip).open_error = Some(message.into());
    }

    pub fn opened(&self) -> Vec<OpenedTab> {
        lock(&self.strip).opened.clone()
    }

    pub fn focused(&self) -> Vec<TabId> {
        lock(&self.strip).focused.clone()
    }

    /// The user closes `id`.
    pub fn close(&self, id: TabId) {
        {
            let mut strip = lock(&self.strip);
            strip.tabs.remove(&id);
            if strip.active == Some(id) {
                strip.active = None;
            }
        }
        self.emit(vec![BrowserEvent::TabRemoved { tab_id: id }]);
    }

    fn emit(&self, events: Vec<BrowserEvent>) {
        let Some(tx) = lock(&self.events).clone() else {
            return;
        };
        tokio::spawn(async move {
            for event in events {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        });
    }
}

impl Default for FakeTabs {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TabHost for FakeTabs {
    async fn active_tab(&self) -> Result<Option<TabInfo>, HandoffError> {
        let strip = lock(&self.strip);
        Ok(strip.active.and_then(|id| strip.tabs.get(&id).cloned()))
    }

    async fn open_tab(&self, url: &str, activate: bool) -> Result<TabInfo, HandoffError> {
        let info = {
            let mut strip = lock(&self.strip);
            if let Some(message) = strip.open_error.clone() {
                return Err(HandoffError::Browser(message));
            }
            let id = TabId::new(strip.next_id);
            strip.next_id += 1;
            let info = TabInfo::new(id, url);
            strip.tabs.insert(id, info.clone());
            strip.opened.push(OpenedTab {
                id,
                url: url.to_string(),
                active: activate,
            });
            if activate {
                strip.active = Some(id);
            }
            info
        };

        if let Some(id) = info.id {
            self.emit(vec![
                BrowserEvent::TabUpdated {
                    tab_id: id,
                    status: TabStatus::Loading,
                    url: None,
                },
                BrowserEvent::TabUpdated {
                    tab_id: id,
                    status: TabStatus::Complete,
                    url: Some(url.to_string()),
                },
            ]);
        }
        Ok(info)
    }

    async fn get_tab(&self, id: TabId) -> Result<Option<TabInfo>, HandoffError> {
        Ok(lock(&self.strip).tabs.get(&id).cloned())
    }

    async fn focus_tab(&self, id: TabId) -> Result<(), HandoffError> {
        let mut strip = lock(&self.strip);
        if !strip.tabs.contains_key(&id) {
            return Err(HandoffError::Browser(format!("no tab with id {id}")));
        }
        strip.active = Some(id);
        strip.focused.push(id);
        Ok(())
    }
}

#[derive(Default)]
struct SurfaceState {
    input_probes: u32,
    send_probes: u32,
    clicks: u32,
    enter_presses: Vec<bool>,
    injected: Option<String>,
}

/// A chat page whose composer and send button appear after a number of probes.
pub struct ScriptedSurface {
    hostname: String,
    input_ready_after: Option<u32>,
    send_ready_after: Option<u32>,
    state: Mutex<SurfaceState>,
}

impl ScriptedSurface {
    /// Input and send button are available immediately.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            input_ready_after: Some(0),
            send_ready_after: Some(0),
            state: Mutex::new(SurfaceState::default()),
        }
    }

    /// Input appears on probe number `probes` (0-based).
    pub fn input_ready_after(mut self, probes: u32) -> Self {
        self.input_ready_after = Some(probes);
        self
    }

    pub fn input_never(mut self) -> Self {
        self.input_ready_after = None;
        self
    }

    pub fn send_ready_after(mut self, probes: u32) -> Self {
        self.send_ready_after = Some(probes);
        self
    }

    pub fn send_never(mut self) -> Self {
        self.send_ready_after = None;
        self
    }

    pub fn input_probes(&self) -> u32 {
        lock(&self.state).input_probes
    }

    pub fn clicks(&self) -> u32 {
        lock(&self.state).clicks
    }

    pub fn enter_presses(&self) -> Vec<bool> {
        lock(&self.state).enter_presses.clone()
    }

    pub fn injected(&self) -> Option<String> {
        lock(&self.state).injected.clone()
    }
}

#[async_trait]
impl ComposerSurface for ScriptedSurface {
    fn hostname(&self) -> String {
        self.hostname.clone()
    }

    async fn inject_prompt(&self, _provider: Provider, prompt: &str) -> bool {
        let mut state = lock(&self.state);
        let probe = state.input_probes;
        state.input_probes += 1;
        match self.input_ready_after {
            Some(ready) if probe >= ready => {
                state.injected = Some(prompt.to_string());
                true
            }
            _ => false,
        }
    }

    async fn click_send(&self, _provider: Provider) -> bool {
        let mut state = lock(&self.state);
        let probe = state.send_probes;
        state.send_probes += 1;
        match self.send_ready_after {
            Some(ready) if probe >= ready => {
                state.clicks += 1;
                true
            }
            _ => false,
        }
    }

    async fn press_enter(&self, with_modifier: bool) {
        lock(&self.state).enter_presses.push(with_modifier);
    }
}
