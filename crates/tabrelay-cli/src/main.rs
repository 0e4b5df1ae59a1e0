use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, sleep};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tabrelay_core::app::{AppBuilder, EventLoop, SUMMARY_COMMAND};
use tabrelay_core::config::CoordinatorConfig;
use tabrelay_core::domain::{
    BrowserEvent, HandoffError, Notification, NotificationId, Settings, TabId,
};
use tabrelay_core::impls::{
    FakeTabs, InMemoryTaskStore, JsonFileTaskStore, PageBridge, ScriptedSurface, StaticSettings,
};
use tabrelay_core::ports::{NotificationSink, TaskStore};
use tabrelay_core::protocol::CapabilityTiming;

const VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
const ARTICLE_URL: &str = "https://example.com/news/article";

#[derive(Parser, Debug)]
#[command(name = "tabrelay", about = "Hand a rendered prompt from a video tab to a chat tab")]
struct Cli {
    /// Default log filter when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    /// TOML file with `[coordinator]` and `[settings]` tables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    max_retry: Option<u32>,
    #[arg(long, global = true)]
    retry_interval_ms: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run trigger -> open tab -> auto-submit against a scripted browser.
    Demo {
        /// Number of submit attempts that find no listening page script.
        #[arg(long, default_value_t = 1)]
        fail_first: u32,
        /// Input probes the page needs before its composer shows up.
        #[arg(long, default_value_t = 2)]
        composer_after: u32,
        /// Trigger from a page that is not a supported video site.
        #[arg(long, default_value_t = false)]
        unsupported: bool,
        /// Close the target tab this many ms after the trigger.
        #[arg(long)]
        close_after_ms: Option<u64>,
        /// Persist pending tasks to this JSON file instead of memory.
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// List pending tasks persisted in a store file.
    Pending {
        #[arg(long)]
        store: PathBuf,
    },
    /// Drop the pending task of one target tab.
    Forget {
        #[arg(long)]
        store: PathBuf,
        tab_id: TabId,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    coordinator: CoordinatorConfig,
    settings: Option<Settings>,
}

impl FileConfig {
    fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Prints notifications to stdout.
#[derive(Default)]
struct ConsoleSink {
    shown: AtomicUsize,
}

#[async_trait]
impl NotificationSink for ConsoleSink {
    async fn show(&self, notification: &Notification) -> Result<(), HandoffError> {
        self.shown.fetch_add(1, Ordering::SeqCst);
        let target = notification
            .target_tab
            .map(|t| format!(" (tab {t})"))
            .unwrap_or_default();
        println!(
            "[{}] {}: {}{}  [{} | {}]",
            notification.id,
            notification.title,
            notification.message,
            target,
            notification.buttons[0],
            notification.buttons[1]
        );
        Ok(())
    }

    async fn clear(&self, id: NotificationId) {
        println!("[{id}] cleared");
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let file = FileConfig::load(cli.config.as_deref())?;
    let mut coordinator = file.coordinator;
    if let Some(max_retry) = cli.max_retry {
        coordinator.max_retry = max_retry;
    }
    if let Some(interval) = cli.retry_interval_ms {
        coordinator.retry_interval_ms = interval;
    }
    let settings = file.settings.unwrap_or_default();

    match cli.command {
        Command::Demo {
            fail_first,
            composer_after,
            unsupported,
            close_after_ms,
            store,
        } => {
            let demo = Demo {
                fail_first,
                composer_after,
                unsupported,
                close_after_ms,
                store,
            };
            run_demo(coordinator, settings, demo).await
        }
        Command::Pending { store } => list_pending(&store).await,
        Command::Forget { store, tab_id } => forget(&store, tab_id).await,
    }
}

struct Demo {
    fail_first: u32,
    composer_after: u32,
    unsupported: bool,
    close_after_ms: Option<u64>,
    store: Option<PathBuf>,
}

async fn run_demo(config: CoordinatorConfig, settings: Settings, demo: Demo) -> Result<()> {
    let Demo {
        fail_first,
        composer_after,
        unsupported,
        close_after_ms,
        store: store_path,
    } = demo;
    let store: Arc<dyn TaskStore> = match store_path {
        Some(path) => Arc::new(JsonFileTaskStore::new(path)),
        None => Arc::new(InMemoryTaskStore::new()),
    };
    let source_url = if unsupported { ARTICLE_URL } else { VIDEO_URL };
    let tabs = Arc::new(FakeTabs::with_active(source_url));
    let bridge = Arc::new(PageBridge::default());
    let sink = Arc::new(ConsoleSink::default());

    let app = AppBuilder::new()
        .store(Arc::clone(&store))
        .remote(bridge.clone())
        .tabs(tabs.clone())
        .sink(sink.clone())
        .settings(Arc::new(StaticSettings::new(settings)))
        .config(config.clone())
        .build()?;

    let (tx, rx) = mpsc::channel(64);
    tabs.emit_to(tx.clone());
    let event_loop = EventLoop::spawn(app.coordinator, app.router, rx);

    // The page script starts listening halfway between attempt `fail_first - 1`
    // and attempt `fail_first`, so exactly `fail_first` attempts go undelivered.
    let target = tabs.next_tab_id();
    let surface = Arc::new(
        ScriptedSurface::new("gemini.google.com").input_ready_after(composer_after),
    );
    let interval = config.retry_policy().interval;
    let attach_after = (interval * fail_first).saturating_sub(interval / 2);
    if fail_first == 0 {
        bridge.attach(target, surface.clone()).await;
    } else {
        let bridge = bridge.clone();
        let surface = surface.clone();
        tokio::spawn(async move {
            sleep(attach_after).await;
            info!(tab_id = %target, "page script listening");
            bridge.attach(target, surface).await;
        });
    }

    info!(source = source_url, fail_first, "sending trigger");
    tx.send(BrowserEvent::Command {
        name: SUMMARY_COMMAND.to_string(),
    })
    .await
    .context("event loop stopped before the trigger")?;

    if let Some(ms) = close_after_ms {
        let tabs = tabs.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(ms)).await;
            if let Some(opened) = tabs.opened().first() {
                println!("closing target tab {}", opened.id);
                tabs.close(opened.id);
            }
        });
    }

    let started = Instant::now();
    let deadline = started
        + config.retry_policy().worst_case_span()
        + CapabilityTiming::default().input_wait
        + config.success_notify_delay()
        + Duration::from_secs(1);
    let closed_at = close_after_ms.map(|ms| started + Duration::from_millis(ms));
    while Instant::now() < deadline {
        if sink.shown.load(Ordering::SeqCst) > 0 {
            break;
        }
        // a closed tab ends silently: stop once its task is gone
        if closed_at.is_some_and(|at| Instant::now() > at) && store.list().await?.is_empty() {
            break;
        }
        sleep(Duration::from_millis(100)).await;
    }

    event_loop.shutdown_and_join().await;
    println!(
        "composer probes: {}, send clicks: {}, pending tasks left: {}",
        surface.input_probes(),
        surface.clicks(),
        store.list().await?.len()
    );
    Ok(())
}

async fn list_pending(path: &Path) -> Result<()> {
    let store = JsonFileTaskStore::new(path);
    let tasks = store.list().await?;
    if tasks.is_empty() {
        println!("no pending tasks in {}", path.display());
        return Ok(());
    }
    for task in tasks {
        println!("{}", serde_json::to_string(&task)?);
    }
    Ok(())
}

async fn forget(path: &Path, tab_id: TabId) -> Result<()> {
    let store = JsonFileTaskStore::new(path);
    if store.delete(tab_id).await? {
        println!("removed pending task for tab {tab_id}");
    } else {
        println!("no pending task for tab {tab_id}");
    }
    Ok(())
}
