use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use seltrans_config::Config;
use seltrans_config::translator::TranslatorConfig;
use seltrans_gateway::Gateway;
use seltrans_translator::{HttpTranslator, Provider, Translator};
use seltrans_types::Size;
use seltrans_watcher::{HeadlessPage, SharedPage};
use tokio::io::BufReader;
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod controller;
pub mod io;
pub mod state;


use self::controller::AppController;
use self::state::AppState;

/// Select text, click the trigger, read the translation.
///
/// Host page events are read from stdin, one JSON object per line.
#[derive(Parser, Debug)]
#[command(name = "seltrans", version)]
struct Cli {
    /// JSON profile to load instead of the built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Translation provider: mymemory, google or lingva
    #[arg(long)]
    provider: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// How long to keep running after input ends [default: request timeout]
    #[arg(long)]
    linger_ms: Option<u64>,

    #[arg(long, default_value_t = 1280.0)]
    viewport_width: f64,

    #[arg(long, default_value_t = 800.0)]
    viewport_height: f64,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.with_ansi(atty::is(atty::Stream::Stderr)).init();
    }
}

fn build_translator(config: &TranslatorConfig) -> anyhow::Result<Arc<dyn Translator>> {
    let provider: Provider = config.provider.parse()?;
    let translator = HttpTranslator::new(
        provider,
        config.api_url.clone(),
        Duration::from_millis(config.timeout_ms),
    )?;
    tracing::info!(%provider, "Translator ready");
    Ok(Arc::new(translator))
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(cli));
    // A pending stdin read parks a blocking thread; don't wait for it
    runtime.shutdown_timeout(Duration::from_millis(250));
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(provider) = cli.provider {
        config.translator.provider = provider;
    }

    let translator = build_translator(&config.translator)?;
    let gateway = Arc::new(Gateway::new(
        translator,
        config.translator.from_lang.clone(),
        config.translator.to_lang.clone(),
        config.messages.clone(),
    ));

    let linger = Duration::from_millis(cli.linger_ms.unwrap_or(config.watcher.request_timeout_ms));
    let runtime_capacity = config.channel_capacity;
    let page = SharedPage::new(HeadlessPage::new(Size::new(
        cli.viewport_width,
        cli.viewport_height,
    )));
    let state = Arc::new(AppState::new(config, page));

    let mut controller = AppController::new(state, runtime_capacity);
    let mut tasks = controller
        .spawn_tasks(gateway, BufReader::new(tokio::io::stdin()), linger)
        .await?;

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::info!("Task finished, shutting down"),
                Ok(Err(e)) => tracing::error!("Task failed: {e:#}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        if let Ok(Err(e)) = result {
            tracing::warn!("Task exited with error during shutdown: {e:#}");
        }
    }

    Ok(())
}
