use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use conductor::actions::{ActionBackend, DryRunBackend, SystemActions};
use conductor::kernel::event::{Event, InputEvent};
use conductor::kernel::{InterruptSignal, KernelConfig, TurnOrchestrator};
use conductor::memory::ShortTermMemory;
use conductor::nlp::{HeuristicExtractor, KeywordClassifier};
use conductor::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // 1. Setup Logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    // 2. Config
    let config = match std::env::var("CONDUCTOR_CONFIG") {
        Ok(path) => KernelConfig::from_json_file(&path)
            .with_context(|| format!("loading config from {path}"))?,
        Err(_) => KernelConfig::default(),
    };
    tracing::info!(?config, "Conductor booting...");

    // 3. Kernel + Session
    let signal = InterruptSignal::new();
    let backend: Box<dyn ActionBackend> = if config.safe_mode {
        tracing::warn!("safe mode: actions are not executed");
        Box::new(DryRunBackend)
    } else {
        Box::new(SystemActions::new())
    };
    let orchestrator = TurnOrchestrator::new(
        config,
        Box::new(HeuristicExtractor::new()),
        backend,
        signal.clone(),
    );
    let mut session = Session::new(
        Box::new(KeywordClassifier::new()),
        orchestrator,
        Box::new(ShortTermMemory::new()),
    );

    let (tx, mut rx) = mpsc::channel::<Event>(100);
    let shutdown = CancellationToken::new();

    // 4. Spawn Input Reader (Stdin)
    let tx_input = tx.clone();
    let reader_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("Type a command, 'help' for ideas, or 'exit' to leave.");

        loop {
            let line = tokio::select! {
                _ = reader_shutdown.cancelled() => break,
                line = lines.next_line() => line,
            };
            let event = match line {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => Event::Input(InputEvent::text("console", &line)),
                Ok(None) => Event::Eof,
                Err(e) => {
                    tracing::error!("Failed to read input: {}", e);
                    Event::Eof
                }
            };
            let eof = event == Event::Eof;
            if tx_input.send(event).await.is_err() || eof {
                break;
            }
        }
    });

    // 5. Ctrl+C raises the interrupt from outside the turn loop
    let interrupt_shutdown = shutdown.clone();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = interrupt_shutdown.cancelled() => break,
                res = tokio::signal::ctrl_c() => {
                    if res.is_err() {
                        break;
                    }
                    tracing::warn!("Interrupt received");
                    signal.trigger();
                    if tx.send(Event::Interrupt).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // 6. Run Session
    tracing::info!("Session loop active. Press Ctrl+C to cancel the current request.");
    while let Some(event) = rx.recv().await {
        let Some(reply) = session.handle_event(event) else {
            continue;
        };
        println!("> {}", reply.text());
        if reply.is_exit() {
            break;
        }
    }

    shutdown.cancel();
    tracing::info!("Conductor stopped.");
    Ok(())
}
