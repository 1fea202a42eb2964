//! Interactive terminal todo list.
//!
//! Reads one command per line from stdin; `help` lists them.

use anyhow::Context;
use std::sync::Arc;
use todos::cli::{Reply, Session, HELP};
use todos::{Config, TodoEnvironment, TodoReducer, TodoState};
use todos_core::environment::SystemClock;
use todos_runtime::Store;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // Logs go to stderr so they never interleave with the list on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let metrics = if config.metrics {
        Some(todos_runtime::metrics::install_recorder().context("failed to start metrics")?)
    } else {
        None
    };

    tracing::info!(
        view = %config.default_view,
        confirm_delete = config.confirm_delete,
        metrics = config.metrics,
        "Starting todos"
    );

    let env = TodoEnvironment::new(Arc::new(SystemClock));
    let store = Store::new(TodoState::new(), TodoReducer::new(), env);
    let mut session = Session::new(store.clone(), &config);
    if let Some(handle) = metrics {
        session = session.with_metrics(handle);
    }

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(format!("My Todos\n{HELP}\n").as_bytes())
        .await
        .context("failed to write to stdout")?;

    loop {
        stdout
            .write_all(session.prompt().as_bytes())
            .await
            .context("failed to write prompt")?;
        stdout.flush().await.context("failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };

        match session.handle_line(&line).await? {
            Reply::Quit => break,
            Reply::Text(text) if text.is_empty() => {},
            Reply::Text(text) => {
                stdout
                    .write_all(format!("{text}\n").as_bytes())
                    .await
                    .context("failed to write to stdout")?;
            },
        }
    }

    store.shutdown();
    let remaining = store.state(TodoState::count).await;
    tracing::info!(remaining, "Session ended");

    Ok(())
}
