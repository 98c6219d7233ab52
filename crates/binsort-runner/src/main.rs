//! Binsort Runner
//!
//! Plays one round headless: landmarks come from a replay file or a
//! synthetic hand, UI events go to stdout as JSON lines and logs go to
//! stderr.

use std::process::ExitCode;

use anyhow::Context;
use binsort_core::GameSession;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::RunnerConfig,
    driver::run_session,
    output::{EventSink, LogRenderer},
    source::{ReplaySource, SweepSource, spawn_landmark_source},
};

mod config;
mod driver;
mod output;
mod source;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = RunnerConfig::load()?;
    let game_config = config.load_game_config()?;
    let mut session = GameSession::new(game_config).context("invalid game config")?;

    let frames = match &config.replay {
        Some(path) => spawn_landmark_source(ReplaySource::open(path, config.landmark_hz)?),
        None => {
            tracing::info!("no replay given, using synthetic hand");
            spawn_landmark_source(SweepSource::new(config.landmark_hz))
        }
    };

    let mut renderer = LogRenderer::new(config.fps);
    let mut sink = EventSink::new(std::io::stdout().lock());

    tracing::info!(fps = config.fps, landmark_hz = config.landmark_hz, "starting round");
    let summary = run_session(
        &mut session,
        frames,
        &mut renderer,
        &mut sink,
        config.fps,
        shutdown_signal(),
    )
    .await?;

    tracing::info!(
        phase = ?summary.phase,
        score = summary.score,
        frames = summary.frames,
        events = sink.written(),
        "round over"
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
}
