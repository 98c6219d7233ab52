//! The event loop.
//!
//! Render ticks, landmark deliveries and the shutdown signal all arrive on
//! one `select!` loop, so each callback into the session runs to completion
//! before the next is dispatched.

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use binsort_core::{GameSession, Renderer, SessionPhase};
use tokio::sync::mpsc::Receiver;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::output::EventSink;
use crate::source::LandmarkFrame;

/// How a round finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub phase: SessionPhase,
    pub score: u32,
    pub frames: u64,
}

/// Starts a round and drives it until the countdown ends or `shutdown`
/// resolves.
pub async fn run_session<W, Ren, S>(
    session: &mut GameSession,
    mut frames: Receiver<LandmarkFrame>,
    renderer: &mut Ren,
    sink: &mut EventSink<W>,
    fps: u32,
    shutdown: S,
) -> anyhow::Result<SessionSummary>
where
    W: Write,
    Ren: Renderer,
    S: Future<Output = ()>,
{
    let mut ticker = time::interval(Duration::from_secs_f64(1.0 / f64::from(fps.max(1))));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    session.start();
    sink.publish(session.take_events())?;

    let mut last_tick = Instant::now();
    let mut source_open = true;

    while session.is_active() {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                session.advance(now - last_tick);
                last_tick = now;
                session.render_frame(renderer);
            }
            frame = frames.recv(), if source_open => match frame {
                Some(frame) => {
                    session.on_hand_frame(frame.as_ref());
                }
                None => {
                    tracing::info!("landmark source closed");
                    source_open = false;
                }
            },
            () = &mut shutdown => {
                tracing::info!("shutdown requested");
                session.exit();
            }
        }
        sink.publish(session.take_events())?;
    }

    Ok(SessionSummary {
        phase: session.phase(),
        score: session.score(),
        frames: session.frame(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use binsort_core::{GameConfig, HandFrame, NullRenderer};
    use tokio::sync::mpsc;

    fn short_round() -> GameSession {
        GameSession::new(GameConfig {
            session_seconds: 3,
            ..GameConfig::default()
        })
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_runs_to_results() {
        let mut session = short_round();
        let (tx, rx) = mpsc::channel(8);
        drop(tx);
        let mut sink = EventSink::new(Vec::new());

        let summary = run_session(
            &mut session,
            rx,
            &mut NullRenderer,
            &mut sink,
            30,
            std::future::pending(),
        )
        .await
        .unwrap();

        assert_eq!(summary.phase, SessionPhase::Results);
        assert_eq!(summary.score, 0);
        assert!(summary.frames >= 80);

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(text.lines().any(|l| l.contains(r#""type":"session_ended""#)));
        assert!(text.lines().any(|l| l.contains(r#""text":"0:00""#)));
        // One spawn lands at the three second mark at most.
        assert!(session.world().unwrap().item_count() <= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_exits_to_lobby() {
        let mut session = short_round();
        let (tx, rx) = mpsc::channel(8);
        tx.send(Some(HandFrame::synthetic(0.5, 0.5, 0.2))).await.unwrap();
        tx.send(None).await.unwrap();
        let mut sink = EventSink::new(Vec::new());

        let summary = run_session(
            &mut session,
            rx,
            &mut NullRenderer,
            &mut sink,
            30,
            time::sleep(Duration::from_millis(500)),
        )
        .await
        .unwrap();

        assert_eq!(summary.phase, SessionPhase::Lobby);
        assert!(!session.is_active());
        assert!(session.stage().is_some());

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(text.contains(r#""status":"open""#));
        assert!(text.contains(r#""status":"lost""#));
        assert!(!text.contains("session_ended"));
        drop(tx);
    }
}
