//! Landmark sources.
//!
//! A source runs as its own task and delivers one `Option<HandFrame>` per
//! processed video frame over a channel; `None` means no hand was found.
//! The game loop doesn't care whether frames come from a recording or the
//! synthetic hand.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use binsort_core::HandFrame;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::time::{self, MissedTickBehavior};

/// One landmark delivery.
pub type LandmarkFrame = Option<HandFrame>;

/// Anything that can deliver landmark frames over a channel.
pub trait LandmarkSource: Send + 'static {
    fn run(self, tx: Sender<LandmarkFrame>) -> impl Future<Output = ()> + Send;
}

/// Spawn a landmark source on the runtime and return the receiving end.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S) -> Receiver<LandmarkFrame> {
    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(source.run(tx));
    rx
}

fn frame_interval(hz: u32) -> time::Interval {
    let mut interval = time::interval(Duration::from_secs_f64(1.0 / f64::from(hz.max(1))));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

// ════════════════════════════════════════════════════════════════════════════
// ReplaySource
// ════════════════════════════════════════════════════════════════════════════

/// Plays back a recorded landmark stream.
///
/// The file holds one frame per line: `null` for "no hand", otherwise a JSON
/// array of 21 `{"x", "y", "z"}` objects. Blank lines and lines starting
/// with `#` are skipped.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    frames: Vec<LandmarkFrame>,
    hz: u32,
}

impl ReplaySource {
    pub fn new(frames: Vec<LandmarkFrame>, hz: u32) -> Self {
        Self { frames, hz }
    }

    pub fn open(path: &Path, hz: u32) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read replay {}", path.display()))?;
        let frames = parse_replay(&text)
            .with_context(|| format!("invalid replay {}", path.display()))?;
        tracing::info!(path = %path.display(), frames = frames.len(), "loaded replay");
        Ok(Self::new(frames, hz))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

pub fn parse_replay(text: &str) -> anyhow::Result<Vec<LandmarkFrame>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str::<LandmarkFrame>(line)
                .with_context(|| format!("line {}", index + 1))
        })
        .collect()
}

impl LandmarkSource for ReplaySource {
    async fn run(self, tx: Sender<LandmarkFrame>) {
        let mut interval = frame_interval(self.hz);
        for frame in self.frames {
            interval.tick().await;
            if tx.send(frame).await.is_err() {
                return;
            }
        }
        tracing::debug!("replay finished");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SweepSource
// ════════════════════════════════════════════════════════════════════════════

/// Synthetic hand for running without a tracker.
///
/// The fingertip traces a slow Lissajous figure over the frame, pinches for
/// one second out of every three and drops out of view for half a second
/// every ten.
#[derive(Debug, Clone, Copy)]
pub struct SweepSource {
    hz: u32,
}

impl SweepSource {
    const PINCH_GAP: f32 = 0.01;
    const OPEN_GAP: f32 = 0.12;

    pub fn new(hz: u32) -> Self {
        Self { hz }
    }

    /// Frame at `t` seconds into the sweep.
    pub fn frame_at(t: f32) -> LandmarkFrame {
        if t % 10.0 >= 9.5 {
            return None;
        }
        let x = 0.5 + 0.35 * (0.7 * t).sin();
        let y = 0.55 + 0.25 * (1.1 * t).sin();
        let gap = if (1.0..2.0).contains(&(t % 3.0)) {
            Self::PINCH_GAP
        } else {
            Self::OPEN_GAP
        };
        Some(HandFrame::synthetic(x, y, gap))
    }
}

impl LandmarkSource for SweepSource {
    async fn run(self, tx: Sender<LandmarkFrame>) {
        let mut interval = frame_interval(self.hz);
        let start = time::Instant::now();
        loop {
            interval.tick().await;
            let t = start.elapsed().as_secs_f32();
            if tx.send(Self::frame_at(t)).await.is_err() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binsort_core::Landmark;

    fn line(x: f32, y: f32) -> String {
        serde_json::to_string(&vec![Landmark::new(x, y, 0.0); 21]).unwrap()
    }

    #[test]
    fn test_parse_replay() {
        let text = format!("# recorded\n{}\n\nnull\n{}\n", line(0.5, 0.5), line(0.1, 0.2));
        let frames = parse_replay(&text).unwrap();
        assert_eq!(frames.len(), 3);
        assert!(frames[0].is_some());
        assert!(frames[1].is_none());
        assert_eq!(frames[2].as_ref().unwrap().index_tip().x, 0.1);
    }

    #[test]
    fn test_parse_replay_reports_line() {
        let text = format!("{}\n[{{\"x\":0.1,\"y\":0.1}}]\n", line(0.5, 0.5));
        let err = parse_replay(&text).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn test_sweep_pinches_and_loses_tracking() {
        let open = SweepSource::frame_at(0.5).unwrap();
        let pinched = SweepSource::frame_at(1.5).unwrap();
        assert!(open.thumb_tip().planar_distance(open.index_tip()) > 0.05);
        assert!(pinched.thumb_tip().planar_distance(pinched.index_tip()) < 0.05);
        assert!(SweepSource::frame_at(9.7).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_delivers_in_order_then_closes() {
        let frames = vec![
            Some(HandFrame::synthetic(0.1, 0.1, 0.2)),
            None,
            Some(HandFrame::synthetic(0.9, 0.9, 0.2)),
        ];
        let mut rx = spawn_landmark_source(ReplaySource::new(frames.clone(), 30));

        let mut received = Vec::new();
        while let Some(frame) = rx.recv().await {
            received.push(frame);
        }
        assert_eq!(received, frames);
    }
}
