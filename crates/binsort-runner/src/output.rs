//! Headless stand-ins for the UI layer and the renderer.

use std::io::Write;

use anyhow::Context;
use binsort_core::{FrameView, Renderer, SessionEvent};

/// Writes session events as JSON lines.
pub struct EventSink<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> EventSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn publish(&mut self, events: Vec<SessionEvent>) -> anyhow::Result<()> {
        if events.is_empty() {
            return Ok(());
        }
        for event in &events {
            serde_json::to_writer(&mut self.out, event).context("failed to encode event")?;
            self.out.write_all(b"\n").context("failed to write event")?;
        }
        self.written += events.len();
        self.out.flush().context("failed to flush events")
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Renderer that logs a summary line once per `every` frames.
#[derive(Debug, Clone)]
pub struct LogRenderer {
    every: u64,
}

impl LogRenderer {
    pub fn new(every: u32) -> Self {
        Self {
            every: u64::from(every.max(1)),
        }
    }
}

impl Renderer for LogRenderer {
    fn render_frame(&mut self, view: &FrameView<'_>) {
        if view.frame % self.every != 0 {
            return;
        }
        let held = view.held().map(|item| item.name);
        tracing::debug!(
            frame = view.frame,
            items = view.items.len(),
            ?held,
            cursor = ?view.cursor,
            "frame"
        );
    }
}
