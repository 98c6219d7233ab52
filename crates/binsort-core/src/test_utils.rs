//! Test utilities for headless session tests.
//!
//! Provides `TestSession`, a started [`GameSession`] with helpers for
//! advancing the clock, placing items and driving a synthetic hand through
//! screen-space positions.

use std::time::Duration;

use glam::{Vec2, Vec3};

use crate::config::GameConfig;
use crate::events::SessionEvent;
use crate::gesture::GestureEvent;
use crate::landmark::HandFrame;
use crate::render::NullRenderer;
use crate::session::GameSession;
use crate::world::{ItemId, World};

// Palette indices in the default config.
pub(crate) const PLASTIC_BOTTLE: usize = 0;
pub(crate) const OLD_BATTERY: usize = 5;

const PINCH_GAP: f32 = 0.01;
const OPEN_GAP: f32 = 0.2;

/// Synthetic hand whose index tip sits at the given cursor NDC position.
pub(crate) fn hand_at_ndc(x: f32, y: f32, gap: f32) -> HandFrame {
    HandFrame::synthetic((x + 1.0) / 2.0, (1.0 - y) / 2.0, gap)
}

/// A running session with a scripted hand.
pub(crate) struct TestSession {
    pub session: GameSession,
    last_ndc: Vec2,
}

impl TestSession {
    /// Default config, round already started.
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        let mut session = GameSession::new(config).expect("valid test config");
        session.start();
        Self {
            session,
            last_ndc: Vec2::ZERO,
        }
    }

    /// Advances the clock one second at a time.
    pub fn advance_secs(&mut self, secs: u32) {
        for _ in 0..secs {
            self.session.advance(Duration::from_secs(1));
        }
    }

    pub fn render(&mut self, frames: u32) {
        for _ in 0..frames {
            self.session.render_frame(&mut NullRenderer);
        }
    }

    pub fn item_count(&self) -> usize {
        self.session.world().map_or(0, World::item_count)
    }

    pub fn item_position(&self, id: ItemId) -> Vec3 {
        self.session
            .world()
            .and_then(|world| world.item(id))
            .map(|item| item.position)
            .expect("item exists")
    }

    /// Puts an item at an exact position, bypassing the spawn timer.
    pub fn place(&mut self, kind: usize, position: Vec3) -> ItemId {
        self.session
            .world_mut()
            .expect("stage initialized")
            .spawn_at(kind, position)
    }

    /// NDC position of a world point on screen.
    pub fn screen_position(&self, world: Vec3) -> Vec2 {
        self.session
            .stage()
            .expect("stage initialized")
            .camera
            .project(world)
            .truncate()
    }

    pub fn pinch_at_ndc(&mut self, x: f32, y: f32) -> Option<GestureEvent> {
        self.last_ndc = Vec2::new(x, y);
        let frame = hand_at_ndc(x, y, PINCH_GAP);
        self.session.on_hand_frame(Some(&frame))
    }

    /// Pinches with the hand placed so the mirrored grab ray passes
    /// through `world`.
    pub fn pinch_toward(&mut self, world: Vec3) -> Option<GestureEvent> {
        let ndc = self.screen_position(world);
        self.pinch_at_ndc(-ndc.x, ndc.y)
    }

    /// Opens the hand where it last was.
    pub fn open_hand(&mut self) -> Option<GestureEvent> {
        let frame = hand_at_ndc(self.last_ndc.x, self.last_ndc.y, OPEN_GAP);
        self.session.on_hand_frame(Some(&frame))
    }

    /// Drains events and keeps only toast messages.
    pub fn toasts(&mut self) -> Vec<String> {
        self.session
            .take_events()
            .into_iter()
            .filter_map(|event| match event {
                SessionEvent::Toast { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }
}
