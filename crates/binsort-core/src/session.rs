//! Session controller and round management.
//!
//! [`GameSession`] owns every piece of mutable game state: the world, the
//! grab slot, the score, both timers and the gesture classifier. Each entry
//! point takes `&mut self` and runs to completion, so callers on a single
//! event loop never observe a half-applied step.

use std::time::Duration;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::camera::{PerspectiveCamera, Projector};
use crate::config::{ConfigError, GameConfig};
use crate::events::{SessionEvent, format_clock, progress_percent};
use crate::gesture::{CursorState, GestureClassifier, GestureEvent, TrackingStatus};
use crate::interaction::{DropOutcome, DropRules, InteractionEngine, Score};
use crate::landmark::HandFrame;
use crate::raycast::{RayCaster, SceneRaycaster};
use crate::render::{FrameView, Renderer};
use crate::schedule::SessionTimers;
use crate::world::{ItemId, World};

/// Where the player is in the game flow.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Menu; no round in progress.
    #[default]
    Lobby,
    /// A round is being played.
    Running,
    /// The countdown ran out; showing the final score.
    Results,
}

/// Camera and play field. Built on the first start and reused afterwards.
#[derive(Debug, Clone)]
pub struct Stage {
    pub camera: PerspectiveCamera,
    pub world: World,
}

impl Stage {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            camera: PerspectiveCamera::new(&config.camera),
            world: World::new(config),
        }
    }
}

/// One player's game, from lobby through any number of rounds.
#[derive(Debug)]
pub struct GameSession<R = SceneRaycaster> {
    config: GameConfig,
    phase: SessionPhase,
    score: Score,
    time_remaining: u32,
    stage: Option<Stage>,
    engine: InteractionEngine,
    classifier: GestureClassifier,
    tracking: Option<TrackingStatus>,
    timers: SessionTimers,
    caster: R,
    elapsed: Duration,
    frame: u64,
    events: Vec<SessionEvent>,
}

impl GameSession<SceneRaycaster> {
    /// Creates a session in the lobby using sphere hit-testing.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let caster = SceneRaycaster::new(config.item_radius, config.bin_radius);
        Self::with_raycaster(config, caster)
    }
}

impl<R: RayCaster> GameSession<R> {
    /// Creates a session in the lobby with a custom hit-tester.
    pub fn with_raycaster(config: GameConfig, caster: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            phase: SessionPhase::Lobby,
            score: Score::default(),
            time_remaining: config.session_seconds,
            stage: None,
            engine: InteractionEngine::new(),
            classifier: GestureClassifier::new(config.pinch_threshold),
            tracking: None,
            timers: SessionTimers::new(config.countdown_period(), config.spawn_period()),
            caster,
            elapsed: Duration::ZERO,
            frame: 0,
            events: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn score(&self) -> u32 {
        self.score.value()
    }

    /// Whole seconds left in the round.
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn progress_percent(&self) -> u8 {
        progress_percent(self.score.value(), self.config.progress_target)
    }

    pub fn stage(&self) -> Option<&Stage> {
        self.stage.as_ref()
    }

    pub fn world(&self) -> Option<&World> {
        self.stage.as_ref().map(|stage| &stage.world)
    }

    pub(crate) fn world_mut(&mut self) -> Option<&mut World> {
        self.stage.as_mut().map(|stage| &mut stage.world)
    }

    pub fn held(&self) -> Option<ItemId> {
        self.engine.held()
    }

    pub fn cursor(&self) -> &CursorState {
        self.classifier.cursor()
    }

    pub fn tracking_status(&self) -> Option<TrackingStatus> {
        self.tracking
    }

    pub fn timers(&self) -> &SessionTimers {
        &self.timers
    }

    /// Number of frames rendered this round.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Drains pending UI notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Starts a fresh round from any phase.
    pub fn start(&mut self) {
        let config = &self.config;
        let stage = self.stage.get_or_insert_with(|| {
            tracing::info!("initializing stage");
            Stage::new(config)
        });
        stage.world.clear_items();

        self.engine.clear();
        self.score.reset();
        self.time_remaining = self.config.session_seconds;
        self.elapsed = Duration::ZERO;
        self.frame = 0;
        self.timers.start_all();
        self.phase = SessionPhase::Running;

        tracing::info!(seconds = self.time_remaining, "session started");
        self.events.push(SessionEvent::PhaseChanged { phase: self.phase });
        self.publish_score();
        self.publish_clock();
    }

    /// Abandons the round and returns to the lobby. The stage is kept.
    pub fn exit(&mut self) {
        self.timers.cancel_all();
        if let Some(world) = self.world_mut() {
            world.clear_items();
        }
        self.engine.clear();
        self.phase = SessionPhase::Lobby;

        tracing::info!(score = self.score.value(), "session exited");
        self.events.push(SessionEvent::PhaseChanged { phase: self.phase });
    }

    /// Handles one landmark delivery. Grab and release are fully resolved,
    /// score included, before this returns.
    ///
    /// Outside a running round the cursor still tracks the hand but gestures
    /// are ignored.
    pub fn on_hand_frame(&mut self, frame: Option<&HandFrame>) -> Option<GestureEvent> {
        let classification = self.classifier.classify(frame);
        if self.tracking != Some(classification.status) {
            self.tracking = Some(classification.status);
            self.events.push(SessionEvent::HandStatus {
                status: classification.status,
            });
        }

        if !self.is_active() {
            return None;
        }

        let event = classification.event?;
        match event {
            GestureEvent::Grab => self.grab(),
            GestureEvent::Release => self.release(),
        }
        Some(event)
    }

    /// Feeds elapsed time to both timers and runs whatever fired.
    ///
    /// Countdown ticks run before spawn ticks; once the round ends nothing
    /// else in this step runs.
    pub fn advance(&mut self, dt: Duration) {
        if !self.is_active() {
            return;
        }
        self.elapsed += dt;

        let countdown = self.timers.countdown.advance(dt);
        for _ in 0..countdown {
            self.countdown_tick();
            if !self.is_active() {
                return;
            }
        }

        let spawns = self.timers.spawn.advance(dt);
        for _ in 0..spawns {
            self.spawn_tick();
        }
    }

    /// One second off the clock. Ends the round at zero.
    pub fn countdown_tick(&mut self) {
        if !self.is_active() {
            return;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        self.publish_clock();
        if self.time_remaining == 0 {
            self.end();
        }
    }

    /// Spawns an item if the floor has room.
    pub fn spawn_tick(&mut self) -> Option<ItemId> {
        if !self.is_active() {
            return None;
        }
        let world = self.world_mut()?;
        let id = world.try_spawn()?;
        let item = world.item(id)?;
        let event = SessionEvent::ItemSpawned {
            id,
            name: item.name().to_string(),
            category: item.category(),
            position: item.position.to_array(),
        };
        self.events.push(event);
        Some(id)
    }

    /// Runs one render tick: idle spin, held-item follow, then draw.
    ///
    /// Returns `false` without doing anything once the round is over.
    pub fn render_frame<Ren: Renderer + ?Sized>(&mut self, renderer: &mut Ren) -> bool {
        if !self.is_active() {
            return false;
        }
        let Some(stage) = self.stage.as_mut() else {
            return false;
        };
        self.frame += 1;

        let held = self.engine.held();
        stage.world.spin_idle(held, self.config.spin_per_frame);

        let cursor = self.classifier.cursor();
        let cursor_world = stage
            .camera
            .project_cursor(Vec2::new(cursor.x, cursor.y), self.config.reach);
        self.engine
            .follow(&mut stage.world, cursor_world, self.config.follow_blend);

        let view = FrameView::capture(
            &stage.world,
            held,
            cursor_world,
            self.frame,
            self.elapsed.as_secs_f32(),
            (self.config.float_amplitude, self.config.float_speed),
        );
        renderer.render_frame(&view);
        tracing::trace!(frame = self.frame, items = view.items.len(), "frame rendered");
        true
    }

    /// The 3D cursor for the current hand position.
    pub fn cursor_world(&self) -> Option<Vec3> {
        let stage = self.stage.as_ref()?;
        let cursor = self.classifier.cursor();
        Some(
            stage
                .camera
                .project_cursor(Vec2::new(cursor.x, cursor.y), self.config.reach),
        )
    }

    fn grab(&mut self) {
        let Some(stage) = self.stage.as_ref() else {
            return;
        };
        let cursor = self.classifier.cursor();
        // The camera faces the player, so the picture is mirrored.
        let ray = stage.camera.ray_through(Vec2::new(-cursor.x, cursor.y));

        let Some(id) = self.engine.try_grab(&stage.world, &self.caster, &ray) else {
            tracing::trace!("grab found nothing");
            return;
        };
        let name = stage
            .world
            .item(id)
            .map(|item| item.name().to_string())
            .unwrap_or_default();

        tracing::debug!(id, %name, "item grabbed");
        self.toast(format!("Grabbed {name}!"));
    }

    fn release(&mut self) {
        let rules = DropRules {
            tolerance: self.config.drop_tolerance,
            correct_points: self.config.correct_points,
            wrong_penalty: self.config.wrong_penalty,
        };
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let Some(outcome) = self
            .engine
            .try_release(&mut stage.world, &mut self.score, &rules)
        else {
            return;
        };

        tracing::debug!(?outcome, score = self.score.value(), "item released");
        match outcome {
            DropOutcome::Correct { .. } => {
                self.toast(format!("Correct! +{}", rules.correct_points));
                self.publish_score();
            }
            DropOutcome::Wrong { .. } => {
                self.toast(format!("Wrong Bin! -{}", rules.wrong_penalty));
                self.publish_score();
            }
            DropOutcome::Dropped { .. } => self.toast("Dropped.".to_string()),
        }
    }

    fn end(&mut self) {
        self.timers.cancel_all();
        self.phase = SessionPhase::Results;

        tracing::info!(score = self.score.value(), "session ended");
        self.events.push(SessionEvent::PhaseChanged { phase: self.phase });
        self.events.push(SessionEvent::SessionEnded {
            final_score: self.score.value(),
        });
    }

    fn toast(&mut self, message: String) {
        self.events.push(SessionEvent::Toast {
            message,
            duration_ms: self.config.toast_duration_ms,
        });
    }

    fn publish_score(&mut self) {
        self.events.push(SessionEvent::ScoreChanged {
            score: self.score.value(),
            progress: self.progress_percent(),
        });
    }

    fn publish_clock(&mut self) {
        self.events.push(SessionEvent::Clock {
            remaining: self.time_remaining,
            text: format_clock(self.time_remaining),
        });
    }
}
