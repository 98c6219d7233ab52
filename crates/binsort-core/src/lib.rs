//! Binsort Core Library
//!
//! Gameplay loop for a hand-tracked trash sorting game: a pinch picks up a
//! floating item, the index finger carries it, and opening the hand over a
//! bin scores it.
//!
//! Data flows one way per step:
//! - landmarks -> [`gesture::GestureClassifier`] -> cursor + grab/release
//! - grab/release -> [`interaction::InteractionEngine`] -> world + score
//! - elapsed time -> [`schedule::SessionTimers`] -> countdown + spawning
//!
//! [`session::GameSession`] owns all of it and publishes
//! [`events::SessionEvent`]s for the UI.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod camera;
pub mod config;
pub mod events;
pub mod gesture;
pub mod interaction;
pub mod landmark;
pub mod raycast;
pub mod render;
pub mod schedule;
pub mod session;
pub mod world;

#[cfg(test)]
pub(crate) mod test_utils;

pub use camera::{PerspectiveCamera, Projector};
pub use config::{BinConfig, CameraConfig, Color, ConfigError, GameConfig, ItemKind};
pub use events::SessionEvent;
pub use gesture::{CursorState, GestureClassifier, GestureEvent, GestureState, TrackingStatus};
pub use interaction::{DropOutcome, GrabSlot, InteractionEngine, Score};
pub use landmark::{FrameError, HandFrame, LANDMARK_COUNT, Landmark};
pub use raycast::{HitTarget, Ray, RayCaster, RayHit, SceneRaycaster};
pub use render::{FrameView, ItemView, NullRenderer, Renderer};
pub use schedule::{PeriodicTimer, SessionTimers};
pub use session::{GameSession, SessionPhase, Stage};
pub use world::{Bin, Category, Item, ItemId, World};
