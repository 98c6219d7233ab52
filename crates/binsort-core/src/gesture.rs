//! Pinch gesture recognition.
//!
//! The classifier turns a stream of optional [`HandFrame`]s into a cursor in
//! normalized device coordinates and edge-triggered [`GestureEvent`]s. A
//! steady pinch produces one `Grab` and nothing more until the fingers
//! part again, so holding a pinch can never score twice.

use serde::{Deserialize, Serialize};

use crate::landmark::HandFrame;

/// Edge event emitted on a pinch transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureEvent {
    Grab,
    Release,
}

/// Two-state pinch machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    NotGrabbing,
    Grabbing,
}

impl GestureState {
    /// Moves to the state implied by `pinched`, returning the event fired
    /// by the transition, if any.
    pub fn transition(&mut self, pinched: bool) -> Option<GestureEvent> {
        let (next, event) = match (*self, pinched) {
            (Self::NotGrabbing, true) => (Self::Grabbing, Some(GestureEvent::Grab)),
            (Self::Grabbing, false) => (Self::NotGrabbing, Some(GestureEvent::Release)),
            (state, _) => (state, None),
        };
        *self = next;
        event
    }

    pub fn is_grabbing(self) -> bool {
        self == Self::Grabbing
    }
}

/// Hand-tracking indicator shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    /// No hand in the last frame.
    Lost,
    /// Hand tracked, fingers apart.
    Open,
    /// Hand tracked, pinching.
    Pinched,
}

/// Cursor derived from the index fingertip.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CursorState {
    /// Horizontal NDC position, `-1` left to `1` right.
    pub x: f32,
    /// Vertical NDC position, `-1` bottom to `1` top.
    pub y: f32,
    pub is_grabbing: bool,
    pub previous_is_grabbing: bool,
}

/// Result of classifying one landmark delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub status: TrackingStatus,
    pub event: Option<GestureEvent>,
}

/// Stateful pinch classifier.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    threshold: f32,
    state: GestureState,
    cursor: CursorState,
}

impl GestureClassifier {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            state: GestureState::default(),
            cursor: CursorState::default(),
        }
    }

    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Feeds one landmark delivery. `None` leaves cursor and pinch state
    /// exactly as they were.
    pub fn classify(&mut self, frame: Option<&HandFrame>) -> Classification {
        let Some(frame) = frame else {
            return Classification {
                status: TrackingStatus::Lost,
                event: None,
            };
        };

        let index = frame.index_tip();
        self.cursor.x = index.x * 2.0 - 1.0;
        self.cursor.y = -(index.y * 2.0 - 1.0);

        let pinched = frame.thumb_tip().planar_distance(index) < self.threshold;
        self.cursor.previous_is_grabbing = self.cursor.is_grabbing;
        self.cursor.is_grabbing = pinched;
        let event = self.state.transition(pinched);

        Classification {
            status: if pinched {
                TrackingStatus::Pinched
            } else {
                TrackingStatus::Open
            },
            event,
        }
    }
}
