//! Hand landmarks as delivered by the upstream tracker.
//!
//! Coordinates are normalized to the video frame (`x`, `y` in `[0, 1]`,
//! origin top-left) and `z` is a relative depth. Ranges are trusted as-is.

use serde::{Deserialize, Serialize};

/// Number of landmarks in a tracked hand.
pub const LANDMARK_COUNT: usize = 21;
/// Landmark index of the thumb tip.
pub const THUMB_TIP: usize = 4;
/// Landmark index of the index-finger tip.
pub const INDEX_TIP: usize = 8;

/// A single tracked point on the hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Distance in the image plane, ignoring depth.
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Error building a [`HandFrame`] from loose landmarks.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("expected 21 landmarks, got {0}")]
    WrongCount(usize),
}

/// One hand's full set of landmarks for a single video frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct HandFrame {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl HandFrame {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    pub fn thumb_tip(&self) -> &Landmark {
        &self.landmarks[THUMB_TIP]
    }

    pub fn index_tip(&self) -> &Landmark {
        &self.landmarks[INDEX_TIP]
    }

    /// A hand with every landmark at the index tip except the thumb, which
    /// sits `pinch_gap` to the right of it. Useful for simulated input.
    pub fn synthetic(index_x: f32, index_y: f32, pinch_gap: f32) -> Self {
        let mut landmarks = [Landmark::new(index_x, index_y, 0.0); LANDMARK_COUNT];
        landmarks[THUMB_TIP] = Landmark::new(index_x + pinch_gap, index_y, 0.0);
        Self { landmarks }
    }
}

impl TryFrom<Vec<Landmark>> for HandFrame {
    type Error = FrameError;

    fn try_from(value: Vec<Landmark>) -> Result<Self, Self::Error> {
        let count = value.len();
        let landmarks: [Landmark; LANDMARK_COUNT] =
            value.try_into().map_err(|_| FrameError::WrongCount(count))?;
        Ok(Self { landmarks })
    }
}

impl From<HandFrame> for Vec<Landmark> {
    fn from(frame: HandFrame) -> Self {
        frame.landmarks.to_vec()
    }
}
