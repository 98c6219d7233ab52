//! Notifications published to the UI layer.

use serde::Serialize;

use crate::gesture::TrackingStatus;
use crate::session::SessionPhase;
use crate::world::{Category, ItemId};

/// A change the UI should reflect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    PhaseChanged {
        phase: SessionPhase,
    },
    ScoreChanged {
        score: u32,
        /// Progress bar fill, 0-100.
        progress: u8,
    },
    Clock {
        remaining: u32,
        text: String,
    },
    /// Short-lived message.
    Toast {
        message: String,
        duration_ms: u64,
    },
    HandStatus {
        status: TrackingStatus,
    },
    ItemSpawned {
        id: ItemId,
        name: String,
        category: Category,
        position: [f32; 3],
    },
    SessionEnded {
        final_score: u32,
    },
}

/// Formats whole seconds as `M:SS`.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Fill of the progress bar for `score`, clamped to 100.
pub fn progress_percent(score: u32, target: u32) -> u8 {
    if target == 0 {
        return 100;
    }
    let percent = (u64::from(score) * 100 / u64::from(target)).min(100);
    u8::try_from(percent).unwrap_or(100)
}
