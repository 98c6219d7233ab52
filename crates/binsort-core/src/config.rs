//! Game tuning and stage layout.
//!
//! Every constant the game loop depends on lives in [`GameConfig`]. The
//! defaults reproduce the stock game: a three-minute round, one spawn every
//! three seconds, at most five items on the floor and three bins lined up
//! three metres in front of the player.

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::world::Category;

/// RGBA color representation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Builds an opaque color from a `0xRRGGBB` literal.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn hex(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255)
    }

    pub const RECYCLE: Color = Color::hex(0x34d399);
    pub const COMPOST: Color = Color::hex(0xfbbf24);
    pub const LANDFILL: Color = Color::hex(0x4b5563);
}

/// One entry of the spawn palette.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemKind {
    pub name: String,
    pub category: Category,
    pub color: Color,
}

impl ItemKind {
    pub fn new(name: &str, category: Category, color: Color) -> Self {
        Self {
            name: name.to_string(),
            category,
            color,
        }
    }

    /// The stock palette of trash items.
    pub fn default_palette() -> Vec<ItemKind> {
        vec![
            Self::new("Plastic Bottle", Category::Recycle, Color::hex(0x34d399)),
            Self::new("Banana Peel", Category::Compost, Color::hex(0xfbbf24)),
            Self::new("Crumpled Paper", Category::Recycle, Color::hex(0xffffff)),
            Self::new("Soda Can", Category::Recycle, Color::hex(0x60a5fa)),
            Self::new("Apple Core", Category::Compost, Color::hex(0xe11d48)),
            Self::new("Old Battery", Category::Landfill, Color::hex(0x4b5563)),
            Self::new("Wrapper", Category::Landfill, Color::hex(0x9ca3af)),
        ]
    }
}

/// Placement of one bin on the stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BinConfig {
    pub category: Category,
    pub label: String,
    pub color: Color,
    pub position: [f32; 3],
}

impl BinConfig {
    pub fn new(category: Category, label: &str, color: Color, position: [f32; 3]) -> Self {
        Self {
            category,
            label: label.to_string(),
            color,
            position,
        }
    }

    /// Recycle on the left, compost in the centre, landfill on the right.
    pub fn default_layout() -> Vec<BinConfig> {
        vec![
            Self::new(Category::Recycle, "Recycle", Color::RECYCLE, [-1.5, 0.0, -3.0]),
            Self::new(Category::Compost, "Compost", Color::COMPOST, [0.0, 0.0, -3.0]),
            Self::new(Category::Landfill, "Landfill", Color::LANDFILL, [1.5, 0.0, -3.0]),
        ]
    }
}

/// Perspective camera parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Eye position in world units.
    pub position: [f32; 3],
}

impl CameraConfig {
    /// Rejects projections that cannot be inverted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return Err(ConfigError::FieldOfView(self.fov_y_degrees));
        }
        if self.aspect <= 0.0 {
            return Err(ConfigError::NonPositive {
                name: "camera.aspect",
            });
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(ConfigError::ClipPlanes {
                near: self.near,
                far: self.far,
            });
        }
        Ok(())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 1.6, 0.0],
        }
    }
}

/// Complete game configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed for spawn placement and palette picks.
    pub seed: u64,
    /// Round length in whole seconds.
    pub session_seconds: u32,
    pub spawn_period_ms: u64,
    pub countdown_period_ms: u64,
    /// Maximum number of items alive at once.
    pub max_items: usize,

    /// Thumb-to-index distance (normalized landmark units) below which the
    /// hand counts as pinching.
    pub pinch_threshold: f32,
    /// Distance from the camera at which the 3D cursor is placed.
    pub reach: f32,
    /// Fraction of the remaining gap a held item closes every render tick.
    pub follow_blend: f32,
    /// A bin only accepts a drop strictly closer than this.
    pub drop_tolerance: f32,

    pub correct_points: u32,
    pub wrong_penalty: u32,
    /// Score at which the progress bar is full.
    pub progress_target: u32,
    pub toast_duration_ms: u64,

    pub spawn_min_radius: f32,
    pub spawn_max_radius: f32,
    /// Offset of the spawn ring centre along the forward (-Z) axis.
    pub spawn_forward_offset: f32,
    pub spawn_height: f32,

    pub float_amplitude: f32,
    /// Angular speed of the idle bob, radians per second.
    pub float_speed: f32,
    /// Upper bound of the random per-item phase offset.
    pub float_phase_range: f32,
    /// Idle spin, radians per rendered frame.
    pub spin_per_frame: f32,

    pub item_radius: f32,
    pub bin_radius: f32,

    pub camera: CameraConfig,
    pub palette: Vec<ItemKind>,
    pub bins: Vec<BinConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            session_seconds: 180,
            spawn_period_ms: 3000,
            countdown_period_ms: 1000,
            max_items: 5,
            pinch_threshold: 0.05,
            reach: 2.0,
            follow_blend: 0.2,
            drop_tolerance: 1.0,
            correct_points: 100,
            wrong_penalty: 50,
            progress_target: 1000,
            toast_duration_ms: 2000,
            spawn_min_radius: 2.0,
            spawn_max_radius: 4.0,
            spawn_forward_offset: -3.0,
            spawn_height: 0.2,
            float_amplitude: 0.1,
            float_speed: 2.0,
            float_phase_range: 100.0,
            spin_per_frame: 0.01,
            item_radius: 0.2,
            bin_radius: 0.5,
            camera: CameraConfig::default(),
            palette: ItemKind::default_palette(),
            bins: BinConfig::default_layout(),
        }
    }
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("item palette is empty")]
    EmptyPalette,
    #[error("no bins configured")]
    NoBins,
    #[error("{name} must be positive")]
    NonPositive { name: &'static str },
    #[error("spawn radius range is inverted: {min} >= {max}")]
    InvertedSpawnRadius { min: f32, max: f32 },
    #[error("follow blend must lie in (0, 1], got {0}")]
    FollowBlend(f32),
    #[error("camera field of view must lie in (0, 180) degrees, got {0}")]
    FieldOfView(f32),
    #[error("camera clip planes need 0 < near < far, got near {near}, far {far}")]
    ClipPlanes { near: f32, far: f32 },
}

impl GameConfig {
    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the game loop relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if self.bins.is_empty() {
            return Err(ConfigError::NoBins);
        }
        if self.session_seconds == 0 {
            return Err(ConfigError::NonPositive { name: "session_seconds" });
        }
        if self.spawn_period_ms == 0 {
            return Err(ConfigError::NonPositive { name: "spawn_period_ms" });
        }
        if self.countdown_period_ms == 0 {
            return Err(ConfigError::NonPositive { name: "countdown_period_ms" });
        }
        if self.max_items == 0 {
            return Err(ConfigError::NonPositive { name: "max_items" });
        }
        if self.drop_tolerance <= 0.0 {
            return Err(ConfigError::NonPositive { name: "drop_tolerance" });
        }
        if self.reach <= 0.0 {
            return Err(ConfigError::NonPositive { name: "reach" });
        }
        if self.spawn_min_radius >= self.spawn_max_radius {
            return Err(ConfigError::InvertedSpawnRadius {
                min: self.spawn_min_radius,
                max: self.spawn_max_radius,
            });
        }
        if !(self.follow_blend > 0.0 && self.follow_blend <= 1.0) {
            return Err(ConfigError::FollowBlend(self.follow_blend));
        }
        for (name, value) in [
            ("pinch_threshold", self.pinch_threshold),
            ("item_radius", self.item_radius),
            ("bin_radius", self.bin_radius),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { name });
            }
        }
        self.camera.validate()
    }

    pub fn spawn_period(&self) -> Duration {
        Duration::from_millis(self.spawn_period_ms)
    }

    pub fn countdown_period(&self) -> Duration {
        Duration::from_millis(self.countdown_period_ms)
    }

    /// Centre of the spawn ring on the floor plane.
    pub fn spawn_center(&self) -> Vec3 {
        Vec3::new(0.0, self.spawn_height, self.spawn_forward_offset)
    }
}
