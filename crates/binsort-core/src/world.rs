//! World state: trash items, bins and deterministic spawning.

use std::f32::consts::TAU;
use std::fmt;

use glam::Vec3;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::{Color, GameConfig, ItemKind};

/// Identifier for an item. Never reused for the lifetime of a [`World`],
/// including across rounds.
pub type ItemId = u32;

/// Waste stream an item or bin belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Recycle,
    Compost,
    Landfill,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Recycle => "recycle",
            Self::Compost => "compost",
            Self::Landfill => "landfill",
        })
    }
}

/// A piece of trash on the floor or in the player's hand.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    /// Logical position. Idle bobbing is applied on top of this at render
    /// time and never written back.
    pub position: Vec3,
    /// Height the item settles back to when it is dropped away from a bin.
    pub rest_height: f32,
    pub float_phase: f32,
    /// Accumulated idle spin about the vertical axis, radians.
    pub rotation_y: f32,
}

impl Item {
    pub fn name(&self) -> &str {
        &self.kind.name
    }

    pub fn category(&self) -> Category {
        self.kind.category
    }

    /// Position with the idle bob applied.
    pub fn floating_position(&self, elapsed_secs: f32, amplitude: f32, speed: f32) -> Vec3 {
        let bob = (elapsed_secs * speed + self.float_phase).sin() * amplitude;
        self.position + Vec3::Y * bob
    }
}

/// A fixed sorting bin.
#[derive(Debug, Clone)]
pub struct Bin {
    pub category: Category,
    pub label: String,
    pub color: Color,
    pub position: Vec3,
}

/// Annulus on the floor where new items appear.
#[derive(Debug, Clone, Copy)]
pub struct SpawnRing {
    pub center: Vec3,
    pub min_radius: f32,
    pub max_radius: f32,
    pub phase_range: f32,
}

/// Items and bins of the play field.
#[derive(Debug, Clone)]
pub struct World {
    items: Vec<Item>,
    bins: Vec<Bin>,
    palette: Vec<ItemKind>,
    ring: SpawnRing,
    max_items: usize,
    next_id: ItemId,
    rng: ChaCha8Rng,
    seed: u64,
}

impl World {
    /// Builds the bin layout and an empty floor.
    pub fn new(config: &GameConfig) -> Self {
        let bins = config
            .bins
            .iter()
            .map(|bin| Bin {
                category: bin.category,
                label: bin.label.clone(),
                color: bin.color,
                position: Vec3::from_array(bin.position),
            })
            .collect();

        Self {
            items: Vec::new(),
            bins,
            palette: config.palette.clone(),
            ring: SpawnRing {
                center: config.spawn_center(),
                min_radius: config.spawn_min_radius,
                max_radius: config.spawn_max_radius,
                phase_range: config.float_phase_range,
            },
            max_items: config.max_items,
            next_id: 0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            seed: config.seed,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.max_items
    }

    /// Spawns one random item unless the floor is already at capacity.
    pub fn try_spawn(&mut self) -> Option<ItemId> {
        if self.is_full() {
            tracing::trace!(count = self.items.len(), "spawn skipped, at capacity");
            return None;
        }
        Some(self.spawn_random())
    }

    /// Spawns a random palette entry at a random point on the spawn ring,
    /// ignoring the capacity limit.
    pub fn spawn_random(&mut self) -> ItemId {
        let kind_index = self.rng.random_range(0..self.palette.len());
        let angle = self.rng.random_range(0.0..TAU);
        let radius = self
            .rng
            .random_range(self.ring.min_radius..self.ring.max_radius);
        let position = self.ring.center + Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius);
        self.spawn_at(kind_index, position)
    }

    /// Spawns the palette entry at `kind_index` at an exact position.
    ///
    /// # Panics
    ///
    /// Panics if `kind_index` is outside the palette.
    pub fn spawn_at(&mut self, kind_index: usize, position: Vec3) -> ItemId {
        let id = self.next_id;
        self.next_id += 1;

        let float_phase = if self.ring.phase_range > 0.0 {
            self.rng.random_range(0.0..self.ring.phase_range)
        } else {
            0.0
        };

        let kind = self.palette[kind_index].clone();
        tracing::debug!(id, name = %kind.name, category = %kind.category, ?position, "item spawned");
        self.items.push(Item {
            id,
            kind,
            position,
            rest_height: position.y,
            float_phase,
            rotation_y: 0.0,
        });
        id
    }

    /// Removes an item, returning it if it existed.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let pos = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Nearest bin to `position` and its distance. Ties go to the bin listed
    /// first.
    pub fn nearest_bin(&self, position: Vec3) -> Option<(usize, f32)> {
        self.bins
            .iter()
            .enumerate()
            .map(|(index, bin)| (index, bin.position.distance(position)))
            .fold(None, |best, (index, distance)| match best {
                Some((_, best_distance)) if best_distance <= distance => best,
                _ => Some((index, distance)),
            })
    }

    /// Nearest bin strictly closer than `tolerance`.
    pub fn bin_within(&self, position: Vec3, tolerance: f32) -> Option<&Bin> {
        self.nearest_bin(position)
            .filter(|&(_, distance)| distance < tolerance)
            .map(|(index, _)| &self.bins[index])
    }

    /// Advances the idle spin of every item except the one being held.
    pub fn spin_idle(&mut self, held: Option<ItemId>, radians: f32) {
        for item in self.items.iter_mut().filter(|item| Some(item.id) != held) {
            item.rotation_y = (item.rotation_y + radians) % TAU;
        }
    }

    /// Removes every item and rewinds the RNG so the next round replays the
    /// same spawn sequence. Bins and the id counter are kept.
    pub fn clear_items(&mut self) {
        self.items.clear();
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }
}
