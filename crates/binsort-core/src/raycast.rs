//! Ray hit-testing against the play field.
//!
//! Grabbing only needs an ordered list of what a ray passes through, so the
//! scene is reached through the [`RayCaster`] capability rather than a
//! rendering engine's scene graph. [`SceneRaycaster`] answers it with plain
//! sphere geometry.

use std::cmp::Ordering;

use glam::Vec3;

use crate::world::{ItemId, World};

/// A half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Point `distance` units along the ray.
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Distance to the nearest intersection with a sphere in front of the
    /// origin. A ray starting inside the sphere hits at distance 0.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let to_center = center - self.origin;
        let along = to_center.dot(self.direction);
        let perp_sq = to_center.length_squared() - along * along;
        let radius_sq = radius * radius;
        if perp_sq > radius_sq {
            return None;
        }
        let half_chord = (radius_sq - perp_sq).sqrt();
        let near = along - half_chord;
        let far = along + half_chord;
        if far < 0.0 {
            None
        } else {
            Some(near.max(0.0))
        }
    }
}

/// What a ray hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// A grabbable item.
    Item(ItemId),
    /// Scenery: the bin at this index of the layout.
    Bin(usize),
}

impl HitTarget {
    pub fn item(self) -> Option<ItemId> {
        match self {
            Self::Item(id) => Some(id),
            Self::Bin(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub target: HitTarget,
}

/// Hit-testing capability used by the grab logic.
pub trait RayCaster {
    /// Every object the ray passes through, nearest first.
    fn cast_ray(&self, world: &World, ray: &Ray) -> Vec<RayHit>;
}

/// Geometric ray caster treating items and bins as spheres.
#[derive(Debug, Clone, Copy)]
pub struct SceneRaycaster {
    pub item_radius: f32,
    pub bin_radius: f32,
}

impl SceneRaycaster {
    pub fn new(item_radius: f32, bin_radius: f32) -> Self {
        Self {
            item_radius,
            bin_radius,
        }
    }
}

impl RayCaster for SceneRaycaster {
    fn cast_ray(&self, world: &World, ray: &Ray) -> Vec<RayHit> {
        let items = world.items().iter().filter_map(|item| {
            ray.intersect_sphere(item.position, self.item_radius)
                .map(|distance| RayHit {
                    distance,
                    target: HitTarget::Item(item.id),
                })
        });
        let bins = world.bins().iter().enumerate().filter_map(|(index, bin)| {
            ray.intersect_sphere(bin.position, self.bin_radius)
                .map(|distance| RayHit {
                    distance,
                    target: HitTarget::Bin(index),
                })
        });

        let mut hits: Vec<RayHit> = items.chain(bins).collect();
        hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
        hits
    }
}
