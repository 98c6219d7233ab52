//! Per-frame snapshot handed to a renderer.

use glam::Vec3;

use crate::config::Color;
use crate::world::{Bin, Category, ItemId, World};

/// How one item should be drawn this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView<'a> {
    pub id: ItemId,
    pub name: &'a str,
    pub category: Category,
    pub color: Color,
    pub position: Vec3,
    pub rotation_y: f32,
    pub held: bool,
}

/// Everything visible in one frame.
#[derive(Debug, Clone)]
pub struct FrameView<'a> {
    pub frame: u64,
    pub elapsed_secs: f32,
    pub cursor: Vec3,
    pub items: Vec<ItemView<'a>>,
    pub bins: &'a [Bin],
}

impl<'a> FrameView<'a> {
    /// Captures the world with idle bobbing applied to everything but the
    /// held item.
    pub fn capture(
        world: &'a World,
        held: Option<ItemId>,
        cursor: Vec3,
        frame: u64,
        elapsed_secs: f32,
        float: (f32, f32),
    ) -> Self {
        let (amplitude, speed) = float;
        let items = world
            .items()
            .iter()
            .map(|item| {
                let is_held = Some(item.id) == held;
                ItemView {
                    id: item.id,
                    name: item.name(),
                    category: item.category(),
                    color: item.kind.color,
                    position: if is_held {
                        item.position
                    } else {
                        item.floating_position(elapsed_secs, amplitude, speed)
                    },
                    rotation_y: item.rotation_y,
                    held: is_held,
                }
            })
            .collect();

        Self {
            frame,
            elapsed_secs,
            cursor,
            items,
            bins: world.bins(),
        }
    }

    pub fn held(&self) -> Option<&ItemView<'a>> {
        self.items.iter().find(|item| item.held)
    }
}

/// Draws frames. Mesh and material handling belong to the implementation.
pub trait Renderer {
    fn render_frame(&mut self, view: &FrameView<'_>);
}

/// Renderer that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render_frame(&mut self, _view: &FrameView<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn test_held_item_does_not_bob() {
        let mut world = World::new(&GameConfig::default());
        let held = world.spawn_at(0, Vec3::new(0.0, 1.0, -1.0));
        let idle = world.spawn_at(1, Vec3::new(1.0, 0.2, -4.0));
        // Force a visible bob for the idle item.
        world.item_mut(idle).unwrap().float_phase = std::f32::consts::FRAC_PI_2;

        let view = FrameView::capture(&world, Some(held), Vec3::ZERO, 1, 0.0, (0.1, 2.0));

        let held_view = view.held().unwrap();
        assert_eq!(held_view.id, held);
        assert_eq!(held_view.position, Vec3::new(0.0, 1.0, -1.0));

        let idle_view = view.items.iter().find(|i| i.id == idle).unwrap();
        assert!((idle_view.position.y - 0.3).abs() < 1e-5);
        assert_eq!(view.bins.len(), 3);
    }
}
