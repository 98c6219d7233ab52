//! Grab, carry and drop.
//!
//! The player holds at most one item. A grab picks the nearest tagged object
//! along the cursor ray; a release scores the held item against the nearest
//! bin inside the drop tolerance.

use glam::Vec3;

use crate::raycast::{Ray, RayCaster};
use crate::world::{Category, ItemId, World};

/// Non-negative score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score(u32);

impl Score {
    pub fn value(self) -> u32 {
        self.0
    }

    pub fn award(&mut self, points: u32) {
        self.0 = self.0.saturating_add(points);
    }

    /// Deducts points, stopping at zero.
    pub fn penalize(&mut self, points: u32) {
        self.0 = self.0.saturating_sub(points);
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

impl From<u32> for Score {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Points awarded and deducted by drops.
#[derive(Debug, Clone, Copy)]
pub struct DropRules {
    pub tolerance: f32,
    pub correct_points: u32,
    pub wrong_penalty: u32,
}

/// The player's hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GrabSlot {
    #[default]
    Empty,
    Holding(ItemId),
}

impl GrabSlot {
    pub fn held(self) -> Option<ItemId> {
        match self {
            Self::Empty => None,
            Self::Holding(id) => Some(id),
        }
    }
}

/// What a release did.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// Right bin; the item is gone.
    Correct { item: ItemId, bin: Category },
    /// Wrong bin; the item is gone.
    Wrong {
        item: ItemId,
        bin: Category,
        expected: Category,
    },
    /// No bin in reach; the item stays where it was let go.
    Dropped { item: ItemId, position: Vec3 },
}

/// Grab-slot state machine.
#[derive(Debug, Clone, Default)]
pub struct InteractionEngine {
    slot: GrabSlot,
}

impl InteractionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self) -> GrabSlot {
        self.slot
    }

    pub fn held(&self) -> Option<ItemId> {
        self.slot.held()
    }

    /// Empties the hand without touching the world.
    pub fn clear(&mut self) {
        self.slot = GrabSlot::Empty;
    }

    /// Attempts to pick up the nearest item along `ray`.
    ///
    /// Does nothing while already holding. Returns the grabbed item.
    pub fn try_grab<R: RayCaster + ?Sized>(
        &mut self,
        world: &World,
        caster: &R,
        ray: &Ray,
    ) -> Option<ItemId> {
        if self.slot != GrabSlot::Empty {
            return None;
        }

        let id = caster
            .cast_ray(world, ray)
            .into_iter()
            .filter_map(|hit| hit.target.item())
            .find(|&id| world.item(id).is_some())?;

        self.slot = GrabSlot::Holding(id);
        Some(id)
    }

    /// Eases the held item toward `target` by `blend` of the remaining gap.
    pub fn follow(&self, world: &mut World, target: Vec3, blend: f32) {
        let Some(item) = self.held().and_then(|id| world.item_mut(id)) else {
            return;
        };
        item.position = item.position.lerp(target, blend);
    }

    /// Lets go of the held item, scoring it against the nearest bin.
    ///
    /// Returns `None` when the hand was already empty.
    pub fn try_release(
        &mut self,
        world: &mut World,
        score: &mut Score,
        rules: &DropRules,
    ) -> Option<DropOutcome> {
        let GrabSlot::Holding(id) = self.slot else {
            return None;
        };
        self.slot = GrabSlot::Empty;

        let item = world.item(id)?;
        let position = item.position;
        let expected = item.category();

        let Some(bin) = world.bin_within(position, rules.tolerance).map(|bin| bin.category) else {
            // Falls back to where it floated before it was picked up.
            let item = world.item_mut(id)?;
            item.position.y = item.rest_height;
            let position = item.position;
            return Some(DropOutcome::Dropped { item: id, position });
        };

        world.remove(id);
        if bin == expected {
            score.award(rules.correct_points);
            Some(DropOutcome::Correct { item: id, bin })
        } else {
            score.penalize(rules.wrong_penalty);
            Some(DropOutcome::Wrong {
                item: id,
                bin,
                expected,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::raycast::{HitTarget, RayHit};

    /// Reports a fixed hit list regardless of the ray.
    struct FixedHits(Vec<HitTarget>);

    impl RayCaster for FixedHits {
        fn cast_ray(&self, _world: &World, _ray: &Ray) -> Vec<RayHit> {
            self.0
                .iter()
                .enumerate()
                .map(|(i, &target)| {
                    #[allow(clippy::cast_precision_loss)]
                    let distance = i as f32;
                    RayHit { distance, target }
                })
                .collect()
        }
    }

    const RULES: DropRules = DropRules {
        tolerance: 1.0,
        correct_points: 100,
        wrong_penalty: 50,
    };

    // Palette indices in the default config.
    const PLASTIC_BOTTLE: usize = 0;
    const OLD_BATTERY: usize = 5;

    fn any_ray() -> Ray {
        Ray::new(Vec3::ZERO, Vec3::NEG_Z)
    }

    fn holding(world: &mut World, kind: usize, position: Vec3) -> (InteractionEngine, ItemId) {
        let id = world.spawn_at(kind, position);
        let mut engine = InteractionEngine::new();
        let grabbed = engine.try_grab(world, &FixedHits(vec![HitTarget::Item(id)]), &any_ray());
        assert_eq!(grabbed, Some(id));
        (engine, id)
    }

    #[test]
    fn test_grab_skips_untagged_hits() {
        let mut world = World::new(&GameConfig::default());
        let id = world.spawn_at(PLASTIC_BOTTLE, Vec3::ZERO);
        let caster = FixedHits(vec![HitTarget::Bin(0), HitTarget::Item(id)]);

        let mut engine = InteractionEngine::new();
        assert_eq!(engine.try_grab(&world, &caster, &any_ray()), Some(id));
        assert_eq!(engine.slot(), GrabSlot::Holding(id));
    }

    #[test]
    fn test_grab_nothing_stays_empty() {
        let world = World::new(&GameConfig::default());
        let mut engine = InteractionEngine::new();
        let caster = FixedHits(vec![HitTarget::Bin(1)]);
        assert_eq!(engine.try_grab(&world, &caster, &any_ray()), None);
        assert_eq!(engine.slot(), GrabSlot::Empty);
    }

    #[test]
    fn test_second_grab_is_noop() {
        let mut world = World::new(&GameConfig::default());
        let (mut engine, first) = holding(&mut world, PLASTIC_BOTTLE, Vec3::ZERO);
        let other = world.spawn_at(PLASTIC_BOTTLE, Vec3::ONE);

        for _ in 0..3 {
            let caster = FixedHits(vec![HitTarget::Item(other)]);
            assert_eq!(engine.try_grab(&world, &caster, &any_ray()), None);
            assert_eq!(engine.slot(), GrabSlot::Holding(first));
        }
    }

    #[test]
    fn test_release_when_empty_is_noop() {
        let mut world = World::new(&GameConfig::default());
        let mut engine = InteractionEngine::new();
        let mut score = Score::from(40);
        assert_eq!(engine.try_release(&mut world, &mut score, &RULES), None);
        assert_eq!(score.value(), 40);
    }

    #[test]
    fn test_correct_drop_scores_and_removes() {
        let mut world = World::new(&GameConfig::default());
        // 0.5 above the recycle bin.
        let (mut engine, id) = holding(&mut world, PLASTIC_BOTTLE, Vec3::new(-1.5, 0.5, -3.0));
        let mut score = Score::default();

        let outcome = engine.try_release(&mut world, &mut score, &RULES);
        assert_eq!(
            outcome,
            Some(DropOutcome::Correct {
                item: id,
                bin: Category::Recycle
            })
        );
        assert_eq!(score.value(), 100);
        assert!(world.item(id).is_none());
        assert_eq!(engine.slot(), GrabSlot::Empty);
    }

    #[test]
    fn test_wrong_drop_clamps_at_zero() {
        let mut world = World::new(&GameConfig::default());
        // 0.5 above the compost bin, carrying landfill.
        let (mut engine, id) = holding(&mut world, OLD_BATTERY, Vec3::new(0.0, 0.5, -3.0));
        let mut score = Score::from(30);

        let outcome = engine.try_release(&mut world, &mut score, &RULES);
        assert_eq!(
            outcome,
            Some(DropOutcome::Wrong {
                item: id,
                bin: Category::Compost,
                expected: Category::Landfill,
            })
        );
        assert_eq!(score.value(), 0);
        assert!(world.item(id).is_none());
        assert_eq!(engine.slot(), GrabSlot::Empty);
    }

    #[test]
    fn test_drop_out_of_reach_keeps_item() {
        let mut world = World::new(&GameConfig::default());
        // 1.5 above the landfill bin, far from the others.
        let position = Vec3::new(1.5, 1.5, -3.0);
        let (mut engine, id) = holding(&mut world, OLD_BATTERY, position);
        let mut score = Score::from(200);

        let outcome = engine.try_release(&mut world, &mut score, &RULES);
        assert_eq!(outcome, Some(DropOutcome::Dropped { item: id, position }));
        assert_eq!(score.value(), 200);
        assert_eq!(world.item(id).unwrap().position, position);
        assert_eq!(engine.slot(), GrabSlot::Empty);
    }

    #[test]
    fn test_drop_out_of_reach_settles_to_rest_height() {
        let mut world = World::new(&GameConfig::default());
        let (mut engine, id) = holding(&mut world, PLASTIC_BOTTLE, Vec3::new(3.0, 0.2, -1.0));
        // Carried up toward the cursor before letting go.
        engine.follow(&mut world, Vec3::new(3.0, 1.4, -1.0), 1.0);
        let mut score = Score::default();

        let outcome = engine.try_release(&mut world, &mut score, &RULES);
        let settled = Vec3::new(3.0, 0.2, -1.0);
        assert_eq!(
            outcome,
            Some(DropOutcome::Dropped {
                item: id,
                position: settled
            })
        );
        assert_eq!(world.item(id).unwrap().position, settled);
        assert_eq!(score.value(), 0);
    }

    #[test]
    fn test_follow_lerps_toward_target() {
        let mut world = World::new(&GameConfig::default());
        let (engine, id) = holding(&mut world, PLASTIC_BOTTLE, Vec3::ZERO);
        let target = Vec3::new(10.0, 0.0, 0.0);

        engine.follow(&mut world, target, 0.2);
        assert!((world.item(id).unwrap().position.x - 2.0).abs() < 1e-5);

        engine.follow(&mut world, target, 0.2);
        assert!((world.item(id).unwrap().position.x - 3.6).abs() < 1e-5);
    }

    #[test]
    fn test_score_never_negative() {
        let mut score = Score::default();
        for _ in 0..10 {
            score.penalize(50);
            assert_eq!(score.value(), 0);
        }
        score.award(100);
        score.penalize(30);
        assert_eq!(score.value(), 70);
    }
}
