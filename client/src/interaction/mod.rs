//! Look-at-and-press interaction from the first-person camera.

use bevy::math::bounding::Aabb3d;
use bevy::prelude::*;
use common::crafting::CraftedItem;

use crate::input::PlayerInput;
use crate::locomotion::Deactivated;
use crate::physics::ray_hit_distance;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractOutcome {
    /// Nothing happened.
    Ignored,
    /// The interaction ran to completion.
    Completed,
    /// The interaction stays active until disengaged.
    Engaged,
}

pub trait Interactable: Send + Sync + 'static {
    fn label(&self) -> &str;

    fn on_interact(&mut self) -> InteractOutcome;

    /// Returns whether the interaction let go.
    fn on_disengage(&mut self) -> bool;

    /// Text shown while this interaction is engaged.
    fn panel_text(&self) -> Option<String> {
        None
    }
}

#[derive(Component)]
pub struct InteractionTarget(pub Box<dyn Interactable>);

#[derive(Component, Debug, Clone, Copy)]
pub struct InteractionBounds {
    pub half_extents: Vec3,
}

/// Ray probe carried by the first-person camera.
#[derive(Component, Debug, Clone)]
pub struct InteractionProbe {
    pub distance: f32,
    pub hovered: Option<Entity>,
    pub engaged: Option<Entity>,
}

impl InteractionProbe {
    pub fn new(distance: f32) -> Self {
        Self {
            distance,
            hovered: None,
            engaged: None,
        }
    }
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interacted {
    pub target: Entity,
    pub outcome: InteractOutcome,
}

/// Crafted item the player can pick up and look at.
pub struct InspectItem {
    pub item: CraftedItem,
    inspecting: bool,
}

impl InspectItem {
    pub fn new(item: CraftedItem) -> Self {
        Self {
            item,
            inspecting: false,
        }
    }

    pub fn is_inspecting(&self) -> bool {
        self.inspecting
    }
}

impl Interactable for InspectItem {
    fn label(&self) -> &str {
        &self.item.name
    }

    fn on_interact(&mut self) -> InteractOutcome {
        if self.inspecting {
            return InteractOutcome::Ignored;
        }
        self.inspecting = true;
        InteractOutcome::Engaged
    }

    fn on_disengage(&mut self) -> bool {
        let was_inspecting = self.inspecting;
        self.inspecting = false;
        was_inspecting
    }

    fn panel_text(&self) -> Option<String> {
        self.inspecting.then(|| self.item.to_string())
    }
}

/// Closest candidate hit by the ray within `max_distance`.
pub fn nearest_hit(
    origin: Vec3,
    direction: Dir3,
    max_distance: f32,
    candidates: impl IntoIterator<Item = (Entity, Aabb3d)>,
) -> Option<(Entity, f32)> {
    candidates
        .into_iter()
        .filter_map(|(entity, bounds)| {
            ray_hit_distance(origin, direction, max_distance, &bounds)
                .map(|distance| (entity, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

pub fn probe_interactions(
    input: Res<PlayerInput>,
    mut probes: Query<(&GlobalTransform, &mut InteractionProbe), Without<Deactivated>>,
    mut targets: Query<(Entity, &GlobalTransform, &InteractionBounds, &mut InteractionTarget)>,
    mut interacted: MessageWriter<Interacted>,
) {
    for (camera, mut probe) in &mut probes {
        if probe.engaged.is_some_and(|entity| !targets.contains(entity)) {
            probe.engaged = None;
        }

        let hit = nearest_hit(
            camera.translation(),
            camera.forward(),
            probe.distance,
            targets.iter().map(|(entity, transform, bounds, _)| {
                (entity, Aabb3d::new(transform.translation(), bounds.half_extents))
            }),
        );
        probe.hovered = hit.map(|(entity, _)| entity);

        if !input.interact.pressed {
            continue;
        }

        match probe.engaged {
            Some(engaged) => {
                let Ok((_, _, _, mut target)) = targets.get_mut(engaged) else {
                    continue;
                };
                if target.0.on_disengage() {
                    debug!("Disengaged from {}", target.0.label());
                    probe.engaged = None;
                }
            }
            None => {
                let Some((entity, _)) = hit else {
                    continue;
                };
                let Ok((_, _, _, mut target)) = targets.get_mut(entity) else {
                    continue;
                };
                let outcome = target.0.on_interact();
                if outcome == InteractOutcome::Ignored {
                    continue;
                }
                info!("Interacted with {}", target.0.label());
                if outcome == InteractOutcome::Engaged {
                    probe.engaged = Some(entity);
                }
                interacted.write(Interacted {
                    target: entity,
                    outcome,
                });
            }
        }
    }
}

/// Text of the interaction the player is currently engaged with.
pub fn engaged_panel_text(
    probe: &InteractionProbe,
    targets: &Query<&InteractionTarget>,
) -> Option<String> {
    probe
        .engaged
        .and_then(|entity| targets.get(entity).ok())
        .and_then(|target| target.0.panel_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn nearest_hit_prefers_closest_box() {
        let mut world = World::new();
        let (near_entity, far_entity) = (world.spawn_empty().id(), world.spawn_empty().id());
        let near = Aabb3d::new(Vec3::new(0.0, 0.0, -2.0), Vec3::splat(0.5));
        let far = Aabb3d::new(Vec3::new(0.0, 0.0, -4.0), Vec3::splat(0.5));

        let hit = nearest_hit(
            Vec3::ZERO,
            Dir3::NEG_Z,
            10.0,
            [(far_entity, far), (near_entity, near)],
        );

        assert_eq!(hit.map(|(entity, _)| entity), Some(near_entity));
        assert!(hit.is_some_and(|(_, distance)| (distance - 1.5).abs() < 1e-4));
    }

    #[test]
    fn nearest_hit_ignores_boxes_out_of_reach() {
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        let target = Aabb3d::new(Vec3::new(0.0, 0.0, -5.0), Vec3::splat(0.5));
        assert!(nearest_hit(Vec3::ZERO, Dir3::NEG_Z, 3.0, [(entity, target)]).is_none());
    }

    #[test]
    fn inspect_item_engages_until_disengaged() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut item = InspectItem::new(CraftedItem::from_name("Flame Sword", &mut rng));

        assert_eq!(item.panel_text(), None);
        assert_eq!(item.on_interact(), InteractOutcome::Engaged);
        assert!(item.is_inspecting());
        assert_eq!(item.on_interact(), InteractOutcome::Ignored);

        let text = item.panel_text().expect("panel text while inspecting");
        assert!(text.starts_with("Flame Sword: "));

        assert!(item.on_disengage());
        assert!(!item.on_disengage());
        assert_eq!(item.panel_text(), None);
    }
}
