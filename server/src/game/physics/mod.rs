/*! Range queries over entity positions */
use bevy::{
    ecs::{
        component::Component,
        entity::Entity,
        system::{Query, SystemParam},
    },
    math::Vec3,
    transform::components::Transform,
};

use super::alignment::{Alignment, FactionChecker};

/// Spherical body around an entity's position
#[derive(Component, Debug, Clone, Copy)]
pub struct Collider {
    pub radius: f32,
}

/// Which alignments a range query should return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectFilter {
    pub allies: bool,
    pub foes: bool,
}

impl DetectFilter {
    pub const ALLIES: DetectFilter = DetectFilter {
        allies: true,
        foes: false,
    };
    #[cfg(test)]
    pub const FOES: DetectFilter = DetectFilter {
        allies: false,
        foes: true,
    };

    pub fn wants(self, alignment: Alignment) -> bool {
        match alignment {
            Alignment::Ally => self.allies,
            Alignment::Foe => self.foes,
        }
    }
}

/// True if a body of `radius` at `target` touches a sphere of `range` around `origin`
fn in_reach(origin: Vec3, target: Vec3, range: f32, radius: f32) -> bool {
    let reach = range + radius;
    origin.distance_squared(target) <= reach * reach
}

#[derive(SystemParam)]
pub struct ProximityQuery<'w, 's> {
    bodies: Query<'w, 's, (Entity, &'static Transform, Option<&'static Collider>)>,
    factions: FactionChecker<'w, 's>,
}

impl<'w, 's> ProximityQuery<'w, 's> {
    /// Returns every body within `range` of `origin` matching `filter`, including `origin` itself
    /// when allies are wanted. Empty if `origin` has no position.
    pub fn detect_entities_in_range(
        &self,
        origin: Entity,
        filter: DetectFilter,
        range: f32,
    ) -> Vec<Entity> {
        let Ok((_, origin_tf, _)) = self.bodies.get(origin) else {
            return Vec::new();
        };

        self.bodies
            .iter()
            .filter(|(entity, ..)| filter.wants(self.factions.alignment_of(origin, *entity)))
            .filter(|(_, tf, collider)| {
                in_reach(
                    origin_tf.translation,
                    tf.translation,
                    range,
                    collider.map_or(0.0, |c| c.radius),
                )
            })
            .map(|(entity, ..)| entity)
            .collect()
    }
}
