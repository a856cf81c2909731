/// For ally/foe determinations
use bevy::ecs::{
    component::Component,
    entity::Entity,
    system::{Query, SystemParam},
};

pub type Faction = u8;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Alignment {
    Ally,
    Foe,
}

/// Factions are bitmasks, a member can belong to several
#[derive(Component, Debug, Clone, Copy)]
pub struct FactionMember(pub Faction);

pub fn shares_faction(a: Faction, b: Faction) -> bool {
    (a & b) != 0
}

/// An entity is always its own ally. Entities without a faction are foes to everyone else.
pub fn alignment_between(
    origin: (Entity, Option<Faction>),
    target: (Entity, Option<Faction>),
) -> Alignment {
    if origin.0 == target.0 {
        return Alignment::Ally;
    }
    if shares_faction(origin.1.unwrap_or_default(), target.1.unwrap_or_default()) {
        Alignment::Ally
    } else {
        Alignment::Foe
    }
}

#[derive(SystemParam)]
pub struct FactionChecker<'w, 's> {
    factions: Query<'w, 's, &'static FactionMember>,
}

impl<'w, 's> FactionChecker<'w, 's> {
    pub fn get_entity_faction(&self, entity: Entity) -> Option<Faction> {
        self.factions.get(entity).ok().map(|member| member.0)
    }

    pub fn alignment_of(&self, origin: Entity, target: Entity) -> Alignment {
        alignment_between(
            (origin, self.get_entity_faction(origin)),
            (target, self.get_entity_faction(target)),
        )
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::{system::SystemState, world::World};

    use super::*;

    #[test]
    fn test_alignment_between() {
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);

        assert_eq!(alignment_between((a, Some(0b01)), (b, Some(0b11))), Alignment::Ally);
        assert_eq!(alignment_between((a, Some(0b01)), (b, Some(0b10))), Alignment::Foe);
        assert_eq!(alignment_between((a, None), (b, None)), Alignment::Foe);
        assert_eq!(alignment_between((a, None), (a, None)), Alignment::Ally);
    }

    #[test]
    fn test_faction_checker() {
        let mut world = World::new();
        let knight = world.spawn(FactionMember(0b01)).id();
        let squire = world.spawn(FactionMember(0b01)).id();
        let wolf = world.spawn(FactionMember(0b10)).id();
        let rock = world.spawn_empty().id();

        let mut state: SystemState<FactionChecker> = SystemState::new(&mut world);
        let checker = state.get(&world);

        assert_eq!(checker.get_entity_faction(wolf), Some(0b10));
        assert_eq!(checker.get_entity_faction(rock), None);
        assert_eq!(checker.alignment_of(knight, squire), Alignment::Ally);
        assert_eq!(checker.alignment_of(knight, wolf), Alignment::Foe);
        assert_eq!(checker.alignment_of(knight, rock), Alignment::Foe);
        assert_eq!(checker.alignment_of(rock, rock), Alignment::Ally);
    }
}
