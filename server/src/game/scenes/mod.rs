use bevy::{ecs::world::World, log, transform::components::Transform};
use lib_aura::shared::Mana;

use super::{
    actions::action_ids,
    alignment::FactionMember,
    events::StartActionEvent,
    mana::ManaReceiver,
    physics::Collider,
};

const PARTY: u8 = 0b01;
const MONSTERS: u8 = 0b10;

/// A caster running a mana aura among party members, one out of range, and a monster
pub fn sys_spawn_demo(world: &mut World) {
    let party_positions = [(2.0, 0.0), (-3.0, 4.0), (12.0, 12.0)];
    let caster = world
        .spawn((
            Transform::from_xyz(0.0, 0.0, 0.0),
            Collider { radius: 0.5 },
            FactionMember(PARTY),
            Mana::new(20, 100),
            ManaReceiver::new(),
        ))
        .id();

    for (x, z) in party_positions {
        let mut receiver = ManaReceiver::new();
        receiver.subscribe(move |granter, amount| {
            log::info!("party member at ({}, {}) got {} mana from {:?}", x, z, amount, granter);
        });
        world.spawn((
            Transform::from_xyz(x, 0.0, z),
            Collider { radius: 0.5 },
            FactionMember(PARTY),
            Mana::new(0, 60),
            receiver,
        ));
    }

    world.spawn((
        Transform::from_xyz(1.0, 0.0, 1.0),
        Collider { radius: 1.5 },
        FactionMember(MONSTERS),
        Mana::new(0, 200),
        ManaReceiver::new(),
    ));

    log::info!(
        "demo: {:?} starts mana aura among {} party members",
        caster,
        party_positions.len()
    );
    world.send_event(StartActionEvent::new(caster, action_ids::MANA_AURA.into()));
}
