/*! Outbound notifications to clients. Visual hints only, never authoritative */
use std::sync::mpsc;

use bevy::{
    app::{FixedUpdate, Plugin},
    ecs::{
        event::EventReader,
        schedule::IntoSystemConfigs,
        system::{Res, Resource},
    },
    log,
};
use lib_aura::net::ActionStartMessage;

use super::{
    events::{ActionStartBroadcast, AnimationTriggerEvent},
    ServerSets,
};

// wraps a send channel
#[derive(Resource)]
pub struct ClientBroadcaster(mpsc::Sender<Vec<u8>>);

impl ClientBroadcaster {
    pub fn new(tx: mpsc::Sender<Vec<u8>>) -> Self {
        Self(tx)
    }

    // Returns false if sending is now impossible
    pub fn send_data(&self, data: Vec<u8>) -> bool {
        self.0.send(data).is_ok()
    }
}

/// Serialize action starts & hand them to the client broadcaster
fn sys_broadcast_action_starts(
    mut ev_r: EventReader<ActionStartBroadcast>,
    broadcaster: Option<Res<ClientBroadcaster>>,
) {
    let Some(broadcaster) = broadcaster else {
        ev_r.clear();
        return;
    };
    for ev in ev_r.read() {
        let msg = ActionStartMessage {
            entity: ev.actor.index(),
            action_id: ev.action_id,
        };
        match msg.serialize() {
            Ok(data) => {
                if !broadcaster.send_data(data) {
                    log::warn!("client broadcaster closed, dropped {:?}", msg);
                }
            }
            Err(err) => log::error!("failed to serialize {:?}: {}", msg, err),
        }
    }
}

fn sys_animation_triggers(mut ev_r: EventReader<AnimationTriggerEvent>) {
    for ev in ev_r.read() {
        log::debug!("{:?} plays animation {}", ev.entity, ev.trigger);
    }
}

/// Loopback client: reads broadcast packets until every sender is gone
pub fn drain_client_packets(rx: mpsc::Receiver<Vec<u8>>) -> usize {
    let mut received = 0;
    for packet in rx {
        match ActionStartMessage::deserialize(&packet) {
            Ok(msg) => {
                received += 1;
                log::debug!(
                    "client sees entity {} start action {}",
                    msg.entity,
                    msg.action_id
                );
            }
            Err(err) => log::warn!("invalid packet of {} bytes: {}", packet.len(), err),
        }
    }
    received
}

pub struct ReplicationPlugin;

impl Plugin for ReplicationPlugin {
    fn build(&self, app: &mut bevy::prelude::App) {
        app.add_systems(
            FixedUpdate,
            (sys_broadcast_action_starts, sys_animation_triggers).in_set(ServerSets::Replication),
        );
    }
}

#[cfg(test)]
mod tests {
    use bevy::{
        app::{App, Update},
        ecs::{entity::Entity, event::Events},
    };
    use tracing_test::traced_test;

    use super::*;
    use crate::game::events::GameEventsPlugin;

    #[test]
    fn test_broadcast_action_starts() {
        let (tx, rx) = mpsc::channel();
        let mut app = App::new();
        app.add_plugins(GameEventsPlugin)
            .insert_resource(ClientBroadcaster::new(tx))
            .add_systems(Update, sys_broadcast_action_starts);

        let caster = app.world.spawn_empty().id();
        app.world
            .resource_mut::<Events<ActionStartBroadcast>>()
            .send(ActionStartBroadcast {
                actor: caster,
                action_id: 1.into(),
            });
        app.update();
        app.update();

        let packets: Vec<Vec<u8>> = rx.try_iter().collect();
        assert_eq!(packets.len(), 1);
        assert_eq!(
            ActionStartMessage::deserialize(&packets[0]).unwrap(),
            ActionStartMessage {
                entity: caster.index(),
                action_id: 1.into(),
            }
        );
    }

    #[traced_test]
    #[test]
    fn test_drain_client_packets() {
        let (tx, rx) = mpsc::channel();
        let broadcaster = ClientBroadcaster::new(tx);
        let msg = ActionStartMessage {
            entity: Entity::from_raw(5).index(),
            action_id: 0.into(),
        };
        assert!(broadcaster.send_data(msg.serialize().unwrap()));
        assert!(broadcaster.send_data(vec![1, 2]));
        drop(broadcaster);

        assert_eq!(drain_client_packets(rx), 1);
        assert!(logs_contain("invalid packet of 2 bytes"));
    }
}
