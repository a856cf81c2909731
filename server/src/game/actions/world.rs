use std::time::Duration;

use bevy::{
    ecs::{
        entity::Entity,
        event::EventWriter,
        system::{Query, Res, SystemParam},
    },
    time::Time,
};
use lib_aura::shared::ActionID;

use super::ActionContext;
use crate::game::{
    events::{ActionStartBroadcast, AnimationTriggerEvent, ManaReceivedEvent},
    mana::ManaReceiver,
    physics::{DetectFilter, ProximityQuery},
};

/// ECS side of [`ActionContext`]
#[derive(SystemParam)]
pub struct ActionWorld<'w, 's> {
    time: Res<'w, Time>,
    proximity: ProximityQuery<'w, 's>,
    receivers: Query<'w, 's, &'static ManaReceiver>,
    mana_w: EventWriter<'w, ManaReceivedEvent>,
    anim_w: EventWriter<'w, AnimationTriggerEvent>,
    broadcast_w: EventWriter<'w, ActionStartBroadcast>,
}

impl<'w, 's> ActionContext for ActionWorld<'w, 's> {
    fn now(&self) -> Duration {
        self.time.elapsed()
    }

    fn detect_in_range(&self, origin: Entity, filter: DetectFilter, range: f32) -> Vec<Entity> {
        self.proximity.detect_entities_in_range(origin, filter, range)
    }

    fn is_mana_receiver(&self, entity: Entity) -> bool {
        self.receivers.contains(entity)
    }

    fn receive_mana(&mut self, receiver: Entity, granter: Entity, amount: i64) {
        if let Ok(mana_receiver) = self.receivers.get(receiver) {
            mana_receiver.receive(granter, amount);
            self.mana_w.send(ManaReceivedEvent {
                receiver,
                granter,
                amount,
            });
        }
    }

    fn trigger_animation(&mut self, actor: Entity, anim: &str) {
        self.anim_w.send(AnimationTriggerEvent {
            entity: actor,
            trigger: anim.into(),
        });
    }

    fn broadcast_action_start(&mut self, actor: Entity, action_id: ActionID) {
        self.broadcast_w.send(ActionStartBroadcast { actor, action_id });
    }
}
