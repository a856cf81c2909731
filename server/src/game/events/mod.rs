/// general game events
use bevy::prelude::*;
use lib_aura::shared::ActionID;

/// Unit should start running `action_id`
#[derive(Event, Debug, Copy, Clone)]
pub struct StartActionEvent {
    pub entity: Entity,
    pub action_id: ActionID,
}

impl StartActionEvent {
    pub fn new(entity: Entity, action_id: ActionID) -> Self {
        Self { entity, action_id }
    }
}

/// Unit should stop whatever action it is running
#[derive(Event, Debug, Copy, Clone)]
pub struct StopActionEvent {
    pub entity: Entity,
}

/// `receiver` was granted `amount` mana by `granter`
#[derive(Event, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ManaReceivedEvent {
    pub receiver: Entity,
    pub granter: Entity,
    pub amount: i64,
}

/// Play animation `trigger` on `entity`
#[derive(Event, Debug, Clone)]
pub struct AnimationTriggerEvent {
    pub entity: Entity,
    pub trigger: String,
}

/// Clients should visualize `actor` starting `action_id`
#[derive(Event, Debug, Copy, Clone)]
pub struct ActionStartBroadcast {
    pub actor: Entity,
    pub action_id: ActionID,
}

pub struct GameEventsPlugin;

impl Plugin for GameEventsPlugin {
    fn build(&self, app: &mut bevy::prelude::App) {
        app.add_event::<StartActionEvent>()
            .add_event::<StopActionEvent>()
            .add_event::<ManaReceivedEvent>()
            .add_event::<AnimationTriggerEvent>()
            .add_event::<ActionStartBroadcast>();
    }
}
