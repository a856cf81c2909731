mod mana_aura;
mod resource;
mod world;

use std::time::Duration;

use bevy::{
    app::{FixedUpdate, Plugin},
    ecs::{
        component::Component,
        entity::Entity,
        event::EventReader,
        query::With,
        schedule::IntoSystemConfigs,
        system::{Commands, Query, Res, ResMut},
    },
    log,
    utils::HashSet,
};
use lib_aura::{
    config::{ActionConfig, ActionLogic},
    shared::ActionID,
};

use super::{
    events::{StartActionEvent, StopActionEvent},
    physics::DetectFilter,
    ServerSets,
};

pub use mana_aura::ManaAuraAction;
pub use resource::{action_ids, get_action_database, ActionDatabase, ActionPool};
pub use world::ActionWorld;

/// What an action may see & do in the world while it runs
pub trait ActionContext {
    /// Current simulation time
    fn now(&self) -> Duration;
    fn detect_in_range(&self, origin: Entity, filter: DetectFilter, range: f32) -> Vec<Entity>;
    fn is_mana_receiver(&self, entity: Entity) -> bool;
    /// Does nothing if `receiver` cannot receive mana
    fn receive_mana(&mut self, receiver: Entity, granter: Entity, amount: i64);
    fn trigger_animation(&mut self, actor: Entity, anim: &str);
    fn broadcast_action_start(&mut self, actor: Entity, action_id: ActionID);
}

/// Lifecycle of a running action. The action runner calls `on_start` once,
/// then `on_update` every step until it ends, then `reset` before pooling.
pub trait Action: Send + Sync {
    fn id(&self) -> ActionID;
    fn config(&self) -> &ActionConfig;
    /// Returns false if the action should end immediately
    fn on_start(&mut self, actor: Entity, ctx: &mut dyn ActionContext) -> bool;
    /// Returns false if the action should end
    fn on_update(&mut self, actor: Entity, ctx: &mut dyn ActionContext) -> bool;
    /// Return to the state before `on_start`
    fn reset(&mut self);
}

pub fn create_action(id: ActionID, config: &ActionConfig) -> Box<dyn Action> {
    match config.logic {
        ActionLogic::ManaAura { .. } => Box::new(ManaAuraAction::new(id, config.clone())),
    }
}

/// Unit is running an action
#[derive(Component)]
pub struct ActiveAction {
    action: Option<Box<dyn Action>>,
    started_at: Option<Duration>,
}

impl ActiveAction {
    fn new(action: Box<dyn Action>) -> Self {
        Self {
            action: Some(action),
            started_at: None,
        }
    }

    pub fn action_id(&self) -> Option<ActionID> {
        self.action.as_ref().map(|a| a.id())
    }

}

/// Reset a finished action & keep it for reuse
fn release_action(pool: &mut ActionPool, active: &mut ActiveAction) {
    if let Some(mut action) = active.action.take() {
        action.reset();
        pool.put(action);
        log::trace!("{} actions pooled", pool.len());
    }
}

/// Begin actions when event received
fn sys_start_action_ev(
    mut ev_r: EventReader<StartActionEvent>,
    mut commands: Commands,
    database: Res<ActionDatabase>,
    mut pool: ResMut<ActionPool>,
    q_active: Query<(), With<ActiveAction>>,
) {
    let mut starting = HashSet::new();
    for ev in ev_r.read() {
        let Some(config) = database.get_action_data(ev.action_id) else {
            log::error!("no action {}", ev.action_id);
            continue;
        };
        if q_active.contains(ev.entity) || !starting.insert(ev.entity) {
            log::info!("{:?} is busy, not starting {}", ev.entity, config.name);
            continue;
        }
        let Some(mut entity_commands) = commands.get_entity(ev.entity) else {
            log::warn!("cannot start {} on missing {:?}", config.name, ev.entity);
            continue;
        };
        let action = pool
            .take(ev.action_id)
            .unwrap_or_else(|| create_action(ev.action_id, config));
        entity_commands.insert(ActiveAction::new(action));
        log::debug!("{:?} starts action {}", ev.entity, config.name);
    }
}

/// Cancel actions when event received
fn sys_stop_action_ev(
    mut ev_r: EventReader<StopActionEvent>,
    mut commands: Commands,
    mut pool: ResMut<ActionPool>,
    mut q_active: Query<&mut ActiveAction>,
) {
    for ev in ev_r.read() {
        if let Ok(mut active) = q_active.get_mut(ev.entity) {
            release_action(&mut pool, &mut active);
            commands.entity(ev.entity).remove::<ActiveAction>();
            log::debug!("{:?} stopped its action", ev.entity);
        }
    }
}

/// Start & update running actions, ending those that finish or run out of time
fn sys_run_actions(
    mut commands: Commands,
    mut q_active: Query<(Entity, &mut ActiveAction)>,
    mut world: ActionWorld,
    mut pool: ResMut<ActionPool>,
) {
    let now = world.now();
    for (entity, mut active) in q_active.iter_mut() {
        let active = &mut *active;
        let Some(action) = active.action.as_mut() else {
            continue;
        };

        let keep_going = match active.started_at {
            None => {
                active.started_at = Some(now);
                action.on_start(entity, &mut world)
            }
            Some(started_at) => {
                let keep_going = action.on_update(entity, &mut world);
                let expired = action
                    .config()
                    .duration
                    .is_some_and(|duration| now.saturating_sub(started_at) >= duration);
                keep_going && !expired
            }
        };

        if !keep_going {
            log::debug!(
                "{:?} finished action {} after {:?}",
                entity,
                action.config().name,
                active.started_at.map(|started_at| now.saturating_sub(started_at))
            );
            release_action(&mut pool, active);
            commands.entity(entity).remove::<ActiveAction>();
        }
    }
}

pub struct ActionPlugin;

impl Plugin for ActionPlugin {
    fn build(&self, app: &mut bevy::prelude::App) {
        app.init_resource::<ActionPool>().add_systems(
            FixedUpdate,
            (
                (sys_stop_action_ev, sys_start_action_ev)
                    .chain()
                    .in_set(ServerSets::ActionStart),
                sys_run_actions.in_set(ServerSets::ActionProcessing),
            ),
        );
    }
}
