use std::time::Duration;

use bevy::{ecs::entity::Entity, log};
use lib_aura::{
    config::{ActionConfig, ActionLogic, TickPeriod},
    shared::ActionID,
};

use super::{Action, ActionContext};
use crate::game::physics::DetectFilter;

/// Action that periodically grants mana to allies around the actor.
///
/// Receivers are detected twice: once on start, and again every time mana is
/// actually granted. The start broadcast lets clients visualize the aura as
/// early as possible, but who is in range when it starts is only a hint.
/// Granting to the start-time receivers would let allies walk away and keep
/// receiving mana, and allies walking in would never get any. Detecting again
/// when the effect lands grants only to whoever is in range at that moment.
pub struct ManaAuraAction {
    id: ActionID,
    config: ActionConfig,
    time_started: Option<Duration>,
    last_time_fired: Option<Duration>,
    receivers: Vec<Entity>,
}

impl ManaAuraAction {
    pub fn new(id: ActionID, config: ActionConfig) -> Self {
        Self {
            id,
            config,
            time_started: None,
            last_time_fired: None,
            receivers: Vec::new(),
        }
    }

    fn tick_period(&self) -> TickPeriod {
        match self.config.logic {
            ActionLogic::ManaAura { tick_period } => tick_period,
        }
    }

    #[cfg(test)]
    pub fn receivers(&self) -> &[Entity] {
        &self.receivers
    }

    #[cfg(test)]
    pub fn time_started(&self) -> Option<Duration> {
        self.time_started
    }

    #[cfg(test)]
    pub fn last_time_fired(&self) -> Option<Duration> {
        self.last_time_fired
    }

    /// Replace receivers with allies in range that can receive mana
    fn detect_receivers(&mut self, actor: Entity, ctx: &dyn ActionContext) {
        self.receivers.clear();
        let in_range = ctx.detect_in_range(actor, DetectFilter::ALLIES, self.config.range);
        self.receivers
            .extend(in_range.into_iter().filter(|&e| ctx.is_mana_receiver(e)));
    }
}

impl Action for ManaAuraAction {
    fn id(&self) -> ActionID {
        self.id
    }

    fn config(&self) -> &ActionConfig {
        &self.config
    }

    fn on_start(&mut self, actor: Entity, ctx: &mut dyn ActionContext) -> bool {
        self.detect_receivers(actor, ctx);
        let now = ctx.now();
        self.time_started = Some(now);
        self.last_time_fired = Some(now);

        ctx.trigger_animation(actor, &self.config.anim);
        ctx.broadcast_action_start(actor, self.id);
        log::debug!(
            "{:?} started {} with {} receivers in range",
            actor,
            self.config.name,
            self.receivers.len()
        );
        true
    }

    fn on_update(&mut self, actor: Entity, ctx: &mut dyn ActionContext) -> bool {
        let (Some(time_started), Some(last_time_fired)) = (self.time_started, self.last_time_fired)
        else {
            return true;
        };
        let now = ctx.now();
        let since_fired = now.saturating_sub(last_time_fired);
        let tick_period = self.tick_period();
        // counted before detecting again, not recounted after
        let ticks = tick_period.ticks_in(since_fired);

        if since_fired > tick_period.get()
            && now.saturating_sub(time_started) >= self.config.exec_time
        {
            self.detect_receivers(actor, ctx);
            let amount = self
                .config
                .amount
                .saturating_mul(i64::try_from(ticks).unwrap_or(i64::MAX));
            for &receiver in self.receivers.iter() {
                ctx.receive_mana(receiver, actor, amount);
            }
            log::trace!(
                "{:?} {} fired {} ticks for {} mana to {} receivers",
                actor,
                self.config.name,
                ticks,
                amount,
                self.receivers.len()
            );
            self.last_time_fired = Some(now);
        }
        true
    }

    fn reset(&mut self) {
        self.time_started = None;
        self.last_time_fired = None;
        self.receivers.clear();
    }
}
