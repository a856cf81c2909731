use std::fmt;

use bevy::{
    app::{FixedUpdate, Plugin},
    ecs::{
        component::Component,
        entity::Entity,
        event::EventReader,
        schedule::IntoSystemConfigs,
        system::Query,
    },
    log,
};
use lib_aura::shared::Mana;

use super::{events::ManaReceivedEvent, ServerSets};

/// Callback run with `(granter, amount)` whenever mana is received
pub type ManaObserver = Box<dyn Fn(Entity, i64) + Send + Sync>;

/// Handle returned by [`ManaReceiver::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Entity can be granted mana by actions.
/// Grants go to observers as-is; what they do with the amount is up to them.
#[derive(Component, Default)]
pub struct ManaReceiver {
    observers: Vec<(ObserverId, ManaObserver)>,
    next_id: u64,
}

impl ManaReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer`. Registering the same callback twice notifies it twice.
    pub fn subscribe(
        &mut self,
        observer: impl Fn(Entity, i64) + Send + Sync + 'static,
    ) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if `id` was not registered
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Notify observers in registration order
    pub fn receive(&self, granter: Entity, amount: i64) {
        for (_, observer) in self.observers.iter() {
            observer(granter, amount);
        }
    }
}

impl fmt::Debug for ManaReceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManaReceiver")
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// Add received mana to pools
pub(crate) fn sys_apply_mana_received(
    mut ev_r: EventReader<ManaReceivedEvent>,
    mut q_mana: Query<&mut Mana>,
) {
    for ev in ev_r.read() {
        if let Ok(mut mana) = q_mana.get_mut(ev.receiver) {
            let applied = mana.apply(ev.amount);
            log::debug!(
                "{:?} received {} mana from {:?} ({} applied): {}/{}",
                ev.receiver,
                ev.amount,
                ev.granter,
                applied,
                mana.current,
                mana.max
            );
            if mana.is_full() {
                log::debug!("{:?} mana is full", ev.receiver);
            }
        }
    }
}

pub struct ManaPlugin;

impl Plugin for ManaPlugin {
    fn build(&self, app: &mut bevy::prelude::App) {
        app.add_systems(
            FixedUpdate,
            sys_apply_mana_received.in_set(ServerSets::EffectApplication),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use bevy::{
        app::{App, Update},
        ecs::event::Events,
    };
    use tracing_test::traced_test;

    use super::*;

    #[test]
    fn test_observers_in_registration_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let granter = Entity::from_raw(7);
        let mut receiver = ManaReceiver::new();

        for tag in ["first", "second"] {
            let calls = calls.clone();
            receiver.subscribe(move |granter, amount| {
                calls.lock().unwrap().push((tag, granter, amount));
            });
        }
        receiver.receive(granter, -3);

        assert_eq!(
            *calls.lock().unwrap(),
            vec![("first", granter, -3), ("second", granter, -3)]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let count = Arc::new(Mutex::new(0));
        let mut receiver = ManaReceiver::new();

        let counter = count.clone();
        let id = receiver.subscribe(move |_, amount| *counter.lock().unwrap() += amount);
        let counter = count.clone();
        receiver.subscribe(move |_, amount| *counter.lock().unwrap() += amount);

        receiver.receive(Entity::from_raw(1), 5);
        assert_eq!(*count.lock().unwrap(), 10);

        assert!(receiver.unsubscribe(id));
        assert!(!receiver.unsubscribe(id));
        assert_eq!(receiver.observer_count(), 1);

        receiver.receive(Entity::from_raw(1), 5);
        assert_eq!(*count.lock().unwrap(), 15);
    }

    #[test]
    fn test_receive_without_observers() {
        ManaReceiver::new().receive(Entity::from_raw(1), 100);
    }

    #[traced_test]
    #[test]
    fn test_apply_mana_received() {
        let mut app = App::new();
        app.add_event::<ManaReceivedEvent>();
        app.add_systems(Update, sys_apply_mana_received);

        let granter = app.world.spawn_empty().id();
        let priest = app.world.spawn(Mana::new(10, 50)).id();
        let rock = app.world.spawn_empty().id();

        let mut events = app.world.resource_mut::<Events<ManaReceivedEvent>>();
        for (receiver, amount) in [(priest, 15), (priest, 40), (rock, 5)] {
            events.send(ManaReceivedEvent {
                receiver,
                granter,
                amount,
            });
        }
        app.update();

        assert_eq!(*app.world.get::<Mana>(priest).unwrap(), Mana::new(50, 50));
        assert!(app.world.get::<Mana>(rock).is_none());
        assert!(logs_contain("mana is full"));
    }
}
