use std::time::Duration;

use bevy::{ecs::system::Resource, utils::HashMap};
use lib_aura::{
    config::{ActionConfig, ConfigError},
    shared::ActionID,
};

use super::Action;

pub mod action_ids {
    pub const MANA_AURA: usize = 0;
    pub const WELLSPRING: usize = 1;
}

// all our complex info about our actions
#[derive(Resource)]
pub struct ActionDatabase(Vec<ActionConfig>);

impl ActionDatabase {
    pub fn new(actions: Vec<ActionConfig>) -> Self {
        Self(actions)
    }

    pub fn get_action_data(&self, id: ActionID) -> Option<&ActionConfig> {
        self.0.get(id.get())
    }
}

pub fn get_action_database() -> Result<ActionDatabase, ConfigError> {
    Ok(ActionDatabase(vec![
        ActionConfig::mana_aura("Mana Aura", Duration::from_secs(1), 5, 8.0)?
            .with_exec_time(Duration::from_millis(500))
            .with_duration(Duration::from_secs(10))
            .with_anim("ManaAura"),
        ActionConfig::mana_aura("Wellspring", Duration::from_millis(500), 2, 4.0)?
            .with_anim("Wellspring"),
    ]))
}

/// Finished actions, reset & waiting to be reused
#[derive(Resource, Default)]
pub struct ActionPool(HashMap<ActionID, Vec<Box<dyn Action>>>);

impl ActionPool {
    pub fn take(&mut self, id: ActionID) -> Option<Box<dyn Action>> {
        self.0.get_mut(&id).and_then(|actions| actions.pop())
    }

    pub fn put(&mut self, action: Box<dyn Action>) {
        self.0.entry(action.id()).or_default().push(action);
    }

    pub fn len(&self) -> usize {
        self.0.values().map(|actions| actions.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::actions::create_action;

    #[test]
    fn test_database_ids() {
        let database = get_action_database().unwrap();
        let aura = database
            .get_action_data(action_ids::MANA_AURA.into())
            .unwrap();
        assert_eq!(aura.name, "Mana Aura");
        assert!(database
            .get_action_data(action_ids::WELLSPRING.into())
            .is_some());
        assert!(database.get_action_data(2.into()).is_none());
    }

    #[test]
    fn test_pool_by_id() {
        let database = get_action_database().unwrap();
        let mut pool = ActionPool::default();
        for id in [action_ids::MANA_AURA, action_ids::MANA_AURA, action_ids::WELLSPRING] {
            let id = ActionID::from(id);
            pool.put(create_action(id, database.get_action_data(id).unwrap()));
        }
        assert_eq!(pool.len(), 3);

        let wellspring = ActionID::from(action_ids::WELLSPRING);
        assert_eq!(pool.take(wellspring).map(|a| a.id()), Some(wellspring));
        assert!(pool.take(wellspring).is_none());
        assert_eq!(pool.len(), 2);
    }
}
