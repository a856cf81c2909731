use core::fmt;

use bevy_ecs::component::Component;
use serde::{Deserialize, Serialize};

/// Used to look up an action in the action database
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionID(usize);

impl ActionID {
    pub fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for ActionID {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl fmt::Display for ActionID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(ACTION:{})", self.0)
    }
}

/// Entity has a pool of mana
#[derive(Deserialize, Serialize, Component, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Mana {
    pub current: i64,
    pub max: i64,
}

impl Mana {
    pub fn new(current: i64, max: i64) -> Self {
        let max = max.max(0);
        Self {
            current: current.clamp(0, max),
            max,
        }
    }

    /// Adds `amount` to the pool, clamped to `0..=max`. Returns the change actually applied.
    pub fn apply(&mut self, amount: i64) -> i64 {
        let before = self.current;
        self.current = self.current.saturating_add(amount).clamp(0, self.max.max(0));
        self.current - before
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mana_clamps() {
        let mut mana = Mana::new(40, 50);
        assert_eq!(mana.apply(25), 10);
        assert!(mana.is_full());

        assert_eq!(mana.apply(-80), -50);
        assert_eq!(mana.current, 0);

        assert_eq!(mana.apply(i64::MAX), 50);
        assert_eq!(mana.current, 50);
    }

    #[test]
    fn test_mana_new_clamps_current() {
        assert_eq!(Mana::new(90, 10), Mana { current: 10, max: 10 });
        assert_eq!(Mana::new(5, -3), Mana { current: 0, max: 0 });
    }

    #[test]
    fn test_action_id_display() {
        assert_eq!(ActionID::from(3).to_string(), "(ACTION:3)");
    }
}
