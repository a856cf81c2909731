use bincode;
use serde::{Deserialize, Serialize};

use crate::shared::ActionID;

pub type SerializationError = bincode::ErrorKind;

/// Tells clients an entity started an action so they can play it.
/// Only a visual hint, clients never decide outcomes from it.
#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ActionStartMessage {
    pub entity: u32,
    pub action_id: ActionID,
}

impl ActionStartMessage {
    pub fn serialize(&self) -> Result<Vec<u8>, SerializationError> {
        match bincode::serialize(&self) {
            Ok(data) => Ok(data),
            Err(err) => Err(*err),
        }
    }

    pub fn deserialize(data: &[u8]) -> Result<ActionStartMessage, SerializationError> {
        match bincode::deserialize::<ActionStartMessage>(data) {
            Ok(msg) => Ok(msg),
            Err(e) => Err(*e),
        }
    }
}
