//! Room records returned by the room service.

use serde::{Deserialize, Serialize};

/// A bookable room.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Room {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Room {
    /// The room substituted whenever the room service cannot be used.
    pub fn fallback() -> Self {
        Self {
            id: 0,
            name: "Default".to_string(),
            description: String::new(),
        }
    }
}
