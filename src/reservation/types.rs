use serde::{Deserialize, Serialize};

use crate::rooms::Room;

/// A freshly created reservation.
///
/// `room` is `None` when the room service answered with an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub title: String,
    /// ISO-8601 with offset, second precision.
    pub begin_date: String,
    pub room: Option<Room>,
}
