//! Records published to external consumers.

use serde::{Deserialize, Serialize};

/// Flattened view of one `GET_MAP_OBJECTS` response.
///
/// Cell boundaries are not preserved: every wild and nearby creature of every
/// cell is appended to the corresponding list in cell order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MapObjectsRecord {
    pub wild: Vec<WildRecord>,
    pub nearby: Vec<NearbyRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WildRecord {
    pub id: u64,
    pub pokedex: u32,
    pub time_till_hidden_ms: u64,
    pub last_modified_timestamp_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearbyRecord {
    pub id: u64,
    pub pokedex: u32,
}
