//! `GET_MAP_OBJECTS` response messages.

use serde::{Deserialize, Serialize};

use crate::codec::Message;
use crate::pokemon::{PokemonData, PokemonId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MapObjectsStatus {
    #[default]
    Unset,
    Success,
    LocationUnset,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetMapObjectsResponse {
    pub status: MapObjectsStatus,
    pub map_cells: Vec<MapCell>,
}

impl Message for GetMapObjectsResponse {
    const NAME: &'static str = "GetMapObjectsResponse";
}

/// One S2 cell worth of map content.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapCell {
    pub s2_cell_id: u64,
    pub current_timestamp_ms: i64,
    pub wild_pokemons: Vec<WildPokemon>,
    pub nearby_pokemons: Vec<NearbyPokemon>,
}

/// A creature visible on the map with a known spawn location.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WildPokemon {
    pub encounter_id: u64,
    pub last_modified_timestamp_ms: u64,
    pub latitude: f64,
    pub longitude: f64,
    pub spawn_point_id: String,
    pub pokemon_data: Option<PokemonData>,
    pub time_till_hidden_ms: u64,
}

/// A creature reported in range without a location.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NearbyPokemon {
    pub pokemon_id: PokemonId,
    pub distance_in_meters: f32,
    pub encounter_id: u64,
}
