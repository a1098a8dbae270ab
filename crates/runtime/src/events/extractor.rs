//! Projection of map responses into flat records.

use protocol::GetMapObjectsResponse;
use thiserror::Error;

use super::record::{MapObjectsRecord, NearbyRecord, WildRecord};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("wild encounter {encounter_id} carries no creature data")]
    MissingPokemonData { encounter_id: u64 },
}

/// Flattens every map cell of `response` into one [`MapObjectsRecord`].
///
/// Wild and nearby creatures keep their order within a cell and cells are
/// visited in response order. A wild entry without creature data makes the
/// whole response unusable; no partial record is produced.
pub fn extract_map_objects(response: &GetMapObjectsResponse) -> Result<MapObjectsRecord, ExtractError> {
    let mut record = MapObjectsRecord::default();

    for cell in &response.map_cells {
        for wild in &cell.wild_pokemons {
            let pokemon = wild
                .pokemon_data
                .as_ref()
                .ok_or(ExtractError::MissingPokemonData {
                    encounter_id: wild.encounter_id,
                })?;
            record.wild.push(WildRecord {
                id: wild.encounter_id,
                pokedex: pokemon.pokemon_id.value(),
                time_till_hidden_ms: wild.time_till_hidden_ms,
                last_modified_timestamp_ms: wild.last_modified_timestamp_ms,
            });
        }

        record
            .nearby
            .extend(cell.nearby_pokemons.iter().map(|nearby| NearbyRecord {
                id: nearby.encounter_id,
                pokedex: nearby.pokemon_id.value(),
            }));
    }

    tracing::trace!(
        target: "runtime::events",
        cells = response.map_cells.len(),
        wild = record.wild.len(),
        nearby = record.nearby.len(),
        "Map objects extracted"
    );

    Ok(record)
}

#[cfg(test)]
mod tests {
    use protocol::{MapCell, NearbyPokemon, PokemonData, PokemonId, WildPokemon};

    use super::*;

    fn wild(encounter_id: u64, species: u32) -> WildPokemon {
        WildPokemon {
            encounter_id,
            last_modified_timestamp_ms: 1000,
            time_till_hidden_ms: 5000,
            pokemon_data: Some(PokemonData {
                pokemon_id: PokemonId(species),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn nearby(encounter_id: u64, species: u32) -> NearbyPokemon {
        NearbyPokemon {
            pokemon_id: PokemonId(species),
            distance_in_meters: 120.0,
            encounter_id,
        }
    }

    #[test]
    fn single_wild_creature() {
        let response = GetMapObjectsResponse {
            map_cells: vec![MapCell {
                wild_pokemons: vec![wild(42, 16)],
                ..Default::default()
            }],
            ..Default::default()
        };

        let record = extract_map_objects(&response).unwrap();
        assert_eq!(
            record,
            MapObjectsRecord {
                wild: vec![WildRecord {
                    id: 42,
                    pokedex: 16,
                    time_till_hidden_ms: 5000,
                    last_modified_timestamp_ms: 1000,
                }],
                nearby: vec![],
            }
        );
    }

    #[test]
    fn flattens_across_cells_in_order() {
        let response = GetMapObjectsResponse {
            map_cells: vec![
                MapCell {
                    s2_cell_id: 1,
                    wild_pokemons: vec![wild(1, 16)],
                    nearby_pokemons: vec![nearby(10, 19)],
                    ..Default::default()
                },
                MapCell {
                    s2_cell_id: 2,
                    wild_pokemons: vec![wild(2, 19), wild(3, 13)],
                    nearby_pokemons: vec![nearby(11, 143)],
                    ..Default::default()
                },
                MapCell::default(),
            ],
            ..Default::default()
        };

        let record = extract_map_objects(&response).unwrap();
        let wild_ids: Vec<_> = record.wild.iter().map(|w| w.id).collect();
        let nearby: Vec<_> = record.nearby.iter().map(|n| (n.id, n.pokedex)).collect();
        assert_eq!(wild_ids, vec![1, 2, 3]);
        assert_eq!(nearby, vec![(10, 19), (11, 143)]);
    }

    #[test]
    fn missing_creature_data_is_an_error() {
        let mut broken = wild(9, 16);
        broken.pokemon_data = None;
        let response = GetMapObjectsResponse {
            map_cells: vec![MapCell {
                wild_pokemons: vec![wild(1, 16), broken],
                ..Default::default()
            }],
            ..Default::default()
        };

        assert_eq!(
            extract_map_objects(&response),
            Err(ExtractError::MissingPokemonData { encounter_id: 9 })
        );
    }
}
