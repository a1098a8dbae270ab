//! Display statistics derived from a creature snapshot.
//!
//! The rename feature only depends on the [`StatProvider`] trait; the formulas
//! in [`StandardStatProvider`] are one interchangeable implementation.

use protocol::{PokemonData, PokemonId};
use thiserror::Error;

/// Highest individual value a single stat can roll.
pub const MAX_INDIVIDUAL_VALUE: i32 = 15;

/// Computed display values for one creature.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedStats {
    pub name: String,
    pub level: f32,
    pub attack: i32,
    pub defense: i32,
    pub stamina: i32,
    /// Sum of individual values over their maximum, in `[0, 1]`.
    pub iv_ratio: f64,
}

impl DerivedStats {
    pub fn iv_percentage(&self) -> f64 {
        self.iv_ratio * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatError {
    #[error("unknown species {0:?}")]
    UnknownSpecies(PokemonId),

    #[error("individual {stat} value {value} outside 0..=15")]
    IndividualValueOutOfRange { stat: &'static str, value: i32 },

    #[error("invalid cp multiplier {0}")]
    InvalidMultiplier(f32),
}

/// Pure function from a creature snapshot to its display statistics.
pub trait StatProvider: Send + Sync {
    fn compute(&self, pokemon: &PokemonData) -> Result<DerivedStats, StatError>;
}

/// Default provider: species name, raw individual values, and a level
/// estimated from the combined CP multiplier.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardStatProvider;

impl StatProvider for StandardStatProvider {
    fn compute(&self, pokemon: &PokemonData) -> Result<DerivedStats, StatError> {
        let name = pokemon
            .pokemon_id
            .name()
            .ok_or(StatError::UnknownSpecies(pokemon.pokemon_id))?;

        let attack = individual("attack", pokemon.individual_attack)?;
        let defense = individual("defense", pokemon.individual_defense)?;
        let stamina = individual("stamina", pokemon.individual_stamina)?;

        Ok(DerivedStats {
            name: name.to_owned(),
            level: level_from_multiplier(pokemon.total_cp_multiplier())?,
            attack,
            defense,
            stamina,
            iv_ratio: f64::from(attack + defense + stamina) / f64::from(3 * MAX_INDIVIDUAL_VALUE),
        })
    }
}

fn individual(stat: &'static str, value: i32) -> Result<i32, StatError> {
    if (0..=MAX_INDIVIDUAL_VALUE).contains(&value) {
        Ok(value)
    } else {
        Err(StatError::IndividualValueOutOfRange { stat, value })
    }
}

/// Inverts the CP multiplier curve, rounded to the nearest half level.
fn level_from_multiplier(multiplier: f32) -> Result<f32, StatError> {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(StatError::InvalidMultiplier(multiplier));
    }

    let m = f64::from(multiplier);
    let level = if m < 0.734 {
        58.35178527 * m * m - 2.838007664 * m + 0.8539209906
    } else {
        171.0112688 * m - 95.20425243
    };
    let level = ((level * 2.0).round() / 2.0).max(1.0);
    Ok(level as f32)
}
